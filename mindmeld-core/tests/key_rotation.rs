//! Integration tests for key rotation against a mocked balance endpoint.
//!
//! These tests verify that the KeyRotator correctly:
//! - Prefers the current key while it stays usable
//! - Fails over past exhausted or rejected keys in pool order
//! - Treats transport failures and malformed bodies as invalid
//! - Caches well-formed balance measurements

use mindmeld_core::{HttpBalanceProbe, KeyRotator};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const BALANCE_PATH: &str = "/v1/user/balance";

/// Helper to create a rotator probing the mock server.
fn rotator_for(
    server: &MockServer,
    secrets: &[&str],
) -> KeyRotator<HttpBalanceProbe> {
    let probe = HttpBalanceProbe::new(format!("{}{}", server.uri(), BALANCE_PATH));
    KeyRotator::new(secrets.iter().copied(), probe)
}

/// Helper to mount a balance response for one bearer secret.
async fn mount_balance(
    server: &MockServer,
    secret: &str,
    template: ResponseTemplate,
    expected_calls: u64,
) {
    Mock::given(method("GET"))
        .and(path(BALANCE_PATH))
        .and(header("authorization", format!("Bearer {}", secret)))
        .respond_with(template)
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn credits(amount: f64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "credits": amount }))
}

#[tokio::test]
async fn test_usable_current_key_is_returned_without_touching_others() {
    let server = MockServer::start().await;
    mount_balance(&server, "sk-a", credits(25.0), 1).await;
    mount_balance(&server, "sk-b", credits(99.0), 0).await;

    let rotator = rotator_for(&server, &["sk-a", "sk-b"]);

    let key = rotator.current_key().await.unwrap();
    assert_eq!(key.expose(), "sk-a");
}

#[tokio::test]
async fn test_rotation_converges_on_the_first_positive_key() {
    let server = MockServer::start().await;
    // Pool of 3: exhausted, positive, positive. The second key wins and
    // stays preferred; the first is probed once, the third never.
    mount_balance(&server, "sk-a", credits(0.0), 1).await;
    mount_balance(&server, "sk-b", credits(50.0), 2).await;
    mount_balance(&server, "sk-c", credits(10.0), 0).await;

    let rotator = rotator_for(&server, &["sk-a", "sk-b", "sk-c"]);

    assert_eq!(rotator.current_key().await.unwrap().expose(), "sk-b");
    assert_eq!(rotator.current_key().await.unwrap().expose(), "sk-b");
}

#[tokio::test]
async fn test_all_rejected_keys_yield_none_and_zero_balances() {
    let server = MockServer::start().await;
    // Unauthorized key, then a server error. Neither probe populates the
    // cache, so the balance report re-probes and still reports zero.
    mount_balance(&server, "sk-a", ResponseTemplate::new(401), 2).await;
    mount_balance(&server, "sk-b", ResponseTemplate::new(500), 1).await;

    let rotator = rotator_for(&server, &["sk-a", "sk-b"]);

    assert!(rotator.current_key().await.is_none());
    assert_eq!(rotator.key_balance("sk-a").await, 0.0);
}

#[tokio::test]
async fn test_malformed_bodies_are_treated_as_invalid() {
    let server = MockServer::start().await;
    mount_balance(
        &server,
        "sk-a",
        ResponseTemplate::new(200).set_body_string("not json"),
        1,
    )
    .await;
    mount_balance(
        &server,
        "sk-b",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "balance": 10 })),
        1,
    )
    .await;

    let rotator = rotator_for(&server, &["sk-a", "sk-b"]);

    assert!(rotator.current_key().await.is_none());
}

#[tokio::test]
async fn test_balance_measured_during_rotation_is_served_from_cache() {
    let server = MockServer::start().await;
    mount_balance(&server, "sk-a", credits(12.5), 1).await;

    let rotator = rotator_for(&server, &["sk-a"]);

    assert_eq!(rotator.current_key().await.unwrap().expose(), "sk-a");
    // Already measured by the rotation probe; no further remote call.
    assert_eq!(rotator.key_balance("sk-a").await, 12.5);
}

#[tokio::test]
async fn test_key_balance_probes_lazily_and_once() {
    let server = MockServer::start().await;
    mount_balance(&server, "sk-a", credits(7.25), 1).await;

    let rotator = rotator_for(&server, &["sk-a"]);

    assert_eq!(rotator.key_balance("sk-a").await, 7.25);
    assert_eq!(rotator.key_balance("sk-a").await, 7.25);
    assert_eq!(rotator.key_balance("sk-unknown").await, 0.0);
}
