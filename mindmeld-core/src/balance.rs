//! Balance probing against the remote image-API billing endpoint.
//!
//! This module provides:
//! - [`ProbeOutcome`] - The result of checking one key's usable balance
//! - [`BalanceProbe`] - Trait for balance-check backends
//! - [`HttpBalanceProbe`] - The real HTTP implementation
//!
//! A probe never returns an error to its caller: transport failures,
//! non-success statuses, and malformed bodies all collapse to
//! [`ProbeOutcome::Invalid`]. The distinction between those failure modes
//! exists only internally (as [`ProbeError`]) for logging.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Default balance-check endpoint.
pub const DEFAULT_BALANCE_URL: &str = "https://api.stability.ai/v1/user/balance";

/// Result of probing a single key.
///
/// `Valid` means the endpoint returned a well-formed balance; the credits
/// may still be zero or negative, in which case the key is well-formed but
/// unusable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeOutcome {
    /// A well-formed balance response was received.
    Valid { credits: f64 },

    /// The probe failed; nothing is known about the key's balance.
    Invalid,
}

impl ProbeOutcome {
    /// Whether the probed key can authorize a request right now.
    ///
    /// Requires a well-formed response with strictly positive credits.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Valid { credits } if *credits > 0.0)
    }
}

/// Internal error type for a failed balance request.
///
/// Collapsed to [`ProbeOutcome::Invalid`] at the trait boundary; callers of
/// [`BalanceProbe::probe`] never see it.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The request could not be sent or the response body not read.
    #[error("balance request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("balance endpoint returned {status}")]
    Status { status: reqwest::StatusCode },

    /// The response body was not the expected JSON shape.
    #[error("malformed balance body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

/// Abstraction over balance-check backends.
///
/// The rotator is generic over this trait so its policy can be exercised
/// without a network.
#[async_trait]
pub trait BalanceProbe: Send + Sync {
    /// Check the usable balance of a single key.
    async fn probe(&self, secret: &str) -> ProbeOutcome;
}

/// Balance probe backed by the remote billing endpoint.
///
/// Issues a `GET` with bearer-token authorization; the success body is JSON
/// carrying a numeric `credits` field.
#[derive(Debug, Clone)]
pub struct HttpBalanceProbe {
    client: reqwest::Client,
    endpoint: String,
}

/// Success body of the balance endpoint.
#[derive(Debug, Deserialize)]
struct BalanceResponse {
    credits: f64,
}

impl HttpBalanceProbe {
    /// Create a probe against a custom endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    async fn fetch_credits(&self, secret: &str) -> Result<f64, ProbeError> {
        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(secret)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status { status });
        }

        let body: BalanceResponse = serde_json::from_slice(&response.bytes().await?)?;
        Ok(body.credits)
    }
}

impl Default for HttpBalanceProbe {
    fn default() -> Self {
        Self::new(DEFAULT_BALANCE_URL)
    }
}

#[async_trait]
impl BalanceProbe for HttpBalanceProbe {
    async fn probe(&self, secret: &str) -> ProbeOutcome {
        match self.fetch_credits(secret).await {
            Ok(credits) => ProbeOutcome::Valid { credits },
            Err(e) => {
                tracing::debug!("balance probe failed: {}", e);
                ProbeOutcome::Invalid
            }
        }
    }
}
