//! Multi-key rotation with cached balance validation.
//!
//! This module provides [`KeyRotator`], which owns a fixed, ordered pool of
//! image-API keys and hands out one that is usable *right now*. The pool
//! membership never changes after construction; only each entry's cached
//! credits and the current-key cursor mutate.
//!
//! # Rotation policy
//!
//! [`KeyRotator::current_key`] always re-validates the key under the cursor
//! first. If it is usable it is returned and the cursor stays put. Otherwise
//! a single forward sweep over the rest of the pool (in seed order, skipping
//! the cursor position) finds the first usable key; the cursor moves onto it
//! only then. A sweep that finds nothing leaves the cursor untouched.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() {
//! use mindmeld_core::{HttpBalanceProbe, KeyRotator};
//!
//! let rotator = KeyRotator::new(
//!     ["sk-first", "sk-second"],
//!     HttpBalanceProbe::default(),
//! );
//!
//! if let Some(key) = rotator.current_key().await {
//!     // Authorize an outbound request with key.expose()
//! }
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::balance::{BalanceProbe, ProbeOutcome};
use crate::secret::ApiKey;

/// Sentinel cached-credits value meaning "never successfully checked".
///
/// Only a well-formed balance response overwrites it.
pub const UNKNOWN_CREDITS: f64 = -1.0;

/// One pool entry: the secret plus its cached balance measurement.
#[derive(Debug)]
struct KeyState {
    secret: ApiKey,
    credits: f64,
    checked_at: Option<DateTime<Utc>>,
}

impl KeyState {
    fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: ApiKey::new(secret),
            credits: UNKNOWN_CREDITS,
            checked_at: None,
        }
    }

    fn is_usable(&self) -> bool {
        self.credits > 0.0
    }
}

/// Pool contents and cursor, guarded as one unit so a probe result and the
/// cursor move it justifies are applied together.
#[derive(Debug)]
struct PoolState {
    keys: Vec<KeyState>,
    current: usize,
}

/// Read-only report row for a single pool entry.
///
/// The key is masked; `credits` is `None` while the entry has never been
/// successfully checked.
#[derive(Debug, Clone, Serialize)]
pub struct KeyStatus {
    pub key: String,
    pub credits: Option<f64>,
    pub checked_at: Option<DateTime<Utc>>,
}

/// Rotating pool of image-API keys.
///
/// Generic over the [`BalanceProbe`] backend so the rotation policy can be
/// tested without a network.
///
/// All operations are total: pool exhaustion and probe failures surface as
/// `None` or non-positive balances, never as errors.
pub struct KeyRotator<P: BalanceProbe> {
    probe: P,
    state: Mutex<PoolState>,
}

impl<P: BalanceProbe> KeyRotator<P> {
    /// Create a rotator over an ordered list of key secrets.
    ///
    /// The pool may be empty, in which case no key is ever returned.
    pub fn new(secrets: impl IntoIterator<Item = impl Into<String>>, probe: P) -> Self {
        let keys = secrets.into_iter().map(KeyState::new).collect();
        Self {
            probe,
            state: Mutex::new(PoolState { keys, current: 0 }),
        }
    }

    /// Get a key that is usable right now, failing over if needed.
    ///
    /// Returns `None` when the pool is empty or no key in it validates.
    /// Each key is probed at most once per call, and every well-formed probe
    /// response updates that key's cached credits.
    pub async fn current_key(&self) -> Option<ApiKey> {
        let mut state = self.state.lock().await;
        if state.keys.is_empty() {
            return None;
        }

        let current = state.current;
        if self.validate(&mut state, current).await {
            return Some(state.keys[current].secret.clone());
        }

        for index in 0..state.keys.len() {
            if index == current {
                continue;
            }
            if self.validate(&mut state, index).await {
                tracing::info!(
                    "rotating from key {} to key {}",
                    current,
                    index
                );
                state.current = index;
                return Some(state.keys[index].secret.clone());
            }
        }

        tracing::warn!("key pool exhausted ({} keys, none usable)", state.keys.len());
        None
    }

    /// Report the cached balance for a known secret.
    ///
    /// An unknown secret reports `0.0`. A known secret that has never been
    /// successfully checked is probed once first; if the probe fails the
    /// report is `0.0` and the cache stays unchecked, so a later call probes
    /// again. Cached values are reported without a remote call, clamped
    /// non-negative.
    pub async fn key_balance(&self, secret: &str) -> f64 {
        let mut state = self.state.lock().await;
        let Some(index) = state.keys.iter().position(|k| k.secret.expose() == secret) else {
            return 0.0;
        };

        if state.keys[index].credits == UNKNOWN_CREDITS {
            self.validate(&mut state, index).await;
        }

        state.keys[index].credits.max(0.0)
    }

    /// Snapshot of the pool with masked secrets, in seed order.
    pub async fn statuses(&self) -> Vec<KeyStatus> {
        let state = self.state.lock().await;
        state
            .keys
            .iter()
            .map(|k| KeyStatus {
                key: k.secret.masked(),
                credits: (k.credits != UNKNOWN_CREDITS).then_some(k.credits),
                checked_at: k.checked_at,
            })
            .collect()
    }

    /// Number of keys in the pool.
    pub async fn len(&self) -> usize {
        self.state.lock().await.keys.len()
    }

    /// Whether the pool was seeded with no keys at all.
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.keys.is_empty()
    }

    /// Probe one entry and fold the outcome into its cache.
    ///
    /// Returns whether the entry is usable. A failed probe leaves the cache
    /// exactly as it was.
    async fn validate(&self, state: &mut PoolState, index: usize) -> bool {
        match self.probe.probe(state.keys[index].secret.expose()).await {
            ProbeOutcome::Valid { credits } => {
                let entry = &mut state.keys[index];
                entry.credits = credits;
                entry.checked_at = Some(Utc::now());
                entry.is_usable()
            }
            ProbeOutcome::Invalid => false,
        }
    }

    #[cfg(test)]
    async fn current_index(&self) -> usize {
        self.state.lock().await.current
    }
}
