//! Manual combat rate limiting.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use combat_core::CharacterId;
use tokio::time::Instant;

use super::{StoreError, StoreResult};
use crate::api::UserId;

/// Result of a rate-limited hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after: Duration },
}

/// Fixed-window hit store: one accepted hit per key per window.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Records a hit when `key` is outside its window; a limited hit records
    /// nothing.
    async fn hit(&self, key: &str, window: Duration) -> StoreResult<RateDecision>;

    /// Time until `key` accepts another hit; zero when it already does.
    async fn available_in(&self, key: &str) -> StoreResult<Duration>;
}

/// In-memory RateLimitStore keyed on tokio's clock.
#[derive(Default)]
pub struct InMemoryRateLimitStore {
    expires_at: Mutex<HashMap<String, Instant>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn hit(&self, key: &str, window: Duration) -> StoreResult<RateDecision> {
        let now = Instant::now();
        let mut expires_at = self
            .expires_at
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;

        if let Some(expiry) = expires_at.get(key)
            && *expiry > now
        {
            return Ok(RateDecision::Limited {
                retry_after: *expiry - now,
            });
        }

        expires_at.insert(key.to_owned(), now + window);
        Ok(RateDecision::Allowed)
    }

    async fn available_in(&self, key: &str) -> StoreResult<Duration> {
        let now = Instant::now();
        let expires_at = self
            .expires_at
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(expires_at
            .get(key)
            .map(|expiry| expiry.saturating_duration_since(now))
            .unwrap_or_default())
    }
}

/// At most one manual combat request per window per (user, character).
#[derive(Clone)]
pub struct CombatRateLimiter {
    store: Arc<dyn RateLimitStore>,
    window: Duration,
}

impl CombatRateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, window: Duration) -> Self {
        Self { store, window }
    }

    fn key(user: UserId, character: CharacterId) -> String {
        format!("combat_rate:{}:{}", user.0, character.0)
    }

    pub async fn check(&self, user: UserId, character: CharacterId) -> StoreResult<RateDecision> {
        self.store.hit(&Self::key(user, character), self.window).await
    }

    pub async fn available_in(&self, user: UserId, character: CharacterId) -> StoreResult<Duration> {
        self.store.available_in(&Self::key(user, character)).await
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
