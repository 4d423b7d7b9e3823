//! Shared key-value state used for cross-task coordination.
//!
//! - [`KeyValueStore`] is the string store boundary (Redis-like semantics)
//! - [`AutoCombatSessions`] keeps the per-character auto-combat session on top
//!   of it; the key's presence is the single-slot mutex
//! - [`RateLimitStore`] and [`CombatRateLimiter`] bound manual combat
mod error;
mod kv;
mod rate_limit;
mod session;

pub use error::{StoreError, StoreResult};
pub use kv::{InMemoryKeyValueStore, KeyValueStore};
pub use rate_limit::{CombatRateLimiter, InMemoryRateLimitStore, RateDecision, RateLimitStore};
pub use session::{AutoCombatSession, AutoCombatSessions};
