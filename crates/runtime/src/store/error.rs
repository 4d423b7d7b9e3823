//! Errors raised by shared stores.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock was poisoned")]
    LockPoisoned,

    #[error("stored value under {key} is not valid JSON")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("compare-and-swap on {key} kept conflicting after {attempts} attempts")]
    Contention { key: String, attempts: u32 },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
