//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the combat rules, repositories, the shared session
//! store and the job scheduler so callers can map them to responses with
//! consistent context.
use std::time::Duration;

use combat_core::{CharacterId, CombatError, ErrorSeverity};
use thiserror::Error;

pub use crate::repository::RepositoryError;
pub use crate::scheduler::SchedulerError;
pub use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("character {character} not found")]
    CharacterNotFound { character: CharacterId },

    #[error("manual combat for {character} is rate limited, retry in {retry_after:?}")]
    RateLimited {
        character: CharacterId,
        retry_after: Duration,
    },

    #[error("auto-combat is running for {character}")]
    AutoCombatActive { character: CharacterId },

    #[error("auto-combat is already running for {character}")]
    AutoCombatAlreadyRunning { character: CharacterId },

    #[error("auto-combat is not running for {character}")]
    AutoCombatNotRunning { character: CharacterId },

    #[error("character {character} cannot rest while fighting")]
    StillFighting { character: CharacterId },

    #[error("runtime requires combat content (oracles) to be configured")]
    MissingOracles,

    #[error("background worker failed: {0}")]
    WorkerJoin(#[from] tokio::task::JoinError),
}

impl RuntimeError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Combat(err) => err.severity(),
            Self::CharacterNotFound { .. } => ErrorSeverity::NotFound,
            Self::RateLimited { .. }
            | Self::AutoCombatActive { .. }
            | Self::AutoCombatAlreadyRunning { .. }
            | Self::AutoCombatNotRunning { .. }
            | Self::StillFighting { .. } => ErrorSeverity::Validation,
            Self::Repository(_)
            | Self::Store(_)
            | Self::Scheduler(_)
            | Self::MissingOracles
            | Self::WorkerJoin(_) => ErrorSeverity::Internal,
        }
    }

    /// Errors that end an auto-combat session quietly instead of with an
    /// "auto stopped" broadcast.
    pub fn is_not_found(&self) -> bool {
        self.severity() == ErrorSeverity::NotFound
    }
}
