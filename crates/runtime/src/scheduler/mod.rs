//! Delayed job execution for auto-combat ticks.
//!
//! A tick is an explicit state machine step: the [`JobHandler`] runs one
//! round and reports a [`TickOutcome`]; only the scheduler turns
//! [`TickOutcome::Continue`] into the next dispatch. Each character therefore
//! has at most one pending tick, and ticks for one character run strictly in
//! sequence.
mod dispatcher;

use std::time::Duration;

use async_trait::async_trait;
use combat_core::{CharacterId, SkillId};
use thiserror::Error;

pub use dispatcher::{SchedulerConfig, TokioScheduler};

/// One auto-combat tick request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoCombatJob {
    pub character_id: CharacterId,
    /// Session generation this loop belongs to; a restarted session gets a
    /// new one, so ticks of the old loop end themselves.
    pub generation: u64,
    /// Skills requested for this tick only. Empty means "use the session
    /// loadout".
    pub skill_ids: Vec<SkillId>,
}

impl AutoCombatJob {
    pub fn new(character_id: CharacterId, generation: u64, skill_ids: Vec<SkillId>) -> Self {
        Self {
            character_id,
            generation,
            skill_ids,
        }
    }

    /// The next tick of the same loop, with an empty immediate skill list.
    pub fn follow_up(&self) -> Self {
        Self::new(self.character_id, self.generation, Vec::new())
    }
}

/// Why a session ended on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    Victory,
    Defeat,
    /// Validation or infrastructure failure; the message is broadcast.
    Error(String),
    /// The character no longer exists.
    CharacterMissing,
}

/// Result of one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Session still active; schedule the next tick.
    Continue,
    /// Session deleted by the tick itself.
    Stopped(StopReason),
    /// Session was gone (or replaced) before or during the tick.
    Cancelled,
}

/// Executes one tick.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn run(&self, job: AutoCombatJob) -> TickOutcome;
}

/// Cleanup hook for ticks that exceeded their hard timeout.
#[async_trait]
pub trait TimeoutWatchdog: Send + Sync {
    async fn on_timeout(&self, job: &AutoCombatJob);
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("job scheduler has shut down")]
    Closed,
}

/// Queue for auto-combat ticks.
#[async_trait]
pub trait JobScheduler: Send + Sync {
    /// Run `job` after `delay`.
    async fn dispatch_after(&self, job: AutoCombatJob, delay: Duration)
    -> Result<(), SchedulerError>;

    /// Run `job` as soon as possible.
    async fn dispatch(&self, job: AutoCombatJob) -> Result<(), SchedulerError> {
        self.dispatch_after(job, Duration::ZERO).await
    }
}
