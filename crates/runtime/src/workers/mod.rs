//! Worker tasks that back the runtime orchestration.
//!
//! The auto-combat worker executes one tick per scheduled job; the scheduler
//! decides what happens next from the returned outcome.

mod auto_combat;

pub use auto_combat::AutoCombatWorker;
