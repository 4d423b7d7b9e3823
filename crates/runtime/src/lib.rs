//! Runtime orchestration for the combat engine.
//!
//! This crate wires the pure combat rules of `combat-core` to storage,
//! scheduling and event delivery. Consumers build a [`CombatRuntime`], drive
//! combat through [`CombatService`] and subscribe to per-character
//! [`CombatEvent`]s.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the service and the types downstream clients interact with
//! - [`events`] provides the per-character event bus
//! - [`scheduler`] runs auto-combat ticks on a delay with a hard timeout
//! - [`store`] holds the session record and the manual rate limiter
//! - [`handlers`] cleans up after disconnects and timed-out ticks
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
pub mod api;
pub mod config;
pub mod events;
pub mod handlers;
pub mod oracle;
pub mod repository;
pub mod runtime;
pub mod scheduler;
pub mod store;

mod context;
mod workers;

pub use api::{CombatService, Result, RoundReport, RuntimeError, UserId};
pub use config::RuntimeConfig;
pub use events::{
    Broadcaster, CombatEvent, CombatUpdate, EncounterAppeared, EventBus, LevelUpNotice,
    LootDropped,
};
pub use handlers::SessionJanitor;
pub use oracle::{MapOracleImpl, MonsterOracleImpl, OracleManager, SkillOracleImpl};
pub use repository::{CharacterRepository, InMemoryCharacterRepo, RepositoryError};
pub use runtime::{CombatRuntime, CombatRuntimeBuilder};
pub use scheduler::{
    AutoCombatJob, JobHandler, JobScheduler, SchedulerError, StopReason, TickOutcome,
    TimeoutWatchdog, TokioScheduler,
};
pub use store::{
    AutoCombatSession, AutoCombatSessions, CombatRateLimiter, InMemoryKeyValueStore,
    InMemoryRateLimitStore, KeyValueStore, RateDecision, RateLimitStore, StoreError,
};
pub use workers::AutoCombatWorker;
