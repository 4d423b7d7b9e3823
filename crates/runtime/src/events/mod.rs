//! Client-facing combat events and their delivery.
//!
//! The simulation never publishes directly: services and workers hand events
//! to a [`Broadcaster`] after state has been persisted. Delivery is
//! best-effort and never rolls back or blocks a state change.
mod bus;
mod types;

pub use bus::{Broadcaster, EventBus};
pub use types::{CombatEvent, CombatUpdate, EncounterAppeared, LevelUpNotice, LootDropped};
