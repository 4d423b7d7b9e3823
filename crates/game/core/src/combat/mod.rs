//! Combat resolution.
//!
//! - [`damage`]: the damage and crit formulas shared by both sides
//! - [`round`]: one round between a character and its engaged monsters
//! - [`encounter`]: rolling a fresh pack from the character's map
//!
//! Everything here mutates only the [`Character`](crate::state::Character) it
//! is handed and draws randomness from an injected
//! [`RngOracle`](crate::env::RngOracle).

pub mod damage;
pub mod encounter;
pub mod round;

pub use damage::{apply_critical, apply_damage, calculate_damage};
pub use encounter::roll_encounter;
pub use round::{
    CharacterAction, KillRecord, MonsterAction, RoundContext, RoundLog, RoundOutcome,
    resolve_round,
};
