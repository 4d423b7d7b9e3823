//! Stat system.
//!
//! ```text
//! [ Attributes + Class ] ──┐
//!                          ├──> CombatStats (attack, defense, crit, max HP/mana)
//! [ Equipment bonus ] ─────┘
//! ```
//!
//! Only attributes, level and current resources are persisted; maximums and
//! combat values are recomputed whenever they are needed.

pub mod attributes;
pub mod derived;
pub mod equipment;

pub use attributes::{Attribute, Attributes, CharacterClass, ClassProfile};
pub use derived::CombatStats;
pub use equipment::{EquipmentBonus, EquippedItem, StatKey, StatModifier};
