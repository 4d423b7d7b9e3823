//! Canonical combat state types.
//!
//! The character aggregate ([`Character`]) is the unit of persistence. Monster
//! instances, loot and skill cooldowns are owned by it and only travel with it.

mod character;
mod common;
mod item;
mod monster;

pub use character::{Character, CombatProgress, SkillCooldowns};
pub use common::{CharacterId, Difficulty, MapId, MonsterId, SkillId, TemplateId};
pub use item::{LootItem, PotionKind, Quality};
pub use monster::{DropTable, ItemType, MonsterInstance, MonsterTemplate, MonsterType};
