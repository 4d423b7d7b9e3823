//! Combat rules and data types shared by the runtime and offline tools.
//!
//! `combat-core` defines the canonical combat model (characters, monsters,
//! skills, equipment) and exposes pure APIs for resolving rounds and turning
//! their outcomes into rewards. Nothing in this crate performs I/O: static
//! content is reached through the oracle traits in [`env`], and randomness is
//! drawn from an injected [`RngOracle`].
//!
//! Modules are organized by responsibility:
//! - [`state`] holds the character aggregate and live monster instances
//! - [`stats`] derives effective combat stats from attributes and equipment
//! - [`env`] declares the read-only content oracles and the RNG seam
//! - [`combat`] resolves rounds and rolls encounters
//! - [`rewards`] applies experience, level-ups, copper and loot
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod rewards;
pub mod state;
pub mod stats;

#[cfg(test)]
mod testing;

pub use combat::{
    CharacterAction, KillRecord, MonsterAction, RoundContext, RoundLog, RoundOutcome,
    calculate_damage, resolve_round, roll_encounter,
};
pub use config::CombatConfig;
pub use env::{
    CombatEnv, LiveRng, MapDefinition, MapOracle, MonsterOracle, RngOracle, SkillDefinition,
    SkillOracle,
};
pub use error::{CombatError, ErrorSeverity};
pub use rewards::{
    ExperienceTable, LevelUp, LootDrop, Rewards, add_experience, distribute_rewards,
    process_death_loot,
};
pub use state::{
    Character, CharacterId, CombatProgress, Difficulty, DropTable, ItemType, LootItem, MapId,
    MonsterId, MonsterInstance, MonsterTemplate, MonsterType, PotionKind, Quality, SkillCooldowns,
    SkillId, TemplateId,
};
pub use stats::{
    Attribute, Attributes, CharacterClass, ClassProfile, CombatStats, EquipmentBonus,
    EquippedItem, StatKey, StatModifier,
};
