//! Traits describing read-only combat content.
//!
//! Oracles expose monster templates, skill definitions and map encounter
//! tables. [`CombatEnv`] bundles them with the balance config so round
//! resolution and encounter rolling can reach everything they need without
//! coupling to concrete catalogs.
mod maps;
mod monsters;
mod rng;
mod skills;

pub use maps::{MapDefinition, MapOracle};
pub use monsters::MonsterOracle;
pub use rng::{LiveRng, RngOracle};
pub use skills::{SkillDefinition, SkillOracle};

use crate::config::CombatConfig;

/// Aggregates read-only oracles required by the combat rules.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    pub monsters: &'a dyn MonsterOracle,
    pub skills: &'a dyn SkillOracle,
    pub maps: &'a dyn MapOracle,
    pub config: &'a CombatConfig,
}

impl<'a> CombatEnv<'a> {
    pub fn new(
        monsters: &'a dyn MonsterOracle,
        skills: &'a dyn SkillOracle,
        maps: &'a dyn MapOracle,
        config: &'a CombatConfig,
    ) -> Self {
        Self {
            monsters,
            skills,
            maps,
            config,
        }
    }
}
