//! Runtime wrappers around static combat content.
//!
//! These implementations expose `combat-core` oracle traits and bundle them
//! into an [`OracleManager`] so workers and services can build
//! [`CombatEnv`] views on demand. The data is immutable at runtime; dynamic
//! state lives in repositories and the session store.
mod maps;
mod monsters;
mod skills;

use std::sync::Arc;

use combat_content::ContentBundle;
use combat_core::{CombatConfig, CombatEnv};

pub use maps::MapOracleImpl;
pub use monsters::MonsterOracleImpl;
pub use skills::SkillOracleImpl;

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) monsters: Arc<MonsterOracleImpl>,
    pub(crate) skills: Arc<SkillOracleImpl>,
    pub(crate) maps: Arc<MapOracleImpl>,
    pub(crate) config: Arc<CombatConfig>,
}

impl OracleManager {
    pub fn new(
        monsters: Arc<MonsterOracleImpl>,
        skills: Arc<SkillOracleImpl>,
        maps: Arc<MapOracleImpl>,
        config: Arc<CombatConfig>,
    ) -> Self {
        Self {
            monsters,
            skills,
            maps,
            config,
        }
    }

    /// Builds every oracle from loaded content.
    pub fn from_bundle(bundle: ContentBundle) -> Self {
        Self::new(
            Arc::new(MonsterOracleImpl::from_templates(bundle.monsters)),
            Arc::new(SkillOracleImpl::from_definitions(bundle.skills)),
            Arc::new(MapOracleImpl::from_definitions(bundle.maps)),
            Arc::new(bundle.config),
        )
    }

    /// Borrowed view for the combat rules.
    pub fn as_env(&self) -> CombatEnv<'_> {
        CombatEnv::new(
            self.monsters.as_ref(),
            self.skills.as_ref(),
            self.maps.as_ref(),
            self.config.as_ref(),
        )
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }
}
