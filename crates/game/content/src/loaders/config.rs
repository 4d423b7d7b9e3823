//! Combat balance configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys left out of the file keep their [`CombatConfig::default`] values.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !(0.0..=1.0).contains(&config.crit_rate_cap) {
            anyhow::bail!("crit_rate_cap {} is outside 0..=1", config.crit_rate_cap);
        }
        if config.potion_hp_share > 100 {
            anyhow::bail!("potion_hp_share {} exceeds 100", config.potion_hp_share);
        }
        if config.max_pack_size == 0 {
            anyhow::bail!("max_pack_size must be at least 1");
        }

        Ok(config)
    }
}
