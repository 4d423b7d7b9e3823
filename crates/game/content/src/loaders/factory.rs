//! Content factory for building catalogs from data files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use combat_core::{CombatConfig, MapDefinition, MonsterTemplate, SkillDefinition};

use crate::loaders::{ConfigLoader, LoadResult, MapLoader, MonsterLoader, SkillLoader};

/// Everything loaded from one data directory.
#[derive(Clone, Debug)]
pub struct ContentBundle {
    pub config: CombatConfig,
    pub monsters: Vec<MonsterTemplate>,
    pub skills: Vec<SkillDefinition>,
    pub maps: Vec<MapDefinition>,
}

impl ContentBundle {
    /// Cross-file checks: every map pool entry names a known template, and
    /// every map can roll at least one active template.
    pub fn validate(&self) -> LoadResult<()> {
        let active: HashSet<_> = self
            .monsters
            .iter()
            .filter(|t| t.active)
            .map(|t| t.id)
            .collect();
        let known: HashSet<_> = self.monsters.iter().map(|t| t.id).collect();

        for map in &self.maps {
            if let Some(missing) = map.monster_pool.iter().find(|id| !known.contains(id)) {
                anyhow::bail!("Map {} references unknown {}", map.id, missing);
            }
            if !map.monster_pool.iter().any(|id| active.contains(id)) {
                anyhow::bail!("Map {} has no active monster templates", map.id);
            }
        }
        Ok(())
    }
}

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// ├── monsters.ron
/// ├── skills.ron
/// └── maps.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the content shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load combat balance from `combat.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("combat.toml"))
    }

    /// Load monster templates from `monsters.ron`.
    pub fn load_monsters(&self) -> LoadResult<Vec<MonsterTemplate>> {
        MonsterLoader::load(&self.data_dir.join("monsters.ron"))
    }

    /// Load skill definitions from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<Vec<SkillDefinition>> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load encounter tables from `maps.ron`.
    pub fn load_maps(&self) -> LoadResult<Vec<MapDefinition>> {
        MapLoader::load(&self.data_dir.join("maps.ron"))
    }

    /// Load and cross-check every content file.
    pub fn load_all(&self) -> LoadResult<ContentBundle> {
        let bundle = ContentBundle {
            config: self.load_config()?,
            monsters: self.load_monsters()?,
            skills: self.load_skills()?,
            maps: self.load_maps()?,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
