//! Monster template catalog loader.

use std::path::Path;

use combat_core::MonsterTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique_ids, read_file};

/// Monster catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterCatalog {
    pub templates: Vec<MonsterTemplate>,
}

/// Loader for monster templates from RON files.
pub struct MonsterLoader;

impl MonsterLoader {
    /// Load monster templates from a RON file.
    ///
    /// Templates that omit `active` are active. Duplicate ids and templates
    /// at level 0 are rejected.
    pub fn load(path: &Path) -> LoadResult<Vec<MonsterTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<MonsterTemplate>> {
        let catalog: MonsterCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse monster catalog RON: {}", e))?;

        ensure_unique_ids("monster template", &catalog.templates, |t| t.id)?;
        for template in &catalog.templates {
            if template.level == 0 {
                anyhow::bail!("Monster template {} has level 0", template.id);
            }
            let drops = &template.drops;
            for chance in [drops.potion_chance, drops.item_chance] {
                if !(0.0..=1.0).contains(&chance) {
                    anyhow::bail!(
                        "Monster template {} has drop chance {} outside 0..=1",
                        template.id,
                        chance
                    );
                }
            }
        }

        Ok(catalog.templates)
    }
}
