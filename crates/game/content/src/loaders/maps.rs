//! Map encounter table loader.

use std::path::Path;

use combat_core::MapDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique_ids, read_file};

/// Map table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapTable {
    pub maps: Vec<MapDefinition>,
}

/// Loader for map encounter tables from RON files.
pub struct MapLoader;

impl MapLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<MapDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses and validates ranges. Pool references are checked by
    /// [`ContentBundle::validate`](crate::ContentBundle::validate).
    pub fn parse(content: &str) -> LoadResult<Vec<MapDefinition>> {
        let table: MapTable = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map table RON: {}", e))?;

        ensure_unique_ids("map", &table.maps, |m| m.id)?;
        for map in &table.maps {
            if map.min_level == 0 || map.min_level > map.max_level {
                anyhow::bail!(
                    "Map {} has invalid level range {}..={}",
                    map.id,
                    map.min_level,
                    map.max_level
                );
            }
            if map.min_pack == 0 || map.min_pack > map.max_pack {
                anyhow::bail!(
                    "Map {} has invalid pack range {}..={}",
                    map.id,
                    map.min_pack,
                    map.max_pack
                );
            }
        }

        Ok(table.maps)
    }
}
