//! Encounter tables implementing [`combat_core::MapOracle`].
use std::collections::HashMap;

use combat_core::{MapDefinition, MapId, MapOracle};

#[derive(Default)]
pub struct MapOracleImpl {
    maps: HashMap<MapId, MapDefinition>,
}

impl MapOracleImpl {
    pub fn from_definitions(maps: impl IntoIterator<Item = MapDefinition>) -> Self {
        Self {
            maps: maps.into_iter().map(|map| (map.id, map)).collect(),
        }
    }
}

impl MapOracle for MapOracleImpl {
    fn map(&self, id: MapId) -> Option<&MapDefinition> {
        self.maps.get(&id)
    }
}
