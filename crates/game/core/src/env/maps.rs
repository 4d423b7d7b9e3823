//! Map encounter tables.
use crate::state::{MapId, TemplateId};

/// Encounter parameters for one map.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDefinition {
    pub id: MapId,
    pub name: String,
    pub min_level: u32,
    pub max_level: u32,
    pub monster_pool: Vec<TemplateId>,
    pub min_pack: u32,
    pub max_pack: u32,
}

/// Oracle providing map encounter tables by id.
pub trait MapOracle: Send + Sync {
    fn map(&self, id: MapId) -> Option<&MapDefinition>;
}
