//! Monster template catalog interface.
use crate::state::{MonsterTemplate, TemplateId};

/// Oracle providing monster templates by id.
///
/// Runtime systems implement this over catalogs loaded from content files.
pub trait MonsterOracle: Send + Sync {
    fn template(&self, id: TemplateId) -> Option<&MonsterTemplate>;
}
