//! Skill definitions implementing [`combat_core::SkillOracle`].
use std::collections::HashMap;

use combat_core::{SkillDefinition, SkillId, SkillOracle};

#[derive(Default)]
pub struct SkillOracleImpl {
    skills: HashMap<SkillId, SkillDefinition>,
}

impl SkillOracleImpl {
    pub fn from_definitions(skills: impl IntoIterator<Item = SkillDefinition>) -> Self {
        Self {
            skills: skills.into_iter().map(|skill| (skill.id, skill)).collect(),
        }
    }
}

impl SkillOracle for SkillOracleImpl {
    fn skill(&self, id: SkillId) -> Option<&SkillDefinition> {
        self.skills.get(&id)
    }
}
