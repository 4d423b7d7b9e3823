//! Skill definition loader.

use std::path::Path;

use combat_core::SkillDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique_ids, read_file};

/// Skill book structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillBook {
    pub skills: Vec<SkillDefinition>,
}

/// Loader for skill definitions from RON files.
pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SkillDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<SkillDefinition>> {
        let book: SkillBook = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill book RON: {}", e))?;

        ensure_unique_ids("skill", &book.skills, |s| s.id)?;
        for skill in &book.skills {
            if skill.damage_multiplier < 0.0 {
                anyhow::bail!(
                    "Skill {} has negative damage multiplier {}",
                    skill.id,
                    skill.damage_multiplier
                );
            }
        }

        Ok(book.skills)
    }
}
