//! Monster templates implementing [`combat_core::MonsterOracle`].
use std::collections::HashMap;

use combat_core::{MonsterOracle, MonsterTemplate, TemplateId};

/// MonsterOracle implementation over a loaded template catalog
#[derive(Default)]
pub struct MonsterOracleImpl {
    templates: HashMap<TemplateId, MonsterTemplate>,
}

impl MonsterOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_templates(templates: impl IntoIterator<Item = MonsterTemplate>) -> Self {
        let mut oracle = Self::new();
        for template in templates {
            oracle.add_template(template);
        }
        oracle
    }

    /// Add or replace a template
    pub fn add_template(&mut self, template: MonsterTemplate) {
        self.templates.insert(template.id, template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl MonsterOracle for MonsterOracleImpl {
    fn template(&self, id: TemplateId) -> Option<&MonsterTemplate> {
        self.templates.get(&id)
    }
}
