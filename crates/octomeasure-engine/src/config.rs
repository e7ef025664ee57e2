//! Engine configuration

use crate::population_template::PopulationTemplates;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Group edits allowed for users the measure is shared with, not just the owner
    #[serde(default = "default_allow_shared_edits")]
    pub allow_shared_edits: bool,

    #[serde(default)]
    pub population_templates: PopulationTemplates,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allow_shared_edits: default_allow_shared_edits(),
            population_templates: PopulationTemplates::default(),
        }
    }
}

fn default_allow_shared_edits() -> bool {
    true
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.population_templates.validate()
    }
}
