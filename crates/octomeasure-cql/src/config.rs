//! Oracle configuration

use serde::{Deserialize, Serialize};

/// Configuration for the ELM oracle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CqlConfig {
    /// Cache parsed ELM libraries between validations
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,

    /// Parsed library cache capacity
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for CqlConfig {
    fn default() -> Self {
        Self {
            cache_enabled: default_cache_enabled(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_capacity() -> usize {
    256
}
