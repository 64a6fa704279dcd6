use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::FieldKind;
use crate::types::{TypeMapEntry, TypeResolver};

/// Default recursion guard for field trees.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Initialization-time engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Extension mappings merged once into the built-in kind table.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub type_map: IndexMap<FieldKind, TypeMapEntry>,
    /// Deepest nesting accepted before derivation is refused.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            type_map: IndexMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<EngineConfig> {
        toml::from_str(content).map_err(|err| Error::InvalidConfig(err.to_string()))
    }

    pub fn resolver(&self) -> TypeResolver {
        TypeResolver::new(&self.type_map)
    }
}
