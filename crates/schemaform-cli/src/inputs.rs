use std::fs;
use std::path::Path;

use serde_json::Value;

use schemaform_core::{EngineConfig, FieldNode, RenderContext};

use crate::CliError;

pub fn load_field_tree(path: &Path) -> Result<FieldNode, CliError> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Missing context means the empty context.
pub fn load_context(path: Option<&Path>) -> Result<RenderContext, CliError> {
    let Some(path) = path else {
        return Ok(RenderContext::default());
    };
    let content = read(path)?;
    let value: Value = serde_json::from_str(&content).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(RenderContext::from_value(&value)?)
}

pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, CliError> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let content = read(path)?;
    Ok(EngineConfig::from_toml_str(&content)?)
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
