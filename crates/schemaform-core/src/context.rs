use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::TypeMapEntry;

pub const TYPE_MAP_OVERRIDES_KEY: &str = "type_map_overrides";
pub const LIST_FIELDS_KEY: &str = "list_fields";
pub const LIST_FIELDS_SORT_KEY: &str = "list_fields_sort";

/// Default sort direction of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascend,
    Descend,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascend => "ascend",
            SortOrder::Descend => "descend",
        }
    }

    /// Parse a sort directive, naming `field` in the error.
    pub fn parse(field: &str, value: &Value) -> Result<SortOrder> {
        match value.as_str() {
            Some("ascend") => Ok(SortOrder::Ascend),
            Some("descend") => Ok(SortOrder::Descend),
            _ => Err(Error::InvalidSortOrder {
                field: field.to_string(),
                value: match value {
                    Value::String(raw) => raw.clone(),
                    other => other.to_string(),
                },
            }),
        }
    }
}

/// Request-scoped options threaded through every builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderContext {
    /// Type mappings keyed by dotted field path.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub type_map_overrides: IndexMap<String, TypeMapEntry>,
    /// Dotted paths of the leaf columns to emit; empty emits every column.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub list_fields: Vec<String>,
    /// Default sort direction keyed by dotted path.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub list_fields_sort: IndexMap<String, SortOrder>,
}

impl RenderContext {
    /// Build a context from an untyped caller document.
    ///
    /// Unknown keys are ignored so a caller can hand over its whole request
    /// context.
    pub fn from_value(value: &Value) -> Result<RenderContext> {
        let object = match value {
            Value::Null => return Ok(RenderContext::default()),
            Value::Object(object) => object,
            other => {
                return Err(Error::InvalidContext(format!(
                    "expected an object, got {other}"
                )));
            }
        };

        let mut context = RenderContext::default();

        if let Some(overrides) = object.get(TYPE_MAP_OVERRIDES_KEY) {
            context.type_map_overrides = serde_json::from_value(overrides.clone())
                .map_err(|err| Error::InvalidContext(format!("{TYPE_MAP_OVERRIDES_KEY}: {err}")))?;
        }

        match object.get(LIST_FIELDS_KEY) {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => {
                for item in items {
                    match item {
                        Value::String(name) => context.list_fields.push(name.clone()),
                        other => return Err(Error::InvalidListFields(other.to_string())),
                    }
                }
            }
            Some(other) => return Err(Error::InvalidListFields(other.to_string())),
        }

        match object.get(LIST_FIELDS_SORT_KEY) {
            None | Some(Value::Null) => {}
            Some(Value::Object(sort)) => {
                for (path, order) in sort {
                    let order = SortOrder::parse(path, order)?;
                    context.list_fields_sort.insert(path.clone(), order);
                }
            }
            Some(other) => {
                return Err(Error::InvalidContext(format!(
                    "{LIST_FIELDS_SORT_KEY} must be an object, got {other}"
                )));
            }
        }

        context.validate()?;
        Ok(context)
    }

    /// Check that every sort key is listed when an allow-list is in use.
    pub fn validate(&self) -> Result<()> {
        if self.list_fields.is_empty() {
            return Ok(());
        }
        match self
            .list_fields_sort
            .keys()
            .find(|path| !self.list_fields.contains(*path))
        {
            Some(path) => Err(Error::SortFieldNotListed(path.clone())),
            None => Ok(()),
        }
    }

    /// Whether the leaf column at `path` passes the allow-list.
    pub fn lists(&self, path: &str) -> bool {
        self.list_fields.is_empty() || self.list_fields.iter().any(|listed| listed == path)
    }
}
