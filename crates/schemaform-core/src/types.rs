use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::field::{FieldKind, FieldNode};
use crate::style::StyleKey;
use crate::text::data_path;

/// Named enum sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EnumSource {
    /// Take `enum`/`enumNames` from the field's declared choices.
    Choices,
}

/// Where an enum field takes its values from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum EnumSpec {
    Source(EnumSource),
    /// Explicit `[value, display name]` pairs.
    Literal(Vec<(Value, String)>),
}

/// Canonical `{type, enum, widget}` triple for a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TypeMapEntry {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_spec: Option<EnumSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
}

impl TypeMapEntry {
    pub fn of_type(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Self::default()
        }
    }

    pub fn with_widget(mut self, widget: &str) -> Self {
        self.widget = Some(widget.to_string());
        self
    }

    pub fn with_enum(mut self, spec: EnumSpec) -> Self {
        self.enum_spec = Some(spec);
        self
    }

    pub fn is_enum(&self) -> bool {
        self.enum_spec.is_some()
    }

    pub fn widget(&self) -> Option<&str> {
        self.widget.as_deref().filter(|widget| !widget.is_empty())
    }
}

/// Kind-keyed table of type mappings.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMap {
    entries: IndexMap<FieldKind, TypeMapEntry>,
}

impl TypeMap {
    /// Built-in mappings for every kind with a canonical JSON type.
    pub fn builtin() -> Self {
        let entries = [
            (FieldKind::Text, TypeMapEntry::of_type("string")),
            (
                FieldKind::Integer,
                TypeMapEntry::of_type("integer").with_widget("updown"),
            ),
            (
                FieldKind::Float,
                TypeMapEntry::of_type("number").with_widget("updown"),
            ),
            (
                FieldKind::Decimal,
                TypeMapEntry::of_type("number").with_widget("updown"),
            ),
            (FieldKind::Boolean, TypeMapEntry::of_type("boolean")),
            (
                FieldKind::DateTime,
                TypeMapEntry::of_type("string").with_widget("date-time"),
            ),
            (
                FieldKind::Date,
                TypeMapEntry::of_type("string").with_widget("date"),
            ),
            (
                FieldKind::Url,
                TypeMapEntry::of_type("string").with_widget("uri"),
            ),
            (
                FieldKind::Choice,
                TypeMapEntry::of_type("string").with_enum(EnumSpec::Source(EnumSource::Choices)),
            ),
            (
                FieldKind::Email,
                TypeMapEntry::of_type("string").with_widget("email"),
            ),
            (FieldKind::List, TypeMapEntry::of_type("array")),
            (FieldKind::Nested, TypeMapEntry::of_type("object")),
            (FieldKind::NestedList, TypeMapEntry::of_type("array")),
        ];
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Merge extension mappings, replacing built-ins for matching kinds.
    pub fn extend(&mut self, extensions: &IndexMap<FieldKind, TypeMapEntry>) {
        for (kind, entry) in extensions {
            self.entries.insert(*kind, entry.clone());
        }
    }

    pub fn get(&self, kind: FieldKind) -> Option<&TypeMapEntry> {
        self.entries.get(&kind)
    }
}

impl Default for TypeMap {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Resolves a field to its `{type, enum, widget}` triple.
///
/// Priority, highest first: a dotted-path override entry (replaces the whole
/// triple), then the field's `schema:type` / `schema:enum` / `ui:widget`
/// style entries (each independently), then the kind table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeResolver {
    map: TypeMap,
}

impl TypeResolver {
    pub fn new(extensions: &IndexMap<FieldKind, TypeMapEntry>) -> Self {
        let mut map = TypeMap::builtin();
        map.extend(extensions);
        Self { map }
    }

    pub fn resolve(
        &self,
        field: &FieldNode,
        path: &str,
        overrides: &IndexMap<String, TypeMapEntry>,
    ) -> TypeMapEntry {
        if !path.is_empty() {
            if let Some(entry) = overrides.get(path) {
                return entry.clone();
            }
        }

        let mut entry = self.map.get(field.kind).cloned().unwrap_or_default();
        if let Some(schema_type) = field.style.get_str(StyleKey::SchemaType) {
            entry.schema_type = Some(schema_type.to_string());
        }
        if let Some(value) = field.style.get(StyleKey::SchemaEnum) {
            match serde_json::from_value::<EnumSpec>(value.clone()) {
                Ok(spec) => entry.enum_spec = Some(spec),
                Err(err) => debug!(path = %path, error = %err, "ignoring malformed schema:enum"),
            }
        }
        if let Some(widget) = field.style.get_str(StyleKey::UiWidget) {
            entry.widget = Some(widget.to_string());
        }
        entry
    }

    /// True when every field of a node renders hidden, including a node
    /// with no fields at all.
    pub fn is_hidden_node(
        &self,
        node: &FieldNode,
        prefix: &str,
        overrides: &IndexMap<String, TypeMapEntry>,
    ) -> bool {
        node.children.iter().all(|(name, field)| {
            self.resolve(field, &data_path(prefix, name), overrides)
                .widget()
                == Some("hidden")
        })
    }
}
