use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix of style keys that only affect the validation schema.
pub const SCHEMA_PREFIX: &str = "schema:";

/// Dependency directive families understood by the schema builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    Simple,
    Conditional,
    Dynamic,
    Override,
}

impl DependencyKind {
    pub const ALL: [DependencyKind; 4] = [
        DependencyKind::Simple,
        DependencyKind::Conditional,
        DependencyKind::Dynamic,
        DependencyKind::Override,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DependencyKind::Simple => "simple",
            DependencyKind::Conditional => "conditional",
            DependencyKind::Dynamic => "dynamic",
            DependencyKind::Override => "override",
        }
    }
}

/// Style keys with a meaning to one of the builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKey {
    SchemaType,
    SchemaEnum,
    UiWidget,
    UiHelp,
    SchemaOverride,
    UiSchemaOverride,
    ColumnOverride,
    Dependency(DependencyKind),
    Sort,
}

impl StyleKey {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleKey::SchemaType => "schema:type",
            StyleKey::SchemaEnum => "schema:enum",
            StyleKey::UiWidget => "ui:widget",
            StyleKey::UiHelp => "ui:help",
            StyleKey::SchemaOverride => "schema:override",
            StyleKey::UiSchemaOverride => "uiSchema:override",
            StyleKey::ColumnOverride => "column:override",
            StyleKey::Dependency(DependencyKind::Simple) => "schema:dependencies:simple",
            StyleKey::Dependency(DependencyKind::Conditional) => "schema:dependencies:conditional",
            StyleKey::Dependency(DependencyKind::Dynamic) => "schema:dependencies:dynamic",
            StyleKey::Dependency(DependencyKind::Override) => "schema:dependencies:override",
            StyleKey::Sort => "schema:sort",
        }
    }

    /// Classify a raw style key, returning `None` for passthrough keys.
    pub fn parse(key: &str) -> Option<StyleKey> {
        let parsed = match key {
            "schema:type" => StyleKey::SchemaType,
            "schema:enum" => StyleKey::SchemaEnum,
            "ui:widget" => StyleKey::UiWidget,
            "ui:help" => StyleKey::UiHelp,
            "schema:override" => StyleKey::SchemaOverride,
            "uiSchema:override" => StyleKey::UiSchemaOverride,
            "column:override" => StyleKey::ColumnOverride,
            "schema:dependencies:simple" => StyleKey::Dependency(DependencyKind::Simple),
            "schema:dependencies:conditional" => StyleKey::Dependency(DependencyKind::Conditional),
            "schema:dependencies:dynamic" => StyleKey::Dependency(DependencyKind::Dynamic),
            "schema:dependencies:override" => StyleKey::Dependency(DependencyKind::Override),
            "schema:sort" => StyleKey::Sort,
            _ => return None,
        };
        Some(parsed)
    }
}

/// One classified style entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleEntry<'a> {
    Reserved(StyleKey, &'a Value),
    Passthrough(&'a str, &'a Value),
}

/// Open override/extension channel attached to a field or node.
///
/// Entries keep their declaration order. Reserved keys drive type resolution,
/// overrides and dependencies; everything else is passed through to the UI
/// schema unless it carries the `schema:` prefix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Style(IndexMap<String, Value>);

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: StyleKey) -> Option<&Value> {
        self.0.get(key.as_str())
    }

    pub fn get_str(&self, key: StyleKey) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: StyleKey) -> bool {
        self.0.contains_key(key.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = StyleEntry<'_>> {
        self.0.iter().map(|(key, value)| match StyleKey::parse(key) {
            Some(reserved) => StyleEntry::Reserved(reserved, value),
            None => StyleEntry::Passthrough(key.as_str(), value),
        })
    }

    /// Entries merged verbatim into the UI schema.
    pub fn passthrough(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries().filter_map(|entry| match entry {
            StyleEntry::Passthrough(key, value) if !key.starts_with(SCHEMA_PREFIX) => {
                Some((key, value))
            }
            _ => None,
        })
    }

    /// Dependency directives present on this style, in canonical order.
    pub fn dependency_directives(&self) -> Vec<(DependencyKind, &Value)> {
        DependencyKind::ALL
            .iter()
            .filter_map(|kind| {
                self.get(StyleKey::Dependency(*kind))
                    .map(|value| (*kind, value))
            })
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Style {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Style(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reserved_keys_round_trip_through_parse() {
        let keys = [
            StyleKey::SchemaType,
            StyleKey::SchemaEnum,
            StyleKey::UiWidget,
            StyleKey::UiHelp,
            StyleKey::SchemaOverride,
            StyleKey::UiSchemaOverride,
            StyleKey::ColumnOverride,
            StyleKey::Dependency(DependencyKind::Simple),
            StyleKey::Dependency(DependencyKind::Conditional),
            StyleKey::Dependency(DependencyKind::Dynamic),
            StyleKey::Dependency(DependencyKind::Override),
            StyleKey::Sort,
        ];
        for key in keys {
            assert_eq!(StyleKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(StyleKey::parse("ui:placeholder"), None);
    }

    #[test]
    fn passthrough_skips_reserved_and_schema_keys() {
        let style: Style = [
            ("ui:placeholder", json!("Type here")),
            ("schema:custom", json!(true)),
            ("ui:widget", json!("textarea")),
            ("column:override", json!({})),
            ("classNames", json!("wide")),
        ]
        .into_iter()
        .collect();

        let keys: Vec<&str> = style.passthrough().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["ui:placeholder", "classNames"]);
    }

    #[test]
    fn collects_every_dependency_directive() {
        let style: Style = [
            ("schema:dependencies:override", json!({})),
            ("schema:dependencies:simple", json!(["b"])),
        ]
        .into_iter()
        .collect();

        let kinds: Vec<DependencyKind> = style
            .dependency_directives()
            .into_iter()
            .map(|(kind, _)| kind)
            .collect();
        assert_eq!(kinds, vec![DependencyKind::Simple, DependencyKind::Override]);
    }
}
