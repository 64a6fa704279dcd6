use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::style::Style;

/// Declared category of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Url,
    Choice,
    Email,
    /// Homogeneous list of scalars described by `child`.
    List,
    /// Nested object described by `children`.
    Nested,
    /// Repeated nested object described by `children`.
    NestedList,
    File,
    Regex,
}

impl FieldKind {
    /// Nested object or list-of-object kinds, which recurse into `children`.
    pub fn is_nested(self) -> bool {
        matches!(self, FieldKind::Nested | FieldKind::NestedList)
    }

    pub fn is_repeated(self) -> bool {
        matches!(self, FieldKind::NestedList)
    }
}

/// Validation rule attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validator {
    MaxLength { limit: u64 },
    MinLength { limit: u64 },
    Maximum { limit: Number },
    Minimum { limit: Number },
    Pattern { regex: String },
    /// Application-specific rule surfaced to the UI as `{code, message}`.
    Custom { code: String, message: String },
}

/// One field, or nested group of fields, of a form definition.
///
/// A root node is a `nested` or `nested_list` node; its `children` are keyed
/// by field name in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldNode {
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Source-type name of a nested node, used for its title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub allow_null: bool,
    #[serde(default)]
    pub allow_empty: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Ordered `(value, display name)` pairs of a choice field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<(Value, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<Box<FieldNode>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub children: IndexMap<String, FieldNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
    #[serde(default, skip_serializing_if = "Style::is_empty")]
    pub style: Style,
}

impl FieldNode {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            label: None,
            help: None,
            type_name: None,
            required: false,
            read_only: false,
            allow_null: false,
            allow_empty: false,
            default: None,
            choices: Vec::new(),
            child: None,
            children: IndexMap::new(),
            validators: Vec::new(),
            style: Style::new(),
        }
    }

    /// Nested object node named after its source type.
    pub fn nested(type_name: impl Into<String>) -> Self {
        Self::new(FieldKind::Nested).type_name(type_name)
    }

    /// Repeated nested object node named after its element type.
    pub fn nested_list(type_name: impl Into<String>) -> Self {
        Self::new(FieldKind::NestedList).type_name(type_name)
    }

    /// List of scalars described by `child`.
    pub fn list_of(child: FieldNode) -> Self {
        let mut node = Self::new(FieldKind::List);
        node.child = Some(Box::new(child));
        node
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn allow_null(mut self) -> Self {
        self.allow_null = true;
        self
    }

    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn choice(mut self, value: Value, display: impl Into<String>) -> Self {
        self.choices.push((value, display.into()));
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn style(mut self, key: impl Into<String>, value: Value) -> Self {
        self.style.insert(key, value);
        self
    }

    pub fn field(mut self, name: impl Into<String>, field: FieldNode) -> Self {
        self.children.insert(name.into(), field);
        self
    }

    /// A nested list node is optional when it may be empty, absent or null.
    pub fn is_optional(&self) -> bool {
        self.allow_empty || !self.required || self.allow_null
    }

    /// Custom validators in declaration order.
    pub fn custom_validators(&self) -> impl Iterator<Item = (&str, &str)> {
        self.validators.iter().filter_map(|validator| match validator {
            Validator::Custom { code, message } => Some((code.as_str(), message.as_str())),
            _ => None,
        })
    }

    /// Copy of this tree with every read-only field removed.
    pub fn without_read_only(&self) -> FieldNode {
        let mut node = self.clone();
        node.children = self
            .children
            .iter()
            .filter(|(_, field)| !field.read_only)
            .map(|(name, field)| (name.clone(), field.without_read_only()))
            .collect();
        node
    }
}
