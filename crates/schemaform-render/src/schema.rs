use serde_json::{Map, Value, json};
use tracing::debug;

use schemaform_core::text::{data_path, field_title, type_title};
use schemaform_core::{
    EnumSource, EnumSpec, FieldKind, FieldNode, RenderContext, Result, StyleKey, TypeResolver,
    Validator,
};

use crate::dependencies::resolve_dependencies;

/// Derives the JSON-Schema-like validation schema of a field tree.
#[derive(Debug, Clone, Copy)]
pub struct SchemaBuilder<'a> {
    resolver: &'a TypeResolver,
    context: &'a RenderContext,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(resolver: &'a TypeResolver, context: &'a RenderContext) -> Self {
        Self { resolver, context }
    }

    /// Derive the schema of a nested (or nested list) node at `prefix`.
    pub fn derive(&self, node: &FieldNode, prefix: &str) -> Result<Value> {
        debug!(path = %prefix, fields = node.children.len(), "deriving schema");

        let title = self.node_title(node, prefix);
        let mut object = Map::new();
        if !node.kind.is_repeated() {
            object.insert("title".to_string(), Value::String(title.clone()));
        }
        object.insert("type".to_string(), json!("object"));
        object.insert("required".to_string(), json!(required_fields(node)));
        object.insert(
            "properties".to_string(),
            Value::Object(self.properties(node, prefix)?),
        );

        resolve_dependencies(node, &mut object)?;

        if node.kind.is_repeated() {
            let mut array = Map::new();
            array.insert("title".to_string(), Value::String(title));
            array.insert("type".to_string(), json!("array"));
            array.insert(
                "minItems".to_string(),
                json!(if node.is_optional() { 0 } else { 1 }),
            );
            array.insert("items".to_string(), Value::Object(object));
            Ok(Value::Object(array))
        } else {
            Ok(Value::Object(object))
        }
    }

    fn node_title(&self, node: &FieldNode, prefix: &str) -> String {
        if let Some(label) = &node.label {
            return label.clone();
        }
        if self
            .resolver
            .is_hidden_node(node, prefix, &self.context.type_map_overrides)
        {
            return String::new();
        }
        node.type_name.as_deref().map(type_title).unwrap_or_default()
    }

    fn properties(&self, node: &FieldNode, prefix: &str) -> Result<Map<String, Value>> {
        let mut properties = Map::new();
        for (name, field) in &node.children {
            let path = data_path(prefix, name);
            let schema = if let Some(replacement) = field.style.get(StyleKey::SchemaOverride) {
                replacement.clone()
            } else if field.kind.is_nested() {
                self.derive(field, &path)?
            } else {
                Value::Object(self.field_schema(field, name, &path))
            };
            properties.insert(name.clone(), schema);
        }
        Ok(properties)
    }

    fn field_schema(&self, field: &FieldNode, name: &str, path: &str) -> Map<String, Value> {
        let resolved = self
            .resolver
            .resolve(field, path, &self.context.type_map_overrides);

        let mut schema = Map::new();
        if let Some(schema_type) = &resolved.schema_type {
            schema.insert("type".to_string(), json!(schema_type));
        }
        schema.insert(
            "title".to_string(),
            json!(field_title(field.label.as_deref(), name)),
        );

        if field.kind == FieldKind::List {
            if let Some(min_items) = list_min_items(field) {
                schema.insert("minItems".to_string(), json!(min_items));
            }
            if let Some(child) = field.child.as_deref() {
                schema.insert(
                    "items".to_string(),
                    Value::Object(self.field_schema(child, "", "")),
                );
            }
            schema.insert("uniqueItems".to_string(), json!(true));
            return schema;
        }

        if field.allow_null {
            if let Some(schema_type) = schema.get_mut("type") {
                let nullable = json!([schema_type.clone(), "null"]);
                *schema_type = nullable;
            }
        }

        match &resolved.enum_spec {
            Some(EnumSpec::Source(EnumSource::Choices)) => {
                insert_enum(&mut schema, &field.choices);
            }
            Some(EnumSpec::Literal(pairs)) => insert_enum(&mut schema, pairs),
            None => {}
        }

        if let Some(default) = &field.default {
            schema.insert("default".to_string(), default.clone());
        }

        for validator in &field.validators {
            match validator {
                Validator::MaxLength { limit } => {
                    schema.insert("maxLength".to_string(), json!(limit));
                }
                Validator::MinLength { limit } => {
                    schema.insert("minLength".to_string(), json!(limit));
                }
                Validator::Maximum { limit } => {
                    schema.insert("maximum".to_string(), Value::Number(limit.clone()));
                }
                Validator::Minimum { limit } => {
                    schema.insert("minimum".to_string(), Value::Number(limit.clone()));
                }
                Validator::Pattern { regex } => {
                    schema.insert("pattern".to_string(), json!(regex));
                }
                Validator::Custom { .. } => {}
            }
        }

        schema
    }
}

/// Direct scalar fields that must be present; nested fields express their
/// own requiredness inside their schema.
fn required_fields(node: &FieldNode) -> Vec<String> {
    node.children
        .iter()
        .filter(|(_, field)| field.required && !field.kind.is_nested())
        .map(|(name, _)| name.clone())
        .collect()
}

fn list_min_items(field: &FieldNode) -> Option<u64> {
    field
        .validators
        .iter()
        .filter_map(|validator| match validator {
            Validator::MinLength { limit } => Some(*limit),
            _ => None,
        })
        .last()
        .filter(|limit| *limit > 0)
}

fn insert_enum(schema: &mut Map<String, Value>, pairs: &[(Value, String)]) {
    let values: Vec<Value> = pairs.iter().map(|(value, _)| value.clone()).collect();
    let names: Vec<Value> = pairs
        .iter()
        .map(|(_, name)| Value::String(name.clone()))
        .collect();
    schema.insert("enum".to_string(), Value::Array(values));
    schema.insert("enumNames".to_string(), Value::Array(names));
}
