//! Second pass of schema derivation: field dependency directives.
//!
//! Bookkeeping of fields to keep or remove lives in [`Bookkeeping`], created
//! for a single node and dropped once that node's draft schema is final.

use std::collections::HashSet;

use serde_json::{Map, Value, json};
use tracing::trace;

use schemaform_core::{DependencyKind, Error, FieldNode, Result};

#[derive(Debug, Default)]
struct Bookkeeping {
    kept: HashSet<String>,
    removed: Vec<String>,
}

impl Bookkeeping {
    fn keep(&mut self, names: &[String]) {
        self.kept.extend(names.iter().cloned());
    }

    fn remove(&mut self, names: &[String]) {
        for name in names {
            if !self.removed.contains(name) {
                self.removed.push(name.clone());
            }
        }
    }
}

/// Apply every dependency directive of `node`'s direct fields to its draft
/// object schema.
pub(crate) fn resolve_dependencies(node: &FieldNode, schema: &mut Map<String, Value>) -> Result<()> {
    let mut bookkeeping = Bookkeeping::default();
    let mut dependencies = Map::new();

    for (name, field) in &node.children {
        let directives = field.style.dependency_directives();
        let (kind, directive) = match directives.as_slice() {
            [] => continue,
            [single] => *single,
            many => {
                let names: Vec<&str> = many.iter().map(|(kind, _)| kind.as_str()).collect();
                return Err(Error::ConflictingDependencies {
                    field: name.clone(),
                    directives: names.join(", "),
                });
            }
        };
        trace!(field = %name, kind = kind.as_str(), "applying dependency directive");

        let dependency = match kind {
            DependencyKind::Simple => {
                let siblings = sibling_names(name, kind, directive)?;
                remove_required(schema, &siblings);
                bookkeeping.keep(&siblings);
                json!(siblings)
            }
            DependencyKind::Conditional => {
                let siblings = sibling_names(name, kind, directive)?;
                let properties = sibling_schemas(schema, name, &siblings)?;
                remove_required(schema, &siblings);
                bookkeeping.remove(&siblings);
                json!({"properties": properties, "required": siblings})
            }
            DependencyKind::Dynamic => dynamic_dependency(schema, name, directive, &mut bookkeeping)?,
            DependencyKind::Override => directive.clone(),
        };
        dependencies.insert(name.clone(), dependency);
    }

    let dropped: Vec<String> = bookkeeping
        .removed
        .into_iter()
        .filter(|name| !bookkeeping.kept.contains(name))
        .collect();
    if let Some(Value::Object(properties)) = schema.get_mut("properties") {
        for name in &dropped {
            properties.shift_remove(name);
        }
    }
    remove_required(schema, &dropped);

    if !dependencies.is_empty() {
        schema.insert("dependencies".to_string(), Value::Object(dependencies));
    }
    Ok(())
}

/// One `oneOf` branch per mapped enum value, pinning the field to that value.
fn dynamic_dependency(
    schema: &Map<String, Value>,
    name: &str,
    directive: &Value,
    bookkeeping: &mut Bookkeeping,
) -> Result<Value> {
    let Value::Object(mapping) = directive else {
        return Err(invalid(name, DependencyKind::Dynamic, "expected an object of enum value -> field names"));
    };

    let own = property(schema, name)
        .and_then(Value::as_object)
        .ok_or_else(|| Error::DynamicDependencyNotEnum(name.to_string()))?;
    let values = own
        .get("enum")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::DynamicDependencyNotEnum(name.to_string()))?;
    let names = own.get("enumNames").and_then(Value::as_array);

    let mut branches = Vec::with_capacity(mapping.len());
    for (key, dependents) in mapping {
        let index = values
            .iter()
            .position(|value| enum_key_matches(value, key))
            .ok_or_else(|| Error::UnknownEnumValue {
                field: name.to_string(),
                value: key.clone(),
            })?;

        let mut pinned = own.clone();
        pinned.insert("enum".to_string(), json!([values[index].clone()]));
        if let Some(display) = names.and_then(|names| names.get(index)) {
            pinned.insert("enumNames".to_string(), json!([display.clone()]));
        }

        let dependents = match dependents {
            Value::Null => Vec::new(),
            other => names_from(name, DependencyKind::Dynamic, other)?,
        };
        let mut properties = Map::new();
        properties.insert(name.to_string(), Value::Object(pinned));
        properties.extend(sibling_schemas(schema, name, &dependents)?);
        bookkeeping.remove(&dependents);

        branches.push(json!({"properties": properties, "required": dependents}));
    }

    Ok(json!({"oneOf": branches}))
}

fn sibling_names(field: &str, kind: DependencyKind, directive: &Value) -> Result<Vec<String>> {
    let names = names_from(field, kind, directive)?;
    if names.is_empty() {
        return Err(invalid(field, kind, "expected at least one field name"));
    }
    Ok(names)
}

fn names_from(field: &str, kind: DependencyKind, value: &Value) -> Result<Vec<String>> {
    match value {
        Value::String(name) => Ok(vec![name.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid(field, kind, &format!("field names must be strings, got {item}")))
            })
            .collect(),
        other => Err(invalid(
            field,
            kind,
            &format!("expected a field name or a list of field names, got {other}"),
        )),
    }
}

fn sibling_schemas(
    schema: &Map<String, Value>,
    field: &str,
    siblings: &[String],
) -> Result<Map<String, Value>> {
    let mut properties = Map::new();
    for sibling in siblings {
        let sibling_schema = property(schema, sibling).ok_or_else(|| Error::UnknownDependencyField {
            field: field.to_string(),
            dependency: sibling.clone(),
        })?;
        properties.insert(sibling.clone(), sibling_schema.clone());
    }
    Ok(properties)
}

fn property<'s>(schema: &'s Map<String, Value>, name: &str) -> Option<&'s Value> {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .and_then(|properties| properties.get(name))
}

fn remove_required(schema: &mut Map<String, Value>, names: &[String]) {
    if let Some(Value::Array(required)) = schema.get_mut("required") {
        required.retain(|item| item.as_str().is_none_or(|name| !names.iter().any(|n| n == name)));
    }
}

fn enum_key_matches(value: &Value, key: &str) -> bool {
    match value {
        Value::String(raw) => raw == key,
        other => other.to_string() == key,
    }
}

fn invalid(field: &str, kind: DependencyKind, reason: &str) -> Error {
    Error::InvalidDirective {
        field: field.to_string(),
        directive: kind.as_str(),
        reason: reason.to_string(),
    }
}
