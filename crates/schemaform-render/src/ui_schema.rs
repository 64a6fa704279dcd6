use serde_json::{Map, Value, json};
use tracing::debug;

use schemaform_core::text::data_path;
use schemaform_core::{FieldKind, FieldNode, RenderContext, StyleKey, TypeResolver};

pub const UI_ORDER_KEY: &str = "ui:order";
pub const UI_WIDGET_KEY: &str = "ui:widget";
pub const UI_HELP_KEY: &str = "ui:help";
pub const UI_CUSTOM_VALIDATORS_KEY: &str = "ui:customValidators";

/// Widget used for a list of enum values when none is configured.
const ENUM_LIST_WIDGET: &str = "checkbox";

/// Derives presentation metadata parallel to the validation schema.
#[derive(Debug, Clone, Copy)]
pub struct UiSchemaBuilder<'a> {
    resolver: &'a TypeResolver,
    context: &'a RenderContext,
}

impl<'a> UiSchemaBuilder<'a> {
    pub fn new(resolver: &'a TypeResolver, context: &'a RenderContext) -> Self {
        Self { resolver, context }
    }

    pub fn derive(&self, node: &FieldNode, prefix: &str) -> Value {
        debug!(path = %prefix, fields = node.children.len(), "deriving ui schema");

        let order: Vec<&String> = node.children.keys().collect();
        let mut body = Map::new();
        body.insert(UI_ORDER_KEY.to_string(), json!(order));

        let mut outer = Map::new();
        let passthrough = if node.kind.is_repeated() {
            &mut outer
        } else {
            &mut body
        };
        for (key, value) in node.style.passthrough() {
            passthrough.insert(key.to_string(), value.clone());
        }

        for (name, field) in &node.children {
            let path = data_path(prefix, name);
            body.insert(name.clone(), self.field_ui(field, &path));
        }

        if node.kind.is_repeated() {
            outer.insert("items".to_string(), Value::Object(body));
            Value::Object(outer)
        } else {
            Value::Object(body)
        }
    }

    fn field_ui(&self, field: &FieldNode, path: &str) -> Value {
        if let Some(replacement) = field.style.get(StyleKey::UiSchemaOverride) {
            return replacement.clone();
        }
        if field.kind.is_nested() {
            return self.derive(field, path);
        }

        let overrides = &self.context.type_map_overrides;
        let widget = if field.kind == FieldKind::List {
            field.child.as_deref().and_then(|child| {
                let resolved = self.resolver.resolve(child, path, overrides);
                match resolved.widget() {
                    Some(widget) => Some(widget.to_string()),
                    None if resolved.is_enum() => Some(ENUM_LIST_WIDGET.to_string()),
                    None => None,
                }
            })
        } else {
            self.resolver
                .resolve(field, path, overrides)
                .widget()
                .map(str::to_string)
        };

        let mut ui = Map::new();
        if let Some(widget) = widget {
            ui.insert(UI_WIDGET_KEY.to_string(), Value::String(widget));
        }
        let help = field
            .style
            .get_str(StyleKey::UiHelp)
            .or(field.help.as_deref())
            .filter(|help| !help.is_empty());
        if let Some(help) = help {
            ui.insert(UI_HELP_KEY.to_string(), json!(help));
        }
        for (key, value) in field.style.passthrough() {
            ui.insert(key.to_string(), value.clone());
        }

        let custom: Vec<Value> = field
            .custom_validators()
            .map(|(code, message)| json!({"code": code, "message": message}))
            .collect();
        if !custom.is_empty() {
            ui.insert(UI_CUSTOM_VALIDATORS_KEY.to_string(), Value::Array(custom));
        }

        Value::Object(ui)
    }
}
