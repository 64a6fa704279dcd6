use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use schemaform_core::{
    EngineConfig, FieldNode, RenderContext, Result, TypeResolver, validate_field_tree,
};

use crate::columns::{ColumnBuilder, ColumnEntry};
use crate::schema::SchemaBuilder;
use crate::ui_schema::UiSchemaBuilder;

/// View action being served, which selects the artifact to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    List,
    Retrieve,
    Create,
    Update,
    Other(String),
}

impl ViewAction {
    pub fn parse(action: &str) -> ViewAction {
        match action {
            "list" => ViewAction::List,
            "retrieve" => ViewAction::Retrieve,
            "create" => ViewAction::Create,
            "update" | "partial_update" => ViewAction::Update,
            other => ViewAction::Other(other.to_string()),
        }
    }
}

/// Validation schema and UI schema of a single-record view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormArtifacts {
    pub schema: Value,
    #[serde(rename = "uiSchema")]
    pub ui_schema: Value,
}

/// Artifact emitted for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Artifact {
    Form(FormArtifacts),
    Columns(Vec<ColumnEntry>),
}

/// Entry point for deriving artifacts from field trees.
///
/// The kind table is merged with the configured extensions once, at
/// construction; every derivation afterwards shares it read-only.
#[derive(Debug, Clone)]
pub struct Engine {
    resolver: TypeResolver,
    max_depth: usize,
}

impl Engine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            resolver: config.resolver(),
            max_depth: config.max_depth,
        }
    }

    pub fn resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    pub fn schema(&self, node: &FieldNode, context: &RenderContext) -> Result<Value> {
        let node = self.prepare(node)?;
        SchemaBuilder::new(&self.resolver, context).derive(&node, "")
    }

    pub fn ui_schema(&self, node: &FieldNode, context: &RenderContext) -> Result<Value> {
        let node = self.prepare(node)?;
        Ok(UiSchemaBuilder::new(&self.resolver, context).derive(&node, ""))
    }

    pub fn columns(&self, node: &FieldNode, context: &RenderContext) -> Result<Vec<ColumnEntry>> {
        let node = self.prepare(node)?;
        ColumnBuilder::new(context).derive(&node, "")
    }

    pub fn form(&self, node: &FieldNode, context: &RenderContext) -> Result<FormArtifacts> {
        let node = self.prepare(node)?;
        Ok(FormArtifacts {
            schema: SchemaBuilder::new(&self.resolver, context).derive(&node, "")?,
            ui_schema: UiSchemaBuilder::new(&self.resolver, context).derive(&node, ""),
        })
    }

    /// Emit columns for the list action and `{schema, uiSchema}` otherwise.
    ///
    /// `list_node` is an optional tree dedicated to the collection view; the
    /// form tree is listed when it is absent.
    pub fn encode(
        &self,
        node: &FieldNode,
        list_node: Option<&FieldNode>,
        context: &RenderContext,
        action: &ViewAction,
    ) -> Result<Artifact> {
        debug!(action = ?action, "encoding artifact");
        let artifact = match action {
            ViewAction::List => self
                .columns(list_node.unwrap_or(node), context)
                .map(Artifact::Columns),
            _ => self.form(node, context).map(Artifact::Form),
        };
        artifact.inspect_err(|err| warn!(action = ?action, error = %err, "derivation failed"))
    }

    fn prepare(&self, node: &FieldNode) -> Result<FieldNode> {
        validate_field_tree(node, self.max_depth)?;
        Ok(node.without_read_only())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use schemaform_core::FieldKind;

    use super::*;

    #[test]
    fn parses_view_actions() {
        assert_eq!(ViewAction::parse("list"), ViewAction::List);
        assert_eq!(ViewAction::parse("partial_update"), ViewAction::Update);
        assert_eq!(
            ViewAction::parse("create_form"),
            ViewAction::Other("create_form".to_string())
        );
    }

    #[test]
    fn default_engine_accepts_shallow_trees() {
        let engine = Engine::default();
        let node = FieldNode::nested("NoteSerializer").field("body", FieldNode::new(FieldKind::Text));
        assert!(engine.schema(&node, &RenderContext::default()).is_ok());
    }
}
