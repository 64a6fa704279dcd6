//! Core contracts for schemaform.
//!
//! This crate defines the field-tree model, the type resolver, the render
//! context and the error type shared by the artifact builders and the CLI.

pub mod config;
pub mod context;
pub mod error;
pub mod field;
pub mod style;
pub mod text;
pub mod types;
pub mod validation;

pub use config::{DEFAULT_MAX_DEPTH, EngineConfig};
pub use context::{RenderContext, SortOrder};
pub use error::{Error, Result};
pub use field::{FieldKind, FieldNode, Validator};
pub use style::{DependencyKind, SCHEMA_PREFIX, Style, StyleEntry, StyleKey};
pub use types::{EnumSource, EnumSpec, TypeMap, TypeMapEntry, TypeResolver};
pub use validation::validate_field_tree;

/// JSON Schema describing the field-tree input format.
pub fn field_tree_json_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(FieldNode)
}
