//! Artifact builders for schemaform field trees.
//!
//! Each builder walks a field tree independently and returns one artifact:
//! a validation schema, a UI schema, or a list of table columns. None of
//! them depends on another's output.

pub mod columns;
mod dependencies;
pub mod engine;
pub mod schema;
pub mod ui_schema;

pub use columns::{ColumnBuilder, ColumnDescriptor, ColumnEntry};
pub use engine::{Artifact, Engine, FormArtifacts, ViewAction};
pub use schema::SchemaBuilder;
pub use ui_schema::UiSchemaBuilder;
