use thiserror::Error;

/// Configuration errors raised while deriving artifacts from a field tree.
///
/// Every variant is a caller or programmer mistake: derivation is a pure
/// function of the tree and context, so retrying with the same input yields
/// the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// More than one dependency directive is attached to a single field.
    #[error("field '{field}' declares more than one dependency directive: {directives}")]
    ConflictingDependencies { field: String, directives: String },
    /// A dependency directive value does not have the expected shape.
    #[error("invalid {directive} directive on field '{field}': {reason}")]
    InvalidDirective {
        field: String,
        directive: &'static str,
        reason: String,
    },
    /// A conditional or dynamic directive names a sibling that has no schema.
    #[error("field '{field}' depends on unknown sibling '{dependency}'")]
    UnknownDependencyField { field: String, dependency: String },
    /// A dynamic dependency is declared on a field without an enum.
    #[error("dynamic dependency on field '{0}' requires an enum field")]
    DynamicDependencyNotEnum(String),
    /// A dynamic dependency branch key is not one of the field's enum values.
    #[error("dynamic dependency on field '{field}' names undeclared enum value '{value}'")]
    UnknownEnumValue { field: String, value: String },
    /// A sort directive is neither `ascend` nor `descend`.
    #[error("invalid sort order '{value}' for '{field}': expected \"ascend\" or \"descend\"")]
    InvalidSortOrder { field: String, value: String },
    /// The column allow-list is not a list of strings.
    #[error("list_fields must be a list of strings, or empty: {0}")]
    InvalidListFields(String),
    /// A sort map key is absent from a non-empty column allow-list.
    #[error("list_fields_sort key '{0}' is not in list_fields")]
    SortFieldNotListed(String),
    /// The render context document could not be interpreted.
    #[error("invalid render context: {0}")]
    InvalidContext(String),
    /// The field tree violates structural invariants.
    #[error("invalid field tree at '{path}': {reason}")]
    InvalidFieldTree { path: String, reason: String },
    /// The field tree nests deeper than the configured limit.
    #[error("field tree at '{path}' exceeds the maximum nesting depth of {limit}")]
    NestingTooDeep { path: String, limit: usize },
    /// The engine configuration could not be loaded.
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for results returned by schemaform crates.
pub type Result<T> = std::result::Result<T, Error>;
