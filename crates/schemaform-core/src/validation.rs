use crate::error::{Error, Result};
use crate::field::{FieldKind, FieldNode};
use crate::text::data_path;

/// Validate the structural invariants of a field tree.
///
/// This checks:
/// - list fields carry a `child`, and only list fields do
/// - only nested kinds carry `children`
/// - nested kinds do not declare `choices`
/// - nesting does not exceed `max_depth`
pub fn validate_field_tree(node: &FieldNode, max_depth: usize) -> Result<()> {
    validate_node(node, "", 0, max_depth)
}

fn validate_node(node: &FieldNode, path: &str, depth: usize, max_depth: usize) -> Result<()> {
    if depth > max_depth {
        return Err(Error::NestingTooDeep {
            path: display_path(path),
            limit: max_depth,
        });
    }

    match (node.kind, node.child.as_deref()) {
        (FieldKind::List, None) => return Err(invalid(path, "list field without a child")),
        (FieldKind::List, Some(child)) => validate_node(child, path, depth + 1, max_depth)?,
        (_, Some(_)) => return Err(invalid(path, "only list fields may declare a child")),
        (_, None) => {}
    }

    if !node.kind.is_nested() && !node.children.is_empty() {
        return Err(invalid(path, "only nested fields may declare children"));
    }
    if node.kind.is_nested() && !node.choices.is_empty() {
        return Err(invalid(path, "nested fields cannot declare choices"));
    }

    for (name, field) in &node.children {
        validate_node(field, &data_path(path, name), depth + 1, max_depth)?;
    }

    Ok(())
}

fn invalid(path: &str, reason: &str) -> Error {
    Error::InvalidFieldTree {
        path: display_path(path),
        reason: reason.to_string(),
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}
