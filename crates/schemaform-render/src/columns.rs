use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use schemaform_core::text::{data_path, field_title};
use schemaform_core::{FieldNode, RenderContext, Result, SortOrder, StyleKey};

/// Column of a tabular collection view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub title: String,
    pub data_index: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_sort_order: Option<SortOrder>,
}

/// A derived column, or a `column:override` value emitted verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnEntry {
    Column(ColumnDescriptor),
    Override(Value),
}

/// Flattens a field tree into ordered column descriptors.
///
/// Nested list fields are skipped: there is no flattening of doubly nested
/// tabular data.
#[derive(Debug, Clone, Copy)]
pub struct ColumnBuilder<'a> {
    context: &'a RenderContext,
}

impl<'a> ColumnBuilder<'a> {
    pub fn new(context: &'a RenderContext) -> Self {
        Self { context }
    }

    pub fn derive(&self, node: &FieldNode, prefix: &str) -> Result<Vec<ColumnEntry>> {
        debug!(path = %prefix, fields = node.children.len(), "deriving columns");
        self.context.validate()?;

        let mut columns = Vec::new();
        self.collect(node, prefix, &mut columns)?;
        Ok(columns)
    }

    fn collect(&self, node: &FieldNode, prefix: &str, columns: &mut Vec<ColumnEntry>) -> Result<()> {
        for (name, field) in &node.children {
            let path = data_path(prefix, name);
            let fallback_sort = style_sort(field, &path)?;

            if field.kind.is_repeated() {
                check_sort_directives(field, &path)?;
                continue;
            }

            if field.kind.is_nested() {
                match field.style.get(StyleKey::ColumnOverride) {
                    Some(replacement) => {
                        check_sort_directives(field, &path)?;
                        columns.push(ColumnEntry::Override(replacement.clone()));
                    }
                    None => self.collect(field, &path, columns)?,
                }
                continue;
            }

            if !self.context.lists(&path) {
                continue;
            }

            if let Some(replacement) = field.style.get(StyleKey::ColumnOverride) {
                columns.push(ColumnEntry::Override(replacement.clone()));
                continue;
            }

            let default_sort_order = self
                .context
                .list_fields_sort
                .get(&path)
                .copied()
                .or(fallback_sort);
            columns.push(ColumnEntry::Column(ColumnDescriptor {
                title: field_title(field.label.as_deref(), &path),
                data_index: path,
                key: name.clone(),
                default_sort_order,
            }));
        }
        Ok(())
    }
}

fn style_sort(field: &FieldNode, path: &str) -> Result<Option<SortOrder>> {
    field
        .style
        .get(StyleKey::Sort)
        .map(|value| SortOrder::parse(path, value))
        .transpose()
}

/// Sort directives inside a skipped subtree are still checked.
fn check_sort_directives(node: &FieldNode, prefix: &str) -> Result<()> {
    for (name, field) in &node.children {
        let path = data_path(prefix, name);
        style_sort(field, &path)?;
        check_sort_directives(field, &path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use schemaform_core::{Error, FieldKind};
    use serde_json::json;

    use super::*;

    #[test]
    fn sort_directive_in_style_is_applied() {
        let node = FieldNode::nested("ChoiceSerializer")
            .field("votes", FieldNode::new(FieldKind::Integer).style("schema:sort", json!("descend")));
        let context = RenderContext::default();

        let columns = ColumnBuilder::new(&context).derive(&node, "").expect("columns");
        assert_eq!(
            serde_json::to_value(&columns).expect("serialize"),
            json!([{"title": "Votes", "dataIndex": "votes", "key": "votes", "defaultSortOrder": "descend"}])
        );
    }

    #[test]
    fn context_sort_wins_over_style_sort() {
        let node = FieldNode::nested("ChoiceSerializer")
            .field("votes", FieldNode::new(FieldKind::Integer).style("schema:sort", json!("descend")));
        let mut context = RenderContext::default();
        context
            .list_fields_sort
            .insert("votes".to_string(), SortOrder::Ascend);

        let columns = ColumnBuilder::new(&context).derive(&node, "").expect("columns");
        let ColumnEntry::Column(column) = &columns[0] else {
            panic!("expected a derived column");
        };
        assert_eq!(column.default_sort_order, Some(SortOrder::Ascend));
    }

    #[test]
    fn bad_sort_on_filtered_field_still_fails() {
        let node = FieldNode::nested("ChoiceSerializer")
            .field("votes", FieldNode::new(FieldKind::Integer).style("schema:sort", json!(1)))
            .field("choice_text", FieldNode::new(FieldKind::Text));
        let context = RenderContext {
            list_fields: vec!["choice_text".to_string()],
            ..RenderContext::default()
        };

        let err = ColumnBuilder::new(&context).derive(&node, "").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidSortOrder {
                field: "votes".to_string(),
                value: "1".to_string()
            }
        );
    }

    #[test]
    fn bad_sort_inside_nested_list_fails() {
        let node = FieldNode::nested("QuestionSerializer")
            .field("question_text", FieldNode::new(FieldKind::Text))
            .field(
                "choices",
                FieldNode::nested_list("ChoiceSerializer")
                    .field("votes", FieldNode::new(FieldKind::Integer).style("schema:sort", json!("BAD_KEY"))),
            );
        let context = RenderContext::default();

        let err = ColumnBuilder::new(&context).derive(&node, "").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidSortOrder {
                field: "choices.votes".to_string(),
                value: "BAD_KEY".to_string()
            }
        );
    }

    #[test]
    fn bad_sort_on_nested_list_itself_fails() {
        let node = FieldNode::nested("QuestionSerializer").field(
            "choices",
            FieldNode::nested_list("ChoiceSerializer")
                .style("schema:sort", json!("BAD_KEY"))
                .field("votes", FieldNode::new(FieldKind::Integer)),
        );
        let context = RenderContext::default();

        assert!(matches!(
            ColumnBuilder::new(&context).derive(&node, ""),
            Err(Error::InvalidSortOrder { .. })
        ));
    }

    #[test]
    fn nested_list_with_valid_sorts_is_still_skipped() {
        let node = FieldNode::nested("QuestionSerializer")
            .field("question_text", FieldNode::new(FieldKind::Text))
            .field(
                "choices",
                FieldNode::nested_list("ChoiceSerializer")
                    .field("votes", FieldNode::new(FieldKind::Integer).style("schema:sort", json!("ascend"))),
            );
        let context = RenderContext::default();

        let columns = ColumnBuilder::new(&context).derive(&node, "").expect("columns");
        assert_eq!(columns.len(), 1);
    }

    #[test]
    fn invalid_context_fails_before_walking() {
        let node = FieldNode::nested("ChoiceSerializer").field("votes", FieldNode::new(FieldKind::Integer));
        let mut context = RenderContext {
            list_fields: vec!["votes".to_string()],
            ..RenderContext::default()
        };
        context
            .list_fields_sort
            .insert("choice_text".to_string(), SortOrder::Ascend);

        let err = ColumnBuilder::new(&context).derive(&node, "").unwrap_err();
        assert_eq!(err, Error::SortFieldNotListed("choice_text".to_string()));
    }
}
