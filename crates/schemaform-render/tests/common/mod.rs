#![allow(dead_code)]

use serde_json::json;

use schemaform_core::{FieldKind, FieldNode};

pub fn choice_fields(node: FieldNode) -> FieldNode {
    node.field("choice_text", FieldNode::new(FieldKind::Text).required())
        .field(
            "votes",
            FieldNode::new(FieldKind::Integer).with_default(json!(0)),
        )
}

/// Poll question with a nested list of choices.
pub fn question_tree() -> FieldNode {
    FieldNode::nested("QuestionSerializer")
        .field("question_text", FieldNode::new(FieldKind::Text).required())
        .field(
            "pub_date",
            FieldNode::new(FieldKind::Date)
                .required()
                .label("date published"),
        )
        .field(
            "choices",
            choice_fields(FieldNode::nested_list("ChoiceSerializer"))
                .required()
                .allow_empty(),
        )
}

/// Flat choice tree served to the collection view.
pub fn choice_list_tree() -> FieldNode {
    choice_fields(FieldNode::nested("ChoiceListSerializer"))
}
