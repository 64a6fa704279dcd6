mod common;

use serde_json::json;

use schemaform_core::{EngineConfig, FieldKind, FieldNode, RenderContext};
use schemaform_render::Engine;

use common::question_tree;

#[test]
fn schema_override_replaces_field_schema() {
    let replacement = json!({"type": "string", "format": "color", "minimum": "nonsense"});
    let tree = question_tree()
        .field(
            "accent",
            FieldNode::new(FieldKind::Integer)
                .required()
                .style("schema:override", replacement.clone()),
        )
        .field(
            "meta",
            FieldNode::nested("MetaSerializer")
                .field("slug", FieldNode::new(FieldKind::Text))
                .style("schema:override", json!({"type": "object"})),
        );

    let schema = Engine::default()
        .schema(&tree, &RenderContext::default())
        .expect("derive schema");
    assert_eq!(schema["properties"]["accent"], replacement);
    assert_eq!(schema["properties"]["meta"], json!({"type": "object"}));
    assert_eq!(
        schema["required"],
        json!(["question_text", "pub_date", "accent"])
    );
}

#[test]
fn ui_schema_override_replaces_field_output() {
    let tree = question_tree().field(
        "notes",
        FieldNode::new(FieldKind::Text)
            .help("ignored")
            .style("ui:placeholder", json!("ignored too"))
            .style("uiSchema:override", json!({"ui:widget": "textarea", "ui:options": {"rows": 5}})),
    );

    let ui_schema = Engine::default()
        .ui_schema(&tree, &RenderContext::default())
        .expect("derive ui schema");
    assert_eq!(
        ui_schema["notes"],
        json!({"ui:widget": "textarea", "ui:options": {"rows": 5}})
    );
    assert_eq!(
        ui_schema["ui:order"],
        json!(["question_text", "pub_date", "choices", "notes"])
    );
}

#[test]
fn column_override_is_emitted_verbatim() {
    let tree = FieldNode::nested("BookSerializer")
        .field(
            "title",
            FieldNode::new(FieldKind::Text)
                .style("column:override", json!({"title": "Name", "dataIndex": "title", "ellipsis": true})),
        )
        .field(
            "author",
            FieldNode::nested("AuthorSerializer")
                .field("name", FieldNode::new(FieldKind::Text))
                .style("column:override", json!({"title": "Author", "dataIndex": "author.name"})),
        )
        .field("isbn", FieldNode::new(FieldKind::Text));

    let columns = Engine::default()
        .columns(&tree, &RenderContext::default())
        .expect("derive columns");
    assert_eq!(
        serde_json::to_value(&columns).expect("serialize columns"),
        json!([
            {"title": "Name", "dataIndex": "title", "ellipsis": true},
            {"title": "Author", "dataIndex": "author.name"},
            {"title": "Isbn", "dataIndex": "isbn", "key": "isbn"}
        ])
    );
}

#[test]
fn extension_table_applies_to_every_derivation() {
    let config = EngineConfig::from_toml_str(
        r#"
[type_map.file]
type = "string"
widget = "file"

[type_map.text]
type = "string"
widget = "textarea"
"#,
    )
    .expect("parse config");
    let engine = Engine::new(&config);
    let tree = FieldNode::nested("UploadSerializer")
        .field("attachment", FieldNode::new(FieldKind::File).required())
        .field("caption", FieldNode::new(FieldKind::Text))
        .field(
            "summary",
            FieldNode::new(FieldKind::Text).style("ui:widget", json!("text")),
        );

    let form = engine
        .form(&tree, &RenderContext::default())
        .expect("derive form");
    assert_eq!(
        form.schema["properties"]["attachment"],
        json!({"type": "string", "title": "Attachment"})
    );
    assert_eq!(form.ui_schema["attachment"], json!({"ui:widget": "file"}));
    assert_eq!(form.ui_schema["caption"], json!({"ui:widget": "textarea"}));
    assert_eq!(form.ui_schema["summary"], json!({"ui:widget": "text"}));
}

#[test]
fn style_type_and_enum_override_the_kind_table() {
    let tree = FieldNode::nested("SettingsSerializer").field(
        "level",
        FieldNode::new(FieldKind::Text)
            .style("schema:type", json!("integer"))
            .style("schema:enum", json!([[1, "Low"], [2, "High"]]))
            .with_default(json!(1)),
    );

    let schema = Engine::default()
        .schema(&tree, &RenderContext::default())
        .expect("derive schema");
    assert_eq!(
        schema["properties"]["level"],
        json!({
            "type": "integer",
            "title": "Level",
            "enum": [1, 2],
            "enumNames": ["Low", "High"],
            "default": 1
        })
    );
}

#[test]
fn nesting_deeper_than_configured_limit_is_refused() {
    let config = EngineConfig {
        max_depth: 1,
        ..EngineConfig::default()
    };
    let err = Engine::new(&config)
        .schema(&question_tree(), &RenderContext::default())
        .unwrap_err();
    assert!(matches!(
        err,
        schemaform_core::Error::NestingTooDeep { limit: 1, .. }
    ));
}
