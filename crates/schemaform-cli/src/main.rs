mod inputs;
mod logging;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use schemaform_core::{Error as CoreError, FieldNode, RenderContext, field_tree_json_schema};
use schemaform_render::{Engine, ViewAction};
use thiserror::Error;

use inputs::{load_config, load_context, load_field_tree};
use logging::init_logging;
use output::emit;

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("invalid output path: {}", .0.display())]
    InvalidPath(PathBuf),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "schemaform", version, about = "Derive form and table artifacts from field trees")]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validation schema of a field tree.
    Schema(TreeArgs),
    /// UI schema of a field tree.
    UiSchema(TreeArgs),
    /// Table column descriptors of a field tree.
    Columns(TreeArgs),
    /// Validation schema and UI schema together.
    Form(TreeArgs),
    /// Artifact selected by a view action.
    Encode(EncodeArgs),
    /// JSON Schema of the field-tree input format.
    FieldTreeSchema(OutArgs),
}

#[derive(Args, Debug)]
struct TreeArgs {
    /// Field tree document (JSON).
    #[arg(value_name = "FIELD_TREE")]
    tree: PathBuf,
    /// Render context document (JSON).
    #[arg(long, value_name = "CONTEXT")]
    context: Option<PathBuf>,
    /// Engine configuration (TOML).
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,
    #[command(flatten)]
    out: OutArgs,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    #[command(flatten)]
    tree: TreeArgs,
    /// View action, e.g. list, retrieve, create, update.
    #[arg(long)]
    action: String,
    /// Field tree used for the list action instead of FIELD_TREE.
    #[arg(long, value_name = "LIST_TREE")]
    list_tree: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct OutArgs {
    /// Write the artifact to this path instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

struct Inputs {
    engine: Engine,
    tree: FieldNode,
    context: RenderContext,
}

impl TreeArgs {
    fn load(&self) -> Result<Inputs, CliError> {
        let config = load_config(self.config.as_deref())?;
        let context = load_context(self.context.as_deref())?;
        let tree = load_field_tree(&self.tree)?;
        tracing::debug!(event = "inputs_loaded", tree = %self.tree.display(), fields = tree.children.len());
        Ok(Inputs {
            engine: Engine::new(&config),
            tree,
            context,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.log_json) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(event = "command_failed", error = %err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Schema(args) => {
            let inputs = args.load()?;
            let schema = inputs.engine.schema(&inputs.tree, &inputs.context)?;
            emit(&schema, args.out.out.as_deref())
        }
        Command::UiSchema(args) => {
            let inputs = args.load()?;
            let ui_schema = inputs.engine.ui_schema(&inputs.tree, &inputs.context)?;
            emit(&ui_schema, args.out.out.as_deref())
        }
        Command::Columns(args) => {
            let inputs = args.load()?;
            let columns = inputs.engine.columns(&inputs.tree, &inputs.context)?;
            emit(&columns, args.out.out.as_deref())
        }
        Command::Form(args) => {
            let inputs = args.load()?;
            let form = inputs.engine.form(&inputs.tree, &inputs.context)?;
            emit(&form, args.out.out.as_deref())
        }
        Command::Encode(args) => {
            let inputs = args.tree.load()?;
            let list_tree = args.list_tree.as_deref().map(load_field_tree).transpose()?;
            let action = ViewAction::parse(&args.action);
            let artifact = inputs
                .engine
                .encode(&inputs.tree, list_tree.as_ref(), &inputs.context, &action)?;
            emit(&artifact, args.tree.out.out.as_deref())
        }
        Command::FieldTreeSchema(args) => emit(&field_tree_json_schema(), args.out.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use serde_json::{Value, json};
    use tempfile::tempdir;

    use super::*;

    const TREE: &str = r#"{
        "kind": "nested",
        "type_name": "ChoiceSerializer",
        "children": {
            "id": {"kind": "integer", "read_only": true},
            "choice_text": {"kind": "text", "required": true},
            "votes": {"kind": "integer", "default": 0}
        }
    }"#;

    fn path_arg(path: &std::path::Path) -> &str {
        path.to_str().expect("utf-8 temp path")
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_encode_arguments() {
        let cli = Cli::try_parse_from([
            "schemaform",
            "encode",
            "tree.json",
            "--action",
            "list",
            "--list-tree",
            "list.json",
            "--log-json",
        ])
        .expect("parse");
        assert!(cli.log_json);
        let Command::Encode(args) = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(args.action, "list");
        assert_eq!(args.list_tree, Some(PathBuf::from("list.json")));
        assert_eq!(args.tree.tree, PathBuf::from("tree.json"));
    }

    #[test]
    fn encode_list_writes_columns() {
        let dir = tempdir().expect("tempdir");
        let tree = dir.path().join("tree.json");
        let context = dir.path().join("context.json");
        let out = dir.path().join("columns.json");
        std::fs::write(&tree, TREE).expect("write tree");
        std::fs::write(&context, r#"{"list_fields_sort": {"votes": "descend"}}"#).expect("write context");

        let cli = Cli::try_parse_from([
            "schemaform",
            "encode",
            path_arg(&tree),
            "--context",
            path_arg(&context),
            "--action",
            "list",
            "--out",
            path_arg(&out),
        ])
        .expect("parse");
        run(cli.command).expect("run");

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&out).expect("read")).expect("json");
        assert_eq!(
            written,
            json!([
                {"title": "Choice Text", "dataIndex": "choice_text", "key": "choice_text"},
                {"title": "Votes", "dataIndex": "votes", "key": "votes", "defaultSortOrder": "descend"}
            ])
        );
    }

    #[test]
    fn form_writes_schema_and_ui_schema() {
        let dir = tempdir().expect("tempdir");
        let tree = dir.path().join("tree.json");
        let out = dir.path().join("form.json");
        std::fs::write(&tree, TREE).expect("write tree");

        let cli = Cli::try_parse_from([
            "schemaform",
            "form",
            path_arg(&tree),
            "--out",
            path_arg(&out),
        ])
        .expect("parse");
        run(cli.command).expect("run");

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&out).expect("read")).expect("json");
        assert_eq!(written["schema"]["title"], json!("Choice"));
        assert_eq!(written["schema"]["required"], json!(["choice_text"]));
        assert_eq!(
            written["uiSchema"]["ui:order"],
            json!(["choice_text", "votes"])
        );
    }

    #[test]
    fn invalid_config_is_reported() {
        let dir = tempdir().expect("tempdir");
        let tree = dir.path().join("tree.json");
        let config = dir.path().join("engine.toml");
        std::fs::write(&tree, TREE).expect("write tree");
        std::fs::write(&config, "max_depth = \"deep\"\n").expect("write config");

        let cli = Cli::try_parse_from([
            "schemaform",
            "schema",
            path_arg(&tree),
            "--config",
            path_arg(&config),
        ])
        .expect("parse");
        let err = run(cli.command).unwrap_err();
        assert!(matches!(err, CliError::Core(CoreError::InvalidConfig(_))));
    }
}
