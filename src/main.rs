//! Headless editing session.
//!
//! ```text
//! infokit [--json-log] [--config <file>] <options.json> [commands.json]
//! ```
//!
//! Loads an options document, replays a list of serialized commands as one
//! undo unit, and prints the resulting options to stdout.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use infokit::{init_logging_with, Editor, EditorCommand, EditorConfig, InfographicOptions, LogFormat};

#[derive(Parser, Debug)]
#[command(name = "infokit")]
#[command(about = "Replay editing commands against an infographic options document")]
#[command(version)]
struct Args {
    /// Emit logs as JSON lines
    #[arg(long)]
    json_log: bool,

    /// Config file (.toml or .json); defaults to the user config dir
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Options document to open
    options: PathBuf,

    /// JSON list of commands, replayed as one undo unit
    commands: Option<PathBuf>,
}

impl Args {
    fn log_format(&self) -> LogFormat {
        if self.json_log {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EditorConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => EditorConfig::default_path()?,
    };
    EditorConfig::load_or_default(&path)
        .with_context(|| format!("loading config {}", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging_with(args.log_format())?;
    tracing::info!("infokit {} (built {})", infokit::VERSION, infokit::BUILD_DATE);

    let config = load_config(args.config.as_deref())?;
    let options: InfographicOptions = read_json(&args.options)?;
    let mut editor = Editor::new(options, config);

    if let Some(path) = &args.commands {
        let commands: Vec<EditorCommand> = read_json(path)?;
        let count = commands.len();
        editor
            .execute_batch(commands)
            .with_context(|| format!("replaying {}", path.display()))?;
        tracing::info!("Replayed {} commands from {}", count, path.display());
    }

    println!("{}", serde_json::to_string_pretty(editor.state().options())?);
    tracing::info!(
        "{} items, undo depth {}",
        editor.state().data().item_count(),
        editor.history().undo_depth()
    );
    editor.destroy();
    Ok(())
}
