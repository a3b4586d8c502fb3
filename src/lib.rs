//! # Infokit
//!
//! Editing kernel beneath a declarative infographic renderer:
//! - Reversible commands with bounded undo/redo and transactional batches
//! - Selection model and exclusive pointer gestures (drag, brush select)
//! - Data-view synchronization with typed change events and diff descriptors
//!
//! ## Architecture
//!
//! Infokit is organized as a workspace with multiple crates:
//!
//! 1. **infokit-core** - Data model, addressing, diffs, errors, event bus
//! 2. **infokit-settings** - Editor configuration (JSON / TOML)
//! 3. **infokit-editor** - Scene graph, state manager, commands, history,
//!    selection, interactions and the `Editor` session facade
//! 4. **infokit** - Facade crate and headless binary

pub use infokit_core as core;
pub use infokit_editor as editor;
pub use infokit_settings as settings;

pub use infokit_core::{
    Data, DiffDescriptor, DiffOp, EditorEvent, ElementRole, Error, EventBus, EventCategory,
    EventFilter, IndexesPath, InfographicOptions, ItemDatum, NodeId, Result,
};

pub use infokit_editor::{
    BrushSelect, DragMove, Editor, EditorCommand, Modifiers, PointerEvent, SelectionMode,
};

pub use infokit_settings::EditorConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr (stdout is reserved for command output)
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(LogFormat::Pretty)
}

/// Initialize logging with the given output format
pub fn init_logging_with(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    match format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_line_number(true)
                .pretty();
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .json();
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
