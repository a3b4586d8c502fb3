//! # Infokit Editor
//!
//! Editing kernel beneath the declarative infographic renderer. It keeps the
//! authoritative data tree and the rendered scene graph in sync, records
//! reversible commands, and arbitrates pointer gestures.
//!
//! ## Architecture
//!
//! ```text
//! Editor (session facade)
//!   ├── Document
//!   │     ├── SceneGraph (arena of rendered nodes)
//!   │     └── StateManager (data tree, diff events)
//!   ├── CommandManager (undo / redo of EditorCommand)
//!   ├── SelectionModel
//!   ├── InteractionScheduler (exclusive gesture lock)
//!   │     ├── DragMove
//!   │     └── BrushSelect
//!   └── Viewport (screen <-> scene-local)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use infokit_core::{Data, InfographicOptions, ItemDatum};
//! use infokit_editor::{EditorCommand, Editor};
//! use infokit_settings::EditorConfig;
//!
//! let options = InfographicOptions::with_data(Data::with_items(vec![ItemDatum::labeled("Item 1")]));
//! let mut editor = Editor::with_default_interactions(options, EditorConfig::default());
//!
//! editor
//!     .execute(EditorCommand::add_item([1], ItemDatum::labeled("Item 2")))
//!     .unwrap();
//! assert_eq!(editor.state().data().items.len(), 2);
//!
//! editor.undo().unwrap();
//! assert_eq!(editor.state().data().items.len(), 1);
//! ```

pub mod commands;
pub mod editor;
pub mod history;
pub mod interaction;
pub mod scene;
pub mod selection;
pub mod state;
pub mod viewport;

pub use commands::{Document, EditorCommand};
pub use editor::Editor;
pub use history::{CommandManager, DEFAULT_MAX_DEPTH};
pub use interaction::{
    BrushSelect, DragMove, ExclusiveGuard, GestureCompletion, GestureOutcome, HostBindings,
    Interaction, InteractionContext, InteractionScheduler, LockState, Modifiers, PointerEvent,
    PointerPhase,
};
pub use scene::{Bounds, NodeSpec, Point, SceneGraph, SceneNode};
pub use selection::{SelectionMode, SelectionModel};
pub use state::{resolve_element_path, ElementAddress, ElementPath, StateManager};
pub use viewport::Viewport;
