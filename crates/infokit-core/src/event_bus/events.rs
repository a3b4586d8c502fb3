//! Event type definitions for the event bus.
//!
//! This module defines every event the editing kernel emits, organized by
//! category. Payload shapes are the contract; events are cloneable and
//! serializable so listeners can journal or replay them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::{IndexesPath, ItemDatum, JsonMap};
use crate::diff::DiffDescriptor;
use crate::types::NodeId;

/// Root event enum for all editor events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditorEvent {
    /// Selection membership changes
    Selection(SelectionEvent),
    /// Rendered geometry changes reported by the host renderer
    Geometry(GeometryEvent),
    /// Undo/redo history changes
    History(HistoryEvent),
    /// Specific data-tree mutations
    Data(DataEvent),
    /// Generic diff notifications
    Options(OptionsEvent),
}

impl EditorEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            EditorEvent::Selection(_) => EventCategory::Selection,
            EditorEvent::Geometry(_) => EventCategory::Geometry,
            EditorEvent::History(_) => EventCategory::History,
            EditorEvent::Data(_) => EventCategory::Data,
            EditorEvent::Options(_) => EventCategory::Options,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            EditorEvent::Selection(e) => e.description(),
            EditorEvent::Geometry(e) => e.description(),
            EditorEvent::History(e) => e.description(),
            EditorEvent::Data(e) => e.description(),
            EditorEvent::Options(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Selection events.
    Selection,
    /// Geometry events.
    Geometry,
    /// History events.
    History,
    /// Specific data events.
    Data,
    /// Generic diff events.
    Options,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Geometry => write!(f, "Geometry"),
            EventCategory::History => write!(f, "History"),
            EventCategory::Data => write!(f, "Data"),
            EventCategory::Options => write!(f, "Options"),
        }
    }
}

/// Selection events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// The selected set changed.
    Changed {
        /// Selection before the change, in selection order.
        prev: Vec<NodeId>,
        /// Selection after the change, in selection order.
        next: Vec<NodeId>,
    },
}

impl SelectionEvent {
    fn description(&self) -> String {
        match self {
            SelectionEvent::Changed { prev, next } => {
                format!("Selection changed: {} -> {} nodes", prev.len(), next.len())
            }
        }
    }
}

/// Geometry events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeometryEvent {
    /// A node was moved, resized or re-rendered.
    Changed {
        /// The node whose geometry changed.
        target: NodeId,
    },
}

impl GeometryEvent {
    fn description(&self) -> String {
        match self {
            GeometryEvent::Changed { target } => format!("Geometry changed: {}", target),
        }
    }
}

/// History events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HistoryEvent {
    /// Undo or redo stacks changed.
    Changed,
}

impl HistoryEvent {
    fn description(&self) -> String {
        match self {
            HistoryEvent::Changed => "History changed".to_string(),
        }
    }
}

/// Specific data-tree events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataEvent {
    /// A datum was inserted.
    ItemAdded {
        /// Where the datum now lives.
        indexes: IndexesPath,
        /// The inserted datum.
        datum: ItemDatum,
    },
    /// A datum was shallow-merged.
    ItemUpdated {
        /// Address of the updated datum.
        indexes: IndexesPath,
        /// The merged partial.
        datum: JsonMap,
    },
    /// A datum was removed.
    ItemRemoved {
        /// Where the datum used to live.
        indexes: IndexesPath,
        /// The removed datum.
        datum: ItemDatum,
    },
    /// A top-level data field changed.
    DataUpdated {
        /// Field name.
        key: String,
        /// New value (`null` when the field was cleared).
        value: Value,
    },
    /// Element props were merged through role addressing.
    ElementUpdated {
        /// The scene node whose data was updated.
        element: NodeId,
        /// The merged props.
        props: JsonMap,
    },
    /// The options object was patched.
    OptionsUpdated {
        /// Top-level keys present in the patch.
        keys: Vec<String>,
    },
}

impl DataEvent {
    fn description(&self) -> String {
        match self {
            DataEvent::ItemAdded { indexes, .. } => format!("Item added at [{}]", indexes),
            DataEvent::ItemUpdated { indexes, .. } => format!("Item updated at [{}]", indexes),
            DataEvent::ItemRemoved { indexes, .. } => format!("Item removed at [{}]", indexes),
            DataEvent::DataUpdated { key, .. } => format!("Data field '{}' updated", key),
            DataEvent::ElementUpdated { element, .. } => format!("Element {} updated", element),
            DataEvent::OptionsUpdated { keys } => format!("Options updated: {}", keys.join(", ")),
        }
    }
}

/// How much of the options object a generic diff event covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionsChangeKind {
    /// Changes below `data`.
    Data,
    /// The whole configuration object was replaced.
    Whole,
}

/// Generic diff events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OptionsEvent {
    /// Options changed.
    Changed {
        /// Scope of the change.
        kind: OptionsChangeKind,
        /// Normalized diffs, in application order.
        changes: Vec<DiffDescriptor>,
    },
}

impl OptionsEvent {
    /// Builds the generic event carrying a single diff.
    pub fn single(change: DiffDescriptor) -> Self {
        let kind = if change.is_whole_options() {
            OptionsChangeKind::Whole
        } else {
            OptionsChangeKind::Data
        };
        OptionsEvent::Changed {
            kind,
            changes: vec![change],
        }
    }

    fn description(&self) -> String {
        match self {
            OptionsEvent::Changed { changes, .. } => {
                let parts: Vec<String> = changes.iter().map(|c| c.to_string()).collect();
                format!("Options changed: {}", parts.join("; "))
            }
        }
    }
}
