//! # Infokit Core
//!
//! Core types shared by the Infokit editing kernel.
//! Provides the data model of infographic documents, structured addressing
//! (indexes paths and element roles), diff descriptors, error types and the
//! typed event bus.

pub mod data;
pub mod diff;
pub mod error;
pub mod event_bus;
pub mod types;

pub use data::{
    merge_entry, merge_fields, merge_object, Data, ElementRole, FieldUpdate, IndexesPath,
    InfographicOptions, ItemDatum, JsonMap, MergeFields, Padding,
};

pub use diff::{DiffDescriptor, DiffOp, ITEMS_PATH};

pub use error::{AddressError, CommandError, Error, InteractionError, Result, StateError};

// Re-export event bus for convenience
pub use event_bus::{
    DataEvent, EditorEvent, EventBus, EventBusConfig, EventCategory, EventFilter, GeometryEvent,
    HistoryEvent, OptionsChangeKind, OptionsEvent, SelectionEvent, SubscriptionId,
};

pub use types::NodeId;
