//! Reversible editing commands.
//!
//! Each command carries its forward payload and captures the data needed to
//! invert it the first time it is applied. Attribute maps are held by value,
//! so a command keeps working after its target node left the rendered tree;
//! only a destroyed node makes it fail.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use infokit_core::{
    CommandError, EditorEvent, EventBus, GeometryEvent, IndexesPath, InfographicOptions,
    ItemDatum, JsonMap, NodeId,
};

use crate::scene::{SceneGraph, GEOMETRY_KEYS};
use crate::state::{ElementAddress, StateManager};

/// Everything a command may mutate: the rendered scene and the data tree.
#[derive(Debug)]
pub struct Document {
    pub scene: SceneGraph,
    pub state: StateManager,
}

impl Document {
    pub fn new(options: InfographicOptions, bus: Arc<EventBus>) -> Self {
        Self {
            scene: SceneGraph::new(),
            state: StateManager::new(options, bus),
        }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        self.state.bus()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorCommand {
    UpdateAttributes(UpdateAttributes),
    AddItem(AddItem),
    RemoveItem(RemoveItem),
    UpdateItem(UpdateItem),
    UpdateData(UpdateData),
    UpdateElement(UpdateElement),
    UpdateOptions(UpdateOptions),
    Batch(Batch),
}

/// Sets rendering attributes on a scene node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAttributes {
    pub node: NodeId,
    pub modified: JsonMap,
    /// Values to restore on undo. Captured on first apply unless supplied.
    #[serde(default)]
    pub original: Option<JsonMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddItem {
    pub indexes: IndexesPath,
    pub datum: ItemDatum,
    /// False when the last apply hit a stale path.
    #[serde(default)]
    pub applied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub indexes: IndexesPath,
    /// Some once applied, taken back on undo.
    #[serde(default)]
    pub removed: Option<ItemDatum>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateItem {
    pub indexes: IndexesPath,
    pub patch: JsonMap,
    #[serde(default)]
    pub previous: Option<JsonMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateData {
    pub key: String,
    pub value: Value,
    #[serde(default)]
    pub previous: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateElement {
    pub element: ElementAddress,
    pub props: JsonMap,
    #[serde(default)]
    pub previous: Option<JsonMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOptions {
    pub patch: JsonMap,
    #[serde(default)]
    pub previous: Option<JsonMap>,
}

/// Several commands forming one undo unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub name: String,
    pub commands: Vec<EditorCommand>,
}

impl EditorCommand {
    pub fn update_attributes(node: NodeId, modified: JsonMap) -> Self {
        EditorCommand::UpdateAttributes(UpdateAttributes {
            node,
            modified,
            original: None,
        })
    }

    /// Attribute update whose "before" state was captured by the caller,
    /// e.g. a drag that already moved the node live.
    pub fn update_attributes_from(node: NodeId, original: JsonMap, modified: JsonMap) -> Self {
        EditorCommand::UpdateAttributes(UpdateAttributes {
            node,
            modified,
            original: Some(original),
        })
    }

    pub fn add_item(indexes: impl Into<IndexesPath>, datum: ItemDatum) -> Self {
        EditorCommand::AddItem(AddItem {
            indexes: indexes.into(),
            datum,
            applied: false,
        })
    }

    pub fn remove_item(indexes: impl Into<IndexesPath>) -> Self {
        EditorCommand::RemoveItem(RemoveItem {
            indexes: indexes.into(),
            removed: None,
        })
    }

    pub fn update_item(indexes: impl Into<IndexesPath>, patch: JsonMap) -> Self {
        EditorCommand::UpdateItem(UpdateItem {
            indexes: indexes.into(),
            patch,
            previous: None,
        })
    }

    pub fn update_data(key: impl Into<String>, value: Value) -> Self {
        EditorCommand::UpdateData(UpdateData {
            key: key.into(),
            value,
            previous: None,
        })
    }

    pub fn update_element(element: ElementAddress, props: JsonMap) -> Self {
        EditorCommand::UpdateElement(UpdateElement {
            element,
            props,
            previous: None,
        })
    }

    pub fn update_options(patch: JsonMap) -> Self {
        EditorCommand::UpdateOptions(UpdateOptions {
            patch,
            previous: None,
        })
    }

    pub fn batch(name: impl Into<String>, commands: Vec<EditorCommand>) -> Self {
        EditorCommand::Batch(Batch {
            name: name.into(),
            commands,
        })
    }

    /// Display name for history UI.
    pub fn name(&self) -> &str {
        match self {
            EditorCommand::UpdateAttributes(_) => "Update Attributes",
            EditorCommand::AddItem(_) => "Add Item",
            EditorCommand::RemoveItem(_) => "Remove Item",
            EditorCommand::UpdateItem(_) => "Update Item",
            EditorCommand::UpdateData(_) => "Update Data",
            EditorCommand::UpdateElement(_) => "Update Element",
            EditorCommand::UpdateOptions(_) => "Update Options",
            EditorCommand::Batch(cmd) => &cmd.name,
        }
    }

    pub fn apply(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        match self {
            EditorCommand::UpdateAttributes(cmd) => {
                let previous = doc
                    .scene
                    .set_attributes(cmd.node, &cmd.modified)
                    .ok_or(CommandError::NodeDestroyed(cmd.node.raw()))?;
                if cmd.original.is_none() {
                    cmd.original = Some(previous);
                }
                notify_geometry(doc, cmd.node, &cmd.modified);
            }
            EditorCommand::AddItem(cmd) => {
                cmd.applied = doc.state.add_item_datum(&cmd.indexes, cmd.datum.clone());
            }
            EditorCommand::RemoveItem(cmd) => {
                cmd.removed = doc.state.remove_item_datum(&cmd.indexes);
            }
            EditorCommand::UpdateItem(cmd) => {
                cmd.previous = doc.state.update_item_datum(&cmd.indexes, &cmd.patch)?;
            }
            EditorCommand::UpdateData(cmd) => {
                cmd.previous = Some(doc.state.update_data(&cmd.key, cmd.value.clone())?);
            }
            EditorCommand::UpdateElement(cmd) => {
                cmd.previous = doc.state.update_element(&cmd.element, &cmd.props)?;
            }
            EditorCommand::UpdateOptions(cmd) => {
                cmd.previous = Some(doc.state.update_options(&cmd.patch)?);
            }
            EditorCommand::Batch(cmd) => cmd.apply(doc)?,
        }
        Ok(())
    }

    pub fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        match self {
            EditorCommand::UpdateAttributes(cmd) => {
                if let Some(original) = &cmd.original {
                    doc.scene
                        .set_attributes(cmd.node, original)
                        .ok_or(CommandError::NodeDestroyed(cmd.node.raw()))?;
                    notify_geometry(doc, cmd.node, original);
                }
            }
            EditorCommand::AddItem(cmd) => {
                if std::mem::take(&mut cmd.applied) {
                    doc.state.remove_item_datum(&cmd.indexes);
                }
            }
            EditorCommand::RemoveItem(cmd) => {
                if let Some(datum) = cmd.removed.take() {
                    doc.state.add_item_datum(&cmd.indexes, datum);
                }
            }
            EditorCommand::UpdateItem(cmd) => {
                if let Some(previous) = &cmd.previous {
                    doc.state.update_item_datum(&cmd.indexes, previous)?;
                }
            }
            EditorCommand::UpdateData(cmd) => {
                if let Some(previous) = &cmd.previous {
                    doc.state.update_data(&cmd.key, previous.clone())?;
                }
            }
            EditorCommand::UpdateElement(cmd) => {
                if let Some(previous) = &cmd.previous {
                    doc.state.update_element(&cmd.element, previous)?;
                }
            }
            EditorCommand::UpdateOptions(cmd) => {
                if let Some(previous) = &cmd.previous {
                    doc.state.update_options(previous)?;
                }
            }
            EditorCommand::Batch(cmd) => cmd.undo(doc)?,
        }
        Ok(())
    }
}

impl Batch {
    /// Applies every command in order. On failure the commands already
    /// applied are undone in reverse order before the error is returned.
    fn apply(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        for index in 0..self.commands.len() {
            let result = self.commands[index].apply(doc);
            if let Err(source) = result {
                let name = self.commands[index].name().to_string();
                tracing::warn!(
                    "Batch '{}' failed at command {} ('{}'): {}; rolling back",
                    self.name,
                    index,
                    name,
                    source
                );
                for (undo_index, cmd) in self.commands[..index].iter_mut().enumerate().rev() {
                    cmd.undo(doc).map_err(|e| CommandError::RollbackFailed {
                        index: undo_index,
                        source: Box::new(e),
                    })?;
                }
                return Err(CommandError::BatchFailed {
                    index,
                    name,
                    source: Box::new(source),
                });
            }
        }
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        for cmd in self.commands.iter_mut().rev() {
            cmd.undo(doc)?;
        }
        Ok(())
    }
}

fn notify_geometry(doc: &Document, node: NodeId, patch: &JsonMap) {
    if GEOMETRY_KEYS.iter().any(|key| patch.contains_key(*key)) {
        doc.bus()
            .publish(EditorEvent::Geometry(GeometryEvent::Changed { target: node }));
    }
}
