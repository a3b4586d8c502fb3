//! StateManager: owner and sole mutator of the authoritative data tree.
//!
//! Every mutating call that takes effect publishes exactly one specific
//! [`DataEvent`] followed by exactly one generic [`OptionsEvent`] carrying
//! the normalized [`DiffDescriptor`]. Stale or malformed addresses are
//! logged no-ops and publish nothing: the scene graph may lag one tick
//! behind the data tree during a batched mutation.

mod address;

pub use address::{resolve_element_path, ElementAddress, ElementPath};

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use infokit_core::{
    merge_entry, merge_fields, Data, DataEvent, DiffDescriptor, EditorEvent, EventBus,
    IndexesPath, InfographicOptions, ItemDatum, JsonMap, OptionsEvent, StateError, ITEMS_PATH,
};

/// Owns the options object (and with it the data tree).
#[derive(Debug)]
pub struct StateManager {
    options: InfographicOptions,
    view_padding: [f64; 4],
    bus: Arc<EventBus>,
}

impl StateManager {
    pub fn new(options: InfographicOptions, bus: Arc<EventBus>) -> Self {
        let view_padding = derive_padding(&options);
        Self {
            options,
            view_padding,
            bus,
        }
    }

    pub fn options(&self) -> &InfographicOptions {
        &self.options
    }

    pub fn data(&self) -> &Data {
        &self.options.data
    }

    pub fn item(&self, indexes: &IndexesPath) -> Option<&ItemDatum> {
        self.options.data.item(indexes)
    }

    /// Padding (top, right, bottom, left) derived from the options.
    pub fn view_padding(&self) -> [f64; 4] {
        self.view_padding
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Inserts `datum` at `indexes`, shifting later siblings.
    ///
    /// Returns `false` (and publishes nothing) for a stale path.
    pub fn add_item_datum(&mut self, indexes: &IndexesPath, datum: ItemDatum) -> bool {
        let event_datum = datum.clone();
        if self.options.data.insert_item(indexes, datum).is_err() {
            tracing::warn!("add_item_datum: stale indexes [{}], ignored", indexes);
            return false;
        }

        let value = Value::Array(vec![to_json(&event_datum)]);
        self.emit(
            DataEvent::ItemAdded {
                indexes: indexes.clone(),
                datum: event_datum,
            },
            DiffDescriptor::add(ITEMS_PATH, Some(indexes.clone()), value),
        );
        true
    }

    /// Shallow-merges `partial` into the datum at `indexes`.
    ///
    /// Returns the overwritten values, `None` for a stale path.
    pub fn update_item_datum(
        &mut self,
        indexes: &IndexesPath,
        partial: &JsonMap,
    ) -> Result<Option<JsonMap>, StateError> {
        let Some(item) = self.options.data.item_mut(indexes) else {
            tracing::warn!("update_item_datum: stale indexes [{}], ignored", indexes);
            return Ok(None);
        };
        let path = format!("data.items[{}]", indexes);
        let previous = merge_fields(item, partial, &path)?;

        self.emit(
            DataEvent::ItemUpdated {
                indexes: indexes.clone(),
                datum: partial.clone(),
            },
            DiffDescriptor::update(
                ITEMS_PATH,
                Some(indexes.clone()),
                Value::Object(partial.clone()),
            ),
        );
        Ok(Some(previous))
    }

    /// Removes and returns the datum at `indexes`, `None` for a stale path.
    pub fn remove_item_datum(&mut self, indexes: &IndexesPath) -> Option<ItemDatum> {
        let Some(removed) = self.options.data.remove_item(indexes) else {
            tracing::warn!("remove_item_datum: stale indexes [{}], ignored", indexes);
            return None;
        };

        let value = to_json(&removed);
        self.emit(
            DataEvent::ItemRemoved {
                indexes: indexes.clone(),
                datum: removed.clone(),
            },
            DiffDescriptor::remove(ITEMS_PATH, Some(indexes.clone()), value),
        );
        Some(removed)
    }

    /// Sets a top-level data field and returns its previous value.
    ///
    /// A `null` value clears the field.
    pub fn update_data(&mut self, key: &str, value: Value) -> Result<Value, StateError> {
        let path = format!("data.{}", key);
        let mut patch = JsonMap::new();
        patch.insert(key.to_string(), value.clone());
        let mut previous = merge_fields(&mut self.options.data, &patch, &path)?;

        self.emit(
            DataEvent::DataUpdated {
                key: key.to_string(),
                value: value.clone(),
            },
            DiffDescriptor::update(path, None, value),
        );
        Ok(previous.remove(key).unwrap_or(Value::Null))
    }

    /// Merges element props at the data location the element's role and
    /// indexes resolve to.
    ///
    /// Returns the overwritten props, `None` when the address does not
    /// resolve (unknown item, item role without indexes).
    pub fn update_element(
        &mut self,
        element: &ElementAddress,
        props: &JsonMap,
    ) -> Result<Option<JsonMap>, StateError> {
        let Some(path) = element.resolve() else {
            tracing::warn!(
                "update_element: {} ({}) has no data location, ignored",
                element.node,
                element.role
            );
            return Ok(None);
        };
        let path_str = path.to_string();

        let attributes = match &path {
            ElementPath::Item { indexes, .. } => match self.options.data.item_mut(indexes) {
                Some(item) => &mut item.attributes,
                None => {
                    tracing::warn!("update_element: stale path {}, ignored", path_str);
                    return Ok(None);
                }
            },
            ElementPath::Data { .. } => &mut self.options.data.attributes,
        };
        let previous = merge_entry(attributes, path.key(), props, &path_str)?;

        self.emit(
            DataEvent::ElementUpdated {
                element: element.node,
                props: props.clone(),
            },
            DiffDescriptor::update(
                path_str,
                path.indexes().cloned(),
                Value::Object(props.clone()),
            ),
        );
        Ok(Some(previous))
    }

    /// Merges `patch` into the whole options object.
    ///
    /// Re-derives the view padding when the patch touches non-data fields.
    /// Returns the overwritten top-level values.
    pub fn update_options(&mut self, patch: &JsonMap) -> Result<JsonMap, StateError> {
        let previous = merge_fields(&mut self.options, patch, "options")?;

        if patch.keys().any(|key| key != "data") {
            self.view_padding = derive_padding(&self.options);
            tracing::debug!("View padding re-derived: {:?}", self.view_padding);
        }

        self.emit(
            DataEvent::OptionsUpdated {
                keys: patch.keys().cloned().collect(),
            },
            DiffDescriptor::replace_options(Value::Object(patch.clone())),
        );
        Ok(previous)
    }

    /// Publishes the specific event, then the generic diff.
    fn emit(&self, specific: DataEvent, change: DiffDescriptor) {
        tracing::debug!("State change: {}", change);
        self.bus.publish(EditorEvent::Data(specific));
        self.bus
            .publish(EditorEvent::Options(OptionsEvent::single(change)));
    }
}

fn derive_padding(options: &InfographicOptions) -> [f64; 4] {
    options.padding.map(|p| p.sides()).unwrap_or([0.0; 4])
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
