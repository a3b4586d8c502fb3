//! Shallow JSON merges that can be inverted.
//!
//! Every merge returns the values it overwrote, keyed like the patch. Keys
//! that were absent are reported as `null`; merging a `null` removes the key,
//! so merging the returned map back restores the original value exactly.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{Data, InfographicOptions, ItemDatum};
use crate::error::StateError;

/// Free-form JSON object.
pub type JsonMap = Map<String, Value>;

/// A validated field write. Applying it returns the JSON form of the value it
/// replaced.
pub type FieldUpdate<T> = Box<dyn FnOnce(&mut T) -> Value>;

/// Typed values whose top-level fields can be merged from a JSON patch.
///
/// Each patch key is decoded into its own field type; fields the patch does
/// not name are never serialized or rebuilt.
pub trait MergeFields: Sized + 'static {
    /// Decodes `value` for the field `key`, or explains why it does not fit.
    fn field_update(key: &str, value: &Value) -> Result<FieldUpdate<Self>, String>;
}

/// Merges `patch` into a raw JSON object and returns the overwritten values.
pub fn merge_object(target: &mut JsonMap, patch: &JsonMap) -> JsonMap {
    let mut previous = JsonMap::with_capacity(patch.len());
    for (key, value) in patch {
        previous.insert(key.clone(), replace_entry(target, key.clone(), value.clone()));
    }
    previous
}

/// Merges `patch` into the top-level fields of a typed value.
///
/// Every key is decoded before any is written; if one does not fit its field
/// the target is left untouched and [`StateError::InvalidPatch`] is returned.
pub fn merge_fields<T: MergeFields>(
    target: &mut T,
    patch: &JsonMap,
    path: &str,
) -> Result<JsonMap, StateError> {
    let updates = patch
        .iter()
        .map(|(key, value)| {
            T::field_update(key, value)
                .map(|update| (key, update))
                .map_err(|reason| StateError::InvalidPatch {
                    path: path.to_string(),
                    reason: format!("{}: {}", key, reason),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut previous = JsonMap::with_capacity(updates.len());
    for (key, update) in updates {
        previous.insert(key.clone(), update(&mut *target));
    }
    Ok(previous)
}

/// Merges `props` into the object stored under `key` of an attribute map.
///
/// Missing entries are created; entries left empty by the merge are removed
/// so an undo leaves no trace behind.
pub fn merge_entry(
    attributes: &mut JsonMap,
    key: &str,
    props: &JsonMap,
    path: &str,
) -> Result<JsonMap, StateError> {
    let entry = attributes
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(JsonMap::new()));
    let Value::Object(object) = entry else {
        return Err(StateError::NotAnObject {
            path: path.to_string(),
        });
    };
    let previous = merge_object(object, props);
    if object.is_empty() {
        attributes.remove(key);
    }
    Ok(previous)
}

fn replace_entry(target: &mut JsonMap, key: String, value: Value) -> Value {
    let old = if value.is_null() {
        target.remove(&key)
    } else {
        target.insert(key, value)
    };
    old.unwrap_or(Value::Null)
}

fn decode<F: DeserializeOwned>(value: &Value) -> Result<F, String> {
    F::deserialize(value).map_err(|e| e.to_string())
}

/// Like [`decode`], but `null` clears the field to its default.
fn decode_or_default<F: DeserializeOwned + Default>(value: &Value) -> Result<F, String> {
    if value.is_null() {
        Ok(F::default())
    } else {
        decode(value)
    }
}

fn previous_json<F: Serialize>(old: &F) -> Value {
    serde_json::to_value(old).unwrap_or(Value::Null)
}

/// Builds the write for one named field.
macro_rules! field_update {
    ($ty:ty, $field:ident, $new:expr) => {{
        let new = $new;
        Box::new(move |target: &mut $ty| {
            previous_json(&std::mem::replace(&mut target.$field, new))
        }) as FieldUpdate<$ty>
    }};
}

/// Builds the write for a key kept in the `extra` map.
macro_rules! extra_update {
    ($ty:ty, $key:expr, $value:expr) => {{
        let key = $key.to_string();
        let value = $value.clone();
        Box::new(move |target: &mut $ty| replace_entry(&mut target.extra, key, value))
            as FieldUpdate<$ty>
    }};
}

impl MergeFields for ItemDatum {
    fn field_update(key: &str, value: &Value) -> Result<FieldUpdate<Self>, String> {
        Ok(match key {
            "label" => field_update!(ItemDatum, label, decode(value)?),
            "desc" => field_update!(ItemDatum, desc, decode(value)?),
            "value" => field_update!(ItemDatum, value, decode(value)?),
            "icon" => field_update!(ItemDatum, icon, decode(value)?),
            "illus" => field_update!(ItemDatum, illus, decode(value)?),
            "attributes" => field_update!(ItemDatum, attributes, decode_or_default(value)?),
            "children" => field_update!(ItemDatum, children, decode_or_default(value)?),
            _ => extra_update!(ItemDatum, key, value),
        })
    }
}

impl MergeFields for Data {
    fn field_update(key: &str, value: &Value) -> Result<FieldUpdate<Self>, String> {
        Ok(match key {
            "title" => field_update!(Data, title, decode(value)?),
            "desc" => field_update!(Data, desc, decode(value)?),
            "items" => field_update!(Data, items, decode_or_default(value)?),
            "attributes" => field_update!(Data, attributes, decode_or_default(value)?),
            _ => extra_update!(Data, key, value),
        })
    }
}

impl MergeFields for InfographicOptions {
    fn field_update(key: &str, value: &Value) -> Result<FieldUpdate<Self>, String> {
        Ok(match key {
            "width" => field_update!(InfographicOptions, width, decode(value)?),
            "height" => field_update!(InfographicOptions, height, decode(value)?),
            "padding" => field_update!(InfographicOptions, padding, decode(value)?),
            "theme" => field_update!(InfographicOptions, theme, decode(value)?),
            "data" => field_update!(InfographicOptions, data, decode_or_default(value)?),
            _ => extra_update!(InfographicOptions, key, value),
        })
    }
}
