//! Data model for infographic documents.
//!
//! Provides:
//! - [`ItemDatum`]: one node of the item tree
//! - [`Data`]: the top-level data object (title, description, items)
//! - [`InfographicOptions`]: the whole configuration handed to the renderer
//! - Addressing types ([`IndexesPath`], [`ElementRole`]) and invertible merges

mod indexes;
mod merge;
mod role;

pub use indexes::IndexesPath;
pub use merge::{merge_entry, merge_fields, merge_object, FieldUpdate, JsonMap, MergeFields};
pub use role::ElementRole;

use serde::{Deserialize, Serialize};

/// One datum of the item tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDatum {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub illus: Option<String>,
    /// Per-role element props, keyed by [`ElementRole::attribute_key`].
    #[serde(default, skip_serializing_if = "JsonMap::is_empty")]
    pub attributes: JsonMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ItemDatum>,
    /// Fields the kernel does not interpret.
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl ItemDatum {
    /// Creates a datum with only a label.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_children(mut self, children: Vec<ItemDatum>) -> Self {
        self.children = children;
        self
    }
}

/// Top-level data object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Data {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default)]
    pub items: Vec<ItemDatum>,
    /// Per-role element props for non-item roles.
    #[serde(default, skip_serializing_if = "JsonMap::is_empty")]
    pub attributes: JsonMap,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl Data {
    pub fn with_items(items: Vec<ItemDatum>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    /// Returns the datum at `indexes`, or `None` if the path is stale.
    pub fn item(&self, indexes: &IndexesPath) -> Option<&ItemDatum> {
        let (first, rest) = indexes.as_slice().split_first()?;
        let mut node = self.items.get(*first)?;
        for index in rest {
            node = node.children.get(*index)?;
        }
        Some(node)
    }

    /// Mutable variant of [`Data::item`].
    pub fn item_mut(&mut self, indexes: &IndexesPath) -> Option<&mut ItemDatum> {
        let (first, rest) = indexes.as_slice().split_first()?;
        let mut node = self.items.get_mut(*first)?;
        for index in rest {
            node = node.children.get_mut(*index)?;
        }
        Some(node)
    }

    /// Child list that holds the datum addressed by `indexes`.
    fn sibling_list_mut(&mut self, indexes: &IndexesPath) -> Option<&mut Vec<ItemDatum>> {
        let parent = indexes.parent()?;
        if parent.is_root() {
            return Some(&mut self.items);
        }
        self.item_mut(&parent).map(|node| &mut node.children)
    }

    /// Inserts `datum` so that it ends up at `indexes`, shifting later siblings.
    ///
    /// Gives the datum back if the parent does not exist or the position is
    /// past the end of the sibling list.
    pub fn insert_item(&mut self, indexes: &IndexesPath, datum: ItemDatum) -> Result<(), ItemDatum> {
        let Some(position) = indexes.last() else {
            return Err(datum);
        };
        match self.sibling_list_mut(indexes) {
            Some(siblings) if position <= siblings.len() => {
                siblings.insert(position, datum);
                Ok(())
            }
            _ => Err(datum),
        }
    }

    /// Removes and returns the datum at `indexes`.
    pub fn remove_item(&mut self, indexes: &IndexesPath) -> Option<ItemDatum> {
        let position = indexes.last()?;
        let siblings = self.sibling_list_mut(indexes)?;
        if position < siblings.len() {
            Some(siblings.remove(position))
        } else {
            None
        }
    }

    /// Total number of datums in the tree.
    pub fn item_count(&self) -> usize {
        fn count(items: &[ItemDatum]) -> usize {
            items.iter().map(|item| 1 + count(&item.children)).sum()
        }
        count(&self.items)
    }
}

/// Padding around the rendered structure, in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Padding {
    Uniform(f64),
    /// Vertical, horizontal.
    Axis([f64; 2]),
    /// Top, right, bottom, left.
    Sides([f64; 4]),
}

impl Padding {
    /// Expands to top, right, bottom, left.
    pub fn sides(&self) -> [f64; 4] {
        match *self {
            Padding::Uniform(p) => [p, p, p, p],
            Padding::Axis([v, h]) => [v, h, v, h],
            Padding::Sides(sides) => sides,
        }
    }
}

impl Default for Padding {
    fn default() -> Self {
        Padding::Uniform(0.0)
    }
}

/// The whole configuration object handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfographicOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Padding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default)]
    pub data: Data,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl InfographicOptions {
    pub fn with_data(data: Data) -> Self {
        Self {
            data,
            ..Default::default()
        }
    }
}
