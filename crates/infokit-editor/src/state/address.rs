//! Address resolution between rendered nodes and the data tree.

use serde::{Deserialize, Serialize};
use std::fmt;

use infokit_core::{ElementRole, IndexesPath, NodeId};

/// Role + indexes read off a scene node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementAddress {
    pub node: NodeId,
    pub role: ElementRole,
    pub indexes: Option<IndexesPath>,
}

impl ElementAddress {
    /// Logical data location of this element.
    pub fn resolve(&self) -> Option<ElementPath> {
        resolve_element_path(self.role, self.indexes.as_ref())
    }
}

/// Data-tree location of an element's props.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementPath {
    /// `data.items[<indexes>].attributes.<key>`
    Item {
        indexes: IndexesPath,
        key: &'static str,
    },
    /// `data.attributes.<key>`
    Data { key: &'static str },
}

impl ElementPath {
    pub fn key(&self) -> &'static str {
        match self {
            ElementPath::Item { key, .. } | ElementPath::Data { key } => *key,
        }
    }

    pub fn indexes(&self) -> Option<&IndexesPath> {
        match self {
            ElementPath::Item { indexes, .. } => Some(indexes),
            ElementPath::Data { .. } => None,
        }
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementPath::Item { indexes, key } => {
                write!(f, "data.items[{}].attributes.{}", indexes, key)
            }
            ElementPath::Data { key } => write!(f, "data.attributes.{}", key),
        }
    }
}

/// Maps a role and optional indexes to the one data location they denote.
///
/// Item-scoped roles need a non-empty indexes path; without one the address
/// is malformed and resolves to nothing. Other roles ignore indexes.
pub fn resolve_element_path(role: ElementRole, indexes: Option<&IndexesPath>) -> Option<ElementPath> {
    if role.is_item_scoped() {
        match indexes {
            Some(indexes) if !indexes.is_root() => Some(ElementPath::Item {
                indexes: indexes.clone(),
                key: role.attribute_key(),
            }),
            _ => None,
        }
    } else {
        Some(ElementPath::Data {
            key: role.attribute_key(),
        })
    }
}
