//! Diff descriptors: normalized records of one state change.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::data::IndexesPath;

/// Logical path of the items list.
pub const ITEMS_PATH: &str = "data.items";

/// Kind of change a diff describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffOp {
    Add,
    Update,
    Remove,
}

impl fmt::Display for DiffOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffOp::Add => write!(f, "add"),
            DiffOp::Update => write!(f, "update"),
            DiffOp::Remove => write!(f, "remove"),
        }
    }
}

/// `{op, path, indexes?, value}`.
///
/// `path` is a readable logical address such as `data.items`,
/// `data.title` or `data.attributes.title`; the empty path means the whole
/// options object was replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffDescriptor {
    pub op: DiffOp,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexes: Option<IndexesPath>,
    pub value: Value,
}

impl DiffDescriptor {
    pub fn add(path: impl Into<String>, indexes: Option<IndexesPath>, value: Value) -> Self {
        Self {
            op: DiffOp::Add,
            path: path.into(),
            indexes,
            value,
        }
    }

    pub fn update(path: impl Into<String>, indexes: Option<IndexesPath>, value: Value) -> Self {
        Self {
            op: DiffOp::Update,
            path: path.into(),
            indexes,
            value,
        }
    }

    pub fn remove(path: impl Into<String>, indexes: Option<IndexesPath>, value: Value) -> Self {
        Self {
            op: DiffOp::Remove,
            path: path.into(),
            indexes,
            value,
        }
    }

    /// Whole-options replacement.
    pub fn replace_options(value: Value) -> Self {
        Self::update("", None, value)
    }

    /// Whether this diff replaces the whole options object.
    pub fn is_whole_options(&self) -> bool {
        self.path.is_empty()
    }
}

impl fmt::Display for DiffDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "<options>" } else { &self.path };
        match &self.indexes {
            Some(indexes) => write!(f, "{} {} [{}]", self.op, path, indexes),
            None => write!(f, "{} {}", self.op, path),
        }
    }
}
