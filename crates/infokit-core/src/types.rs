//! Identity types shared between the scene graph, selection and events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a scene node.
///
/// IDs are handed out by the scene arena and never reused, so selection
/// and commands can refer to a node whether or not it is currently part of
/// the rendered tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
