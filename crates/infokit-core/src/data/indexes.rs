//! Indexes paths: structured addresses into the item tree.
//!
//! Scene nodes carry their indexes as a comma-joined string (`"1,0"`). The
//! string form is parsed exactly once, when a node enters the scene graph;
//! everything past that boundary works with [`IndexesPath`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AddressError;

/// Ordered child positions descending from the root items list.
///
/// `[1, 0]` is the first child of the second root item. A path is only an
/// address: inserting or removing a shallower sibling makes it point
/// somewhere else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexesPath(Vec<usize>);

impl IndexesPath {
    /// Creates a path from raw indexes.
    pub fn new(indexes: Vec<usize>) -> Self {
        Self(indexes)
    }

    /// The root path (addresses the items list itself, never a datum).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parses the comma-joined form used on rendered nodes.
    ///
    /// Whitespace around segments is ignored and an empty string yields the
    /// root path.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        trimmed
            .split(',')
            .map(|segment| {
                segment
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| AddressError::MalformedIndexes {
                        input: input.to_string(),
                        segment: segment.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Position of the addressed datum inside its parent's child list.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Path of the parent datum, or `None` for the root path.
    pub fn parent(&self) -> Option<IndexesPath> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Path of the `index`-th child of this datum.
    pub fn child(&self, index: usize) -> IndexesPath {
        let mut indexes = self.0.clone();
        indexes.push(index);
        Self(indexes)
    }
}

impl FromStr for IndexesPath {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for IndexesPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}

impl From<Vec<usize>> for IndexesPath {
    fn from(indexes: Vec<usize>) -> Self {
        Self(indexes)
    }
}

impl From<&[usize]> for IndexesPath {
    fn from(indexes: &[usize]) -> Self {
        Self(indexes.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for IndexesPath {
    fn from(indexes: [usize; N]) -> Self {
        Self(indexes.to_vec())
    }
}
