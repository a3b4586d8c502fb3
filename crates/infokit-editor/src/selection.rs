//! Selection state.

use std::collections::HashSet;
use std::sync::Arc;

use infokit_core::{EditorEvent, EventBus, NodeId, SelectionEvent};

/// How `select` combines the new nodes with the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Discard the prior selection.
    #[default]
    Replace,
    /// Append nodes not already selected.
    Add,
}

/// Ordered set of selected scene nodes.
///
/// # Selection Model
///
/// - Membership is unique; order is first-seen order.
/// - `Changed { prev, next }` is published only when the membership set
///   actually differs. A replace with the same members in another order
///   keeps the prior order and publishes nothing.
/// - Nodes leaving the rendered tree must be pruned through
///   [`SelectionModel::remove_nodes`].
#[derive(Debug)]
pub struct SelectionModel {
    nodes: Vec<NodeId>,
    bus: Arc<EventBus>,
}

impl SelectionModel {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            nodes: Vec::new(),
            bus,
        }
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// First selected node.
    pub fn primary(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns whether the selection changed.
    pub fn select(&mut self, nodes: &[NodeId], mode: SelectionMode) -> bool {
        let mut next = match mode {
            SelectionMode::Replace => Vec::with_capacity(nodes.len()),
            SelectionMode::Add => self.nodes.clone(),
        };
        for node in nodes {
            if !next.contains(node) {
                next.push(*node);
            }
        }
        self.commit(next)
    }

    /// Empties the selection. Returns whether it was non-empty.
    pub fn clear(&mut self) -> bool {
        self.commit(Vec::new())
    }

    /// Adds `node` if absent, removes it otherwise.
    pub fn toggle(&mut self, node: NodeId) -> bool {
        let mut next = self.nodes.clone();
        match next.iter().position(|n| *n == node) {
            Some(pos) => {
                next.remove(pos);
            }
            None => next.push(node),
        }
        self.commit(next)
    }

    /// Drops nodes that left the rendered tree.
    pub fn remove_nodes(&mut self, removed: &[NodeId]) -> bool {
        if removed.is_empty() {
            return false;
        }
        let removed: HashSet<NodeId> = removed.iter().copied().collect();
        let next = self
            .nodes
            .iter()
            .copied()
            .filter(|n| !removed.contains(n))
            .collect();
        self.commit(next)
    }

    fn commit(&mut self, next: Vec<NodeId>) -> bool {
        if same_members(&self.nodes, &next) {
            return false;
        }
        let prev = std::mem::replace(&mut self.nodes, next);
        tracing::debug!("Selection {} -> {} nodes", prev.len(), self.nodes.len());
        self.bus.publish(EditorEvent::Selection(SelectionEvent::Changed {
            prev,
            next: self.nodes.clone(),
        }));
        true
    }
}

fn same_members(a: &[NodeId], b: &[NodeId]) -> bool {
    a.len() == b.len() && a.iter().all(|n| b.contains(n))
}
