//! Scene graph arena.
//!
//! Rendered nodes are stored in an arena keyed by [`NodeId`]. Selection,
//! commands and addressing hold IDs, never node references, so a node can
//! leave the rendered tree (detach) and come back without invalidating
//! anything that points at it. Only [`SceneGraph::destroy`] frees a node.
//!
//! The role tag and comma-joined indexes string written on rendered nodes
//! are parsed once, in [`SceneGraph::insert_from_attrs`].

mod geometry;

pub use geometry::{Bounds, Point};

use serde_json::Value;
use std::collections::HashMap;

use infokit_core::{merge_object, AddressError, ElementRole, IndexesPath, JsonMap, NodeId};

use crate::state::ElementAddress;

/// Attribute keys that mirror a node's bounds.
pub const GEOMETRY_KEYS: [&str; 4] = ["x", "y", "width", "height"];

/// One rendered node.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub role: Option<ElementRole>,
    pub indexes: Option<IndexesPath>,
    /// Rendering attributes; always carries `x`, `y`, `width`, `height`.
    pub attributes: JsonMap,
    /// Bounds in scene-local coordinates.
    pub bounds: Bounds,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Whether the node is part of the rendered tree.
    pub attached: bool,
    pub text_editable: bool,
    pub selectable: bool,
}

impl SceneNode {
    /// Role + indexes of the node, if it represents data.
    pub fn address(&self) -> Option<ElementAddress> {
        self.role.map(|role| ElementAddress {
            node: self.id,
            role,
            indexes: self.indexes.clone(),
        })
    }
}

/// Description of a node to insert.
#[derive(Debug, Clone, Default)]
pub struct NodeSpec {
    role: Option<ElementRole>,
    indexes: Option<IndexesPath>,
    bounds: Bounds,
    attributes: JsonMap,
    text_editable: Option<bool>,
    selectable: Option<bool>,
}

impl NodeSpec {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    pub fn role(mut self, role: ElementRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn indexes(mut self, indexes: impl Into<IndexesPath>) -> Self {
        self.indexes = Some(indexes.into());
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Overrides the default (text roles are editable).
    pub fn text_editable(mut self, editable: bool) -> Self {
        self.text_editable = Some(editable);
        self
    }

    /// Overrides the default (non-decorative addressable nodes are selectable).
    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = Some(selectable);
        self
    }
}

/// Arena of rendered nodes.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
    roots: Vec<NodeId>,
    next_id: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.attached)
    }

    /// Inserts a top-level node.
    pub fn insert_root(&mut self, spec: NodeSpec) -> NodeId {
        let id = self.allocate(spec, None);
        self.roots.push(id);
        id
    }

    /// Inserts a node under `parent`; `None` if the parent does not exist.
    pub fn insert_child(&mut self, parent: NodeId, spec: NodeSpec) -> Option<NodeId> {
        let attached = self.nodes.get(&parent)?.attached;
        let id = self.allocate(spec, Some(parent));
        if let Some(node) = self.nodes.get_mut(&id) {
            node.attached = attached;
        }
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        Some(id)
    }

    /// Inserts a node described by the raw role tag and indexes string found
    /// on a rendered element.
    pub fn insert_from_attrs(
        &mut self,
        parent: Option<NodeId>,
        role_tag: Option<&str>,
        indexes: Option<&str>,
        bounds: Bounds,
    ) -> Result<Option<NodeId>, AddressError> {
        let mut spec = NodeSpec::new(bounds);
        if let Some(tag) = role_tag {
            let role: ElementRole = tag.parse()?;
            spec = spec.role(role);
            match indexes {
                Some(raw) => spec = spec.indexes(IndexesPath::parse(raw)?),
                None if role.is_item_scoped() => {
                    return Err(AddressError::MissingIndexes {
                        role: tag.to_string(),
                    })
                }
                None => {}
            }
        }
        Ok(match parent {
            Some(parent) => self.insert_child(parent, spec),
            None => Some(self.insert_root(spec)),
        })
    }

    fn allocate(&mut self, spec: NodeSpec, parent: Option<NodeId>) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);

        let mut attributes = spec.attributes;
        write_geometry(&mut attributes, &spec.bounds);

        let node = SceneNode {
            id,
            role: spec.role,
            indexes: spec.indexes,
            attributes,
            bounds: spec.bounds,
            parent,
            children: Vec::new(),
            attached: true,
            text_editable: spec
                .text_editable
                .unwrap_or_else(|| spec.role.is_some_and(|r| r.is_text())),
            selectable: spec
                .selectable
                .unwrap_or_else(|| spec.role.is_some_and(|r| !r.is_decorative())),
        };
        self.nodes.insert(id, node);
        id
    }

    /// Takes a node and its subtree out of the rendered tree.
    ///
    /// The nodes stay in the arena (commands may still restore their
    /// attributes). Returns the IDs that left the rendered tree.
    pub fn detach(&mut self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        if !node.attached {
            return Vec::new();
        }
        let parent = node.parent;
        match parent {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    parent_node.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = None;
        }

        let subtree = self.subtree(id);
        for member in &subtree {
            if let Some(node) = self.nodes.get_mut(member) {
                node.attached = false;
            }
        }
        tracing::debug!("Detached {} ({} nodes)", id, subtree.len());
        subtree
    }

    /// Puts a detached node back into the rendered tree.
    pub fn attach(&mut self, id: NodeId, parent: Option<NodeId>) -> bool {
        if !self.nodes.contains_key(&id) || self.is_attached(id) {
            return false;
        }
        match parent {
            Some(parent_id) => match self.nodes.get_mut(&parent_id) {
                Some(parent_node) if parent_node.attached => parent_node.children.push(id),
                _ => return false,
            },
            None => self.roots.push(id),
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = parent;
        }
        for member in self.subtree(id) {
            if let Some(node) = self.nodes.get_mut(&member) {
                node.attached = true;
            }
        }
        true
    }

    /// Removes a node and its subtree from the arena.
    pub fn destroy(&mut self, id: NodeId) -> Vec<NodeId> {
        if !self.nodes.contains_key(&id) {
            return Vec::new();
        }
        self.detach(id);
        let subtree = self.subtree(id);
        for member in &subtree {
            self.nodes.remove(member);
        }
        tracing::debug!("Destroyed {} ({} nodes)", id, subtree.len());
        subtree
    }

    /// The node followed by all its descendants, depth first.
    fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                out.push(current);
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Merges `patch` into a node's attributes and returns what it replaced.
    ///
    /// Works on detached nodes; `None` only when the node was destroyed.
    /// Geometry keys keep the node's bounds in sync.
    pub fn set_attributes(&mut self, id: NodeId, patch: &JsonMap) -> Option<JsonMap> {
        let node = self.nodes.get_mut(&id)?;
        let previous = merge_object(&mut node.attributes, patch);
        if GEOMETRY_KEYS.iter().any(|key| patch.contains_key(*key)) {
            sync_bounds(node);
        }
        Some(previous)
    }

    /// Current values of `keys` on a node (`null` for absent keys).
    pub fn snapshot_attributes(&self, id: NodeId, keys: &[&str]) -> Option<JsonMap> {
        let node = self.nodes.get(&id)?;
        Some(
            keys.iter()
                .map(|key| {
                    let value = node.attributes.get(*key).cloned().unwrap_or(Value::Null);
                    (key.to_string(), value)
                })
                .collect(),
        )
    }

    /// Updates bounds after the host renderer laid the node out.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Bounds) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.bounds = bounds;
        write_geometry(&mut node.attributes, &bounds);
        true
    }

    pub fn bounds(&self, id: NodeId) -> Option<Bounds> {
        self.nodes.get(&id).map(|node| node.bounds)
    }

    pub fn address(&self, id: NodeId) -> Option<ElementAddress> {
        self.nodes.get(&id).and_then(SceneNode::address)
    }

    /// Reverse lookup: the attached node rendering `role` at `indexes`.
    pub fn find_by_address(&self, role: ElementRole, indexes: Option<&IndexesPath>) -> Option<NodeId> {
        self.paint_order().into_iter().find(|id| {
            self.nodes
                .get(id)
                .is_some_and(|node| node.role == Some(role) && node.indexes.as_ref() == indexes)
        })
    }

    /// Attached nodes in paint order (last is topmost).
    pub fn paint_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for root in &self.roots {
            out.extend(self.subtree(*root));
        }
        out
    }

    /// Attached selectable nodes in paint order.
    pub fn selectable_nodes(&self) -> Vec<NodeId> {
        self.paint_order()
            .into_iter()
            .filter(|id| self.nodes.get(id).is_some_and(|node| node.selectable))
            .collect()
    }

    /// Topmost attached node whose bounds contain `point`.
    pub fn hit_test(&self, point: &Point) -> Option<NodeId> {
        self.hit_test_where(point, |_| true)
    }

    /// Topmost attached node containing `point` that passes `filter`.
    pub fn hit_test_where<F>(&self, point: &Point, filter: F) -> Option<NodeId>
    where
        F: Fn(&SceneNode) -> bool,
    {
        self.paint_order().into_iter().rev().find(|id| {
            self.nodes
                .get(id)
                .is_some_and(|node| node.bounds.contains_point(point) && filter(node))
        })
    }
}

fn write_geometry(attributes: &mut JsonMap, bounds: &Bounds) {
    attributes.insert("x".to_string(), bounds.min_x.into());
    attributes.insert("y".to_string(), bounds.min_y.into());
    attributes.insert("width".to_string(), bounds.width().into());
    attributes.insert("height".to_string(), bounds.height().into());
}

fn sync_bounds(node: &mut SceneNode) {
    let read = |key: &str, fallback: f64| {
        node.attributes
            .get(key)
            .and_then(Value::as_f64)
            .unwrap_or(fallback)
    };
    let x = read("x", node.bounds.min_x);
    let y = read("y", node.bounds.min_y);
    let width = read("width", node.bounds.width());
    let height = read("height", node.bounds.height());
    node.bounds = Bounds::from_rect(x, y, width, height);
}
