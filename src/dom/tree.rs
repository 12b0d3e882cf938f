//! Tree operations: insert, reorder, walk, geometry queries.

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeData, NodeId};
use crate::error::{Error, Result};
use crate::geometry::{BoxGeometry, Offset, Region};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// The widget tree, backed by a slotmap arena.
///
/// Parents own their children through the `children` lists; the `parent` map is
/// a lookup back-reference only. The order of a node's children is its packing
/// order.
#[derive(Debug)]
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
}

impl Dom {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
        }
    }

    /// Insert a parentless node at depth 0.
    ///
    /// The first such node becomes the root. It is positioned at its requested
    /// position (or the origin) immediately.
    pub fn insert(&mut self, mut data: NodeData) -> NodeId {
        let size = data.requested_size();
        data.requested = Some(size);
        data.geometry = BoxGeometry::placed_at(data.position.unwrap_or(Offset::ZERO), size);
        data.depth = 0;
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert a node as the last child of `parent`.
    ///
    /// A node without a requested size takes the parent's current size. A node
    /// with an explicit position is placed right away; otherwise it stays unplaced
    /// until a geometry manager positions it.
    pub fn insert_child(&mut self, parent: NodeId, mut data: NodeData) -> Result<NodeId> {
        let parent_data = self.nodes.get(parent).ok_or(Error::UnknownNode(parent))?;
        let size = data.requested.unwrap_or(parent_data.geometry.size());
        data.requested = Some(size);
        data.depth = parent_data.depth + 1;
        data.geometry = match data.position {
            Some(position) => BoxGeometry::placed_at(position, size),
            None => BoxGeometry::unplaced(size),
        };

        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(id);
        }
        Ok(id)
    }

    /// Move `node` to `index` in its parent's child order.
    ///
    /// `index` is interpreted after `node` has been taken out of the list and is
    /// clamped to the end.
    pub fn move_to(&mut self, node: NodeId, index: usize) -> Result<()> {
        let parent = self.parent(node).ok_or(Error::RootNotManaged)?;
        let siblings = self
            .children
            .get_mut(parent)
            .ok_or(Error::UnknownNode(parent))?;
        siblings.retain(|&child| child != node);
        let index = index.min(siblings.len());
        siblings.insert(index, node);
        Ok(())
    }

    /// Index of `node` in its parent's child order.
    pub fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|&child| child == node)
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no children
    /// or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `id` up to the root, collecting ancestor node ids.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent and ends at the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's data.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// Like [`get`](Self::get), but a missing node is an error.
    pub fn node(&self, id: NodeId) -> Result<&NodeData> {
        self.nodes.get(id).ok_or(Error::UnknownNode(id))
    }

    /// Like [`get_mut`](Self::get_mut), but a missing node is an error.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.nodes.get_mut(id).ok_or(Error::UnknownNode(id))
    }

    /// The root node, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Tree depth of a node (root = 0).
    pub fn depth(&self, id: NodeId) -> Option<u32> {
        self.nodes.get(id).map(|n| n.depth)
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the tree contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Screen position of a node's top-left corner: the sum of its own and all
    /// ancestors' box offsets.
    pub fn absolute_origin(&self, id: NodeId) -> Option<Offset> {
        let mut origin = self.nodes.get(id)?.geometry.region().offset();
        for ancestor in self.ancestors(id) {
            origin = origin + self.nodes.get(ancestor)?.geometry.region().offset();
        }
        Some(origin)
    }

    /// A node's box in screen coordinates.
    pub fn absolute_region(&self, id: NodeId) -> Option<Region> {
        let node = self.nodes.get(id)?;
        let origin = self.absolute_origin(id)?;
        Some(Region::new(origin.x, origin.y, node.geometry.width, node.geometry.height))
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}
