//! Arena-based DOM tree storage
//!
//! Every node lives in one `Vec<DomNode>`; tree edges are `NodeId`
//! indices, so parent/owner back-references never own anything.
//!
//! ## Memory Layout
//!
//! ```text
//! Arena: Vec<DomNode>
//!        [#document][doctype][html][body]...
//!         ↑ 4-byte index, not 8-byte pointer
//! ```
//!
//! Equality between nodes is structural: name, value, payload and the
//! children compared recursively. Identity (`NodeId`) only matters for the
//! clone registry.

use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeData, NodeId};

/// Arena allocator for DOM nodes
#[derive(Debug, Default)]
pub struct DomArena {
    nodes: Vec<DomNode>,
}

impl DomArena {
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(64),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Allocate a detached node, returns its ID
    pub fn alloc(&mut self, name: &str, value: Option<String>, mut data: NodeData) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        if let NodeData::Element(element) = &mut data {
            element.set_owner(node_id);
        }
        self.nodes.push(DomNode::new(node_id, name, value, data));
        node_id
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Total number of nodes, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DomNode> {
        self.nodes.iter()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| i as NodeId)
    }

    pub fn parent(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.get(node_id)?.parent())
    }

    /// Child IDs in order; empty for nodes that cannot hold children
    pub fn children(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        let node = self.get(node_id)?;
        Ok(node
            .children()
            .map(|children| children.values().copied().collect())
            .unwrap_or_default())
    }

    /// (index, child) pairs, keeping the sparse indices of the collection
    pub fn child_entries(&self, node_id: NodeId) -> Result<Vec<(usize, NodeId)>> {
        let node = self.get(node_id)?;
        Ok(node
            .children()
            .map(|children| children.iter().map(|(i, id)| (i, *id)).collect())
            .unwrap_or_default())
    }

    /// Parent chain from the direct parent up to the root
    ///
    /// A chain longer than the arena means the parent links loop, which
    /// the shallow insertion check can let through.
    pub fn ancestors(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        let mut chain = Vec::new();
        let mut current = self.parent(node_id)?;

        while let Some(id) = current {
            if chain.len() > self.nodes.len() {
                return Err(DomError::structural(format!(
                    "parent links of node {node_id} form a cycle"
                )));
            }
            chain.push(id);
            current = self.parent(id)?;
        }

        Ok(chain)
    }

    /// Structural equality; identical IDs are trivially equal
    pub fn same_node(&self, a: NodeId, b: NodeId) -> bool {
        self.same_node_at(a, b, 0)
    }

    fn same_node_at(&self, a: NodeId, b: NodeId, depth: usize) -> bool {
        if a == b {
            return true;
        }
        if depth > self.nodes.len() {
            return false;
        }
        let (Ok(left), Ok(right)) = (self.get(a), self.get(b)) else {
            return false;
        };
        if !left.shallow_eq(right) {
            return false;
        }

        match (left.children(), right.children()) {
            (Some(lc), Some(rc)) => {
                lc.len() == rc.len()
                    && lc.iter().zip(rc.iter()).all(|((li, l), (ri, r))| {
                        li == ri && self.same_node_at(*l, *r, depth + 1)
                    })
            }
            (None, None) => true,
            _ => false,
        }
    }

    /// Index of the first child of `parent` structurally equal to `target`
    pub fn child_index(&self, parent: NodeId, target: NodeId) -> Result<Option<usize>> {
        self.get(target)?;
        Ok(self
            .get(parent)?
            .children()
            .and_then(|children| children.find_index(|&child| self.same_node(child, target))))
    }
}
