//! Child access, sibling navigation and relationship predicates
//!
//! Siblings are located by a linear scan of the parent's children using
//! structural equality; with several equal siblings the first one wins.
//! A node without a parent has no siblings.

use crate::document::Document;
use crate::error::{DomError, Result};
use crate::types::{NodeId, NodeType};

impl Document {
    pub fn is_same_node(&self, node: NodeId, target: NodeId) -> Result<bool> {
        self.arena.get(node)?;
        self.arena.get(target)?;
        Ok(self.arena.same_node(node, target))
    }

    /// True when `node`'s parent is structurally equal to `target`
    pub fn is_child_of(&self, node: NodeId, target: NodeId) -> Result<bool> {
        self.arena.get(target)?;
        Ok(self
            .arena
            .parent(node)?
            .is_some_and(|parent| self.arena.same_node(parent, target)))
    }

    /// True when a child of `node` is structurally equal to `target`
    pub fn is_parent_of(&self, node: NodeId, target: NodeId) -> Result<bool> {
        Ok(self.arena.child_index(node, target)?.is_some())
    }

    pub fn is_self_closing(&self, node: NodeId) -> Result<bool> {
        Ok(self.arena.get(node)?.is_self_closing())
    }

    pub fn has_children(&self, node: NodeId) -> Result<bool> {
        Ok(self.arena.get(node)?.has_children())
    }

    /// False for non-elements and for elements with only empty class/style
    pub fn has_attributes(&self, node: NodeId) -> Result<bool> {
        Ok(self
            .arena
            .get(node)?
            .element()
            .is_some_and(|element| element.has_attributes()))
    }

    /// Child stored at index `index`; only documents and elements qualify
    pub fn item(&self, node: NodeId, index: usize) -> Result<NodeId> {
        let node_ref = self.arena.get(node)?;
        match (node_ref.node_type(), node_ref.children()) {
            (NodeType::Document | NodeType::Element, Some(children)) => {
                children.item(index).copied()
            }
            (actual, _) => Err(DomError::InvalidNodeType {
                expected: "#document or element".to_string(),
                actual: actual.to_string(),
            }),
        }
    }

    pub fn first(&self, node: NodeId) -> Result<NodeId> {
        self.item(node, 0)
    }

    /// Child at index `len - 1`, which sparse indices can leave empty
    pub fn last(&self, node: NodeId) -> Result<NodeId> {
        let len = self
            .arena
            .get(node)?
            .children()
            .map_or(0, |children| children.len());
        self.item(node, len.checked_sub(1).ok_or(DomError::IndexNotFound(0))?)
    }

    /// Previous sibling by index; `None` for the first child
    pub fn prev(&self, node: NodeId) -> Result<Option<NodeId>> {
        self.adjacent(node, |index| index.checked_sub(1))
    }

    /// Next sibling by index; `None` for the last child
    pub fn next(&self, node: NodeId) -> Result<Option<NodeId>> {
        self.adjacent(node, |index| index.checked_add(1))
    }

    /// Siblings before the first child equal to `node`
    pub fn prev_all(&self, node: NodeId) -> Result<Vec<NodeId>> {
        Ok(self
            .sibling_list(node)?
            .into_iter()
            .take_while(|&sibling| !self.arena.same_node(sibling, node))
            .collect())
    }

    /// Siblings after the first child equal to `node`, skipping other equal ones
    pub fn next_all(&self, node: NodeId) -> Result<Vec<NodeId>> {
        Ok(self
            .sibling_list(node)?
            .into_iter()
            .skip_while(|&sibling| !self.arena.same_node(sibling, node))
            .filter(|&sibling| !self.arena.same_node(sibling, node))
            .collect())
    }

    /// Every child of `node`'s parent that is not equal to `node`
    pub fn siblings(&self, node: NodeId) -> Result<Vec<NodeId>> {
        Ok(self
            .sibling_list(node)?
            .into_iter()
            .filter(|&sibling| !self.arena.same_node(sibling, node))
            .collect())
    }

    fn sibling_list(&self, node: NodeId) -> Result<Vec<NodeId>> {
        match self.arena.parent(node)? {
            Some(parent) => self.arena.children(parent),
            None => Ok(Vec::new()),
        }
    }

    fn adjacent<F>(&self, node: NodeId, step: F) -> Result<Option<NodeId>>
    where
        F: Fn(usize) -> Option<usize>,
    {
        let Some(parent) = self.arena.parent(node)? else {
            return Ok(None);
        };
        let Some(children) = self.arena.get(parent)?.children() else {
            return Ok(None);
        };

        Ok(children
            .iter()
            .filter(|&(_, &child)| self.arena.same_node(child, node))
            .find_map(|(index, _)| step(index).and_then(|i| children.get(i)))
            .copied())
    }
}
