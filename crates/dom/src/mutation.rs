//! Structural mutations
//!
//! Every operation runs `can_insert` (where it inserts) and locates its
//! target before touching any collection, so a failed call leaves the tree
//! as it was.
//!
//! Appending does not detach the node from a previous parent, and `remove`
//! does not clear the removed child's `parent` link.

use crate::collection::OrderedCollection;
use crate::document::Document;
use crate::error::{DomError, Result};
use crate::types::{NodeId, NodeType};

impl Document {
    /// Insertion legality of `node` under `target`
    ///
    /// The ancestor check is shallow: only `target`'s direct parent is
    /// compared, so a grandchild can still receive its grandparent.
    pub fn can_insert(&self, target: NodeId, node: NodeId) -> Result<()> {
        let target_node = self.arena.get(target)?;
        let inserted = self.arena.get(node)?;

        if inserted.is_element()
            && matches!(
                target_node.node_type(),
                NodeType::Text | NodeType::Comment | NodeType::DocumentType
            )
        {
            return Err(DomError::structural(format!(
                "no insert operations into {} nodes",
                target_node.node_type()
            )));
        }

        if self.arena.same_node(target, node) {
            return Err(DomError::structural("no insert operations into same node"));
        }

        if target_node
            .parent()
            .is_some_and(|parent| self.arena.same_node(parent, node))
        {
            return Err(DomError::structural("no insert operations into child node"));
        }

        if target_node.is_self_closing() {
            return Err(DomError::structural(format!(
                "no insert operations into self-closing node <{}>",
                target_node.name()
            )));
        }

        if target_node.children().is_none() {
            return Err(childless(target_node.node_type()));
        }

        Ok(())
    }

    /// Append `child` as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.can_insert(parent, child)?;
        self.children_mut(parent)?.append(child);
        self.arena.get_mut(child)?.set_parent(Some(parent));
        tracing::debug!(parent, child, "appended node");
        Ok(())
    }

    /// Insert `child` as the first child of `parent`
    pub fn prepend(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.can_insert(parent, child)?;
        self.children_mut(parent)?.prepend(child);
        self.arena.get_mut(child)?.set_parent(Some(parent));
        tracing::debug!(parent, child, "prepended node");
        Ok(())
    }

    pub fn append_to(&mut self, child: NodeId, parent: NodeId) -> Result<()> {
        self.append(parent, child)
    }

    pub fn prepend_to(&mut self, child: NodeId, parent: NodeId) -> Result<()> {
        self.prepend(parent, child)
    }

    /// Put `new` in the slot `old` occupies under its parent; returns `new`
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<NodeId> {
        if self.arena.same_node(old, new) {
            return Err(DomError::structural("cannot replace a node with the same node"));
        }
        let parent = self
            .arena
            .parent(old)?
            .ok_or_else(|| DomError::structural("old node has no parent"))?;

        self.replace_child(parent, old, new)?;
        Ok(new)
    }

    /// Replace the child of `parent` structurally equal to `old` with `new`
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> Result<()> {
        self.can_insert(parent, new)?;
        let index = self
            .arena
            .child_index(parent, old)?
            .ok_or_else(|| DomError::structural("parent has no child such as old node"))?;

        self.children_mut(parent)?.replace(index, new)?;
        self.arena.get_mut(new)?.set_parent(Some(parent));
        tracing::debug!(parent, old, new, "replaced child");
        Ok(())
    }

    /// Insert `sibling` right before `target` under `target`'s parent
    pub fn before(&mut self, target: NodeId, sibling: NodeId) -> Result<()> {
        let (parent, position) = self.linked_position(target, sibling, "before")?;
        self.insert_at(parent, position, sibling)
    }

    /// Insert `sibling` right after `target` under `target`'s parent
    pub fn after(&mut self, target: NodeId, sibling: NodeId) -> Result<()> {
        let (parent, position) = self.linked_position(target, sibling, "after")?;
        self.insert_at(parent, position + 1, sibling)
    }

    /// `node` goes right after `target`; inverse of `after`
    pub fn append_after(&mut self, node: NodeId, target: NodeId) -> Result<()> {
        self.after(target, node)
    }

    /// `node` goes right before `target`; inverse of `before`
    pub fn append_before(&mut self, node: NodeId, target: NodeId) -> Result<()> {
        self.before(target, node)
    }

    /// Drop the child of `parent` structurally equal to `child`
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let index = self.arena.child_index(parent, child)?.ok_or_else(|| {
            DomError::structural(format!(
                "node {child} to be removed is not a child of node {parent}"
            ))
        })?;

        self.children_mut(parent)?.del(index)?;
        tracing::debug!(parent, child, "removed child");
        Ok(())
    }

    /// Remove all children; nodes without a children collection are left alone
    pub fn do_empty(&mut self, node: NodeId) -> Result<()> {
        if let Some(children) = self.arena.get_mut(node)?.children_mut() {
            children.del_all();
        }
        Ok(())
    }

    pub fn append_text(&mut self, node: NodeId, contents: &str) -> Result<NodeId> {
        let text = self.create_text(contents);
        self.adopt(node, text)
    }

    pub fn append_comment(&mut self, node: NodeId, contents: &str) -> Result<NodeId> {
        let comment = self.create_comment(contents);
        self.adopt(node, comment)
    }

    pub fn append_cdata(&mut self, node: NodeId, contents: &str) -> Result<NodeId> {
        let cdata = self.create_cdata(contents);
        self.adopt(node, cdata)
    }

    /// Replace all children of `node` with a single text node
    pub fn set_inner_text(&mut self, node: NodeId, contents: &str) -> Result<NodeId> {
        let text = self.create_text(contents);
        self.can_insert(node, text)?;
        self.do_empty(node)?;
        self.adopt(node, text)
    }

    pub fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<()> {
        if let Some(parent) = parent {
            self.arena.get(parent)?;
        }
        self.arena.get_mut(node)?.set_parent(parent);
        Ok(())
    }

    pub fn set_owner_document(&mut self, node: NodeId, document: Option<NodeId>) -> Result<()> {
        self.arena.get_mut(node)?.set_owner_document(document);
        Ok(())
    }

    /// Append a freshly created trivial node, sharing `node`'s owner document
    fn adopt(&mut self, node: NodeId, child: NodeId) -> Result<NodeId> {
        let owner = match self.arena.get(node)?.owner_document() {
            Some(owner) => Some(owner),
            None if node == Self::ROOT => Some(Self::ROOT),
            None => None,
        };
        self.arena.get_mut(child)?.set_owner_document(owner);
        self.append(node, child)?;
        Ok(child)
    }

    /// Parent of `target` and the position of `target` among its children,
    /// after checking that `node` may go there
    fn linked_position(
        &self,
        target: NodeId,
        node: NodeId,
        placement: &str,
    ) -> Result<(NodeId, usize)> {
        let unlinked = || {
            DomError::structural(format!(
                "node {node} cannot be inserted {placement} node {target}, append node {target} first"
            ))
        };

        let parent = self.arena.parent(target)?.ok_or_else(unlinked)?;
        self.can_insert(parent, node)?;

        let position = self
            .arena
            .get(parent)?
            .children()
            .and_then(|children| {
                children
                    .values()
                    .position(|&child| self.arena.same_node(child, target))
            })
            .ok_or_else(unlinked)?;

        Ok((parent, position))
    }

    fn insert_at(&mut self, parent: NodeId, position: usize, node: NodeId) -> Result<()> {
        self.children_mut(parent)?.put(position, node);
        self.arena.get_mut(node)?.set_parent(Some(parent));
        tracing::debug!(parent, node, position, "inserted sibling");
        Ok(())
    }

    fn children_mut(&mut self, node: NodeId) -> Result<&mut OrderedCollection<NodeId>> {
        let node_ref = self.arena.get_mut(node)?;
        let node_type = node_ref.node_type();
        node_ref.children_mut().ok_or_else(|| childless(node_type))
    }
}

fn childless(node_type: NodeType) -> DomError {
    DomError::structural(format!("{node_type} nodes cannot hold children"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentConfig;

    fn list(doc: &mut Document, items: &[&str]) -> (NodeId, Vec<NodeId>) {
        let ul = doc.create_element("ul").unwrap();
        let ids = items
            .iter()
            .map(|item| {
                let li = doc.create_element_with("li", [("id", *item)], None, None).unwrap();
                doc.append(ul, li).unwrap();
                li
            })
            .collect();
        (ul, ids)
    }

    fn child_names(doc: &Document, parent: NodeId) -> Vec<String> {
        doc.arena()
            .children(parent)
            .unwrap()
            .into_iter()
            .map(|id| {
                doc.element(id)
                    .ok()
                    .and_then(|el| el.get_attribute("id").map(|v| v.into_owned()))
                    .unwrap_or_default()
            })
            .collect()
    }

    #[test]
    fn test_append_sets_parent() {
        let mut doc = Document::html();
        let body = doc.create_element("body").unwrap();
        doc.append(Document::ROOT, body).unwrap();
        assert_eq!(doc.node(body).unwrap().parent(), Some(Document::ROOT));
        assert_eq!(doc.arena().children(Document::ROOT).unwrap(), vec![body]);
    }

    #[test]
    fn test_insert_into_trivial_nodes_fails() {
        let mut doc = Document::html();
        let comment = doc.create_comment("c");
        let text = doc.create_text("t");
        let span = doc.create_element("span").unwrap();

        assert!(matches!(
            doc.append(comment, span),
            Err(DomError::StructuralViolation(_))
        ));
        assert!(matches!(
            doc.append(text, comment),
            Err(DomError::StructuralViolation(_))
        ));
        let doctype = doc.doctype_id();
        assert!(matches!(
            doc.append(doctype, span),
            Err(DomError::StructuralViolation(_))
        ));
        assert_eq!(doc.node(span).unwrap().parent(), None);
    }

    #[test]
    fn test_childless_target_message() {
        let mut doc = Document::html();
        let text = doc.create_text("t");
        let comment = doc.create_comment("c");
        match doc.append(text, comment) {
            Err(DomError::StructuralViolation(message)) => {
                assert_eq!(message, "#text nodes cannot hold children")
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(doc.node(comment).unwrap().parent(), None);
    }

    #[test]
    fn test_insert_into_same_node_fails() {
        let mut doc = Document::html();
        let div = doc.create_element("div").unwrap();
        let twin = doc.create_element("div").unwrap();
        assert!(matches!(doc.append(div, div), Err(DomError::StructuralViolation(_))));
        // equality is structural
        assert!(matches!(doc.append(div, twin), Err(DomError::StructuralViolation(_))));
    }

    #[test]
    fn test_insert_parent_into_child_fails() {
        let mut doc = Document::html();
        let outer = doc.create_element("section").unwrap();
        let inner = doc.create_element("p").unwrap();
        doc.append(outer, inner).unwrap();
        assert!(matches!(doc.append(inner, outer), Err(DomError::StructuralViolation(_))));
        assert!(!doc.has_children(inner).unwrap());
    }

    #[test]
    fn test_grandparent_check_is_shallow() {
        let mut doc = Document::html();
        let a = doc.create_element("article").unwrap();
        let b = doc.create_element("section").unwrap();
        let c = doc.create_element("p").unwrap();
        doc.append(a, b).unwrap();
        doc.append(b, c).unwrap();

        doc.append(c, a).unwrap();
        assert_eq!(doc.node(a).unwrap().parent(), Some(c));
    }

    #[test]
    fn test_insert_into_self_closing_fails() {
        let mut doc = Document::html();
        let img = doc.create_element("img").unwrap();
        let span = doc.create_element("span").unwrap();
        assert!(matches!(doc.append(img, span), Err(DomError::StructuralViolation(_))));
        assert!(matches!(doc.prepend(img, span), Err(DomError::StructuralViolation(_))));
        assert!(!doc.has_children(img).unwrap());
    }

    #[test]
    fn test_prepend_and_inverse_forms() {
        let mut doc = Document::html();
        let (ul, _) = list(&mut doc, &["b"]);
        let a = doc.create_element_with("li", [("id", "a")], None, None).unwrap();
        let c = doc.create_element_with("li", [("id", "c")], None, None).unwrap();
        doc.prepend_to(a, ul).unwrap();
        doc.append_to(c, ul).unwrap();
        assert_eq!(child_names(&doc, ul), vec!["a", "b", "c"]);
        assert_eq!(doc.node(a).unwrap().parent(), Some(ul));
    }

    #[test]
    fn test_before_and_after() {
        let mut doc = Document::html();
        let (ul, ids) = list(&mut doc, &["a", "c"]);
        let b = doc.create_element_with("li", [("id", "b")], None, None).unwrap();
        let d = doc.create_element_with("li", [("id", "d")], None, None).unwrap();

        doc.before(ids[1], b).unwrap();
        doc.after(ids[1], d).unwrap();
        assert_eq!(child_names(&doc, ul), vec!["a", "b", "c", "d"]);
        // the new sibling hangs off the shared parent, not off the target
        assert_eq!(doc.node(d).unwrap().parent(), Some(ul));
        assert_eq!(doc.node(b).unwrap().parent(), Some(ul));
    }

    #[test]
    fn test_append_after_and_before() {
        let mut doc = Document::html();
        let (ul, ids) = list(&mut doc, &["a", "c"]);
        let b = doc.create_element_with("li", [("id", "b")], None, None).unwrap();
        let z = doc.create_element_with("li", [("id", "z")], None, None).unwrap();
        doc.append_after(b, ids[0]).unwrap();
        doc.append_before(z, ids[0]).unwrap();
        assert_eq!(child_names(&doc, ul), vec!["z", "a", "b", "c"]);
    }

    #[test]
    fn test_sibling_insert_requires_parent() {
        let mut doc = Document::html();
        let lone = doc.create_element("p").unwrap();
        let other = doc.create_element("span").unwrap();
        assert!(matches!(doc.before(lone, other), Err(DomError::StructuralViolation(_))));
        assert!(matches!(doc.after(lone, other), Err(DomError::StructuralViolation(_))));
        assert!(matches!(
            doc.append_after(other, lone),
            Err(DomError::StructuralViolation(_))
        ));
        assert_eq!(doc.node(other).unwrap().parent(), None);
    }

    #[test]
    fn test_replace() {
        let mut doc = Document::html();
        let (ul, ids) = list(&mut doc, &["a", "b"]);
        let x = doc.create_element_with("li", [("id", "x")], None, None).unwrap();

        assert_eq!(doc.replace(ids[0], x).unwrap(), x);
        assert_eq!(child_names(&doc, ul), vec!["x", "b"]);
        assert_eq!(doc.node(x).unwrap().parent(), Some(ul));

        assert!(matches!(doc.replace(x, x), Err(DomError::StructuralViolation(_))));
        let orphan = doc.create_element("li").unwrap();
        assert!(matches!(doc.replace(orphan, x), Err(DomError::StructuralViolation(_))));
    }

    #[test]
    fn test_replace_child_missing_old() {
        let mut doc = Document::html();
        let (ul, _) = list(&mut doc, &["a"]);
        let stranger = doc.create_element("p").unwrap();
        let new = doc.create_element("li").unwrap();
        assert!(matches!(
            doc.replace_child(ul, stranger, new),
            Err(DomError::StructuralViolation(_))
        ));
        assert_eq!(doc.node(new).unwrap().parent(), None);
        assert_eq!(child_names(&doc, ul), vec!["a"]);
    }

    #[test]
    fn test_remove_keeps_stale_parent() {
        let mut doc = Document::html();
        let (ul, ids) = list(&mut doc, &["a", "b", "c"]);
        doc.remove(ul, ids[1]).unwrap();
        assert_eq!(child_names(&doc, ul), vec!["a", "c"]);
        assert_eq!(doc.node(ids[1]).unwrap().parent(), Some(ul));

        assert!(matches!(doc.remove(ul, ids[1]), Err(DomError::StructuralViolation(_))));
        // stale link: the node is no longer among its parent's children
        let x = doc.create_element("li").unwrap();
        assert!(matches!(doc.after(ids[1], x), Err(DomError::StructuralViolation(_))));

        // sparse keys after removal do not break later appends
        let d = doc.create_element_with("li", [("id", "d")], None, None).unwrap();
        doc.append(ul, d).unwrap();
        assert_eq!(child_names(&doc, ul), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_inner_text_helpers() {
        let mut doc = Document::new(DocumentConfig::html());
        let p = doc.create_element("p").unwrap();
        doc.append_text(p, "one").unwrap();
        doc.append_comment(p, "two").unwrap();
        let cdata = doc.append_cdata(p, "three").unwrap();
        assert_eq!(doc.arena().children(p).unwrap().len(), 3);
        assert_eq!(doc.node(cdata).unwrap().owner_document(), Some(Document::ROOT));

        let text = doc.set_inner_text(p, "fresh").unwrap();
        assert_eq!(doc.arena().children(p).unwrap(), vec![text]);
        assert_eq!(doc.node(text).unwrap().content(), Some("fresh"));

        let br = doc.create_element("br").unwrap();
        assert!(matches!(
            doc.set_inner_text(br, "nope"),
            Err(DomError::StructuralViolation(_))
        ));
    }

    #[test]
    fn test_do_empty() {
        let mut doc = Document::html();
        let (ul, _) = list(&mut doc, &["a", "b"]);
        doc.do_empty(ul).unwrap();
        assert!(!doc.has_children(ul).unwrap());

        let text = doc.create_text("x");
        doc.do_empty(text).unwrap();
    }

    #[test]
    fn test_explicit_back_reference_setters() {
        let mut doc = Document::html();
        let a = doc.create_element("a").unwrap();
        let b = doc.create_element("b").unwrap();
        doc.set_parent(a, Some(b)).unwrap();
        assert_eq!(doc.node(a).unwrap().parent(), Some(b));
        assert!(matches!(doc.set_parent(a, Some(999)), Err(DomError::NodeNotFound(999))));
        doc.set_owner_document(a, None).unwrap();
        assert_eq!(doc.node(a).unwrap().owner_document(), None);
    }
}
