//! Document: tree root, node factory and per-tree bookkeeping
//!
//! A `Document` owns the arena every node of its tree is allocated in.
//! The root document node is always `Document::ROOT`; the doctype node is
//! allocated right after it and never becomes anyone's child.

use crate::arena::DomArena;
use crate::element::{AttributeValue, ElementData};
use crate::error::{DomError, Result};
use crate::lists::{ClassCollection, StyleCollection};
use crate::property::Attribute;
use crate::types::{
    is_void_element, DoctypeKind, DocumentType, DomNode, NodeData, NodeId, NodeType,
};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_ENCODING: &str = "utf-8";
pub const DEFAULT_VERSION: &str = "1.0";

/// Document configuration
///
/// Encoding and version only apply to XML documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub doctype: DoctypeKind,
    pub encoding: Option<String>,
    pub version: Option<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            doctype: DoctypeKind::Html,
            encoding: Some(DEFAULT_ENCODING.to_string()),
            version: None,
        }
    }
}

impl DocumentConfig {
    pub fn html() -> Self {
        Self::default()
    }

    pub fn xml() -> Self {
        Self {
            doctype: DoctypeKind::Xml,
            ..Self::default()
        }
    }
}

/// Bookkeeping shared by every node of one tree
#[derive(Debug, Default)]
struct TreeState {
    /// Identity tokens of nodes produced by `do_clone`; append-only
    clone_hashes: AHashSet<Uuid>,
    /// Suffix counter for `get_path`; never reset
    path_counter: usize,
}

/// Root of a document tree and factory for its nodes
#[derive(Debug)]
pub struct Document {
    pub(crate) arena: DomArena,
    doctype_id: NodeId,
    kind: DoctypeKind,
    encoding: Option<String>,
    version: Option<String>,
    state: TreeState,
}

impl Document {
    /// The document node itself
    pub const ROOT: NodeId = 0;

    pub fn new(config: DocumentConfig) -> Self {
        let mut arena = DomArena::new();
        let root = arena.alloc("#document", None, NodeData::Document);

        let kind = config.doctype;
        let doctype_id = arena.alloc(
            kind.as_str(),
            None,
            NodeData::DocumentType(DocumentType::new(kind)),
        );
        if let Ok(doctype) = arena.get_mut(doctype_id) {
            doctype.set_owner_document(Some(root));
        }

        let (encoding, version) = match kind {
            DoctypeKind::Xml => (
                Some(non_empty_or(config.encoding, DEFAULT_ENCODING)),
                Some(non_empty_or(config.version, DEFAULT_VERSION)),
            ),
            DoctypeKind::Html => (None, None),
        };

        tracing::debug!(doctype = kind.as_str(), "created document");

        Self {
            arena,
            doctype_id,
            kind,
            encoding,
            version,
            state: TreeState::default(),
        }
    }

    pub fn html() -> Self {
        Self::new(DocumentConfig::html())
    }

    pub fn xml() -> Self {
        Self::new(DocumentConfig::xml())
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn arena(&self) -> &DomArena {
        &self.arena
    }

    pub fn node(&self, node_id: NodeId) -> Result<&DomNode> {
        self.arena.get(node_id)
    }

    pub fn node_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.arena.get_mut(node_id)
    }

    pub fn element(&self, node_id: NodeId) -> Result<&ElementData> {
        let node = self.arena.get(node_id)?;
        node.element().ok_or_else(|| not_an_element(node))
    }

    pub fn element_mut(&mut self, node_id: NodeId) -> Result<&mut ElementData> {
        let node = self.arena.get_mut(node_id)?;
        let actual = node.node_type().to_string();
        node.element_mut().ok_or(DomError::InvalidNodeType {
            expected: NodeType::Element.to_string(),
            actual,
        })
    }

    pub fn class_collection(&self, node_id: NodeId) -> Result<&ClassCollection> {
        self.arena
            .get(node_id)?
            .element()
            .map(ElementData::classes)
            .ok_or(DomError::MissingCollection {
                node: node_id,
                collection: "class",
            })
    }

    pub fn style_collection(&self, node_id: NodeId) -> Result<&StyleCollection> {
        self.arena
            .get(node_id)?
            .element()
            .map(ElementData::styles)
            .ok_or(DomError::MissingCollection {
                node: node_id,
                collection: "style",
            })
    }

    // ---- doctype ----

    pub fn doctype_id(&self) -> NodeId {
        self.doctype_id
    }

    pub fn doctype(&self) -> Result<&DocumentType> {
        match self.arena.get(self.doctype_id)?.data() {
            NodeData::DocumentType(doctype) => Ok(doctype),
            other => Err(DomError::InvalidNodeType {
                expected: NodeType::DocumentType.to_string(),
                actual: other.node_type().to_string(),
            }),
        }
    }

    pub fn doctype_kind(&self) -> DoctypeKind {
        self.kind
    }

    pub fn is_xml(&self) -> bool {
        self.kind == DoctypeKind::Xml
    }

    /// Extra token for the HTML doctype declaration
    pub fn add_doctype_string(&mut self, option: impl Into<String>) -> Result<()> {
        let node = self.arena.get_mut(self.doctype_id)?;
        let actual = node.node_type().to_string();
        match node.data_mut() {
            NodeData::DocumentType(doctype) => {
                doctype.add_doctype_string(option);
                Ok(())
            }
            _ => Err(DomError::InvalidNodeType {
                expected: NodeType::DocumentType.to_string(),
                actual,
            }),
        }
    }

    /// XML encoding, `None` for HTML documents
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// XML version, `None` for HTML documents
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    // ---- factory ----

    pub fn create_element(&mut self, tag: &str) -> Result<NodeId> {
        self.create_element_with(tag, Vec::<(String, AttributeValue)>::new(), None, None)
    }

    /// Create an element with construction-time attributes, optional text
    /// content and an optional explicit self-closing flag
    ///
    /// Without the flag, HTML documents make void-table tags self-closing and
    /// XML documents make nothing self-closing.
    pub fn create_element_with<I, K, V>(
        &mut self,
        tag: &str,
        attributes: I,
        text: Option<&str>,
        self_closing: Option<bool>,
    ) -> Result<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        let data = ElementData::new(tag)?;
        let self_closing = self_closing.unwrap_or_else(|| {
            self.kind == DoctypeKind::Html && is_void_element(&tag.to_lowercase())
        });
        let text = text.filter(|t| !t.is_empty());
        if self_closing && text.is_some() {
            return Err(DomError::structural(format!(
                "self-closing element <{tag}> cannot hold text"
            )));
        }

        let id = self.arena.alloc(tag, None, NodeData::Element(data));
        let node = self.arena.get_mut(id)?;
        node.set_owner_document(Some(Self::ROOT));
        node.set_self_closing(self_closing);
        if let Some(element) = node.element_mut() {
            element.apply_attributes(attributes);
        }

        if let Some(text) = text {
            self.append_text(id, text)?;
        }

        Ok(id)
    }

    pub fn create_text(&mut self, contents: &str) -> NodeId {
        self.create_trivial("#text", contents, NodeData::text(contents))
    }

    pub fn create_cdata(&mut self, contents: &str) -> NodeId {
        self.create_trivial("#cdata", contents, NodeData::cdata(contents))
    }

    pub fn create_comment(&mut self, contents: &str) -> NodeId {
        self.create_trivial("#comment", contents, NodeData::comment(contents))
    }

    /// Generic factory for text, CDATA and comment nodes
    pub fn create(&mut self, node_type: NodeType, contents: &str) -> Result<NodeId> {
        match node_type {
            NodeType::Text => Ok(self.create_text(contents)),
            NodeType::CData => Ok(self.create_cdata(contents)),
            NodeType::Comment => Ok(self.create_comment(contents)),
            other => Err(DomError::InvalidNodeType {
                expected: "#text, #cdata or #comment (use create_element for elements)".to_string(),
                actual: other.to_string(),
            }),
        }
    }

    fn create_trivial(&mut self, name: &str, contents: &str, data: NodeData) -> NodeId {
        let id = self.arena.alloc(name, Some(contents.to_string()), data);
        if let Ok(node) = self.arena.get_mut(id) {
            node.set_owner_document(Some(Self::ROOT));
        }
        id
    }

    // ---- cloning ----

    /// Duplicate a node
    ///
    /// Elements get their tag, attributes, classes and styles copied. With
    /// `deep`, the original children are re-parented onto the clone rather
    /// than duplicated: they stay listed under the original too, but their
    /// `parent` now points at the clone. Re-parenting skips the insertion
    /// checks, and every lookup happens before the clone is allocated.
    pub fn do_clone(&mut self, node_id: NodeId, deep: bool) -> Result<NodeId> {
        let source = self.arena.get(node_id)?;
        let owner_document = source.owner_document();
        let self_closing = source.is_self_closing();
        let name = source.name().to_string();
        let value = source.value().map(str::to_string);

        let data = match source.data() {
            NodeData::Element(element) => {
                if element.attributes().values().any(Attribute::is_id) {
                    tracing::warn!(
                        node = node_id,
                        "cloning an element with an id attribute may lead to duplicate element IDs"
                    );
                }
                NodeData::Element(element.duplicate())
            }
            data @ (NodeData::Text { .. } | NodeData::CData { .. } | NodeData::Comment { .. }) => {
                data.clone()
            }
            other => {
                return Err(DomError::InvalidNodeType {
                    expected: "element, #text, #cdata or #comment".to_string(),
                    actual: other.node_type().to_string(),
                })
            }
        };

        let children = if deep {
            self.arena.children(node_id)?
        } else {
            Vec::new()
        };

        for &child in &children {
            self.arena.get(child)?;
        }

        let clone = self.arena.alloc(&name, value, data);
        let clone_node = self.arena.get_mut(clone)?;
        clone_node.set_self_closing(self_closing);
        clone_node.set_owner_document(owner_document);
        let uuid = clone_node.uuid();
        if let Some(list) = clone_node.children_mut() {
            for &child in &children {
                list.append(child);
            }
        }
        for &child in &children {
            self.arena.get_mut(child)?.set_parent(Some(clone));
        }

        self.state.clone_hashes.insert(uuid);
        tracing::debug!(source = node_id, clone, deep, "cloned node");

        Ok(clone)
    }

    /// True when `node_id` is a clone that is structurally equal to, but
    /// not the same node as, `target`
    pub fn is_clone_of(&self, node_id: NodeId, target: NodeId) -> Result<bool> {
        let uuid = self.arena.get(node_id)?.uuid();
        self.arena.get(target)?;

        Ok(node_id != target
            && self.arena.same_node(node_id, target)
            && self.state.clone_hashes.contains(&uuid))
    }

    // ---- paths ----

    /// Slash-separated path of node names from the root, e.g.
    /// `#document/html/body/p[3]`
    ///
    /// The `[k]` suffix appears when a sibling shares the node's name. `k`
    /// comes from a counter shared by every call on this document, so
    /// repeated calls give different suffixes.
    pub fn get_path(&mut self, node_id: NodeId) -> Result<String> {
        let base = self.arena.get(node_id)?.name().to_string();
        let mut name = base.clone();

        for sibling in self.siblings(node_id)? {
            if self.arena.get(sibling)?.name() == base {
                name = format!("{base}[{}]", self.state.path_counter);
                self.state.path_counter += 1;
            }
        }

        let mut path = vec![name];
        for ancestor in self.arena.ancestors(node_id)? {
            path.push(self.arena.get(ancestor)?.name().to_string());
        }
        path.reverse();

        Ok(path.join("/"))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DocumentConfig::default())
    }
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn not_an_element(node: &DomNode) -> DomError {
    DomError::InvalidNodeType {
        expected: NodeType::Element.to_string(),
        actual: node.node_type().to_string(),
    }
}
