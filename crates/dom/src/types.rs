//! Core type definitions
//!
//! Key design principles:
//! 1. Use u32 indices for every tree edge (parent, children, owner document)
//! 2. Node payload is an enum, the node type is derived from it
//! 3. Trivial nodes keep their rendered form next to their raw value

use crate::collection::OrderedCollection;
use crate::element::ElementData;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Node identifier (index into arena)
pub type NodeId = u32;

/// Elements rendered as a single `<tag />` in HTML documents
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Node type, numbered after the DOM specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    CData = 4,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
}

impl NodeType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(NodeType::Element),
            3 => Some(NodeType::Text),
            4 => Some(NodeType::CData),
            8 => Some(NodeType::Comment),
            9 => Some(NodeType::Document),
            10 => Some(NodeType::DocumentType),
            _ => None,
        }
    }

    /// Only elements and documents own children/attribute collections
    pub fn is_container(self) -> bool {
        matches!(self, NodeType::Element | NodeType::Document)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Element => "element",
            NodeType::Text => "#text",
            NodeType::CData => "#cdata",
            NodeType::Comment => "#comment",
            NodeType::Document => "#document",
            NodeType::DocumentType => "#doctype",
        };
        f.write_str(name)
    }
}

/// Document flavour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoctypeKind {
    #[default]
    Html,
    Xml,
}

impl DoctypeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DoctypeKind::Html => "html",
            DoctypeKind::Xml => "xml",
        }
    }
}

/// Doctype declaration of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentType {
    pub kind: DoctypeKind,
    /// Extra tokens for the HTML declaration, e.g. a PUBLIC identifier
    pub options: Vec<String>,
}

impl DocumentType {
    pub fn new(kind: DoctypeKind) -> Self {
        Self {
            kind,
            options: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn add_doctype_string(&mut self, option: impl Into<String>) {
        self.options.push(option.into());
    }
}

/// Type-specific payload of a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Document,
    DocumentType(DocumentType),
    Element(ElementData),
    /// `content` is the literal output; `Comment`/`CData` wrap it at
    /// construction time
    Text { content: String },
    CData { content: String },
    Comment { content: String },
}

impl NodeData {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeData::Document => NodeType::Document,
            NodeData::DocumentType(_) => NodeType::DocumentType,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text { .. } => NodeType::Text,
            NodeData::CData { .. } => NodeType::CData,
            NodeData::Comment { .. } => NodeType::Comment,
        }
    }

    pub fn text(raw: &str) -> Self {
        NodeData::Text {
            content: raw.to_string(),
        }
    }

    pub fn cdata(raw: &str) -> Self {
        NodeData::CData {
            content: format!("<![CDATA[{raw}]]>"),
        }
    }

    pub fn comment(raw: &str) -> Self {
        NodeData::Comment {
            content: format!("<!--{raw}-->"),
        }
    }
}

/// The DOM tree node
///
/// Tree edges are indices into the owning arena. `parent` and
/// `owner_document` never own anything.
#[derive(Debug, Clone)]
pub struct DomNode {
    node_id: NodeId,
    node_name: String,
    node_value: Option<String>,
    data: NodeData,

    parent_id: Option<NodeId>,
    owner_document: Option<NodeId>,
    /// `None` for trivial nodes, which can never hold children
    children: Option<OrderedCollection<NodeId>>,
    self_closing: bool,

    /// Identity token, distinct for every node including clones
    uuid: Uuid,
}

impl DomNode {
    /// Build a node; name is lower-cased, element self-closing is derived
    /// from the void element table
    pub fn new(
        node_id: NodeId,
        node_name: &str,
        node_value: Option<String>,
        data: NodeData,
    ) -> Self {
        let node_name = node_name.to_lowercase();
        let container = data.node_type().is_container();
        let self_closing = matches!(data, NodeData::Element(_)) && is_void_element(&node_name);

        Self {
            node_id,
            node_name,
            node_value,
            data,
            parent_id: None,
            owner_document: None,
            children: container.then(OrderedCollection::new),
            self_closing,
            uuid: Uuid::new_v4(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.node_id
    }

    pub fn name(&self) -> &str {
        &self.node_name
    }

    pub fn value(&self) -> Option<&str> {
        self.node_value.as_deref()
    }

    pub fn node_type(&self) -> NodeType {
        self.data.node_type()
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent_id
    }

    pub fn owner_document(&self) -> Option<NodeId> {
        self.owner_document
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn is_self_closing(&self) -> bool {
        self.self_closing
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text { .. })
    }

    pub fn children(&self) -> Option<&OrderedCollection<NodeId>> {
        self.children.as_ref()
    }

    pub fn element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Literal markup of a trivial node (text, CDATA, comment)
    pub fn content(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text { content }
            | NodeData::CData { content }
            | NodeData::Comment { content } => Some(content),
            _ => None,
        }
    }

    pub fn has_children(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }

    pub fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent_id = parent;
    }

    pub fn set_owner_document(&mut self, document: Option<NodeId>) {
        self.owner_document = document;
    }

    pub(crate) fn set_self_closing(&mut self, self_closing: bool) {
        self.self_closing = self_closing;
    }

    pub(crate) fn data_mut(&mut self) -> &mut NodeData {
        &mut self.data
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut OrderedCollection<NodeId>> {
        self.children.as_mut()
    }

    /// Field-wise equality without children and back-references
    pub(crate) fn shallow_eq(&self, other: &DomNode) -> bool {
        self.node_name == other.node_name
            && self.node_value == other.node_value
            && self.self_closing == other.self_closing
            && self.data == other.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_codes() {
        assert_eq!(NodeType::from_u8(4), Some(NodeType::CData));
        assert_eq!(NodeType::from_u8(2), None);
        assert_eq!(NodeType::Comment as u8, 8);
    }

    #[test]
    fn test_trivial_nodes_have_no_children() {
        let text = DomNode::new(0, "#text", Some("hi".into()), NodeData::text("hi"));
        assert!(text.children().is_none());
        assert!(!text.has_children());
        assert_eq!(text.content(), Some("hi"));

        let comment = DomNode::new(1, "#comment", Some("note".into()), NodeData::comment("note"));
        assert_eq!(comment.content(), Some("<!--note-->"));

        let cdata = DomNode::new(2, "#cdata", Some("x<y".into()), NodeData::cdata("x<y"));
        assert_eq!(cdata.content(), Some("<![CDATA[x<y]]>"));
    }

    #[test]
    fn test_document_node_is_container() {
        let doc = DomNode::new(0, "#document", None, NodeData::Document);
        assert!(doc.children().is_some());
        assert!(!doc.is_self_closing());
        assert_ne!(doc.uuid(), DomNode::new(0, "#document", None, NodeData::Document).uuid());
    }
}
