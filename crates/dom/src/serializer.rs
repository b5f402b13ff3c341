//! Markup serializer
//!
//! Renders a document back to HTML or XML text:
//! - Document nodes emit the declaration line, then their children
//! - Any other node emits only its children (inner markup)
//! - Text, CDATA and comment content is written as stored
//!
//! Attribute values are not entity-escaped beyond the `&quot;` done by
//! `Attribute`'s `Display`.

use crate::arena::DomArena;
use crate::document::Document;
use crate::error::{DomError, Result};
use crate::types::{DoctypeKind, NodeData, NodeId, NodeType};
use crate::utils;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serializer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    /// Terminator of the declaration line
    pub line_ending: String,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            line_ending: "\r\n".to_string(),
        }
    }
}

/// Document tree serializer
#[derive(Debug, Clone, Default)]
pub struct MarkupSerializer {
    config: SerializerConfig,
}

impl MarkupSerializer {
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Full document: declaration line followed by the root's children
    pub fn serialize(&self, doc: &Document) -> Result<String> {
        self.serialize_node(doc, Document::ROOT)
    }

    /// Markup for `node`; the declaration is only emitted for the root
    pub fn serialize_node(&self, doc: &Document, node: NodeId) -> Result<String> {
        let mut output = String::with_capacity(1024);

        if doc.arena().get(node)?.node_type() == NodeType::Document {
            output.push_str(&self.declaration(doc)?);
        }
        self.write_children(doc.arena(), node, 0, &mut output)?;

        Ok(output)
    }

    /// `<!DOCTYPE html …>` or `<?xml …?>`, with the configured line ending
    pub fn declaration(&self, doc: &Document) -> Result<String> {
        let doctype = doc.doctype()?;
        let mut line = match doctype.kind {
            DoctypeKind::Html => {
                let mut parts = vec![doctype.name().to_string()];
                parts.extend(doctype.options.iter().cloned());
                format!("<!DOCTYPE {}>", parts.join(" "))
            }
            DoctypeKind::Xml => format!(
                "<?xml version=\"{}\" encoding=\"{}\"?>",
                doc.version().unwrap_or_default(),
                doc.encoding().unwrap_or_default()
            ),
        };
        line.push_str(&self.config.line_ending);
        Ok(line)
    }

    /// Serialized inner markup with every tag stripped
    pub fn inner_text(&self, doc: &Document, node: NodeId) -> Result<String> {
        let mut output = String::new();
        self.write_children(doc.arena(), node, 0, &mut output)?;
        Ok(utils::strip_tags(&output))
    }

    fn write_children(
        &self,
        arena: &DomArena,
        node_id: NodeId,
        depth: usize,
        output: &mut String,
    ) -> Result<()> {
        if depth > arena.len() {
            return Err(DomError::structural(format!(
                "children of node {node_id} form a cycle"
            )));
        }

        for child_id in arena.children(node_id)? {
            let child = arena.get(child_id)?;
            match child.data() {
                NodeData::Text { content }
                | NodeData::CData { content }
                | NodeData::Comment { content } => output.push_str(content),
                NodeData::Element(element) => {
                    output.push('<');
                    output.push_str(child.name());
                    for attribute in element.rendered_attributes() {
                        output.push(' ');
                        output.push_str(&attribute);
                    }

                    if child.is_self_closing() {
                        output.push_str(" />");
                    } else {
                        output.push('>');
                        if child.has_children() {
                            self.write_children(arena, child_id, depth + 1, output)?;
                        }
                        output.push_str("</");
                        output.push_str(child.name());
                        output.push('>');
                    }
                }
                NodeData::Document | NodeData::DocumentType(_) => {
                    tracing::trace!(node = child_id, "skipping non-renderable child");
                }
            }
        }

        Ok(())
    }
}

/// Serde-friendly structural dump of a subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub node_type: NodeType,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    fn capture(arena: &DomArena, node_id: NodeId, depth: usize) -> Result<Self> {
        if depth > arena.len() {
            return Err(DomError::structural(format!(
                "children of node {node_id} form a cycle"
            )));
        }

        let node = arena.get(node_id)?;
        let children = arena
            .children(node_id)?
            .into_iter()
            .map(|child| Self::capture(arena, child, depth + 1))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            node_type: node.node_type(),
            name: node.name().to_string(),
            value: node.value().map(str::to_string),
            attributes: node
                .element()
                .map(|element| element.rendered_attributes())
                .unwrap_or_default(),
            children,
        })
    }
}

impl Document {
    /// Whole document as markup
    pub fn to_markup(&self) -> Result<String> {
        MarkupSerializer::new().serialize(self)
    }

    /// Inner markup of `node` (with the declaration for the root)
    pub fn node_markup(&self, node: NodeId) -> Result<String> {
        MarkupSerializer::new().serialize_node(self, node)
    }

    pub fn inner_text(&self, node: NodeId) -> Result<String> {
        MarkupSerializer::new().inner_text(self, node)
    }

    pub fn snapshot(&self, node: NodeId) -> Result<NodeSnapshot> {
        NodeSnapshot::capture(&self.arena, node, 0)
    }

    pub fn to_json(&self, node: NodeId) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot(node)?)?)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let markup = self.to_markup().map_err(|_| fmt::Error)?;
        f.write_str(&markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentConfig;
    use crate::element::AttributeValue;

    const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\r\n";

    #[test]
    fn test_xml_fruits_round_trip() {
        let mut doc = Document::xml();
        let fruits = doc.create_element("fruits").unwrap();
        let yellow = doc
            .create_element_with("apple", [("color", "yellow")], None, Some(true))
            .unwrap();
        let green = doc
            .create_element_with("apple", [("color", "green")], None, Some(true))
            .unwrap();
        doc.append(fruits, yellow).unwrap();
        doc.append(fruits, green).unwrap();
        doc.append(Document::ROOT, fruits).unwrap();

        assert_eq!(
            doc.to_string(),
            format!(
                "{XML_HEADER}<fruits><apple color=\"yellow\" /><apple color=\"green\" /></fruits>"
            )
        );
    }

    #[test]
    fn test_xml_link_holds_text() {
        let mut doc = Document::xml();
        let channel = doc.create_element("channel").unwrap();
        let link = doc.create_element("link").unwrap();
        doc.append_text(link, "http://example.com/").unwrap();
        doc.append(channel, link).unwrap();
        doc.append(Document::ROOT, channel).unwrap();

        assert_eq!(
            doc.to_markup().unwrap(),
            format!("{XML_HEADER}<channel><link>http://example.com/</link></channel>")
        );
    }

    #[test]
    fn test_html_document() {
        let mut doc = Document::html();
        let html = doc.create_element("html").unwrap();
        let body = doc
            .create_element_with(
                "BODY",
                vec![
                    ("class", AttributeValue::classes(["main", "wide"])),
                    ("style", AttributeValue::styles([("margin", "0")])),
                    ("data-x", AttributeValue::from("1")),
                ],
                None,
                None,
            )
            .unwrap();
        let br = doc.create_element("br").unwrap();
        doc.append(Document::ROOT, html).unwrap();
        doc.append(html, body).unwrap();
        doc.append_text(body, "Hello").unwrap();
        doc.append(body, br).unwrap();
        doc.append_comment(body, " done ").unwrap();

        assert_eq!(
            doc.to_markup().unwrap(),
            "<!DOCTYPE html>\r\n<html><body class=\"main wide\" style=\"margin:0;\" \
             data-x=\"1\">Hello<br /><!-- done --></body></html>"
        );
        assert_eq!(
            doc.node_markup(html).unwrap(),
            "<body class=\"main wide\" style=\"margin:0;\" data-x=\"1\">Hello<br /><!-- done --></body>"
        );
    }

    #[test]
    fn test_empty_class_and_style_are_omitted() {
        let mut doc = Document::html();
        let div = doc.create_element("div").unwrap();
        doc.element_mut(div).unwrap().add_class("x").set_style("color", "red");
        doc.element_mut(div).unwrap().remove_class("x").remove_style("color");
        doc.append(Document::ROOT, div).unwrap();
        assert_eq!(doc.to_markup().unwrap(), "<!DOCTYPE html>\r\n<div></div>");
    }

    #[test]
    fn test_quote_escaping_only() {
        let mut doc = Document::html();
        let a = doc
            .create_element_with("a", [("title", "say \"hi\" & <go>")], None, None)
            .unwrap();
        doc.append(Document::ROOT, a).unwrap();
        assert_eq!(
            doc.node_markup(Document::ROOT).unwrap(),
            "<!DOCTYPE html>\r\n<a title=\"say &quot;hi&quot; & <go>\"></a>"
        );
    }

    #[test]
    fn test_cdata_and_doctype_options() {
        let mut doc = Document::html();
        doc.add_doctype_string("PUBLIC").unwrap();
        let script = doc.create_element("script").unwrap();
        doc.append_cdata(script, "a < b").unwrap();
        doc.append(Document::ROOT, script).unwrap();
        assert_eq!(
            doc.to_markup().unwrap(),
            "<!DOCTYPE html PUBLIC>\r\n<script><![CDATA[a < b]]></script>"
        );
    }

    #[test]
    fn test_custom_line_ending() {
        let doc = Document::new(DocumentConfig {
            doctype: DoctypeKind::Xml,
            encoding: Some("latin1".into()),
            version: Some("1.1".into()),
        });
        let serializer = MarkupSerializer::with_config(SerializerConfig {
            line_ending: "\n".to_string(),
        });
        assert_eq!(
            serializer.serialize(&doc).unwrap(),
            "<?xml version=\"1.1\" encoding=\"latin1\"?>\n"
        );
    }

    #[test]
    fn test_inner_text() {
        let mut doc = Document::html();
        let p = doc.create_element("p").unwrap();
        let b = doc.create_element_with("b", Vec::<(&str, &str)>::new(), Some("bold"), None).unwrap();
        doc.append_text(p, "plain ").unwrap();
        doc.append(p, b).unwrap();
        assert_eq!(doc.inner_text(p).unwrap(), "plain bold");
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut doc = Document::html();
        let a = doc.create_element("article").unwrap();
        let b = doc.create_element("section").unwrap();
        let c = doc.create_element("p").unwrap();
        doc.append(Document::ROOT, a).unwrap();
        doc.append(a, b).unwrap();
        doc.append(b, c).unwrap();
        doc.append(c, a).unwrap();

        assert!(matches!(doc.to_markup(), Err(DomError::StructuralViolation(_))));
        assert!(matches!(doc.snapshot(a), Err(DomError::StructuralViolation(_))));
    }

    #[test]
    fn test_snapshot_json() {
        let mut doc = Document::html();
        let ul = doc
            .create_element_with("ul", [("id", "menu")], None, None)
            .unwrap();
        doc.append_text(ul, "x").unwrap();
        doc.append(Document::ROOT, ul).unwrap();

        let json: serde_json::Value = serde_json::from_str(&doc.to_json(ul).unwrap()).unwrap();
        assert_eq!(json["name"], "ul");
        assert_eq!(json["attributes"][0], "id=\"menu\"");
        assert_eq!(json["children"][0]["value"], "x");

        let snapshot = doc.snapshot(Document::ROOT).unwrap();
        assert_eq!(snapshot.node_type, NodeType::Document);
        assert_eq!(snapshot.children.len(), 1);
    }
}
