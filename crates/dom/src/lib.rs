//! Markup DOM Library
//!
//! In-memory document tree builder: create nodes, link them into a tree,
//! edit attributes, classes and inline styles, then render HTML or XML.
//!
//! ## Core Design
//!
//! ```text
//! Document (factory) → DomArena (owned nodes) → NodeId (u32) edges → MarkupSerializer
//!                            ↓
//!                   ElementData: attributes / classes / styles
//! ```
//!
//! - Nodes never own their parent or document; back-references are indices
//! - Node equality is structural, identity only matters for clone tracking
//! - Every mutation validates first, so a failed call changes nothing
//!
//! ## Example
//!
//! ```
//! use markup_dom::Document;
//!
//! let mut doc = Document::xml();
//! let fruits = doc.create_element("fruits").unwrap();
//! let apple = doc
//!     .create_element_with("apple", [("color", "red")], None, Some(true))
//!     .unwrap();
//! doc.append(fruits, apple).unwrap();
//! doc.append(Document::ROOT, fruits).unwrap();
//!
//! assert_eq!(
//!     doc.to_string(),
//!     "<?xml version=\"1.0\" encoding=\"utf-8\"?>\r\n<fruits><apple color=\"red\" /></fruits>"
//! );
//! ```

pub mod arena;
pub mod collection;
pub mod document;
pub mod element;
pub mod error;
pub mod lists;
pub mod mutation;
pub mod navigation;
pub mod property;
pub mod serializer;
pub mod types;
pub mod utils;

pub use arena::DomArena;
pub use collection::OrderedCollection;
pub use document::{Document, DocumentConfig};
pub use element::{AttributeValue, ElementData};
pub use error::{DomError, Result};
pub use lists::{ClassCollection, ClassList, StyleCollection};
pub use property::{Attribute, Property, Style};
pub use serializer::{MarkupSerializer, NodeSnapshot, SerializerConfig};
pub use types::*;
