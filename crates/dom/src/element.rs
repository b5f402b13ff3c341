//! Element payload: tag, id, attributes, classes and inline styles
//!
//! `class` and `style` are not stored in the attribute collection. They live
//! in two always-present collections and are rendered ahead of the plain
//! attributes, which gives the same markup as keeping them in slots 0 and 1.

use crate::collection::OrderedCollection;
use crate::error::{DomError, Result};
use crate::lists::{ClassCollection, ClassList, StyleCollection};
use crate::property::{Attribute, Style};
use crate::types::NodeId;
use crate::utils;
use std::borrow::Cow;
use std::fmt;

pub const ATTRIBUTE_NAME_CLASS: &str = "class";
pub const ATTRIBUTE_NAME_STYLE: &str = "style";

/// Attribute value accepted at element construction
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Classes(ClassList),
    Styles(Vec<(String, String)>),
}

impl AttributeValue {
    pub fn classes(list: impl Into<ClassList>) -> Self {
        AttributeValue::Classes(list.into())
    }

    pub fn styles<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        AttributeValue::Styles(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Plain text form, used when a value lands in an ordinary attribute
    pub fn to_text(&self) -> String {
        match self {
            AttributeValue::Text(text) => text.clone(),
            AttributeValue::Classes(list) => list.tokens().join(" "),
            AttributeValue::Styles(pairs) => pairs
                .iter()
                .map(|(name, value)| format!("{name}:{value};"))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<ClassList> for AttributeValue {
    fn from(value: ClassList) -> Self {
        AttributeValue::Classes(value)
    }
}

#[derive(Debug, Clone)]
pub struct ElementData {
    /// Node this payload belongs to, once allocated
    owner: Option<NodeId>,
    /// First `id` seen at construction; not synced with later attribute changes
    id: Option<String>,
    tag: String,
    attributes: OrderedCollection<Attribute>,
    classes: ClassCollection,
    styles: StyleCollection,
}

impl ElementData {
    pub fn new(tag: &str) -> Result<Self> {
        if !utils::is_valid_tag_name(tag) {
            return Err(DomError::InvalidTagName(tag.to_string()));
        }

        Ok(Self {
            owner: None,
            id: None,
            tag: tag.to_string(),
            attributes: OrderedCollection::new(),
            classes: ClassCollection::new(),
            styles: StyleCollection::new(),
        })
    }

    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// Point this payload and every attribute/style at `owner`
    pub(crate) fn set_owner(&mut self, owner: NodeId) {
        self.owner = Some(owner);
        for attr in self.attributes.values_mut() {
            attr.set_owner_element(Some(owner));
        }
        self.styles.set_owner(owner);
    }

    /// Detached copy for a cloned element: same tag and properties, no
    /// captured id. The arena points it at its new node on allocation.
    pub(crate) fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = None;
        copy.owner = None;
        copy
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Apply a construction-time attribute list
    ///
    /// The first `id` key fixes the element id; `class` and `style` go
    /// through the class/style collections, everything else becomes a
    /// plain attribute.
    pub fn apply_attributes<I, K, V>(&mut self, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        for (name, value) in attributes {
            let name = name.into();
            let value = value.into();

            if name == "id" && self.id.is_none() {
                self.id = Some(value.to_text());
            }

            match (name.as_str(), value) {
                (ATTRIBUTE_NAME_CLASS, AttributeValue::Classes(list)) => self.add_class(list),
                (ATTRIBUTE_NAME_STYLE, AttributeValue::Styles(pairs)) => self.set_styles(pairs),
                (_, other) => self.set_attribute(&name, other.to_text()),
            };
        }
        self
    }

    // ---- classes ----

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }

    /// Add a token, a space-separated string, or a list of either
    pub fn add_class(&mut self, value: impl Into<ClassList>) -> &mut Self {
        for token in value.into().tokens() {
            self.classes.add(token);
        }
        self
    }

    pub fn remove_class(&mut self, name: &str) -> &mut Self {
        self.classes.remove(name);
        self
    }

    pub fn class_text(&self) -> String {
        self.classes.text()
    }

    pub fn classes(&self) -> &ClassCollection {
        &self.classes
    }

    // ---- styles ----

    pub fn set_style(&mut self, name: impl Into<String>, value: impl fmt::Display) -> &mut Self {
        self.styles.set(Style::new(name, value, self.owner));
        self
    }

    pub fn set_styles<I, K, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: fmt::Display,
    {
        for (name, value) in pairs {
            self.set_style(name, value);
        }
        self
    }

    pub fn get_style(&self, name: &str) -> Option<&str> {
        self.styles.get(name)
    }

    /// Remove one declaration, or all of them with `"*"`
    pub fn remove_style(&mut self, name: &str) -> &mut Self {
        self.styles.remove(name);
        self
    }

    pub fn style_text(&self) -> String {
        self.styles.text()
    }

    pub fn styles(&self) -> &StyleCollection {
        &self.styles
    }

    // ---- attributes ----

    /// Set an attribute, replacing an existing one with the same name in
    /// place. `class` adds class tokens, `style` parses declarations.
    pub fn set_attribute(&mut self, name: &str, value: impl fmt::Display) -> &mut Self {
        self.set_attribute_object(Attribute::new(name, value, self.owner))
    }

    pub fn set_attribute_object(&mut self, attribute: Attribute) -> &mut Self {
        let name = attribute.name().to_string();
        match name.as_str() {
            ATTRIBUTE_NAME_CLASS => self.add_class(attribute.value()),
            ATTRIBUTE_NAME_STYLE => self.set_styles(utils::parse_declarations(attribute.value())),
            _ => {
                match self.attributes.find_index(|attr| attr.name() == name) {
                    Some(index) => {
                        if let Ok(slot) = self.attributes.item_mut(index) {
                            *slot = attribute;
                        }
                    }
                    None => {
                        self.attributes.append(attribute);
                    }
                }
                self
            }
        }
    }

    /// Attribute value; `class`/`style` yield their rendered text
    pub fn get_attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            ATTRIBUTE_NAME_CLASS => Some(Cow::Owned(self.class_text())),
            ATTRIBUTE_NAME_STYLE => Some(Cow::Owned(self.style_text())),
            _ => self
                .get_attribute_object(name)
                .map(|attr| Cow::Borrowed(attr.value())),
        }
    }

    pub fn get_attribute_object(&self, name: &str) -> Option<&Attribute> {
        self.attributes.values().find(|attr| attr.name() == name)
    }

    /// No-op when the attribute does not exist
    pub fn remove_attribute(&mut self, name: &str) -> &mut Self {
        match name {
            ATTRIBUTE_NAME_CLASS => {
                self.classes.clear();
            }
            ATTRIBUTE_NAME_STYLE => {
                self.styles.remove("*");
            }
            _ => {
                if let Some(index) = self.attributes.find_index(|attr| attr.name() == name) {
                    let _ = self.attributes.del(index);
                }
            }
        }
        self
    }

    /// `class` and `style` always exist on an element
    pub fn has_attribute(&self, name: &str) -> bool {
        matches!(name, ATTRIBUTE_NAME_CLASS | ATTRIBUTE_NAME_STYLE)
            || self.get_attribute_object(name).is_some()
    }

    /// Plain attributes, without class/style
    pub fn attributes(&self) -> &OrderedCollection<Attribute> {
        &self.attributes
    }

    /// False for an element carrying only its empty class/style lists
    pub fn has_attributes(&self) -> bool {
        !self.classes.is_empty() || !self.styles.is_empty() || !self.attributes.is_empty()
    }

    /// `name="value"` strings in output order; empty class/style are skipped
    pub fn rendered_attributes(&self) -> Vec<String> {
        let mut rendered = Vec::with_capacity(self.attributes.len() + 2);
        if !self.classes.is_empty() {
            rendered.push(format!("class=\"{}\"", self.class_text()));
        }
        if !self.styles.is_empty() {
            rendered.push(format!("style=\"{}\"", self.style_text()));
        }
        rendered.extend(self.attributes.values().map(ToString::to_string));
        rendered
    }
}

/// Owner is a back-reference and does not take part in equality.
impl PartialEq for ElementData {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.tag == other.tag
            && self.attributes == other.attributes
            && self.classes == other.classes
            && self.styles == other.styles
    }
}
