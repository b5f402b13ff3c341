//! Element properties: attributes and inline style declarations
//!
//! Both are a name/value pair with a back-reference to the owning element.
//! Fields are read-only once built; changing one means building a new
//! property and replacing it in the owning collection.

use crate::types::NodeId;
use std::fmt;

/// Shared name/value shape
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    value: String,
    owner_element: Option<NodeId>,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl fmt::Display, owner: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
            owner_element: owner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn owner_element(&self) -> Option<NodeId> {
        self.owner_element
    }

    pub fn set_owner_element(&mut self, owner: Option<NodeId>) {
        self.owner_element = owner;
    }
}

/// Owner is a back-reference and does not take part in equality.
impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

/// Markup attribute, rendered as `name="value"`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute(Property);

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl fmt::Display, owner: Option<NodeId>) -> Self {
        Self(Property::new(name, value, owner))
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn value(&self) -> &str {
        self.0.value()
    }

    pub fn owner_element(&self) -> Option<NodeId> {
        self.0.owner_element()
    }

    pub fn set_owner_element(&mut self, owner: Option<NodeId>) {
        self.0.set_owner_element(owner);
    }

    /// Case-insensitive check for the `id` attribute
    pub fn is_id(&self) -> bool {
        self.name().eq_ignore_ascii_case("id")
    }

    pub fn property(&self) -> &Property {
        &self.0
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"{}\"", self.name(), self.value().replace('"', "&quot;"))
    }
}

/// Inline style declaration, rendered as `name:value;`
#[derive(Debug, Clone, PartialEq)]
pub struct Style(Property);

impl Style {
    pub fn new(name: impl Into<String>, value: impl fmt::Display, owner: Option<NodeId>) -> Self {
        Self(Property::new(name, value, owner))
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn value(&self) -> &str {
        self.0.value()
    }

    pub fn owner_element(&self) -> Option<NodeId> {
        self.0.owner_element()
    }

    pub fn set_owner_element(&mut self, owner: Option<NodeId>) {
        self.0.set_owner_element(owner);
    }

    pub fn property(&self) -> &Property {
        &self.0
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{};", self.name(), self.value())
    }
}
