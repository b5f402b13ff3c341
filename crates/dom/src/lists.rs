//! Class and style sub-collections of an element

use crate::collection::OrderedCollection;
use crate::property::Style;
use crate::types::NodeId;
use std::fmt;

/// Class input accepted by `add_class`: a token, a space-separated string,
/// or a (nested) list of either
#[derive(Debug, Clone, PartialEq)]
pub enum ClassList {
    Token(String),
    Many(Vec<ClassList>),
}

impl ClassList {
    /// Flatten into individual, non-empty tokens
    pub fn tokens(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens(&self, out: &mut Vec<String>) {
        match self {
            ClassList::Token(value) => {
                out.extend(value.split_whitespace().map(str::to_string));
            }
            ClassList::Many(values) => {
                for value in values {
                    value.collect_tokens(out);
                }
            }
        }
    }
}

impl From<&str> for ClassList {
    fn from(value: &str) -> Self {
        ClassList::Token(value.to_string())
    }
}

impl From<String> for ClassList {
    fn from(value: String) -> Self {
        ClassList::Token(value)
    }
}

impl From<&String> for ClassList {
    fn from(value: &String) -> Self {
        ClassList::Token(value.clone())
    }
}

impl<T: Into<ClassList>> From<Vec<T>> for ClassList {
    fn from(values: Vec<T>) -> Self {
        ClassList::Many(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ClassList>, const N: usize> From<[T; N]> for ClassList {
    fn from(values: [T; N]) -> Self {
        ClassList::Many(values.into_iter().map(Into::into).collect())
    }
}

/// Class tokens of an element, deduplicated, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassCollection {
    tokens: OrderedCollection<String>,
}

impl ClassCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one token and drop duplicates
    pub fn add(&mut self, token: impl Into<String>) -> &mut Self {
        self.tokens.append(token.into()).unique();
        self
    }

    pub fn remove(&mut self, token: &str) -> &mut Self {
        self.tokens.filter(|t| t != token);
        self
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.values().any(|t| t == token)
    }

    pub fn clear(&mut self) -> &mut Self {
        self.tokens.del_all();
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.values().map(String::as_str)
    }

    pub fn as_collection(&self) -> &OrderedCollection<String> {
        &self.tokens
    }

    /// Space-joined tokens
    pub fn text(&self) -> String {
        self.iter().collect::<Vec<_>>().join(" ")
    }
}

impl fmt::Display for ClassCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Inline style declarations of an element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleCollection {
    styles: OrderedCollection<Style>,
}

impl StyleCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins: an existing declaration with the same name is
    /// removed and the new one goes to the end.
    pub fn set(&mut self, style: Style) -> &mut Self {
        self.remove(style.name());
        self.styles.append(style);
        self
    }

    /// Value of the first declaration named `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.find(name).map(Style::value)
    }

    pub fn find(&self, name: &str) -> Option<&Style> {
        self.styles.values().find(|style| style.name() == name)
    }

    /// Remove the first declaration named `name`; `"*"` removes all
    pub fn remove(&mut self, name: &str) -> &mut Self {
        if name == "*" {
            self.styles.del_all();
            return self;
        }
        if let Some(index) = self.styles.find_index(|style| style.name() == name) {
            let _ = self.styles.del(index);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Style> + '_ {
        self.styles.values()
    }

    pub(crate) fn set_owner(&mut self, owner: NodeId) {
        for style in self.styles.values_mut() {
            style.set_owner_element(Some(owner));
        }
    }

    pub fn as_collection(&self) -> &OrderedCollection<Style> {
        &self.styles
    }

    /// Space-joined `name:value;` declarations
    pub fn text(&self) -> String {
        self.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for StyleCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_flattening() {
        let list = ClassList::from(vec![
            ClassList::from("a  b"),
            ClassList::from(["c", " d "]),
        ]);
        assert_eq!(list.tokens(), vec!["a", "b", "c", "d"]);
        assert!(ClassList::from("   ").tokens().is_empty());
    }

    #[test]
    fn test_class_collection_dedups() {
        let mut classes = ClassCollection::new();
        classes.add("a").add("b").add("a");
        assert_eq!(classes.text(), "a b");
        classes.remove("a");
        assert_eq!(classes.text(), "b");
        assert!(classes.contains("b"));
        assert!(!classes.contains("a"));
    }

    #[test]
    fn test_style_set_is_last_write_wins() {
        let mut styles = StyleCollection::new();
        styles
            .set(Style::new("color", "red", None))
            .set(Style::new("width", "1px", None))
            .set(Style::new("color", "blue", None));
        assert_eq!(styles.len(), 2);
        assert_eq!(styles.get("color"), Some("blue"));
        assert_eq!(styles.text(), "width:1px; color:blue;");
    }

    #[test]
    fn test_style_wildcard_remove() {
        let mut styles = StyleCollection::new();
        styles
            .set(Style::new("color", "red", None))
            .set(Style::new("width", "1px", None));
        styles.remove("*");
        assert!(styles.is_empty());
        assert_eq!(styles.text(), "");
    }
}
