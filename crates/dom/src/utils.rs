//! Small text helpers shared by elements and the serializer

use once_cell::sync::Lazy;
use regex::Regex;

/// `\w` is ASCII-only: letters, digits and `_`, plus `-`
static TAG_NAME: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"(?-u)^[\w-]+$"));

/// Tag names must match `^[\w-]+$` with an ASCII `\w`
pub fn is_valid_tag_name(tag: &str) -> bool {
    (*TAG_NAME).as_ref().is_ok_and(|pattern| pattern.is_match(tag))
}

/// Parse `name:value; name2:value2` into pairs
///
/// Declarations without a colon or with an empty name are skipped.
pub fn parse_declarations(text: &str) -> Vec<(String, String)> {
    text.split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Drop everything between `<` and the next `>`
pub fn strip_tags(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;

    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    text
}
