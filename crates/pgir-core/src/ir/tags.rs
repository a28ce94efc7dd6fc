//! Smart comments.
//!
//! A catalog comment may start with `@tag` / `@tag value` lines; everything
//! after the first line that is not a tag is the description.
//!
//! ```text
//! @name Member
//! @omit delete
//! People who can sign in.
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag dropping an object, or some of its operations.
pub const TAG_OMIT: &str = "omit";
/// Tag overriding the inflected name.
pub const TAG_NAME: &str = "name";
/// Tag overriding a forward relation name (on foreign keys).
pub const TAG_FIELD_NAME: &str = "fieldName";
/// Tag overriding a reverse relation name (on foreign keys).
pub const TAG_FOREIGN_FIELD_NAME: &str = "foreignFieldName";

/// Tags parsed from a comment, keyed by tag name.
///
/// A tag without a value maps to an empty string. A repeated tag keeps its
/// last value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    /// Create an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag.
    pub fn with(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(tag.into(), value.into());
        self
    }

    /// Get a tag value.
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.0.get(tag).map(String::as_str)
    }

    /// Check if a tag is present.
    pub fn has(&self, tag: &str) -> bool {
        self.0.contains_key(tag)
    }

    /// Name override from `@name`, if non-empty.
    pub fn name(&self) -> Option<&str> {
        self.non_empty(TAG_NAME)
    }

    /// Forward relation name override from `@fieldName`.
    pub fn field_name(&self) -> Option<&str> {
        self.non_empty(TAG_FIELD_NAME)
    }

    /// Reverse relation name override from `@foreignFieldName`.
    pub fn foreign_field_name(&self) -> Option<&str> {
        self.non_empty(TAG_FOREIGN_FIELD_NAME)
    }

    /// Operations dropped by `@omit`.
    pub fn omit(&self) -> Omit {
        match self.get(TAG_OMIT) {
            None => Omit::default(),
            Some(value) => Omit::parse(value),
        }
    }

    /// Check if there are no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate tags in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn non_empty(&self, tag: &str) -> Option<&str> {
        self.get(tag).filter(|v| !v.is_empty())
    }
}

/// Operations dropped by an `@omit` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Omit {
    /// Bare `@omit`: the object disappears.
    pub all: bool,
    /// `read`.
    pub read: bool,
    /// `insert` / `create`.
    pub insert: bool,
    /// `update`.
    pub update: bool,
    /// `delete`.
    pub delete: bool,
    /// `execute`.
    pub execute: bool,
}

impl Omit {
    /// Parse an `@omit` value (comma separated operations, empty for all).
    pub fn parse(value: &str) -> Self {
        let mut omit = Omit::default();
        let ops: Vec<&str> = value
            .split(',')
            .map(str::trim)
            .filter(|op| !op.is_empty())
            .collect();
        if ops.is_empty() {
            omit.all = true;
            return omit;
        }

        for op in ops {
            match op.to_ascii_lowercase().as_str() {
                "all" => omit.all = true,
                "read" => omit.read = true,
                "insert" | "create" => omit.insert = true,
                "update" => omit.update = true,
                "delete" => omit.delete = true,
                "execute" => omit.execute = true,
                other => tracing::debug!(operation = %other, "ignoring unknown @omit operation"),
            }
        }
        omit
    }

    /// Check if nothing is omitted.
    pub fn is_none(&self) -> bool {
        *self == Omit::default()
    }
}

/// A parsed comment: tags plus free-text description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmartComment {
    /// Leading tags.
    pub tags: Tags,
    /// Remaining text, trimmed; `None` if empty.
    pub description: Option<String>,
}

impl SmartComment {
    /// Parse a catalog comment.
    pub fn parse(comment: Option<&str>) -> Self {
        let Some(comment) = comment else {
            return Self::default();
        };

        let mut tags = Tags::new();
        let mut lines = comment.lines().peekable();
        while let Some(line) = lines.peek() {
            let line = line.trim();
            let Some(tag) = line.strip_prefix('@') else {
                break;
            };
            let (name, value) = match tag.split_once(char::is_whitespace) {
                Some((name, value)) => (name, value.trim()),
                None => (tag, ""),
            };
            if name.is_empty() {
                break;
            }
            tags.0.insert(name.to_string(), value.to_string());
            lines.next();
        }

        let description = lines.collect::<Vec<_>>().join("\n").trim().to_string();
        Self {
            tags,
            description: (!description.is_empty()).then_some(description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags_and_description() {
        let comment = SmartComment::parse(Some(
            "@name Member\n@omit delete,update\nPeople who can sign in.\nSecond line.",
        ));

        assert_eq!(comment.tags.name(), Some("Member"));
        assert_eq!(comment.tags.get("omit"), Some("delete,update"));
        assert_eq!(
            comment.description.as_deref(),
            Some("People who can sign in.\nSecond line.")
        );
    }

    #[test]
    fn test_parse_without_comment() {
        let comment = SmartComment::parse(None);
        assert!(comment.tags.is_empty());
        assert!(comment.description.is_none());
    }

    #[test]
    fn test_tags_stop_at_first_text_line() {
        let comment = SmartComment::parse(Some("Plain text\n@omit"));
        assert!(comment.tags.is_empty());
        assert_eq!(comment.description.as_deref(), Some("Plain text\n@omit"));
    }

    #[test]
    fn test_bare_omit() {
        let comment = SmartComment::parse(Some("@omit"));
        let omit = comment.tags.omit();
        assert!(omit.all);
        assert!(comment.description.is_none());
    }

    #[test]
    fn test_omit_operations() {
        let omit = Omit::parse("create, update,READ,bogus");
        assert!(!omit.all);
        assert!(omit.insert);
        assert!(omit.update);
        assert!(omit.read);
        assert!(!omit.delete);
    }

    #[test]
    fn test_empty_name_tag_is_ignored() {
        let tags = Tags::new().with(TAG_NAME, "");
        assert!(tags.has(TAG_NAME));
        assert_eq!(tags.name(), None);
        assert!(tags.omit().is_none());
    }
}
