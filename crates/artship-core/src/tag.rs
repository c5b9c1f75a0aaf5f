//! Tags and tag-line handling.
//!
//! Tags travel in two directions with different conventions: the backend
//! stores bare names (`paint`), while the UI renders and accepts a hash
//! line (`#paint #art`). The wire shape is also inconsistent, so [`TagRef`]
//! models every observed variant explicitly instead of probing fields.

use serde::{Deserialize, Serialize};

/// Rendering of an empty tag list.
pub const EMPTY_TAG_LINE: &str = "#no-tags";

/// A stored tag record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Backend identifier.
    pub id: i64,
    /// Bare tag name, no leading `#`.
    pub name: String,
}

/// One tag as the backend may serialize it inside a post.
///
/// Older endpoints emit bare strings, newer ones emit records whose name
/// field has drifted between `name`, `tag` and `displayName`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagRef {
    /// A bare tag string, with or without a leading `#`.
    Name(String),
    /// A tag record.
    Record {
        #[serde(default)]
        id: Option<i64>,
        #[serde(default, alias = "tag", alias = "displayName")]
        name: Option<String>,
    },
}

impl TagRef {
    /// The displayable label of this reference, if it carries one.
    pub fn label(&self) -> Option<&str> {
        match self {
            TagRef::Name(name) => Some(name.as_str()),
            TagRef::Record { name, .. } => name.as_deref(),
        }
    }
}

/// The `tags` field of a post: a single string or a list of [`TagRef`]s.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsField {
    /// One tag, or a pre-joined tag line.
    One(String),
    /// A list of tag references.
    Many(Vec<TagRef>),
}

impl TagsField {
    /// Normalizes into the canonical list of `#`-prefixed tags.
    ///
    /// Empty and whitespace-only entries are dropped; a pre-joined line is
    /// split on whitespace first.
    pub fn normalize(&self) -> Vec<String> {
        match self {
            TagsField::One(line) => line.split_whitespace().filter_map(normalize_tag).collect(),
            TagsField::Many(refs) => refs
                .iter()
                .filter_map(|r| r.label().and_then(normalize_tag))
                .collect(),
        }
    }
}

/// Normalizes one raw tag to its `#`-prefixed form.
///
/// Returns `None` for empty input after trimming.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "#" {
        return None;
    }
    if let Some(rest) = trimmed.strip_prefix('#') {
        if rest.is_empty() {
            return None;
        }
        return Some(trimmed.to_owned());
    }
    Some(format!("#{trimmed}"))
}

/// Joins normalized tags into a display line, [`EMPTY_TAG_LINE`] when empty.
pub fn format_tag_line(tags: &[String]) -> String {
    if tags.is_empty() {
        EMPTY_TAG_LINE.to_owned()
    } else {
        tags.join(" ")
    }
}

/// Splits a user-entered tag line into bare names, `#` stripped.
pub fn parse_tag_line(line: &str) -> Vec<String> {
    line.split_whitespace()
        .map(|tag| tag.strip_prefix('#').unwrap_or(tag))
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}
