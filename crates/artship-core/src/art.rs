//! Art posts.

use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};

use crate::assets::resolve_image_url;
use crate::tag::TagsField;
use crate::user::{Author, RawAuthor};

/// A normalized art post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtPost {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Ordered, each entry `#`-prefixed.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Resolved through the upload path rules.
    pub image_url: String,
    pub author: Author,
    pub is_public: bool,
    /// Attached project file, for posts created from the editor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_data_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

/// An art post as the backend serializes it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArt {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<TagsField>,
    #[serde(default, alias = "image", alias = "imagePath")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub author: Option<RawAuthor>,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub project_data_url: Option<String>,
    #[serde(default)]
    pub likes_count: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime>,
    #[serde(default)]
    pub updated_at: Option<DateTime>,
}

impl RawArt {
    /// Normalizes into an [`ArtPost`].
    ///
    /// Returns `None` when the record has no id. The embedded author is
    /// normalized with the post's flat `authorId`/`authorName` columns as
    /// fallbacks, so a post never carries an absent author.
    pub fn normalize(self) -> Option<ArtPost> {
        let id = self.id?;
        let author = self
            .author
            .unwrap_or_default()
            .normalize(self.author_id, self.author_name.as_deref());

        Some(ArtPost {
            id,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            tags: self.tags.map(|tags| tags.normalize()).unwrap_or_default(),
            image_url: resolve_image_url(self.image_url.as_deref().unwrap_or_default()),
            author,
            is_public: self.is_public != Some(false),
            project_data_url: self.project_data_url,
            likes_count: self.likes_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::DEFAULT_ART_IMAGE;
    use crate::user::UNKNOWN_AUTHOR_NAME;

    #[test]
    fn test_normalize_full_record() {
        let raw: RawArt = serde_json::from_str(
            r#"{
                "id": 11,
                "title": "Sunset",
                "description": "oil on canvas",
                "tags": ["paint", {"id": 1, "name": "oil"}],
                "image": "/api/files/images/sunset.png",
                "author": {"id": 4, "displayName": "Dana", "pfp": "dana.png"},
                "isPublic": true,
                "createdAt": "2024-06-01T12:00:00"
            }"#,
        )
        .unwrap();

        let post = raw.normalize().unwrap();
        assert_eq!(post.image_url, "/uploads/images/sunset.png");
        assert_eq!(post.tags, vec!["#paint", "#oil"]);
        assert_eq!(post.author.display_name, "Dana");
        assert_eq!(post.author.avatar_url, "/uploads/images/dana.png");
    }

    #[test]
    fn test_normalize_requires_id() {
        let raw: RawArt = serde_json::from_str(r#"{"title": "nameless"}"#).unwrap();
        assert!(raw.normalize().is_none());
    }

    #[test]
    fn test_normalize_empty_record_defaults() {
        let raw: RawArt = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        let post = raw.normalize().unwrap();
        assert_eq!(post.title, "");
        assert!(post.tags.is_empty());
        assert_eq!(post.image_url, DEFAULT_ART_IMAGE);
        assert_eq!(post.author.display_name, UNKNOWN_AUTHOR_NAME);
        assert!(post.is_public);
    }

    #[test]
    fn test_flat_author_columns_used_as_fallback() {
        let raw: RawArt = serde_json::from_str(
            r#"{"id": 2, "authorId": 8, "authorName": "erin"}"#,
        )
        .unwrap();
        let post = raw.normalize().unwrap();
        assert_eq!(post.author.id, 8);
        assert_eq!(post.author.display_name, "erin");
    }
}
