//! Art post endpoints.

use artship_core::{ArtPost, Page};

use super::{decode_art, decode_art_page};
use crate::client::ArtshipClient;
use crate::error::{Error, Result};
use crate::http::{ApiRequest, FormPart};

/// Largest accepted image upload: 10 MiB, the backend's multipart limit.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// An image file attached to a post or profile.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
    /// An `image/*` MIME type.
    pub content_type: String,
}

impl ImageUpload {
    pub fn new(
        bytes: Vec<u8>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            bytes,
            filename: filename.into(),
            content_type: content_type.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.content_type.starts_with("image/") {
            return Err(Error::invalid_input(format!(
                "upload must be an image, got `{}`",
                self.content_type
            )));
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(Error::invalid_input("image exceeds the 10 MiB upload limit"));
        }
        Ok(())
    }

    pub(crate) fn into_part(self, name: &'static str) -> FormPart {
        FormPart::File {
            name,
            filename: self.filename,
            content_type: self.content_type,
            bytes: self.bytes,
        }
    }
}

/// Fields for creating a post. Title and image are mandatory.
#[derive(Debug, Clone)]
pub struct NewArt {
    pub title: String,
    pub description: Option<String>,
    /// Defaults to public on the backend when omitted.
    pub is_public: Option<bool>,
    pub image: ImageUpload,
}

/// Partial update of a post; absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ArtPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub image: Option<ImageUpload>,
}

/// Art post operations.
///
/// Obtained from [`ArtshipClient::art`]. Every returned post has been
/// through normalization: resolved image path, `#`-prefixed tags, a
/// present author.
#[derive(Debug, Clone, Copy)]
pub struct ArtApi<'a> {
    client: &'a ArtshipClient,
}

impl<'a> ArtApi<'a> {
    pub(crate) fn new(client: &'a ArtshipClient) -> Self {
        Self { client }
    }

    /// The public feed, newest first. No authentication required.
    pub async fn public_feed(&self, page: u32, size: u32) -> Result<Page<ArtPost>> {
        let request = ApiRequest::get("/arts/public")
            .query("page", page)
            .query("size", size)
            .query("sortBy", "createdAt")
            .query("direction", "desc");
        decode_art_page(self.client.execute(request).await?)
    }

    /// The signed-in user's followed-authors feed.
    pub async fn home_feed(&self, page: u32, size: u32) -> Result<Page<ArtPost>> {
        let request = ApiRequest::get("/arts/feed")
            .query("page", page)
            .query("size", size);
        decode_art_page(self.client.execute(request).await?)
    }

    /// Posts carrying the given tag; a leading `#` is stripped.
    pub async fn by_tag(&self, tag: &str, page: u32, size: u32) -> Result<Page<ArtPost>> {
        let name = tag.trim().trim_start_matches('#');
        let request = ApiRequest::get(format!("/arts/tag/{name}"))
            .query("page", page)
            .query("size", size);
        decode_art_page(self.client.execute(request).await?)
    }

    /// Posts by one author. Requires authentication.
    pub async fn by_author(&self, user_id: i64, page: u32, size: u32) -> Result<Page<ArtPost>> {
        let request = ApiRequest::get(format!("/arts/author/{user_id}"))
            .query("page", page)
            .query("size", size);
        decode_art_page(self.client.execute(request).await?)
    }

    /// Title search.
    pub async fn search(&self, title: &str, page: u32, size: u32) -> Result<Page<ArtPost>> {
        let request = ApiRequest::get("/arts/search")
            .query("title", title)
            .query("page", page)
            .query("size", size);
        decode_art_page(self.client.execute(request).await?)
    }

    /// Fetches one post.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when no post has this id.
    pub async fn get(&self, art_id: i64) -> Result<ArtPost> {
        let request = ApiRequest::get(format!("/arts/{art_id}"));
        let value = self
            .client
            .execute(request)
            .await
            .map_err(|err| err.or_not_found("art"))?;
        decode_art(value)
    }

    /// Creates a post from a title and an image upload.
    pub async fn create(&self, draft: NewArt) -> Result<ArtPost> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(Error::invalid_input("a post needs a title"));
        }
        draft.image.validate()?;

        let mut parts = vec![FormPart::Text {
            name: "title",
            value: title.to_owned(),
        }];
        if let Some(description) = draft.description {
            parts.push(FormPart::Text {
                name: "description",
                value: description,
            });
        }
        parts.push(FormPart::Text {
            name: "isPublic",
            value: draft.is_public.unwrap_or(true).to_string(),
        });
        parts.push(draft.image.into_part("imageFile"));

        let request = ApiRequest::post("/arts").form(parts);
        decode_art(self.client.execute(request).await?)
    }

    /// Updates a post; only the provided fields change.
    pub async fn update(&self, art_id: i64, patch: ArtPatch) -> Result<ArtPost> {
        let mut parts = Vec::new();
        if let Some(title) = patch.title {
            parts.push(FormPart::Text {
                name: "title",
                value: title,
            });
        }
        if let Some(description) = patch.description {
            parts.push(FormPart::Text {
                name: "description",
                value: description,
            });
        }
        if let Some(is_public) = patch.is_public {
            parts.push(FormPart::Text {
                name: "isPublic",
                value: is_public.to_string(),
            });
        }
        if let Some(image) = patch.image {
            image.validate()?;
            parts.push(image.into_part("imageFile"));
        }

        let request = ApiRequest::put(format!("/arts/{art_id}")).form(parts);
        decode_art(self.client.execute(request).await?)
    }

    /// Deletes a post.
    pub async fn delete(&self, art_id: i64) -> Result<()> {
        let request = ApiRequest::delete(format!("/arts/{art_id}"));
        self.client.execute(request).await.map(drop)
    }
}
