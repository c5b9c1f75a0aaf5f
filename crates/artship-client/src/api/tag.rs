//! Tag and art-tag endpoints.

use artship_core::{ArtPost, Page, Tag, parse_tag_line};
use serde_json::json;

use super::decode_art_page;
use crate::client::ArtshipClient;
use crate::error::Result;
use crate::http::ApiRequest;

/// Tracing target for tag application.
const TRACING_TARGET: &str = "artship_client::api";

/// Tag operations, obtained from [`ArtshipClient::tags`].
#[derive(Debug, Clone, Copy)]
pub struct TagApi<'a> {
    client: &'a ArtshipClient,
}

impl<'a> TagApi<'a> {
    pub(crate) fn new(client: &'a ArtshipClient) -> Self {
        Self { client }
    }

    /// Creates a tag.
    pub async fn create(&self, name: &str) -> Result<Tag> {
        let request = ApiRequest::post("/tags").json(json!({ "name": name }));
        self.client.execute_as(request).await
    }

    /// Lists tags, sorted server-side.
    pub async fn list(
        &self,
        page: u32,
        size: u32,
        sort_by: &str,
        direction: &str,
    ) -> Result<Page<Tag>> {
        let request = ApiRequest::get("/tags")
            .query("page", page)
            .query("size", size)
            .query("sortBy", sort_by)
            .query("direction", direction);
        self.client.execute_as(request).await
    }

    /// Fetches one tag.
    pub async fn get(&self, tag_id: i64) -> Result<Tag> {
        let request = ApiRequest::get(format!("/tags/{tag_id}"));
        self.client
            .execute_as(request)
            .await
            .map_err(|err| err.or_not_found("tag"))
    }

    /// Looks a tag up by name.
    pub async fn by_name(&self, name: &str) -> Result<Tag> {
        let request = ApiRequest::get(format!("/tags/name/{name}"));
        self.client
            .execute_as(request)
            .await
            .map_err(|err| err.or_not_found("tag"))
    }

    /// Substring search over tag names.
    pub async fn search(&self, query: &str, page: u32, size: u32) -> Result<Page<Tag>> {
        let request = ApiRequest::get("/tags/search")
            .query("q", query)
            .query("page", page)
            .query("size", size);
        self.client.execute_as(request).await
    }

    /// The most used tags.
    pub async fn popular(&self, limit: u32) -> Result<Vec<Tag>> {
        let request = ApiRequest::get("/tags/popular").query("limit", limit);
        self.client.execute_as(request).await
    }

    /// Prefix completion for the tag input.
    pub async fn autocomplete(&self, query: &str) -> Result<Vec<Tag>> {
        let request = ApiRequest::get("/tags/autocomplete").query("q", query);
        self.client.execute_as(request).await
    }

    /// Whether a tag with this name exists.
    pub async fn exists(&self, name: &str) -> Result<bool> {
        let request = ApiRequest::get(format!("/tags/exists/{name}"));
        self.client.execute_as(request).await
    }

    /// Renames a tag.
    pub async fn update(&self, tag_id: i64, name: &str) -> Result<Tag> {
        let request = ApiRequest::put(format!("/tags/{tag_id}")).query("name", name);
        self.client.execute_as(request).await
    }

    /// Deletes a tag.
    pub async fn delete(&self, tag_id: i64) -> Result<()> {
        let request = ApiRequest::delete(format!("/tags/{tag_id}"));
        self.client.execute(request).await.map(drop)
    }

    /// Creates several tags at once, returning existing ones untouched.
    pub async fn create_batch(&self, names: &[String]) -> Result<Vec<Tag>> {
        let request = ApiRequest::post("/tags/batch").json(json!(names));
        self.client.execute_as(request).await
    }

    /// Fetches the tag by name, creating it when absent.
    pub async fn get_or_create(&self, name: &str) -> Result<Tag> {
        if self.exists(name).await? {
            self.by_name(name).await
        } else {
            self.create(name).await
        }
    }

    // Art-tag relations.

    /// Attaches a tag to a post.
    pub async fn attach(&self, art_id: i64, tag_id: i64) -> Result<()> {
        let request = ApiRequest::post(format!("/art-tags/art/{art_id}/tag/{tag_id}"));
        self.client.execute(request).await.map(drop)
    }

    /// Detaches a tag from a post.
    pub async fn detach(&self, art_id: i64, tag_id: i64) -> Result<()> {
        let request = ApiRequest::delete(format!("/art-tags/art/{art_id}/tag/{tag_id}"));
        self.client.execute(request).await.map(drop)
    }

    /// Whether the tag is attached to the post.
    pub async fn attached(&self, art_id: i64, tag_id: i64) -> Result<bool> {
        let request = ApiRequest::get(format!("/art-tags/art/{art_id}/tag/{tag_id}/exists"));
        self.client.execute_as(request).await
    }

    /// Tags attached to a post.
    pub async fn tags_of(&self, art_id: i64) -> Result<Vec<Tag>> {
        let request = ApiRequest::get(format!("/art-tags/art/{art_id}/tags"));
        self.client.execute_as(request).await
    }

    /// Posts carrying a tag.
    pub async fn arts_with(&self, tag_id: i64) -> Result<Page<ArtPost>> {
        let request = ApiRequest::get(format!("/art-tags/tag/{tag_id}/arts"));
        decode_art_page(self.client.execute(request).await?)
    }

    /// Attaches several tags to a post by name, creating missing ones.
    pub async fn attach_batch(&self, art_id: i64, names: &[String]) -> Result<Vec<Tag>> {
        let request = ApiRequest::post(format!("/art-tags/art/{art_id}/tags/batch"))
            .json(json!({ "tagNames": names }));
        self.client.execute_as(request).await
    }

    /// Detaches every tag from a post.
    pub async fn detach_all(&self, art_id: i64) -> Result<()> {
        let request = ApiRequest::delete(format!("/art-tags/art/{art_id}/tags"));
        self.client.execute(request).await.map(drop)
    }

    /// Number of tags on a post.
    pub async fn tag_count(&self, art_id: i64) -> Result<i64> {
        let request = ApiRequest::get(format!("/art-tags/art/{art_id}/tags/count"));
        self.client.execute_as(request).await
    }

    /// Number of posts carrying a tag.
    pub async fn art_count(&self, tag_id: i64) -> Result<i64> {
        let request = ApiRequest::get(format!("/art-tags/tag/{tag_id}/arts/count"));
        self.client.execute_as(request).await
    }

    /// Applies a user-entered tag line (`"#paint #art"`) to a post.
    ///
    /// Missing tags are created in one batch, then attached one by one; an
    /// attachment failure is logged and skipped so one broken tag does not
    /// lose the rest. Returns the tags that were attached.
    pub async fn apply_tag_line(&self, art_id: i64, line: &str) -> Result<Vec<Tag>> {
        let names = parse_tag_line(line);
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let tags = self.create_batch(&names).await?;

        let mut attached = Vec::with_capacity(tags.len());
        for tag in tags {
            match self.attach(art_id, tag.id).await {
                Ok(()) => attached.push(tag),
                Err(err) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        art_id,
                        tag = %tag.name,
                        error = %err,
                        "Failed to attach tag, skipping"
                    );
                }
            }
        }

        Ok(attached)
    }

    /// Replaces a post's tags with the given tag line.
    pub async fn replace_tag_line(&self, art_id: i64, line: &str) -> Result<Vec<Tag>> {
        self.detach_all(art_id).await?;
        self.apply_tag_line(art_id, line).await
    }
}
