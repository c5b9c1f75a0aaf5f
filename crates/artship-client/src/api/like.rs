//! Like endpoints.

use jiff::civil::DateTime;
use serde::Deserialize;

use crate::client::ArtshipClient;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::store::CredentialStore;

/// Tracing target for like endpoint degradation.
const TRACING_TARGET: &str = "artship_client::api";

/// One like, as the backend serializes it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRecord {
    pub user_id: i64,
    pub art_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub art_title: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime>,
}

/// Like operations, obtained from [`ArtshipClient::likes`].
#[derive(Debug, Clone, Copy)]
pub struct LikeApi<'a> {
    client: &'a ArtshipClient,
}

impl<'a> LikeApi<'a> {
    pub(crate) fn new(client: &'a ArtshipClient) -> Self {
        Self { client }
    }

    /// Likes a post.
    pub async fn add(&self, user_id: i64, art_id: i64) -> Result<LikeRecord> {
        let request = ApiRequest::post(format!("/likes/user/{user_id}/art/{art_id}"));
        self.client.execute_as(request).await
    }

    /// Removes a like.
    pub async fn remove(&self, user_id: i64, art_id: i64) -> Result<()> {
        let request = ApiRequest::delete(format!("/likes/user/{user_id}/art/{art_id}"));
        self.client.execute(request).await.map(drop)
    }

    /// Whether the user has liked the post.
    ///
    /// Degrades to `false` without a stored token and on auth failures;
    /// a like heart rendering unlit beats failing the whole view.
    pub async fn is_liked(&self, user_id: i64, art_id: i64) -> Result<bool> {
        if self.client.store().access_token().is_none() {
            return Ok(false);
        }

        let request = ApiRequest::get(format!("/likes/user/{user_id}/art/{art_id}/exists"));
        match self.client.execute_as(request).await {
            Ok(liked) => Ok(liked),
            Err(err) if err.is_auth_error() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Number of likes on a post.
    pub async fn count(&self, art_id: i64) -> Result<i64> {
        let request = ApiRequest::get(format!("/likes/art/{art_id}/count"));
        self.client.execute_as(request).await
    }

    /// [`LikeApi::count`], degrading every failure to zero.
    pub async fn count_or_zero(&self, art_id: i64) -> i64 {
        match self.count(art_id).await {
            Ok(count) => count,
            Err(err) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    art_id,
                    error = %err,
                    "Like count unavailable, rendering zero"
                );
                0
            }
        }
    }

    /// Everyone who liked a post.
    pub async fn list(&self, art_id: i64) -> Result<Vec<LikeRecord>> {
        let request = ApiRequest::get(format!("/likes/art/{art_id}"));
        self.client.execute_as(request).await
    }
}
