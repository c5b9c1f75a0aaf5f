//! Follow graph endpoints.

use jiff::civil::DateTime;
use serde::Deserialize;

use crate::client::ArtshipClient;
use crate::error::{Error, Result};
use crate::http::ApiRequest;
use crate::store::CredentialStore;

/// One edge of the follow graph, as the backend serializes it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowEdge {
    pub follower_id: i64,
    pub following_id: i64,
    #[serde(default)]
    pub follower_username: Option<String>,
    #[serde(default)]
    pub following_username: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime>,
}

/// Follow graph operations.
///
/// Obtained from [`ArtshipClient::follows`]. The `*_me` conveniences act
/// as the signed-in user and fail with [`Error::Unauthenticated`] when no
/// user record is stored.
#[derive(Debug, Clone, Copy)]
pub struct FollowApi<'a> {
    client: &'a ArtshipClient,
}

impl<'a> FollowApi<'a> {
    pub(crate) fn new(client: &'a ArtshipClient) -> Self {
        Self { client }
    }

    /// Makes `follower_id` follow `following_id`.
    pub async fn follow(&self, follower_id: i64, following_id: i64) -> Result<FollowEdge> {
        let request = ApiRequest::post(format!(
            "/follows/follower/{follower_id}/following/{following_id}"
        ));
        self.client.execute_as(request).await
    }

    /// Removes the follow edge.
    pub async fn unfollow(&self, follower_id: i64, following_id: i64) -> Result<()> {
        let request = ApiRequest::delete(format!(
            "/follows/follower/{follower_id}/following/{following_id}"
        ));
        self.client.execute(request).await.map(drop)
    }

    /// Whether the follow edge exists.
    pub async fn is_following(&self, follower_id: i64, following_id: i64) -> Result<bool> {
        let request = ApiRequest::get(format!(
            "/follows/follower/{follower_id}/following/{following_id}/exists"
        ));
        self.client.execute_as(request).await
    }

    /// Everyone following `user_id`.
    pub async fn followers(&self, user_id: i64) -> Result<Vec<FollowEdge>> {
        let request = ApiRequest::get(format!("/follows/user/{user_id}/followers"));
        self.client.execute_as(request).await
    }

    /// Everyone `user_id` follows.
    pub async fn following(&self, user_id: i64) -> Result<Vec<FollowEdge>> {
        let request = ApiRequest::get(format!("/follows/user/{user_id}/following"));
        self.client.execute_as(request).await
    }

    pub async fn follower_count(&self, user_id: i64) -> Result<i64> {
        let request = ApiRequest::get(format!("/follows/user/{user_id}/followers/count"));
        self.client.execute_as(request).await
    }

    pub async fn following_count(&self, user_id: i64) -> Result<i64> {
        let request = ApiRequest::get(format!("/follows/user/{user_id}/following/count"));
        self.client.execute_as(request).await
    }

    /// Follows `target_id` as the signed-in user.
    pub async fn follow_as_me(&self, target_id: i64) -> Result<FollowEdge> {
        self.follow(self.me()?, target_id).await
    }

    /// Unfollows `target_id` as the signed-in user.
    pub async fn unfollow_as_me(&self, target_id: i64) -> Result<()> {
        self.unfollow(self.me()?, target_id).await
    }

    /// Whether the signed-in user follows `target_id`; false when signed
    /// out.
    pub async fn am_i_following(&self, target_id: i64) -> Result<bool> {
        let Ok(me) = self.me() else {
            return Ok(false);
        };
        self.is_following(me, target_id).await
    }

    /// Follows or unfollows `target_id`, returning the new follow state.
    pub async fn toggle(&self, target_id: i64) -> Result<bool> {
        let me = self.me()?;
        if self.is_following(me, target_id).await? {
            self.unfollow(me, target_id).await?;
            Ok(false)
        } else {
            self.follow(me, target_id).await?;
            Ok(true)
        }
    }

    fn me(&self) -> Result<i64> {
        self.client
            .store()
            .user()
            .map(|user| user.id)
            .ok_or(Error::Unauthenticated)
    }
}
