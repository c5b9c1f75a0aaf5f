//! User profile endpoints.

use artship_core::User;
use serde::Serialize;
use serde_json::Value;

use super::art::ImageUpload;
use super::decode_user;
use crate::client::ArtshipClient;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::store::CredentialStore;

/// Tracing target for user endpoint fallbacks.
const TRACING_TARGET: &str = "artship_client::api";

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

/// User profile operations.
///
/// Obtained from [`ArtshipClient::users`]. Returned users are normalized
/// and their avatar paths absolutized against the backend origin.
#[derive(Debug, Clone, Copy)]
pub struct UserApi<'a> {
    client: &'a ArtshipClient,
}

impl<'a> UserApi<'a> {
    pub(crate) fn new(client: &'a ArtshipClient) -> Self {
        Self { client }
    }

    /// The signed-in user's own record.
    pub async fn me(&self) -> Result<User> {
        let value = self.client.execute(ApiRequest::get("/users/me")).await?;
        self.finish(value)
    }

    /// Fetches a user, preferring the authenticated view.
    ///
    /// When the authenticated lookup fails (for instance on a private
    /// profile the caller cannot read in full) this falls back to the
    /// public view rather than failing the call.
    pub async fn get(&self, user_id: i64) -> Result<User> {
        if self.client.store().access_token().is_some() {
            match self.get_full(user_id).await {
                Ok(user) => return Ok(user),
                Err(err) => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        user_id,
                        error = %err,
                        "Full user lookup failed, falling back to public view"
                    );
                }
            }
        }
        self.get_public(user_id).await
    }

    /// The authenticated view of a user.
    pub async fn get_full(&self, user_id: i64) -> Result<User> {
        let request = ApiRequest::get(format!("/users/{user_id}"));
        let value = self
            .client
            .execute(request)
            .await
            .map_err(|err| err.or_not_found("user"))?;
        self.finish(value)
    }

    /// The public view of a user.
    pub async fn get_public(&self, user_id: i64) -> Result<User> {
        let request = ApiRequest::get(format!("/users/public/{user_id}"));
        let value = self
            .client
            .execute(request)
            .await
            .map_err(|err| err.or_not_found("user"))?;
        self.finish(value)
    }

    /// Looks a user up by username.
    pub async fn by_username(&self, username: &str) -> Result<User> {
        let request = ApiRequest::get(format!("/users/username/{username}"));
        let value = self
            .client
            .execute(request)
            .await
            .map_err(|err| err.or_not_found("user"))?;
        self.finish(value)
    }

    /// Lists public users.
    pub async fn list(&self) -> Result<Vec<User>> {
        let value = self.client.execute(ApiRequest::get("/users")).await?;
        let raw: Vec<Value> = serde_json::from_value(value)?;
        Ok(raw
            .into_iter()
            .filter_map(|entry| self.finish(entry).ok())
            .collect())
    }

    /// Updates the signed-in user's profile fields.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<User> {
        let body = serde_json::to_value(patch)?;
        let request = ApiRequest::put("/users/me").json(body);
        let value = self.client.execute(request).await?;
        self.finish(value)
    }

    /// Uploads a new avatar image.
    pub async fn upload_avatar(&self, image: ImageUpload) -> Result<Value> {
        let request = ApiRequest::post("/users/me/avatar").form(vec![image.into_part("file")]);
        self.client.execute(request).await
    }

    /// Removes the avatar, restoring the default.
    pub async fn delete_avatar(&self) -> Result<()> {
        let request = ApiRequest::delete("/users/me/avatar");
        self.client.execute(request).await.map(drop)
    }

    /// Decodes, normalizes and absolutizes one user record.
    fn finish(&self, value: Value) -> Result<User> {
        let mut user = decode_user(value)?;
        user.avatar_url = self.client.absolute_url(&user.avatar_url);
        Ok(user)
    }
}
