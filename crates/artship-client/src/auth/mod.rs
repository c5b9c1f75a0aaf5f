//! Authentication endpoints.
//!
//! The auth gateway is the only place a network response is allowed to
//! mutate the credential store: login and refresh persist what the backend
//! returns, logout clears it. Everything else reads.

pub(crate) mod refresh;

use artship_core::{RawUser, User};
use jiff::{SignedDuration, Timestamp};
use serde::Deserialize;
use serde_json::json;

use crate::client::ArtshipClient;
use crate::error::{Error, Result};
use crate::http::ApiRequest;
use crate::store::CredentialStore;

use self::refresh::TRACING_TARGET;

/// A new account registration.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login credentials: a username or email plus the password.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub identifier: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }
}

/// The backend's `/auth/login` and `/auth/refresh` response shape.
///
/// Every field is optional on the wire; each present field is persisted
/// independently.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    /// Remaining token lifetime in milliseconds.
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    user: Option<RawUser>,
}

/// Result of a login call.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The access token now in the store, when the backend issued one.
    pub access_token: Option<String>,
    /// The normalized user record, when the backend included one.
    pub user: Option<User>,
    /// Absolute expiry computed from the backend's `expiresIn`.
    pub expires_at: Option<Timestamp>,
}

impl LoginOutcome {
    /// True when the call established a usable session.
    ///
    /// A `200` without an access token is a soft failure: the call
    /// succeeded but there is nothing to authenticate with.
    pub fn established(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Tokens returned by a refresh exchange.
#[derive(Debug, Clone)]
pub struct RefreshedTokens {
    pub access_token: String,
    /// Present when the backend rotated the refresh token.
    pub refresh_token: Option<String>,
}

/// Authentication operations.
///
/// Obtained from [`ArtshipClient::auth`].
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ArtshipClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ArtshipClient) -> Self {
        Self { client }
    }

    /// Registers a new account.
    ///
    /// Registration never establishes a session; the backend returns the
    /// created user without tokens and callers log in separately.
    ///
    /// # Errors
    ///
    /// A taken username or email surfaces as [`Error::Api`] with the
    /// backend's conflict message.
    pub async fn register(&self, account: &NewAccount) -> Result<User> {
        let request = ApiRequest::post("/auth/register").json(json!({
            "username": account.username,
            "email": account.email,
            "password": account.password,
        }));

        let raw: RawUser = self.client.execute_as(request).await?;
        let user = raw
            .normalize()
            .ok_or_else(|| Error::unexpected_shape("registration response carries no user"))?;

        tracing::info!(
            target: TRACING_TARGET,
            user_id = user.id,
            username = %user.username,
            "Account registered"
        );

        Ok(user)
    }

    /// Logs in with a username-or-email identifier.
    ///
    /// The identifier is trimmed before sending. On success, each of the
    /// access token, refresh token, user record and computed expiry is
    /// persisted when present in the response. Check
    /// [`LoginOutcome::established`]: a success response without a token
    /// leaves the client signed out.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome> {
        let request = ApiRequest::post("/auth/login").json(json!({
            "username": credentials.identifier.trim(),
            "password": credentials.password,
        }));

        let response: AuthResponse = self.client.execute_as(request).await?;
        let outcome = self.persist(response);

        if outcome.established() {
            tracing::info!(
                target: TRACING_TARGET,
                user_id = outcome.user.as_ref().map(|user| user.id),
                "Login established a session"
            );
        } else {
            tracing::warn!(
                target: TRACING_TARGET,
                "Login succeeded but the response carried no access token"
            );
        }

        Ok(outcome)
    }

    /// Logs out, clearing the stored session unconditionally.
    ///
    /// The backend call is best-effort: a network or server failure is
    /// logged and absorbed, and the local store is cleared either way.
    /// After this returns the client is signed out.
    pub async fn logout(&self, refresh_token: Option<&str>) -> Result<()> {
        let token = refresh_token
            .map(str::to_owned)
            .or_else(|| self.client.store().refresh_token());

        let result = match token {
            Some(token) => {
                let request =
                    ApiRequest::post("/auth/logout").json(json!({ "refreshToken": token }));
                self.client.execute(request).await.map(drop)
            }
            None => Ok(()),
        };

        self.client.store().clear();

        if let Err(err) = result {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %err,
                "Logout call failed, local session cleared anyway"
            );
        } else {
            tracing::info!(target: TRACING_TARGET, "Logged out");
        }

        Ok(())
    }

    /// Revokes every session of the given user, then clears local state.
    pub async fn logout_all(&self, user_id: i64) -> Result<()> {
        let request = ApiRequest::post("/auth/logout-all").query("userId", user_id);
        let result = self.client.execute(request).await;
        self.client.store().clear();
        result.map(drop)
    }

    /// Exchanges a refresh token for new tokens and persists them.
    ///
    /// Callers inside the client go through the refresh gate instead of
    /// calling this directly; it is public for embedding applications that
    /// manage scheduling themselves.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshedTokens> {
        let request =
            ApiRequest::post("/auth/refresh").json(json!({ "refreshToken": refresh_token }));

        let response: AuthResponse = self.client.execute_as(request).await?;
        let Some(access_token) = response.access_token.clone() else {
            return Err(Error::unexpected_shape(
                "refresh response carries no access token",
            ));
        };

        let rotated = response.refresh_token.clone();
        self.persist(response);

        Ok(RefreshedTokens {
            access_token,
            refresh_token: rotated,
        })
    }

    /// Persists each present response field independently.
    fn persist(&self, response: AuthResponse) -> LoginOutcome {
        let store = self.client.store();

        if let Some(token) = response.access_token.as_deref() {
            store.set_access_token(Some(token));
        }
        if let Some(token) = response.refresh_token.as_deref() {
            store.set_refresh_token(Some(token));
        }

        let user = response.user.and_then(RawUser::normalize);
        if let Some(user) = &user {
            store.set_user(Some(user));
        }

        let expires_at = response
            .expires_in
            .map(|millis| Timestamp::now() + SignedDuration::from_millis(millis));
        if let Some(expiry) = expires_at {
            store.set_token_expiry(Some(expiry));
        }

        LoginOutcome {
            access_token: response.access_token,
            user,
            expires_at,
        }
    }
}
