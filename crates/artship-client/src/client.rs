//! The artship platform client.

use std::sync::Arc;

use url::Url;

use crate::api::{ArtApi, FollowApi, LikeApi, TagApi, UserApi};
use crate::auth::AuthApi;
use crate::auth::refresh::RefreshGate;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::store::{CredentialStore, MemoryStore};

/// Tracing target for client lifecycle operations.
pub const TRACING_TARGET: &str = "artship_client::client";

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) base: Url,
    pub(crate) config: ClientConfig,
    pub(crate) store: Arc<dyn CredentialStore>,
    pub(crate) refresh: RefreshGate,
}

impl std::fmt::Debug for ClientInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientInner")
            .field("base", &self.base.as_str())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Client for the artship platform's REST backend.
///
/// One instance per backend: it owns the HTTP connection pool, the
/// credential store handle and the token-refresh coordination, and hands
/// out the per-domain endpoint APIs ([`ArtshipClient::art`],
/// [`ArtshipClient::users`], ...). Cloning is cheap and every clone shares
/// the same session.
///
/// # Examples
///
/// ```rust,no_run
/// use artship_client::{ArtshipClient, ClientConfig, LoginCredentials};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = ArtshipClient::new(ClientConfig::new("https://artship.io/api"))?;
///
///     client
///         .auth()
///         .login(&LoginCredentials::new("alice", "secret1"))
///         .await?;
///
///     let feed = client.art().home_feed(0, 30).await?;
///     println!("{} posts", feed.content.len());
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ArtshipClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl ArtshipClient {
    /// Creates a client with a process-local [`MemoryStore`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Creates a client on top of an existing credential store.
    ///
    /// Use this to share one session between clients or to persist it via
    /// [`FileStore`](crate::store::FileStore).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn with_store(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let base = config.validated_base()?;

        tracing::debug!(
            target: TRACING_TARGET,
            base = %base,
            timeout_ms = config.effective_timeout().as_millis(),
            "Creating artship client"
        );

        let http = reqwest::Client::builder()
            .timeout(config.effective_timeout())
            .user_agent(config.effective_user_agent())
            .build()
            .map_err(|err| Error::config(format!("cannot build HTTP client: {err}")))?;

        let inner = ClientInner {
            http,
            base,
            config,
            store,
            refresh: RefreshGate::new(),
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The credential store backing this client's session.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.store
    }

    /// Authentication endpoints.
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Art post endpoints.
    pub fn art(&self) -> ArtApi<'_> {
        ArtApi::new(self)
    }

    /// User profile endpoints.
    pub fn users(&self) -> UserApi<'_> {
        UserApi::new(self)
    }

    /// Follow graph endpoints.
    pub fn follows(&self) -> FollowApi<'_> {
        FollowApi::new(self)
    }

    /// Like endpoints.
    pub fn likes(&self) -> LikeApi<'_> {
        LikeApi::new(self)
    }

    /// Tag and art-tag endpoints.
    pub fn tags(&self) -> TagApi<'_> {
        TagApi::new(self)
    }

    /// Absolutizes a server-relative asset path against the backend origin.
    ///
    /// The backend serves uploads from the server root, not under the API
    /// base, so `/uploads/images/a.png` resolves against the origin of the
    /// base URL. Absolute URLs pass through unchanged.
    pub fn absolute_url(&self, path: &str) -> String {
        if path.is_empty() || path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }

        let origin = self.inner.base.origin().ascii_serialization();
        if path.starts_with('/') {
            format!("{origin}{path}")
        } else {
            format!("{origin}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ArtshipClient::new(ClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_rejects_invalid_base() {
        let client = ArtshipClient::new(ClientConfig::new("::not-a-url::"));
        assert!(matches!(client, Err(Error::Config { .. })));
    }

    #[test]
    fn test_absolute_url_resolution() {
        let client = ArtshipClient::new(ClientConfig::new("https://artship.io/api")).unwrap();
        assert_eq!(
            client.absolute_url("/uploads/images/a.png"),
            "https://artship.io/uploads/images/a.png"
        );
        assert_eq!(
            client.absolute_url("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(client.absolute_url(""), "");
    }
}
