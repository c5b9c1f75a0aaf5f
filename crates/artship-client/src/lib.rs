//! HTTP client, credential store and session management for the artship
//! platform.
//!
//! The crate is organized around one [`ArtshipClient`]: a single request
//! executor every endpoint module shares, a pluggable [`CredentialStore`]
//! holding the session's tokens and user record, and a
//! [`SessionController`] exposing reactive signed-in state. Token refresh
//! is coordinated so concurrent 401s produce one refresh exchange, and a
//! session the backend rejects is torn down in one place.
//!
//! # Example
//!
//! ```rust,no_run
//! use artship_client::{ArtshipClient, ClientConfig, LoginCredentials, SessionController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ArtshipClient::new(ClientConfig::new("https://artship.io/api"))?;
//!     let session = SessionController::new(client.clone());
//!     session.initialize();
//!
//!     session
//!         .login(&LoginCredentials::new("alice", "secret1"))
//!         .await?;
//!
//!     for post in client.art().home_feed(0, 30).await?.content {
//!         println!("{} by {}", post.title, post.author.display_name);
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod api;
mod auth;
mod client;
mod config;
mod error;
mod http;
mod session;
pub mod store;

pub use artship_core::{ArtPost, Author, Page, Tag, User};

pub use crate::api::{
    ArtApi, ArtPatch, FollowApi, FollowEdge, ImageUpload, LikeApi, LikeRecord, MAX_IMAGE_BYTES,
    NewArt, ProfilePatch, TagApi, UserApi,
};
pub use crate::auth::{
    AuthApi, LoginCredentials, LoginOutcome, NewAccount, RefreshedTokens,
};
pub use crate::client::ArtshipClient;
pub use crate::config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use crate::error::{Error, Result};
pub use crate::session::{SessionController, SessionState};
pub use crate::store::{CredentialStore, Credentials, FileStore, MemoryStore};
