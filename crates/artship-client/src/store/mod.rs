//! Persistent credential storage.
//!
//! One [`CredentialStore`] holds at most one credential record: access
//! token, refresh token, serialized user and token expiry. The store never
//! evicts on expiry itself; validity is the caller's check. Values are kept
//! under the same string keys the platform has always used, so a
//! [`FileStore`] file is interchangeable with what a browser deployment
//! keeps in local storage.

mod file;
mod memory;

use artship_core::User;
use jiff::Timestamp;

pub use self::file::FileStore;
pub use self::memory::MemoryStore;

/// Tracing target for credential store operations.
pub(crate) const TRACING_TARGET: &str = "artship_client::store";

/// Storage keys, shared by every store implementation.
pub(crate) mod keys {
    pub const ACCESS_TOKEN: &str = "accessToken";
    pub const REFRESH_TOKEN: &str = "refreshToken";
    pub const USER: &str = "user";
    pub const TOKEN_EXPIRY: &str = "tokenExpiry";

    pub const ALL: [&str; 4] = [ACCESS_TOKEN, REFRESH_TOKEN, USER, TOKEN_EXPIRY];
}

/// A consistent snapshot of the stored credential record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<User>,
    pub token_expiry: Option<Timestamp>,
}

impl Credentials {
    /// True when an access token is present and not past its expiry.
    ///
    /// A missing expiry counts as valid; a present token string alone does
    /// not.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        self.access_token.is_some() && self.token_expiry.is_none_or(|expiry| expiry > now)
    }

    /// [`Credentials::is_valid_at`] against the current clock.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Timestamp::now())
    }
}

/// Durable key-value storage for the session's credential record.
///
/// Implementations are cheap to clone behind `Arc` and safe to share across
/// tasks. Setters are infallible by contract: a store that cannot persist
/// logs the failure and keeps serving its in-memory view, mirroring how
/// browser storage degrades.
pub trait CredentialStore: Send + Sync + std::fmt::Debug {
    /// Stores the access token; `None` removes the key entirely so
    /// presence checks stay unambiguous.
    fn set_access_token(&self, token: Option<&str>);

    fn access_token(&self) -> Option<String>;

    fn set_refresh_token(&self, token: Option<&str>);

    fn refresh_token(&self) -> Option<String>;

    /// Stores the user record as JSON.
    fn set_user(&self, user: Option<&User>);

    /// Reads the stored user. Malformed stored data reads as `None`,
    /// never an error.
    fn user(&self) -> Option<User>;

    /// Stores the expiry as an epoch-millisecond string.
    fn set_token_expiry(&self, expiry: Option<Timestamp>);

    /// Reads the stored expiry. Unparseable values read as `None`.
    fn token_expiry(&self) -> Option<Timestamp>;

    /// Removes every session key, one independent delete per key.
    fn clear(&self);

    /// Monotonic counter bumped on every mutation.
    ///
    /// Lets a session controller detect external writes (another handle on
    /// the same store) and re-check, the cross-tab storage-event analog.
    fn generation(&self) -> u64;

    /// One consistent read of the whole record.
    fn snapshot(&self) -> Credentials {
        Credentials {
            access_token: self.access_token(),
            refresh_token: self.refresh_token(),
            user: self.user(),
            token_expiry: self.token_expiry(),
        }
    }
}

/// Parses a stored epoch-millisecond string.
pub(crate) fn parse_expiry(raw: &str) -> Option<Timestamp> {
    let millis: i64 = raw.trim().parse().ok()?;
    Timestamp::from_millisecond(millis).ok()
}

/// Parses a stored user JSON string, failing closed.
pub(crate) fn parse_user(raw: &str) -> Option<User> {
    match serde_json::from_str(raw) {
        Ok(user) => Some(user),
        Err(err) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %err,
                "Stored user record is malformed, treating as absent"
            );
            None
        }
    }
}
