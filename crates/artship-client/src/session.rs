//! The session controller.
//!
//! One reactive source of truth for "who is signed in", layered over the
//! credential store and the auth gateway. Views subscribe to the state
//! channel instead of re-reading storage.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use artship_core::User;
use tokio::sync::watch;

use crate::auth::{LoginCredentials, LoginOutcome, NewAccount};
use crate::client::ArtshipClient;
use crate::error::Result;
use crate::store::CredentialStore;

/// Tracing target for session state changes.
pub const TRACING_TARGET: &str = "artship_client::session";

/// Authentication state of the application session.
///
/// `Authenticated` is only ever reported when the store holds a
/// non-expired access token *and* a parseable user record; an expired
/// token with a lingering user reads as `Anonymous`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Startup state, before the first storage check.
    #[default]
    Uninitialized,
    /// A storage check is running.
    Checking,
    /// A valid session exists for this user.
    Authenticated(User),
    /// No valid session.
    Anonymous,
}

impl SessionState {
    /// The signed-in user, when there is one.
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    /// Short state name for logging.
    fn label(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Checking => "checking",
            SessionState::Authenticated(_) => "authenticated",
            SessionState::Anonymous => "anonymous",
        }
    }
}

#[derive(Debug)]
struct SessionInner {
    client: ArtshipClient,
    state: watch::Sender<SessionState>,
    /// Bumped by every state-changing operation; async completions that
    /// observe a stale epoch discard their update instead of applying it.
    epoch: AtomicU64,
    /// Store generation last folded into the state.
    seen_generation: AtomicU64,
}

/// Application-wide session controller.
///
/// Owns the session state machine:
///
/// ```text
/// Uninitialized -> Checking -> Authenticated(user) | Anonymous
/// Authenticated -> Anonymous   (logout, refresh failure, external clear)
/// Anonymous     -> Authenticated(user)   (login)
/// ```
///
/// Clones share one state channel.
#[derive(Debug, Clone)]
pub struct SessionController {
    inner: Arc<SessionInner>,
}

impl SessionController {
    /// Creates a controller over the given client, in `Uninitialized`
    /// state. Call [`SessionController::initialize`] at startup.
    pub fn new(client: ArtshipClient) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        let seen_generation = AtomicU64::new(client.store().generation());
        Self {
            inner: Arc::new(SessionInner {
                client,
                state,
                epoch: AtomicU64::new(0),
                seen_generation,
            }),
        }
    }

    /// The client this controller drives.
    pub fn client(&self) -> &ArtshipClient {
        &self.inner.client
    }

    /// The current session state.
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Subscribes to session state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Convenience for `state().is_authenticated()`.
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// Runs the startup check: `Uninitialized -> Checking -> ...`.
    ///
    /// Purely a storage read, no network call.
    pub fn initialize(&self) {
        let epoch = self.begin();
        self.set_state(epoch, SessionState::Checking);
        let resolved = self.resolve_from_store();
        self.set_state(epoch, resolved);
    }

    /// Re-checks the store when another handle has mutated it since the
    /// last check, the cross-tab storage-event analog. Returns true when
    /// a re-check ran.
    pub fn recheck(&self) -> bool {
        let generation = self.inner.client.store().generation();
        if self.inner.seen_generation.swap(generation, Ordering::AcqRel) == generation {
            return false;
        }

        let epoch = self.begin();
        let resolved = self.resolve_from_store();
        self.set_state(epoch, resolved);
        true
    }

    /// Logs in and, on an established session, moves to `Authenticated`.
    ///
    /// A soft failure (success response without a token) leaves the state
    /// `Anonymous`; inspect the returned [`LoginOutcome`].
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome> {
        let epoch = self.begin();
        self.set_state(epoch, SessionState::Checking);

        let result = self.inner.client.auth().login(credentials).await;

        match &result {
            Ok(_) => self.set_state(epoch, self.resolve_from_store()),
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %err,
                    "Login failed"
                );
                self.set_state(epoch, SessionState::Anonymous);
            }
        }

        result
    }

    /// Logs out. The state is `Anonymous` when this returns, even when
    /// the backend call failed.
    pub async fn logout(&self) -> Result<()> {
        let epoch = self.begin();
        let result = self.inner.client.auth().logout(None).await;
        self.set_state(epoch, SessionState::Anonymous);
        result
    }

    /// Registers a new account. Does not touch the session state:
    /// registration never authenticates, the caller logs in afterwards.
    pub async fn register(&self, account: &NewAccount) -> Result<User> {
        self.inner.client.auth().register(account).await
    }

    /// Re-reads the stored user without a network call, updating state.
    pub fn refresh_user(&self) -> Option<User> {
        let epoch = self.begin();
        let resolved = self.resolve_from_store();
        let user = resolved.user().cloned();
        self.set_state(epoch, resolved);
        user
    }

    /// Fail-closed storage check: a user is only surfaced alongside a
    /// valid, non-expired token.
    fn resolve_from_store(&self) -> SessionState {
        let store = self.inner.client.store();
        self.inner
            .seen_generation
            .store(store.generation(), Ordering::Release);

        let credentials = store.snapshot();
        if !credentials.is_valid() {
            return SessionState::Anonymous;
        }

        match credentials.user {
            Some(user) => SessionState::Authenticated(user),
            None => SessionState::Anonymous,
        }
    }

    fn begin(&self) -> u64 {
        self.inner.epoch.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Applies a state update unless a newer operation has started.
    fn set_state(&self, epoch: u64, next: SessionState) {
        if self.inner.epoch.load(Ordering::Acquire) != epoch {
            tracing::debug!(
                target: TRACING_TARGET,
                stale_epoch = epoch,
                "Discarding stale session state update"
            );
            return;
        }

        self.inner.state.send_if_modified(|state| {
            if *state == next {
                return false;
            }
            tracing::debug!(
                target: TRACING_TARGET,
                from = state.label(),
                to = next.label(),
                "Session state changed"
            );
            *state = next;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};

    use super::*;
    use crate::config::ClientConfig;
    use crate::store::CredentialStore;

    fn controller() -> SessionController {
        let client = ArtshipClient::new(ClientConfig::default()).unwrap();
        SessionController::new(client)
    }

    fn sample_user() -> User {
        User {
            id: 1,
            username: "alice".into(),
            display_name: "Alice".into(),
            email: None,
            bio: String::new(),
            avatar_url: "/default-avatar.png".into(),
            is_public: true,
            created_at: None,
        }
    }

    #[test]
    fn test_starts_uninitialized() {
        let session = controller();
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_initialize_without_credentials_is_anonymous() {
        let session = controller();
        session.initialize();
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[test]
    fn test_initialize_with_valid_session_is_authenticated() {
        let session = controller();
        let store = session.client().store();
        store.set_access_token(Some("A"));
        store.set_user(Some(&sample_user()));
        store.set_token_expiry(Some(Timestamp::now() + SignedDuration::from_secs(3600)));

        session.initialize();
        assert_eq!(session.state().user().map(|u| u.id), Some(1));
    }

    #[test]
    fn test_expired_token_reads_anonymous_despite_user() {
        let session = controller();
        let store = session.client().store();
        store.set_access_token(Some("A"));
        store.set_user(Some(&sample_user()));
        store.set_token_expiry(Some(Timestamp::now() - SignedDuration::from_secs(1)));

        session.initialize();
        assert_eq!(session.state(), SessionState::Anonymous);
        assert_eq!(session.refresh_user(), None);
    }

    #[test]
    fn test_token_without_user_reads_anonymous() {
        let session = controller();
        session.client().store().set_access_token(Some("A"));
        session.initialize();
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[test]
    fn test_recheck_only_runs_on_external_mutation() {
        let session = controller();
        session.initialize();
        assert!(!session.recheck());

        let store = session.client().store();
        store.set_access_token(Some("A"));
        store.set_user(Some(&sample_user()));
        assert!(session.recheck());
        assert!(session.is_authenticated());

        store.clear();
        assert!(session.recheck());
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[test]
    fn test_subscribers_observe_changes() {
        let session = controller();
        let receiver = session.subscribe();
        session.initialize();
        assert_eq!(*receiver.borrow(), SessionState::Anonymous);
    }
}
