//! Single-flight token refresh coordination.
//!
//! When several authenticated requests observe a 401 at the same time, only
//! one of them may exchange the refresh token; issuing parallel exchanges
//! invalidates the rotated token for everyone else. The gate makes the
//! first caller the leader and parks the rest on a broadcast subscription
//! until the leader's outcome settles.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::{Mutex, broadcast};

use crate::auth::RefreshedTokens;
use crate::client::ArtshipClient;
use crate::error::Result;
use crate::store::CredentialStore;

/// Tracing target for refresh coordination.
pub(crate) const TRACING_TARGET: &str = "artship_client::auth";

/// Outcome of a settled refresh: the new access token, or `None` when the
/// session could not be recovered (store already cleared).
type Outcome = Option<String>;

#[derive(Debug, Default)]
pub(crate) struct RefreshGate {
    inflight: Mutex<Option<broadcast::Sender<Outcome>>>,
}

enum Role {
    Leader,
    Follower(broadcast::Receiver<Outcome>),
}

impl RefreshGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh access token, or `None` when the session is gone.
    ///
    /// Re-entrant-safe: the first caller performs the network exchange,
    /// concurrent callers subscribe and settle with the leader's outcome.
    pub(crate) async fn refreshed_token(&self, client: &ArtshipClient) -> Outcome {
        let role = {
            let mut inflight = self.inflight.lock().await;
            match inflight.as_ref() {
                Some(sender) => Role::Follower(sender.subscribe()),
                None => {
                    let (sender, _) = broadcast::channel(1);
                    *inflight = Some(sender);
                    Role::Leader
                }
            }
        };

        match role {
            Role::Follower(mut receiver) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    "Refresh already in flight, awaiting its outcome"
                );
                receiver.recv().await.ok().flatten()
            }
            Role::Leader => {
                let outcome = perform_refresh(client).await;

                let mut inflight = self.inflight.lock().await;
                if let Some(sender) = inflight.take() {
                    // Nobody listening is fine; send only fails then.
                    let _ = sender.send(outcome.clone());
                }
                outcome
            }
        }
    }
}

/// Exchanges the stored refresh token for a new access token.
///
/// Any failure ends the session: the store is cleared so no caller can
/// keep using credentials the backend has rejected.
async fn perform_refresh(client: &ArtshipClient) -> Outcome {
    let Some(refresh_token) = client.store().refresh_token() else {
        tracing::warn!(
            target: TRACING_TARGET,
            "No refresh token stored, clearing session"
        );
        client.store().clear();
        return None;
    };

    // Type-erased: the refresh exchange re-enters the request executor,
    // and the executor's 401 path lands back here.
    let auth = client.auth();
    let exchange: Pin<Box<dyn Future<Output = Result<RefreshedTokens>> + '_>> =
        Box::pin(auth.refresh(&refresh_token));
    match exchange.await {
        Ok(tokens) => {
            tracing::info!(target: TRACING_TARGET, "Access token refreshed");
            Some(tokens.access_token)
        }
        Err(err) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %err,
                "Token refresh failed, clearing session"
            );
            client.store().clear();
            None
        }
    }
}
