//! Error types for artship client operations.
//!
//! Every failure an API call can produce is funneled into one [`Error`]
//! shape at the request-executor boundary; raw transport errors never reach
//! callers.

use serde_json::Value;

/// Result type for artship client operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced by artship client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Api {
        /// Server-supplied message, or `HTTP <status>` when none was sent.
        message: String,
        /// HTTP status code.
        status: u16,
        /// The response body, or a `rawText` wrapper when it was not JSON.
        payload: Value,
    },

    /// A lookup addressed a resource the backend does not know.
    #[error("{resource} not found")]
    NotFound {
        /// Human-readable resource kind, e.g. `"art"`.
        resource: String,
    },

    /// The session is no longer valid and could not be refreshed.
    ///
    /// The credential store has already been cleared when this surfaces;
    /// embedding UIs should route to their login view.
    #[error("session expired, sign in again")]
    SessionExpired,

    /// An operation that needs a signed-in user ran without one.
    #[error("not signed in")]
    Unauthenticated,

    /// The request never produced a response.
    #[error("network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// A typed decode of a response body failed.
    #[error("unexpected response shape: {message}")]
    Serialization { message: String },

    /// Request input rejected before any network call.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Credential store I/O failure.
    #[error("credential store error: {message}")]
    Storage { message: String },

    /// Client construction failed.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl Error {
    /// Builds the API error for a non-success response.
    ///
    /// The message prefers, in order, the server's `message`, `error` and
    /// `errorMessage` fields, then falls back to `HTTP <status>`.
    pub(crate) fn from_response(status: u16, payload: Value) -> Self {
        let message = ["message", "error", "errorMessage"]
            .iter()
            .find_map(|key| payload.get(key).and_then(Value::as_str))
            .map(str::to_owned)
            .unwrap_or_else(|| format!("HTTP {status}"));

        Self::Api {
            message,
            status,
            payload,
        }
    }

    pub(crate) fn from_transport(source: reqwest::Error) -> Self {
        let message = if source.is_timeout() {
            "request timed out".to_owned()
        } else if source.is_connect() {
            "connection failed".to_owned()
        } else {
            source.to_string()
        };

        Self::Network {
            message,
            source: Some(source),
        }
    }

    pub(crate) fn unexpected_shape(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Rewrites a 404 into a domain-specific not-found error.
    pub(crate) fn or_not_found(self, resource: &str) -> Self {
        match self {
            Error::Api { status: 404, .. } => Error::NotFound {
                resource: resource.to_owned(),
            },
            other => other,
        }
    }

    /// The HTTP status behind this error; 0 for network failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::NotFound { .. } => Some(404),
            Error::SessionExpired | Error::Unauthenticated => Some(401),
            Error::Network { .. } => Some(0),
            _ => None,
        }
    }

    /// True when the caller should treat this as an invalid session.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::SessionExpired | Error::Unauthenticated)
            || matches!(self, Error::Api { status: 401, .. })
    }

    pub fn is_network_error(&self) -> bool {
        matches!(self, Error::Network { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. }) || matches!(self, Error::Api { status: 404, .. })
    }

    /// True for failures that may succeed on retry (5xx and transport).
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Network { .. } => true,
            Error::Api { status, .. } => (500..600).contains(status),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}
