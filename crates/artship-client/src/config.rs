//! Client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default backend base, the development deployment.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8081/api";

/// Configuration for [`ArtshipClient`](crate::ArtshipClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to, without trailing slash.
    pub base_url: String,
    /// Timeout applied to each HTTP request.
    pub timeout: Duration,
    /// User-Agent header to send with requests.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: Self::default_user_agent(),
        }
    }
}

impl ClientConfig {
    fn default_user_agent() -> String {
        format!("artship/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Creates a configuration pointing at the given backend base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the effective timeout, using the default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }

    /// Returns the effective user agent, using the default if empty.
    pub fn effective_user_agent(&self) -> String {
        if self.user_agent.is_empty() {
            Self::default_user_agent()
        } else {
            self.user_agent.clone()
        }
    }

    /// Validates and returns the base URL, trailing slash trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the base is not an absolute `http(s)`
    /// URL.
    pub(crate) fn validated_base(&self) -> Result<Url> {
        let trimmed = self.base_url.trim_end_matches('/');
        let url = Url::parse(trimmed)
            .map_err(|err| Error::config(format!("invalid base URL `{trimmed}`: {err}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "unsupported base URL scheme `{}`",
                url.scheme()
            )));
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.user_agent.contains("artship"));
    }

    #[test]
    fn test_effective_timeout_uses_default_when_zero() {
        let config = ClientConfig {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert_eq!(config.effective_timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_validated_base_trims_trailing_slash() {
        let config = ClientConfig::new("https://artship.io/api/");
        let url = config.validated_base().unwrap();
        assert_eq!(url.as_str(), "https://artship.io/api");
    }

    #[test]
    fn test_validated_base_rejects_bad_urls() {
        assert!(ClientConfig::new("not a url").validated_base().is_err());
        assert!(ClientConfig::new("ftp://host/api").validated_base().is_err());
    }
}
