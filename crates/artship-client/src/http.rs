//! The request executor.
//!
//! Every outgoing call funnels through [`ArtshipClient::execute`]: one
//! place that attaches the bearer token, normalizes response bodies, maps
//! failures onto [`Error`] and applies the 401 refresh policy. Endpoint
//! modules never touch headers or status codes themselves.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::client::ArtshipClient;
use crate::error::{Error, Result};
use crate::store::CredentialStore;

/// Tracing target for request execution.
pub(crate) const TRACING_TARGET: &str = "artship_client::http";

/// Endpoints that must never carry a bearer token, to keep token
/// attachment from becoming circular while establishing a session.
const TOKEN_EXEMPT_PATHS: [&str; 3] = ["/auth/login", "/auth/register", "/auth/refresh"];

/// A buffered, rebuildable request.
///
/// Requests are described as data rather than built directly on the
/// `reqwest` builder so the executor can replay one after a token refresh;
/// multipart bodies are buffered for the same reason.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub json: Option<Value>,
    pub form: Option<Vec<FormPart>>,
    pub headers: Vec<(String, String)>,
}

/// One part of a buffered multipart form.
#[derive(Debug, Clone)]
pub(crate) enum FormPart {
    Text {
        name: &'static str,
        value: String,
    },
    File {
        name: &'static str,
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            json: None,
            form: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    pub fn form(mut self, parts: Vec<FormPart>) -> Self {
        self.form = Some(parts);
        self
    }

    /// Adds a caller-supplied header, overriding any default of the same
    /// name.
    #[allow(dead_code)]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// True when no bearer token may be attached: the session-establishing
    /// auth endpoints, plus the `/public` views, which never require one
    /// and are served to signed-out clients.
    fn token_exempt(&self) -> bool {
        TOKEN_EXEMPT_PATHS
            .iter()
            .any(|exempt| self.path.starts_with(exempt))
            || self.path.contains("/public")
    }
}

impl ArtshipClient {
    /// Executes a request and returns the parsed response body.
    ///
    /// Success bodies that are not JSON come back as
    /// `{"rawText": "<body>"}`; empty bodies and 204 responses come back as
    /// `{}`. Non-success statuses become [`Error::Api`]. A 401 on a
    /// token-bearing request runs the single-flight refresh and replays the
    /// request once; when the session cannot be recovered the store is
    /// cleared and [`Error::SessionExpired`] is returned.
    pub(crate) async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let token = if request.token_exempt() {
            None
        } else {
            self.inner.store.access_token()
        };

        let (status, body) = self.send_once(&request, token.as_deref()).await?;
        if status.is_success() {
            return Ok(body);
        }

        if status == StatusCode::UNAUTHORIZED && token.is_some() {
            tracing::debug!(
                target: TRACING_TARGET,
                path = %request.path,
                "Request rejected with 401, attempting token refresh"
            );

            let Some(new_token) = self.inner.refresh.refreshed_token(self).await else {
                return Err(Error::SessionExpired);
            };

            let (status, body) = self.send_once(&request, Some(&new_token)).await?;
            if status.is_success() {
                return Ok(body);
            }
            if status == StatusCode::UNAUTHORIZED {
                tracing::warn!(
                    target: TRACING_TARGET,
                    path = %request.path,
                    "Request still unauthorized after refresh, clearing session"
                );
                self.inner.store.clear();
                return Err(Error::SessionExpired);
            }
            return Err(Error::from_response(status.as_u16(), body));
        }

        Err(Error::from_response(status.as_u16(), body))
    }

    /// [`ArtshipClient::execute`] plus a typed decode of the body.
    pub(crate) async fn execute_as<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let body = self.execute(request).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn send_once(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<(StatusCode, Value)> {
        let base = self.inner.base.as_str().trim_end_matches('/');
        let url = format!("{base}{}", request.path);

        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), url)
            .header(reqwest::header::ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = &request.json {
            builder = builder.json(body);
        }

        if let Some(parts) = &request.form {
            builder = builder.multipart(build_form(parts)?);
        }

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        tracing::debug!(
            target: TRACING_TARGET,
            method = %request.method,
            path = %request.path,
            authenticated = token.is_some(),
            "Sending request"
        );

        let response = builder.send().await.map_err(Error::from_transport)?;
        let status = response.status();
        let text = response.text().await.map_err(Error::from_transport)?;
        let body = parse_lenient(&text);

        tracing::debug!(
            target: TRACING_TARGET,
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            "Received response"
        );

        Ok((status, body))
    }
}

/// Parses a response body, tolerating empty and non-JSON payloads.
fn parse_lenient(text: &str) -> Value {
    if text.is_empty() {
        return json!({});
    }
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "rawText": text }))
}

fn build_form(parts: &[FormPart]) -> Result<reqwest::multipart::Form> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(*name, value.clone()),
            FormPart::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                let file = reqwest::multipart::Part::bytes(bytes.clone())
                    .file_name(filename.clone())
                    .mime_str(content_type)
                    .map_err(|err| {
                        Error::invalid_input(format!("invalid content type `{content_type}`: {err}"))
                    })?;
                form.part(*name, file)
            }
        };
    }
    Ok(form)
}
