//! In-process backend fixtures for integration tests.

use artship_client::{ArtshipClient, ClientConfig};
use axum::Router;

/// Serves the router on an ephemeral port and returns the `/api` base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve test backend");
    });

    format!("http://{addr}/api")
}

/// A client pointed at the fixture backend, with an in-memory store.
pub fn client_for(base_url: &str) -> ArtshipClient {
    ArtshipClient::new(ClientConfig::new(base_url)).expect("build test client")
}

/// Extracts the bearer token from request headers, if any.
#[allow(dead_code)]
pub fn bearer(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned)
}
