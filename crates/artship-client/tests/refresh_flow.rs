//! 401 handling: single-flight refresh, retry, and session teardown.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use artship_client::{CredentialStore as _, Error};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use common::{bearer, client_for, spawn_backend};

/// Backend where `/users/me` only accepts the rotated token "B" and
/// `/auth/refresh` exchanges "R" for it.
fn rotating_backend(refresh_calls: Arc<AtomicUsize>, refresh_delay: Duration) -> Router {
    let me = get(|headers: HeaderMap| async move {
        if bearer(&headers).as_deref() == Some("B") {
            (
                StatusCode::OK,
                Json(json!({"id": 1, "username": "alice"})),
            )
        } else {
            (StatusCode::UNAUTHORIZED, Json(json!({})))
        }
    });

    let refresh = post(move |Json(body): Json<Value>| {
        let refresh_calls = refresh_calls.clone();
        async move {
            refresh_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(refresh_delay).await;
            if body["refreshToken"] == json!("R") {
                (
                    StatusCode::OK,
                    Json(json!({"accessToken": "B", "refreshToken": "R2"})),
                )
            } else {
                (StatusCode::UNAUTHORIZED, Json(json!({})))
            }
        }
    });

    Router::new()
        .route("/api/users/me", me)
        .route("/api/auth/refresh", refresh)
}

#[tokio::test]
async fn test_401_refreshes_and_replays_the_request() {
    let refresh_calls = Arc::new(AtomicUsize::new(0));
    let base = spawn_backend(rotating_backend(refresh_calls.clone(), Duration::ZERO)).await;
    let client = client_for(&base);

    client.store().set_access_token(Some("A"));
    client.store().set_refresh_token(Some("R"));

    let user = client.users().me().await.unwrap();
    assert_eq!(user.username, "alice");

    assert_eq!(refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(client.store().access_token().as_deref(), Some("B"));
    assert_eq!(client.store().refresh_token().as_deref(), Some("R2"));
}

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh_call() {
    let refresh_calls = Arc::new(AtomicUsize::new(0));
    let router = rotating_backend(refresh_calls.clone(), Duration::from_millis(200));
    let base = spawn_backend(router).await;
    let client = client_for(&base);

    client.store().set_access_token(Some("A"));
    client.store().set_refresh_token(Some("R"));

    let users = client.users();
    let (first, second) = tokio::join!(users.me(), users.me());

    assert_eq!(first.unwrap().id, 1);
    assert_eq!(second.unwrap().id, 1);
    assert_eq!(refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_refresh_failure_tears_the_session_down() {
    let refresh_calls = Arc::new(AtomicUsize::new(0));
    let base = spawn_backend(rotating_backend(refresh_calls, Duration::ZERO)).await;
    let client = client_for(&base);

    // A refresh token the backend rejects.
    client.store().set_access_token(Some("A"));
    client.store().set_refresh_token(Some("stale"));
    client.store().set_user(None);

    let err = client.users().me().await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired));
    assert_eq!(client.store().access_token(), None);
    assert_eq!(client.store().refresh_token(), None);
}

#[tokio::test]
async fn test_401_without_refresh_token_tears_the_session_down() {
    let refresh_calls = Arc::new(AtomicUsize::new(0));
    let base = spawn_backend(rotating_backend(refresh_calls.clone(), Duration::ZERO)).await;
    let client = client_for(&base);

    client.store().set_access_token(Some("A"));

    let err = client.users().me().await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired));
    assert_eq!(client.store().access_token(), None);
    assert_eq!(refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_401_that_survives_refresh_tears_the_session_down() {
    // Refresh succeeds, but the domain endpoint rejects every token.
    let router = Router::new()
        .route(
            "/api/art-tags/art/1/tags",
            get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({}))) }),
        )
        .route(
            "/api/auth/refresh",
            post(|| async { Json(json!({"accessToken": "B", "refreshToken": "R2"})) }),
        );
    let base = spawn_backend(router).await;
    let client = client_for(&base);

    client.store().set_access_token(Some("A"));
    client.store().set_refresh_token(Some("R"));

    let err = client.tags().tags_of(1).await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired));
    assert!(err.is_auth_error());
    assert_eq!(client.store().access_token(), None);
    assert_eq!(client.store().refresh_token(), None);
    assert_eq!(client.store().user(), None);
}

#[tokio::test]
async fn test_401_without_any_token_is_a_plain_api_error() {
    let router = Router::new().route(
        "/api/users/me",
        get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"message": "who are you"}))) }),
    );
    let base = spawn_backend(router).await;
    let client = client_for(&base);

    let err = client.users().me().await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 401, .. }));
    assert_eq!(err.to_string(), "who are you");
}
