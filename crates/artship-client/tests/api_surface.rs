//! Domain endpoint behavior: normalization, multipart uploads, lookups.

mod common;

use artship_client::{CredentialStore as _, Error, ImageUpload, NewArt};
use axum::extract::{Multipart, Path};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use common::{bearer, client_for, spawn_backend};

#[tokio::test]
async fn test_public_feed_is_unauthenticated_and_normalized() {
    let router = Router::new().route(
        "/api/arts/public",
        get(|headers: HeaderMap| async move {
            // The public feed must not leak the stored token.
            assert!(bearer(&headers).is_none());
            Json(json!({
                "content": [
                    {
                        "id": 1,
                        "title": "Sunset",
                        "tags": ["paint", {"id": 2, "name": "oil"}],
                        "image": "/api/files/images/sunset.png",
                        "author": {"id": 4, "nickname": "Dana", "pfp": "dana.png"},
                    },
                    {"title": "no id, dropped"},
                ],
                "totalElements": 2,
                "last": true,
            }))
        }),
    );
    let base = spawn_backend(router).await;
    let client = client_for(&base);
    client.store().set_access_token(Some("A"));

    let page = client.art().public_feed(0, 30).await.unwrap();
    assert_eq!(page.len(), 1);
    assert!(page.last);

    let post = &page.content[0];
    assert_eq!(post.image_url, "/uploads/images/sunset.png");
    assert_eq!(post.tags, vec!["#paint", "#oil"]);
    assert_eq!(post.author.display_name, "Dana");
    assert_eq!(post.author.avatar_url, "/uploads/images/dana.png");
}

#[tokio::test]
async fn test_feed_sends_bearer_token() {
    let router = Router::new().route(
        "/api/arts/feed",
        get(|headers: HeaderMap| async move {
            if bearer(&headers).as_deref() != Some("A") {
                return (StatusCode::UNAUTHORIZED, Json(json!({})));
            }
            (StatusCode::OK, Json(json!({"content": []})))
        }),
    );
    let base = spawn_backend(router).await;
    let client = client_for(&base);
    client.store().set_access_token(Some("A"));

    let page = client.art().home_feed(0, 30).await.unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_tag_search_strips_leading_hash() {
    let router = Router::new().route(
        "/api/arts/tag/{name}",
        get(|Path(name): Path<String>| async move {
            assert_eq!(name, "paint");
            Json(json!({"content": [{"id": 1, "title": "t"}]}))
        }),
    );
    let base = spawn_backend(router).await;
    let client = client_for(&base);

    let page = client.art().by_tag("#paint", 0, 30).await.unwrap();
    assert_eq!(page.len(), 1);
}

#[tokio::test]
async fn test_missing_art_is_not_found() {
    let router = Router::new().route(
        "/api/arts/{id}",
        get(|| async { (StatusCode::NOT_FOUND, Json(json!({}))) }),
    );
    let base = spawn_backend(router).await;
    let client = client_for(&base);

    let err = client.art().get(99).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(err.to_string(), "art not found");
}

#[tokio::test]
async fn test_create_art_uploads_multipart() {
    let router = Router::new().route(
        "/api/arts",
        post(|mut multipart: Multipart| async move {
            let mut title = None;
            let mut image_bytes = 0;
            while let Some(field) = multipart.next_field().await.unwrap() {
                let name = field.name().unwrap_or_default().to_owned();
                match name.as_str() {
                    "title" => title = Some(field.text().await.unwrap()),
                    "imageFile" => image_bytes = field.bytes().await.unwrap().len(),
                    _ => {
                        field.bytes().await.unwrap();
                    }
                }
            }
            assert_eq!(title.as_deref(), Some("Sunset"));
            assert_eq!(image_bytes, 4);
            Json(json!({"id": 7, "title": "Sunset", "image": "sunset.png"}))
        }),
    );
    let base = spawn_backend(router).await;
    let client = client_for(&base);
    client.store().set_access_token(Some("A"));

    let created = client
        .art()
        .create(NewArt {
            title: "  Sunset  ".into(),
            description: Some("dusk".into()),
            is_public: None,
            image: ImageUpload::new(vec![1, 2, 3, 4], "sunset.png", "image/png"),
        })
        .await
        .unwrap();

    assert_eq!(created.id, 7);
    assert_eq!(created.image_url, "/uploads/images/sunset.png");
}

#[tokio::test]
async fn test_create_art_rejects_bad_input_before_sending() {
    let base = spawn_backend(Router::new()).await;
    let client = client_for(&base);

    let blank_title = client
        .art()
        .create(NewArt {
            title: "   ".into(),
            description: None,
            is_public: None,
            image: ImageUpload::new(vec![1], "a.png", "image/png"),
        })
        .await
        .unwrap_err();
    assert!(matches!(blank_title, Error::InvalidInput { .. }));

    let not_an_image = client
        .art()
        .create(NewArt {
            title: "ok".into(),
            description: None,
            is_public: None,
            image: ImageUpload::new(vec![1], "a.pdf", "application/pdf"),
        })
        .await
        .unwrap_err();
    assert!(matches!(not_an_image, Error::InvalidInput { .. }));
}

#[tokio::test]
async fn test_me_absolutizes_avatar() {
    let router = Router::new().route(
        "/api/users/me",
        get(|| async {
            Json(json!({"id": 1, "username": "alice", "avatarUrl": "alice.png"}))
        }),
    );
    let base = spawn_backend(router).await;
    let client = client_for(&base);
    client.store().set_access_token(Some("A"));

    let me = client.users().me().await.unwrap();
    let origin = base.trim_end_matches("/api");
    assert_eq!(me.avatar_url, format!("{origin}/uploads/images/alice.png"));
}

#[tokio::test]
async fn test_get_user_falls_back_to_public_view() {
    let router = Router::new()
        .route(
            "/api/users/{id}",
            get(|| async { (StatusCode::FORBIDDEN, Json(json!({}))) }),
        )
        .route(
            "/api/users/public/{id}",
            get(|Path(id): Path<i64>| async move {
                Json(json!({"id": id, "username": "carol"}))
            }),
        );
    let base = spawn_backend(router).await;
    let client = client_for(&base);
    client.store().set_access_token(Some("A"));

    let user = client.users().get(3).await.unwrap();
    assert_eq!(user.username, "carol");
}

#[tokio::test]
async fn test_is_liked_degrades_to_false_when_signed_out() {
    // No route registered: the call must short-circuit before the network.
    let base = spawn_backend(Router::new()).await;
    let client = client_for(&base);

    assert!(!client.likes().is_liked(1, 2).await.unwrap());
}

#[tokio::test]
async fn test_apply_tag_line_creates_and_attaches() {
    let router = Router::new()
        .route(
            "/api/tags/batch",
            post(|Json(names): Json<Vec<String>>| async move {
                assert_eq!(names, vec!["paint", "art"]);
                Json(json!([
                    {"id": 1, "name": "paint"},
                    {"id": 2, "name": "art"},
                ]))
            }),
        )
        .route(
            "/api/art-tags/art/{art_id}/tag/{tag_id}",
            post(|Path((art_id, tag_id)): Path<(i64, i64)>| async move {
                assert_eq!(art_id, 7);
                // One broken attachment must not lose the rest.
                if tag_id == 1 {
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})))
                } else {
                    (StatusCode::OK, Json(json!({})))
                }
            }),
        );
    let base = spawn_backend(router).await;
    let client = client_for(&base);
    client.store().set_access_token(Some("A"));

    let attached = client
        .tags()
        .apply_tag_line(7, "#paint #art")
        .await
        .unwrap();
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].name, "art");
}
