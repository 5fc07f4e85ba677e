//! Integration tests for registration, ingestion and gallery retrieval

mod helpers;

use std::collections::HashSet;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use helpers::*;
use serde_json::json;
use thinkprint::services::MatchStrategy;

async fn context_with_event(strategy: MatchStrategy) -> (TestContext, String) {
    let ctx = TestContext::new_with_config(TestConfig { strategy, ..Default::default() }).await;
    let token = ctx.login().await;
    let event_id = ctx.create_event(&token, "Graduation").await;
    (ctx, event_id)
}

#[tokio::test]
async fn test_register_for_unknown_event_fails() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post_multipart("/api/register", registration_form("no-such-event", "+5511999998888"))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Invalid event_id");

    let form = MultipartBody::new()
        .text("phone", "+5511999998888")
        .file("selfie", "me.jpg", b"selfie");
    let response = ctx.post_multipart("/api/register", form).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Invalid event_id");
}

#[tokio::test]
async fn test_register_requires_phone_and_selfie() {
    let (ctx, event_id) = context_with_event(MatchStrategy::All).await;

    let form = MultipartBody::new()
        .text("event_id", &event_id)
        .text("phone", "   ")
        .file("selfie", "me.jpg", b"selfie");
    let response = ctx.post_multipart("/api/register", form).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Phone number is required");

    let form = MultipartBody::new().text("event_id", &event_id).text("phone", "+5511999998888");
    let response = ctx.post_multipart("/api/register", form).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Selfie image is required");

    let response = ctx
        .post_multipart("/api/register", registration_form(&event_id, "call me"))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_registration_response() {
    let (ctx, event_id) = context_with_event(MatchStrategy::None).await;

    let response = ctx
        .post_multipart("/api/register", registration_form(&event_id, "+5511999998888"))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    let token = body["gallery_token"].as_str().unwrap();
    assert!(body["participant_id"].is_string());
    assert_eq!(body["gallery_url"], format!("{PUBLIC_BASE_URL}/gallery/{token}"));
    assert!(body["message"].as_str().unwrap().starts_with("Perfeito! Cadastro realizado."));
}

#[tokio::test]
async fn test_gallery_tokens_are_distinct() {
    let (ctx, event_id) = context_with_event(MatchStrategy::None).await;

    let mut tokens = HashSet::new();
    for i in 0..5 {
        let phone = format!("+55119999900{i:02}");
        let body = ctx
            .post_multipart("/api/register", registration_form(&event_id, &phone))
            .await
            .json();
        tokens.insert(body["gallery_token"].as_str().unwrap().to_string());
    }
    assert_eq!(tokens.len(), 5);
}

#[tokio::test]
async fn test_upload_requires_event_and_file() {
    let (ctx, event_id) = context_with_event(MatchStrategy::All).await;

    let form = MultipartBody::new().file("file", "a.jpg", b"jpeg");
    let response = ctx.post_multipart("/api/uploads", form).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Invalid event_id");

    let response = ctx.post_multipart("/api/uploads", upload_form("missing", &["a.jpg"])).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Invalid event_id");

    let form = MultipartBody::new().text("event_id", &event_id);
    let response = ctx.post_multipart("/api/uploads", form).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "No file part");
}

#[tokio::test]
async fn test_upload_alias_route() {
    let (ctx, event_id) = context_with_event(MatchStrategy::All).await;

    let response = ctx
        .post_multipart("/api/upload", upload_form(&event_id, &["a.jpg", "b.mp4"]))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["uploads"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_gallery_is_empty_without_matches() {
    let (ctx, event_id) = context_with_event(MatchStrategy::None).await;

    let token = ctx
        .post_multipart("/api/register", registration_form(&event_id, "+5511999998888"))
        .await
        .json()["gallery_token"]
        .as_str()
        .unwrap()
        .to_string();
    ctx.post_multipart("/api/uploads", upload_form(&event_id, &["a.jpg", "b.jpg"])).await;

    let response = ctx.get(&format!("/api/gallery/{token}"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["media"], json!([]));
}

#[tokio::test]
async fn test_gallery_lists_matched_media() {
    let (ctx, event_id) = context_with_event(MatchStrategy::All).await;

    let registered = ctx
        .post_multipart("/api/register", registration_form(&event_id, "+5511999998888"))
        .await
        .json();
    let token = registered["gallery_token"].as_str().unwrap();

    let uploaded = ctx
        .post_multipart("/api/uploads", upload_form(&event_id, &["first.jpg"]))
        .await
        .json();
    ctx.post_multipart("/api/uploads", upload_form(&event_id, &["second.jpg"])).await;

    let gallery = ctx.get(&format!("/api/gallery/{token}"), None).await.json();
    assert_eq!(gallery["participant_id"], registered["participant_id"]);
    assert_eq!(gallery["event_id"], event_id.as_str());

    let media = gallery["media"].as_array().unwrap();
    assert_eq!(media.len(), 2);
    assert_eq!(media[0]["upload_id"], uploaded["uploads"][0]);
    let filename = media[0]["filename"].as_str().unwrap();
    assert!(filename.ends_with("_first.jpg"));
    assert_eq!(media[0]["url"], format!("/api/media/{filename}"));

    let file = ctx.get(&format!("/api/media/{filename}"), None).await;
    assert_eq!(file.status, StatusCode::OK);
    assert_eq!(file.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(file.bytes, b"content of first.jpg");
}

#[tokio::test]
async fn test_unknown_gallery_token() {
    let ctx = TestContext::new().await;
    let response = ctx.get("/api/gallery/0123456789abcdef", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error(), "Gallery not found");
}

#[tokio::test]
async fn test_media_rejects_unsafe_and_missing_names() {
    let ctx = TestContext::new().await;
    std::fs::write(ctx.temp_dir.path().join("secret.txt"), b"secret").unwrap();

    for uri in ["/api/media/..%2Fsecret.txt", "/api/media/.hidden", "/api/media/missing.jpg"] {
        let response = ctx.get(uri, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(response.error(), "File not found");
    }
}

#[tokio::test]
async fn test_slideshow_and_public_event() {
    let (ctx, event_id) = context_with_event(MatchStrategy::None).await;
    ctx.post_multipart("/api/uploads", upload_form(&event_id, &["a.jpg", "b.jpg", "c.jpg"])).await;

    let slideshow = ctx.get(&format!("/api/slideshow/{event_id}"), None).await;
    assert_eq!(slideshow.status, StatusCode::OK);
    assert_eq!(slideshow.json()["event_id"], event_id.as_str());
    assert_eq!(slideshow.json()["media"].as_array().unwrap().len(), 3);

    let public = ctx.get(&format!("/api/public/events/{event_id}"), None).await.json();
    assert_eq!(public["name"], "Graduation");
    assert_eq!(public["expiration_days"], 30);
    assert!(public.get("participants").is_none());

    assert_eq!(ctx.get("/api/slideshow/unknown", None).await.status, StatusCode::NOT_FOUND);
    assert_eq!(ctx.get("/api/public/events/unknown", None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_event_removes_galleries() {
    let (ctx, event_id) = context_with_event(MatchStrategy::All).await;
    let admin = ctx.login().await;

    let token = ctx
        .post_multipart("/api/register", registration_form(&event_id, "+5511999998888"))
        .await
        .json()["gallery_token"]
        .as_str()
        .unwrap()
        .to_string();
    ctx.post_multipart("/api/uploads", upload_form(&event_id, &["a.jpg"])).await;
    assert_eq!(std::fs::read_dir(ctx.upload_dir()).unwrap().count(), 2);

    let response = ctx.delete(&format!("/api/events/{event_id}"), Some(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);

    assert_eq!(ctx.get(&format!("/api/gallery/{token}"), None).await.status, StatusCode::NOT_FOUND);
    assert_eq!(std::fs::read_dir(ctx.upload_dir()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_expired_events_are_purged() {
    let (ctx, event_id) = context_with_event(MatchStrategy::All).await;
    let admin = ctx.login().await;
    let short = ctx
        .post_json("/api/events", Some(&admin), json!({ "name": "Short", "expiration_days": 1 }))
        .await
        .json()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let token = ctx
        .post_multipart("/api/register", registration_form(&short, "+5511999998888"))
        .await
        .json()["gallery_token"]
        .as_str()
        .unwrap()
        .to_string();

    let purged = ctx
        .state
        .gallery()
        .purge_expired_events(Utc::now() + Duration::days(2))
        .await
        .unwrap();
    assert_eq!(purged, 1);

    let gallery = ctx.get(&format!("/api/gallery/{token}"), None).await;
    assert_eq!(gallery.status, StatusCode::NOT_FOUND);
    let purged_event = ctx.get(&format!("/api/events/{short}"), Some(&admin)).await;
    assert_eq!(purged_event.status, StatusCode::NOT_FOUND);
    let kept_event = ctx.get(&format!("/api/events/{event_id}"), Some(&admin)).await;
    assert_eq!(kept_event.status, StatusCode::OK);
}

#[tokio::test]
async fn test_public_write_endpoints_are_rate_limited() {
    let ctx = TestContext::new_with_config(TestConfig {
        rate_limit: Some((1, 2)),
        ..Default::default()
    })
    .await;

    ctx.login().await;
    ctx.login().await;
    let credentials = json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD });
    let response = ctx.post_json("/api/login", None, credentials).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.error(), "Too many requests");

    // Admin and read endpoints are not limited
    assert_eq!(ctx.get("/api/health", None).await.status, StatusCode::OK);
}
