//! Web API Thread Tests
//!
//! Integration tests for threads, thread images and voting.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{json, Value};

use common::{bearer, create_test_app, TestApp, MAX_UPLOAD_BYTES, PNG_BYTES};

async fn board_with_user(app: &TestApp) -> (i64, String) {
    let admin = app.admin_token("admin").await;
    let board_id = app.create_board(&admin, "Programming", "pl").await;
    let token = app.user_token("alice").await;
    (board_id, token)
}

async fn vote(app: &TestApp, token: &str, thread_id: i64, direction: &str) -> Value {
    let response = app
        .server
        .post(&format!("/api/threads/{thread_id}/vote"))
        .add_header(AUTHORIZATION, bearer(token))
        .json(&json!({ "direction": direction }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

// ============================================================================
// Thread Tests
// ============================================================================

#[tokio::test]
async fn test_create_thread_json() {
    let app = create_test_app().await;
    let (board_id, token) = board_with_user(&app).await;

    let response = app
        .server
        .post(&format!("/api/boards/{board_id}/threads"))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "title": "Why Rust?", "content": "Discuss." }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["data"]["title"], "Why Rust?");
    assert_eq!(body["data"]["board_id"], board_id);
    assert_eq!(body["data"]["upvotes"], 0);
    assert_eq!(body["data"]["downvotes"], 0);
    assert!(body["data"]["image"].is_null());
    assert!(body["data"]["my_vote"].is_null());
}

#[tokio::test]
async fn test_create_thread_multipart_with_image() {
    let app = create_test_app().await;
    let (board_id, token) = board_with_user(&app).await;

    let form = MultipartForm::new()
        .add_text("title", "Look at this")
        .add_text("content", "A picture")
        .add_part(
            "file",
            Part::bytes(PNG_BYTES.to_vec())
                .file_name("cat.PNG")
                .mime_type("image/png"),
        );

    let response = app
        .server
        .post(&format!("/api/boards/{board_id}/threads"))
        .add_header(AUTHORIZATION, bearer(&token))
        .multipart(form)
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let image = body["data"]["image"].as_str().unwrap();
    assert!(image.starts_with("uploads/thread/"));
    assert!(image.ends_with(".PNG"));
    assert_eq!(body["data"]["image_url"], format!("/media/{image}"));
    assert!(app.media_root.path().join(image).exists());
}

#[tokio::test]
async fn test_create_thread_anonymous_unauthorized() {
    let app = create_test_app().await;
    let (board_id, _token) = board_with_user(&app).await;

    let response = app
        .server
        .post(&format!("/api/boards/{board_id}/threads"))
        .json(&json!({ "title": "Anon", "content": "" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_thread_unknown_board() {
    let app = create_test_app().await;
    let token = app.user_token("alice").await;

    let response = app
        .server
        .post("/api/boards/9999/threads")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "title": "Lost", "content": "" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_thread_blank_title() {
    let app = create_test_app().await;
    let (board_id, token) = board_with_user(&app).await;

    let response = app
        .server
        .post(&format!("/api/boards/{board_id}/threads"))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "title": "  ", "content": "body" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"]["details"]["title"].is_array());
}

#[tokio::test]
async fn test_list_threads_newest_first() {
    let app = create_test_app().await;
    let (board_id, token) = board_with_user(&app).await;
    let first = app.create_thread(&token, board_id, "First").await;
    let second = app.create_thread(&token, board_id, "Second").await;

    let response = app
        .server
        .get(&format!("/api/boards/{board_id}/threads"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let threads = body["data"].as_array().unwrap();
    assert_eq!(threads.len(), 2);
    assert_eq!(threads[0]["id"], second);
    assert_eq!(threads[1]["id"], first);
}

#[tokio::test]
async fn test_get_thread_public() {
    let app = create_test_app().await;
    let (board_id, token) = board_with_user(&app).await;
    let thread_id = app.create_thread(&token, board_id, "Hello").await;

    let response = app.server.get(&format!("/api/threads/{thread_id}")).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["title"], "Hello");
    assert_eq!(body["data"]["content"], "body");
}

#[tokio::test]
async fn test_get_thread_not_found() {
    let app = create_test_app().await;

    app.server
        .get("/api/threads/9999")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Thread Image Tests
// ============================================================================

#[tokio::test]
async fn test_set_thread_image_author_only() {
    let app = create_test_app().await;
    let (board_id, token) = board_with_user(&app).await;
    let thread_id = app.create_thread(&token, board_id, "Hello").await;
    let other = app.user_token("bob").await;

    let image = || {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(PNG_BYTES.to_vec())
                .file_name("pic.png")
                .mime_type("image/png"),
        )
    };

    app.server
        .put(&format!("/api/threads/{thread_id}/image"))
        .add_header(AUTHORIZATION, bearer(&other))
        .multipart(image())
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = app
        .server
        .put(&format!("/api/threads/{thread_id}/image"))
        .add_header(AUTHORIZATION, bearer(&token))
        .multipart(image())
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["data"]["image"]
        .as_str()
        .unwrap()
        .starts_with("uploads/thread/"));
}

#[tokio::test]
async fn test_set_thread_image_too_large() {
    let app = create_test_app().await;
    let (board_id, token) = board_with_user(&app).await;
    let thread_id = app.create_thread(&token, board_id, "Hello").await;

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(vec![0u8; MAX_UPLOAD_BYTES as usize + 1])
            .file_name("huge.png")
            .mime_type("image/png"),
    );

    let response = app
        .server
        .put(&format!("/api/threads/{thread_id}/image"))
        .add_header(AUTHORIZATION, bearer(&token))
        .multipart(form)
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

// ============================================================================
// Vote Tests
// ============================================================================

#[tokio::test]
async fn test_vote_up_then_down_moves_vote() {
    let app = create_test_app().await;
    let (board_id, token) = board_with_user(&app).await;
    let thread_id = app.create_thread(&token, board_id, "Hello").await;

    let body = vote(&app, &token, thread_id, "up").await;
    assert_eq!(body["data"]["upvotes"], 1);
    assert_eq!(body["data"]["downvotes"], 0);
    assert_eq!(body["data"]["my_vote"], "up");

    let body = vote(&app, &token, thread_id, "down").await;
    assert_eq!(body["data"]["upvotes"], 0);
    assert_eq!(body["data"]["downvotes"], 1);
    assert_eq!(body["data"]["score"], -1);
    assert_eq!(body["data"]["my_vote"], "down");
}

#[tokio::test]
async fn test_vote_is_idempotent() {
    let app = create_test_app().await;
    let (board_id, token) = board_with_user(&app).await;
    let thread_id = app.create_thread(&token, board_id, "Hello").await;

    vote(&app, &token, thread_id, "up").await;
    let body = vote(&app, &token, thread_id, "up").await;
    assert_eq!(body["data"]["upvotes"], 1);
}

#[tokio::test]
async fn test_votes_from_several_accounts() {
    let app = create_test_app().await;
    let (board_id, token) = board_with_user(&app).await;
    let thread_id = app.create_thread(&token, board_id, "Hello").await;
    let bob = app.user_token("bob").await;
    let carol = app.user_token("carol").await;

    vote(&app, &token, thread_id, "up").await;
    vote(&app, &bob, thread_id, "up").await;
    vote(&app, &carol, thread_id, "down").await;

    let response = app
        .server
        .get(&format!("/api/threads/{thread_id}"))
        .add_header(AUTHORIZATION, bearer(&carol))
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["upvotes"], 2);
    assert_eq!(body["data"]["downvotes"], 1);
    assert_eq!(body["data"]["my_vote"], "down");
}

#[tokio::test]
async fn test_clear_vote() {
    let app = create_test_app().await;
    let (board_id, token) = board_with_user(&app).await;
    let thread_id = app.create_thread(&token, board_id, "Hello").await;
    vote(&app, &token, thread_id, "down").await;

    let response = app
        .server
        .delete(&format!("/api/threads/{thread_id}/vote"))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["upvotes"], 0);
    assert_eq!(body["data"]["downvotes"], 0);
    assert!(body["data"]["my_vote"].is_null());
}

#[tokio::test]
async fn test_vote_invalid_direction() {
    let app = create_test_app().await;
    let (board_id, token) = board_with_user(&app).await;
    let thread_id = app.create_thread(&token, board_id, "Hello").await;

    let response = app
        .server
        .post(&format!("/api/threads/{thread_id}/vote"))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "direction": "sideways" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_vote_anonymous_unauthorized() {
    let app = create_test_app().await;
    let (board_id, token) = board_with_user(&app).await;
    let thread_id = app.create_thread(&token, board_id, "Hello").await;

    app.server
        .post(&format!("/api/threads/{thread_id}/vote"))
        .json(&json!({ "direction": "up" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_vote_unknown_thread() {
    let app = create_test_app().await;
    let token = app.user_token("alice").await;

    app.server
        .post("/api/threads/9999/vote")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({ "direction": "up" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
