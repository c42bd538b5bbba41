//! Test helpers for web API integration tests.
//!
//! Builds a router over an in-memory database and a temporary media root,
//! plus shortcuts for signing up and signing in.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use chanboard::auth::{create_admin_account, RegistrationRequest};
use chanboard::web::handlers::AppState;
use chanboard::web::middleware::{JwtState, RateLimitState};
use chanboard::web::router::{create_router, RouterOptions};
use chanboard::{AccountRepository, Database, MediaStorage};

pub const JWT_SECRET: &str = "test-secret-key-for-testing-only";
pub const MAX_UPLOAD_BYTES: u64 = 64 * 1024;
pub const PASSWORD: &str = "password123";

/// A 1x1 PNG.
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// A running test server and the resources it owns.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
    pub media_root: TempDir,
}

/// Create a test server with an in-memory database.
pub async fn create_test_app() -> TestApp {
    create_test_app_with_rate_limit(100).await
}

pub async fn create_test_app_with_rate_limit(signin_per_minute: u32) -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let media_root = tempfile::tempdir().expect("Failed to create media root");
    let storage =
        MediaStorage::new(media_root.path(), MAX_UPLOAD_BYTES).expect("Failed to create storage");

    let app_state = Arc::new(AppState::new(
        db.clone(),
        storage,
        Arc::new(JwtState::new(JWT_SECRET, 3600)),
        "/media",
    ));
    let options = RouterOptions {
        cors_origins: vec![],
        max_upload_bytes: MAX_UPLOAD_BYTES,
    };
    let router = create_router(
        app_state,
        Arc::new(RateLimitState::new(signin_per_minute)),
        &options,
    );

    TestApp {
        server: TestServer::new(router).expect("Failed to create test server"),
        db,
        media_root,
    }
}

impl TestApp {
    /// Sign up a regular account and return the response body.
    pub async fn signup(&self, username: &str) -> Value {
        let response = self
            .server
            .post("/api/signup")
            .json(&json!({
                "email": format!("{username}@example.com"),
                "username": username,
                "password": PASSWORD,
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()
    }

    /// Sign in and return the bearer token.
    pub async fn signin(&self, username: &str, password: &str) -> String {
        let response = self
            .server
            .post("/api/signin")
            .json(&json!({ "username": username, "password": password }))
            .await;
        response.assert_status_ok();
        response.json::<Value>()["data"]["token"]
            .as_str()
            .expect("token missing")
            .to_string()
    }

    /// Sign up a regular account and return its token.
    pub async fn user_token(&self, username: &str) -> String {
        self.signup(username).await;
        self.signin(username, PASSWORD).await
    }

    /// Create an admin account directly in the store and return its token.
    pub async fn admin_token(&self, username: &str) -> String {
        let repo = AccountRepository::new(self.db.pool());
        create_admin_account(
            &repo,
            RegistrationRequest::new(format!("{username}@example.com"), username, PASSWORD),
        )
        .await
        .expect("Failed to create admin");
        self.signin(username, PASSWORD).await
    }

    /// Create a board as `admin_token` and return its ID.
    pub async fn create_board(&self, admin_token: &str, title: &str, code: &str) -> i64 {
        let response = self
            .server
            .post("/api/boards")
            .add_header(
                axum::http::header::AUTHORIZATION,
                format!("Bearer {admin_token}"),
            )
            .json(&json!({ "title": title, "code": code }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["data"]["id"]
            .as_i64()
            .expect("board id missing")
    }

    /// Create a thread as `token` and return its ID.
    pub async fn create_thread(&self, token: &str, board_id: i64, title: &str) -> i64 {
        let response = self
            .server
            .post(&format!("/api/boards/{board_id}/threads"))
            .add_header(
                axum::http::header::AUTHORIZATION,
                format!("Bearer {token}"),
            )
            .json(&json!({ "title": title, "content": "body" }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["data"]["id"]
            .as_i64()
            .expect("thread id missing")
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
