//! Router configuration for the web API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::handlers::{
    change_password, clear_vote, create_board, create_thread, delete_board, get_board,
    get_profile, get_thread, list_boards, list_threads, signin, signup, update_board,
    update_profile, upload_avatar, upload_thread_image, vote, AppState,
};
use super::middleware::{
    create_cors_layer, jwt_auth, signin_rate_limit, with_security_headers, RateLimitState,
};

/// Extra room above the upload size for multipart framing and text fields.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Router settings not carried by the application state.
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    pub cors_origins: Vec<String>,
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: u64,
}

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    rate_limit: Arc<RateLimitState>,
    options: &RouterOptions,
) -> Router {
    let signin_routes = Router::new()
        .route("/signin", post(signin))
        .layer(middleware::from_fn(move |req, next| {
            signin_rate_limit(rate_limit.clone(), req, next)
        }));

    let account_routes = Router::new()
        .route("/signup", post(signup))
        .route("/profile", get(get_profile).patch(update_profile))
        .route("/profile/avatar", put(upload_avatar))
        .route("/change-password", patch(change_password));

    let board_routes = Router::new()
        .route("/boards", get(list_boards).post(create_board))
        .route(
            "/boards/:id",
            get(get_board).patch(update_board).delete(delete_board),
        )
        .route("/boards/:id/threads", get(list_threads).post(create_thread));

    let thread_routes = Router::new()
        .route("/threads/:id", get(get_thread))
        .route("/threads/:id/image", put(upload_thread_image))
        .route("/threads/:id/vote", post(vote).delete(clear_vote));

    let api_routes = Router::new()
        .merge(signin_routes)
        .merge(account_routes)
        .merge(board_routes)
        .merge(thread_routes);

    let body_limit = usize::try_from(options.max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);
    let jwt_state = app_state.jwt.clone();

    let router = Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .merge(create_media_router(&app_state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&options.cors_origins))
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(middleware::from_fn(move |req, next| {
                    jwt_auth(jwt_state.clone(), req, next)
                })),
        )
        .with_state(app_state);

    with_security_headers(router)
}

/// Serve stored media when the URL prefix is a local path.
fn create_media_router(app_state: &AppState) -> Router<Arc<AppState>> {
    let prefix = app_state.media_url_prefix.trim_end_matches('/');
    if !prefix.starts_with('/') || prefix.len() < 2 {
        return Router::new();
    }

    Router::new().nest_service(prefix, ServeDir::new(app_state.storage.root()))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
