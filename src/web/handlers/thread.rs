//! Thread and vote handlers.

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    Json,
};
use std::sync::Arc;

use super::auth::AppState;
use super::upload::UploadForm;
use crate::board::{Thread, VoteDirection};
use crate::db::Account;
use crate::web::dto::{
    validation::single_line_text, ApiResponse, CreateThreadRequest, ThreadResponse,
    ValidatedJson, VoteRequest,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, OptionalAuthUser};

impl AppState {
    async fn thread_response(
        &self,
        caller: Option<&Account>,
        thread: Thread,
    ) -> Result<ThreadResponse, ApiError> {
        let my_vote = self.boards().vote_of(caller, thread.id).await?;
        Ok(ThreadResponse::from_thread(
            thread,
            my_vote,
            &self.media_url_prefix,
        ))
    }
}

/// GET /api/boards/:id/threads - List a board's threads, newest first.
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
    auth_user: OptionalAuthUser,
    Path(board_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<ThreadResponse>>>, ApiError> {
    let caller = state.optional_caller(&auth_user).await?;
    let threads = state
        .boards()
        .list_threads(caller.as_ref(), board_id)
        .await?;

    let mut data = Vec::with_capacity(threads.len());
    for thread in threads {
        data.push(state.thread_response(caller.as_ref(), thread).await?);
    }

    Ok(Json(ApiResponse::new(data)))
}

/// POST /api/boards/:id/threads - Create a thread.
///
/// Accepts a JSON body, or a multipart form with `title`, `content` and an
/// optional image in `file`.
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(board_id): Path<i64>,
    request: Request,
) -> Result<(StatusCode, Json<ApiResponse<ThreadResponse>>), ApiError> {
    let caller = state.caller(&auth_user).await?;

    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    let boards = state.boards();
    let thread = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        let form = UploadForm::read(multipart).await?;

        let title = form.field("title").unwrap_or_default();
        single_line_text(title).map_err(|_| {
            ApiError::invalid_field("title", "Title must be a non-blank single line")
        })?;
        let content = form.field("content").unwrap_or_default();
        if let Some(file) = &form.file {
            file.check_size(state.storage.max_size())?;
        }

        boards
            .create_thread(
                Some(&caller),
                board_id,
                title,
                content,
                form.file.as_ref().map(|f| f.as_upload()),
            )
            .await?
    } else {
        let ValidatedJson(req) =
            ValidatedJson::<CreateThreadRequest>::from_request(request, &state).await?;
        boards
            .create_thread(Some(&caller), board_id, &req.title, &req.content, None)
            .await?
    };

    let response = state.thread_response(Some(&caller), thread).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(response))))
}

/// GET /api/threads/:id - Retrieve a thread.
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    auth_user: OptionalAuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ThreadResponse>>, ApiError> {
    let caller = state.optional_caller(&auth_user).await?;
    let thread = state.boards().get_thread(caller.as_ref(), id).await?;

    let response = state.thread_response(caller.as_ref(), thread).await?;
    Ok(Json(ApiResponse::new(response)))
}

/// PUT /api/threads/:id/image - Attach or replace a thread's image.
pub async fn upload_thread_image(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ThreadResponse>>, ApiError> {
    let caller = state.caller(&auth_user).await?;

    let form = UploadForm::read(multipart).await?;
    let file = form.require_file()?;
    file.check_size(state.storage.max_size())?;

    let thread = state
        .boards()
        .set_thread_image(Some(&caller), id, file.as_upload())
        .await?;

    let response = state.thread_response(Some(&caller), thread).await?;
    Ok(Json(ApiResponse::new(response)))
}

/// POST /api/threads/:id/vote - Vote up or down.
pub async fn vote(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<VoteRequest>,
) -> Result<Json<ApiResponse<ThreadResponse>>, ApiError> {
    let caller = state.caller(&auth_user).await?;
    let direction: VoteDirection = req.direction.trim().parse()?;

    let thread = state.boards().vote(Some(&caller), id, direction).await?;

    let response = state.thread_response(Some(&caller), thread).await?;
    Ok(Json(ApiResponse::new(response)))
}

/// DELETE /api/threads/:id/vote - Withdraw the caller's vote.
pub async fn clear_vote(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ThreadResponse>>, ApiError> {
    let caller = state.caller(&auth_user).await?;
    let thread = state.boards().clear_vote(Some(&caller), id).await?;

    let response = state.thread_response(Some(&caller), thread).await?;
    Ok(Json(ApiResponse::new(response)))
}
