//! Board handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::auth::AppState;
use crate::board::BoardUpdate;
use crate::web::dto::{
    ApiResponse, BoardResponse, CreateBoardRequest, UpdateBoardRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, OptionalAuthUser};

/// GET /api/boards - List boards.
pub async fn list_boards(
    State(state): State<Arc<AppState>>,
    auth_user: OptionalAuthUser,
) -> Result<Json<ApiResponse<Vec<BoardResponse>>>, ApiError> {
    let caller = state.optional_caller(&auth_user).await?;
    let boards = state.boards().list_boards(caller.as_ref()).await?;

    Ok(Json(ApiResponse::new(
        boards.into_iter().map(BoardResponse::from).collect(),
    )))
}

/// POST /api/boards - Create a board (admin).
pub async fn create_board(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateBoardRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BoardResponse>>), ApiError> {
    let caller = state.caller(&auth_user).await?;
    let board = state
        .boards()
        .create_board(Some(&caller), &req.title, &req.code)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(BoardResponse::from(board))),
    ))
}

/// GET /api/boards/:id - Retrieve a board (admin).
pub async fn get_board(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<BoardResponse>>, ApiError> {
    let caller = state.caller(&auth_user).await?;
    let board = state.boards().get_board(Some(&caller), id).await?;

    Ok(Json(ApiResponse::new(BoardResponse::from(board))))
}

/// PATCH /api/boards/:id - Update a board (admin).
pub async fn update_board(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateBoardRequest>,
) -> Result<Json<ApiResponse<BoardResponse>>, ApiError> {
    let caller = state.caller(&auth_user).await?;

    let mut update = BoardUpdate::new();
    if let Some(title) = req.title {
        update = update.title(title);
    }
    if let Some(code) = req.code {
        update = update.code(code);
    }

    let board = state
        .boards()
        .update_board(Some(&caller), id, update)
        .await?;

    Ok(Json(ApiResponse::new(BoardResponse::from(board))))
}

/// DELETE /api/boards/:id - Delete a board and its threads (admin).
pub async fn delete_board(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let caller = state.caller(&auth_user).await?;
    state.boards().delete_board(Some(&caller), id).await?;

    Ok(StatusCode::NO_CONTENT)
}
