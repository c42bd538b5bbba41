//! Profile, avatar and password handlers.

use axum::{extract::Multipart, extract::State, Json};
use std::sync::Arc;

use super::auth::AppState;
use super::upload::UploadForm;
use crate::auth::{
    self, check_permission, validation::parse_date_of_birth, AccountError, Operation,
    ProfileUpdateRequest,
};
use crate::web::dto::{
    AccountResponse, ApiResponse, ChangePasswordRequest, MessageResponse, UpdateProfileRequest,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// GET /api/profile - The caller's own account.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    let account = state.caller(&auth_user).await?;
    check_permission(Some(&account), Operation::ViewOwnProfile)?;

    Ok(Json(ApiResponse::new(state.account_response(account))))
}

/// PATCH /api/profile - Update email, username or date of birth.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    let account = state.caller(&auth_user).await?;
    check_permission(Some(&account), Operation::UpdateOwnProfile)?;

    let mut update = ProfileUpdateRequest::new();
    if let Some(email) = req.email {
        update = update.email(email);
    }
    if let Some(username) = req.username {
        update = update.username(username);
    }
    if let Some(date_of_birth) = req.date_of_birth {
        let parsed = parse_date_of_birth(date_of_birth.as_deref()).map_err(AccountError::from)?;
        update = update.date_of_birth(parsed);
    }

    let updated = auth::update_profile(&state.accounts(), account.id, update).await?;
    Ok(Json(ApiResponse::new(state.account_response(updated))))
}

/// PUT /api/profile/avatar - Replace the avatar with an uploaded image.
pub async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    let account = state.caller(&auth_user).await?;
    check_permission(Some(&account), Operation::UpdateOwnProfile)?;

    let form = UploadForm::read(multipart).await?;
    let file = form.require_file()?;

    let updated = auth::set_avatar(
        &state.accounts(),
        &state.storage,
        account.id,
        &file.file_name,
        &file.content,
    )
    .await?;
    Ok(Json(ApiResponse::new(state.account_response(updated))))
}

/// PATCH /api/change-password - Change the caller's password.
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let account = state.caller(&auth_user).await?;
    check_permission(Some(&account), Operation::ChangeOwnPassword)?;

    auth::change_password(
        &state.accounts(),
        account.id,
        &req.old_password,
        &req.new_password,
        &req.confirm_password,
    )
    .await?;

    Ok(Json(ApiResponse::new(MessageResponse::new(
        "Password updated successfully",
    ))))
}
