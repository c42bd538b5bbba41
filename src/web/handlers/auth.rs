//! Signup and signin handlers, plus the shared application state.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::auth::{self, validation::parse_date_of_birth, AccountError, RegistrationRequest};
use crate::board::BoardService;
use crate::db::{Account, AccountRepository, Database};
use crate::media::MediaStorage;
use crate::web::dto::{
    AccountResponse, ApiResponse, SigninRequest, SignupRequest, TokenResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, JwtClaims, JwtState, OptionalAuthUser};

/// Application state shared across handlers.
pub struct AppState {
    pub db: Database,
    pub storage: MediaStorage,
    pub jwt: Arc<JwtState>,
    /// Prefix prepended to media keys in responses.
    pub media_url_prefix: String,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        db: Database,
        storage: MediaStorage,
        jwt: Arc<JwtState>,
        media_url_prefix: impl Into<String>,
    ) -> Self {
        Self {
            db,
            storage,
            jwt,
            media_url_prefix: media_url_prefix.into(),
        }
    }

    pub fn accounts(&self) -> AccountRepository<'_> {
        AccountRepository::new(self.db.pool())
    }

    pub fn boards(&self) -> BoardService<'_> {
        BoardService::new(&self.db).with_storage(&self.storage)
    }

    /// Load the account a token was issued for.
    ///
    /// A token whose account no longer exists is treated as invalid.
    pub async fn load_account(&self, claims: &JwtClaims) -> Result<Account, ApiError> {
        self.accounts()
            .get_by_id(claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("User not found"))
    }

    /// Resolve the caller of a request that requires a token.
    pub async fn caller(&self, auth: &AuthUser) -> Result<Account, ApiError> {
        self.load_account(&auth.0).await
    }

    /// Resolve the caller of a request where a token is optional.
    pub async fn optional_caller(
        &self,
        auth: &OptionalAuthUser,
    ) -> Result<Option<Account>, ApiError> {
        match &auth.0 {
            Some(claims) => self.load_account(claims).await.map(Some),
            None => Ok(None),
        }
    }

    pub fn account_response(&self, account: Account) -> AccountResponse {
        AccountResponse::from_account(account, &self.media_url_prefix)
    }
}

/// POST /api/signup - Create an account.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), ApiError> {
    auth::check_permission(None, auth::Operation::Signup)?;

    let date_of_birth =
        parse_date_of_birth(req.date_of_birth.as_deref()).map_err(AccountError::from)?;
    let mut registration = RegistrationRequest::new(req.email, req.username, req.password);
    if let Some(date) = date_of_birth {
        registration = registration.with_date_of_birth(date);
    }

    let account = auth::create_account(&state.accounts(), registration).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(state.account_response(account))),
    ))
}

/// POST /api/signin - Exchange credentials for a bearer token.
pub async fn signin(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SigninRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let account = auth::authenticate(&state.accounts(), &req.username, &req.password).await?;
    let token = state.jwt.issue(&account)?;

    tracing::info!(account_id = account.id, username = %account.username, "Signed in");

    Ok(Json(ApiResponse::new(TokenResponse {
        token,
        expires_in: state.jwt.expiry_secs(),
    })))
}
