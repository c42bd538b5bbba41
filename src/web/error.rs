//! API error handling for the chanboard web API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::auth::{AccountError, PasswordError, PermissionError, ValidationError};
use crate::media::MediaError;
use crate::ChanError;

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed request (400).
    BadRequest,
    /// Invalid or missing input (400).
    ValidationError,
    /// Wrong credentials supplied in the request body (400).
    AuthenticationFailed,
    /// Missing or invalid bearer token (401).
    Unauthorized,
    /// Forbidden (403).
    Forbidden,
    /// Not found (404).
    NotFound,
    /// Upload larger than allowed (413).
    PayloadTooLarge,
    /// Too many requests (429).
    TooManyRequests,
    /// Internal server error (500).
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest
            | ErrorCode::ValidationError
            | ErrorCode::AuthenticationFailed => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Error detail.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Field-level messages, only present for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Vec<String>>>,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    details: Option<HashMap<String, Vec<String>>>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create a new API error with field-level details.
    pub fn with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn authentication_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthenticationFailed, message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PayloadTooLarge, message)
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TooManyRequests, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Validation error without field details.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Validation error attributed to a single field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut details = HashMap::new();
        details.insert(field.to_string(), vec![message.clone()]);
        Self::with_details(ErrorCode::ValidationError, message, details)
    }

    /// Create a validation error with field-level details.
    pub fn validation(details: HashMap<String, Vec<String>>) -> Self {
        Self::with_details(ErrorCode::ValidationError, "Validation failed", details)
    }

    /// Create a validation error from validator::ValidationErrors.
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let mut details: HashMap<String, Vec<String>> = HashMap::new();

        for (field, field_errors) in errors.field_errors() {
            let messages: Vec<String> = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
                .collect();
            details.insert(field.to_string(), messages);
        }

        Self::validation(details)
    }

    fn internal_from(err: &dyn std::fmt::Display) -> Self {
        tracing::error!("Internal error: {}", err);
        ApiError::internal("An internal error occurred")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<ChanError> for ApiError {
    fn from(err: ChanError) -> Self {
        match &err {
            ChanError::Auth(msg) => ApiError::unauthorized(msg.clone()),
            ChanError::NotFound(_) => ApiError::not_found(err.to_string()),
            ChanError::Validation(msg) => ApiError::invalid(msg.clone()),
            ChanError::Permission(msg) => ApiError::forbidden(msg.clone()),
            _ => ApiError::internal_from(&err),
        }
    }
}

impl From<PermissionError> for ApiError {
    fn from(err: PermissionError) -> Self {
        ChanError::from(err).into()
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::TooLarge(_) => ApiError::payload_too_large(err.to_string()),
            e if e.is_client_error() => ApiError::invalid_field("file", e.to_string()),
            e => ApiError::internal_from(&e),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        let field = match &err {
            AccountError::Validation(
                ValidationError::EmailEmpty
                | ValidationError::EmailTooLong
                | ValidationError::EmailInvalidFormat,
            )
            | AccountError::EmailExists => Some("email"),
            AccountError::Validation(
                ValidationError::UsernameEmpty
                | ValidationError::UsernameTooLong
                | ValidationError::UsernameInvalidChars,
            )
            | AccountError::UsernameExists => Some("username"),
            AccountError::Validation(ValidationError::DateOfBirthInvalid) => {
                Some("date_of_birth")
            }
            AccountError::Password(PasswordError::TooShort | PasswordError::TooLong) => {
                Some("password")
            }
            AccountError::PasswordMismatch => Some("confirm_password"),
            _ => None,
        };

        if let Some(field) = field {
            return ApiError::invalid_field(field, err.to_string());
        }

        match err {
            AccountError::InvalidCredentials
            | AccountError::AccountInactive
            | AccountError::IncorrectPassword => ApiError::authentication_failed(err.to_string()),
            AccountError::NotFound => ApiError::not_found(err.to_string()),
            AccountError::Media(e) => e.into(),
            AccountError::Store(e) => e.into(),
            e => ApiError::internal_from(&e),
        }
    }
}
