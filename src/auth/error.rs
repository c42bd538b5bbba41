//! Account operation errors.

use thiserror::Error;

use super::password::PasswordError;
use super::validation::ValidationError;
use crate::media::MediaError;
use crate::ChanError;

/// Errors from account creation, authentication and profile changes.
#[derive(Error, Debug)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("a user with that username already exists")]
    UsernameExists,

    #[error("a user with that email already exists")]
    EmailExists,

    /// Unknown username or wrong password.
    #[error("unable to authenticate with provided credentials")]
    InvalidCredentials,

    #[error("account is inactive")]
    AccountInactive,

    /// The old password given to a password change did not verify.
    #[error("old password is incorrect")]
    IncorrectPassword,

    #[error("new password and confirmation do not match")]
    PasswordMismatch,

    #[error("account not found")]
    NotFound,

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Store(#[from] ChanError),
}

impl AccountError {
    /// Whether the caller's input caused the error.
    pub fn is_client_error(&self) -> bool {
        match self {
            AccountError::Password(PasswordError::HashError(_))
            | AccountError::Password(PasswordError::InvalidHash) => false,
            AccountError::Media(e) => e.is_client_error(),
            AccountError::Store(e) => matches!(e, ChanError::Validation(_)),
            AccountError::NotFound => false,
            _ => true,
        }
    }
}
