//! Sign-in and password changes.

use tracing::{info, warn};

use super::error::AccountError;
use super::password::{hash_password, verify_password, PasswordError};
use crate::db::{Account, AccountRepository, AccountUpdate};

/// Authenticate by username and password.
///
/// Unknown usernames and wrong passwords produce the same error.
pub async fn authenticate(
    repo: &AccountRepository<'_>,
    username: &str,
    password: &str,
) -> Result<Account, AccountError> {
    let account = repo
        .get_by_username(username.trim())
        .await?
        .ok_or(AccountError::InvalidCredentials)?;

    match verify_password(password, &account.password) {
        Ok(()) => {}
        Err(PasswordError::VerificationFailed) => {
            warn!(username = %account.username, "Failed sign-in attempt");
            return Err(AccountError::InvalidCredentials);
        }
        Err(e) => return Err(e.into()),
    }

    if !account.is_active {
        return Err(AccountError::AccountInactive);
    }

    Ok(account)
}

/// Change an account's password.
///
/// The old password must verify and the new one must equal its
/// confirmation. On any failure the stored credential is left untouched.
pub async fn change_password(
    repo: &AccountRepository<'_>,
    account_id: i64,
    old_password: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<Account, AccountError> {
    let account = repo
        .get_by_id(account_id)
        .await?
        .ok_or(AccountError::NotFound)?;

    match verify_password(old_password, &account.password) {
        Ok(()) => {}
        Err(PasswordError::VerificationFailed) => return Err(AccountError::IncorrectPassword),
        Err(e) => return Err(e.into()),
    }

    if new_password != confirm_password {
        return Err(AccountError::PasswordMismatch);
    }

    let password_hash = hash_password(new_password)?;
    let updated = repo
        .update(account_id, &AccountUpdate::new().password(password_hash))
        .await?
        .ok_or(AccountError::NotFound)?;

    info!(account_id = account_id, "Password changed");
    Ok(updated)
}
