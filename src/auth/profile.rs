//! Profile management.
//!
//! Reading and updating the caller's own account, excluding the password,
//! plus avatar replacement.

use chrono::NaiveDate;
use tracing::info;

use super::error::AccountError;
use super::validation::{normalize_email, validate_email, validate_username};
use crate::db::{Account, AccountRepository, AccountUpdate};
use crate::media::{MediaStorage, UploadCategory};

/// Partial profile update. Unset fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdateRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    /// `Some(None)` clears the date of birth.
    pub date_of_birth: Option<Option<NaiveDate>>,
}

impl ProfileUpdateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn date_of_birth(mut self, date_of_birth: Option<NaiveDate>) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.username.is_none() && self.date_of_birth.is_none()
    }
}

/// Load an account's profile.
pub async fn get_profile(
    repo: &AccountRepository<'_>,
    account_id: i64,
) -> Result<Account, AccountError> {
    repo.get_by_id(account_id)
        .await?
        .ok_or(AccountError::NotFound)
}

/// Update an account's profile.
///
/// Email and username follow the same rules as signup, and must not belong
/// to another account.
pub async fn update_profile(
    repo: &AccountRepository<'_>,
    account_id: i64,
    request: ProfileUpdateRequest,
) -> Result<Account, AccountError> {
    let current = get_profile(repo, account_id).await?;
    if request.is_empty() {
        return Ok(current);
    }

    let mut update = AccountUpdate::new();

    if let Some(ref email) = request.email {
        let email = normalize_email(email);
        validate_email(&email)?;
        if email != current.email && repo.email_exists(&email).await? {
            return Err(AccountError::EmailExists);
        }
        update = update.email(email);
    }

    if let Some(ref username) = request.username {
        let username = username.trim();
        validate_username(username)?;
        if username != current.username
            && repo.username_exists(username).await?
        {
            return Err(AccountError::UsernameExists);
        }
        update = update.username(username);
    }

    if let Some(date_of_birth) = request.date_of_birth {
        update = update.date_of_birth(date_of_birth);
    }

    let updated = repo
        .update(account_id, &update)
        .await?
        .ok_or(AccountError::NotFound)?;

    info!(
        account_id = account_id,
        username = %updated.username,
        "Profile updated"
    );

    Ok(updated)
}

/// Replace an account's avatar with an uploaded image.
///
/// The image is stored under `uploads/avatar/`. The previous avatar file is
/// removed unless it is the shared default.
pub async fn set_avatar(
    repo: &AccountRepository<'_>,
    storage: &MediaStorage,
    account_id: i64,
    original_name: &str,
    content: &[u8],
) -> Result<Account, AccountError> {
    let current = get_profile(repo, account_id).await?;

    let key = storage
        .save_image(UploadCategory::Avatar, original_name, content)
        .await?;

    let updated = match repo
        .update(account_id, &AccountUpdate::new().avatar(&key))
        .await
    {
        Ok(Some(account)) => account,
        Ok(None) => {
            storage.discard(&key).await;
            return Err(AccountError::NotFound);
        }
        Err(e) => {
            storage.discard(&key).await;
            return Err(e.into());
        }
    };

    storage.discard(&current.avatar).await;

    info!(account_id = account_id, avatar = %key, "Avatar updated");
    Ok(updated)
}
