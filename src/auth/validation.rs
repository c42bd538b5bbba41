//! Input validation for account fields.

use thiserror::Error;

/// Maximum username length in characters.
pub const MAX_USERNAME_LENGTH: usize = 255;

/// Maximum email length in characters.
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("account must have a username")]
    UsernameEmpty,

    #[error("username must be at most {MAX_USERNAME_LENGTH} characters")]
    UsernameTooLong,

    /// Whitespace or control characters.
    #[error("username cannot contain whitespace or control characters")]
    UsernameInvalidChars,

    #[error("account must have an email address")]
    EmailEmpty,

    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    #[error("invalid email format")]
    EmailInvalidFormat,

    /// Date of birth did not parse as YYYY-MM-DD.
    #[error("date of birth must be formatted as YYYY-MM-DD")]
    DateOfBirthInvalid,
}

/// Normalize an email address for storage and comparison.
///
/// Surrounding whitespace is removed and the whole address is lowercased.
///
/// # Examples
///
/// ```
/// use chanboard::auth::validation::normalize_email;
///
/// assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
/// ```
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate a username.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::UsernameEmpty);
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }
    if username
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(ValidationError::UsernameInvalidChars);
    }
    Ok(())
}

/// Validate an email address.
///
/// This is a basic shape check: one `@`, a non-empty local part, and a
/// dotted domain with no empty labels.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::EmailEmpty);
    }
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }
    if email.chars().any(|c| c.is_whitespace()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::EmailInvalidFormat);
    };
    if local.is_empty() || domain.contains('@') {
        return Err(ValidationError::EmailInvalidFormat);
    }
    if !domain.contains('.') || domain.split('.').any(|p| p.is_empty()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    Ok(())
}

/// Parse an optional date of birth given as `YYYY-MM-DD`.
pub fn parse_date_of_birth(
    value: Option<&str>,
) -> Result<Option<chrono::NaiveDate>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ValidationError::DateOfBirthInvalid),
    }
}
