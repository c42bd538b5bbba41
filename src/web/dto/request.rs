//! Request DTOs for the web API.

use serde::{Deserialize, Deserializer};
use validator::Validate;

use super::validation::{not_empty_trimmed, single_line_text};

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================================================
// Accounts
// ============================================================================

/// Signup request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(custom(function = "not_empty_trimmed"))]
    pub email: String,
    #[validate(custom(function = "not_empty_trimmed"))]
    pub username: String,
    #[validate(length(min = 1, message = "This field may not be blank"))]
    pub password: String,
    /// `YYYY-MM-DD`, optional.
    #[serde(default)]
    pub date_of_birth: Option<String>,
}

/// Signin request.
#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(length(min = 1, message = "This field may not be blank"))]
    pub username: String,
    #[validate(length(min = 1, message = "This field may not be blank"))]
    pub password: String,
}

/// Partial profile update. The password cannot be changed here.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    /// `null` clears the date of birth.
    #[serde(default, deserialize_with = "double_option")]
    pub date_of_birth: Option<Option<String>>,
}

/// Password change request.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "This field may not be blank"))]
    pub old_password: String,
    #[validate(length(min = 1, message = "This field may not be blank"))]
    pub new_password: String,
    #[validate(length(min = 1, message = "This field may not be blank"))]
    pub confirm_password: String,
}

// ============================================================================
// Boards
// ============================================================================

/// Create board request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoardRequest {
    #[validate(
        length(max = 255, message = "Title must be at most 255 characters"),
        custom(function = "single_line_text")
    )]
    pub title: String,
    #[validate(
        length(max = 4, message = "Code must be at most 4 characters"),
        custom(function = "not_empty_trimmed")
    )]
    pub code: String,
}

/// Update board request.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBoardRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 255, message = "Title must be 1-255 characters"),
        custom(function = "single_line_text")
    )]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 4, message = "Code must be 1-4 characters"))]
    pub code: Option<String>,
}

// ============================================================================
// Threads
// ============================================================================

/// Create thread request (JSON form, without an image).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateThreadRequest {
    #[validate(
        length(max = 255, message = "Title must be at most 255 characters"),
        custom(function = "single_line_text")
    )]
    pub title: String,
    #[validate(length(max = 10000, message = "Content must be at most 10000 characters"))]
    #[serde(default)]
    pub content: String,
}

/// Vote request.
#[derive(Debug, Deserialize, Validate)]
pub struct VoteRequest {
    /// `up` or `down`.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub direction: String,
}
