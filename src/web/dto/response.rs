//! Response DTOs for the web API.

use chrono::NaiveDate;
use serde::Serialize;

use crate::board::{Board, Thread, VoteDirection};
use crate::db::Account;

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Public URL of a stored media key.
pub fn media_url(url_prefix: &str, key: &str) -> String {
    format!("{}/{}", url_prefix.trim_end_matches('/'), key)
}

// ============================================================================
// Accounts
// ============================================================================

/// Account as returned to its owner. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub date_of_birth: Option<NaiveDate>,
    /// Avatar key relative to the media root.
    pub avatar: String,
    pub avatar_url: String,
    pub is_staff: bool,
    pub is_admin: bool,
    pub created_at: String,
}

impl AccountResponse {
    pub fn from_account(account: Account, url_prefix: &str) -> Self {
        Self {
            avatar_url: media_url(url_prefix, &account.avatar),
            id: account.id,
            email: account.email,
            username: account.username,
            date_of_birth: account.date_of_birth,
            avatar: account.avatar,
            is_staff: account.is_staff,
            is_admin: account.is_admin,
            created_at: account.created_at,
        }
    }
}

/// Signin response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Bearer token (JWT).
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Boards
// ============================================================================

/// Board response.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub id: i64,
    pub title: String,
    pub code: String,
}

impl From<Board> for BoardResponse {
    fn from(board: Board) -> Self {
        Self {
            id: board.id,
            title: board.title,
            code: board.code,
        }
    }
}

// ============================================================================
// Threads
// ============================================================================

/// Thread response with vote tallies.
#[derive(Debug, Serialize)]
pub struct ThreadResponse {
    pub id: i64,
    pub board_id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub upvotes: i64,
    pub downvotes: i64,
    pub score: i64,
    /// The caller's own vote, if signed in and voted.
    pub my_vote: Option<&'static str>,
    pub created_at: String,
}

impl ThreadResponse {
    pub fn from_thread(thread: Thread, my_vote: Option<VoteDirection>, url_prefix: &str) -> Self {
        Self {
            score: thread.score(),
            image_url: thread.image.as_deref().map(|key| media_url(url_prefix, key)),
            id: thread.id,
            board_id: thread.board_id,
            author_id: thread.author_id,
            title: thread.title,
            content: thread.content,
            image: thread.image,
            upvotes: thread.upvotes,
            downvotes: thread.downvotes,
            my_vote: my_vote.map(|d| d.as_str()),
            created_at: thread.created_at,
        }
    }
}
