//! Thread model for chanboard.

use std::fmt;
use std::str::FromStr;

use crate::{ChanError, Result};

/// Maximum thread title length (in characters).
pub const MAX_TITLE_LENGTH: usize = 255;

/// Maximum thread content length (in characters).
pub const MAX_CONTENT_LENGTH: usize = 10_000;

/// Thread entity, with its current vote tally.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Thread {
    /// Unique thread ID.
    pub id: i64,
    /// ID of the board this thread belongs to.
    pub board_id: i64,
    /// ID of the account that created the thread.
    pub author_id: i64,
    /// Thread title.
    pub title: String,
    /// Free-text body.
    pub content: String,
    /// Image key relative to the media root, if any.
    pub image: Option<String>,
    /// Thread creation timestamp.
    pub created_at: String,
    /// Number of accounts in the upvote set.
    pub upvotes: i64,
    /// Number of accounts in the downvote set.
    pub downvotes: i64,
}

impl Thread {
    /// Upvotes minus downvotes.
    pub fn score(&self) -> i64 {
        self.upvotes - self.downvotes
    }
}

/// Data for creating a new thread.
#[derive(Debug, Clone)]
pub struct NewThread {
    pub board_id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
}

impl NewThread {
    /// Create a new thread with required fields.
    pub fn new(
        board_id: i64,
        author_id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            board_id,
            author_id,
            title: title.into(),
            content: content.into(),
            image: None,
        }
    }

    /// Set the image key.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Direction of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteDirection::Up => "up",
            VoteDirection::Down => "down",
        }
    }

    /// The opposing direction.
    pub fn opposite(&self) -> Self {
        match self {
            VoteDirection::Up => VoteDirection::Down,
            VoteDirection::Down => VoteDirection::Up,
        }
    }

    /// Table holding the voter set for this direction.
    pub(crate) fn table(&self) -> &'static str {
        match self {
            VoteDirection::Up => "thread_upvotes",
            VoteDirection::Down => "thread_downvotes",
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VoteDirection {
    type Err = ChanError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" => Ok(VoteDirection::Up),
            "down" => Ok(VoteDirection::Down),
            _ => Err(ChanError::Validation(format!(
                "vote direction must be \"up\" or \"down\", got {s:?}"
            ))),
        }
    }
}

/// Validate a thread title.
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(ChanError::Validation("thread title cannot be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ChanError::Validation(format!(
            "thread title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate thread content.
pub fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(ChanError::Validation(
            "thread content cannot be empty".to_string(),
        ));
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(ChanError::Validation(format!(
            "thread content must be at most {MAX_CONTENT_LENGTH} characters"
        )));
    }
    Ok(())
}
