//! Board model for chanboard.

use crate::{ChanError, Result};

/// Maximum board code length (in characters).
pub const MAX_CODE_LENGTH: usize = 4;

/// Maximum board title length (in characters).
pub const MAX_BOARD_TITLE_LENGTH: usize = 255;

/// Board entity: an admin-managed namespace for threads.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Board {
    /// Unique board ID.
    pub id: i64,
    /// Board title (unique).
    pub title: String,
    /// Short code such as `pl` (unique).
    pub code: String,
    /// Admin who created the board.
    pub creator_id: i64,
    /// Board creation timestamp.
    pub created_at: String,
}

/// Data for creating a new board.
#[derive(Debug, Clone)]
pub struct NewBoard {
    pub title: String,
    pub code: String,
    pub creator_id: i64,
}

impl NewBoard {
    pub fn new(title: impl Into<String>, code: impl Into<String>, creator_id: i64) -> Self {
        Self {
            title: title.into(),
            code: code.into(),
            creator_id,
        }
    }
}

/// Data for updating an existing board.
#[derive(Debug, Clone, Default)]
pub struct BoardUpdate {
    pub title: Option<String>,
    pub code: Option<String>,
}

impl BoardUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.code.is_none()
    }
}

/// Validate a board title.
pub fn validate_board_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(ChanError::Validation("board title cannot be empty".to_string()));
    }
    if title.chars().count() > MAX_BOARD_TITLE_LENGTH {
        return Err(ChanError::Validation(format!(
            "board title must be at most {MAX_BOARD_TITLE_LENGTH} characters"
        )));
    }
    if title.chars().any(char::is_control) {
        return Err(ChanError::Validation(
            "board title must be a single line".to_string(),
        ));
    }
    Ok(())
}

/// Validate a board code.
pub fn validate_board_code(code: &str) -> Result<()> {
    if code.trim().is_empty() {
        return Err(ChanError::Validation("board code cannot be empty".to_string()));
    }
    if code.chars().count() > MAX_CODE_LENGTH {
        return Err(ChanError::Validation(format!(
            "board code must be at most {MAX_CODE_LENGTH} characters"
        )));
    }
    if code.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ChanError::Validation(
            "board code cannot contain whitespace".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board() {
        let board = NewBoard::new("Technology", "g", 1);
        assert_eq!(board.title, "Technology");
        assert_eq!(board.code, "g");
        assert_eq!(board.creator_id, 1);
    }

    #[test]
    fn test_board_update_builder() {
        assert!(BoardUpdate::new().is_empty());

        let update = BoardUpdate::new().title("new board");
        assert!(!update.is_empty());
        assert_eq!(update.title.as_deref(), Some("new board"));
        assert!(update.code.is_none());
    }

    #[test]
    fn test_validate_board_title() {
        assert!(validate_board_title("Test Board").is_ok());
        assert!(validate_board_title("").is_err());
        assert!(validate_board_title("  ").is_err());
        assert!(validate_board_title(&"t".repeat(256)).is_err());
        assert!(validate_board_title("two\nlines").is_err());
        assert!(validate_board_title("tab\there").is_err());
    }

    #[test]
    fn test_validate_board_code() {
        assert!(validate_board_code("tb").is_ok());
        assert!(validate_board_code("biz1").is_ok());
        assert!(validate_board_code("").is_err());
        assert!(validate_board_code("toolong").is_err());
        assert!(validate_board_code("a b").is_err());
    }
}
