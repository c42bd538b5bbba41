//! Board repository for chanboard.
//!
//! This module provides CRUD operations for boards in the database.

use sqlx::{QueryBuilder, SqlitePool};

use super::types::{Board, BoardUpdate, NewBoard};
use crate::error::is_unique_violation;
use crate::{ChanError, Result};

fn map_write_error(e: sqlx::Error) -> ChanError {
    if is_unique_violation(&e) {
        ChanError::Validation("a board with this title or code already exists".to_string())
    } else {
        ChanError::Database(e.to_string())
    }
}

/// Repository for board CRUD operations.
pub struct BoardRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BoardRepository<'a> {
    /// Create a new BoardRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new board in the database.
    pub async fn create(&self, new_board: &NewBoard) -> Result<Board> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO boards (title, code, creator_id) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&new_board.title)
        .bind(&new_board.code)
        .bind(new_board.creator_id)
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ChanError::NotFound("board".to_string()))
    }

    /// Get a board by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Board>> {
        let result = sqlx::query_as::<_, Board>(
            "SELECT id, title, code, creator_id, created_at FROM boards WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Update a board by ID.
    ///
    /// Returns the updated board, or None if not found.
    pub async fn update(&self, id: i64, update: &BoardUpdate) -> Result<Option<Board>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE boards SET ");
        let mut separated = query.separated(", ");

        if let Some(ref title) = update.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title.clone());
        }
        if let Some(ref code) = update.code {
            separated.push("code = ");
            separated.push_bind_unseparated(code.clone());
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete a board by ID, along with its threads.
    ///
    /// Returns true if a board was deleted.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM boards WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// List all boards, oldest first.
    pub async fn list(&self) -> Result<Vec<Board>> {
        let boards = sqlx::query_as::<_, Board>(
            "SELECT id, title, code, creator_id, created_at FROM boards ORDER BY id",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(boards)
    }

    /// Check whether a title is used by a board other than `exclude_id`.
    pub async fn title_exists(&self, title: &str, exclude_id: Option<i64>) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM boards WHERE title = ? AND id != COALESCE(?, -1))",
        )
        .bind(title)
        .bind(exclude_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(exists)
    }

    /// Check whether a code is used by a board other than `exclude_id`.
    pub async fn code_exists(&self, code: &str, exclude_id: Option<i64>) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM boards WHERE code = ? AND id != COALESCE(?, -1))",
        )
        .bind(code)
        .bind(exclude_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(exists)
    }
}
