//! Thread repository for chanboard.
//!
//! CRUD for threads plus maintenance of the upvote and downvote sets.

use sqlx::SqlitePool;

use super::thread::{NewThread, Thread, VoteDirection};
use crate::error::is_foreign_key_violation;
use crate::{ChanError, Result};

/// Map a write error, reporting a vanished parent row as `NotFound`.
fn map_write_error(e: sqlx::Error, parent: &str) -> ChanError {
    if is_foreign_key_violation(&e) {
        ChanError::NotFound(parent.to_string())
    } else {
        ChanError::Database(e.to_string())
    }
}

const THREAD_SELECT: &str = "SELECT t.id, t.board_id, t.author_id, t.title, t.content, t.image, t.created_at,
        (SELECT COUNT(*) FROM thread_upvotes u WHERE u.thread_id = t.id) AS upvotes,
        (SELECT COUNT(*) FROM thread_downvotes d WHERE d.thread_id = t.id) AS downvotes
 FROM threads t";

/// Repository for thread CRUD and voting.
pub struct ThreadRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ThreadRepository<'a> {
    /// Create a new ThreadRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new thread.
    pub async fn create(&self, new_thread: &NewThread) -> Result<Thread> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO threads (board_id, author_id, title, content, image)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(new_thread.board_id)
        .bind(new_thread.author_id)
        .bind(&new_thread.title)
        .bind(&new_thread.content)
        .bind(&new_thread.image)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_write_error(e, "board"))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ChanError::NotFound("thread".to_string()))
    }

    /// Get a thread by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Thread>> {
        let sql = format!("{THREAD_SELECT} WHERE t.id = ?");
        let result = sqlx::query_as::<_, Thread>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(result)
    }

    /// List threads in a board, newest first.
    pub async fn list_by_board(&self, board_id: i64) -> Result<Vec<Thread>> {
        let sql = format!("{THREAD_SELECT} WHERE t.board_id = ? ORDER BY t.id DESC");
        let threads = sqlx::query_as::<_, Thread>(&sql)
            .bind(board_id)
            .fetch_all(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(threads)
    }

    /// Set or replace a thread's image key.
    ///
    /// Returns the updated thread, or None if not found.
    pub async fn set_image(&self, id: i64, image: &str) -> Result<Option<Thread>> {
        let result = sqlx::query("UPDATE threads SET image = ? WHERE id = ?")
            .bind(image)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    /// Record a vote.
    ///
    /// The account is added to the `direction` set and removed from the
    /// opposite one in a single transaction. Repeating a vote is a no-op.
    pub async fn vote(&self, thread_id: i64, account_id: i64, direction: VoteDirection) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let delete = format!(
            "DELETE FROM {} WHERE thread_id = ? AND user_id = ?",
            direction.opposite().table()
        );
        sqlx::query(&delete)
            .bind(thread_id)
            .bind(account_id)
            .execute(&mut *tx)
            .await?;

        let insert = format!(
            "INSERT OR IGNORE INTO {} (thread_id, user_id) VALUES (?, ?)",
            direction.table()
        );
        sqlx::query(&insert)
            .bind(thread_id)
            .bind(account_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, "thread"))?;

        tx.commit().await?;
        Ok(())
    }

    /// Remove an account from both vote sets.
    ///
    /// Returns true if a vote was removed.
    pub async fn clear_vote(&self, thread_id: i64, account_id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let mut removed = 0;

        for direction in [VoteDirection::Up, VoteDirection::Down] {
            let sql = format!(
                "DELETE FROM {} WHERE thread_id = ? AND user_id = ?",
                direction.table()
            );
            removed += sqlx::query(&sql)
                .bind(thread_id)
                .bind(account_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;
        Ok(removed > 0)
    }

    /// The account's current vote on a thread, if any.
    pub async fn vote_of(&self, thread_id: i64, account_id: i64) -> Result<Option<VoteDirection>> {
        for direction in [VoteDirection::Up, VoteDirection::Down] {
            let sql = format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE thread_id = ? AND user_id = ?)",
                direction.table()
            );
            let exists: bool = sqlx::query_scalar(&sql)
                .bind(thread_id)
                .bind(account_id)
                .fetch_one(self.pool)
                .await?;
            if exists {
                return Ok(Some(direction));
            }
        }
        Ok(None)
    }
}
