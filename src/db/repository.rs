//! Account repository for chanboard.
//!
//! This module provides CRUD operations for accounts in the database.

use sqlx::{QueryBuilder, SqlitePool};

use super::account::{Account, AccountUpdate, NewAccount};
use crate::error::is_unique_violation;
use crate::{ChanError, Result};

const ACCOUNT_COLUMNS: &str = "id, email, username, password, date_of_birth, avatar, \
                               is_active, is_staff, is_admin, created_at";

fn map_write_error(e: sqlx::Error) -> ChanError {
    if is_unique_violation(&e) {
        ChanError::Validation("email or username already exists".to_string())
    } else {
        ChanError::Database(e.to_string())
    }
}

/// Repository for account CRUD operations.
pub struct AccountRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new AccountRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new account.
    ///
    /// A UNIQUE violation on email or username becomes a validation error.
    pub async fn create(&self, new_account: &NewAccount) -> Result<Account> {
        let result = sqlx::query(
            "INSERT INTO users (email, username, password, date_of_birth, is_staff, is_admin)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&new_account.email)
        .bind(&new_account.username)
        .bind(&new_account.password)
        .bind(new_account.date_of_birth)
        .bind(new_account.is_staff)
        .bind(new_account.is_admin)
        .execute(self.pool)
        .await
        .map_err(map_write_error)?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| ChanError::NotFound("account".to_string()))
    }

    /// Get an account by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = ?");
        let result = sqlx::query_as::<_, Account>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Get an account by username (exact match).
    pub async fn get_by_username(&self, username: &str) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE username = ?");
        let result = sqlx::query_as::<_, Account>(&sql)
            .bind(username)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Get an account by email (case-insensitive).
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE email = ? COLLATE NOCASE");
        let result = sqlx::query_as::<_, Account>(&sql)
            .bind(email)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Update an account by ID.
    ///
    /// Only fields that are set in the update will be modified.
    /// Returns the updated account, or None if not found.
    pub async fn update(&self, id: i64, update: &AccountUpdate) -> Result<Option<Account>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE users SET ");
        let mut separated = query.separated(", ");

        if let Some(ref email) = update.email {
            separated.push("email = ");
            separated.push_bind_unseparated(email.clone());
        }
        if let Some(ref username) = update.username {
            separated.push("username = ");
            separated.push_bind_unseparated(username.clone());
        }
        if let Some(ref password) = update.password {
            separated.push("password = ");
            separated.push_bind_unseparated(password.clone());
        }
        if let Some(date_of_birth) = update.date_of_birth {
            separated.push("date_of_birth = ");
            separated.push_bind_unseparated(date_of_birth);
        }
        if let Some(ref avatar) = update.avatar {
            separated.push("avatar = ");
            separated.push_bind_unseparated(avatar.clone());
        }
        if let Some(is_active) = update.is_active {
            separated.push("is_active = ");
            separated.push_bind_unseparated(is_active);
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

    /// Delete an account by ID.
    ///
    /// Boards, threads and votes owned by the account are removed with it.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all accounts.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(count)
    }

    /// Check whether a username is taken (exact match).
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
                .bind(username)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(exists)
    }

    /// Check whether an email is taken (case-insensitive).
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ? COLLATE NOCASE)")
                .bind(email)
                .fetch_one(self.pool)
                .await
                .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(exists)
    }
}
