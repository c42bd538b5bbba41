//! Account model for chanboard.
//!
//! This module defines the Account struct and the caller role used by the
//! access policy.

use std::fmt;

use chrono::NaiveDate;

/// Default avatar reference assigned to new accounts.
pub const DEFAULT_AVATAR: &str = "uploads/defaults/default.png";

/// Role of the party making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CallerRole {
    /// No valid credentials were presented.
    Anonymous,
    /// A signed-in, active account.
    Authenticated,
    /// A signed-in account with the admin flag.
    Admin,
}

impl CallerRole {
    /// Convert role to its string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallerRole::Anonymous => "anonymous",
            CallerRole::Authenticated => "authenticated",
            CallerRole::Admin => "admin",
        }
    }

    /// Resolve the role of an optional caller.
    ///
    /// Inactive accounts are treated as anonymous.
    pub fn of(account: Option<&Account>) -> Self {
        match account {
            Some(account) if account.is_active => account.role(),
            _ => CallerRole::Anonymous,
        }
    }
}

impl fmt::Display for CallerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account entity representing a registered user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID.
    pub id: i64,
    /// Email address, stored lowercase.
    pub email: String,
    /// Login username (unique, case-insensitive).
    pub username: String,
    /// Password hash (Argon2 PHC string).
    pub password: String,
    /// Date of birth (optional).
    pub date_of_birth: Option<NaiveDate>,
    /// Avatar key relative to the media root.
    pub avatar: String,
    /// Whether the account may sign in.
    pub is_active: bool,
    /// Staff flag; grants board management.
    pub is_staff: bool,
    /// Superuser flag.
    pub is_admin: bool,
    /// Account creation timestamp.
    pub created_at: String,
}

impl Account {
    /// Role this account acts with when active.
    ///
    /// Board management is keyed off the staff flag alone.
    pub fn role(&self) -> CallerRole {
        if self.is_staff {
            CallerRole::Admin
        } else {
            CallerRole::Authenticated
        }
    }
}

/// Data for creating a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Email address (already normalized).
    pub email: String,
    /// Login username.
    pub username: String,
    /// Password hash (should be pre-hashed with Argon2).
    pub password: String,
    pub date_of_birth: Option<NaiveDate>,
    pub is_staff: bool,
    pub is_admin: bool,
}

impl NewAccount {
    /// Create a regular account with the required fields.
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            password: password.into(),
            date_of_birth: None,
            is_staff: false,
            is_admin: false,
        }
    }

    /// Set the date of birth.
    pub fn with_date_of_birth(mut self, date_of_birth: Option<NaiveDate>) -> Self {
        self.date_of_birth = date_of_birth;
        self
    }

    /// Mark the account as staff and admin.
    pub fn as_admin(mut self) -> Self {
        self.is_staff = true;
        self.is_admin = true;
        self
    }
}

/// Data for updating an existing account.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub email: Option<String>,
    pub username: Option<String>,
    /// New password hash.
    pub password: Option<String>,
    /// `Some(None)` clears the date of birth.
    pub date_of_birth: Option<Option<NaiveDate>>,
    /// New avatar key.
    pub avatar: Option<String>,
    pub is_active: Option<bool>,
}

impl AccountUpdate {
    /// Create an empty update.
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

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn date_of_birth(mut self, date_of_birth: Option<NaiveDate>) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.date_of_birth.is_none()
            && self.avatar.is_none()
            && self.is_active.is_none()
    }
}
