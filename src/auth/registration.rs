//! Account creation.

use chrono::NaiveDate;
use tracing::info;

use super::error::AccountError;
use super::password::hash_password;
use super::validation::{normalize_email, validate_email, validate_username};
use crate::db::{Account, AccountRepository, NewAccount};

/// Data needed to create an account.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub email: String,
    pub username: String,
    /// Plain-text password, hashed before it is stored.
    pub password: String,
    pub date_of_birth: Option<NaiveDate>,
}

impl RegistrationRequest {
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
        }
    }

    /// Set the date of birth.
    pub fn with_date_of_birth(mut self, date_of_birth: NaiveDate) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }
}

/// Create a regular account.
///
/// 1. Validates email, username and password
/// 2. Normalizes the email to lowercase
/// 3. Rejects a taken username or email
/// 4. Hashes the password and stores the account
///
/// No record is created when any step fails.
pub async fn create_account(
    repo: &AccountRepository<'_>,
    request: RegistrationRequest,
) -> Result<Account, AccountError> {
    let new_account = prepare(repo, &request).await?;
    let account = repo.create(&new_account).await?;

    info!(
        username = %account.username,
        account_id = account.id,
        "New account registered"
    );

    Ok(account)
}

/// Create an account with the staff and admin flags set.
pub async fn create_admin_account(
    repo: &AccountRepository<'_>,
    request: RegistrationRequest,
) -> Result<Account, AccountError> {
    let new_account = prepare(repo, &request).await?.as_admin();
    let account = repo.create(&new_account).await?;

    info!(
        username = %account.username,
        account_id = account.id,
        "New admin account registered"
    );

    Ok(account)
}

async fn prepare(
    repo: &AccountRepository<'_>,
    request: &RegistrationRequest,
) -> Result<NewAccount, AccountError> {
    let email = normalize_email(&request.email);
    validate_email(&email)?;
    let username = request.username.trim();
    validate_username(username)?;

    if repo.username_exists(username).await? {
        return Err(AccountError::UsernameExists);
    }
    if repo.email_exists(&email).await? {
        return Err(AccountError::EmailExists);
    }

    let password_hash = hash_password(&request.password)?;

    Ok(NewAccount::new(email, username, password_hash).with_date_of_birth(request.date_of_birth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::{verify_password, PasswordError};
    use crate::auth::validation::ValidationError;
    use crate::db::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_account_success() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());

        let account = create_account(
            &repo,
            RegistrationRequest::new("test@londonappdev.com", "tester", "testpass"),
        )
        .await
        .unwrap();

        assert_eq!(account.email, "test@londonappdev.com");
        assert_eq!(account.username, "tester");
        assert!(!account.is_admin);
        assert!(!account.is_staff);
        assert!(account.is_active);
    }

    #[tokio::test]
    async fn test_email_is_normalized() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());

        let account = create_account(
            &repo,
            RegistrationRequest::new("Test@LONDONAPPDEV.COM", "tester", "testpass"),
        )
        .await
        .unwrap();

        assert_eq!(account.email, "test@londonappdev.com");
    }

    #[tokio::test]
    async fn test_password_is_hashed() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());

        let account = create_account(
            &repo,
            RegistrationRequest::new("a@example.com", "alice", "testpass"),
        )
        .await
        .unwrap();

        assert_ne!(account.password, "testpass");
        assert!(verify_password("testpass", &account.password).is_ok());
    }

    #[tokio::test]
    async fn test_empty_email_or_username_creates_nothing() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());

        let result =
            create_account(&repo, RegistrationRequest::new("", "alice", "testpass")).await;
        assert!(matches!(
            result,
            Err(AccountError::Validation(ValidationError::EmailEmpty))
        ));

        let result = create_account(
            &repo,
            RegistrationRequest::new("a@example.com", "", "testpass"),
        )
        .await;
        assert!(matches!(
            result,
            Err(AccountError::Validation(ValidationError::UsernameEmpty))
        ));

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());

        let result =
            create_account(&repo, RegistrationRequest::new("a@example.com", "alice", "pw")).await;

        assert!(matches!(
            result,
            Err(AccountError::Password(PasswordError::TooShort))
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());
        create_account(
            &repo,
            RegistrationRequest::new("a@example.com", "alice", "testpass"),
        )
        .await
        .unwrap();

        let dup_name = create_account(
            &repo,
            RegistrationRequest::new("b@example.com", "alice", "testpass"),
        )
        .await;
        assert!(matches!(dup_name, Err(AccountError::UsernameExists)));

        let dup_email = create_account(
            &repo,
            RegistrationRequest::new("A@EXAMPLE.com", "bob", "testpass"),
        )
        .await;
        assert!(matches!(dup_email, Err(AccountError::EmailExists)));

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_admin_account() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());

        let admin = create_admin_account(
            &repo,
            RegistrationRequest::new("admin@example.com", "admin", "adminpass"),
        )
        .await
        .unwrap();

        assert!(admin.is_admin);
        assert!(admin.is_staff);
    }

    #[tokio::test]
    async fn test_date_of_birth_is_stored() {
        let db = setup_db().await;
        let repo = AccountRepository::new(db.pool());
        let dob = NaiveDate::from_ymd_opt(1992, 7, 14).unwrap();

        let account = create_account(
            &repo,
            RegistrationRequest::new("a@example.com", "alice", "testpass").with_date_of_birth(dob),
        )
        .await
        .unwrap();

        assert_eq!(account.date_of_birth, Some(dob));
    }
}
