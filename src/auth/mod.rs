//! Authentication module for chanboard.
//!
//! Password hashing, account creation, sign-in, profile management and the
//! access policy.

mod credentials;
mod error;
mod password;
pub mod permission;
mod profile;
mod registration;
pub mod validation;

pub use credentials::{authenticate, change_password};
pub use error::AccountError;
pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use permission::{
    can_modify_resource, check_permission, is_allowed, Operation, PermissionError,
};
pub use profile::{get_profile, set_avatar, update_profile, ProfileUpdateRequest};
pub use registration::{create_account, create_admin_account, RegistrationRequest};
pub use validation::{normalize_email, ValidationError};
