//! chanboard - an image board web API
//!
//! Accounts, admin-managed boards, threads with up/down votes and image
//! uploads, served as JSON over HTTP.

pub mod auth;
pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod media;
pub mod web;

pub use auth::{
    authenticate, can_modify_resource, change_password, check_permission, create_account,
    create_admin_account, get_profile, hash_password, set_avatar, update_profile,
    validate_password, verify_password, AccountError, Operation, PasswordError, PermissionError,
    ProfileUpdateRequest, RegistrationRequest, ValidationError,
};
pub use board::{Board, BoardService, Thread, VoteDirection};
pub use config::Config;
pub use db::{Account, AccountRepository, CallerRole, Database};
pub use error::{ChanError, Result};
pub use media::{derive_upload_path, MediaError, MediaStorage, Upload, UploadCategory};
pub use web::WebServer;
