//! API handlers.

pub mod account;
pub mod auth;
pub mod board;
pub mod thread;
pub mod upload;

pub use account::*;
pub use auth::*;
pub use board::*;
pub use thread::*;
