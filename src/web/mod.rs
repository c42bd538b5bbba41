//! Web API module for chanboard.
//!
//! JSON API over axum: accounts, boards, threads and votes, plus static
//! serving of uploaded media.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_router, RouterOptions};
pub use server::WebServer;
