//! Board module for chanboard.
//!
//! Admin-managed boards, the threads posted in them, and thread voting.

mod repository;
mod service;
mod thread;
mod thread_repository;
mod types;

pub use repository::BoardRepository;
pub use service::BoardService;
pub use thread::{NewThread, Thread, VoteDirection, MAX_CONTENT_LENGTH, MAX_TITLE_LENGTH};
pub use thread_repository::ThreadRepository;
pub use types::{Board, BoardUpdate, NewBoard, MAX_BOARD_TITLE_LENGTH, MAX_CODE_LENGTH};
