//! Media module for chanboard.
//!
//! Upload key derivation and local-disk storage for avatar and thread images.

mod path;
mod storage;

pub use path::{derive_upload_path, extract_extension, UploadCategory, UPLOAD_PREFIX};
pub use storage::MediaStorage;

use thiserror::Error;

/// An uploaded file as received from a client.
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    /// Client-supplied file name. Only its extension is used.
    pub file_name: &'a str,
    pub content: &'a [u8],
}

impl<'a> Upload<'a> {
    pub fn new(file_name: &'a str, content: &'a [u8]) -> Self {
        Self { file_name, content }
    }
}

/// Media-related errors.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("uploaded file has no name")]
    MissingFileName,

    #[error("invalid file extension: {0:?}")]
    InvalidExtension(String),

    /// The extension does not map to an image type.
    #[error("only image uploads are accepted (got {0})")]
    NotAnImage(String),

    #[error("uploaded file is empty")]
    Empty,

    #[error("uploaded file exceeds {0} bytes")]
    TooLarge(u64),

    /// A key that does not resolve under the media root.
    #[error("invalid media key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Whether the error was caused by the uploaded content itself.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, MediaError::Io(_) | MediaError::InvalidKey(_))
    }
}

impl From<MediaError> for crate::ChanError {
    fn from(e: MediaError) -> Self {
        match e {
            MediaError::Io(io) => crate::ChanError::Io(io),
            e if e.is_client_error() => crate::ChanError::Validation(e.to_string()),
            e => crate::ChanError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                e.to_string(),
            )),
        }
    }
}
