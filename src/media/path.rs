//! Upload key derivation.
//!
//! Uploaded files are stored under `uploads/{category}/{uuid}.{ext}`,
//! relative to the media root. The UUID is version 4, drawn from the OS
//! random source, so keys are unique without a collision check.

use std::fmt;
use std::path::Path;

use uuid::Uuid;

use super::MediaError;

/// Prefix shared by every upload key.
pub const UPLOAD_PREFIX: &str = "uploads";

/// Maximum accepted extension length.
const MAX_EXTENSION_LENGTH: usize = 16;

/// Kind of upload, which selects the directory it is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadCategory {
    /// Account avatar image.
    Avatar,
    /// Image attached to a thread.
    Thread,
}

impl UploadCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadCategory::Avatar => "avatar",
            UploadCategory::Thread => "thread",
        }
    }
}

impl fmt::Display for UploadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Extract the extension of an uploaded file name.
///
/// Any directory components sent by the client are ignored. The extension is
/// the text after the last `.`; a name without a dot is used whole.
pub fn extract_extension(original_name: &str) -> Result<String, MediaError> {
    // Clients may send Windows-style paths.
    let normalized = original_name.replace('\\', "/");
    let file_name = Path::new(&normalized)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(MediaError::MissingFileName)?;

    let ext = file_name.rsplit('.').next().unwrap_or(file_name);

    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LENGTH
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(MediaError::InvalidExtension(ext.to_string()));
    }

    Ok(ext.to_string())
}

/// Derive a fresh storage key for an upload.
///
/// # Examples
///
/// ```
/// use chanboard::media::{derive_upload_path, UploadCategory};
///
/// let key = derive_upload_path(UploadCategory::Avatar, "x.jpg").unwrap();
/// assert!(key.starts_with("uploads/avatar/"));
/// assert!(key.ends_with(".jpg"));
/// ```
pub fn derive_upload_path(
    category: UploadCategory,
    original_name: &str,
) -> Result<String, MediaError> {
    let ext = extract_extension(original_name)?;
    Ok(format!(
        "{UPLOAD_PREFIX}/{}/{}.{ext}",
        category.as_str(),
        Uuid::new_v4()
    ))
}
