//! Local-disk media storage.

use std::io;
use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use super::path::{derive_upload_path, extract_extension, UploadCategory, UPLOAD_PREFIX};
use super::MediaError;
use crate::db::DEFAULT_AVATAR;

/// Stores uploaded files beneath a media root.
///
/// ```text
/// {root}/
/// └── uploads/
///     ├── avatar/{uuid}.{ext}
///     ├── thread/{uuid}.{ext}
///     └── defaults/default.png
/// ```
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    max_size: u64,
}

impl MediaStorage {
    /// Create a storage rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>, max_size: u64) -> Result<Self, MediaError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root, max_size })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maximum accepted upload size in bytes.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Validate and store an image, returning its key.
    ///
    /// The file name only contributes its extension, which must map to an
    /// `image/*` MIME type.
    pub async fn save_image(
        &self,
        category: UploadCategory,
        original_name: &str,
        content: &[u8],
    ) -> Result<String, MediaError> {
        if content.is_empty() {
            return Err(MediaError::Empty);
        }
        if content.len() as u64 > self.max_size {
            return Err(MediaError::TooLarge(self.max_size));
        }

        let ext = extract_extension(original_name)?;
        let mime = mime_guess::from_ext(&ext).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(MediaError::NotAnImage(mime.essence_str().to_string()));
        }

        let key = derive_upload_path(category, original_name)?;
        let path = self.resolve(&key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, content).await?;

        debug!(key = %key, size = content.len(), "Stored upload");
        Ok(key)
    }

    /// Delete a stored file.
    ///
    /// Returns `false` if the file did not exist. The shared default avatar is
    /// never removed.
    pub async fn delete(&self, key: &str) -> Result<bool, MediaError> {
        if key == DEFAULT_AVATAR {
            return Ok(false);
        }
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a replaced file, logging instead of failing.
    pub async fn discard(&self, key: &str) {
        if let Err(e) = self.delete(key).await {
            warn!(key = %key, error = %e, "Failed to remove replaced upload");
        }
    }

    /// Check whether a key refers to an existing file.
    pub async fn exists(&self, key: &str) -> bool {
        match self.resolve(key) {
            Ok(path) => fs::try_exists(path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Map a key to a path under the media root.
    ///
    /// Keys must live under `uploads/` and contain only normal components.
    pub fn resolve(&self, key: &str) -> Result<PathBuf, MediaError> {
        let relative = Path::new(key);
        let mut components = relative.components();

        if components.next() != Some(Component::Normal(UPLOAD_PREFIX.as_ref())) {
            return Err(MediaError::InvalidKey(key.to_string()));
        }
        if !components.all(|c| matches!(c, Component::Normal(_))) {
            return Err(MediaError::InvalidKey(key.to_string()));
        }

        Ok(self.root.join(relative))
    }
}
