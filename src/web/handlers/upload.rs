//! Multipart form reading.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use std::collections::HashMap;

use crate::media::{MediaError, Upload};
use crate::web::error::ApiError;

/// Form field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

/// A file part read into memory.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn as_upload(&self) -> Upload<'_> {
        Upload::new(&self.file_name, &self.content)
    }

    /// Reject content over `max_size` bytes with 413.
    pub fn check_size(&self, max_size: u64) -> Result<(), ApiError> {
        if self.content.len() as u64 > max_size {
            return Err(MediaError::TooLarge(max_size).into());
        }
        Ok(())
    }
}

/// A fully read multipart form: text fields plus an optional file.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    /// Read every part of the form.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == FILE_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content = field.bytes().await.map_err(multipart_error)?;
                form.file = Some(UploadedFile {
                    file_name,
                    content: content.to_vec(),
                });
            } else if !name.is_empty() {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The uploaded file, or a validation error naming the missing field.
    pub fn require_file(&self) -> Result<&UploadedFile, ApiError> {
        self.file
            .as_ref()
            .ok_or_else(|| ApiError::invalid_field(FILE_FIELD, "No file was submitted"))
    }
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("Upload exceeds the size limit")
    } else {
        ApiError::bad_request(format!("Invalid multipart body: {}", err.body_text()))
    }
}
