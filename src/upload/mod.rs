//! Upload domain: turns a user-selected image into a request payload.
//!
//! Validation is shallow: the MIME type must be `image/*` and
//! the file must fit in 10 MiB. Nothing is decoded or resized here; the
//! bytes go to the model exactly as the user picked them.

mod mime;

use crate::error::ValidationError;
use base64::Engine;
use std::path::Path;

pub use mime::detect_mime_type;

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// A file-like object as handed over by the file picker or a drop.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk and work out its MIME type.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ValidationError::Unreadable(format!("{}: {}", path.display(), e)))?;
        let mime_type = detect_mime_type(path, &bytes);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        log::info!(
            "[UPLOAD] Read {} ({} bytes, {})",
            name,
            bytes.len(),
            mime_type
        );
        Ok(Self::new(name, mime_type, bytes))
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Base64 payload ready for the classify request, plus a displayable preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub base64: String,
    pub mime_type: String,
    pub preview_data_url: String,
}

/// Validate and encode a selected file.
pub fn encode(file: &ImageFile) -> Result<EncodedImage, ValidationError> {
    if !file.mime_type.starts_with("image/") {
        log::warn!("[UPLOAD] Rejected {}: type {}", file.name, file.mime_type);
        return Err(ValidationError::UnsupportedType {
            mime_type: file.mime_type.clone(),
        });
    }

    let size_bytes = file.size_bytes();
    if size_bytes > MAX_UPLOAD_BYTES {
        log::warn!("[UPLOAD] Rejected {}: {} bytes", file.name, size_bytes);
        return Err(ValidationError::TooLarge {
            size_bytes,
            limit_bytes: MAX_UPLOAD_BYTES,
        });
    }

    let base64 = base64::engine::general_purpose::STANDARD.encode(&file.bytes);
    let preview_data_url = format!("data:{};base64,{}", file.mime_type, base64);

    Ok(EncodedImage {
        base64,
        mime_type: file.mime_type.clone(),
        preview_data_url,
    })
}
