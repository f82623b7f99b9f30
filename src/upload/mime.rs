//! MIME type detection for files opened from disk.
//!
//! Content wins over the extension: a `.jpg` that is really a PNG is sent
//! as `image/png`. Anything unrecognized becomes `application/octet-stream`
//! and is rejected by the encoder.

use image::ImageFormat;
use std::path::Path;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Work out the MIME type of `bytes`, using `path` only as a hint.
pub fn detect_mime_type(path: &Path, bytes: &[u8]) -> String {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type().to_string();
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    // Phone cameras produce HEIC, which the image crate doesn't know.
    match ext.as_str() {
        "heic" => return "image/heic".to_string(),
        "heif" => return "image/heif".to_string(),
        _ => {}
    }

    ImageFormat::from_extension(&ext)
        .map(|f| f.to_mime_type().to_string())
        .unwrap_or_else(|| FALLBACK_MIME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_beats_extension() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];
        assert_eq!(detect_mime_type(Path::new("leaf.png"), &jpeg), "image/jpeg");
    }

    #[test]
    fn extension_used_when_content_unknown() {
        assert_eq!(detect_mime_type(Path::new("leaf.webp"), b"??"), "image/webp");
        assert_eq!(detect_mime_type(Path::new("IMG_0001.HEIC"), b"??"), "image/heic");
    }

    #[test]
    fn unknown_file_is_octet_stream() {
        assert_eq!(
            detect_mime_type(Path::new("report.txt"), b"hello"),
            "application/octet-stream"
        );
    }
}
