//! Embedded image payloads.
//!
//! Drawings travel as `data:` URIs (`data:image/png;base64,...`) so the
//! stored string can be used directly as an image source.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload errors.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Not a data URI")]
    NotDataUri,
    #[error("Data URI is not base64 encoded")]
    NotBase64,
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("Invalid base64: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Image format of an embedded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Format for a MIME type.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        None
    }
}

/// Wrap encoded image bytes in a data URI.
///
/// The MIME type is sniffed from the bytes and defaults to PNG.
pub fn encode_data_uri(bytes: &[u8]) -> String {
    let format = ImageFormat::from_magic_bytes(bytes).unwrap_or(ImageFormat::Png);
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes))
}

/// Split a data URI into its image format and decoded bytes.
pub fn decode_data_uri(uri: &str) -> Result<(ImageFormat, Vec<u8>), PayloadError> {
    let rest = uri.trim().strip_prefix("data:").ok_or(PayloadError::NotDataUri)?;
    let (header, body) = rest.split_once(',').ok_or(PayloadError::NotDataUri)?;

    let mut parts = header.split(';');
    let mime = parts.next().unwrap_or_default();
    if !parts.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(PayloadError::NotBase64);
    }
    let format =
        ImageFormat::from_mime_type(mime).ok_or_else(|| PayloadError::UnsupportedType(mime.to_string()))?;

    let bytes = STANDARD.decode(body.trim())?;
    Ok((format, bytes))
}
