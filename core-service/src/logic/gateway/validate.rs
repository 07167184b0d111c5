//! Input checks performed before any request leaves the process

use crate::logic::error::{SignalError, SignalResult};
use super::types::ImageUpload;

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

const MAX_EQUIPMENT_ID_LEN: usize = 128;

/// Image formats the defect service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Identify the format from the file signature; the declared type is not trusted
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(PNG_SIGNATURE) {
            Some(Self::Png)
        } else if data.starts_with(JPEG_SIGNATURE) {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// Reject empty, oversized or unrecognized images
pub fn validate_image(image: &ImageUpload, max_bytes: usize) -> SignalResult<ImageFormat> {
    if image.is_empty() {
        return Err(SignalError::validation("image is empty"));
    }

    if image.len() > max_bytes {
        return Err(SignalError::validation(format!(
            "image is {} bytes, limit is {}",
            image.len(),
            max_bytes
        )));
    }

    ImageFormat::sniff(image.data()).ok_or_else(|| {
        SignalError::validation("unreadable image: only JPEG and PNG are accepted")
    })
}

/// Trim and check an equipment identifier
pub fn validate_equipment_id(raw: &str) -> SignalResult<&str> {
    let id = raw.trim();

    if id.is_empty() {
        return Err(SignalError::validation("equipment id is empty"));
    }
    if id.len() > MAX_EQUIPMENT_ID_LEN {
        return Err(SignalError::validation("equipment id is too long"));
    }
    if id.chars().any(char::is_control) {
        return Err(SignalError::validation("equipment id contains control characters"));
    }

    Ok(id)
}
