//! File selection and validation.
//!
//! A candidate file must pass the media-type allow-list and the size ceiling
//! before it is eligible for analysis. Rejections are surfaced inline at the
//! upload control and never reach the analyzer.

use bytes::Bytes;

use crate::types::ValidationError;

/// Media types accepted for analysis.
pub const ALLOWED_TYPES: [&str; 4] = [
    "image/jpeg",
    "image/png",
    "image/webp",
    "application/pdf",
];

/// Upload ceiling: 5 MiB.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// A file that has passed type and size checks and may be submitted for
/// analysis. Exists only within one analysis attempt; nothing is persisted.
#[derive(Debug, Clone)]
pub struct ValidatedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ValidatedFile {
    /// Validate a candidate file.
    ///
    /// When the declared media type is empty (some user agents omit it), the
    /// type is inferred from the file name before rejecting.
    pub fn select(
        name: &str,
        declared_type: &str,
        bytes: Bytes,
    ) -> Result<ValidatedFile, ValidationError> {
        let content_type = if declared_type.is_empty() {
            mime_guess::from_path(name)
                .first_raw()
                .unwrap_or_default()
                .to_string()
        } else {
            declared_type.to_string()
        };

        if !ALLOWED_TYPES.contains(&content_type.as_str()) {
            return Err(ValidationError::UnsupportedType);
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ValidationError::TooLarge);
        }

        Ok(ValidatedFile {
            name: name.to_string(),
            content_type,
            bytes,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
