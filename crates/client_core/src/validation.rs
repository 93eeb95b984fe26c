use thiserror::Error;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_ALLOWED_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Limits applied to every candidate image before it becomes the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    pub allowed_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_types: DEFAULT_ALLOWED_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl UploadPolicy {
    pub fn allows_type(&self, mime: &str) -> bool {
        let mime = mime.trim();
        self.allowed_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("File size must be less than {}", human_megabytes(.max_bytes))]
    TooLarge { max_bytes: u64 },
    #[error("Please upload a valid image file (JPG, PNG, or WebP)")]
    UnsupportedType { mime: String },
}

/// Checks size first, then declared type.
pub fn validate_image(
    size_bytes: u64,
    mime: &str,
    policy: &UploadPolicy,
) -> Result<(), ValidationError> {
    if size_bytes > policy.max_bytes {
        return Err(ValidationError::TooLarge {
            max_bytes: policy.max_bytes,
        });
    }

    if !policy.allows_type(mime) {
        return Err(ValidationError::UnsupportedType {
            mime: mime.to_string(),
        });
    }

    Ok(())
}

fn human_megabytes(bytes: &u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    let bytes = *bytes;
    match bytes {
        b if b >= MIB && b % MIB == 0 => format!("{}MB", b / MIB),
        b if b >= MIB => format!("{:.1}MB", b as f64 / MIB as f64),
        b if b >= KIB => format!("{}KB", b / KIB),
        b => format!("{b} bytes"),
    }
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
