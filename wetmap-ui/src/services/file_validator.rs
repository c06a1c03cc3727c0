//! Upload validation
//!
//! Accepts or rejects a candidate purely by file name suffix; there is no
//! size ceiling here (the endpoint enforces its own limits).

use crate::error::ValidationError;
use crate::models::{FileCandidate, UploadedFile};

/// Extensions the classifier accepts
pub const ACCEPTED_EXTENSIONS: [&str; 2] = [".npz", ".npy"];

/// File validator, a pure function of its input
pub struct FileValidator;

impl FileValidator {
    /// Validate a candidate, producing an immutable UploadedFile on success
    pub fn validate(candidate: FileCandidate) -> Result<UploadedFile, ValidationError> {
        let lower = candidate.name.to_ascii_lowercase();
        if ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            Ok(UploadedFile::from_validated(candidate))
        } else {
            Err(ValidationError::InvalidExtension(candidate.name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_extensions_validate() {
        for name in ["tile.npz", "tile.npy", "TILE.NPZ", "Embeddings.NpY"] {
            let candidate = FileCandidate::new(name, vec![1, 2, 3]);
            let file = FileValidator::validate(candidate).expect("should validate");
            assert_eq!(file.name(), name);
            assert_eq!(file.size_bytes(), 3);
        }
    }

    #[test]
    fn test_rejected_extensions_fail_with_invalid_extension() {
        for name in ["tile.tif", "tile.npz.zip", "npz", "tile", "tile.np"] {
            let candidate = FileCandidate::new(name, vec![]);
            let err = FileValidator::validate(candidate).expect_err("should reject");
            assert_eq!(err, ValidationError::InvalidExtension(name.to_string()));
        }
    }

    #[test]
    fn test_validation_has_no_size_ceiling() {
        let candidate = FileCandidate::new("big.npy", vec![0u8; 8 * 1024 * 1024]);
        assert!(FileValidator::validate(candidate).is_ok());
    }
}
