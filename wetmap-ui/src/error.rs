//! Error types for the classification workflow

use thiserror::Error;

/// File validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// File name does not carry an accepted extension
    #[error("Please upload a valid .npz or .npy file (got: {0})")]
    InvalidExtension(String),
}

/// Classification submission errors
///
/// The endpoint being unreachable, rejecting the request and returning an
/// unparseable body are distinct kinds so callers can tell network trouble
/// from server-side rejection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// Endpoint could not be contacted
    #[error("Classification endpoint unreachable: {0}")]
    Unreachable(String),

    /// Endpoint responded with a non-2xx status
    #[error("Classification failed with status {status}: {message}")]
    NonSuccessStatus { status: u16, message: String },

    /// Response body did not match the expected result shape
    #[error("Failed to parse classification response: {0}")]
    Parse(String),
}

/// Workflow-level errors surfaced to the user
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Classification(#[from] ClassifyError),

    /// Export or view requested outside the Succeeded state
    #[error("No results to export")]
    NoResultAvailable,

    /// Submission requested with no current file
    #[error("No file selected")]
    NoFileSelected,

    /// Submission requested while another run is in flight
    #[error("A classification is already in progress")]
    SubmissionInFlight,

    /// A stored result could not be serialized for export
    #[error("Failed to serialize export: {0}")]
    ExportSerialization(String),
}

/// Result type for workflow operations
pub type WorkflowResult<T> = std::result::Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_serialization_is_not_an_endpoint_error() {
        let err = WorkflowError::ExportSerialization("key must be a string".to_string());
        assert!(!matches!(err, WorkflowError::Classification(_)));
        assert_eq!(
            err.to_string(),
            "Failed to serialize export: key must be a string"
        );
    }
}
