//! Data model types for the classification workflow

mod classification;
mod uploaded_file;
mod workflow;

pub use classification::ClassificationResult;
pub use uploaded_file::{format_bytes, FileCandidate, UploadedFile};
pub use workflow::WorkflowState;
