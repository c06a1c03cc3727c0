//! Workflow services

mod classification_client;
mod file_validator;
mod progress;
pub mod transform;
mod workflow_orchestrator;

pub use classification_client::{ClassificationClient, Classifier};
pub use file_validator::{FileValidator, ACCEPTED_EXTENSIONS};
pub use progress::ProgressTracker;
pub use transform::{ExportBuffer, ExportFormat};
pub use workflow_orchestrator::WorkflowOrchestrator;
