//! wetmap-ui library interface
//!
//! Exposes the classification workflow for the CLI binary and for
//! integration testing.

pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ClassifyError, ValidationError, WorkflowError, WorkflowResult};
