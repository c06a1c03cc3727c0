//! Classification workflow state machine
//!
//! State progression:
//! IDLE → FILE_SELECTED → SUBMITTING → SUCCEEDED | FAILED
//!
//! A new valid selection from any state returns to FILE_SELECTED and
//! discards the previous result.

use serde::{Deserialize, Serialize};

/// Workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkflowState {
    /// No file selected yet
    Idle,
    /// A validated file is selected, submission enabled
    FileSelected,
    /// A classification request is in flight
    Submitting,
    /// A result is stored; exports and views are available
    Succeeded,
    /// The last submission failed; the selection is retained
    Failed,
}

impl WorkflowState {
    /// Whether a submission may be started from this state
    pub fn can_submit(&self) -> bool {
        matches!(
            self,
            WorkflowState::FileSelected | WorkflowState::Succeeded | WorkflowState::Failed
        )
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowState::Idle => write!(f, "IDLE"),
            WorkflowState::FileSelected => write!(f, "FILE_SELECTED"),
            WorkflowState::Submitting => write!(f, "SUBMITTING"),
            WorkflowState::Succeeded => write!(f, "SUCCEEDED"),
            WorkflowState::Failed => write!(f, "FAILED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_submit() {
        assert!(!WorkflowState::Idle.can_submit());
        assert!(WorkflowState::FileSelected.can_submit());
        assert!(!WorkflowState::Submitting.can_submit());
        assert!(WorkflowState::Succeeded.can_submit());
        assert!(WorkflowState::Failed.can_submit());
    }

    #[test]
    fn test_display() {
        assert_eq!(WorkflowState::FileSelected.to_string(), "FILE_SELECTED");
        assert_eq!(WorkflowState::Submitting.to_string(), "SUBMITTING");
    }
}
