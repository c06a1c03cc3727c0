//! Canonical classification result

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical, post-parse classification result.
///
/// Created on successful response parse, replaced wholesale on the next
/// successful classification, never partially mutated. The BTreeMap keeps
/// distribution key order stable for export reproducibility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    /// Total number of classified samples
    pub total_samples: u64,

    /// Model confidence in [0, 1]; absent is not zero
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Sample count per class id
    pub class_distribution: BTreeMap<u8, u64>,

    /// Wall-clock seconds between request start and parse completion,
    /// rounded to two decimals
    pub processing_time_seconds: f64,
}

impl ClassificationResult {
    /// Sample count for a class, zero when the class is missing
    pub fn count_for(&self, class_id: u8) -> u64 {
        self.class_distribution.get(&class_id).copied().unwrap_or(0)
    }

    /// Sum of all distribution counts (≤ total_samples by construction)
    pub fn distribution_sum(&self) -> u64 {
        self.class_distribution.values().sum()
    }
}
