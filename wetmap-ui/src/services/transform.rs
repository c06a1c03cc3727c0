//! Result transformation
//!
//! Pure functions turning a canonical result into display and export
//! views. Every view iterates the fixed class table in declaration order,
//! zero-filling missing classes, so ordering is stable across calls.

use crate::error::WorkflowError;
use crate::models::ClassificationResult;
use std::collections::BTreeMap;
use wetmap_common::events::{ChartSeries, MapAnnotation};
use wetmap_common::WETLAND_CLASSES;

/// Export formats the workflow produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn filename(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "wetland_classification.csv",
            ExportFormat::Json => "wetland_classification.json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "CSV"),
            ExportFormat::Json => write!(f, "JSON"),
        }
    }
}

/// A downloadable export buffer
#[derive(Debug, Clone)]
pub struct ExportBuffer {
    pub filename: &'static str,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportBuffer {
    /// Write the buffer into a directory under its canonical filename
    pub fn write_to_dir(&self, dir: &std::path::Path) -> std::io::Result<std::path::PathBuf> {
        let path = dir.join(self.filename);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Percentage of `count` within `total`, rounded to `decimals` places.
/// Zero totals yield 0 rather than dividing by zero.
fn percentage(count: u64, total: u64, decimals: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    ((count as f64 / total as f64) * 100.0 * factor).round() / factor
}

/// Per-class display percentages (1 decimal), keyed by class id
pub fn percentages_by_class(result: &ClassificationResult) -> BTreeMap<u8, f64> {
    WETLAND_CLASSES
        .iter()
        .map(|class| {
            (
                class.id,
                percentage(result.count_for(class.id), result.total_samples, 1),
            )
        })
        .collect()
}

/// Chart-ready series: exactly one entry per known class, fixed order
pub fn chart_series(result: &ClassificationResult) -> ChartSeries {
    let percentages = percentages_by_class(result);
    let mut series = ChartSeries {
        labels: Vec::with_capacity(WETLAND_CLASSES.len()),
        values: Vec::with_capacity(WETLAND_CLASSES.len()),
        percentages: Vec::with_capacity(WETLAND_CLASSES.len()),
        colors: Vec::with_capacity(WETLAND_CLASSES.len()),
    };
    for class in &WETLAND_CLASSES {
        series.labels.push(class.name.to_string());
        series.values.push(result.count_for(class.id));
        series
            .percentages
            .push(percentages.get(&class.id).copied().unwrap_or(0.0));
        series.colors.push(class.color.to_string());
    }
    series
}

/// Summary annotation for the map surface at the configured center
pub fn map_annotation(result: &ClassificationResult, center: (f64, f64)) -> MapAnnotation {
    MapAnnotation {
        lat: center.0,
        lon: center.1,
        total_samples: result.total_samples,
    }
}

/// CSV export: one row per known class, percentages with two decimals
pub fn to_csv(result: &ClassificationResult) -> String {
    let mut csv = String::from("Class ID,Class Name,Sample Count,Percentage\n");
    for class in &WETLAND_CLASSES {
        let count = result.count_for(class.id);
        csv.push_str(&format!(
            "{},{},{},{:.2}%\n",
            class.id,
            class.name,
            count,
            percentage(count, result.total_samples, 2)
        ));
    }
    csv
}

/// JSON export: the full canonical result, pretty-printed with stable key
/// order (struct field order plus BTreeMap distribution keys)
pub fn to_json(result: &ClassificationResult) -> Result<String, WorkflowError> {
    serde_json::to_string_pretty(result)
        .map_err(|e| WorkflowError::ExportSerialization(e.to_string()))
}

/// Produce a downloadable buffer for the given format
pub fn export(result: &ClassificationResult, format: ExportFormat) -> Result<ExportBuffer, WorkflowError> {
    let bytes = match format {
        ExportFormat::Csv => to_csv(result).into_bytes(),
        ExportFormat::Json => to_json(result)?.into_bytes(),
    };
    Ok(ExportBuffer {
        filename: format.filename(),
        mime_type: format.mime_type(),
        bytes,
    })
}
