//! wetmap-ui - Wetland Classification Workflow
//!
//! Submits a remote-sensing data file to the classification endpoint and
//! renders the per-class distribution as a text chart, a map summary line
//! and optional CSV/JSON exports. The binary is the thin event-adapter
//! layer: it subscribes to the event bus and owns all terminal output,
//! while the orchestrator owns the workflow itself.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wetmap_common::config;
use wetmap_common::events::{ChartSeries, EventBus, Severity, WetmapEvent};
use wetmap_ui::models::FileCandidate;
use wetmap_ui::services::{ClassificationClient, ExportFormat, WorkflowOrchestrator};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportArg {
    Csv,
    Json,
}

impl From<ExportArg> for ExportFormat {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Csv => ExportFormat::Csv,
            ExportArg::Json => ExportFormat::Json,
        }
    }
}

/// Classify a remote-sensing data file against the wetmap endpoint
#[derive(Debug, Parser)]
#[command(name = "wetmap-ui", version)]
struct Args {
    /// Remote-sensing data file (.npz or .npy)
    file: PathBuf,

    /// Endpoint base URL (overrides WETMAP_API_URL and the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Export format(s) to write after a successful classification
    #[arg(long = "export", value_enum)]
    exports: Vec<ExportArg>,

    /// Directory export files are written into
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let app_config = config::resolve_config(args.api_url.as_deref());
    config::validate_base_url(&app_config.api_base_url)?;

    info!("Starting wetmap-ui");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Endpoint: {}", app_config.api_base_url);

    let event_bus = EventBus::new(100);
    let renderer = tokio::spawn(render_events(event_bus.subscribe()));

    let client = ClassificationClient::new(&app_config.api_base_url)?;
    let orchestrator = Arc::new(WorkflowOrchestrator::new(
        client,
        event_bus.clone(),
        app_config.map_center,
    ));

    let candidate = FileCandidate::from_path(&args.file)?;
    orchestrator.select_file(candidate)?;
    orchestrator.submit().await?;

    for export in args.exports {
        let buffer = orchestrator.export(export.into())?;
        let path = buffer.write_to_dir(&args.output_dir)?;
        info!(path = %path.display(), "Export written");
    }

    // Let the renderer drain whatever is still queued on the bus
    drop(orchestrator);
    drop(event_bus);
    let _ = renderer.await;

    Ok(())
}

/// Render collaborator: consumes bus events and owns terminal redraw
async fn render_events(mut rx: tokio::sync::broadcast::Receiver<WetmapEvent>) {
    use tokio::sync::broadcast::error::RecvError;

    loop {
        let event = match rx.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Renderer lagged behind event bus");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        match event {
            WetmapEvent::FileSelected {
                file_name,
                size_bytes,
                ..
            } => {
                println!(
                    "File selected: {} ({})",
                    file_name,
                    wetmap_ui::models::format_bytes(size_bytes)
                );
            }
            WetmapEvent::ClassificationProgress { percent, .. } => {
                println!("Progress: {:>3}%", percent);
            }
            WetmapEvent::ClassificationCompleted {
                total_samples,
                confidence,
                processing_time_seconds,
                ..
            } => {
                println!(
                    "Classified {} samples in {}s (confidence: {})",
                    total_samples,
                    processing_time_seconds,
                    format_confidence(confidence)
                );
            }
            WetmapEvent::ChartUpdated { series, .. } => {
                print!("{}", render_chart(&series));
            }
            WetmapEvent::MapOverlayUpdated { annotation, .. } => {
                println!(
                    "Map overlay at ({:.4}, {:.4}): {} samples processed",
                    annotation.lat, annotation.lon, annotation.total_samples
                );
            }
            WetmapEvent::Notification {
                message, severity, ..
            } => {
                println!("[{}] {}", severity, message);
            }
            _ => {}
        }
    }
}

/// Model confidence for display; absent is shown as N/A, never 0
fn format_confidence(confidence: Option<f64>) -> String {
    match confidence {
        Some(value) => format!("{:.1}%", value * 100.0),
        None => "N/A".to_string(),
    }
}

/// Text bar chart over the fixed class series, percentage beside each bar
fn render_chart(series: &ChartSeries) -> String {
    let max = series.values.iter().copied().max().unwrap_or(0).max(1);
    let mut out = String::new();
    for ((label, value), pct) in series
        .labels
        .iter()
        .zip(&series.values)
        .zip(&series.percentages)
    {
        let bar_len = (value * 40 / max) as usize;
        out.push_str(&format!(
            "{:<12} {:>8} {:>5.1}%  {}\n",
            label,
            value,
            pct,
            "#".repeat(bar_len)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(Some(0.87)), "87.0%");
        assert_eq!(format_confidence(Some(1.0)), "100.0%");
        assert_eq!(format_confidence(None), "N/A");
    }

    #[test]
    fn test_render_chart_shows_percentages() {
        let series = ChartSeries {
            labels: vec!["Background".to_string(), "Marsh".to_string()],
            values: vec![45000, 32000],
            percentages: vec![30.0, 21.3],
            colors: vec!["#1a1a2e".to_string(), "#16c79a".to_string()],
        };
        let chart = render_chart(&series);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Background"));
        assert!(lines[0].contains("30.0%"));
        assert!(lines[1].contains("21.3%"));
    }
}
