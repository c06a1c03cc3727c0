//! Event types for the wetmap event system
//!
//! The workflow orchestrator publishes immutable snapshots over the
//! EventBus; render collaborators (chart, map, progress bar, notification
//! surface) subscribe and own their own redraw logic.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Notification severity tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Success => write!(f, "success"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Chart-ready series: one entry per known class, in fixed class-table order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    /// Share of total samples per class, rounded to one decimal
    pub percentages: Vec<f64>,
    pub colors: Vec<String>,
}

/// Map overlay annotation, positioned at the configured basin coordinate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MapAnnotation {
    pub lat: f64,
    pub lon: f64,
    pub total_samples: u64,
}

/// Wetmap event types
///
/// Events are broadcast via EventBus and can be serialized for external
/// consumers. The `run_id` on classification events is the orchestrator's
/// run token; a mismatching token marks a stale run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WetmapEvent {
    /// A file passed validation and became the current selection
    FileSelected {
        file_name: String,
        size_bytes: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Workflow state changed
    StateChanged {
        old_state: String,
        new_state: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A classification run was submitted to the endpoint
    ClassificationStarted {
        run_id: Uuid,
        file_name: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Progress checkpoint reached (0-100, monotonic within a run)
    ClassificationProgress {
        run_id: Uuid,
        percent: u8,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Classification run completed successfully
    ClassificationCompleted {
        run_id: Uuid,
        total_samples: u64,
        /// Model confidence in [0, 1]; absent when the endpoint omits it
        confidence: Option<f64>,
        processing_time_seconds: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Classification run failed
    ClassificationFailed {
        run_id: Uuid,
        message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// New chart series available for the chart surface
    ChartUpdated {
        series: ChartSeries,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// New summary annotation available for the map surface
    MapOverlayUpdated {
        annotation: MapAnnotation,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// An export buffer was produced
    ExportProduced {
        filename: String,
        mime_type: String,
        size_bytes: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// User-visible notification (message text plus severity tier)
    Notification {
        message: String,
        severity: Severity,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl WetmapEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            WetmapEvent::FileSelected { .. } => "FileSelected",
            WetmapEvent::StateChanged { .. } => "StateChanged",
            WetmapEvent::ClassificationStarted { .. } => "ClassificationStarted",
            WetmapEvent::ClassificationProgress { .. } => "ClassificationProgress",
            WetmapEvent::ClassificationCompleted { .. } => "ClassificationCompleted",
            WetmapEvent::ClassificationFailed { .. } => "ClassificationFailed",
            WetmapEvent::ChartUpdated { .. } => "ChartUpdated",
            WetmapEvent::MapOverlayUpdated { .. } => "MapOverlayUpdated",
            WetmapEvent::ExportProduced { .. } => "ExportProduced",
            WetmapEvent::Notification { .. } => "Notification",
        }
    }
}

/// Central event distribution bus
///
/// Uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<WetmapEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<WetmapEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: WetmapEvent,
    ) -> std::result::Result<usize, broadcast::error::SendError<WetmapEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: WetmapEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eventbus_new() {
        let bus = EventBus::new(100);
        assert_eq!(bus.capacity(), 100);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_eventbus_subscribe() {
        let bus = EventBus::new(10);
        let _rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_eventbus_emit() {
        let bus = EventBus::new(10);
        let mut rx = bus.subscribe();

        bus.emit(WetmapEvent::FileSelected {
            file_name: "bow_river.npz".to_string(),
            size_bytes: 2048,
            timestamp: chrono::Utc::now(),
        })
        .expect("emit should succeed");

        let received = rx.try_recv().expect("should receive event");
        assert_eq!(received.event_type(), "FileSelected");
    }

    #[test]
    fn test_eventbus_emit_lossy_without_subscribers() {
        let bus = EventBus::new(2);
        // No subscribers; must not panic
        for percent in [0u8, 10, 30, 70, 100] {
            bus.emit_lossy(WetmapEvent::ClassificationProgress {
                run_id: Uuid::new_v4(),
                percent,
                timestamp: chrono::Utc::now(),
            });
        }
        assert_eq!(bus.capacity(), 2);
    }

    #[test]
    fn test_eventbus_multiple_subscribers() {
        let bus = EventBus::new(10);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(WetmapEvent::Notification {
            message: "Classification completed successfully!".to_string(),
            severity: Severity::Success,
            timestamp: chrono::Utc::now(),
        })
        .expect("emit should succeed");

        assert_eq!(rx1.try_recv().expect("rx1").event_type(), "Notification");
        assert_eq!(rx2.try_recv().expect("rx2").event_type(), "Notification");
    }

    #[test]
    fn test_event_serialization_round_trip() {
        let event = WetmapEvent::ClassificationCompleted {
            run_id: Uuid::from_u128(0x12345678_1234_1234_1234_123456789abc),
            total_samples: 150000,
            confidence: Some(0.87),
            processing_time_seconds: 2.35,
            timestamp: chrono::Utc::now(),
        };

        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("\"type\":\"ClassificationCompleted\""));
        assert!(json.contains("\"total_samples\":150000"));
        assert!(json.contains("\"confidence\":0.87"));

        let back: WetmapEvent = serde_json::from_str(&json).expect("deserialize");
        match back {
            WetmapEvent::ClassificationCompleted {
                total_samples,
                confidence,
                processing_time_seconds,
                ..
            } => {
                assert_eq!(total_samples, 150000);
                assert_eq!(confidence, Some(0.87));
                assert_eq!(processing_time_seconds, 2.35);
            }
            _ => panic!("wrong event type deserialized"),
        }
    }

    #[test]
    fn test_chart_series_serialization() {
        let series = ChartSeries {
            labels: vec!["Marsh".to_string()],
            values: vec![32000],
            percentages: vec![21.3],
            colors: vec!["#16c79a".to_string()],
        };
        let event = WetmapEvent::ChartUpdated {
            series: series.clone(),
            timestamp: chrono::Utc::now(),
        };
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("\"labels\":[\"Marsh\"]"));
        assert!(json.contains("\"percentages\":[21.3]"));
        assert!(json.contains("\"colors\":[\"#16c79a\"]"));
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Info.to_string(), "info");
        assert_eq!(Severity::Success.to_string(), "success");
        assert_eq!(Severity::Error.to_string(), "error");
    }
}
