//! Progress tracking for a classification run
//!
//! The orchestrator and client drive coarse checkpoints (0 start, 10
//! validated, 30 request built, 70 response received, 100 parsed). The
//! value is monotonic non-decreasing within one run and resets to 0 at the
//! start of each submission.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use uuid::Uuid;
use wetmap_common::events::{EventBus, WetmapEvent};

/// Shared 0-100 progress value consumed by an external progress surface
#[derive(Clone)]
pub struct ProgressTracker {
    value: Arc<AtomicU8>,
    event_bus: EventBus,
    run_id: Uuid,
}

impl ProgressTracker {
    pub fn new(event_bus: EventBus, run_id: Uuid) -> Self {
        Self {
            value: Arc::new(AtomicU8::new(0)),
            event_bus,
            run_id,
        }
    }

    /// Advance the progress value. Values above 100 are clamped; values
    /// below the current one are ignored so progress never moves backwards
    /// within a run.
    pub fn set(&self, percent: u8) {
        let percent = percent.min(100);
        let previous = self.value.fetch_max(percent, Ordering::SeqCst);
        if percent > previous {
            tracing::debug!(run_id = %self.run_id, percent, "Progress checkpoint");
            self.event_bus.emit_lossy(WetmapEvent::ClassificationProgress {
                run_id: self.run_id,
                percent,
                timestamp: chrono::Utc::now(),
            });
        }
    }

    /// Reset to 0 for a new run
    pub fn reset(&self) {
        self.value.store(0, Ordering::SeqCst);
    }

    /// Current progress value (0-100)
    pub fn percent(&self) -> u8 {
        self.value.load(Ordering::SeqCst)
    }

    /// Run token this tracker reports for
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> (ProgressTracker, tokio::sync::broadcast::Receiver<WetmapEvent>) {
        let bus = EventBus::new(32);
        let rx = bus.subscribe();
        (ProgressTracker::new(bus, Uuid::new_v4()), rx)
    }

    #[test]
    fn test_checkpoints_advance() {
        let (tracker, mut rx) = tracker();
        for percent in [0u8, 10, 30, 70, 100] {
            tracker.set(percent);
        }
        assert_eq!(tracker.percent(), 100);

        // 0 is not an advance from the initial value; the rest broadcast
        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let WetmapEvent::ClassificationProgress { percent, .. } = event {
                seen.push(percent);
            }
        }
        assert_eq!(seen, vec![10, 30, 70, 100]);
    }

    #[test]
    fn test_monotonic_within_run() {
        let (tracker, _rx) = tracker();
        tracker.set(70);
        tracker.set(30);
        assert_eq!(tracker.percent(), 70);
    }

    #[test]
    fn test_clamped_to_100() {
        let (tracker, _rx) = tracker();
        tracker.set(250);
        assert_eq!(tracker.percent(), 100);
    }

    #[test]
    fn test_reset_between_runs() {
        let (tracker, _rx) = tracker();
        tracker.set(100);
        tracker.reset();
        assert_eq!(tracker.percent(), 0);
        tracker.set(10);
        assert_eq!(tracker.percent(), 10);
    }
}
