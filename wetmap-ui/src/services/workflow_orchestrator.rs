//! Classification workflow orchestrator
//!
//! Sequences validation → submission → progress → transformation and
//! publishes derived views to render/export collaborators over the event
//! bus. All workflow state (current file, result slot, run token) is owned
//! here; collaborators get read accessors and immutable event snapshots,
//! never shared mutable globals.
//!
//! Concurrency: methods take `&self` so the orchestrator can be shared via
//! `Arc`. The inner lock is never held across the classifier suspension
//! point. At most one run is in `SUBMITTING` at a time (single-flight);
//! selecting a new file mid-flight rotates the run token, and a completion
//! carrying a stale token is discarded.

use crate::error::{WorkflowError, WorkflowResult};
use crate::models::{format_bytes, ClassificationResult, FileCandidate, UploadedFile, WorkflowState};
use crate::services::{
    transform, Classifier, ExportBuffer, ExportFormat, FileValidator, ProgressTracker,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;
use wetmap_common::events::{ChartSeries, EventBus, MapAnnotation, Severity, WetmapEvent};

struct WorkflowInner {
    state: WorkflowState,
    file: Option<Arc<UploadedFile>>,
    result: Option<ClassificationResult>,
    run_token: Uuid,
}

/// Top-level workflow state machine
pub struct WorkflowOrchestrator<C: Classifier> {
    client: C,
    event_bus: EventBus,
    map_center: (f64, f64),
    inner: Mutex<WorkflowInner>,
}

impl<C: Classifier> WorkflowOrchestrator<C> {
    pub fn new(client: C, event_bus: EventBus, map_center: (f64, f64)) -> Self {
        Self {
            client,
            event_bus,
            map_center,
            inner: Mutex::new(WorkflowInner {
                state: WorkflowState::Idle,
                file: None,
                result: None,
                run_token: Uuid::new_v4(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, WorkflowInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, inner: &mut WorkflowInner, new_state: WorkflowState) {
        let old_state = inner.state;
        if old_state == new_state {
            return;
        }
        inner.state = new_state;
        tracing::info!(old = %old_state, new = %new_state, "Workflow state changed");
        self.event_bus.emit_lossy(WetmapEvent::StateChanged {
            old_state: old_state.to_string(),
            new_state: new_state.to_string(),
            timestamp: chrono::Utc::now(),
        });
    }

    fn notify(&self, message: impl Into<String>, severity: Severity) {
        self.event_bus.emit_lossy(WetmapEvent::Notification {
            message: message.into(),
            severity,
            timestamp: chrono::Utc::now(),
        });
    }

    /// Current workflow state
    pub fn state(&self) -> WorkflowState {
        self.lock().state
    }

    /// Currently selected file, if any
    pub fn current_file(&self) -> Option<Arc<UploadedFile>> {
        self.lock().file.clone()
    }

    /// Stored classification result, if any
    pub fn result(&self) -> Option<ClassificationResult> {
        self.lock().result.clone()
    }

    /// Handle a user file selection.
    ///
    /// A valid candidate becomes the current file, discards any previous
    /// result and rotates the run token so an in-flight submission resolves
    /// stale. An invalid candidate is dropped, the previous selection and
    /// state stay untouched, and the error is surfaced as a notification.
    pub fn select_file(&self, candidate: FileCandidate) -> WorkflowResult<()> {
        let file = match FileValidator::validate(candidate) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(error = %e, "File rejected by validator");
                self.notify(e.to_string(), Severity::Error);
                return Err(e.into());
            }
        };

        let name = file.name().to_string();
        let size_bytes = file.size_bytes();

        let mut inner = self.lock();
        inner.file = Some(Arc::new(file));
        inner.result = None;
        inner.run_token = Uuid::new_v4();
        self.transition(&mut inner, WorkflowState::FileSelected);
        drop(inner);

        tracing::info!(file = %name, size = %format_bytes(size_bytes), "File selected");
        self.event_bus.emit_lossy(WetmapEvent::FileSelected {
            file_name: name,
            size_bytes,
            timestamp: chrono::Utc::now(),
        });

        Ok(())
    }

    /// Submit the current file to the classification endpoint.
    ///
    /// Refused while another run is in flight; permitted again after
    /// success or failure (the user re-triggers, there are no automatic
    /// retries). The result slot is only written when the run's token still
    /// matches the orchestrator's current token.
    pub async fn submit(&self) -> WorkflowResult<()> {
        let (token, file) = {
            let mut inner = self.lock();
            if inner.state == WorkflowState::Submitting {
                drop(inner);
                self.notify("A classification is already in progress", Severity::Error);
                return Err(WorkflowError::SubmissionInFlight);
            }
            let file = match inner.file.clone() {
                Some(file) => file,
                None => {
                    drop(inner);
                    self.notify("No file selected", Severity::Error);
                    return Err(WorkflowError::NoFileSelected);
                }
            };
            self.transition(&mut inner, WorkflowState::Submitting);
            (inner.run_token, file)
        };

        let tracker = ProgressTracker::new(self.event_bus.clone(), token);
        tracker.reset();

        self.event_bus.emit_lossy(WetmapEvent::ClassificationStarted {
            run_id: token,
            file_name: file.name().to_string(),
            timestamp: chrono::Utc::now(),
        });
        tracker.set(10);

        let outcome = self.client.classify(&file, &tracker).await;

        let mut inner = self.lock();
        if inner.run_token != token {
            // A new file was selected mid-flight; this response is stale.
            tracing::info!(run_id = %token, "Discarding stale classification response");
            return Ok(());
        }

        match outcome {
            Ok(result) => {
                inner.result = Some(result.clone());
                self.transition(&mut inner, WorkflowState::Succeeded);
                drop(inner);

                tracker.set(100);

                let timestamp = chrono::Utc::now();
                self.event_bus.emit_lossy(WetmapEvent::ClassificationCompleted {
                    run_id: token,
                    total_samples: result.total_samples,
                    confidence: result.confidence,
                    processing_time_seconds: result.processing_time_seconds,
                    timestamp,
                });
                self.event_bus.emit_lossy(WetmapEvent::ChartUpdated {
                    series: transform::chart_series(&result),
                    timestamp,
                });
                self.event_bus.emit_lossy(WetmapEvent::MapOverlayUpdated {
                    annotation: transform::map_annotation(&result, self.map_center),
                    timestamp,
                });
                self.notify("Classification completed successfully!", Severity::Success);
                Ok(())
            }
            Err(e) => {
                self.transition(&mut inner, WorkflowState::Failed);
                drop(inner);

                tracing::error!(run_id = %token, error = %e, "Classification failed");
                self.event_bus.emit_lossy(WetmapEvent::ClassificationFailed {
                    run_id: token,
                    message: e.to_string(),
                    timestamp: chrono::Utc::now(),
                });
                self.notify(e.to_string(), Severity::Error);
                Err(e.into())
            }
        }
    }

    /// Produce a downloadable export buffer.
    ///
    /// Valid only in the Succeeded state; elsewhere the request is reported
    /// as a user-visible error, never a panic.
    pub fn export(&self, format: ExportFormat) -> WorkflowResult<ExportBuffer> {
        let inner = self.lock();
        let result = match (&inner.state, &inner.result) {
            (WorkflowState::Succeeded, Some(result)) => result.clone(),
            _ => {
                drop(inner);
                self.notify("No results to export", Severity::Error);
                return Err(WorkflowError::NoResultAvailable);
            }
        };
        drop(inner);

        let buffer = transform::export(&result, format)?;
        self.event_bus.emit_lossy(WetmapEvent::ExportProduced {
            filename: buffer.filename.to_string(),
            mime_type: buffer.mime_type.to_string(),
            size_bytes: buffer.bytes.len() as u64,
            timestamp: chrono::Utc::now(),
        });
        self.notify(format!("Exported as {}", format), Severity::Success);
        Ok(buffer)
    }

    /// Chart view of the stored result (Succeeded only)
    pub fn chart_series(&self) -> WorkflowResult<ChartSeries> {
        self.with_result(transform::chart_series)
    }

    /// Map annotation for the stored result (Succeeded only)
    pub fn map_annotation(&self) -> WorkflowResult<MapAnnotation> {
        let center = self.map_center;
        self.with_result(move |result| transform::map_annotation(result, center))
    }

    fn with_result<T>(&self, f: impl FnOnce(&ClassificationResult) -> T) -> WorkflowResult<T> {
        let inner = self.lock();
        match (&inner.state, &inner.result) {
            (WorkflowState::Succeeded, Some(result)) => Ok(f(result)),
            _ => Err(WorkflowError::NoResultAvailable),
        }
    }
}
