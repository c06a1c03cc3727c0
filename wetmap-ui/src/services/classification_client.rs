//! Classification endpoint client
//!
//! Serializes a validated upload into a multipart request, posts it to the
//! configured endpoint and parses the response into the canonical result
//! shape.

use crate::error::ClassifyError;
use crate::models::{ClassificationResult, UploadedFile};
use crate::services::ProgressTracker;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

const PREDICT_PATH: &str = "/api/predict";
const MULTIPART_FIELD: &str = "file";
const USER_AGENT: &str = concat!("wetmap/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// The orchestrator's seam to the remote classifier.
///
/// Implementations report progress checkpoint 30 once the request is built
/// and 70 once the response status is in hand.
pub trait Classifier {
    fn classify(
        &self,
        file: &UploadedFile,
        progress: &ProgressTracker,
    ) -> impl std::future::Future<Output = Result<ClassificationResult, ClassifyError>> + Send;
}

/// Wire shape of a successful endpoint response.
/// Extra fields (predictions, coordinates) are ignored.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    total_samples: u64,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    class_distribution: BTreeMap<String, u64>,
}

/// HTTP client for the inference endpoint
pub struct ClassificationClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ClassificationClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClassifyError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClassifyError::Unreachable(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn submit(
        &self,
        file: &UploadedFile,
        progress: &ProgressTracker,
    ) -> Result<ClassificationResult, ClassifyError> {
        let started = Instant::now();
        let url = format!("{}{}", self.base_url, PREDICT_PATH);

        let part = reqwest::multipart::Part::bytes(file.payload().to_vec())
            .file_name(file.name().to_string());
        let form = reqwest::multipart::Form::new().part(MULTIPART_FIELD, part);

        progress.set(30);

        tracing::debug!(url = %url, file = %file.name(), "Submitting classification request");

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClassifyError::Unreachable(e.to_string()))?;

        let status = response.status();
        progress.set(70);

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClassifyError::NonSuccessStatus {
                status: status.as_u16(),
                message,
            });
        }

        let raw: PredictResponse = response
            .json()
            .await
            .map_err(|e| ClassifyError::Parse(e.to_string()))?;

        let result = canonicalize(raw, started.elapsed().as_secs_f64())?;

        tracing::info!(
            file = %file.name(),
            total_samples = result.total_samples,
            processing_time_seconds = result.processing_time_seconds,
            "Classification response parsed"
        );

        Ok(result)
    }
}

impl Classifier for ClassificationClient {
    async fn classify(
        &self,
        file: &UploadedFile,
        progress: &ProgressTracker,
    ) -> Result<ClassificationResult, ClassifyError> {
        self.submit(file, progress).await
    }
}

/// Turn a wire response into the canonical result.
///
/// Class ids must be small non-negative integers and the distribution sum
/// may not exceed the total; beyond that the server is trusted. Missing
/// confidence stays absent, never zero.
fn canonicalize(
    raw: PredictResponse,
    elapsed_seconds: f64,
) -> Result<ClassificationResult, ClassifyError> {
    let mut class_distribution = BTreeMap::new();
    for (key, count) in raw.class_distribution {
        let class_id: u8 = key
            .parse()
            .map_err(|_| ClassifyError::Parse(format!("invalid class id '{}'", key)))?;
        class_distribution.insert(class_id, count);
    }

    let sum: u64 = class_distribution.values().sum();
    if sum > raw.total_samples {
        return Err(ClassifyError::Parse(format!(
            "class distribution sum {} exceeds total samples {}",
            sum, raw.total_samples
        )));
    }

    Ok(ClassificationResult {
        total_samples: raw.total_samples,
        confidence: raw.confidence,
        class_distribution,
        processing_time_seconds: round_two_decimals(elapsed_seconds),
    })
}

fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
