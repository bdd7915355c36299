use crate::uploads::UploadStore;
use axum::body::Bytes;
use base64::{Engine, prelude::BASE64_STANDARD};
use chrono::Local;
use inference::{Classification, Classifier, InferenceError, Label};
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};
use preprocess::{Preprocess, PreprocessError};
use records::{NewScanRecord, PatientInfo, ResultLabel, ScanRecordStore};
use std::io;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const UNKNOWN_MIME: &str = "application/octet-stream";

/// Failures that abort an upload request.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing required form field `{0}`")]
    MissingField(&'static str),

    #[error("Failed to store upload: {0}")]
    StorageIo(#[from] io::Error),
}

/// Failures that only downgrade the result to "Prediction failed".
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("Prediction task aborted: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

/// The uploaded file as received.
#[derive(Debug, Clone)]
pub struct ScanUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// What the result page shows for one upload.
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    pub sequence_number: u64,
    pub result: ResultLabel,
    pub score: Option<f32>,
    pub image_base64: String,
    pub image_mime: &'static str,
    pub patient: PatientInfo,
}

struct PipelineMetrics {
    duration: Histogram<f64>,
    predictions: Counter<u64>,
}

impl PipelineMetrics {
    fn new(meter_name: &'static str) -> Self {
        let meter = global::meter(meter_name);
        let latency_buckets = [
            0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.15, 0.2, 0.3, 0.5, 0.75, 1.0, 2.0, 5.0,
        ];
        let duration = meter
            .f64_histogram("scan_inference_duration_seconds")
            .with_description("Time to preprocess and classify a single scan")
            .with_unit("s")
            .with_boundaries(latency_buckets.to_vec())
            .build();
        let predictions = meter
            .u64_counter("scan_predictions_total")
            .with_description("Scans recorded, by result label")
            .build();

        Self {
            duration,
            predictions,
        }
    }
}

/// Upload → persist → preprocess → classify → record.
pub struct PredictionPipeline {
    preprocessor: Arc<dyn Preprocess>,
    classifier: Arc<Classifier>,
    store: Arc<ScanRecordStore>,
    uploads: UploadStore,
    metrics: PipelineMetrics,
}

impl PredictionPipeline {
    pub fn new(
        preprocessor: Arc<dyn Preprocess>,
        classifier: Arc<Classifier>,
        store: Arc<ScanRecordStore>,
        uploads: UploadStore,
    ) -> Self {
        Self {
            preprocessor,
            classifier,
            store,
            uploads,
            metrics: PipelineMetrics::new("server"),
        }
    }

    pub fn store(&self) -> &Arc<ScanRecordStore> {
        &self.store
    }

    /// Handle one upload end to end.
    ///
    /// Only storage failures abort; any preprocessing or inference error is
    /// recorded as [`ResultLabel::PredictionFailed`].
    #[tracing::instrument(
        name = "scan_pipeline",
        skip_all,
        fields(file_name = %upload.file_name, bytes = upload.bytes.len())
    )]
    pub async fn run(
        &self,
        upload: ScanUpload,
        patient: PatientInfo,
    ) -> Result<PredictionOutcome, PipelineError> {
        let path = self.uploads.save(&upload.file_name, &upload.bytes).await?;
        tracing::debug!(path = %path.display(), "Upload persisted");

        let stored = Bytes::from(self.uploads.read(&path).await?);

        let start = Instant::now();
        let prediction = self.predict(stored.clone()).await;
        self.metrics
            .duration
            .record(start.elapsed().as_secs_f64(), &[]);

        let (result, score) = match prediction {
            Ok(Classification { label, score }) => (result_label(label), Some(score)),
            Err(e) => {
                tracing::warn!(error = %e, "Prediction failed - recording the attempt anyway");
                (ResultLabel::PredictionFailed, None)
            }
        };
        self.metrics
            .predictions
            .add(1, &[KeyValue::new("label", result.as_str())]);

        let image_base64 = BASE64_STANDARD.encode(&stored);
        let image_mime = image::guess_format(&stored)
            .map(|format| format.to_mime_type())
            .unwrap_or(UNKNOWN_MIME);

        let sequence_number = self.store.append(NewScanRecord {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            image_base64: image_base64.clone(),
            image_mime,
            result,
            patient: patient.clone(),
        });

        tracing::info!(sequence_number, result = %result, score, "Scan recorded");

        Ok(PredictionOutcome {
            sequence_number,
            result,
            score,
            image_base64,
            image_mime,
            patient,
        })
    }

    /// Preprocess and classify on the blocking pool.
    pub async fn predict(&self, encoded: Bytes) -> Result<Classification, PredictionError> {
        let preprocessor = self.preprocessor.clone();
        let classifier = self.classifier.clone();

        tokio::task::spawn_blocking(move || -> Result<Classification, PredictionError> {
            let tensor = preprocessor.preprocess(&encoded)?;
            Ok(classifier.classify(&tensor)?)
        })
        .await?
    }
}

fn result_label(label: Label) -> ResultLabel {
    match label {
        Label::Covid19 => ResultLabel::Covid19,
        Label::Normal => ResultLabel::Normal,
    }
}
