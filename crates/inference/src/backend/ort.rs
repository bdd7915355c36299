use super::InferenceBackend;
use ndarray::{Array, IxDyn};
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};
use std::sync::Mutex;

const DEFAULT_INTRA_THREADS: usize = 4;

/// ONNX Runtime backend for the exported Keras classifier.
///
/// The graph has one NHWC float input and one `[1, 1]` sigmoid output.
pub struct OrtBackend {
    session: Mutex<Session>,
}

impl OrtBackend {
    pub fn load_model_with_threads(path: &str, intra_threads: usize) -> anyhow::Result<Self> {
        // Initialize ORT environment (idempotent)
        let _ = ort::init().commit();

        tracing::info!(intra_threads, "Initializing ONNX Runtime with CPU execution provider");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(intra_threads)?
            .commit_from_file(path)?;

        tracing::info!("Model loaded from {}", path);
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl InferenceBackend for OrtBackend {
    fn load_model(path: &str) -> anyhow::Result<Self> {
        Self::load_model_with_threads(path, DEFAULT_INTRA_THREADS)
    }

    fn infer(&self, input: &Array<f32, IxDyn>) -> anyhow::Result<f32> {
        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("session lock poisoned: {e}"))?;

        let outputs = session.run(ort::inputs![TensorRef::from_array_view(input.view())?])?;
        let scores = outputs[0].try_extract_array::<f32>()?;

        scores
            .iter()
            .next()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("model returned an empty output tensor"))
    }
}
