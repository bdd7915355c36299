use ndarray::{Array, IxDyn};

#[cfg(feature = "ort-backend")]
pub mod ort;

/// A loaded binary classifier.
///
/// Implementations must be safe to call from many request tasks at once;
/// `infer` takes `&self` and must not leave shared state modified.
pub trait InferenceBackend: Send + Sync {
    fn load_model(path: &str) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Run a single forward pass and return the model's scalar score
    fn infer(&self, input: &Array<f32, IxDyn>) -> anyhow::Result<f32>;
}
