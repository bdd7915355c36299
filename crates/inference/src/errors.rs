use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Input shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Inference failed: {0:#}")]
    Backend(anyhow::Error),

    #[error("Model returned a non-finite score: {0}")]
    InvalidScore(f32),
}
