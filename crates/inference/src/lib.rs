pub mod backend;
pub mod classifier;
pub mod errors;

// Re-export commonly used types for convenience
pub use backend::InferenceBackend;
pub use classifier::{
    Classification, Classifier, ClassifierConfig, DEFAULT_INPUT_SHAPE, DEFAULT_THRESHOLD, Label,
};
pub use errors::InferenceError;
