use crate::{InferenceBackend, InferenceError};
use common::span;
use ndarray::{Array, IxDyn};
use std::fmt;

pub const DEFAULT_THRESHOLD: f32 = 0.5;
pub const DEFAULT_INPUT_SHAPE: [usize; 4] = [1, 224, 224, 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Covid19,
    Normal,
}

impl Label {
    /// Strictly above the threshold is positive; the boundary itself is not.
    pub fn from_score(score: f32, threshold: f32) -> Self {
        if score > threshold {
            Label::Covid19
        } else {
            Label::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Covid19 => "COVID-19",
            Label::Normal => "Normal",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: Label,
    pub score: f32,
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub threshold: f32,
    pub input_shape: Vec<usize>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            input_shape: DEFAULT_INPUT_SHAPE.to_vec(),
        }
    }
}

enum Model {
    Ready(Box<dyn InferenceBackend>),
    Unavailable(String),
}

/// Thresholded binary classifier shared by all requests.
///
/// A classifier whose model failed to load stays usable: every call
/// returns [`InferenceError::ModelUnavailable`] instead of panicking.
pub struct Classifier {
    model: Model,
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(backend: impl InferenceBackend + 'static, config: ClassifierConfig) -> Self {
        Self {
            model: Model::Ready(Box::new(backend)),
            config,
        }
    }

    pub fn unavailable(reason: impl Into<String>, config: ClassifierConfig) -> Self {
        Self {
            model: Model::Unavailable(reason.into()),
            config,
        }
    }

    /// Load the model once at startup, logging the outcome either way.
    pub fn load<B: InferenceBackend + 'static>(model_path: &str, config: ClassifierConfig) -> Self {
        tracing::info!(model_path, "Loading inference model");

        match B::load_model(model_path) {
            Ok(backend) => {
                tracing::info!(threshold = config.threshold, "Model loaded successfully");
                Self::new(backend, config)
            }
            Err(e) => {
                tracing::error!(
                    error = %format!("{e:#}"),
                    model_path,
                    "Failed to load model - every prediction will be reported as failed"
                );
                Self::unavailable(format!("{e:#}"), config)
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.model, Model::Ready(_))
    }

    pub fn threshold(&self) -> f32 {
        self.config.threshold
    }

    pub fn input_shape(&self) -> &[usize] {
        &self.config.input_shape
    }

    pub fn classify(&self, input: &Array<f32, IxDyn>) -> Result<Classification, InferenceError> {
        let backend = match &self.model {
            Model::Ready(backend) => backend,
            Model::Unavailable(reason) => {
                return Err(InferenceError::ModelUnavailable(reason.clone()));
            }
        };

        if input.shape() != self.config.input_shape.as_slice() {
            return Err(InferenceError::ShapeMismatch {
                expected: self.config.input_shape.clone(),
                actual: input.shape().to_vec(),
            });
        }

        let score = {
            let _s = span!("model_inference");
            backend.infer(input).map_err(InferenceError::Backend)?
        };

        if !score.is_finite() {
            return Err(InferenceError::InvalidScore(score));
        }

        let label = Label::from_score(score, self.config.threshold);
        tracing::debug!(score, label = %label, "Scan classified");

        Ok(Classification { label, score })
    }
}
