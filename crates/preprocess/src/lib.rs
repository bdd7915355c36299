pub mod config;
pub mod cpu;
pub mod errors;

use ndarray::{Array, IxDyn};

pub use config::{ChannelOrder, DEFAULT_INPUT_SIZE};
pub use cpu::CpuPreProcessor;
pub use errors::PreprocessError;

/// Trait for scan preprocessing implementations
pub trait Preprocess: Send + Sync {
    /// Turn an encoded image file (PNG, JPEG, BMP) into a model input tensor
    ///
    /// # Returns
    /// NHWC tensor of shape `[1, height, width, 3]` with values in `[0, 1]`
    fn preprocess(&self, encoded: &[u8]) -> Result<Array<f32, IxDyn>, PreprocessError>;

    /// Get the input size this preprocessor targets
    fn input_size(&self) -> (u32, u32);
}
