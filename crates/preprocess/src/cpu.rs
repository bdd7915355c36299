use crate::config::{ChannelOrder, DEFAULT_INPUT_SIZE};
use crate::{Preprocess, PreprocessError};
use common::{span, span_debug};
use fast_image_resize::{
    FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer,
    images::{Image, ImageRef},
};
use ndarray::{Array, IxDyn};
use std::path::Path;

pub struct CpuPreProcessor {
    pub input_size: (u32, u32),
    pub channel_order: ChannelOrder,
}

impl CpuPreProcessor {
    pub fn new(input_size: (u32, u32), channel_order: ChannelOrder) -> Self {
        Self {
            input_size,
            channel_order,
        }
    }

    /// Decode an encoded image and build the model input tensor.
    ///
    /// Grayscale, alpha and 16-bit inputs are coerced to 8-bit RGB first.
    pub fn preprocess_bytes(&self, encoded: &[u8]) -> Result<Array<f32, IxDyn>, PreprocessError> {
        let _s = span!("preprocess_scan");

        let decoded = image::load_from_memory(encoded)?;

        tracing::trace!(
            width = decoded.width(),
            height = decoded.height(),
            color = ?decoded.color(),
            encoded_bytes = encoded.len(),
            "Decoded scan"
        );

        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();

        self.preprocess_from_u8_slice(rgb.as_raw(), width, height)
    }

    pub fn preprocess_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Array<f32, IxDyn>, PreprocessError> {
        let encoded = std::fs::read(path)?;
        self.preprocess_bytes(&encoded)
    }

    /// Resize and normalize raw RGB pixels in HWC layout.
    pub fn preprocess_from_u8_slice(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Array<f32, IxDyn>, PreprocessError> {
        let resized = self.resize(pixels, width, height)?;
        self.normalize(&resized)
    }

    /// Stretch to the input size; aspect ratio is not preserved.
    fn resize(&self, pixels: &[u8], width: u32, height: u32) -> Result<Image<'static>, PreprocessError> {
        let _s = span_debug!("resize");

        let src = ImageRef::new(width, height, pixels, PixelType::U8x3)?;
        let mut resized = Image::new(self.input_size.0, self.input_size.1, PixelType::U8x3);

        Resizer::new().resize(
            &src,
            &mut resized,
            &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
        )?;

        Ok(resized)
    }

    fn normalize(&self, image: &Image) -> Result<Array<f32, IxDyn>, PreprocessError> {
        let _s = span_debug!("normalize");

        let width = image.width() as usize;
        let height = image.height() as usize;
        let buf = image.buffer();

        let mut output = Vec::with_capacity(buf.len());
        for px in buf.chunks_exact(3) {
            let ordered = match self.channel_order {
                ChannelOrder::Rgb => [px[0], px[1], px[2]],
                ChannelOrder::Bgr => [px[2], px[1], px[0]],
            };
            output.extend(ordered.iter().map(|&v| v as f32 / 255.0));
        }

        Ok(Array::from_shape_vec(IxDyn(&[1, height, width, 3]), output)?)
    }
}

impl Default for CpuPreProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_SIZE, ChannelOrder::default())
    }
}

impl Preprocess for CpuPreProcessor {
    fn preprocess(&self, encoded: &[u8]) -> Result<Array<f32, IxDyn>, PreprocessError> {
        self.preprocess_bytes(encoded)
    }

    fn input_size(&self) -> (u32, u32) {
        self.input_size
    }
}
