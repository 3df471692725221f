//! Frame -> model input tensor.

use image::RgbImage;
use image::imageops::{self, FilterType};
use ndarray::Array4;
use tracing::debug;

use crate::detection::{FrameDimensions, LetterboxTransform, ModelDescriptor, TensorLayout};
use crate::error::Result;

/// Letterbox `frame` into the model input and normalize it to `[0, 1]`.
///
/// The returned tensor has a leading batch axis and follows the model's
/// layout. The frame itself is left untouched.
pub fn prepare(
    frame: &RgbImage,
    model: &ModelDescriptor,
) -> Result<(Array4<f32>, LetterboxTransform)> {
    let (width, height) = frame.dimensions();
    let transform =
        LetterboxTransform::compute(FrameDimensions::new(width, height), model.input_dims())?;
    let input = fill_input(frame, &transform, model.layout());
    Ok((input, transform))
}

/// Stateful preprocessor that keeps the letterbox transform until the
/// source dimensions change.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    model_dims: FrameDimensions,
    layout: TensorLayout,
    cached: Option<LetterboxTransform>,
}

impl Preprocessor {
    pub fn new(model: &ModelDescriptor) -> Self {
        Self {
            model_dims: model.input_dims(),
            layout: model.layout(),
            cached: None,
        }
    }

    /// Transform for `source`, recomputed only when the source size changes.
    pub fn transform_for(&mut self, source: FrameDimensions) -> Result<LetterboxTransform> {
        if let Some(cached) = self.cached.filter(|t| t.source() == source) {
            return Ok(cached);
        }

        let transform = LetterboxTransform::compute(source, self.model_dims)?;
        debug!(
            source = format!("{}x{}", source.width, source.height),
            resized = format!("{}x{}", transform.resized().width, transform.resized().height),
            scale = transform.scale(),
            pad_x = transform.pad_x(),
            pad_y = transform.pad_y(),
            "letterbox transform recomputed"
        );
        self.cached = Some(transform);
        Ok(transform)
    }

    pub fn prepare(&mut self, frame: &RgbImage) -> Result<(Array4<f32>, LetterboxTransform)> {
        let (width, height) = frame.dimensions();
        let transform = self.transform_for(FrameDimensions::new(width, height))?;
        let input = fill_input(frame, &transform, self.layout);
        Ok((input, transform))
    }
}

fn fill_input(
    frame: &RgbImage,
    transform: &LetterboxTransform,
    layout: TensorLayout,
) -> Array4<f32> {
    let resized_dims = transform.resized();
    let resized;
    let pixels = if frame.dimensions() == (resized_dims.width, resized_dims.height) {
        frame
    } else {
        // Bilinear, matching the resize the models were exported with.
        resized = imageops::resize(
            frame,
            resized_dims.width,
            resized_dims.height,
            FilterType::Triangle,
        );
        &resized
    };

    // Zero-initialized, so the letterbox border is already constant-filled.
    let mut input = Array4::<f32>::zeros(layout.shape(transform.model()));
    let (pad_x, pad_y) = (transform.pad_x(), transform.pad_y());

    for (x, y, pixel) in pixels.enumerate_pixels() {
        let col = (x + pad_x) as usize;
        let row = (y + pad_y) as usize;
        for (channel, &value) in pixel.0.iter().enumerate() {
            let value = f32::from(value) / 255.0;
            match layout {
                TensorLayout::Nhwc => input[[0, row, col, channel]] = value,
                TensorLayout::Nchw => input[[0, channel, row, col]] = value,
            }
        }
    }

    input
}
