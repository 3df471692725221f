//! Aspect-preserving resize-and-pad mapping between source frames and the
//! fixed model input.

use nalgebra::Point2;
use serde::Deserialize;

use crate::error::{PipelineError, Result};

/// Native pixel size of a frame or model input.
///
/// Sources report `0x0` while no frame is available yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub struct FrameDimensions {
    pub width: u32,
    pub height: u32,
}

impl FrameDimensions {
    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn require_positive(self) -> Result<Self> {
        if self.is_empty() {
            return Err(PipelineError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

/// Letterbox mapping for one (source size, model size) pair.
///
/// Immutable once computed; recompute when the source dimensions change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxTransform {
    scale: f32,
    pad_x: u32,
    pad_y: u32,
    resized: FrameDimensions,
    source: FrameDimensions,
    model: FrameDimensions,
}

impl LetterboxTransform {
    /// Fit `source` inside `model` preserving aspect ratio, centering the
    /// resized image with zero padding on the remaining border.
    pub fn compute(source: FrameDimensions, model: FrameDimensions) -> Result<Self> {
        let source = source.require_positive()?;
        let model = model.require_positive()?;

        let scale = (model.width as f32 / source.width as f32)
            .min(model.height as f32 / source.height as f32);

        let resized = FrameDimensions {
            width: ((source.width as f32 * scale).round() as u32).clamp(1, model.width),
            height: ((source.height as f32 * scale).round() as u32).clamp(1, model.height),
        };

        Ok(Self {
            scale,
            pad_x: (model.width - resized.width) / 2,
            pad_y: (model.height - resized.height) / 2,
            resized,
            source,
            model,
        })
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn pad_x(&self) -> u32 {
        self.pad_x
    }

    #[inline]
    pub fn pad_y(&self) -> u32 {
        self.pad_y
    }

    /// Size of the source image after scaling, before padding.
    #[inline]
    pub fn resized(&self) -> FrameDimensions {
        self.resized
    }

    #[inline]
    pub fn source(&self) -> FrameDimensions {
        self.source
    }

    #[inline]
    pub fn model(&self) -> FrameDimensions {
        self.model
    }

    /// Map a source-space point into model space.
    pub fn forward(&self, point: Point2<f32>) -> Point2<f32> {
        Point2::new(
            point.x * self.scale + self.pad_x as f32,
            point.y * self.scale + self.pad_y as f32,
        )
    }

    /// Map a model-space point back into source space, clipped to the frame.
    pub fn inverse(&self, point: Point2<f32>) -> Point2<f32> {
        let x = (point.x - self.pad_x as f32) / self.scale;
        let y = (point.y - self.pad_y as f32) / self.scale;
        Point2::new(
            x.clamp(0.0, self.source.width as f32),
            y.clamp(0.0, self.source.height as f32),
        )
    }
}
