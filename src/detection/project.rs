//! Model-space detections -> labelled source-frame detections.

use nalgebra::Point2;

use crate::detection::{LetterboxTransform, RawDetection, Rect};
use crate::error::{PipelineError, Result};

/// Final detection handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Box in source-frame pixels, clipped to the frame.
    pub bbox: Rect,
    pub score: f32,
    pub class_index: usize,
    pub label: String,
}

impl Detection {
    /// Overlay caption, e.g. `"person - 87.5%"`.
    pub fn caption(&self) -> String {
        format!("{} - {:.1}%", self.label, self.score * 100.0)
    }
}

/// Map the detections at `indices` back into source pixels and label them.
///
/// Both corners go through [`LetterboxTransform::inverse`] independently.
/// A class index without a label means the model descriptor does not match
/// the network, and fails the whole frame. So does an index past the end of
/// `detections`.
pub fn project(
    detections: &[RawDetection],
    indices: &[usize],
    transform: &LetterboxTransform,
    labels: &[String],
) -> Result<Vec<Detection>> {
    indices
        .iter()
        .map(|&i| {
            let raw = detections
                .get(i)
                .ok_or(PipelineError::DetectionIndexOutOfRange {
                    index: i,
                    candidates: detections.len(),
                })?;
            let label = labels
                .get(raw.class_index)
                .ok_or(PipelineError::LabelIndexOutOfRange {
                    index: raw.class_index,
                    labels: labels.len(),
                })?;

            let top_left = transform.inverse(Point2::new(raw.bbox.x1, raw.bbox.y1));
            let bottom_right = transform.inverse(Point2::new(raw.bbox.x2, raw.bbox.y2));

            Ok(Detection {
                bbox: Rect::new(top_left.x, top_left.y, bottom_right.x, bottom_right.y)
                    .normalized(),
                score: raw.score,
                class_index: raw.class_index,
                label: label.clone(),
            })
        })
        .collect()
}
