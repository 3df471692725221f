//! Raw network output -> candidate boxes.

use ndarray::{ArrayView3, Axis, s};

use crate::detection::Rect;
use crate::error::{PipelineError, Result};

/// One candidate from the network output, before thresholding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawDetection {
    /// Box corners in model-space pixels.
    pub bbox: Rect,
    /// Best class confidence.
    pub score: f32,
    /// Index of the best class; the first one wins on ties.
    pub class_index: usize,
}

impl RawDetection {
    pub fn new(bbox: Rect, score: f32, class_index: usize) -> Self {
        Self {
            bbox,
            score,
            class_index,
        }
    }
}

/// Decode a `[1, 4 + num_classes, N]` output into exactly `N` detections.
///
/// Each column holds `(cx, cy, w, h)` followed by the per-class scores.
pub fn decode(output: ArrayView3<'_, f32>, num_classes: usize) -> Result<Vec<RawDetection>> {
    let rows = 4 + num_classes;
    let shape = output.shape();
    if num_classes == 0 || shape[0] != 1 || shape[1] != rows {
        return Err(PipelineError::OutputShapeMismatch {
            expected_rows: rows,
            got: shape.to_vec(),
        });
    }

    // [4 + C, N] -> [N, 4 + C]
    let candidates = output.index_axis(Axis(0), 0).reversed_axes();

    let detections = candidates
        .outer_iter()
        .map(|row| {
            let bbox = Rect::from_xywh(row[0], row[1], row[2], row[3]);
            let (class_index, score) = row
                .slice(s![4..])
                .iter()
                .copied()
                .enumerate()
                .fold((0, f32::NEG_INFINITY), |best, (i, score)| {
                    if score > best.1 { (i, score) } else { best }
                });
            RawDetection::new(bbox, score, class_index)
        })
        .collect();

    Ok(detections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    /// Build a `[1, 4 + C, N]` output from per-candidate rows.
    fn output(rows: &[&[f32]]) -> Array3<f32> {
        let width = rows[0].len();
        let mut out = Array3::zeros((1, width, rows.len()));
        for (n, row) in rows.iter().enumerate() {
            for (k, &v) in row.iter().enumerate() {
                out[[0, k, n]] = v;
            }
        }
        out
    }

    #[test]
    fn test_decode_center_boxes() {
        let out = output(&[
            &[50.0, 60.0, 20.0, 40.0, 0.1, 0.8, 0.3],
            &[10.0, 10.0, 4.0, 2.0, 0.6, 0.2, 0.1],
        ]);
        let dets = decode(out.view(), 3).unwrap();

        assert_eq!(dets.len(), 2);
        assert_eq!(dets[0].bbox, Rect::new(40.0, 40.0, 60.0, 80.0));
        assert_eq!(dets[0].class_index, 1);
        assert_eq!(dets[0].score, 0.8);
        assert_eq!(dets[1].bbox, Rect::new(8.0, 9.0, 12.0, 11.0));
        assert_eq!(dets[1].class_index, 0);
    }

    #[test]
    fn test_decode_keeps_every_candidate() {
        let out = output(&[
            &[1.0, 1.0, 1.0, 1.0, 0.0],
            &[2.0, 2.0, 1.0, 1.0, 0.01],
            &[3.0, 3.0, 1.0, 1.0, 0.99],
        ]);
        let dets = decode(out.view(), 1).unwrap();
        assert_eq!(dets.len(), 3);
        assert_eq!(dets[0].score, 0.0);
    }

    #[test]
    fn test_argmax_tie_prefers_first_class() {
        let out = output(&[&[0.0, 0.0, 1.0, 1.0, 0.5, 0.7, 0.7]]);
        let dets = decode(out.view(), 3).unwrap();
        assert_eq!(dets[0].class_index, 1);
    }

    #[test]
    fn test_shape_mismatch() {
        let out = Array3::<f32>::zeros((1, 6, 10));
        let err = decode(out.view(), 3).unwrap_err();
        match err {
            PipelineError::OutputShapeMismatch { expected_rows, got } => {
                assert_eq!(expected_rows, 7);
                assert_eq!(got, vec![1, 6, 10]);
            }
            other => panic!("unexpected error: {other}"),
        }

        let batched = Array3::<f32>::zeros((2, 5, 10));
        assert!(decode(batched.view(), 1).is_err());
    }

    #[test]
    fn test_empty_output() {
        let out = Array3::<f32>::zeros((1, 5, 0));
        assert!(decode(out.view(), 1).unwrap().is_empty());
    }
}
