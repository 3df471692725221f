//! Greedy non-max suppression.

use std::cmp::Ordering;

use crate::detection::RawDetection;

/// Thresholds for [`suppress`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NmsParams {
    pub score_threshold: f32,
    pub iou_threshold: f32,
    pub max_outputs: usize,
}

impl Default for NmsParams {
    fn default() -> Self {
        Self {
            score_threshold: 0.2,
            iou_threshold: 0.45,
            max_outputs: 500,
        }
    }
}

/// Select detections to keep, returned as indices into `detections` in
/// descending score order.
///
/// Candidates scoring below the threshold are dropped. The best remaining
/// candidate is kept and every other candidate overlapping it by more than
/// `iou_threshold` is removed, until none remain or `max_outputs` are kept.
/// Equal scores keep their input order.
pub fn suppress(detections: &[RawDetection], params: &NmsParams) -> Vec<usize> {
    let mut candidates: Vec<usize> = (0..detections.len())
        .filter(|&i| detections[i].score >= params.score_threshold)
        .collect();

    // Stable, so ties stay in decode order.
    candidates.sort_by(|&a, &b| {
        detections[b]
            .score
            .partial_cmp(&detections[a].score)
            .unwrap_or(Ordering::Equal)
    });

    let mut suppressed = vec![false; candidates.len()];
    let mut selected = Vec::new();

    for i in 0..candidates.len() {
        if selected.len() >= params.max_outputs {
            break;
        }
        if suppressed[i] {
            continue;
        }

        let best = &detections[candidates[i]].bbox;
        selected.push(candidates[i]);

        for j in (i + 1)..candidates.len() {
            if !suppressed[j] && best.iou(&detections[candidates[j]].bbox) > params.iou_threshold {
                suppressed[j] = true;
            }
        }
    }

    selected
}
