//! Detector and loop configuration.

use serde::Deserialize;

use crate::detection::NmsParams;
use crate::error::{PipelineError, Result};

/// Post-processing thresholds applied to every frame.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Detections scoring below this are discarded before suppression.
    pub score_threshold: f32,
    /// Boxes overlapping a kept box by more than this IoU are suppressed.
    pub iou_threshold: f32,
    /// Upper bound on detections per frame.
    pub max_outputs: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.2,
            iou_threshold: 0.45,
            max_outputs: 500,
        }
    }
}

impl DetectorConfig {
    /// Parse from JSON; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(PipelineError::InvalidConfig(format!(
                "score_threshold {} outside [0, 1]",
                self.score_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(PipelineError::InvalidConfig(format!(
                "iou_threshold {} outside [0, 1]",
                self.iou_threshold
            )));
        }
        if self.max_outputs == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_outputs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn nms_params(&self) -> NmsParams {
        NmsParams {
            score_threshold: self.score_threshold,
            iou_threshold: self.iou_threshold,
            max_outputs: self.max_outputs,
        }
    }
}

/// Highest refresh rate accepted by [`LoopConfig::validate`].
pub const MAX_FRAME_RATE: f32 = 1000.0;

/// Scheduling parameters for the frame loop.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Refresh rate the loop is paced at, in frames per second.
    pub frame_rate: f32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self { frame_rate: 60.0 }
    }
}

impl LoopConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "frame_rate {} must be a positive number",
                self.frame_rate
            )));
        }
        if self.frame_rate > MAX_FRAME_RATE {
            return Err(PipelineError::InvalidConfig(format!(
                "frame_rate {} exceeds {MAX_FRAME_RATE}",
                self.frame_rate
            )));
        }
        Ok(())
    }
}
