//! Detector combining preprocessing, inference and post-processing.

use std::sync::Arc;

use image::RgbImage;
use ndarray::{Array4, ArrayView3};
use tracing::{debug, info};

use crate::config::DetectorConfig;
use crate::detection::{
    Detection, LetterboxTransform, ModelDescriptor, Preprocessor, decode, project, suppress,
};
use crate::error::{PipelineError, Result};
use crate::integration::{ModelCatalog, Network};

/// Runs the full detection chain on one frame at a time.
///
/// Bundles a [`Network`] with the descriptor it was built for. The letterbox
/// transform is kept between frames of the same size.
pub struct Detector<N: Network> {
    network: Arc<N>,
    model: Arc<ModelDescriptor>,
    config: DetectorConfig,
    preprocessor: Preprocessor,
}

impl<N: Network> Detector<N> {
    /// Create a detector with default thresholds.
    pub fn new(network: Arc<N>, model: Arc<ModelDescriptor>) -> Self {
        let preprocessor = Preprocessor::new(&model);
        Self {
            network,
            model,
            config: DetectorConfig::default(),
            preprocessor,
        }
    }

    /// Look the model up in `catalog` and pair it with `network`.
    pub fn from_catalog(
        catalog: &impl ModelCatalog,
        model_id: &str,
        network: Arc<N>,
    ) -> Result<Self> {
        let model = catalog.descriptor(model_id)?;
        Ok(Self::new(network, model))
    }

    pub fn with_config(mut self, config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn model(&self) -> &ModelDescriptor {
        &self.model
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run the network once on an all-ones input and check the output layout.
    ///
    /// Success is the signal that the model is loaded and the loop may start.
    pub async fn warm_up(&self) -> Result<()> {
        let input = Array4::<f32>::ones(self.model.input_shape());
        let output = self
            .network
            .execute(&input)
            .await
            .map_err(PipelineError::network)?;
        let candidates = decode(output.view(), self.model.num_classes())?.len();

        info!(
            input = ?self.model.input_shape(),
            classes = self.model.num_classes(),
            candidates,
            "model warmed up"
        );
        Ok(())
    }

    /// Detect objects in a single frame, returning boxes in frame pixels.
    pub async fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Detection>> {
        let (input, transform) = self.preprocessor.prepare(frame)?;
        let output = self
            .network
            .execute(&input)
            .await
            .map_err(PipelineError::network)?;
        self.postprocess(output.view(), &transform)
    }

    fn postprocess(
        &self,
        output: ArrayView3<'_, f32>,
        transform: &LetterboxTransform,
    ) -> Result<Vec<Detection>> {
        let candidates = decode(output, self.model.num_classes())?;
        let keep = suppress(&candidates, &self.config.nms_params());
        debug!(
            candidates = candidates.len(),
            kept = keep.len(),
            "suppression complete"
        );
        project(&candidates, &keep, transform, self.model.labels())
    }
}
