//! Burn inference backend.
//!
//! This module provides a `BurnNetwork` that implements `Network` for
//! detection models built with the Burn framework.
//!
//! # Example
//!
//! ```ignore
//! use livedetect_rs::integration::{BurnModel, BurnNetwork};
//! use burn::backend::NdArray;
//!
//! // Implement BurnModel for your detection model
//! struct MyYoloModel { /* ... */ }
//!
//! impl BurnModel<NdArray> for MyYoloModel {
//!     fn forward(&self, input: burn::tensor::Tensor<NdArray, 4>) -> burn::tensor::Tensor<NdArray, 3> {
//!         // Run inference
//!     }
//! }
//!
//! let model = MyYoloModel::load("model.bin");
//! let network = BurnNetwork::new(model, Default::default());
//! ```

use async_trait::async_trait;
use burn::prelude::*;
use burn::tensor::TensorData;
use ndarray::{Array3, Array4};
use thiserror::Error;

use crate::integration::Network;

/// Error type for Burn inference failures.
#[derive(Error, Debug, Clone)]
pub enum BurnNetworkError {
    /// Output tensor could not be read back as `f32`.
    #[error("failed to read output tensor: {0}")]
    OutputData(String),
    /// Output element count does not match its reported shape.
    #[error("output of shape {0:?} could not be converted")]
    OutputShape([usize; 3]),
}

/// Trait for Burn-based detection models.
///
/// Implement this trait for your specific model architecture.
pub trait BurnModel<B: Backend>: Send + Sync {
    /// Run forward pass on the input tensor.
    ///
    /// # Arguments
    /// * `input` - Letterboxed input in the layout the model descriptor declares
    ///
    /// # Returns
    /// Raw output of shape `[1, 4 + num_classes, N]`.
    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 3>;
}

/// Burn-based network implementing [`Network`].
pub struct BurnNetwork<B: Backend, M: BurnModel<B>> {
    model: M,
    device: B::Device,
}

impl<B: Backend, M: BurnModel<B>> BurnNetwork<B, M> {
    /// Create a new Burn network with the given model and device.
    pub fn new(model: M, device: B::Device) -> Self {
        Self { model, device }
    }

    fn to_tensor(&self, input: &Array4<f32>) -> Tensor<B, 4> {
        let shape = input.shape().to_vec();
        let data: Vec<f32> = input.iter().copied().collect();
        Tensor::from_data(TensorData::new(data, shape), &self.device)
    }

    fn to_array(output: Tensor<B, 3>) -> Result<Array3<f32>, BurnNetworkError> {
        let dims = output.dims();
        let data = output
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| BurnNetworkError::OutputData(format!("{e:?}")))?;
        Array3::from_shape_vec((dims[0], dims[1], dims[2]), data)
            .map_err(|_| BurnNetworkError::OutputShape(dims))
    }
}

#[async_trait]
impl<B: Backend, M: BurnModel<B>> Network for BurnNetwork<B, M> {
    type Error = BurnNetworkError;

    async fn execute(&self, input: &Array4<f32>) -> Result<Array3<f32>, Self::Error> {
        let tensor = self.to_tensor(input);
        Self::to_array(self.model.forward(tensor))
    }
}
