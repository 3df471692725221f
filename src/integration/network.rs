//! Trait for inference backends.

use async_trait::async_trait;
use ndarray::{Array3, Array4};

/// Opaque neural network: a fixed-shape input tensor in, a fixed-shape
/// output tensor out.
///
/// Implement this trait to connect any inference runtime to the pipeline.
/// The input follows [`ModelDescriptor::input_shape`](crate::ModelDescriptor::input_shape);
/// the output must be `[1, 4 + num_classes, N]`.
///
/// # Example
///
/// ```ignore
/// use livedetect_rs::Network;
/// use ndarray::{Array3, Array4};
///
/// struct MyRuntime { /* session handle */ }
///
/// #[async_trait::async_trait]
/// impl Network for MyRuntime {
///     type Error = std::io::Error;
///
///     async fn execute(&self, input: &Array4<f32>) -> Result<Array3<f32>, Self::Error> {
///         // Run inference and return the raw output
///         Ok(Array3::zeros((1, 84, 8400)))
///     }
/// }
/// ```
#[async_trait]
pub trait Network: Send + Sync {
    /// Error type for inference failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run one forward pass. May suspend; the frame loop awaits it before
    /// doing anything else.
    async fn execute(&self, input: &Array4<f32>) -> Result<Array3<f32>, Self::Error>;
}
