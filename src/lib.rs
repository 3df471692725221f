//! Real-time object detection over live video.
//!
//! The [`detection`] module holds the numerical pipeline: letterboxing a frame
//! into a fixed model input, decoding raw network output, non-max suppression
//! and projecting boxes back into source pixels. The [`integration`] module
//! connects that pipeline to external collaborators (frame sources, networks,
//! renderers, model catalogs) and drives it with a cancellable [`FrameLoop`].

pub mod config;
pub mod detection;
pub mod error;
pub mod integration;

pub use config::{DetectorConfig, LoopConfig, MAX_FRAME_RATE};
pub use detection::{
    Detection, FrameDimensions, LetterboxTransform, ModelDescriptor, NmsParams, RawDetection,
    Rect, TensorLayout,
};
pub use error::{PipelineError, Result};
pub use integration::{
    Detector, FrameLoop, FrameSource, IntervalClock, LoopExit, LoopState, ModelCatalog, Network,
    RefreshClock, Renderer, StaticCatalog,
};
