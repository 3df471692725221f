//! Error types for the detection pipeline.

use thiserror::Error;

/// Boxed error produced by a [`Network`](crate::integration::Network) backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// `start` was called without a loaded model or network.
    #[error("model not ready: {0} is missing")]
    ModelNotReady(&'static str),

    /// A decoded class index has no label; descriptor and network disagree.
    #[error("class index {index} out of range for {labels} labels")]
    LabelIndexOutOfRange { index: usize, labels: usize },

    /// A selected index does not refer to a decoded candidate.
    #[error("detection index {index} out of range for {candidates} candidates")]
    DetectionIndexOutOfRange { index: usize, candidates: usize },

    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Network output does not have the `[1, 4 + num_classes, N]` layout.
    #[error("network output shape {got:?} does not match [1, {expected_rows}, N]")]
    OutputShapeMismatch { expected_rows: usize, got: Vec<usize> },

    #[error("invalid model descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown model '{0}'")]
    UnknownModel(String),

    #[error("frame loop is already running")]
    AlreadyRunning,

    /// The previous loop ended but its outcome was never collected with `join`.
    #[error("previous frame loop has not been joined")]
    NotJoined,

    /// The network invocation failed. The loop stops; restarting is up to the caller.
    #[error("network execution failed")]
    Network(#[source] BoxError),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("frame loop task failed: {0}")]
    LoopTask(#[from] tokio::task::JoinError),
}

impl PipelineError {
    /// Wrap a backend error as [`PipelineError::Network`].
    pub fn network<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
