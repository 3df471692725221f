//! Integration module for connecting the detection pipeline to the outside.
//!
//! This module provides the traits external collaborators implement (frame
//! sources, inference backends, renderers, model catalogs) and the
//! [`FrameLoop`] that drives them.

mod catalog;
mod clock;
mod collaborators;
mod detector;
mod frame_loop;
mod network;

pub use catalog::{ModelCatalog, StaticCatalog};
pub use clock::{IntervalClock, RefreshClock};
pub use collaborators::{FrameSource, Renderer};
pub use detector::Detector;
pub use frame_loop::{FrameLoop, LoopExit, LoopState};
pub use network::Network;

#[cfg(feature = "burn-backend")]
mod burn_backend;

#[cfg(feature = "burn-backend")]
pub use burn_backend::{BurnModel, BurnNetwork, BurnNetworkError};
