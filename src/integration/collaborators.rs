//! Frame sources and overlay renderers driven by the frame loop.

use image::RgbImage;

use crate::detection::{Detection, FrameDimensions};

/// Live video input: a webcam, a decoded file, or a stream.
pub trait FrameSource: Send {
    /// Native size of the current frame; `0x0` while nothing is available.
    fn dimensions(&self) -> FrameDimensions;

    /// Whether a stream is still attached. A source with no stream and no
    /// dimensions is closed.
    fn has_active_stream(&self) -> bool;

    /// Grab the current frame, or `None` when no frame is ready yet.
    fn current_frame(&mut self) -> Option<RgbImage>;
}

/// Overlay surface sized to the source frame.
///
/// Only the frame loop draws on it while running; callers may clear it once
/// the loop has stopped.
pub trait Renderer: Send + Sync {
    /// Replace the overlay with `detections`.
    fn draw(&self, detections: &[Detection]);

    fn clear(&self);
}
