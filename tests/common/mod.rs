#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use image::{Rgb, RgbImage};
use livedetect_rs::{
    Detection, FrameDimensions, FrameSource, ModelDescriptor, Network, RefreshClock, Renderer,
};
use ndarray::{Array3, Array4};
use parking_lot::Mutex;
use tokio::sync::mpsc;

pub fn model() -> Arc<ModelDescriptor> {
    Arc::new(
        ModelDescriptor::new(
            FrameDimensions::new(640, 640),
            vec!["cone".into(), "person".into()],
        )
        .unwrap(),
    )
}

/// Build a `[1, 4 + C, N]` output from `(cx, cy, w, h, scores...)` rows.
pub fn raw_output(rows: &[Vec<f32>]) -> Array3<f32> {
    let width = rows.first().map_or(6, |r| r.len());
    let mut out = Array3::zeros((1, width, rows.len()));
    for (n, row) in rows.iter().enumerate() {
        for (k, &v) in row.iter().enumerate() {
            out[[0, k, n]] = v;
        }
    }
    out
}

/// Network returning one fixed output.
pub struct FixedNetwork {
    pub output: Array3<f32>,
    pub calls: AtomicUsize,
}

impl FixedNetwork {
    pub fn new(output: Array3<f32>) -> Self {
        Self {
            output,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Network for FixedNetwork {
    type Error = std::convert::Infallible;

    async fn execute(&self, _input: &Array4<f32>) -> Result<Array3<f32>, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.clone())
    }
}

/// Webcam-like source always serving the same frame.
pub struct StillSource {
    pub frame: RgbImage,
}

impl StillSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: RgbImage::from_pixel(width, height, Rgb([90, 90, 90])),
        }
    }
}

impl FrameSource for StillSource {
    fn dimensions(&self) -> FrameDimensions {
        FrameDimensions::new(self.frame.width(), self.frame.height())
    }

    fn has_active_stream(&self) -> bool {
        true
    }

    fn current_frame(&mut self) -> Option<RgbImage> {
        Some(self.frame.clone())
    }
}

/// Source whose stream has gone away.
pub struct ClosedSource;

impl FrameSource for ClosedSource {
    fn dimensions(&self) -> FrameDimensions {
        FrameDimensions::default()
    }

    fn has_active_stream(&self) -> bool {
        false
    }

    fn current_frame(&mut self) -> Option<RgbImage> {
        None
    }
}

/// Renderer recording every call and reporting draws on a channel.
pub struct RecordingRenderer {
    pub frames: Mutex<Vec<Vec<Detection>>>,
    pub clears: AtomicUsize,
    drawn: mpsc::UnboundedSender<usize>,
}

impl RecordingRenderer {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<usize>) {
        let (drawn, rx) = mpsc::unbounded_channel();
        let renderer = Arc::new(Self {
            frames: Mutex::new(Vec::new()),
            clears: AtomicUsize::new(0),
            drawn,
        });
        (renderer, rx)
    }

    pub fn draws(&self) -> usize {
        self.frames.lock().len()
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl Renderer for RecordingRenderer {
    fn draw(&self, detections: &[Detection]) {
        let count = {
            let mut frames = self.frames.lock();
            frames.push(detections.to_vec());
            frames.len()
        };
        let _ = self.drawn.send(count);
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

/// Refreshes only when the test sends a tick.
pub struct TickClock(pub mpsc::UnboundedReceiver<()>);

impl TickClock {
    pub fn new() -> (Self, mpsc::UnboundedSender<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(rx), tx)
    }
}

#[async_trait]
impl RefreshClock for TickClock {
    async fn next_refresh(&mut self) {
        if self.0.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}
