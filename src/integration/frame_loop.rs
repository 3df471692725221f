//! Cooperative, cancellable per-frame detection loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::detection::ModelDescriptor;
use crate::error::{PipelineError, Result};
use crate::integration::{Detector, FrameSource, Network, RefreshClock, Renderer};

/// Lifecycle of a [`FrameLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    /// No loop task is running.
    #[default]
    Idle,
    /// Processing one frame per refresh.
    Running,
    /// Stop requested; the task exits at its next cancellation check.
    Stopping,
}

/// How a loop ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// `stop()` was observed.
    Stopped,
    /// The frame source reported no dimensions and no active stream.
    SourceClosed,
}

#[derive(Debug, Default)]
struct LoopShared {
    state: Mutex<LoopState>,
    cancelled: AtomicBool,
}

impl LoopShared {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn set_state(&self, state: LoopState) {
        *self.state.lock() = state;
    }
}

/// Returns the loop to `Idle` when the task ends, including by panic.
struct IdleOnExit(Arc<LoopShared>);

impl Drop for IdleOnExit {
    fn drop(&mut self) {
        self.0.set_state(LoopState::Idle);
    }
}

/// Drives preprocess -> network -> decode -> NMS -> project -> draw once per
/// display refresh, with exactly one frame in flight.
///
/// The next refresh is only awaited after the current frame has been drawn,
/// so a slow network slows the loop down instead of queueing frames.
#[derive(Debug, Default)]
pub struct FrameLoop {
    shared: Arc<LoopShared>,
    task: Option<JoinHandle<Result<LoopExit>>>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoopState {
        *self.shared.state.lock()
    }

    /// Start detecting with default thresholds.
    ///
    /// Fails with [`PipelineError::ModelNotReady`] if the model or the network
    /// has not been loaded yet. Must be called from within a Tokio runtime;
    /// returns as soon as the loop task is spawned.
    pub fn start<S, N, R, C>(
        &mut self,
        source: S,
        model: Option<Arc<ModelDescriptor>>,
        network: Option<Arc<N>>,
        renderer: Arc<R>,
        clock: C,
    ) -> Result<()>
    where
        S: FrameSource + 'static,
        N: Network + 'static,
        R: Renderer + ?Sized + 'static,
        C: RefreshClock + 'static,
    {
        let model = model.ok_or(PipelineError::ModelNotReady("model descriptor"))?;
        let network = network.ok_or(PipelineError::ModelNotReady("network"))?;
        self.start_detector(source, Detector::new(network, model), renderer, clock)
    }

    /// Start with a prepared (configured, warmed-up) detector.
    ///
    /// A loop that ended on its own must be collected with [`FrameLoop::join`]
    /// first; until then this fails with [`PipelineError::NotJoined`].
    pub fn start_detector<S, N, R, C>(
        &mut self,
        source: S,
        detector: Detector<N>,
        renderer: Arc<R>,
        clock: C,
    ) -> Result<()>
    where
        S: FrameSource + 'static,
        N: Network + 'static,
        R: Renderer + ?Sized + 'static,
        C: RefreshClock + 'static,
    {
        {
            let mut state = self.shared.state.lock();
            if *state != LoopState::Idle {
                return Err(PipelineError::AlreadyRunning);
            }
            if self.task.is_some() {
                return Err(PipelineError::NotJoined);
            }
            *state = LoopState::Running;
            self.shared.cancelled.store(false, Ordering::SeqCst);
        }

        let input = detector.model().input_dims();
        info!(
            input = format!("{}x{}", input.width, input.height),
            classes = detector.model().num_classes(),
            "frame loop started"
        );

        let shared = Arc::clone(&self.shared);
        self.task = Some(tokio::spawn(run(shared, source, detector, renderer, clock)));
        Ok(())
    }

    /// Request the loop to stop at its next frame boundary.
    ///
    /// Idempotent and safe to call while idle. The overlay keeps its last
    /// drawing; clearing it is up to the caller.
    pub fn stop(&self) {
        self.shared.cancelled.store(true, Ordering::SeqCst);
        let mut state = self.shared.state.lock();
        if *state == LoopState::Running {
            *state = LoopState::Stopping;
            info!("frame loop stopping");
        }
    }

    /// Wait for the loop task to finish.
    ///
    /// Returns how the loop ended, or the fatal error that ended it. Returns
    /// [`LoopExit::Stopped`] immediately when no task was started.
    pub async fn join(&mut self) -> Result<LoopExit> {
        match self.task.take() {
            Some(task) => task.await?,
            None => Ok(LoopExit::Stopped),
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        // A detached task still observes the flag and winds down.
        self.shared.cancelled.store(true, Ordering::SeqCst);
    }
}

async fn run<S, N, R, C>(
    shared: Arc<LoopShared>,
    mut source: S,
    mut detector: Detector<N>,
    renderer: Arc<R>,
    mut clock: C,
) -> Result<LoopExit>
where
    S: FrameSource,
    N: Network,
    R: Renderer + ?Sized,
    C: RefreshClock,
{
    let _idle = IdleOnExit(Arc::clone(&shared));
    let result = drive(&shared, &mut source, &mut detector, renderer.as_ref(), &mut clock).await;

    match &result {
        Ok(exit) => info!(?exit, "frame loop exited"),
        Err(err) => {
            warn!(error = %err, "frame loop stopped on error");
            // Never leave boxes from a dead loop on screen.
            renderer.clear();
        }
    }

    result
}

async fn drive<S, N, R, C>(
    shared: &LoopShared,
    source: &mut S,
    detector: &mut Detector<N>,
    renderer: &R,
    clock: &mut C,
) -> Result<LoopExit>
where
    S: FrameSource,
    N: Network,
    R: Renderer + ?Sized,
    C: RefreshClock,
{
    let mut frame_index: u64 = 0;

    loop {
        clock.next_refresh().await;

        if shared.is_cancelled() {
            return Ok(LoopExit::Stopped);
        }

        if source.dimensions().is_empty() {
            if !source.has_active_stream() {
                renderer.clear();
                return Ok(LoopExit::SourceClosed);
            }
            // Stream attached but no frame decoded yet.
            continue;
        }

        let Some(frame) = source.current_frame() else {
            continue;
        };

        let detections = detector.detect(&frame).await?;

        // The network call may have outlived a stop request.
        if shared.is_cancelled() {
            debug!(frame_index, "discarding frame completed after stop");
            return Ok(LoopExit::Stopped);
        }

        renderer.draw(&detections);
        debug!(frame_index, detections = detections.len(), "frame rendered");
        frame_index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_is_idempotent_when_idle() {
        let frame_loop = FrameLoop::new();
        assert_eq!(frame_loop.state(), LoopState::Idle);
        frame_loop.stop();
        frame_loop.stop();
        assert_eq!(frame_loop.state(), LoopState::Idle);
    }

    #[tokio::test]
    async fn test_join_without_start() {
        let mut frame_loop = FrameLoop::new();
        assert_eq!(frame_loop.join().await.unwrap(), LoopExit::Stopped);
    }
}
