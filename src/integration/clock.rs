//! Display refresh pacing for the frame loop.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{self, Interval, MissedTickBehavior};

use crate::config::LoopConfig;
use crate::error::Result;

/// Yields until the next display refresh.
#[async_trait]
pub trait RefreshClock: Send {
    async fn next_refresh(&mut self);
}

/// Refreshes at a fixed rate.
///
/// A frame that overruns its slot delays the following ticks instead of
/// triggering a burst of catch-up refreshes.
#[derive(Debug)]
pub struct IntervalClock {
    interval: Interval,
}

impl IntervalClock {
    /// Must be called from within a Tokio runtime.
    pub fn new(config: &LoopConfig) -> Result<Self> {
        config.validate()?;
        let period = Duration::from_secs_f64(1.0 / f64::from(config.frame_rate));
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Ok(Self { interval })
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

#[async_trait]
impl RefreshClock for IntervalClock {
    async fn next_refresh(&mut self) {
        self.interval.tick().await;
    }
}
