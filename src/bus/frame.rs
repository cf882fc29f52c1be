//! Frame Loop
//!
//! A held-down command only receives Continue events if something keeps
//! ticking the bus. Inside the host that is the simulator's own frame loop.
//! Outside of it, [`FrameLoop`] plays that role: it calls
//! [`InMemoryBus::tick`] once per interval on a Tokio timer.
//!
//! The loop never spawns. It runs on the caller's task, so the bus (which is
//! single-threaded and not `Send`) can be borrowed for the whole run.

use super::memory::InMemoryBus;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, trace};

/// Configuration for the frame loop.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Time between two frames (default: 50ms)
    pub interval: Duration,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(50),
        }
    }
}

/// Summary of a finished frame loop run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames that elapsed
    pub frames: u64,
    /// Continue events emitted across all frames
    pub continues: u64,
}

/// Drives periodic Continue events for held-down commands.
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    config: FrameConfig,
}

impl FrameLoop {
    pub fn new(config: FrameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Ticks `bus` for exactly `frames` frames.
    ///
    /// Frames that fall behind schedule are delayed rather than bunched up, so
    /// a slow handler never causes a burst of Continue events.
    pub async fn run(&self, bus: &InMemoryBus, frames: u64) -> FrameStats {
        // Tokio rejects a zero period.
        let period = self.config.interval.max(Duration::from_millis(1));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick of a Tokio interval completes immediately.
        ticker.tick().await;

        let mut stats = FrameStats::default();
        for frame in 0..frames {
            ticker.tick().await;
            let ticked = bus.tick();
            trace!(frame, ticked, "frame");
            stats.frames += 1;
            stats.continues += ticked as u64;
        }

        debug!(
            frames = stats.frames,
            continues = stats.continues,
            "frame loop finished"
        );
        stats
    }
}
