//! Wall-clock driver for a [`GeneratorPanel`].
//!
//! The panel runs on a virtual clock; this maps elapsed real time onto it.
//! Each frame sleeps until the panel's next deadline (never longer than the
//! frame interval), pumps the panel to the elapsed time and hands it to the
//! caller.

use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use log::debug;
use rand::Rng;

use crate::panel::GeneratorPanel;

const TARGET: &str = "patchdrift::realtime";

/// Default longest sleep between two pumps (~60 fps).
pub const DEFAULT_FRAME: Duration = Duration::from_millis(16);

#[derive(Debug)]
pub struct RealtimeDriver {
    frame: Duration,
    origin: Instant,
    base: Duration,
}

impl RealtimeDriver {
    /// Driver whose wall clock starts now, lined up with the panel's current
    /// virtual time.
    pub fn new<R: Rng>(panel: &GeneratorPanel<R>, frame: Duration) -> Self {
        Self { frame: frame.max(Duration::from_millis(1)), origin: Instant::now(), base: panel.now() }
    }

    /// Virtual time corresponding to the wall clock right now.
    #[inline]
    pub fn virtual_now(&self) -> Duration {
        self.base + self.origin.elapsed()
    }

    /// One frame: sleep, then pump. Returns the number of ticks fired.
    pub fn pump<R: Rng>(&self, panel: &mut GeneratorPanel<R>) -> usize {
        let now = self.virtual_now();
        let horizon = now + self.frame;
        let wake = panel.next_deadline().map_or(horizon, |d| d.clamp(now, horizon));
        std::thread::sleep(wake - now);
        panel.advance_to(self.virtual_now())
    }

    /// Pump until `on_frame` breaks or `limit` of real time has elapsed.
    pub fn run_for<R, F>(&self, panel: &mut GeneratorPanel<R>, limit: Option<Duration>, mut on_frame: F)
    where
        R: Rng,
        F: FnMut(&GeneratorPanel<R>, usize) -> ControlFlow<()>,
    {
        let mut frames = 0u64;
        loop {
            if limit.is_some_and(|l| self.origin.elapsed() >= l) {
                break;
            }
            let fired = self.pump(panel);
            frames += 1;
            if on_frame(panel, fired).is_break() {
                break;
            }
        }
        debug!(target: TARGET, "driver stopped after {frames} frames at {:?}", panel.now());
    }
}
