//! Name → channel mapping with bulk start/stop/update.
//!
//! The registry owns every [`ChannelRunner`], the cooperative [`TimerQueue`],
//! the shared [`DriftDirection`], the random source and the virtual clock. The
//! parameter map stays with the caller and is lent to each operation that may
//! write to it, including pumping the clock with [`GeneratorRegistry::advance_to`].

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, trace, warn};
use patchdrift_core::options::GeneratorOptions;
use patchdrift_core::param::ParamMap;
use patchdrift_core::targets::is_generator_target;
use patchdrift_core::walk::DriftDirection;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::runner::{Advance, ChannelRunner, TickContext};
use crate::timer::{TimerHandle, TimerQueue};

const TARGET: &str = "patchdrift::registry";

/// All generator channels of one session.
#[derive(Debug)]
pub struct GeneratorRegistry<R = StdRng> {
    channels: HashMap<String, ChannelRunner>,
    timers: TimerQueue,
    drift: DriftDirection,
    rng: R,
    now: Duration,
}

impl GeneratorRegistry<StdRng> {
    /// Registry seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Registry with a reproducible random stream.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for GeneratorRegistry<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> GeneratorRegistry<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            channels: HashMap::new(),
            timers: TimerQueue::new(),
            drift: DriftDirection::up(),
            rng,
            now: Duration::ZERO,
        }
    }

    // ── Bulk operations ──────────────────────────────────────────────

    /// Start every allow-listed channel present in `params`.
    ///
    /// An existing channel is reactivated in place (its outstanding handle is
    /// kept so `init` cancels it). A missing channel, or any channel when
    /// `force_restart` is set, gets fresh state carrying the old handle. Each
    /// channel then runs its first advance synchronously, so every channel is
    /// primed when this returns. Names outside the allow-list are skipped.
    ///
    /// Returns the number of channels primed.
    pub fn start(&mut self, params: &mut ParamMap, force_restart: bool, options: GeneratorOptions) -> usize {
        let Self { channels, timers, drift, rng, now } = self;
        let mut ctx = TickContext { drift, rng, timers, now: *now };

        let mut primed = 0;
        for (name, binding) in params.iter_mut() {
            if !is_generator_target(name) {
                continue;
            }
            let runner = channels.entry(name.clone()).or_default();
            if force_restart {
                *runner = ChannelRunner::restarted(runner.phase());
            } else {
                runner.activate();
            }
            runner.init(name, binding, options, &mut ctx);
            primed += 1;
        }

        debug!(target: TARGET, "start: primed {primed} channels (force_restart={force_restart}, {options:?})");
        primed
    }

    /// Stop one channel. Unknown names and repeated stops are no-ops.
    pub fn stop(&mut self, name: &str) {
        match self.channels.get_mut(name) {
            Some(runner) => {
                runner.stop(&mut self.timers);
                debug!(target: TARGET, "stop: {name}");
            }
            None => debug!(target: TARGET, "stop: {name} was never started"),
        }
    }

    /// Stop every channel the registry knows about.
    pub fn stop_all(&mut self) {
        for runner in self.channels.values_mut() {
            runner.stop(&mut self.timers);
        }
        debug!(target: TARGET, "stop_all: {} channels", self.channels.len());
    }

    /// Re-prime every active channel present in `params` with `options`.
    /// Inactive and unknown channels are left untouched.
    ///
    /// Returns the number of channels re-primed.
    pub fn update(&mut self, params: &mut ParamMap, options: GeneratorOptions) -> usize {
        let Self { channels, timers, drift, rng, now } = self;
        let mut ctx = TickContext { drift, rng, timers, now: *now };

        let mut updated = 0;
        for (name, binding) in params.iter_mut() {
            let Some(runner) = channels.get_mut(name.as_str()) else { continue };
            if !runner.is_active() {
                continue;
            }
            runner.init(name, binding, options, &mut ctx);
            updated += 1;
        }

        debug!(target: TARGET, "update: re-primed {updated} channels ({options:?})");
        updated
    }

    // ── Clock ────────────────────────────────────────────────────────

    /// Run one advance cycle for `name` at the current time, as a due tick
    /// would. `None` if the channel or its binding does not exist.
    pub fn tick(&mut self, name: &str, params: &mut ParamMap) -> Option<Advance> {
        let Self { channels, timers, drift, rng, now } = self;
        let runner = channels.get_mut(name)?;
        let binding = params.get_mut(name)?;
        let mut ctx = TickContext { drift, rng, timers, now: *now };
        Some(runner.advance(name, binding, &mut ctx))
    }

    /// Move the clock to `now`, firing every tick due on the way in deadline
    /// order. Returns the number of ticks fired. The clock never moves back.
    pub fn advance_to(&mut self, now: Duration, params: &mut ParamMap) -> usize {
        let mut fired = 0;
        while let Some((handle, name)) = self.timers.pop_due(now) {
            self.now = self.now.max(handle.due());
            self.fire(&name, handle, params);
            fired += 1;
        }
        self.now = self.now.max(now);
        fired
    }

    #[inline]
    pub fn advance_by(&mut self, dt: Duration, params: &mut ParamMap) -> usize {
        self.advance_to(self.now + dt, params)
    }

    fn fire(&mut self, name: &str, handle: TimerHandle, params: &mut ParamMap) {
        let Some(runner) = self.channels.get_mut(name) else { return };
        if runner.pending() != Some(handle) {
            return;
        }
        match params.get_mut(name) {
            Some(binding) => {
                let mut ctx = TickContext {
                    drift: &self.drift,
                    rng: &mut self.rng,
                    timers: &mut self.timers,
                    now: self.now,
                };
                let out = runner.advance(name, binding, &mut ctx);
                trace!(target: TARGET, "tick {name} @ {:?}: {out:?}", self.now);
            }
            None => {
                runner.settle();
                warn!(target: TARGET, "tick {name}: binding missing, channel left idle");
            }
        }
    }

    // ── Introspection ────────────────────────────────────────────────

    #[inline] pub fn now(&self) -> Duration { self.now }
    #[inline] pub fn drift(&self) -> &DriftDirection { &self.drift }
    #[inline] pub fn timers(&self) -> &TimerQueue { &self.timers }
    #[inline] pub fn next_deadline(&self) -> Option<Duration> { self.timers.next_deadline() }

    #[inline]
    pub fn channel(&self, name: &str) -> Option<&ChannelRunner> {
        self.channels.get(name)
    }

    #[inline]
    pub fn is_active(&self, name: &str) -> bool {
        self.channels.get(name).is_some_and(ChannelRunner::is_active)
    }

    #[inline]
    pub fn pending(&self, name: &str) -> Option<TimerHandle> {
        self.channels.get(name).and_then(ChannelRunner::pending)
    }

    /// Timers actually queued for `name` (at most one by construction).
    #[inline]
    pub fn outstanding(&self, name: &str) -> usize {
        self.timers.pending_for(name)
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    pub fn active_count(&self) -> usize {
        self.channels.values().filter(|r| r.is_active()).count()
    }
}
