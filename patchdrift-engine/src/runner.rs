//! Per-channel advance/reschedule loop.
//!
//! A [`ChannelRunner`] is an explicit two-state machine:
//!
//! ```text
//!            init / advance (active)
//!   Idle  ─────────────────────────────▶  Scheduled(handle)
//!    ▲                                         │
//!    └──── stop / advance (inactive) / fire ───┘
//! ```
//!
//! Invariants
//! - At most one outstanding handle: every advance cancels whatever handle is
//!   recorded before it may schedule a new one.
//! - The active check precedes the write. A stopped channel never writes, even
//!   when an advance for it is already being processed.

use std::time::Duration;

use patchdrift_core::options::GeneratorOptions;
use patchdrift_core::param::ParamBinding;
use patchdrift_core::walk::{step, DriftDirection};
use rand::Rng;

use crate::timer::{TimerHandle, TimerQueue};

/// Shortest delay between two advances of one channel. A zero timeout would
/// otherwise reschedule onto the instant being processed.
pub const MIN_TIMEOUT: Duration = Duration::from_millis(1);

/// Where a channel is in its loop.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Scheduled(TimerHandle),
}

/// Result of one advance cycle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Advance {
    /// Channel inactive: nothing written, nothing scheduled.
    Halted,
    /// New value written to parameter and widget; next advance scheduled.
    Stepped { value: f32, next: TimerHandle },
}

/// Shared state an advance needs besides the channel itself.
pub struct TickContext<'a, R: Rng + ?Sized> {
    pub drift: &'a DriftDirection,
    pub rng: &'a mut R,
    pub timers: &'a mut TimerQueue,
    pub now: Duration,
}

/// Timer lifecycle of one named generator channel.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ChannelRunner {
    active: bool,
    phase: Phase,
    options: GeneratorOptions,
}

impl ChannelRunner {
    /// Fresh active state that still remembers `phase`, so the next `init`
    /// cancels whatever that phase had outstanding.
    #[inline]
    pub fn restarted(phase: Phase) -> Self {
        Self { active: true, phase, options: GeneratorOptions::default() }
    }

    #[inline] pub fn is_active(&self) -> bool { self.active }
    #[inline] pub fn phase(&self) -> Phase { self.phase }
    #[inline] pub fn options(&self) -> GeneratorOptions { self.options }

    #[inline]
    pub fn pending(&self) -> Option<TimerHandle> {
        match self.phase {
            Phase::Scheduled(h) => Some(h),
            Phase::Idle => None,
        }
    }

    /// Mark active in place. Any outstanding handle is kept.
    #[inline]
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Deactivate and cancel the outstanding advance, if any.
    pub fn stop(&mut self, timers: &mut TimerQueue) {
        self.active = false;
        self.cancel_pending(timers);
    }

    /// (Re)prime the channel with `options` and run the first advance
    /// immediately.
    pub fn init<R: Rng + ?Sized>(
        &mut self,
        name: &str,
        binding: &mut ParamBinding,
        options: GeneratorOptions,
        ctx: &mut TickContext<'_, R>,
    ) -> Advance {
        self.cancel_pending(ctx.timers);
        self.options = options;
        self.advance(name, binding, ctx)
    }

    /// One cycle: check active, step, write, reschedule.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        name: &str,
        binding: &mut ParamBinding,
        ctx: &mut TickContext<'_, R>,
    ) -> Advance {
        self.cancel_pending(ctx.timers);
        if !self.active {
            return Advance::Halted;
        }

        let p = binding.parameter;
        let value = step(
            p.value,
            p.min,
            p.max,
            self.options.volatility,
            self.options.drift_switch_chance,
            ctx.drift,
            &mut *ctx.rng,
        );
        binding.write(value);

        let next = ctx.timers.schedule(ctx.now + self.options.timeout.max(MIN_TIMEOUT), name);
        self.phase = Phase::Scheduled(next);
        Advance::Stepped { value, next }
    }

    /// The outstanding advance has been consumed by the queue without running
    /// (its binding is gone). Back to idle.
    #[inline]
    pub(crate) fn settle(&mut self) {
        self.phase = Phase::Idle;
    }

    #[inline]
    fn cancel_pending(&mut self, timers: &mut TimerQueue) {
        if let Phase::Scheduled(h) = std::mem::take(&mut self.phase) {
            timers.cancel(h);
        }
    }
}
