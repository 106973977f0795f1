//! Generator options and the control ranges they are set from.
//!
//! Options are a plain value object handed to every start/update call. The
//! three user-facing dials (volatility, switch chance, timeout) each have a
//! fixed range, step and default, captured here as [`ControlRange`]s.

use core::time::Duration;

use crate::walk::clamp_to;

/// Range, quantisation step and default of one option control.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControlRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

impl ControlRange {
    /// Clamp `x` into the range and snap it to the nearest step above `min`.
    /// Non-finite input falls back to the default.
    #[inline]
    pub fn apply(&self, x: f32) -> f32 {
        if !x.is_finite() {
            return self.default;
        }
        let x = clamp_to(x, self.min, self.max);
        if self.step <= 0.0 {
            return x;
        }
        let snapped = self.min + ((x - self.min) / self.step).round() * self.step;
        clamp_to(snapped, self.min, self.max)
    }
}

/// Half-width source of the per-step jitter.
pub const VOLATILITY: ControlRange = ControlRange { min: 0.0, max: 0.1, step: 0.001, default: 0.02 };

/// Per-step probability of reversing the shared drift.
pub const SWITCH_CHANCE: ControlRange = ControlRange { min: 0.0, max: 1.0, step: 0.01, default: 0.1 };

/// Milliseconds between two advances of a channel.
pub const TIMEOUT_MS: ControlRange = ControlRange { min: 25.0, max: 250.0, step: 5.0, default: 50.0 };

/// Options applied to every channel primed by one start/update call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeneratorOptions {
    /// Width of the uniform offset added each step (`±volatility / 2`).
    pub volatility: f32,
    /// Probability in `[0, 1]` of flipping the shared drift sign on a step.
    pub drift_switch_chance: f32,
    /// Delay between two advances of the same channel.
    pub timeout: Duration,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self::from_controls(VOLATILITY.default, SWITCH_CHANCE.default, TIMEOUT_MS.default)
    }
}

impl GeneratorOptions {
    /// Raw options, taken as given.
    #[inline]
    pub fn new(volatility: f32, drift_switch_chance: f32, timeout_ms: u64) -> Self {
        Self { volatility, drift_switch_chance, timeout: Duration::from_millis(timeout_ms) }
    }

    /// Options from raw control positions, clamped and snapped to each
    /// control's range and step.
    pub fn from_controls(volatility: f32, drift_switch_chance: f32, timeout_ms: f32) -> Self {
        let timeout_ms = TIMEOUT_MS.apply(timeout_ms);
        Self {
            volatility: VOLATILITY.apply(volatility),
            drift_switch_chance: SWITCH_CHANCE.apply(drift_switch_chance),
            // always within [25, 250]
            timeout: Duration::from_millis(timeout_ms.round() as u64),
        }
    }

    #[inline]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    #[inline]
    pub fn with_volatility(mut self, volatility: f32) -> Self {
        self.volatility = volatility;
        self
    }

    #[inline]
    pub fn with_switch_chance(mut self, chance: f32) -> Self {
        self.drift_switch_chance = chance;
        self
    }

    #[inline]
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout = Duration::from_millis(ms);
        self
    }
}
