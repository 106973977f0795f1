//! Generator panel: the binding-side glue around a registry.
//!
//! Mirrors the generator section of the synth UI: a master enable toggle and
//! three dials (volatility, switch chance, timeout). Turning the toggle on
//! starts every allow-listed channel with the current dial values; turning it
//! off stops every channel. Dial changes are debounced and applied to the
//! running channels with `update`, but only if the toggle is still on when the
//! debounce fires.
//!
//! The panel owns the parameter map and pumps both the debounce and the
//! registry from a single clock.

use std::time::Duration;

use log::{debug, info};
use patchdrift_core::options::{GeneratorOptions, SWITCH_CHANCE, TIMEOUT_MS, VOLATILITY};
use patchdrift_core::param::{ParamBinding, ParamMap};
use rand::rngs::StdRng;
use rand::Rng;

use crate::debounce::Debounce;
use crate::registry::GeneratorRegistry;

const TARGET: &str = "patchdrift::panel";

#[derive(Debug)]
pub struct GeneratorPanel<R = StdRng> {
    params: ParamMap,
    registry: GeneratorRegistry<R>,
    enabled: bool,
    volatility: f32,
    switch_chance: f32,
    timeout_ms: f32,
    pending: Debounce<GeneratorOptions>,
}

impl GeneratorPanel<StdRng> {
    pub fn new(params: ParamMap) -> Self {
        Self::with_registry(params, GeneratorRegistry::new())
    }

    pub fn seeded(params: ParamMap, seed: u64) -> Self {
        Self::with_registry(params, GeneratorRegistry::seeded(seed))
    }
}

impl<R: Rng> GeneratorPanel<R> {
    /// Panel over `params` with every dial at its default and the toggle off.
    pub fn with_registry(params: ParamMap, registry: GeneratorRegistry<R>) -> Self {
        Self {
            params,
            registry,
            enabled: false,
            volatility: VOLATILITY.default,
            switch_chance: SWITCH_CHANCE.default,
            timeout_ms: TIMEOUT_MS.default,
            pending: Debounce::default(),
        }
    }

    /// Options described by the dials right now.
    #[inline]
    pub fn options(&self) -> GeneratorOptions {
        GeneratorOptions::from_controls(self.volatility, self.switch_chance, self.timeout_ms)
    }

    // ── Toggle ───────────────────────────────────────────────────────

    /// Flip the master toggle. Repeating the current state does nothing.
    pub fn set_enabled(&mut self, on: bool) {
        if on == self.enabled {
            return;
        }
        self.enabled = on;
        if on {
            let options = self.options();
            let primed = self.registry.start(&mut self.params, false, options);
            info!(target: TARGET, "generator on: {primed} channels");
        } else {
            self.registry.stop_all();
            info!(target: TARGET, "generator off");
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // ── Dials ────────────────────────────────────────────────────────

    pub fn set_volatility(&mut self, v: f32) {
        self.volatility = VOLATILITY.apply(v);
        self.queue_update();
    }

    pub fn set_switch_chance(&mut self, c: f32) {
        self.switch_chance = SWITCH_CHANCE.apply(c);
        self.queue_update();
    }

    pub fn set_timeout_ms(&mut self, ms: f32) {
        self.timeout_ms = TIMEOUT_MS.apply(ms);
        self.queue_update();
    }

    #[inline] pub fn volatility(&self) -> f32 { self.volatility }
    #[inline] pub fn switch_chance(&self) -> f32 { self.switch_chance }
    #[inline] pub fn timeout_ms(&self) -> f32 { self.timeout_ms }

    fn queue_update(&mut self) {
        let options = self.options();
        self.pending.push(options, self.registry.now());
    }

    // ── Clock ────────────────────────────────────────────────────────

    /// Pump the panel to `now`: due debounced updates and due ticks run in
    /// time order.
    pub fn advance_to(&mut self, now: Duration) -> usize {
        let mut fired = 0;
        while let Some(due) = self.pending.deadline().filter(|&d| d <= now) {
            fired += self.registry.advance_to(due, &mut self.params);
            if let Some(options) = self.pending.poll(due) {
                if self.enabled {
                    let n = self.registry.update(&mut self.params, options);
                    debug!(target: TARGET, "debounced update applied to {n} channels");
                }
            }
        }
        fired + self.registry.advance_to(now, &mut self.params)
    }

    #[inline]
    pub fn advance_by(&mut self, dt: Duration) -> usize {
        self.advance_to(self.registry.now() + dt)
    }

    /// Next instant at which pumping would do anything.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.registry.next_deadline(), self.pending.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.registry.now()
    }

    // ── Surface ──────────────────────────────────────────────────────

    /// Add or replace a binding. A replaced channel keeps its generator
    /// state and walks the new binding from its next tick.
    pub fn insert_param(&mut self, name: impl Into<String>, binding: ParamBinding) {
        self.params.insert(name.into(), binding);
    }

    #[inline]
    pub fn value(&self, name: &str) -> Option<f32> {
        self.params.get(name).map(|b| b.parameter.value)
    }

    #[inline] pub fn params(&self) -> &ParamMap { &self.params }
    #[inline] pub fn registry(&self) -> &GeneratorRegistry<R> { &self.registry }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchdrift_core::param::Parameter;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn panel() -> GeneratorPanel {
        let params: ParamMap = ["osc1", "osc2", "poly/fm/freq"]
            .iter()
            .map(|n| ((*n).to_string(), ParamBinding::new(Parameter::new(0.0, 1.0, 0.5))))
            .collect();
        GeneratorPanel::seeded(params, 99)
    }

    #[test]
    fn toggle_starts_and_stops_allow_listed_channels() {
        let mut p = panel();
        assert_eq!(p.registry().active_count(), 0);

        p.set_enabled(true);
        assert!(p.registry().is_active("osc1"));
        assert!(p.registry().is_active("osc2"));
        assert!(p.registry().channel("poly/fm/freq").is_none());
        assert_eq!(p.value("poly/fm/freq"), Some(0.5));

        p.set_enabled(false);
        assert_eq!(p.registry().active_count(), 0);
        assert!(p.registry().timers().is_empty());
    }

    #[test]
    fn dial_burst_is_applied_once_after_quiet_period() {
        let mut p = panel();
        p.set_enabled(true);
        assert_eq!(p.registry().pending("osc1").unwrap().due(), ms(50));

        p.set_timeout_ms(80.0);
        p.advance_to(ms(40));
        p.set_timeout_ms(100.0);

        // Old cadence still running until the debounce fires at 240 ms.
        p.advance_to(ms(239));
        assert_eq!(p.registry().channel("osc1").unwrap().options().timeout_ms(), 50);

        p.advance_to(ms(240));
        let ch = p.registry().channel("osc1").unwrap();
        assert_eq!(ch.options().timeout_ms(), 100);
        assert_eq!(ch.pending().unwrap().due(), ms(340));
    }

    #[test]
    fn debounced_update_is_dropped_when_toggle_is_off() {
        let mut p = panel();
        p.set_enabled(true);
        p.set_volatility(0.09);
        p.set_enabled(false);
        let frozen = p.value("osc1");

        p.advance_to(ms(1_000));
        assert_eq!(p.value("osc1"), frozen);
        assert_eq!(p.registry().active_count(), 0);
        assert!(p.registry().timers().is_empty());
    }

    #[test]
    fn enabling_uses_current_dials() {
        let mut p = panel();
        p.set_timeout_ms(120.0);
        p.set_switch_chance(0.0);
        p.set_enabled(true);
        let ch = p.registry().channel("osc2").unwrap();
        assert_eq!(ch.options().timeout_ms(), 120);
        assert_eq!(ch.options().drift_switch_chance, 0.0);
    }

    #[test]
    fn next_deadline_covers_debounce_and_ticks() {
        let mut p = panel();
        assert_eq!(p.next_deadline(), None);
        p.set_volatility(0.05);
        assert_eq!(p.next_deadline(), Some(ms(200)));
        p.set_enabled(true);
        assert_eq!(p.next_deadline(), Some(ms(50)));
    }

    #[test]
    fn repeated_enable_is_a_noop() {
        let mut p = panel();
        p.set_enabled(true);
        let v = p.value("osc1");
        p.set_enabled(true);
        assert_eq!(p.value("osc1"), v);
    }
}
