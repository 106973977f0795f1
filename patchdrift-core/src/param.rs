//! Parameter surface as seen by the generator.
//!
//! The binding (a UI, a host through FFI, a patch file) owns these values.
//! The generator only reads `min`/`max`/`value` and writes `value` on the
//! parameter and on its paired display widget.

use std::collections::BTreeMap;

use crate::walk::clamp_to;

/// A live synth parameter: `{ min, max, value }`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Parameter {
    pub min: f32,
    pub max: f32,
    pub value: f32,
}

impl Parameter {
    /// Build a parameter, clamping `value` into `[min, max]`.
    #[inline]
    pub fn new(min: f32, max: f32, value: f32) -> Self {
        Self { min, max, value: clamp_to(value, min, max) }
    }

    /// Write a value, clamped into the parameter's range.
    #[inline]
    pub fn set_value(&mut self, v: f32) {
        self.value = clamp_to(v, self.min, self.max);
    }

    #[inline]
    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }

    /// Position of the current value in `[0, 1]` (0 for an empty range).
    #[inline]
    pub fn normalized(&self) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 { 0.0 } else { (self.value - self.min) / span }
    }
}

/// On-screen control mirroring a parameter (dial, slider, number box).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DisplayWidget {
    pub value: f32,
}

/// One entry of the parameter map: a parameter and the widget showing it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParamBinding {
    pub parameter: Parameter,
    pub widget: DisplayWidget,
}

impl ParamBinding {
    /// Bind a parameter to a widget showing its current value.
    #[inline]
    pub fn new(parameter: Parameter) -> Self {
        Self { parameter, widget: DisplayWidget { value: parameter.value } }
    }

    /// Write `v`, clamped into range, to the parameter and the widget in
    /// lockstep.
    #[inline]
    pub fn write(&mut self, v: f32) {
        self.parameter.set_value(v);
        self.widget.value = self.parameter.value;
    }
}

/// Name → binding. Ordered so that bulk operations visit channels in a
/// stable order.
pub type ParamMap = BTreeMap<String, ParamBinding>;
