//! Parameter surface description loaded from JSON.
//!
//! ```json
//! { "parameters": [ { "id": "osc1", "min": 0, "max": 1, "value": 0.8 } ] }
//! ```
//!
//! `value` is optional and defaults to `min`. A patch stands in for a device
//! that enumerates its parameters at load time.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use patchdrift_core::param::{ParamBinding, ParamMap, Parameter};
use serde::{Deserialize, Serialize};

/// Errors raised while loading or validating a patch.
#[derive(Debug)]
pub enum PatchError {
    /// The patch file could not be read.
    Io(std::io::Error),
    /// The patch is not valid JSON or does not match the expected shape.
    Parse(serde_json::Error),
    /// `min > max`, or a bound or value is not finite.
    InvalidRange { id: String },
    /// Two entries share an id.
    DuplicateId { id: String },
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read patch: {e}"),
            Self::Parse(e) => write!(f, "malformed patch: {e}"),
            Self::InvalidRange { id } => write!(f, "parameter '{id}' has an invalid range"),
            Self::DuplicateId { id } => write!(f, "parameter '{id}' is declared twice"),
        }
    }
}

impl std::error::Error for PatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PatchError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for PatchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchParam {
    pub id: String,
    pub min: f32,
    pub max: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f32>,
}

impl PatchParam {
    fn validate(&self) -> Result<(), PatchError> {
        let finite = self.min.is_finite() && self.max.is_finite() && self.value.map_or(true, f32::is_finite);
        if !finite || self.min > self.max {
            return Err(PatchError::InvalidRange { id: self.id.clone() });
        }
        Ok(())
    }

    fn binding(&self) -> ParamBinding {
        ParamBinding::new(Parameter::new(self.min, self.max, self.value.unwrap_or(self.min)))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub parameters: Vec<PatchParam>,
}

impl Patch {
    /// Parse and validate a patch.
    pub fn from_json_str(s: &str) -> Result<Self, PatchError> {
        let patch: Self = serde_json::from_str(s)?;
        patch.validate()?;
        Ok(patch)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PatchError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn validate(&self) -> Result<(), PatchError> {
        let mut seen = HashSet::with_capacity(self.parameters.len());
        for p in &self.parameters {
            p.validate()?;
            if !seen.insert(p.id.as_str()) {
                return Err(PatchError::DuplicateId { id: p.id.clone() });
            }
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String, PatchError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the parameter map; each widget starts at its parameter's value.
    pub fn into_param_map(self) -> ParamMap {
        self.parameters
            .into_iter()
            .map(|p| {
                let binding = p.binding();
                (p.id, binding)
            })
            .collect()
    }

    /// Built-in surface of the poly synth: every dial the front panel binds.
    pub fn poly_default() -> Self {
        let parameters = POLY_SURFACE
            .iter()
            .map(|&(id, min, max, value)| PatchParam { id: id.to_owned(), min, max, value: Some(value) })
            .collect();
        Self { parameters }
    }
}

// (id, min, max, initial)
#[rustfmt::skip]
const POLY_SURFACE: &[(&str, f32, f32, f32)] = &[
    // oscillator levels
    ("osc1",                    0.0,    1.0,     0.8),
    ("osc2",                    0.0,    1.0,     0.5),
    ("osc3",                    0.0,    1.0,     0.3),
    // envelope (ms, sustain as level)
    ("poly/adsr/attack",        1.0,    2000.0,  20.0),
    ("poly/adsr/delay",         1.0,    2000.0,  200.0),
    ("poly/adsr/sustain",       0.0,    1.0,     0.7),
    ("poly/adsr/release",       1.0,    5000.0,  800.0),
    // lfo rates (Hz)
    ("poly/lfo1/freq",          0.01,   20.0,    0.5),
    ("poly/lfo2/freq",          0.01,   20.0,    2.0),
    // filters
    ("poly/filter1/freq",       20.0,   20000.0, 2000.0),
    ("poly/filter1/q",          0.1,    20.0,    0.7),
    ("poly/filter2/freq",       20.0,   20000.0, 8000.0),
    ("poly/filter2/q",          0.1,    20.0,    0.7),
    // fm
    ("poly/fm/freq",            0.0,    10.0,    2.0),
    ("poly/fm/index",           0.0,    10.0,    1.0),
    ("poly/fm/level",           0.0,    1.0,     0.0),
    // delay
    ("poly/delay/wet",          0.0,    1.0,     0.25),
    ("poly/delay/feedback",     0.0,    0.95,    0.4),
    ("poly/delay/time",         1.0,    2000.0,  375.0),
    ("poly/delay/stereo-delay", 0.0,    100.0,   10.0),
    // overdrive
    ("poly/overdrive/drive",    0.0,    1.0,     0.2),
    ("poly/overdrive/volume",   0.0,    1.0,     0.8),
    ("poly/overdrive/mix",      0.0,    1.0,     0.0),
    // reverb
    ("poly/reverb/mix",         0.0,    1.0,     0.3),
    ("poly/reverb/size",        0.0,    1.0,     0.6),
    ("poly/reverb/diff",        0.0,    1.0,     0.5),
    ("poly/reverb/jitter",      0.0,    1.0,     0.1),
    ("poly/reverb/damp",        0.0,    1.0,     0.4),
    ("poly/reverb/chorus",      0.0,    1.0,     0.2),
    ("poly/reverb/feedback",    0.0,    1.0,     0.5),
    ("poly/reverb/pitch",       -12.0,  12.0,    0.0),
    ("poly/reverb/decay",       0.0,    1.0,     0.5),
    // tremolo
    ("poly/trem/depth",         0.0,    1.0,     0.0),
    ("poly/trem/rate",          0.1,    20.0,    4.0),
    ("poly/trem/spread",        0.0,    1.0,     0.5),
];
