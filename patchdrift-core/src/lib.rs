//! patchdrift core — random-walk primitives and the parameter model.
//!
//! Modules
//! - [`walk`]    : the bounded random-walk step and the shared [`DriftDirection`](walk::DriftDirection)
//! - [`options`] : `GeneratorOptions` and the ranges of the controls that set them
//! - [`param`]   : `Parameter` / `DisplayWidget` / `ParamBinding` and the `ParamMap`
//! - [`targets`] : the fixed allow-list of generator channels
//!
//! Design
//! - No timers, no I/O; everything here is synchronous and side-effect free
//!   apart from the explicit drift-sign flip
//! - Randomness is always injected (`rand::Rng`), so walks are reproducible
//!   with a seeded generator

pub mod options;
pub mod param;
pub mod targets;
pub mod walk;

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::options::{ControlRange, GeneratorOptions, SWITCH_CHANCE, TIMEOUT_MS, VOLATILITY};
    pub use crate::param::{DisplayWidget, ParamBinding, ParamMap, Parameter};
    pub use crate::targets::{is_generator_target, GENERATOR_TARGETS, N_TARGETS};
    pub use crate::walk::{clamp_to, drift_term, step, DriftDirection};
}
