//! patchdrift engine — timers, channel runners, registry and binding glue.
//!
//! Crate layout:
//! - [`timer`]    : cooperative timer queue on a virtual clock
//! - [`runner`]   : per-channel advance/reschedule state machine
//! - [`registry`] : name → channel map with start / stop / update
//! - [`debounce`] : trailing-edge debounce for control changes
//! - [`panel`]    : enable toggle + option dials over a registry
//! - [`patch`]    : JSON description of a parameter surface
//! - `realtime`   : wall-clock driver (feature `realtime`)
//!
//! Everything runs on one logical thread. Time only moves when the owner
//! pumps the clock (`advance_to` / `advance_by`), which makes every
//! schedule reproducible under a seeded random source.

use cfg_if::cfg_if;

pub mod debounce;
pub mod panel;
pub mod patch;
pub mod registry;
pub mod runner;
pub mod timer;

cfg_if! {
    if #[cfg(feature = "realtime")] {
        pub mod realtime;
        pub use realtime::RealtimeDriver;
    }
}

// Re-export some commonly used items to make downstream imports ergonomic.
pub use debounce::{Debounce, CONTROL_DEBOUNCE};
pub use panel::GeneratorPanel;
pub use patch::{Patch, PatchError, PatchParam};
pub use registry::GeneratorRegistry;
pub use runner::{Advance, ChannelRunner, Phase, MIN_TIMEOUT};
pub use timer::{TimerHandle, TimerQueue};
