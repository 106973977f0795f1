//! C ABI wrapper for the patchdrift generator.
//!
//! A host registers its parameters, flips the generator on, moves the dials
//! and pumps the clock; it reads values back after each pump.
//!
//! ABI notes
//! - All functions are `extern "C"` and `#[no_mangle]`.
//! - Opaque handle type: `PatchdriftGenerator` (heap-allocated; you own/delete it).
//! - Status codes: `0` ok, negative on error (see the `PATCHDRIFT_*` constants).
//! - Ids are NUL-terminated UTF-8 strings, copied on entry.
//!
//! Threading
//! - The object is NOT thread-safe; call all functions from the same thread.

use std::ffi::{c_char, CStr};
use std::time::Duration;

use patchdrift_core::param::{ParamBinding, Parameter};
use patchdrift_engine::GeneratorPanel;

pub const PATCHDRIFT_OK: i32 = 0;
pub const PATCHDRIFT_ERR_NULL: i32 = -1;
pub const PATCHDRIFT_ERR_UTF8: i32 = -2;
pub const PATCHDRIFT_ERR_RANGE: i32 = -3;
pub const PATCHDRIFT_ERR_UNKNOWN_ID: i32 = -4;

/// Opaque generator wrapper we hand to C.
pub struct PatchdriftGenerator {
    panel: GeneratorPanel,
}

/// Borrow a C string as `&str`, mapping failures to status codes.
///
/// # Safety
/// `id` must be null or point to a NUL-terminated string that outlives the borrow.
unsafe fn id_str<'a>(id: *const c_char) -> Result<&'a str, i32> {
    if id.is_null() {
        return Err(PATCHDRIFT_ERR_NULL);
    }
    CStr::from_ptr(id).to_str().map_err(|_| PATCHDRIFT_ERR_UTF8)
}

// --- Creation / destruction -------------------------------------------------------

/// Create a generator with no parameters and the toggle off.
/// `seed == 0` draws the random stream from OS entropy; any other value
/// makes runs reproducible.
#[no_mangle]
pub extern "C" fn patchdrift_create(seed: u64) -> *mut PatchdriftGenerator {
    let panel = if seed == 0 {
        GeneratorPanel::new(Default::default())
    } else {
        GeneratorPanel::seeded(Default::default(), seed)
    };
    Box::into_raw(Box::new(PatchdriftGenerator { panel }))
}

/// Destroy a generator previously returned by `patchdrift_create`.
#[no_mangle]
pub extern "C" fn patchdrift_destroy(gen: *mut PatchdriftGenerator) {
    if !gen.is_null() {
        unsafe { drop(Box::from_raw(gen)); }
    }
}

// --- Parameter surface ------------------------------------------------------------

/// Register (or replace) a parameter. `value` is clamped into `[min, max]`.
#[no_mangle]
pub extern "C" fn patchdrift_add_param(
    gen: *mut PatchdriftGenerator,
    id: *const c_char,
    min: f32,
    max: f32,
    value: f32,
) -> i32 {
    if gen.is_null() { return PATCHDRIFT_ERR_NULL; }
    let g = unsafe { &mut *gen };
    let id = match unsafe { id_str(id) } {
        Ok(s) => s,
        Err(code) => return code,
    };
    if !(min.is_finite() && max.is_finite() && value.is_finite()) || min > max {
        return PATCHDRIFT_ERR_RANGE;
    }
    g.panel.insert_param(id, ParamBinding::new(Parameter::new(min, max, value)));
    PATCHDRIFT_OK
}

/// Read the current value of `id` into `*out`.
#[no_mangle]
pub extern "C" fn patchdrift_get_value(gen: *const PatchdriftGenerator, id: *const c_char, out: *mut f32) -> i32 {
    if gen.is_null() || out.is_null() { return PATCHDRIFT_ERR_NULL; }
    let g = unsafe { &*gen };
    let id = match unsafe { id_str(id) } {
        Ok(s) => s,
        Err(code) => return code,
    };
    match g.panel.value(id) {
        Some(v) => {
            unsafe { *out = v; }
            PATCHDRIFT_OK
        }
        None => PATCHDRIFT_ERR_UNKNOWN_ID,
    }
}

/// 1 if the generator is currently driving `id`, 0 if not (or on bad input).
#[no_mangle]
pub extern "C" fn patchdrift_is_active(gen: *const PatchdriftGenerator, id: *const c_char) -> i32 {
    if gen.is_null() { return 0; }
    let g = unsafe { &*gen };
    match unsafe { id_str(id) } {
        Ok(id) => i32::from(g.panel.registry().is_active(id)),
        Err(_) => 0,
    }
}

// --- Controls ---------------------------------------------------------------------

/// Master toggle (non-zero = on).
#[no_mangle]
pub extern "C" fn patchdrift_set_enabled(gen: *mut PatchdriftGenerator, on: i32) {
    if gen.is_null() { return; }
    let g = unsafe { &mut *gen };
    g.panel.set_enabled(on != 0);
}

/// Volatility dial, snapped into [0, 0.1]. Applied after the debounce.
#[no_mangle]
pub extern "C" fn patchdrift_set_volatility(gen: *mut PatchdriftGenerator, v: f32) {
    if gen.is_null() { return; }
    let g = unsafe { &mut *gen };
    g.panel.set_volatility(v);
}

/// Drift-switch chance dial, snapped into [0, 1]. Applied after the debounce.
#[no_mangle]
pub extern "C" fn patchdrift_set_switch_chance(gen: *mut PatchdriftGenerator, c: f32) {
    if gen.is_null() { return; }
    let g = unsafe { &mut *gen };
    g.panel.set_switch_chance(c);
}

/// Timeout dial in ms, snapped into [25, 250]. Applied after the debounce.
#[no_mangle]
pub extern "C" fn patchdrift_set_timeout_ms(gen: *mut PatchdriftGenerator, ms: f32) {
    if gen.is_null() { return; }
    let g = unsafe { &mut *gen };
    g.panel.set_timeout_ms(ms);
}

// --- Clock ------------------------------------------------------------------------

/// Move the generator clock forward by `ms`. Returns the number of ticks fired.
#[no_mangle]
pub extern "C" fn patchdrift_advance_ms(gen: *mut PatchdriftGenerator, ms: u32) -> u32 {
    if gen.is_null() { return 0; }
    let g = unsafe { &mut *gen };
    let fired = g.panel.advance_by(Duration::from_millis(u64::from(ms)));
    u32::try_from(fired).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    #[test]
    fn host_round_trip() {
        let g = patchdrift_create(42);
        let osc1 = c("osc1");
        let volume = c("volume");
        assert_eq!(patchdrift_add_param(g, osc1.as_ptr(), 0.0, 1.0, 0.5), PATCHDRIFT_OK);
        assert_eq!(patchdrift_add_param(g, volume.as_ptr(), 0.0, 1.0, 0.5), PATCHDRIFT_OK);

        patchdrift_set_enabled(g, 1);
        assert_eq!(patchdrift_is_active(g, osc1.as_ptr()), 1);
        assert_eq!(patchdrift_is_active(g, volume.as_ptr()), 0);

        assert_eq!(patchdrift_advance_ms(g, 100), 2);

        let mut v = -1.0f32;
        assert_eq!(patchdrift_get_value(g, osc1.as_ptr(), &mut v), PATCHDRIFT_OK);
        assert!((0.0..=1.0).contains(&v));
        assert_eq!(patchdrift_get_value(g, volume.as_ptr(), &mut v), PATCHDRIFT_OK);
        assert_eq!(v, 0.5);

        patchdrift_set_enabled(g, 0);
        assert_eq!(patchdrift_is_active(g, osc1.as_ptr()), 0);
        assert_eq!(patchdrift_advance_ms(g, 1_000), 0);
        patchdrift_destroy(g);
    }

    #[test]
    fn bad_input_is_reported() {
        let g = patchdrift_create(1);
        let id = c("osc2");
        let missing = c("osc3");
        let mut v = 0.0f32;

        assert_eq!(patchdrift_add_param(g, std::ptr::null(), 0.0, 1.0, 0.0), PATCHDRIFT_ERR_NULL);
        assert_eq!(patchdrift_add_param(g, id.as_ptr(), 1.0, 0.0, 0.0), PATCHDRIFT_ERR_RANGE);
        assert_eq!(patchdrift_add_param(g, id.as_ptr(), 0.0, f32::NAN, 0.0), PATCHDRIFT_ERR_RANGE);
        assert_eq!(patchdrift_get_value(g, missing.as_ptr(), &mut v), PATCHDRIFT_ERR_UNKNOWN_ID);
        assert_eq!(patchdrift_get_value(g, id.as_ptr(), std::ptr::null_mut()), PATCHDRIFT_ERR_NULL);

        let bad = [0xffu8 as c_char, 0];
        assert_eq!(patchdrift_add_param(g, bad.as_ptr(), 0.0, 1.0, 0.0), PATCHDRIFT_ERR_UTF8);

        assert_eq!(patchdrift_add_param(std::ptr::null_mut(), id.as_ptr(), 0.0, 1.0, 0.0), PATCHDRIFT_ERR_NULL);
        assert_eq!(patchdrift_advance_ms(std::ptr::null_mut(), 10), 0);
        patchdrift_set_enabled(std::ptr::null_mut(), 1);
        patchdrift_destroy(std::ptr::null_mut());
        patchdrift_destroy(g);
    }

    #[test]
    fn dial_changes_land_after_debounce() {
        let g = patchdrift_create(3);
        let osc1 = c("osc1");
        patchdrift_add_param(g, osc1.as_ptr(), 0.0, 1.0, 0.5);
        patchdrift_set_enabled(g, 1);
        patchdrift_set_timeout_ms(g, 250.0);

        // 50 ms cadence until the update lands at 200 ms (ticks at 50..=200).
        assert_eq!(patchdrift_advance_ms(g, 200), 4);
        // Then 250 ms: next tick at 450.
        assert_eq!(patchdrift_advance_ms(g, 249), 0);
        assert_eq!(patchdrift_advance_ms(g, 1), 1);
        patchdrift_destroy(g);
    }
}
