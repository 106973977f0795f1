//! Bounded random walk with a shared, occasionally reversing drift.
//!
//! Every generator channel advances its parameter with [`step`]:
//!
//! ```text
//! maybe flip shared sign (p = drift_switch_chance)
//! drift  = sign * (max / 100)
//! offset = u * volatility - volatility / 2          u ∈ [0, 1)
//! next   = clamp(previous + drift + offset, min, max)
//! ```
//!
//! The drift sign lives in a single [`DriftDirection`] that every channel of a
//! generator borrows. A flip caused by one channel changes the drift applied to
//! all of them on their next step; only the values themselves are per-channel.
//!
//! Drift is a fixed 1% of the range **ceiling** (`max`), not of the span
//! `max - min`. A parameter spanning `[50, 100]` drifts by 1.0 per step, the
//! same as one spanning `[0, 100]`.

use core::cell::Cell;

use num_traits::Float;
use rand::Rng;

/// Shared drift sign (+1 / -1) for every channel of one generator.
///
/// Interior mutability so the sign can be flipped through the shared borrow
/// handed to each [`step`] call. Single-threaded by construction (`!Sync`).
#[derive(Debug, Clone)]
pub struct DriftDirection {
    sign: Cell<i8>,
}

impl Default for DriftDirection {
    fn default() -> Self {
        Self::up()
    }
}

impl DriftDirection {
    /// Upward drift. This is the initial state of a fresh generator.
    #[inline]
    pub fn up() -> Self {
        Self { sign: Cell::new(1) }
    }

    #[inline]
    pub fn down() -> Self {
        Self { sign: Cell::new(-1) }
    }

    /// Current sign, always `1` or `-1`.
    #[inline]
    pub fn sign(&self) -> i8 {
        self.sign.get()
    }

    /// Force the sign. Any non-negative value means upward.
    #[inline]
    pub fn set(&self, sign: i8) {
        self.sign.set(if sign >= 0 { 1 } else { -1 });
    }

    #[inline]
    pub fn flip(&self) {
        self.sign.set(-self.sign.get());
    }

    #[inline]
    pub fn is_up(&self) -> bool {
        self.sign.get() > 0
    }

    /// Sign as a float factor.
    #[inline]
    pub fn factor<T: Float>(&self) -> T {
        if self.is_up() {
            T::one()
        } else {
            -T::one()
        }
    }
}

#[inline]
fn lit<T: Float>(x: f64) -> T {
    T::from(x).unwrap_or_else(T::nan)
}

/// Uniform draw in `[0, 1)`, still below one after narrowing to `T`.
#[inline]
fn unit<T: Float, R: Rng + ?Sized>(rng: &mut R) -> T {
    let u: T = lit(rng.gen::<f64>());
    // f64 draws within half an ulp of 1 round up to 1 in f32
    if u < T::one() { u } else { T::one() - T::epsilon() }
}

/// Drift applied by one step for a parameter whose ceiling is `max`.
#[inline]
pub fn drift_term<T: Float>(max: T, drift: &DriftDirection) -> T {
    drift.factor::<T>() * (max / lit(100.0))
}

/// Clamp `x` into `[min, max]` as `max(min, min(max, x))`.
///
/// Unlike [`f32::clamp`] this never panics: an inverted range yields `min`.
#[inline]
pub fn clamp_to<T: Float>(x: T, min: T, max: T) -> T {
    min.max(max.min(x))
}

/// Compute the next value of one walk.
///
/// The switch draw happens first and may flip `drift` for every channel sharing
/// it; the offset draw follows. Both draws are always taken, so the random
/// stream consumed per step is fixed regardless of the chance value.
///
/// For `min <= previous <= max` (and any finite volatility/chance) the result
/// stays inside `[min, max]`.
pub fn step<T, R>(
    previous: T,
    min: T,
    max: T,
    volatility: T,
    drift_switch_chance: T,
    drift: &DriftDirection,
    rng: &mut R,
) -> T
where
    T: Float,
    R: Rng + ?Sized,
{
    if unit::<T, R>(rng) < drift_switch_chance {
        drift.flip();
    }

    let bias = drift_term(max, drift);
    let offset = unit::<T, R>(rng) * volatility - volatility / lit(2.0);

    clamp_to(previous + bias + offset, min, max)
}
