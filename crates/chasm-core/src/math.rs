//! Mathematical utility functions for DSP.
//!
//! Generic over [`Sample`] so the same helpers serve `f32` and `f64`
//! processors. All functions are allocation-free and `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_gain`] / [`gain_to_db`] - Convert between dB and linear gain
//!
//! # Clipping
//!
//! | Function | Character | Use Case |
//! |----------|-----------|----------|
//! | [`soft_clip`] | Smooth, half-scale `tanh(2x)/2` | Limiter front end |
//! | [`hard_clip`] | Brick wall | Output ceiling |
//!
//! # Utilities
//!
//! - [`lerp`] - Linear interpolation
//! - [`clamp_or`] - NaN-safe control clamp used by every setter
//! - [`dry_wet_mix`] - Equal-sum dry/wet blend
//! - [`ms_to_samples`] - Time conversion (in `f64`, like all coefficient math)
//! - [`flush_denormal`] - Subnormal protection for feedback paths

use crate::Sample;

/// Lower bound applied before taking the logarithm in [`gain_to_db`].
pub const GAIN_FLOOR: f64 = 1e-6;

/// Convert decibels to linear gain.
///
/// `0 dB` maps to exactly `1.0`.
///
/// # Example
/// ```rust
/// use chasm_core::db_to_gain;
///
/// assert_eq!(db_to_gain(0.0_f32), 1.0);
/// assert!((db_to_gain(-6.02_f64) - 0.5).abs() < 0.001);
/// ```
#[inline]
pub fn db_to_gain<T: Sample>(db: T) -> T {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    (db * T::from_f64(core::f64::consts::LN_10 / 20.0)).exp()
}

/// Convert linear gain to decibels, flooring the input at [`GAIN_FLOOR`].
///
/// # Example
/// ```rust
/// use chasm_core::gain_to_db;
///
/// assert!(gain_to_db(1.0_f32).abs() < 1e-6);
/// assert!((gain_to_db(0.0_f64) + 120.0).abs() < 1e-9);
/// ```
#[inline]
pub fn gain_to_db<T: Sample>(gain: T) -> T {
    T::from_f64(20.0) * gain.max(T::from_f64(GAIN_FLOOR)).log10()
}

/// Half-scale `tanh` saturation: `tanh(2x) / 2`.
///
/// Unity slope at the origin, output strictly inside `(-0.5, 0.5)`.
#[inline]
pub fn soft_clip<T: Sample>(x: T) -> T {
    let two = T::from_f64(2.0);
    (x * two).tanh() / two
}

/// Hard clip to `±threshold`.
#[inline]
pub fn hard_clip<T: Sample>(x: T, threshold: T) -> T {
    x.clamp(-threshold, threshold)
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp<T: Sample>(a: T, b: T, t: T) -> T {
    a + (b - a) * t
}

/// Blend dry and wet signals as `dry * (1 - mix) + wet * mix`.
///
/// At `mix == 0` the result is exactly `dry`, at `mix == 1` exactly `wet`
/// (for finite inputs).
#[inline]
pub fn dry_wet_mix<T: Sample>(dry: T, wet: T, mix: T) -> T {
    dry * (T::ONE - mix) + wet * mix
}

/// Convert milliseconds to (fractional) samples.
#[inline]
pub fn ms_to_samples(ms: f64, sample_rate: f64) -> f64 {
    ms * sample_rate / 1000.0
}

/// Map a percentage in `[0, 100]` to `[0, 1]`, clamping. NaN maps to 0.
#[inline]
pub fn percent_to_normalized(percent: f64) -> f64 {
    clamp_or(percent * 0.01, 0.0, 1.0, 0.0)
}

/// Clamp a control value to `[lo, hi]`; NaN becomes `fallback`.
///
/// `f64::clamp` returns NaN unchanged, so every setter goes through this
/// before a value reaches a smoother or a delay line.
///
/// # Example
/// ```rust
/// use chasm_core::clamp_or;
///
/// assert_eq!(clamp_or(150.0, 0.0, 100.0, 50.0), 100.0);
/// assert_eq!(clamp_or(f64::NAN, 0.0, 100.0, 50.0), 50.0);
/// ```
#[inline]
pub fn clamp_or(value: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(lo, hi)
    }
}

/// Flush values below [`Sample::DENORMAL_THRESHOLD`] to zero.
///
/// Use in feedback loops (allpass state, filter history) where a signal can
/// decay toward zero indefinitely.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal<T: Sample>(x: T) -> T {
    if x.abs() < T::DENORMAL_THRESHOLD {
        T::ZERO
    } else {
        x
    }
}
