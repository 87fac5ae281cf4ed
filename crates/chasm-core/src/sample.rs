//! Sample precision abstraction.
//!
//! Every processor in chasm is generic over [`Sample`], implemented for `f32`
//! and `f64`. One processor instance always runs at one precision; there is
//! no mixing inside a chain.
//!
//! All transcendental functions route through `libm` so the DSP crates stay
//! `no_std`. Coefficient design is done in `f64` and converted with
//! [`Sample::from_f64`].

use core::fmt::Debug;
use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// Floating-point sample type.
///
/// # Example
///
/// ```rust
/// use chasm_core::Sample;
///
/// fn half<T: Sample>(x: T) -> T {
///     x * T::from_f64(0.5)
/// }
///
/// assert_eq!(half(1.0_f32), 0.5);
/// assert_eq!(half(1.0_f64), 0.5);
/// ```
pub trait Sample:
    Copy
    + Default
    + Debug
    + PartialOrd
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + 'static
{
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;
    /// Smallest magnitude kept by [`flush_denormal`](crate::flush_denormal).
    const DENORMAL_THRESHOLD: Self;

    /// Convert from `f64` (rounding for `f32`).
    fn from_f64(value: f64) -> Self;
    /// Widen to `f64`.
    fn to_f64(self) -> f64;

    /// Absolute value.
    fn abs(self) -> Self;
    /// Natural exponential.
    fn exp(self) -> Self;
    /// Natural logarithm.
    fn ln(self) -> Self;
    /// Base-10 logarithm.
    fn log10(self) -> Self;
    /// Hyperbolic tangent.
    fn tanh(self) -> Self;
    /// `self` raised to `exponent`.
    fn powf(self, exponent: Self) -> Self;
    /// Square root.
    fn sqrt(self) -> Self;
    /// Largest integer not greater than `self`.
    fn floor(self) -> Self;
    /// True unless NaN or infinite.
    fn is_finite(self) -> bool;

    /// Smaller of two values.
    #[inline]
    fn min(self, other: Self) -> Self {
        if other < self { other } else { self }
    }

    /// Larger of two values.
    #[inline]
    fn max(self, other: Self) -> Self {
        if other > self { other } else { self }
    }

    /// Restrict to `[lo, hi]`. NaN passes through unchanged.
    #[inline]
    fn clamp(self, lo: Self, hi: Self) -> Self {
        if self < lo {
            lo
        } else if self > hi {
            hi
        } else {
            self
        }
    }
}

macro_rules! impl_sample {
    (
        $t:ty, denormal = $denormal:expr,
        abs = $abs:path, exp = $exp:path, ln = $ln:path, log10 = $log10:path,
        tanh = $tanh:path, pow = $pow:path, sqrt = $sqrt:path, floor = $floor:path
    ) => {
        impl Sample for $t {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const DENORMAL_THRESHOLD: Self = $denormal;

            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $t
            }
            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
            #[inline]
            fn abs(self) -> Self {
                $abs(self)
            }
            #[inline]
            fn exp(self) -> Self {
                $exp(self)
            }
            #[inline]
            fn ln(self) -> Self {
                $ln(self)
            }
            #[inline]
            fn log10(self) -> Self {
                $log10(self)
            }
            #[inline]
            fn tanh(self) -> Self {
                $tanh(self)
            }
            #[inline]
            fn powf(self, exponent: Self) -> Self {
                $pow(self, exponent)
            }
            #[inline]
            fn sqrt(self) -> Self {
                $sqrt(self)
            }
            #[inline]
            fn floor(self) -> Self {
                $floor(self)
            }
            #[inline]
            fn is_finite(self) -> bool {
                <$t>::is_finite(self)
            }
        }
    };
}

impl_sample!(
    f32, denormal = 1e-20,
    abs = libm::fabsf, exp = libm::expf, ln = libm::logf, log10 = libm::log10f,
    tanh = libm::tanhf, pow = libm::powf, sqrt = libm::sqrtf, floor = libm::floorf
);

impl_sample!(
    f64, denormal = 1e-30,
    abs = libm::fabs, exp = libm::exp, ln = libm::log, log10 = libm::log10,
    tanh = libm::tanh, pow = libm::pow, sqrt = libm::sqrt, floor = libm::floor
);

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise<T: Sample>() {
        let two = T::from_f64(2.0);
        assert_eq!(two.to_f64(), 2.0);
        assert_eq!((-two).abs().to_f64(), 2.0);
        assert!((T::ONE.exp().ln() - T::ONE).abs().to_f64() < 1e-6);
        assert!((T::from_f64(100.0).log10() - two).abs().to_f64() < 1e-6);
        assert_eq!(T::from_f64(7.9).floor().to_f64(), 7.0);
        assert_eq!(T::from_f64(5.0).clamp(T::ZERO, two).to_f64(), 2.0);
        assert_eq!(T::from_f64(-5.0).clamp(T::ZERO, two).to_f64(), 0.0);
        assert_eq!(T::ONE.min(two).to_f64(), 1.0);
        assert_eq!(T::ONE.max(two).to_f64(), 2.0);
    }

    #[test]
    fn f32_sample_ops() {
        exercise::<f32>();
        assert!(!f32::NAN.is_finite());
    }

    #[test]
    fn f64_sample_ops() {
        exercise::<f64>();
        assert!((2.0_f64.powf(0.5) - core::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn tanh_is_bounded() {
        assert!((1000.0_f32.tanh() - 1.0).abs() < 1e-6);
        assert!((-1000.0_f64.tanh() + 1.0).abs() < 1e-12);
    }
}
