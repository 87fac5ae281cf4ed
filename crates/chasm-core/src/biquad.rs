//! Biquad (bi-quadratic) filter structure.
//!
//! Provides a generic second-order IIR filter that can be configured as a
//! low-pass, high-pass or high shelf. Coefficient design uses the RBJ Audio
//! EQ Cookbook formulas and runs in `f64` regardless of the sample type.

use core::f64::consts::PI;
use libm::{cos, pow, sin, sqrt};

use crate::{Sample, SampleProcessor, flush_denormal};

/// Q of a second-order Butterworth section.
pub const BUTTERWORTH_Q: f64 = 0.707;

/// Raw `(b0, b1, b2, a0, a1, a2)` coefficients before normalization.
pub type Coefficients = (f64, f64, f64, f64, f64, f64);

/// Second-order IIR filter, Direct Form I.
///
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone)]
pub struct Biquad<T: Sample> {
    b0: T,
    b1: T,
    b2: T,
    a1: T,
    a2: T,

    x1: T,
    x2: T,
    y1: T,
    y2: T,
}

impl<T: Sample> Biquad<T> {
    /// Creates a new biquad with passthrough coefficients.
    pub fn new() -> Self {
        Self {
            b0: T::ONE,
            b1: T::ZERO,
            b2: T::ZERO,
            a1: T::ZERO,
            a2: T::ZERO,
            x1: T::ZERO,
            x2: T::ZERO,
            y1: T::ZERO,
            y2: T::ZERO,
        }
    }

    /// Creates a biquad from designed coefficients.
    pub fn with_coefficients(coefficients: Coefficients) -> Self {
        let mut biquad = Self::new();
        biquad.set_coefficients(coefficients);
        biquad
    }

    /// Sets the coefficients, normalizing by `a0`. Filter history is kept.
    pub fn set_coefficients(&mut self, (b0, b1, b2, a0, a1, a2): Coefficients) {
        let a0_inv = 1.0 / a0;
        self.b0 = T::from_f64(b0 * a0_inv);
        self.b1 = T::from_f64(b1 * a0_inv);
        self.b2 = T::from_f64(b2 * a0_inv);
        self.a1 = T::from_f64(a1 * a0_inv);
        self.a2 = T::from_f64(a2 * a0_inv);
    }

    /// Processes a single sample.
    #[inline]
    pub fn process_sample(&mut self, input: T) -> T {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = flush_denormal(output);

        output
    }

    /// Clears the filter history without touching coefficients.
    pub fn reset(&mut self) {
        self.x1 = T::ZERO;
        self.x2 = T::ZERO;
        self.y1 = T::ZERO;
        self.y2 = T::ZERO;
    }
}

impl<T: Sample> Default for Biquad<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Sample> SampleProcessor<T> for Biquad<T> {
    #[inline]
    fn process_sample(&mut self, input: T) -> T {
        Biquad::process_sample(self, input)
    }

    fn reset(&mut self) {
        Biquad::reset(self);
    }
}

/// Shared RBJ intermediates: `(cos ω, sin ω)` with ω clamped below Nyquist.
fn omega_terms(frequency: f64, sample_rate: f64) -> (f64, f64) {
    let frequency = frequency.clamp(1.0, (sample_rate * 0.49).max(1.0));
    let omega = 2.0 * PI * frequency / sample_rate;
    (cos(omega), sin(omega))
}

/// Low-pass coefficients (RBJ cookbook).
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor ([`BUTTERWORTH_Q`] for a maximally flat response)
/// * `sample_rate` - Sample rate in Hz
pub fn lowpass_coefficients(frequency: f64, q: f64, sample_rate: f64) -> Coefficients {
    let (cos_omega, sin_omega) = omega_terms(frequency, sample_rate);
    let alpha = sin_omega / (2.0 * q);

    let b0 = (1.0 - cos_omega) / 2.0;
    let b1 = 1.0 - cos_omega;
    let b2 = (1.0 - cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// High-pass coefficients (RBJ cookbook).
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor ([`BUTTERWORTH_Q`] for a maximally flat response)
/// * `sample_rate` - Sample rate in Hz
pub fn highpass_coefficients(frequency: f64, q: f64, sample_rate: f64) -> Coefficients {
    let (cos_omega, sin_omega) = omega_terms(frequency, sample_rate);
    let alpha = sin_omega / (2.0 * q);

    let b0 = (1.0 + cos_omega) / 2.0;
    let b1 = -(1.0 + cos_omega);
    let b2 = (1.0 + cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// High-shelf coefficients (RBJ cookbook).
///
/// Boosts or cuts everything above `frequency` by `gain_db`; 0 dB is flat.
pub fn high_shelf_coefficients(
    frequency: f64,
    q: f64,
    gain_db: f64,
    sample_rate: f64,
) -> Coefficients {
    let (cos_omega, sin_omega) = omega_terms(frequency, sample_rate);
    let a = pow(10.0, gain_db / 40.0);
    let alpha = sin_omega / (2.0 * q);
    let two_sqrt_a_alpha = 2.0 * sqrt(a) * alpha;

    let b0 = a * ((a + 1.0) + (a - 1.0) * cos_omega + two_sqrt_a_alpha);
    let b1 = -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_omega);
    let b2 = a * ((a + 1.0) + (a - 1.0) * cos_omega - two_sqrt_a_alpha);
    let a0 = (a + 1.0) - (a - 1.0) * cos_omega + two_sqrt_a_alpha;
    let a1 = 2.0 * ((a - 1.0) - (a + 1.0) * cos_omega);
    let a2 = (a + 1.0) - (a - 1.0) * cos_omega - two_sqrt_a_alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Magnitude response of a coefficient set at `frequency`, linear.
pub fn magnitude_at(coefficients: Coefficients, frequency: f64, sample_rate: f64) -> f64 {
    let (b0, b1, b2, a0, a1, a2) = coefficients;
    let w = 2.0 * PI * frequency / sample_rate;
    let (c1, s1) = (cos(w), sin(w));
    let (c2, s2) = (cos(2.0 * w), sin(2.0 * w));

    let num_re = b0 + b1 * c1 + b2 * c2;
    let num_im = -(b1 * s1 + b2 * s2);
    let den_re = a0 + a1 * c1 + a2 * c2;
    let den_im = -(a1 * s1 + a2 * s2);

    sqrt((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db(linear: f64) -> f64 {
        20.0 * libm::log10(linear)
    }

    #[test]
    fn passthrough_by_default() {
        let mut biquad = Biquad::<f32>::new();
        assert_eq!(biquad.process_sample(0.5), 0.5);
        assert_eq!(biquad.process_sample(-0.25), -0.25);
    }

    #[test]
    fn lowpass_response() {
        let c = lowpass_coefficients(1000.0, BUTTERWORTH_Q, 48000.0);
        assert!(db(magnitude_at(c, 20.0, 48000.0)).abs() < 0.1);
        assert!((db(magnitude_at(c, 1000.0, 48000.0)) + 3.0).abs() < 0.1);
        assert!(db(magnitude_at(c, 10000.0, 48000.0)) < -35.0);
    }

    #[test]
    fn highpass_response() {
        let c = highpass_coefficients(1000.0, BUTTERWORTH_Q, 48000.0);
        assert!(db(magnitude_at(c, 20000.0, 48000.0)).abs() < 0.2);
        assert!((db(magnitude_at(c, 1000.0, 48000.0)) + 3.0).abs() < 0.1);
        assert!(db(magnitude_at(c, 100.0, 48000.0)) < -35.0);
    }

    #[test]
    fn high_shelf_response() {
        let boost = high_shelf_coefficients(3000.0, BUTTERWORTH_Q, 6.0, 48000.0);
        assert!(db(magnitude_at(boost, 50.0, 48000.0)).abs() < 0.1);
        assert!((db(magnitude_at(boost, 18000.0, 48000.0)) - 6.0).abs() < 0.5);

        let flat = high_shelf_coefficients(3000.0, BUTTERWORTH_Q, 0.0, 48000.0);
        for f in [50.0, 1000.0, 3000.0, 15000.0] {
            assert!((magnitude_at(flat, f, 48000.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn time_domain_matches_design() {
        let c = lowpass_coefficients(500.0, BUTTERWORTH_Q, 48000.0);
        let mut biquad = Biquad::<f64>::with_coefficients(c);
        let mut out = 0.0;
        for _ in 0..48000 {
            out = biquad.process_sample(1.0);
        }
        assert!((out - 1.0).abs() < 1e-9, "DC gain should be unity, got {out}");
    }

    #[test]
    fn reset_clears_history() {
        let c = highpass_coefficients(200.0, BUTTERWORTH_Q, 48000.0);
        let mut biquad = Biquad::<f32>::with_coefficients(c);
        for _ in 0..64 {
            biquad.process_sample(1.0);
        }
        biquad.reset();
        assert_eq!(biquad.process_sample(0.0), 0.0);
    }
}
