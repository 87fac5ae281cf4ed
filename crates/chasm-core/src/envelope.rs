//! Peak envelope follower for dynamics processing.
//!
//! Tracks `|x|` with separate attack (rising) and release (falling) time
//! constants:
//!
//! ```text
//! coeff = exp(-1 / (time_ms * sample_rate / 1000))
//! env   = coeff * env + (1 - coeff) * |x|
//! ```

use crate::Sample;

/// Asymmetric attack/release peak detector.
///
/// # Example
///
/// ```rust
/// use chasm_core::EnvelopeFollower;
///
/// let mut env = EnvelopeFollower::<f32>::with_times(48000.0, 0.1, 10.0);
/// let level = env.process(-0.5);
/// assert!(level > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower<T: Sample> {
    envelope: T,
    attack_coeff: T,
    release_coeff: T,
    sample_rate: f64,
    attack_ms: f64,
    release_ms: f64,
}

impl<T: Sample> EnvelopeFollower<T> {
    /// Create with 10 ms attack and 100 ms release.
    pub fn new(sample_rate: f64) -> Self {
        Self::with_times(sample_rate, 10.0, 100.0)
    }

    /// Create with explicit attack and release times.
    pub fn with_times(sample_rate: f64, attack_ms: f64, release_ms: f64) -> Self {
        let mut follower = Self {
            envelope: T::ZERO,
            attack_coeff: T::ZERO,
            release_coeff: T::ZERO,
            sample_rate,
            attack_ms,
            release_ms,
        };
        follower.recalculate_coefficients();
        follower
    }

    /// Update sample rate and recompute both coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.recalculate_coefficients();
    }

    /// Set attack time in milliseconds.
    pub fn set_attack_ms(&mut self, attack_ms: f64) {
        self.attack_ms = attack_ms;
        self.recalculate_coefficients();
    }

    /// Attack time in milliseconds.
    pub fn attack_ms(&self) -> f64 {
        self.attack_ms
    }

    /// Set release time in milliseconds.
    pub fn set_release_ms(&mut self, release_ms: f64) {
        self.release_ms = release_ms;
        self.recalculate_coefficients();
    }

    /// Release time in milliseconds.
    pub fn release_ms(&self) -> f64 {
        self.release_ms
    }

    /// Feed one sample and return the envelope level (never negative).
    #[inline]
    pub fn process(&mut self, input: T) -> T {
        let level = input.abs();
        let coeff = if level > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope = coeff * self.envelope + (T::ONE - coeff) * level;
        self.envelope
    }

    /// Current level without feeding input.
    #[inline]
    pub fn level(&self) -> T {
        self.envelope
    }

    /// Drop the envelope to zero.
    pub fn reset(&mut self) {
        self.envelope = T::ZERO;
    }

    fn recalculate_coefficients(&mut self) {
        self.attack_coeff = T::from_f64(time_coefficient(self.attack_ms, self.sample_rate));
        self.release_coeff = T::from_f64(time_coefficient(self.release_ms, self.sample_rate));
    }
}

/// `exp(-1 / (time_ms * sample_rate / 1000))`, or zero (instant) for
/// non-positive times.
fn time_coefficient(time_ms: f64, sample_rate: f64) -> f64 {
    let samples = time_ms * sample_rate / 1000.0;
    if samples > 0.0 {
        libm::exp(-1.0 / samples)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_attack() {
        let mut env = EnvelopeFollower::<f32>::with_times(48000.0, 1.0, 100.0);
        let mut envelope = 0.0;
        for _ in 0..500 {
            envelope = env.process(1.0);
        }
        assert!(envelope > 0.9, "Envelope should rise, got {}", envelope);
    }

    #[test]
    fn test_envelope_release() {
        let mut env = EnvelopeFollower::<f32>::with_times(48000.0, 1.0, 10.0);
        for _ in 0..500 {
            env.process(1.0);
        }
        let mut envelope = 0.0;
        for _ in 0..1000 {
            envelope = env.process(0.0);
        }
        // ~2 time constants: e^-2 ≈ 0.135
        assert!(envelope < 0.15, "Envelope should fall, got {}", envelope);
    }

    #[test]
    fn test_envelope_rectifies() {
        let mut env = EnvelopeFollower::<f64>::new(48000.0);
        assert!(env.process(-0.5) > 0.0);
    }

    #[test]
    fn test_instant_time_tracks_exactly() {
        let mut env = EnvelopeFollower::<f64>::with_times(48000.0, 0.0, 0.0);
        assert_eq!(env.process(0.75), 0.75);
        assert_eq!(env.process(-0.25), 0.25);
    }

    #[test]
    fn test_reset() {
        let mut env = EnvelopeFollower::<f32>::new(44100.0);
        env.process(1.0);
        env.reset();
        assert_eq!(env.level(), 0.0);
    }
}
