//! Linear parameter smoothing for zipper-free changes.
//!
//! Host parameters arrive once per block, but the DSP reads them once per
//! sample. [`ParameterSmoother`] turns each new target into a constant-rate
//! ramp so that a knob turn never produces a step discontinuity.
//!
//! ## Ramp law
//!
//! The ramp length is `ceil(ramp_ms * sample_rate / 1000)` samples (see
//! [`ramp_length_samples`]). Every call to
//! [`next_value`](ParameterSmoother::next_value) moves the value one step
//! toward the target; the final step assigns the target itself, so after
//! exactly the ramp length of calls the value equals the target bit for bit.
//! Steps never overshoot.
//!
//! ## Usage
//!
//! ```rust
//! use chasm_core::ParameterSmoother;
//!
//! let mut gain = ParameterSmoother::new(1.0_f32);
//! gain.prepare(48000.0, 10.0); // 480-sample ramp
//! gain.set_target_value(0.5);
//!
//! for _ in 0..480 {
//!     let _g = gain.next_value();
//! }
//! assert_eq!(gain.current_value(), 0.5);
//! ```

use crate::Sample;

/// Number of samples in a ramp of `ramp_ms` at `sample_rate`.
///
/// Zero or negative ramp times give zero (changes apply immediately).
#[inline]
pub fn ramp_length_samples(sample_rate: f64, ramp_ms: f64) -> u32 {
    let samples = ramp_ms * sample_rate / 1000.0;
    if samples > 0.0 {
        libm::ceil(samples) as u32
    } else {
        0
    }
}

/// A parameter value that ramps linearly toward its target.
///
/// # Invariants
///
/// - While ramping, the value stays between its start point and the target.
/// - When `remaining == 0`, `current == target` exactly.
#[derive(Debug, Clone)]
pub struct ParameterSmoother<T: Sample> {
    current: T,
    target: T,
    /// Increment per sample (signed)
    step: T,
    /// Samples left in the active ramp
    remaining: u32,
    /// Ramp length for a fresh target
    ramp_samples: u32,
}

impl<T: Sample> ParameterSmoother<T> {
    /// Create a smoother resting at `initial`.
    ///
    /// Until [`prepare`](Self::prepare) is called the ramp length is zero and
    /// new targets apply immediately.
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            target: initial,
            step: T::ZERO,
            remaining: 0,
            ramp_samples: 0,
        }
    }

    /// Create and prepare in one call.
    pub fn with_ramp(initial: T, sample_rate: f64, ramp_ms: f64) -> Self {
        let mut smoother = Self::new(initial);
        smoother.prepare(sample_rate, ramp_ms);
        smoother
    }

    /// Set the ramp length from a sample rate and a ramp time in milliseconds.
    ///
    /// Any ramp in progress completes immediately.
    pub fn prepare(&mut self, sample_rate: f64, ramp_ms: f64) {
        self.ramp_samples = ramp_length_samples(sample_rate, ramp_ms);
        self.snap_to_target_value();
    }

    /// Start a ramp toward `target`.
    ///
    /// Re-setting the current target is a no-op, so an in-flight ramp is not
    /// restarted when the host repeats the same value every block.
    #[inline]
    pub fn set_target_value(&mut self, target: T) {
        if target == self.target {
            return;
        }
        self.target = target;

        if self.ramp_samples == 0 {
            self.snap_to_target_value();
        } else {
            self.step = (target - self.current) / T::from_f64(f64::from(self.ramp_samples));
            self.remaining = self.ramp_samples;
        }
    }

    /// Advance one sample and return the new value.
    ///
    /// Call exactly once per processed sample.
    #[inline]
    pub fn next_value(&mut self) -> T {
        if self.remaining > 0 {
            self.remaining -= 1;
            if self.remaining == 0 {
                self.current = self.target;
            } else if self.step > T::ZERO {
                self.current = (self.current + self.step).min(self.target);
            } else {
                self.current = (self.current + self.step).max(self.target);
            }
        }
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn current_value(&self) -> T {
        self.current
    }

    /// Destination of the active (or last) ramp.
    #[inline]
    pub fn target_value(&self) -> T {
        self.target
    }

    /// True while a ramp is in progress.
    #[inline]
    pub fn is_smoothing(&self) -> bool {
        self.remaining > 0
    }

    /// Ramp length in samples.
    #[inline]
    pub fn ramp_samples(&self) -> u32 {
        self.ramp_samples
    }

    /// Jump to the target immediately.
    #[inline]
    pub fn snap_to_target_value(&mut self) {
        self.current = self.target;
        self.step = T::ZERO;
        self.remaining = 0;
    }

    /// Rest at `value` with no ramp pending.
    pub fn reset(&mut self, value: T) {
        self.target = value;
        self.snap_to_target_value();
    }
}

impl<T: Sample> Default for ParameterSmoother<T> {
    fn default() -> Self {
        Self::new(T::ZERO)
    }
}
