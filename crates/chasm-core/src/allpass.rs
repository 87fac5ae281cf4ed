//! Fractional-delay allpass filter for diffusion.
//!
//! A Schroeder allpass smears transients in time while leaving the magnitude
//! response flat. The delay line stores the filter's own recursive state
//! (direct form II), so a single buffer serves both the feedforward and the
//! feedback path:
//!
//! ```text
//! w[n] = x[n] + g * w[n-D]
//! y[n] = -g * w[n] + w[n-D]
//! ```
//!
//! which is the same transfer function as
//! `y[n] = -g*x[n] + x[n-D] + g*y[n-D]`, i.e. `H(z) = (-g + z^-D) / (1 - g z^-D)`.
//!
//! Fractional `D` reads are linearly interpolated.
//!
//! # Reference
//!
//! M. R. Schroeder, "Natural Sounding Artificial Reverberation", JAES 1962.

use crate::{DelayLine, Sample, SampleProcessor, clamp_or, flush_denormal, ms_to_samples};

/// Feedback magnitude limit that keeps the recursion stable.
pub const MAX_FEEDBACK: f64 = 0.99;

/// Schroeder allpass with a millisecond-addressed fractional delay.
///
/// # Invariants
///
/// - `|feedback| <= 0.99`
/// - `1 <= delay_samples <= capacity - 1`
///
/// # Example
///
/// ```rust
/// use chasm_core::AllpassFilter;
///
/// let mut allpass = AllpassFilter::<f32>::new(48000.0, 100.0);
/// allpass.set_delay_time(10.0);
/// allpass.set_feedback(0.5);
///
/// let first = allpass.process_sample(1.0);
/// assert_eq!(first, -0.5);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter<T: Sample> {
    delay: DelayLine<T>,
    feedback: T,
    delay_samples: f64,
    sample_rate: f64,
}

impl<T: Sample> AllpassFilter<T> {
    /// Create an allpass able to delay up to `max_delay_ms` at `sample_rate`.
    ///
    /// Starts at a one-sample delay with zero feedback.
    pub fn new(sample_rate: f64, max_delay_ms: f64) -> Self {
        Self {
            delay: DelayLine::from_time(sample_rate, max_delay_ms),
            feedback: T::ZERO,
            delay_samples: 1.0,
            sample_rate,
        }
    }

    /// Reallocate the delay line for a new rate or maximum delay.
    ///
    /// Clears all state; the delay time in milliseconds is not preserved.
    pub fn prepare(&mut self, sample_rate: f64, max_delay_ms: f64) {
        self.delay = DelayLine::from_time(sample_rate, max_delay_ms);
        self.sample_rate = sample_rate;
        self.delay_samples = 1.0;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "allpass_prepare: {} samples at {sample_rate} Hz",
            self.delay.capacity()
        );
    }

    /// Set the delay in milliseconds.
    ///
    /// Clamped to `[1, capacity - 1]` samples. NaN keeps the current delay.
    #[inline]
    pub fn set_delay_time(&mut self, delay_ms: f64) {
        self.delay_samples = clamp_or(
            ms_to_samples(delay_ms, self.sample_rate),
            1.0,
            self.delay.max_delay(),
            self.delay_samples,
        );
    }

    /// Current delay in (fractional) samples.
    #[inline]
    pub fn delay_samples(&self) -> f64 {
        self.delay_samples
    }

    /// Set the feedback gain `g`, clamped to `±0.99`. NaN is ignored.
    #[inline]
    pub fn set_feedback(&mut self, feedback: T) {
        let fallback = self.feedback.to_f64();
        self.feedback = T::from_f64(clamp_or(
            feedback.to_f64(),
            -MAX_FEEDBACK,
            MAX_FEEDBACK,
            fallback,
        ));
    }

    /// Current feedback gain.
    #[inline]
    pub fn feedback(&self) -> T {
        self.feedback
    }

    /// Process one sample.
    #[inline]
    pub fn process_sample(&mut self, input: T) -> T {
        let delayed = self.delay.read(self.delay_samples);
        let state = flush_denormal(input + self.feedback * delayed);
        self.delay.write(state);
        delayed - self.feedback * state
    }

    /// Zero the delay line.
    pub fn reset(&mut self) {
        self.delay.clear();
    }

    /// Delay line capacity in samples.
    pub fn capacity(&self) -> usize {
        self.delay.capacity()
    }
}

impl<T: Sample> SampleProcessor<T> for AllpassFilter<T> {
    #[inline]
    fn process_sample(&mut self, input: T) -> T {
        AllpassFilter::process_sample(self, input)
    }

    fn reset(&mut self) {
        AllpassFilter::reset(self);
    }
}
