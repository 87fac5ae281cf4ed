//! First-order (6 dB/oct) high-pass and low-pass filters.
//!
//! High-pass (RC differentiator):
//!
//! ```text
//! a    = RC / (RC + dt),   RC = 1 / (2π f),  dt = 1 / fs
//! y[n] = a * (y[n-1] + x[n] - x[n-1])
//! ```
//!
//! Low-pass (one-pole integrator):
//!
//! ```text
//! a    = 1 - exp(-2π f / fs)
//! y[n] = a * x[n] + (1 - a) * y[n-1]
//! ```
//!
//! Cutoffs can be addressed in Hz or as a percentage of a type-specific
//! sweep: 0–100 % covers 20–2 000 Hz for the high-pass and 2–20 kHz for the
//! low-pass.
//!
//! # Reference
//!
//! Julius O. Smith III, "Introduction to Digital Filters with Audio Applications",
//! Section: One-Pole Filter.

use core::f64::consts::TAU;

use crate::{Sample, SampleProcessor, clamp_or, flush_denormal, percent_to_normalized};

/// Lowest settable cutoff in Hz.
pub const MIN_CUTOFF_HZ: f64 = 10.0;
/// Highest settable cutoff in Hz.
pub const MAX_CUTOFF_HZ: f64 = 20_000.0;

/// Response of a [`SimpleFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    /// Attenuates below the cutoff.
    HighPass,
    /// Attenuates above the cutoff.
    LowPass,
}

impl FilterType {
    /// Frequency range swept by [`SimpleFilter::set_cutoff_percentage`].
    pub const fn sweep_range(self) -> (f64, f64) {
        match self {
            Self::HighPass => (20.0, 2_000.0),
            Self::LowPass => (2_000.0, 20_000.0),
        }
    }
}

/// One-pole high-pass or low-pass filter.
///
/// # Invariants
///
/// - cutoff is in `[10, 20000]` Hz and below Nyquist
/// - history is flushed to zero below the denormal threshold
///
/// # Example
///
/// ```rust
/// use chasm_core::{FilterType, SimpleFilter};
///
/// let mut hp = SimpleFilter::<f32>::new(FilterType::HighPass, 48000.0);
/// hp.set_cutoff_frequency(100.0);
/// let _y = hp.process_sample(1.0);
/// ```
#[derive(Debug, Clone)]
pub struct SimpleFilter<T: Sample> {
    filter_type: FilterType,
    sample_rate: f64,
    cutoff_hz: f64,
    coeff: T,
    x1: T,
    y1: T,
}

impl<T: Sample> SimpleFilter<T> {
    /// Create a filter of the given type at 1 kHz.
    pub fn new(filter_type: FilterType, sample_rate: f64) -> Self {
        let mut filter = Self {
            filter_type,
            sample_rate,
            cutoff_hz: 1_000.0,
            coeff: T::ZERO,
            x1: T::ZERO,
            y1: T::ZERO,
        };
        filter.recalculate_coeff();
        filter
    }

    /// Update sample rate, recompute the coefficient and clear history.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.set_cutoff_frequency(self.cutoff_hz);
        self.reset();
    }

    /// Filter response.
    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Set the cutoff in Hz, clamped to `[10, 20000]` and below Nyquist.
    pub fn set_cutoff_frequency(&mut self, hz: f64) {
        let upper = MAX_CUTOFF_HZ.min(self.sample_rate * 0.49).max(MIN_CUTOFF_HZ);
        self.cutoff_hz = clamp_or(hz, MIN_CUTOFF_HZ, upper, self.cutoff_hz);
        self.recalculate_coeff();
    }

    /// Set the cutoff as a percentage of the type's sweep range.
    pub fn set_cutoff_percentage(&mut self, percent: f64) {
        let (lo, hi) = self.filter_type.sweep_range();
        self.set_cutoff_frequency(lo + percent_to_normalized(percent) * (hi - lo));
    }

    /// Cutoff in Hz.
    pub fn cutoff_frequency(&self) -> f64 {
        self.cutoff_hz
    }

    /// Process one sample.
    #[inline]
    pub fn process_sample(&mut self, input: T) -> T {
        let a = self.coeff;
        let output = match self.filter_type {
            FilterType::HighPass => a * (self.y1 + input - self.x1),
            FilterType::LowPass => a * input + (T::ONE - a) * self.y1,
        };
        self.x1 = input;
        self.y1 = flush_denormal(output);
        output
    }

    /// Zero the filter history.
    pub fn reset(&mut self) {
        self.x1 = T::ZERO;
        self.y1 = T::ZERO;
    }

    fn recalculate_coeff(&mut self) {
        let coeff = match self.filter_type {
            FilterType::HighPass => {
                let rc = 1.0 / (TAU * self.cutoff_hz);
                let dt = 1.0 / self.sample_rate;
                rc / (rc + dt)
            }
            FilterType::LowPass => 1.0 - libm::exp(-TAU * self.cutoff_hz / self.sample_rate),
        };
        self.coeff = T::from_f64(coeff);
    }
}

impl<T: Sample> SampleProcessor<T> for SimpleFilter<T> {
    #[inline]
    fn process_sample(&mut self, input: T) -> T {
        SimpleFilter::process_sample(self, input)
    }

    fn reset(&mut self) {
        SimpleFilter::reset(self);
    }
}
