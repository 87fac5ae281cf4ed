//! Four-stage Schroeder allpass diffuser.
//!
//! Four [`AllpassFilter`]s in series smear transients into a dense wash
//! without colouring the spectrum. Stage delays are fixed ratios of one base
//! delay, chosen so that no stage is an integer multiple of another and the
//! echoes never stack on a common period.
//!
//! # Parameters
//!
//! | Parameter | Range | Default | Ramp |
//! |-----------|-------|---------|------|
//! | Delay | 1–100 ms | 30 ms | 50 ms |
//! | Character | 0.1–10 | 1.0 | 10 ms |
//!
//! Character maps to the shared stage feedback:
//!
//! ```text
//! g = clamp(0.3 + 0.6 * log10(character), 0.1, 0.9)
//! ```
//!
//! so 0.1 gives the sparsest diffusion (g = 0.1), 1.0 gives g = 0.3 and
//! 10 saturates at g = 0.9.

use chasm_core::{AllpassFilter, ParameterSmoother, Sample, SampleProcessor, clamp_or};

/// Number of allpass stages.
pub const NUM_STAGES: usize = 4;

/// Per-stage multiples of the base delay.
pub const DELAY_RATIOS: [f64; NUM_STAGES] = [0.41, 0.66, 0.97, 1.25];

/// Base delay range in milliseconds.
pub const DELAY_RANGE_MS: (f64, f64) = (1.0, 100.0);

/// Character range.
pub const CHARACTER_RANGE: (f64, f64) = (0.1, 10.0);

/// Base delay after construction or reset.
pub const DEFAULT_DELAY_MS: f64 = 30.0;

/// Character after construction or reset.
pub const DEFAULT_CHARACTER: f64 = 1.0;

/// Delay smoothing ramp.
pub const DELAY_RAMP_MS: f64 = 50.0;

/// Character smoothing ramp.
pub const CHARACTER_RAMP_MS: f64 = 10.0;

/// Length of each stage's delay line.
///
/// Stage 4 runs at 1.25x the base delay, so above 80 ms it pins to the end
/// of its line.
const DELAY_LINE_MS: f64 = DELAY_RANGE_MS.1;

/// Floor applied before the character logarithm.
const CHARACTER_EPSILON: f64 = 1e-6;

/// Map character to allpass feedback.
#[inline]
pub fn character_to_feedback(character: f64) -> f64 {
    (0.3 + 0.6 * libm::log10(character.max(CHARACTER_EPSILON))).clamp(0.1, 0.9)
}

/// Four allpass stages sharing a smoothed base delay and feedback.
///
/// # Example
///
/// ```rust
/// use chasm_effects::SchroederAllpassChain;
///
/// let mut diffuser = SchroederAllpassChain::<f32>::new(48000.0);
/// diffuser.set_delay_time(20.0);
/// diffuser.set_character(2.0);
///
/// let mut buffer = vec![0.0_f32; 512];
/// buffer[0] = 1.0;
/// diffuser.process_block(&mut buffer);
/// ```
#[derive(Debug, Clone)]
pub struct SchroederAllpassChain<T: Sample> {
    stages: [AllpassFilter<T>; NUM_STAGES],
    delay_ms: ParameterSmoother<T>,
    character: ParameterSmoother<T>,
    /// Stage settings must be rewritten on the next sample
    dirty: bool,
}

impl<T: Sample> SchroederAllpassChain<T> {
    /// Create a diffuser prepared for `sample_rate` at the default settings.
    pub fn new(sample_rate: f64) -> Self {
        let mut chain = Self {
            stages: core::array::from_fn(|_| AllpassFilter::new(sample_rate, DELAY_LINE_MS)),
            delay_ms: ParameterSmoother::new(T::from_f64(DEFAULT_DELAY_MS)),
            character: ParameterSmoother::new(T::from_f64(DEFAULT_CHARACTER)),
            dirty: true,
        };
        chain.prepare(sample_rate);
        chain
    }

    /// Reallocate the stage delay lines and re-time both smoothers.
    ///
    /// Clears all audio state and returns to the defaults.
    pub fn prepare(&mut self, sample_rate: f64) {
        for stage in &mut self.stages {
            stage.prepare(sample_rate, DELAY_LINE_MS);
        }
        self.delay_ms.prepare(sample_rate, DELAY_RAMP_MS);
        self.character.prepare(sample_rate, CHARACTER_RAMP_MS);
        self.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "diffusion_prepare: {NUM_STAGES} stages, {} samples each at {sample_rate} Hz",
            self.stages[0].capacity()
        );
    }

    /// Set the base delay in milliseconds, clamped to `[1, 100]`.
    ///
    /// NaN keeps the current target.
    pub fn set_delay_time(&mut self, delay_ms: f64) {
        let (lo, hi) = DELAY_RANGE_MS;
        let delay_ms = clamp_or(delay_ms, lo, hi, self.delay_time());
        self.delay_ms.set_target_value(T::from_f64(delay_ms));
    }

    /// Set the character, clamped to `[0.1, 10]`. NaN keeps the current target.
    pub fn set_character(&mut self, character: f64) {
        let (lo, hi) = CHARACTER_RANGE;
        let character = clamp_or(character, lo, hi, self.character());
        self.character.set_target_value(T::from_f64(character));
    }

    /// Jump both smoothers to their targets.
    pub fn snap_to_targets(&mut self) {
        self.delay_ms.snap_to_target_value();
        self.character.snap_to_target_value();
        self.dirty = true;
    }

    /// Target base delay in milliseconds.
    pub fn delay_time(&self) -> f64 {
        self.delay_ms.target_value().to_f64()
    }

    /// Target character.
    pub fn character(&self) -> f64 {
        self.character.target_value().to_f64()
    }

    /// Feedback currently applied to every stage.
    pub fn feedback(&self) -> T {
        self.stages[0].feedback()
    }

    /// Current per-stage delays in samples.
    pub fn stage_delays(&self) -> [f64; NUM_STAGES] {
        core::array::from_fn(|i| self.stages[i].delay_samples())
    }

    /// Clear the delay lines and return both smoothers to the defaults.
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
        self.delay_ms.reset(T::from_f64(DEFAULT_DELAY_MS));
        self.character.reset(T::from_f64(DEFAULT_CHARACTER));
        self.dirty = true;
    }

    /// Run one sample through all four stages.
    #[inline]
    pub fn process_sample(&mut self, input: T) -> T {
        let ramping = self.delay_ms.is_smoothing() || self.character.is_smoothing();
        let delay_ms = self.delay_ms.next_value().to_f64();
        let character = self.character.next_value().to_f64();

        if ramping || self.dirty {
            self.apply_settings(delay_ms, character);
            self.dirty = false;
        }

        let mut x = input;
        for stage in &mut self.stages {
            x = stage.process_sample(x);
        }
        x
    }

    /// Process a buffer in place.
    pub fn process_block(&mut self, buffer: &mut [T]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    fn apply_settings(&mut self, delay_ms: f64, character: f64) {
        let feedback = T::from_f64(character_to_feedback(character));
        for (stage, ratio) in self.stages.iter_mut().zip(DELAY_RATIOS) {
            stage.set_delay_time(delay_ms * ratio);
            stage.set_feedback(feedback);
        }
    }
}

impl<T: Sample> SampleProcessor<T> for SchroederAllpassChain<T> {
    #[inline]
    fn process_sample(&mut self, input: T) -> T {
        SchroederAllpassChain::process_sample(self, input)
    }

    fn process_block(&mut self, buffer: &mut [T]) {
        SchroederAllpassChain::process_block(self, buffer);
    }

    fn reset(&mut self) {
        SchroederAllpassChain::reset(self);
    }
}
