//! Post-diffusion tone shaping: a brightness shelf and two cut filters.
//!
//! [`ToneShaper`] runs [`BrightnessEq`] then [`DualCutFilter`]. All three
//! redesign their biquads only when the mapped value actually moves, so a
//! host repeating the same parameter every 32 samples costs nothing.
//!
//! | Stage | Filter | Control |
//! |-------|--------|---------|
//! | Brightness | RBJ high shelf, 3 kHz, Q 0.707 | -12–12 dB |
//! | Low cut | Butterworth high-pass | 0–100 % → 20–1000 Hz |
//! | High cut | Butterworth low-pass | 0–100 % → 20 kHz–1 kHz |
//!
//! Each cut is bypassed outright at 1 % or less, so the default settings
//! leave the signal untouched.

use chasm_core::{
    BUTTERWORTH_Q, Biquad, Sample, SampleProcessor, clamp_or, high_shelf_coefficients,
    highpass_coefficients, lowpass_coefficients,
};

/// Brightness shelf corner frequency.
pub const BRIGHTNESS_FREQ_HZ: f64 = 3000.0;

/// Brightness gain limit in dB (symmetric).
pub const MAX_BRIGHTNESS_DB: f64 = 12.0;

/// Smallest gain change that triggers a shelf redesign.
pub const BRIGHTNESS_EPSILON_DB: f64 = 0.01;

/// Cut amounts at or below this percentage bypass the filter.
pub const CUT_THRESHOLD_PERCENT: f64 = 1.0;

/// Map a low-cut percentage to its high-pass corner (20–1000 Hz).
#[inline]
pub fn low_cut_frequency(percent: f64) -> f64 {
    20.0 + percent.clamp(0.0, 100.0) * 9.8
}

/// Map a high-cut percentage to its low-pass corner (20 kHz down to 1 kHz).
#[inline]
pub fn high_cut_frequency(percent: f64) -> f64 {
    20_000.0 - percent.clamp(0.0, 100.0) * 190.0
}

/// High shelf at 3 kHz.
#[derive(Debug, Clone)]
pub struct BrightnessEq<T: Sample> {
    shelf: Biquad<T>,
    gain_db: f64,
    sample_rate: f64,
}

impl<T: Sample> BrightnessEq<T> {
    /// Flat shelf at `sample_rate`.
    pub fn new(sample_rate: f64) -> Self {
        let mut eq = Self {
            shelf: Biquad::new(),
            gain_db: 0.0,
            sample_rate,
        };
        eq.design();
        eq
    }

    /// Redesign for a new sample rate and clear history.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.design();
        self.shelf.reset();
    }

    /// Set the shelf gain in dB, clamped to `[-12, 12]`.
    ///
    /// Changes of 0.01 dB or less are ignored.
    pub fn set_gain_db(&mut self, gain_db: f64) {
        let gain_db = clamp_or(gain_db, -MAX_BRIGHTNESS_DB, MAX_BRIGHTNESS_DB, self.gain_db);
        if (gain_db - self.gain_db).abs() > BRIGHTNESS_EPSILON_DB {
            self.gain_db = gain_db;
            self.design();
        }
    }

    /// Gain the shelf is currently designed for.
    pub fn gain_db(&self) -> f64 {
        self.gain_db
    }

    /// Process one sample.
    #[inline]
    pub fn process_sample(&mut self, input: T) -> T {
        self.shelf.process_sample(input)
    }

    /// Clear filter history.
    pub fn reset(&mut self) {
        self.shelf.reset();
    }

    fn design(&mut self) {
        self.shelf.set_coefficients(high_shelf_coefficients(
            BRIGHTNESS_FREQ_HZ,
            BUTTERWORTH_Q,
            self.gain_db,
            self.sample_rate,
        ));
    }
}

impl<T: Sample> SampleProcessor<T> for BrightnessEq<T> {
    #[inline]
    fn process_sample(&mut self, input: T) -> T {
        BrightnessEq::process_sample(self, input)
    }

    fn reset(&mut self) {
        BrightnessEq::reset(self);
    }
}

/// One switchable Butterworth cut.
#[derive(Debug, Clone)]
struct CutStage<T: Sample> {
    filter: Biquad<T>,
    percent: f64,
    frequency: f64,
}

impl<T: Sample> CutStage<T> {
    fn new() -> Self {
        Self {
            filter: Biquad::new(),
            percent: 0.0,
            frequency: 0.0,
        }
    }

    #[inline]
    fn is_active(&self) -> bool {
        self.percent > CUT_THRESHOLD_PERCENT
    }
}

/// Low-cut and high-cut Butterworth pair.
///
/// # Example
///
/// ```rust
/// use chasm_effects::DualCutFilter;
///
/// let mut cuts = DualCutFilter::<f32>::new(48000.0);
/// assert_eq!(cuts.process_sample(0.25), 0.25);
///
/// cuts.set_low_cut(50.0);
/// assert!(cuts.low_cut_active());
/// ```
#[derive(Debug, Clone)]
pub struct DualCutFilter<T: Sample> {
    low: CutStage<T>,
    high: CutStage<T>,
    sample_rate: f64,
}

impl<T: Sample> DualCutFilter<T> {
    /// Both cuts at 0 % (bypassed).
    pub fn new(sample_rate: f64) -> Self {
        Self {
            low: CutStage::new(),
            high: CutStage::new(),
            sample_rate,
        }
    }

    /// Redesign active cuts for a new sample rate and clear history.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.low.frequency = 0.0;
        self.high.frequency = 0.0;
        self.set_low_cut(self.low.percent);
        self.set_high_cut(self.high.percent);
        self.reset();
    }

    /// Set the low-cut amount in percent.
    pub fn set_low_cut(&mut self, percent: f64) {
        let sample_rate = self.sample_rate;
        Self::update_stage(&mut self.low, percent, low_cut_frequency, |f| {
            highpass_coefficients(f, BUTTERWORTH_Q, sample_rate)
        });
    }

    /// Set the high-cut amount in percent.
    pub fn set_high_cut(&mut self, percent: f64) {
        let sample_rate = self.sample_rate;
        Self::update_stage(&mut self.high, percent, high_cut_frequency, |f| {
            lowpass_coefficients(f, BUTTERWORTH_Q, sample_rate)
        });
    }

    /// Low-cut amount in percent.
    pub fn low_cut(&self) -> f64 {
        self.low.percent
    }

    /// High-cut amount in percent.
    pub fn high_cut(&self) -> f64 {
        self.high.percent
    }

    /// Whether the high-pass is in the signal path.
    pub fn low_cut_active(&self) -> bool {
        self.low.is_active()
    }

    /// Whether the low-pass is in the signal path.
    pub fn high_cut_active(&self) -> bool {
        self.high.is_active()
    }

    /// Process one sample.
    #[inline]
    pub fn process_sample(&mut self, input: T) -> T {
        let mut x = input;
        if self.low.is_active() {
            x = self.low.filter.process_sample(x);
        }
        if self.high.is_active() {
            x = self.high.filter.process_sample(x);
        }
        x
    }

    /// Clear filter history.
    pub fn reset(&mut self) {
        self.low.filter.reset();
        self.high.filter.reset();
    }

    fn update_stage(
        stage: &mut CutStage<T>,
        percent: f64,
        map: fn(f64) -> f64,
        design: impl Fn(f64) -> chasm_core::Coefficients,
    ) {
        let was_active = stage.is_active();
        stage.percent = clamp_or(percent, 0.0, 100.0, stage.percent);
        if !stage.is_active() {
            return;
        }

        let frequency = map(stage.percent);
        if frequency != stage.frequency {
            stage.frequency = frequency;
            stage.filter.set_coefficients(design(frequency));
        }
        // History from before a bypass would click back in
        if !was_active {
            stage.filter.reset();
        }
    }
}

impl<T: Sample> SampleProcessor<T> for DualCutFilter<T> {
    #[inline]
    fn process_sample(&mut self, input: T) -> T {
        DualCutFilter::process_sample(self, input)
    }

    fn reset(&mut self) {
        DualCutFilter::reset(self);
    }
}

/// Brightness shelf followed by the dual cut.
#[derive(Debug, Clone)]
pub struct ToneShaper<T: Sample> {
    brightness: BrightnessEq<T>,
    cuts: DualCutFilter<T>,
}

impl<T: Sample> ToneShaper<T> {
    /// Neutral tone at `sample_rate`.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            brightness: BrightnessEq::new(sample_rate),
            cuts: DualCutFilter::new(sample_rate),
        }
    }

    /// Re-prepare both stages.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.brightness.prepare(sample_rate);
        self.cuts.prepare(sample_rate);
    }

    /// Set brightness in dB.
    pub fn set_brightness_db(&mut self, gain_db: f64) {
        self.brightness.set_gain_db(gain_db);
    }

    /// Set the low-cut amount in percent.
    pub fn set_low_cut(&mut self, percent: f64) {
        self.cuts.set_low_cut(percent);
    }

    /// Set the high-cut amount in percent.
    pub fn set_high_cut(&mut self, percent: f64) {
        self.cuts.set_high_cut(percent);
    }

    /// The brightness stage.
    pub fn brightness(&self) -> &BrightnessEq<T> {
        &self.brightness
    }

    /// The cut stage.
    pub fn cuts(&self) -> &DualCutFilter<T> {
        &self.cuts
    }

    /// Process one sample.
    #[inline]
    pub fn process_sample(&mut self, input: T) -> T {
        self.cuts.process_sample(self.brightness.process_sample(input))
    }

    /// Clear both stages' history.
    pub fn reset(&mut self) {
        self.brightness.reset();
        self.cuts.reset();
    }
}

impl<T: Sample> SampleProcessor<T> for ToneShaper<T> {
    #[inline]
    fn process_sample(&mut self, input: T) -> T {
        ToneShaper::process_sample(self, input)
    }

    fn reset(&mut self) {
        ToneShaper::reset(self);
    }
}
