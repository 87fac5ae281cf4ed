//! Mid/side stereo width with side-channel tone controls.
//!
//! Splits each frame into mid and side, shapes the side signal and folds it
//! back:
//!
//! ```text
//! mid  = (L + R) / 2
//! side = (L - R) / 2
//! side = highcut(lowcut(side)) * width / 100
//! side += hp3k(side) * (10^(brightness/20) - 1)     when brightness != 0
//! L = mid + side
//! R = mid - side
//! ```
//!
//! Width 0 % collapses to mono, 100 % is unchanged, 200 % doubles the side
//! level. The two side cuts use [`SimpleFilter`] percentage sweeps and are
//! bypassed at 1 % or less; the high cut drives its low-pass with
//! `100 - amount` so that a larger amount removes more top end.
//!
//! # Parameters
//!
//! | Parameter | Range | Default | Ramp |
//! |-----------|-------|---------|------|
//! | Width | 0–200 % | 100 % | 20 ms |
//! | Brightness | -12–12 dB | 0 dB | 10 ms |
//! | Low cut | 0–100 % | 0 % | 20 ms |
//! | High cut | 0–100 % | 0 % | 20 ms |

use chasm_core::{FilterType, ParameterSmoother, Sample, SimpleFilter, clamp_or, db_to_gain};

use crate::tone::CUT_THRESHOLD_PERCENT;

/// Default width in percent.
pub const DEFAULT_WIDTH_PERCENT: f64 = 100.0;

/// Maximum width in percent.
pub const MAX_WIDTH_PERCENT: f64 = 200.0;

/// Corner of the side-channel air filter.
pub const SIDE_AIR_FREQ_HZ: f64 = 3000.0;

const WIDTH_RAMP_MS: f64 = 20.0;
const BRIGHTNESS_RAMP_MS: f64 = 10.0;
const CUT_RAMP_MS: f64 = 20.0;
const MAX_BRIGHTNESS_DB: f64 = 12.0;

/// A side-channel cut plus the amount its coefficient was last set for.
#[derive(Debug, Clone)]
struct SideCut<T: Sample> {
    filter: SimpleFilter<T>,
    amount: ParameterSmoother<T>,
    applied: Option<T>,
}

impl<T: Sample> SideCut<T> {
    fn new(filter_type: FilterType, sample_rate: f64) -> Self {
        Self {
            filter: SimpleFilter::new(filter_type, sample_rate),
            amount: ParameterSmoother::with_ramp(T::ZERO, sample_rate, CUT_RAMP_MS),
            applied: None,
        }
    }

    /// Set the target amount in percent; NaN keeps the current target.
    fn set_amount(&mut self, percent: f64) {
        let current = self.amount.target_value().to_f64();
        let percent = clamp_or(percent, 0.0, 100.0, current);
        self.amount.set_target_value(T::from_f64(percent));
    }

    /// Advance the smoother and return whether the cut is in the path.
    #[inline]
    fn advance(&mut self) -> bool {
        let amount = self.amount.next_value();
        if amount.to_f64() <= CUT_THRESHOLD_PERCENT {
            self.applied = None;
            return false;
        }
        if self.applied != Some(amount) {
            if self.applied.is_none() {
                self.filter.reset();
            }
            let percent = match self.filter.filter_type() {
                FilterType::HighPass => amount.to_f64(),
                FilterType::LowPass => 100.0 - amount.to_f64(),
            };
            self.filter.set_cutoff_percentage(percent);
            self.applied = Some(amount);
        }
        true
    }
}

/// Mid/side width processor for one stereo pair.
///
/// # Example
///
/// ```rust
/// use chasm_effects::StereoEnhancer;
///
/// let mut enhancer = StereoEnhancer::<f32>::new(48000.0);
/// enhancer.set_width(0.0);
/// enhancer.snap_to_targets();
///
/// let mut left = [1.0_f32, 0.5];
/// let mut right = [0.0_f32, -0.5];
/// enhancer.process_block(&mut left, &mut right);
/// assert_eq!(left, right);
/// ```
#[derive(Debug, Clone)]
pub struct StereoEnhancer<T: Sample> {
    width: ParameterSmoother<T>,
    brightness: ParameterSmoother<T>,
    low_cut: SideCut<T>,
    high_cut: SideCut<T>,
    air: SimpleFilter<T>,
}

impl<T: Sample> StereoEnhancer<T> {
    /// Neutral enhancer (width 100 %, no side shaping).
    pub fn new(sample_rate: f64) -> Self {
        let mut air = SimpleFilter::new(FilterType::HighPass, sample_rate);
        air.set_cutoff_frequency(SIDE_AIR_FREQ_HZ);
        Self {
            width: ParameterSmoother::with_ramp(
                T::from_f64(DEFAULT_WIDTH_PERCENT),
                sample_rate,
                WIDTH_RAMP_MS,
            ),
            brightness: ParameterSmoother::with_ramp(T::ZERO, sample_rate, BRIGHTNESS_RAMP_MS),
            low_cut: SideCut::new(FilterType::HighPass, sample_rate),
            high_cut: SideCut::new(FilterType::LowPass, sample_rate),
            air,
        }
    }

    /// Re-time the smoothers and filters for `sample_rate`.
    ///
    /// Returns to the neutral defaults.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.width.prepare(sample_rate, WIDTH_RAMP_MS);
        self.brightness.prepare(sample_rate, BRIGHTNESS_RAMP_MS);
        for cut in [&mut self.low_cut, &mut self.high_cut] {
            cut.amount.prepare(sample_rate, CUT_RAMP_MS);
            cut.filter.prepare(sample_rate);
        }
        self.air.prepare(sample_rate);
        self.reset();
    }

    /// Set the width in percent, clamped to `[0, 200]`. NaN is ignored.
    pub fn set_width(&mut self, percent: f64) {
        let percent = clamp_or(percent, 0.0, MAX_WIDTH_PERCENT, self.width());
        self.width.set_target_value(T::from_f64(percent));
    }

    /// Set the side brightness in dB, clamped to `[-12, 12]`. NaN is ignored.
    pub fn set_brightness(&mut self, gain_db: f64) {
        let current = self.brightness.target_value().to_f64();
        let gain_db = clamp_or(gain_db, -MAX_BRIGHTNESS_DB, MAX_BRIGHTNESS_DB, current);
        self.brightness.set_target_value(T::from_f64(gain_db));
    }

    /// Set the side low-cut amount in percent.
    pub fn set_low_cut(&mut self, percent: f64) {
        self.low_cut.set_amount(percent);
    }

    /// Set the side high-cut amount in percent.
    pub fn set_high_cut(&mut self, percent: f64) {
        self.high_cut.set_amount(percent);
    }

    /// Target width in percent.
    pub fn width(&self) -> f64 {
        self.width.target_value().to_f64()
    }

    /// Jump every smoother to its target.
    pub fn snap_to_targets(&mut self) {
        self.width.snap_to_target_value();
        self.brightness.snap_to_target_value();
        self.low_cut.amount.snap_to_target_value();
        self.high_cut.amount.snap_to_target_value();
    }

    /// Clear filter history and return to the neutral defaults.
    pub fn reset(&mut self) {
        self.width.reset(T::from_f64(DEFAULT_WIDTH_PERCENT));
        self.brightness.reset(T::ZERO);
        for cut in [&mut self.low_cut, &mut self.high_cut] {
            cut.amount.reset(T::ZERO);
            cut.filter.reset();
            cut.applied = None;
        }
        self.air.reset();
    }

    /// Process one frame.
    #[inline]
    pub fn process_frame(&mut self, left: T, right: T) -> (T, T) {
        let half = T::from_f64(0.5);
        let width = self.width.next_value();
        let brightness = self.brightness.next_value();
        let low_cut_active = self.low_cut.advance();
        let high_cut_active = self.high_cut.advance();

        let mid = (left + right) * half;
        let mut side = (left - right) * half;

        if low_cut_active {
            side = self.low_cut.filter.process_sample(side);
        }
        if high_cut_active {
            side = self.high_cut.filter.process_sample(side);
        }

        side = side * (width / T::from_f64(100.0));

        if brightness != T::ZERO {
            let boost = db_to_gain(brightness) - T::ONE;
            side = side + self.air.process_sample(side) * boost;
        }

        (mid + side, mid - side)
    }

    /// Process a stereo pair in place. Extra samples in the longer channel
    /// are left untouched.
    pub fn process_block(&mut self, left: &mut [T], right: &mut [T]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (out_l, out_r) = self.process_frame(*l, *r);
            *l = out_l;
            *r = out_r;
        }
    }
}
