//! Block-level safety compressor used as the limiter's last stage.
//!
//! A linked feed-forward peak compressor: one [`EnvelopeFollower`] tracks the
//! per-frame maximum across channels, and the gain computer applies
//!
//! ```text
//! gain = (env / threshold)^(1/ratio - 1)     env > threshold
//! gain = 1                                   otherwise
//! ```
//!
//! clamped to unity so the stage can only ever reduce level.
//!
//! # Parameters
//!
//! | Parameter | Range | Default |
//! |-----------|-------|---------|
//! | Threshold | -24–0 dB | -0.5 dB |
//! | Ratio | 1–100 | 20 |
//! | Attack | 0.01–100 ms | 0.1 ms |
//! | Release | 1–1000 ms | 10 ms |

use chasm_core::{EnvelopeFollower, Sample, clamp_or, db_to_gain, gain_to_db};

/// Default threshold in dB.
pub const DEFAULT_THRESHOLD_DB: f64 = -0.5;

/// Default compression ratio.
pub const DEFAULT_RATIO: f64 = 20.0;

/// Default attack in milliseconds.
pub const DEFAULT_ATTACK_MS: f64 = 0.1;

/// Default release in milliseconds.
pub const DEFAULT_RELEASE_MS: f64 = 10.0;

/// Linked stereo peak compressor operating on whole buffers.
///
/// # Example
///
/// ```rust
/// use chasm_effects::BlockCompressor;
///
/// let mut comp = BlockCompressor::<f32>::new(48000.0);
/// let mut left = [1.5_f32; 256];
/// let mut right = [1.5_f32; 256];
/// comp.process_stereo(&mut left, &mut right);
/// assert!(left[255] < 1.5);
/// ```
#[derive(Debug, Clone)]
pub struct BlockCompressor<T: Sample> {
    envelope: EnvelopeFollower<T>,
    threshold_db: f64,
    threshold: T,
    ratio: f64,
    /// `1/ratio - 1`, the gain-computer exponent
    exponent: T,
    last_gain: T,
}

impl<T: Sample> BlockCompressor<T> {
    /// Create with the default settings at `sample_rate`.
    pub fn new(sample_rate: f64) -> Self {
        let mut comp = Self {
            envelope: EnvelopeFollower::with_times(
                sample_rate,
                DEFAULT_ATTACK_MS,
                DEFAULT_RELEASE_MS,
            ),
            threshold_db: DEFAULT_THRESHOLD_DB,
            threshold: T::ONE,
            ratio: DEFAULT_RATIO,
            exponent: T::ZERO,
            last_gain: T::ONE,
        };
        comp.set_threshold_db(DEFAULT_THRESHOLD_DB);
        comp.set_ratio(DEFAULT_RATIO);
        comp
    }

    /// Recompute the envelope coefficients for `sample_rate` and clear state.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.envelope.set_sample_rate(sample_rate);
        self.reset();
    }

    /// Set the threshold in dB, clamped to `[-24, 0]`.
    pub fn set_threshold_db(&mut self, threshold_db: f64) {
        self.threshold_db = clamp_or(threshold_db, -24.0, 0.0, self.threshold_db);
        self.threshold = db_to_gain(T::from_f64(self.threshold_db));
    }

    /// Threshold in dB.
    pub fn threshold_db(&self) -> f64 {
        self.threshold_db
    }

    /// Set the ratio, clamped to `[1, 100]`.
    pub fn set_ratio(&mut self, ratio: f64) {
        self.ratio = clamp_or(ratio, 1.0, 100.0, self.ratio);
        self.exponent = T::from_f64(1.0 / self.ratio - 1.0);
    }

    /// Compression ratio.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Set attack in milliseconds, clamped to `[0.01, 100]`.
    pub fn set_attack_ms(&mut self, attack_ms: f64) {
        let current = self.envelope.attack_ms();
        self.envelope.set_attack_ms(clamp_or(attack_ms, 0.01, 100.0, current));
    }

    /// Set release in milliseconds, clamped to `[1, 1000]`.
    pub fn set_release_ms(&mut self, release_ms: f64) {
        let current = self.envelope.release_ms();
        self.envelope.set_release_ms(clamp_or(release_ms, 1.0, 1000.0, current));
    }

    /// Gain applied to the most recent frame, in dB (zero or negative).
    pub fn gain_reduction_db(&self) -> f64 {
        gain_to_db(self.last_gain).to_f64()
    }

    /// Clear the envelope.
    pub fn reset(&mut self) {
        self.envelope.reset();
        self.last_gain = T::ONE;
    }

    /// Compress a mono buffer in place.
    pub fn process_mono(&mut self, buffer: &mut [T]) {
        for sample in buffer.iter_mut() {
            let gain = self.frame_gain(sample.abs());
            *sample = *sample * gain;
        }
    }

    /// Compress a stereo pair in place with one shared gain per frame.
    pub fn process_stereo(&mut self, left: &mut [T], right: &mut [T]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let gain = self.frame_gain(l.abs().max(r.abs()));
            *l = *l * gain;
            *r = *r * gain;
        }
    }

    #[inline]
    fn frame_gain(&mut self, peak: T) -> T {
        let env = self.envelope.process(peak);
        let gain = if env > self.threshold {
            (env / self.threshold).powf(self.exponent).min(T::ONE)
        } else {
            T::ONE
        };
        self.last_gain = gain;
        gain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let comp = BlockCompressor::<f32>::new(48000.0);
        assert_eq!(comp.threshold_db(), -0.5);
        assert_eq!(comp.ratio(), 20.0);
        assert_eq!(comp.gain_reduction_db(), 0.0);
    }

    #[test]
    fn nan_settings_are_ignored() {
        let mut comp = BlockCompressor::<f64>::new(48000.0);
        comp.set_threshold_db(f64::NAN);
        comp.set_ratio(f64::NAN);
        comp.set_attack_ms(f64::NAN);
        comp.set_release_ms(f64::NAN);
        assert_eq!(comp.threshold_db(), -0.5);
        assert_eq!(comp.ratio(), 20.0);

        let mut buffer = vec![2.0; 480];
        comp.process_mono(&mut buffer);
        assert!(buffer.iter().all(|x| x.is_finite()));
        assert!(buffer[479] < 2.0);
    }

    #[test]
    fn quiet_signal_untouched() {
        let mut comp = BlockCompressor::<f64>::new(48000.0);
        let mut buffer: Vec<f64> = (0..1000).map(|i| 0.5 * libm::sin(i as f64 * 0.05)).collect();
        let original = buffer.clone();
        comp.process_mono(&mut buffer);
        assert_eq!(buffer, original);
    }

    #[test]
    fn loud_signal_reduced_to_ratio() {
        let mut comp = BlockCompressor::<f64>::new(48000.0);
        let mut buffer = vec![2.0; 4800];
        comp.process_mono(&mut buffer);

        // Steady state: output = thr * (2/thr)^(1/20)
        let thr = db_to_gain(-0.5);
        let expected = thr * libm::pow(2.0 / thr, 1.0 / 20.0);
        assert!((buffer[4799] - expected).abs() < 1e-6, "got {}", buffer[4799]);
        assert!(comp.gain_reduction_db() < -5.0);
    }

    #[test]
    fn gain_never_exceeds_unity() {
        let mut comp = BlockCompressor::<f32>::new(48000.0);
        comp.set_ratio(1.0);
        let mut buffer = [3.0_f32; 512];
        comp.process_mono(&mut buffer);
        assert!(buffer.iter().all(|&x| x <= 3.0));
    }

    #[test]
    fn stereo_is_linked() {
        let mut comp = BlockCompressor::<f64>::new(48000.0);
        let mut left = vec![2.0; 1000];
        let mut right = vec![0.1; 1000];
        comp.process_stereo(&mut left, &mut right);
        for (l, r) in left.iter().zip(&right) {
            assert!((l / 2.0 - r / 0.1).abs() < 1e-9);
        }
        assert!(right[999] < 0.1);
    }

    #[test]
    fn reset_clears_envelope() {
        let mut comp = BlockCompressor::<f64>::new(48000.0);
        let mut loud = vec![4.0; 256];
        comp.process_mono(&mut loud);
        comp.reset();
        assert_eq!(comp.gain_reduction_db(), 0.0);

        let mut quiet = vec![0.9; 16];
        comp.process_mono(&mut quiet);
        assert!(quiet.iter().all(|&x| x == 0.9));
    }
}
