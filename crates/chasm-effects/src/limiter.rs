//! Output limiter: soft clip, envelope limiter, hard ceiling, safety compressor.
//!
//! The last stage of the chasm signal path. It keeps the diffused signal
//! inside full scale without lookahead latency.
//!
//! # Algorithm
//!
//! Per frame:
//!
//! 1. **Soft clip**: `tanh(2x) / 2` on every channel.
//! 2. **Envelope limiting**: an [`EnvelopeFollower`] (0.1 ms attack, 10 ms
//!    release) tracks the frame peak. Above the 0.8 threshold the frame is
//!    scaled by `threshold / (envelope + ε)`.
//! 3. **Ceiling**: hard clamp to the ceiling (0 dB by default).
//!
//! Then once over the whole buffer:
//!
//! 4. **Block compressor**: [`BlockCompressor`] at -0.5 dB, 20:1. Its gain
//!    never exceeds unity, so it cannot push a sample past the ceiling.
//!
//! With the limiter disabled every stage is skipped and the buffer is left
//! bit-for-bit untouched.
//!
//! # Stereo Linking
//!
//! The envelope sees `max(|L|, |R|)` so both channels always receive the
//! same gain and the stereo image does not shift under limiting.
//!
//! # Parameters
//!
//! | Parameter | Range | Default |
//! |-----------|-------|---------|
//! | Enabled | on/off | on |
//! | Ceiling | -24–0 dB | 0 dB |

use chasm_core::{EnvelopeFollower, Sample, clamp_or, db_to_gain, hard_clip, soft_clip};

use crate::BlockCompressor;

/// Envelope level above which gain reduction starts (linear).
pub const THRESHOLD: f64 = 0.8;

/// Envelope attack in milliseconds.
pub const ATTACK_MS: f64 = 0.1;

/// Envelope release in milliseconds.
pub const RELEASE_MS: f64 = 10.0;

/// Ceiling range in dB.
pub const CEILING_RANGE_DB: (f64, f64) = (-24.0, 0.0);

const ENVELOPE_EPSILON: f64 = 1e-6;

/// Linked-stereo output limiter.
///
/// # Example
///
/// ```rust
/// use chasm_effects::Limiter;
///
/// let mut limiter = Limiter::<f32>::new(48000.0);
/// limiter.set_ceiling_db(-6.0);
///
/// let mut buffer = [4.0_f32, -4.0, 0.1];
/// limiter.process_mono(&mut buffer);
/// assert!(buffer.iter().all(|x| x.abs() <= 0.502));
/// ```
#[derive(Debug, Clone)]
pub struct Limiter<T: Sample> {
    enabled: bool,
    envelope: EnvelopeFollower<T>,
    threshold: T,
    epsilon: T,
    ceiling_db: f64,
    ceiling: T,
    compressor: BlockCompressor<T>,
}

impl<T: Sample> Limiter<T> {
    /// Enabled limiter with a 0 dB ceiling.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            enabled: true,
            envelope: EnvelopeFollower::with_times(sample_rate, ATTACK_MS, RELEASE_MS),
            threshold: T::from_f64(THRESHOLD),
            epsilon: T::from_f64(ENVELOPE_EPSILON),
            ceiling_db: 0.0,
            ceiling: T::ONE,
            compressor: BlockCompressor::new(sample_rate),
        }
    }

    /// Recompute time constants for `sample_rate` and clear all state.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.envelope.set_sample_rate(sample_rate);
        self.compressor.prepare(sample_rate);
        self.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            enabled = self.enabled,
            ceiling_db = self.ceiling_db,
            "limiter_prepare: {sample_rate} Hz"
        );
    }

    /// Switch the limiter in or out.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the limiter is active.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the hard ceiling in dB, clamped to `[-24, 0]`. NaN is ignored.
    pub fn set_ceiling_db(&mut self, ceiling_db: f64) {
        let (lo, hi) = CEILING_RANGE_DB;
        self.ceiling_db = clamp_or(ceiling_db, lo, hi, self.ceiling_db);
        self.ceiling = db_to_gain(T::from_f64(self.ceiling_db));
    }

    /// Ceiling in dB.
    pub fn ceiling_db(&self) -> f64 {
        self.ceiling_db
    }

    /// Ceiling as a linear level.
    pub fn ceiling(&self) -> T {
        self.ceiling
    }

    /// Current envelope-stage gain reduction in dB (zero or negative).
    pub fn gain_reduction_db(&self) -> f64 {
        let env = self.envelope.level().to_f64();
        if env > THRESHOLD {
            20.0 * libm::log10(THRESHOLD / env)
        } else {
            0.0
        }
    }

    /// The block compressor stage.
    pub fn compressor(&self) -> &BlockCompressor<T> {
        &self.compressor
    }

    /// Clear the envelope and the compressor.
    pub fn reset(&mut self) {
        self.envelope.reset();
        self.compressor.reset();
    }

    /// Soft clip, envelope gain and ceiling for one mono sample.
    ///
    /// The block compressor is not applied; use [`process_mono`](Self::process_mono)
    /// for the full chain.
    #[inline]
    pub fn process_sample(&mut self, input: T) -> T {
        if !self.enabled {
            return input;
        }
        let shaped = soft_clip(input);
        let gain = self.envelope_gain(shaped.abs());
        hard_clip(shaped * gain, self.ceiling)
    }

    /// Limit a mono buffer in place.
    pub fn process_mono(&mut self, buffer: &mut [T]) {
        if !self.enabled {
            return;
        }
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
        self.compressor.process_mono(buffer);
    }

    /// Limit a stereo pair in place with one shared gain per frame.
    pub fn process_stereo(&mut self, left: &mut [T], right: &mut [T]) {
        if !self.enabled {
            return;
        }
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let shaped_l = soft_clip(*l);
            let shaped_r = soft_clip(*r);
            let gain = self.envelope_gain(shaped_l.abs().max(shaped_r.abs()));
            *l = hard_clip(shaped_l * gain, self.ceiling);
            *r = hard_clip(shaped_r * gain, self.ceiling);
        }
        self.compressor.process_stereo(left, right);
    }

    #[inline]
    fn envelope_gain(&mut self, peak: T) -> T {
        let env = self.envelope.process(peak);
        if env > self.threshold {
            self.threshold / (env + self.epsilon)
        } else {
            T::ONE
        }
    }
}
