//! Circular delay line with fractional, linearly interpolated reads.
//!
//! The buffer is allocated once when the line is created (or re-created at
//! prepare time) and never reallocates while audio runs.
//!
//! # Delay convention
//!
//! `read(d)` returns the sample written `d` writes ago: `read(1.0)` is the
//! most recent sample, `read(2.5)` is halfway between the samples written two
//! and three writes ago. Valid delays are `1.0 ..= capacity - 1`.

use alloc::vec;
use alloc::vec::Vec;

use crate::{Sample, lerp};

/// Heap-allocated circular delay line.
///
/// # Example
///
/// ```rust
/// use chasm_core::DelayLine;
///
/// let mut delay = DelayLine::<f32>::new(16);
/// delay.write(1.0);
/// delay.write(0.0);
/// assert_eq!(delay.read(2.0), 1.0);
/// assert_eq!(delay.read(1.5), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine<T: Sample> {
    buffer: Vec<T>,
    write_pos: usize,
}

impl<T: Sample> DelayLine<T> {
    /// Create a delay line holding `capacity` samples (minimum 2).
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![T::ZERO; capacity.max(2)],
            write_pos: 0,
        }
    }

    /// Create a delay line long enough for `max_delay_ms` at `sample_rate`.
    ///
    /// Holds `floor(max_delay_ms * sample_rate / 1000) + 1` samples so the
    /// longest delay is reachable.
    pub fn from_time(sample_rate: f64, max_delay_ms: f64) -> Self {
        let samples = crate::ms_to_samples(max_delay_ms.max(0.0), sample_rate);
        Self::new(samples as usize + 1)
    }

    /// Read with linear interpolation, `delay_samples` writes back.
    ///
    /// `delay_samples` is clamped to `[1, capacity - 1]`.
    #[inline]
    pub fn read(&self, delay_samples: f64) -> T {
        let len = self.buffer.len();
        let delay = delay_samples.clamp(1.0, (len - 1) as f64);

        let mut read_pos = self.write_pos as f64 - delay;
        if read_pos < 0.0 {
            read_pos += len as f64;
        }

        let floor = libm::floor(read_pos);
        let frac = T::from_f64(read_pos - floor);
        let i1 = (floor as usize) % len;
        let i2 = (i1 + 1) % len;

        let a = self.buffer[i1];
        let b = self.buffer[i2];
        lerp(a, b, frac)
    }

    /// Append one sample, overwriting the oldest.
    #[inline]
    pub fn write(&mut self, sample: T) {
        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos == self.buffer.len() {
            self.write_pos = 0;
        }
    }

    /// Zero the contents and rewind the write head.
    pub fn clear(&mut self) {
        self.buffer.fill(T::ZERO);
        self.write_pos = 0;
    }

    /// Buffer length in samples.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Longest readable delay in samples.
    #[inline]
    pub fn max_delay(&self) -> f64 {
        (self.buffer.len() - 1) as f64
    }
}
