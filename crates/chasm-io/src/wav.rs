//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// Bit depths [`write_wav`] can produce. 32 bits is written as IEEE float.
pub const SUPPORTED_BIT_DEPTHS: [u16; 3] = [16, 24, 32];

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = u64::from(reader.len()); // total across all channels
    let num_frames = total_samples / u64::from(spec.channels.max(1));
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Decoded audio: one `Vec<f32>` per channel, all the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    /// Format the clip was read with, or will be written with.
    pub spec: WavSpec,
    /// De-interleaved channel data.
    pub channels: Vec<Vec<f32>>,
}

impl AudioClip {
    /// Mono clip at `sample_rate`, 32-bit float.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            spec: WavSpec {
                channels: 1,
                sample_rate,
                bits_per_sample: 32,
            },
            channels: vec![samples],
        }
    }

    /// Stereo clip at `sample_rate`, 32-bit float.
    pub fn stereo(left: Vec<f32>, right: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if left.len() != right.len() {
            return Err(Error::ChannelLengthMismatch(left.len(), right.len()));
        }
        Ok(Self {
            spec: WavSpec {
                channels: 2,
                sample_rate,
                bits_per_sample: 32,
            },
            channels: vec![left, right],
        })
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / f64::from(self.spec.sample_rate.max(1))
    }

    /// Largest absolute sample across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flatten()
            .fold(0.0_f32, |peak, s| peak.max(s.abs()))
    }

    /// RMS level across all channels.
    pub fn rms(&self) -> f32 {
        let count = self.channels.iter().map(Vec::len).sum::<usize>();
        if count == 0 {
            return 0.0;
        }
        let sum_sq: f64 = self
            .channels
            .iter()
            .flatten()
            .map(|&s| f64::from(s) * f64::from(s))
            .sum();
        (sum_sq / count as f64).sqrt() as f32
    }

    /// Frame-interleaved samples (`L R L R ...` for stereo).
    pub fn to_interleaved(&self) -> Vec<f32> {
        let frames = self.frames();
        let mut out = Vec::with_capacity(frames * self.channel_count());
        for i in 0..frames {
            for channel in &self.channels {
                out.push(channel[i]);
            }
        }
        out
    }
}

/// Full-scale value for an integer bit depth.
fn int_full_scale(bits: u16) -> f32 {
    (1u64 << bits.saturating_sub(1)) as f32
}

/// Read a mono or stereo WAV file into an [`AudioClip`].
///
/// Integer PCM is scaled to `[-1, 1)`; float data is passed through.
///
/// # Example
/// ```ignore
/// let clip = read_wav("input.wav")?;
/// println!("Loaded {} frames at {} Hz", clip.frames(), clip.spec.sample_rate);
/// ```
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<AudioClip> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    if !(1..=2).contains(&spec.channels) {
        return Err(Error::UnsupportedChannels(spec.channels));
    }
    let channel_count = usize::from(spec.channels);

    let interleaved: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let full_scale = int_full_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let frames = interleaved.len() / channel_count;
    let mut channels = vec![Vec::with_capacity(frames); channel_count];
    for frame in interleaved.chunks_exact(channel_count) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    tracing::debug!(
        path = %path.display(),
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        frames,
        "read_wav"
    );

    Ok(AudioClip { spec, channels })
}

/// Write an [`AudioClip`] using its `spec` for sample rate and bit depth.
///
/// The channel count is taken from the clip data. Integer output is
/// clamped to the format's range.
///
/// # Example
/// ```ignore
/// let clip = AudioClip::mono(vec![0.0; 48000], 48000);
/// write_wav("silence.wav", &clip)?;
/// ```
pub fn write_wav<P: AsRef<Path>>(path: P, clip: &AudioClip) -> Result<()> {
    let path = path.as_ref();
    let bits = clip.spec.bits_per_sample;
    if !SUPPORTED_BIT_DEPTHS.contains(&bits) {
        return Err(Error::UnsupportedFormat(format!(
            "{bits}-bit output (supported: 16, 24, 32)"
        )));
    }
    let channel_count = clip.channel_count();
    if !(1..=2).contains(&channel_count) {
        return Err(Error::UnsupportedChannels(channel_count as u16));
    }
    let frames = clip.frames();
    if let Some(other) = clip.channels.iter().map(Vec::len).find(|&len| len != frames) {
        return Err(Error::ChannelLengthMismatch(frames, other));
    }

    let spec = WavSpec {
        channels: channel_count as u16,
        ..clip.spec
    };
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;

    if bits == 32 {
        for sample in clip.to_interleaved() {
            writer.write_sample(sample)?;
        }
    } else {
        let max_val = int_full_scale(bits);
        for sample in clip.to_interleaved() {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_sample)?;
        }
    }

    writer.finalize()?;

    tracing::debug!(
        path = %path.display(),
        channels = channel_count,
        bits,
        frames,
        "write_wav"
    );
    Ok(())
}
