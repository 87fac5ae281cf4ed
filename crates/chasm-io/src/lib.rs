//! Audio file I/O for the chasm diffusion engine.
//!
//! This crate provides:
//!
//! - **WAV reading**: [`read_wav`] loads a mono or stereo file into an [`AudioClip`]
//! - **WAV writing**: [`write_wav`] saves a clip as 16/24-bit PCM or 32-bit float
//! - **Metadata**: [`read_wav_info`] reads the header without decoding samples
//!
//! The engine only processes mono and stereo, so files with any other
//! channel count are rejected with [`Error::UnsupportedChannels`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chasm_io::{read_wav, write_wav};
//!
//! let clip = read_wav("input.wav")?;
//! println!("{} frames at {} Hz", clip.frames(), clip.spec.sample_rate);
//! write_wav("copy.wav", &clip)?;
//! ```

mod wav;

pub use wav::{
    AudioClip, SUPPORTED_BIT_DEPTHS, WavFormat, WavInfo, WavSpec, read_wav, read_wav_info,
    write_wav,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The file has a channel count the engine cannot process.
    #[error("Unsupported channel count: {0} (expected 1 or 2)")]
    UnsupportedChannels(u16),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Channel buffers of a clip have different lengths.
    #[error("Channel length mismatch: {0} vs {1} frames")]
    ChannelLengthMismatch(usize, usize),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
