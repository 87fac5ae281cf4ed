//! Chasm Effects - the diffusion engine's composite stages
//!
//! This crate assembles the `chasm-core` primitives into the chasm signal
//! path:
//!
//! - [`SchroederAllpassChain`] - Four-stage allpass diffuser with smoothed delay and character
//! - [`ToneShaper`] - [`BrightnessEq`] shelf followed by the [`DualCutFilter`]
//! - [`StereoEnhancer`] - Mid/side width with side-channel shaping
//! - [`Limiter`] - Soft clip, envelope limiter, ceiling and [`BlockCompressor`]
//! - [`ChasmProcessor`] - The block processor that runs all of the above with
//!   dry/wet mixing and parameter smoothing
//!
//! Parameters are described by the static [`PARAMS`] table and passed to the
//! processor as a [`ChasmParams`] value.
//!
//! ## Example
//!
//! ```rust
//! use chasm_effects::{ChannelLayout, ChasmParams, ChasmProcessor, ParamId, ProcessSpec};
//!
//! let mut chasm = ChasmProcessor::<f32>::new(ProcessSpec::new(48000.0, 256, ChannelLayout::Mono));
//! chasm.update_parameters(
//!     &ChasmParams::default()
//!         .with(ParamId::Delay, 45.0)
//!         .with(ParamId::Character, 3.0)
//!         .with(ParamId::Mix, 70.0),
//! );
//!
//! let mut buffer = vec![0.0_f32; 256];
//! buffer[0] = 1.0;
//! chasm.process_mono(&mut buffer);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod compressor;
pub mod diffusion;
pub mod engine;
pub mod limiter;
pub mod params;
pub mod stereo;
pub mod tone;

// Re-export main types at crate root
pub use compressor::BlockCompressor;
pub use diffusion::{SchroederAllpassChain, character_to_feedback};
pub use engine::{ChannelLayout, ChannelStrip, ChasmProcessor, ProcessSpec, UPDATE_INTERVAL};
pub use limiter::Limiter;
pub use params::{ChasmParams, PARAMS, ParamId, ParamScale, ParamSpec, ParamUnit};
pub use stereo::StereoEnhancer;
pub use tone::{BrightnessEq, DualCutFilter, ToneShaper};
