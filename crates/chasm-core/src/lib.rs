//! Chasm Core - DSP primitives for the chasm diffusion engine
//!
//! This crate provides the building blocks the effect chain is assembled from,
//! designed for real-time audio processing with zero allocation in the audio
//! path.
//!
//! # Core Abstractions
//!
//! ## Precision
//!
//! - [`Sample`] - `f32` / `f64` abstraction; every processor is generic over it
//!
//! ## Processing
//!
//! - [`SampleProcessor`] - Per-sample mono stage
//! - [`ProcessorExt`] - Extension trait for chaining stages
//! - [`Chain`] - Zero-cost series combinator
//!
//! ## Parameter Smoothing
//!
//! - [`ParameterSmoother`] - Linear ramps that land exactly on the target
//!
//! ## Filters
//!
//! - [`AllpassFilter`] - Fractional-delay Schroeder allpass for diffusion
//! - [`SimpleFilter`] - One-pole high-pass / low-pass
//! - [`Biquad`] - Second-order IIR with RBJ cookbook coefficients
//!
//! ## Delay Lines & Dynamics
//!
//! - [`DelayLine`] - Circular buffer with linear-interpolated reads
//! - [`EnvelopeFollower`] - Attack/release peak detector
//!
//! ## Utilities
//!
//! - Level conversions: [`db_to_gain`], [`gain_to_db`]
//! - Clipping: [`soft_clip`], [`hard_clip`]
//! - [`flush_denormal`] for recursive state
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! chasm-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use chasm_core::{AllpassFilter, ProcessorExt, SampleProcessor, FilterType, SimpleFilter};
//!
//! let mut diffuser = AllpassFilter::<f32>::new(48000.0, 100.0);
//! diffuser.set_delay_time(12.0);
//! diffuser.set_feedback(0.5);
//!
//! let mut chain = diffuser.chain(SimpleFilter::new(FilterType::LowPass, 48000.0));
//!
//! let mut buffer = [0.0_f32; 64];
//! buffer[0] = 1.0;
//! chain.process_block(&mut buffer);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Coefficients in f64**: Designed once, converted to the sample type

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod allpass;
pub mod biquad;
pub mod delay;
pub mod envelope;
pub mod math;
pub mod processor;
pub mod sample;
pub mod simple_filter;
pub mod smoother;

// Re-export main types at crate root
pub use allpass::AllpassFilter;
pub use biquad::{
    BUTTERWORTH_Q, Biquad, Coefficients, high_shelf_coefficients, highpass_coefficients,
    lowpass_coefficients, magnitude_at,
};
pub use delay::DelayLine;
pub use envelope::EnvelopeFollower;
pub use math::{
    clamp_or, db_to_gain, dry_wet_mix, flush_denormal, gain_to_db, hard_clip, lerp,
    ms_to_samples, percent_to_normalized, soft_clip,
};
pub use processor::{Chain, ProcessorExt, SampleProcessor};
pub use sample::Sample;
pub use simple_filter::{FilterType, SimpleFilter};
pub use smoother::{ParameterSmoother, ramp_length_samples};
