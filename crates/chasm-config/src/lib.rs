//! Render settings for the chasm diffusion engine.
//!
//! This crate loads and saves the TOML files the `chasm` command line uses
//! for offline renders: block size, output bit depth, engine precision, and
//! a `[params]` table with one entry per engine parameter.
//!
//! Parameter values follow the engine's policy of clamping instead of
//! failing: an out-of-range value is pulled into range and logged with
//! `tracing::warn!`. Render settings the renderer cannot honor (a zero block
//! size, an unsupported bit depth) are reported as [`ConfigError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use chasm_config::RenderConfig;
//!
//! let config = RenderConfig::load("render.toml").unwrap();
//! let params = config.params.to_chasm_params();
//! println!("mix {}%, block {}", params.mix_percent, config.block_size);
//! ```

mod error;
mod render;

pub use error::ConfigError;
pub use render::{MAX_BLOCK_SIZE, ParamsConfig, Precision, RenderConfig};
