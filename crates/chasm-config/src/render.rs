//! Offline render settings.
//!
//! A render file looks like:
//!
//! ```toml
//! block_size = 512
//! bit_depth = 24
//! precision = "f64"
//!
//! [params]
//! mix = 40.0
//! delay = 45.0
//! character = 2.5
//! width = 150.0
//! limiter = true
//! ```
//!
//! Every field is optional. Parameter keys are the stable keys of
//! [`chasm_effects::PARAMS`].

use crate::ConfigError;
use chasm_effects::{ChasmParams, ParamId};
use chasm_io::SUPPORTED_BIT_DEPTHS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest block the renderer accepts.
pub const MAX_BLOCK_SIZE: usize = 65536;

/// Sample type the engine runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// Single precision.
    #[default]
    F32,
    /// Double precision.
    F64,
}

/// Engine parameters as written in a render file, in user units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamsConfig {
    /// Input gain in dB.
    pub input_gain: f64,
    /// Output gain in dB.
    pub output_gain: f64,
    /// Dry/wet mix in percent.
    pub mix: f64,
    /// Base allpass delay in milliseconds.
    pub delay: f64,
    /// Brightness in dB.
    pub brightness: f64,
    /// Diffusion character.
    pub character: f64,
    /// Low-cut amount in percent.
    pub low_cut: f64,
    /// High-cut amount in percent.
    pub high_cut: f64,
    /// Stereo width in percent.
    pub width: f64,
    /// Output limiter on/off.
    pub limiter: bool,
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self::from(&ChasmParams::default())
    }
}

impl From<&ChasmParams> for ParamsConfig {
    fn from(p: &ChasmParams) -> Self {
        Self {
            input_gain: p.input_gain_db,
            output_gain: p.output_gain_db,
            mix: p.mix_percent,
            delay: p.delay_ms,
            brightness: p.brightness_db,
            character: p.character,
            low_cut: p.low_cut_percent,
            high_cut: p.high_cut_percent,
            width: p.width_percent,
            limiter: p.limiter_enabled,
        }
    }
}

impl ParamsConfig {
    /// Field values as an unclamped [`ChasmParams`].
    fn raw(&self) -> ChasmParams {
        ChasmParams {
            input_gain_db: self.input_gain,
            output_gain_db: self.output_gain,
            mix_percent: self.mix,
            delay_ms: self.delay,
            brightness_db: self.brightness,
            character: self.character,
            low_cut_percent: self.low_cut,
            high_cut_percent: self.high_cut,
            width_percent: self.width,
            limiter_enabled: self.limiter,
        }
    }

    /// Engine parameters, clamped into range.
    pub fn to_chasm_params(&self) -> ChasmParams {
        self.raw().clamped()
    }

    /// Clamp every value into its range, warning once per changed field.
    ///
    /// Returns the number of fields that were out of range.
    pub fn sanitize(&mut self) -> usize {
        let raw = self.raw();
        let mut clamped = 0;
        for id in ParamId::ALL {
            let spec = id.spec();
            let value = raw.get(id);
            let legal = spec.clamp(value);
            // NaN compares unequal to its replacement
            if legal != value {
                tracing::warn!(
                    param = spec.key,
                    value,
                    clamped = legal,
                    "parameter out of range ({} to {}), clamping",
                    spec.min,
                    spec.max
                );
                clamped += 1;
            }
        }
        *self = Self::from(&raw.clamped());
        clamped
    }

    /// Set a parameter by its stable key.
    ///
    /// Returns `false` for an unknown key. The value is stored as given.
    pub fn set_by_key(&mut self, key: &str, value: f64) -> bool {
        let Some(id) = ParamId::from_key(key) else {
            return false;
        };
        match id {
            ParamId::InputGain => self.input_gain = value,
            ParamId::OutputGain => self.output_gain = value,
            ParamId::Mix => self.mix = value,
            ParamId::Delay => self.delay = value,
            ParamId::Brightness => self.brightness = value,
            ParamId::Character => self.character = value,
            ParamId::LowCut => self.low_cut = value,
            ParamId::HighCut => self.high_cut = value,
            ParamId::Width => self.width = value,
            ParamId::Limiter => self.limiter = value >= 0.5,
        }
        true
    }
}

/// Settings for an offline render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Frames handed to the engine per call.
    pub block_size: usize,
    /// Output bit depth (16, 24 or 32).
    pub bit_depth: u16,
    /// Engine sample type.
    pub precision: Precision,
    /// Engine parameters.
    pub params: ParamsConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            block_size: 512,
            bit_depth: 32,
            precision: Precision::F32,
            params: ParamsConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Load render settings from a TOML file.
    ///
    /// Out-of-range parameters are clamped with a warning; unusable render
    /// settings are an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded render config");
        Ok(config)
    }

    /// Parse render settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(toml_str)?;
        config.params.sanitize();
        config.validate()?;
        Ok(config)
    }

    /// Save the settings to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the render settings (not the parameters, which clamp).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_BLOCK_SIZE).contains(&self.block_size) {
            return Err(ConfigError::InvalidSetting {
                field: "block_size",
                reason: format!("{} is outside 1..={MAX_BLOCK_SIZE}", self.block_size),
            });
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&self.bit_depth) {
            return Err(ConfigError::InvalidSetting {
                field: "bit_depth",
                reason: format!("{} is not one of {:?}", self.bit_depth, SUPPORTED_BIT_DEPTHS),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        let config = RenderConfig::from_toml("").unwrap();
        assert_eq!(config, RenderConfig::default());
        assert_eq!(config.params.to_chasm_params(), ChasmParams::default());
    }

    #[test]
    fn partial_params_keep_defaults() {
        let config = RenderConfig::from_toml(
            r#"
precision = "f64"

[params]
mix = 75.0
limiter = false
"#,
        )
        .unwrap();

        assert_eq!(config.precision, Precision::F64);
        let params = config.params.to_chasm_params();
        assert_eq!(params.mix_percent, 75.0);
        assert!(!params.limiter_enabled);
        assert_eq!(params.delay_ms, 30.0);
        assert_eq!(params.width_percent, 100.0);
    }

    #[test]
    fn out_of_range_params_are_clamped() {
        let config = RenderConfig::from_toml(
            r#"
[params]
delay = 500.0
character = 0.0
width = -10.0
input_gain = nan
"#,
        )
        .unwrap();

        assert_eq!(config.params.delay, 100.0);
        assert_eq!(config.params.character, 0.1);
        assert_eq!(config.params.width, 0.0);
        assert_eq!(config.params.input_gain, 0.0);
    }

    #[test]
    fn sanitize_counts_changed_fields() {
        let mut params = ParamsConfig {
            mix: 150.0,
            high_cut: -1.0,
            ..ParamsConfig::default()
        };
        assert_eq!(params.sanitize(), 2);
        assert_eq!(params.sanitize(), 0);
    }

    #[test]
    fn bad_render_settings_are_errors() {
        let err = RenderConfig::from_toml("block_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting { field: "block_size", .. }));

        let err = RenderConfig::from_toml("bit_depth = 8").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting { field: "bit_depth", .. }));

        let err = RenderConfig::from_toml("precision = \"f16\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn set_by_key_uses_table_keys() {
        let mut params = ParamsConfig::default();
        assert!(params.set_by_key("low_cut", 40.0));
        assert!(params.set_by_key("limiter", 0.0));
        assert!(!params.set_by_key("feedback", 0.5));
        assert_eq!(params.low_cut, 40.0);
        assert!(!params.limiter);
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = RenderConfig {
            block_size: 256,
            bit_depth: 24,
            precision: Precision::F64,
            ..RenderConfig::default()
        };
        config.params.brightness = -3.5;

        let text = config.to_toml().unwrap();
        assert!(text.contains("precision = \"f64\""), "got: {text}");
        assert_eq!(RenderConfig::from_toml(&text).unwrap(), config);
    }
}
