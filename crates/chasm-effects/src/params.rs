//! The chasm parameter table.
//!
//! Ten host-facing parameters drive the processor. Each has a [`ParamSpec`]
//! carrying its display name, stable key, unit, range, default, normalization
//! curve and smoothing ramp. [`ChasmParams`] is the plain value set handed to
//! [`ChasmProcessor::update_parameters`](crate::ChasmProcessor::update_parameters).
//!
//! | Key | Range | Default | Ramp |
//! |-----|-------|---------|------|
//! | `input_gain` | -24–24 dB | 0 | 5 ms |
//! | `output_gain` | -24–24 dB | 0 | 5 ms |
//! | `mix` | 0–100 % | 50 | 20 ms |
//! | `delay` | 1–100 ms | 30 | 50 ms |
//! | `brightness` | -12–12 dB | 0 | 10 ms |
//! | `character` | 0.1–10 | 1.0 | 10 ms |
//! | `low_cut` | 0–100 % | 0 | 20 ms |
//! | `high_cut` | 0–100 % | 0 | 20 ms |
//! | `width` | 0–200 % | 100 | 20 ms |
//! | `limiter` | off/on | on | instant |

/// Unit of a parameter, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamUnit {
    /// Decibels.
    Decibels,
    /// Percent.
    Percent,
    /// Milliseconds.
    Milliseconds,
    /// Unitless ratio.
    Ratio,
    /// Boolean switch (0 = off, 1 = on).
    Toggle,
}

impl ParamUnit {
    /// Short suffix for display.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Decibels => "dB",
            Self::Percent => "%",
            Self::Milliseconds => "ms",
            Self::Ratio => "",
            Self::Toggle => "",
        }
    }
}

/// Curve between a plain value and the normalized `[0, 1]` host range.
///
/// - **Linear**: `value = min + (max - min) * n`
/// - **Power(e)**: `value = min + (max - min) * n^e`
/// - **Logarithmic**: `value = min * (max / min)^n`, requires `min > 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamScale {
    /// Equal resolution across the range.
    Linear,
    /// Power curve; exponents above 1 give more resolution at the low end.
    Power(f64),
    /// Geometric sweep.
    Logarithmic,
}

/// Identity of each host-facing parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    /// Gain applied before the wet chain.
    InputGain,
    /// Gain applied after mixing.
    OutputGain,
    /// Dry/wet balance.
    Mix,
    /// Base allpass delay.
    Delay,
    /// High-shelf gain.
    Brightness,
    /// Diffusion feedback control.
    Character,
    /// Low-cut amount.
    LowCut,
    /// High-cut amount.
    HighCut,
    /// Stereo width.
    Width,
    /// Output limiter switch.
    Limiter,
}

impl ParamId {
    /// Every parameter, in table order.
    pub const ALL: [Self; 10] = [
        Self::InputGain,
        Self::OutputGain,
        Self::Mix,
        Self::Delay,
        Self::Brightness,
        Self::Character,
        Self::LowCut,
        Self::HighCut,
        Self::Width,
        Self::Limiter,
    ];

    /// Static description of this parameter.
    pub fn spec(self) -> &'static ParamSpec {
        &PARAMS[self as usize]
    }

    /// Look up a parameter by its stable key (`"delay"`, `"low_cut"`, ...).
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.spec().key == key)
    }
}

/// Static description of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Which parameter this is.
    pub id: ParamId,
    /// Display name.
    pub name: &'static str,
    /// Stable snake_case key.
    pub key: &'static str,
    /// Display unit.
    pub unit: ParamUnit,
    /// Lowest legal value.
    pub min: f64,
    /// Highest legal value.
    pub max: f64,
    /// Value after `reset`.
    pub default: f64,
    /// Normalization curve.
    pub scale: ParamScale,
    /// Smoothing ramp in milliseconds (zero for switches).
    pub ramp_ms: f64,
}

impl ParamSpec {
    /// Clamp `value` into `[min, max]`. NaN maps to the default.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Map a plain value to `[0, 1]`.
    pub fn to_normalized(&self, value: f64) -> f64 {
        let value = self.clamp(value);
        let n = match self.scale {
            ParamScale::Linear => (value - self.min) / (self.max - self.min),
            ParamScale::Power(exponent) => {
                libm::pow((value - self.min) / (self.max - self.min), 1.0 / exponent)
            }
            ParamScale::Logarithmic => {
                libm::log(value / self.min) / libm::log(self.max / self.min)
            }
        };
        n.clamp(0.0, 1.0)
    }

    /// Map a normalized `[0, 1]` value to the plain range.
    pub fn from_normalized(&self, normalized: f64) -> f64 {
        let n = if normalized.is_nan() {
            self.to_normalized(self.default)
        } else {
            normalized.clamp(0.0, 1.0)
        };
        let value = match self.scale {
            ParamScale::Linear => self.min + (self.max - self.min) * n,
            ParamScale::Power(exponent) => {
                self.min + (self.max - self.min) * libm::pow(n, exponent)
            }
            ParamScale::Logarithmic => self.min * libm::pow(self.max / self.min, n),
        };
        self.clamp(value)
    }
}

const fn spec(
    id: ParamId,
    name: &'static str,
    key: &'static str,
    unit: ParamUnit,
    (min, max, default): (f64, f64, f64),
    scale: ParamScale,
    ramp_ms: f64,
) -> ParamSpec {
    ParamSpec {
        id,
        name,
        key,
        unit,
        min,
        max,
        default,
        scale,
        ramp_ms,
    }
}

/// The parameter table, indexed by `ParamId as usize`.
#[rustfmt::skip]
pub static PARAMS: [ParamSpec; 10] = [
    spec(ParamId::InputGain, "Input Gain", "input_gain", ParamUnit::Decibels, (-24.0, 24.0, 0.0), ParamScale::Linear, 5.0),
    spec(ParamId::OutputGain, "Output Gain", "output_gain", ParamUnit::Decibels, (-24.0, 24.0, 0.0), ParamScale::Linear, 5.0),
    spec(ParamId::Mix, "Mix", "mix", ParamUnit::Percent, (0.0, 100.0, 50.0), ParamScale::Linear, 20.0),
    spec(ParamId::Delay, "Delay", "delay", ParamUnit::Milliseconds, (1.0, 100.0, 30.0), ParamScale::Power(2.0), 50.0),
    spec(ParamId::Brightness, "Brightness", "brightness", ParamUnit::Decibels, (-12.0, 12.0, 0.0), ParamScale::Linear, 10.0),
    spec(ParamId::Character, "Character", "character", ParamUnit::Ratio, (0.1, 10.0, 1.0), ParamScale::Logarithmic, 10.0),
    spec(ParamId::LowCut, "Low Cut", "low_cut", ParamUnit::Percent, (0.0, 100.0, 0.0), ParamScale::Linear, 20.0),
    spec(ParamId::HighCut, "High Cut", "high_cut", ParamUnit::Percent, (0.0, 100.0, 0.0), ParamScale::Linear, 20.0),
    spec(ParamId::Width, "Width", "width", ParamUnit::Percent, (0.0, 200.0, 100.0), ParamScale::Linear, 20.0),
    spec(ParamId::Limiter, "Limiter", "limiter", ParamUnit::Toggle, (0.0, 1.0, 1.0), ParamScale::Linear, 0.0),
];

/// One complete set of parameter values, in user units.
///
/// Values outside their range are legal here; the processor clamps them
/// (see [`clamped`](Self::clamped)).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChasmParams {
    /// Input gain in dB.
    pub input_gain_db: f64,
    /// Output gain in dB.
    pub output_gain_db: f64,
    /// Dry/wet mix in percent.
    pub mix_percent: f64,
    /// Base allpass delay in milliseconds.
    pub delay_ms: f64,
    /// Brightness shelf gain in dB.
    pub brightness_db: f64,
    /// Diffusion character.
    pub character: f64,
    /// Low-cut amount in percent.
    pub low_cut_percent: f64,
    /// High-cut amount in percent.
    pub high_cut_percent: f64,
    /// Stereo width in percent.
    pub width_percent: f64,
    /// Output limiter on/off.
    pub limiter_enabled: bool,
}

impl Default for ChasmParams {
    fn default() -> Self {
        let mut params = Self {
            input_gain_db: 0.0,
            output_gain_db: 0.0,
            mix_percent: 0.0,
            delay_ms: 0.0,
            brightness_db: 0.0,
            character: 0.0,
            low_cut_percent: 0.0,
            high_cut_percent: 0.0,
            width_percent: 0.0,
            limiter_enabled: false,
        };
        for spec in &PARAMS {
            params.set(spec.id, spec.default);
        }
        params
    }
}

impl ChasmParams {
    /// Read a parameter in user units (the limiter reads as 0 or 1).
    pub fn get(&self, id: ParamId) -> f64 {
        match id {
            ParamId::InputGain => self.input_gain_db,
            ParamId::OutputGain => self.output_gain_db,
            ParamId::Mix => self.mix_percent,
            ParamId::Delay => self.delay_ms,
            ParamId::Brightness => self.brightness_db,
            ParamId::Character => self.character,
            ParamId::LowCut => self.low_cut_percent,
            ParamId::HighCut => self.high_cut_percent,
            ParamId::Width => self.width_percent,
            ParamId::Limiter => {
                if self.limiter_enabled {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Write a parameter in user units, clamping to its range.
    ///
    /// For the limiter switch, values of 0.5 and above mean on.
    pub fn set(&mut self, id: ParamId, value: f64) {
        let value = id.spec().clamp(value);
        match id {
            ParamId::InputGain => self.input_gain_db = value,
            ParamId::OutputGain => self.output_gain_db = value,
            ParamId::Mix => self.mix_percent = value,
            ParamId::Delay => self.delay_ms = value,
            ParamId::Brightness => self.brightness_db = value,
            ParamId::Character => self.character = value,
            ParamId::LowCut => self.low_cut_percent = value,
            ParamId::HighCut => self.high_cut_percent = value,
            ParamId::Width => self.width_percent = value,
            ParamId::Limiter => self.limiter_enabled = value >= 0.5,
        }
    }

    /// Copy with every value clamped to its declared range.
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for id in ParamId::ALL {
            out.set(id, self.get(id));
        }
        out
    }

    /// Builder-style setter.
    pub fn with(mut self, id: ParamId, value: f64) -> Self {
        self.set(id, value);
        self
    }
}
