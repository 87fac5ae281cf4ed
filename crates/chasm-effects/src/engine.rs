//! The block processor that sequences the whole chasm signal path.
//!
//! # Signal Flow
//!
//! ```text
//!            ┌──────────── dry copy ────────────┐
//!            │                                  ▼
//! in ─► gain ─► allpass ×4 ─► shelf ─► cuts ─► [stereo: M/S width] ─► mix ─► out gain ─► limiter
//!             └────────── per channel strip ───┘
//! ```
//!
//! Every sample advances all nine engine smoothers. Every [`UPDATE_INTERVAL`]
//! samples the smoothed delay, character, brightness, cut and width values
//! are pushed into the components, which smooth or redesign on their own.
//! Mix and output gain are read once per chunk after the wet pass.
//!
//! Blocks longer than the prepared maximum are processed in chunks of at
//! most that size, so the dry scratch buffers never grow on the audio path.

use alloc::vec;
use alloc::vec::Vec;

use chasm_core::{
    Chain, ParameterSmoother, ProcessorExt, Sample, SampleProcessor, db_to_gain, dry_wet_mix,
};

use crate::{ChasmParams, Limiter, ParamId, SchroederAllpassChain, StereoEnhancer, ToneShaper};

/// Samples between pushes of smoothed values into the components.
pub const UPDATE_INTERVAL: usize = 32;

/// Sample rate used when a spec carries an unusable one.
pub const FALLBACK_SAMPLE_RATE: f64 = 48000.0;

/// Channel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// One channel, no stereo enhancer.
    Mono,
    /// Two channels with independent strips and the stereo enhancer.
    Stereo,
}

impl ChannelLayout {
    /// Layout for a channel count, if supported.
    pub fn from_channel_count(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(Self::Mono),
            2 => Some(Self::Stereo),
            _ => None,
        }
    }

    /// Number of channels.
    pub const fn channels(self) -> usize {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }
}

/// Host playback configuration handed to [`ChasmProcessor::prepare`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Largest block the host will deliver in one call.
    pub max_block_size: usize,
    /// Channel layout.
    pub layout: ChannelLayout,
}

impl ProcessSpec {
    /// Build a spec.
    pub fn new(sample_rate: f64, max_block_size: usize, layout: ChannelLayout) -> Self {
        Self {
            sample_rate,
            max_block_size,
            layout,
        }
    }
}

/// One channel's wet path: diffusion then tone.
pub type ChannelStrip<T> = Chain<SchroederAllpassChain<T>, ToneShaper<T>>;

fn new_strip<T: Sample>(sample_rate: f64) -> ChannelStrip<T> {
    SchroederAllpassChain::new(sample_rate).chain(ToneShaper::new(sample_rate))
}

/// The nine engine-level smoothers. Gains are held linear, mix as 0–1,
/// everything else in user units.
#[derive(Debug, Clone)]
struct Smoothers<T: Sample> {
    input_gain: ParameterSmoother<T>,
    output_gain: ParameterSmoother<T>,
    mix: ParameterSmoother<T>,
    delay: ParameterSmoother<T>,
    brightness: ParameterSmoother<T>,
    character: ParameterSmoother<T>,
    low_cut: ParameterSmoother<T>,
    high_cut: ParameterSmoother<T>,
    width: ParameterSmoother<T>,
}

/// Engine representation of a user-unit parameter value.
fn internal_value<T: Sample>(id: ParamId, value: f64) -> T {
    match id {
        ParamId::InputGain | ParamId::OutputGain => db_to_gain(T::from_f64(value)),
        ParamId::Mix => T::from_f64(value / 100.0),
        _ => T::from_f64(value),
    }
}

impl<T: Sample> Smoothers<T> {
    fn new() -> Self {
        let at_default =
            |id: ParamId| ParameterSmoother::new(internal_value(id, id.spec().default));
        Self {
            input_gain: at_default(ParamId::InputGain),
            output_gain: at_default(ParamId::OutputGain),
            mix: at_default(ParamId::Mix),
            delay: at_default(ParamId::Delay),
            brightness: at_default(ParamId::Brightness),
            character: at_default(ParamId::Character),
            low_cut: at_default(ParamId::LowCut),
            high_cut: at_default(ParamId::HighCut),
            width: at_default(ParamId::Width),
        }
    }

    fn each_mut(&mut self) -> [(ParamId, &mut ParameterSmoother<T>); 9] {
        [
            (ParamId::InputGain, &mut self.input_gain),
            (ParamId::OutputGain, &mut self.output_gain),
            (ParamId::Mix, &mut self.mix),
            (ParamId::Delay, &mut self.delay),
            (ParamId::Brightness, &mut self.brightness),
            (ParamId::Character, &mut self.character),
            (ParamId::LowCut, &mut self.low_cut),
            (ParamId::HighCut, &mut self.high_cut),
            (ParamId::Width, &mut self.width),
        ]
    }

    fn prepare(&mut self, sample_rate: f64) {
        for (id, smoother) in self.each_mut() {
            smoother.prepare(sample_rate, id.spec().ramp_ms);
        }
    }

    fn reset(&mut self) {
        for (id, smoother) in self.each_mut() {
            smoother.reset(internal_value(id, id.spec().default));
        }
    }

    fn set_targets(&mut self, params: &ChasmParams) {
        for (id, smoother) in self.each_mut() {
            smoother.set_target_value(internal_value(id, params.get(id)));
        }
    }

    fn snap(&mut self) {
        for (_, smoother) in self.each_mut() {
            smoother.snap_to_target_value();
        }
    }
}

/// Component settings pushed every [`UPDATE_INTERVAL`] samples.
#[derive(Debug, Clone, Copy)]
struct ComponentValues {
    delay_ms: f64,
    character: f64,
    brightness_db: f64,
    low_cut: f64,
    high_cut: f64,
    width: f64,
}

/// The complete chasm processor for one mono or stereo stream.
///
/// # Example
///
/// ```rust
/// use chasm_effects::{ChannelLayout, ChasmParams, ChasmProcessor, ParamId, ProcessSpec};
///
/// let spec = ProcessSpec::new(48000.0, 512, ChannelLayout::Stereo);
/// let mut chasm = ChasmProcessor::<f32>::new(spec);
/// chasm.update_parameters(&ChasmParams::default().with(ParamId::Mix, 80.0));
///
/// let mut left = vec![0.0_f32; 512];
/// let mut right = vec![0.0_f32; 512];
/// left[0] = 1.0;
/// chasm.process_stereo(&mut left, &mut right);
/// ```
#[derive(Debug, Clone)]
pub struct ChasmProcessor<T: Sample> {
    spec: ProcessSpec,
    strips: [ChannelStrip<T>; 2],
    enhancer: StereoEnhancer<T>,
    limiter: Limiter<T>,
    smoothers: Smoothers<T>,
    dry: [Vec<T>; 2],
    params: ChasmParams,
    /// Next `update_parameters` jumps instead of ramping
    pending_snap: bool,
}

impl<T: Sample> ChasmProcessor<T> {
    /// Create a processor prepared for `spec`.
    pub fn new(spec: ProcessSpec) -> Self {
        let sample_rate = usable_sample_rate(spec.sample_rate);
        let mut processor = Self {
            spec,
            strips: [new_strip(sample_rate), new_strip(sample_rate)],
            enhancer: StereoEnhancer::new(sample_rate),
            limiter: Limiter::new(sample_rate),
            smoothers: Smoothers::new(),
            dry: [Vec::new(), Vec::new()],
            params: ChasmParams::default(),
            pending_snap: true,
        };
        processor.prepare(spec);
        processor
    }

    /// Allocate scratch space and re-time every component for `spec`.
    ///
    /// Resets all state; the next [`update_parameters`](Self::update_parameters)
    /// applies without ramping.
    pub fn prepare(&mut self, spec: ProcessSpec) {
        let sample_rate = usable_sample_rate(spec.sample_rate);
        let max_block_size = spec.max_block_size.max(1);
        self.spec = ProcessSpec {
            sample_rate,
            max_block_size,
            layout: spec.layout,
        };

        for strip in &mut self.strips {
            strip.first_mut().prepare(sample_rate);
            strip.second_mut().prepare(sample_rate);
        }
        self.enhancer.prepare(sample_rate);
        self.limiter.prepare(sample_rate);
        self.smoothers.prepare(sample_rate);
        self.dry = [vec![T::ZERO; max_block_size], vec![T::ZERO; max_block_size]];
        self.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            max_block_size,
            layout = ?spec.layout,
            "chasm_prepare"
        );
    }

    /// Return every component and smoother to its default.
    ///
    /// The limiter switch is left as last set.
    pub fn reset(&mut self) {
        for strip in &mut self.strips {
            strip.reset();
            let tone = strip.second_mut();
            tone.set_brightness_db(0.0);
            tone.set_low_cut(0.0);
            tone.set_high_cut(0.0);
        }
        self.enhancer.reset();
        self.limiter.reset();
        self.smoothers.reset();
        for buffer in &mut self.dry {
            buffer.fill(T::ZERO);
        }
        let limiter_enabled = self.params.limiter_enabled;
        self.params = ChasmParams {
            limiter_enabled,
            ..ChasmParams::default()
        };
        self.pending_snap = true;

        #[cfg(feature = "tracing")]
        tracing::debug!("chasm_reset");
    }

    /// Set new parameter targets. Out-of-range values are clamped.
    ///
    /// The first call after [`prepare`](Self::prepare) or
    /// [`reset`](Self::reset) jumps straight to the new values.
    pub fn update_parameters(&mut self, params: &ChasmParams) {
        let params = params.clamped();
        self.params = params;
        self.smoothers.set_targets(&params);
        self.limiter.set_enabled(params.limiter_enabled);

        if self.pending_snap {
            self.smoothers.snap();
            let values = self.component_values();
            self.push_component_values(values);
            for strip in &mut self.strips {
                strip.first_mut().snap_to_targets();
            }
            self.enhancer.snap_to_targets();
            self.pending_snap = false;
        }
    }

    /// Process a host block in place.
    ///
    /// Uses the first one or two channels according to the prepared layout.
    /// Any extra channels are left untouched; channels of unequal length are
    /// processed up to the shortest.
    pub fn process_block(&mut self, channels: &mut [&mut [T]]) {
        match (self.spec.layout, channels) {
            (_, []) => {}
            (ChannelLayout::Stereo, [left, right, ..]) => self.process_stereo(left, right),
            (_, [mono, ..]) => self.process_mono(mono),
        }
    }

    /// Process one mono channel in place.
    pub fn process_mono(&mut self, buffer: &mut [T]) {
        let chunk = self.spec.max_block_size;
        for block in buffer.chunks_mut(chunk) {
            self.process_chunk(block, None);
        }
    }

    /// Process a stereo pair in place.
    pub fn process_stereo(&mut self, left: &mut [T], right: &mut [T]) {
        let chunk = self.spec.max_block_size;
        for (l, r) in left.chunks_mut(chunk).zip(right.chunks_mut(chunk)) {
            let len = l.len().min(r.len());
            self.process_chunk(&mut l[..len], Some(&mut r[..len]));
        }
    }

    /// Limiter gain reduction in dB for metering (zero or negative).
    pub fn gain_reduction_db(&self) -> f64 {
        self.limiter.gain_reduction_db()
    }

    /// Added latency in samples (the design is zero-latency).
    pub fn latency_samples(&self) -> usize {
        self.strips[0].latency_samples()
    }

    /// Prepared configuration.
    pub fn spec(&self) -> ProcessSpec {
        self.spec
    }

    /// Last clamped parameter set.
    pub fn parameters(&self) -> &ChasmParams {
        &self.params
    }

    /// The output limiter.
    pub fn limiter(&self) -> &Limiter<T> {
        &self.limiter
    }

    /// Mutable access to the output limiter (ceiling).
    pub fn limiter_mut(&mut self) -> &mut Limiter<T> {
        &mut self.limiter
    }

    /// The stereo enhancer.
    pub fn enhancer(&self) -> &StereoEnhancer<T> {
        &self.enhancer
    }

    /// One channel's wet strip (`0` or `1`).
    pub fn strip(&self, channel: usize) -> Option<&ChannelStrip<T>> {
        self.strips.get(channel)
    }

    fn component_values(&self) -> ComponentValues {
        let s = &self.smoothers;
        ComponentValues {
            delay_ms: s.delay.current_value().to_f64(),
            character: s.character.current_value().to_f64(),
            brightness_db: s.brightness.current_value().to_f64(),
            low_cut: s.low_cut.current_value().to_f64(),
            high_cut: s.high_cut.current_value().to_f64(),
            width: s.width.current_value().to_f64(),
        }
    }

    fn push_component_values(&mut self, values: ComponentValues) {
        for strip in &mut self.strips {
            let diffusion = strip.first_mut();
            diffusion.set_delay_time(values.delay_ms);
            diffusion.set_character(values.character);
            let tone = strip.second_mut();
            tone.set_brightness_db(values.brightness_db);
            tone.set_low_cut(values.low_cut);
            tone.set_high_cut(values.high_cut);
        }
        self.enhancer.set_width(values.width);
    }

    fn process_chunk(&mut self, left: &mut [T], mut right: Option<&mut [T]>) {
        let len = left.len();
        self.dry[0][..len].copy_from_slice(left);
        if let Some(right) = right.as_deref() {
            self.dry[1][..len].copy_from_slice(right);
        }

        for i in 0..len {
            let input_gain = self.advance_smoothers();
            if i % UPDATE_INTERVAL == 0 {
                let values = self.component_values();
                self.push_component_values(values);
            }

            left[i] = self.strips[0].process_sample(left[i] * input_gain);
            if let Some(right) = right.as_deref_mut() {
                right[i] = self.strips[1].process_sample(right[i] * input_gain);
            }
        }

        if let Some(right) = right.as_deref_mut() {
            self.enhancer.process_block(left, right);
        }

        let mix = self.smoothers.mix.current_value();
        let output_gain = self.smoothers.output_gain.current_value();
        for (wet, &dry) in left.iter_mut().zip(&self.dry[0]) {
            *wet = dry_wet_mix(dry, *wet, mix) * output_gain;
        }

        match right {
            Some(right) => {
                for (wet, &dry) in right.iter_mut().zip(&self.dry[1]) {
                    *wet = dry_wet_mix(dry, *wet, mix) * output_gain;
                }
                self.limiter.process_stereo(left, right);
            }
            None => self.limiter.process_mono(left),
        }
    }

    /// Advance every smoother one sample; returns the input gain.
    #[inline]
    fn advance_smoothers(&mut self) -> T {
        let s = &mut self.smoothers;
        s.output_gain.next_value();
        s.mix.next_value();
        s.delay.next_value();
        s.brightness.next_value();
        s.character.next_value();
        s.low_cut.next_value();
        s.high_cut.next_value();
        s.width.next_value();
        s.input_gain.next_value()
    }
}

fn usable_sample_rate(sample_rate: f64) -> f64 {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        sample_rate
    } else {
        #[cfg(feature = "tracing")]
        tracing::warn!("unusable sample rate {sample_rate}, using {FALLBACK_SAMPLE_RATE}");
        FALLBACK_SAMPLE_RATE
    }
}
