//! End-to-end tests for the chasm block processor.
//!
//! Drives [`ChasmProcessor`] through the host-facing API and checks the
//! output against hand-assembled reference chains.

use chasm_core::{SampleProcessor, db_to_gain};
use chasm_effects::{
    ChannelLayout, ChasmParams, ChasmProcessor, DualCutFilter, ParamId, ProcessSpec,
    SchroederAllpassChain, ToneShaper, UPDATE_INTERVAL,
};

const SAMPLE_RATE: f64 = 48000.0;
const TAU: f64 = core::f64::consts::TAU;

fn generate_sine(freq_hz: f64, num_samples: usize, amplitude: f64) -> Vec<f64> {
    (0..num_samples)
        .map(|n| amplitude * libm::sin(TAU * freq_hz * n as f64 / SAMPLE_RATE))
        .collect()
}

fn rms(signal: &[f64]) -> f64 {
    let sum_sq: f64 = signal.iter().map(|&s| s * s).sum();
    libm::sqrt(sum_sq / signal.len() as f64)
}

/// Mix 100 %, neutral tone, width 100 %, limiter off, character 1, 30 ms.
fn wet_only_params() -> ChasmParams {
    ChasmParams::default()
        .with(ParamId::Mix, 100.0)
        .with(ParamId::Delay, 30.0)
        .with(ParamId::Character, 1.0)
        .with(ParamId::Limiter, 0.0)
}

fn reference_wet(input: &[f64]) -> Vec<f64> {
    let mut diffusion = SchroederAllpassChain::<f64>::new(SAMPLE_RATE);
    diffusion.set_delay_time(30.0);
    diffusion.set_character(1.0);
    diffusion.snap_to_targets();
    let mut tone = ToneShaper::<f64>::new(SAMPLE_RATE);
    input
        .iter()
        .map(|&x| tone.process_sample(diffusion.process_sample(x)))
        .collect()
}

// ============================================================================
// 1. Dry/wet endpoints
// ============================================================================

#[test]
fn zero_mix_is_dry_times_output_gain() {
    let mut chasm =
        ChasmProcessor::<f64>::new(ProcessSpec::new(SAMPLE_RATE, 512, ChannelLayout::Stereo));
    chasm.update_parameters(
        &ChasmParams::default()
            .with(ParamId::Mix, 0.0)
            .with(ParamId::OutputGain, -6.0)
            .with(ParamId::InputGain, 12.0)
            .with(ParamId::Width, 180.0)
            .with(ParamId::Limiter, 0.0),
    );

    let input_l = generate_sine(1000.0, 2048, 0.5);
    let input_r = generate_sine(330.0, 2048, 0.4);
    let mut left = input_l.clone();
    let mut right = input_r.clone();
    chasm.process_stereo(&mut left, &mut right);

    let gain = db_to_gain(-6.0);
    for i in 0..2048 {
        assert_eq!(left[i], input_l[i] * gain, "left sample {i}");
        assert_eq!(right[i], input_r[i] * gain, "right sample {i}");
    }
}

#[test]
fn full_mix_mono_matches_reference_chain() {
    let mut chasm =
        ChasmProcessor::<f64>::new(ProcessSpec::new(SAMPLE_RATE, 256, ChannelLayout::Mono));
    chasm.update_parameters(&wet_only_params());

    let input = generate_sine(1000.0, 4096, 0.5);
    let mut output = input.clone();
    chasm.process_mono(&mut output);

    assert_eq!(output, reference_wet(&input));
}

#[test]
fn full_mix_stereo_matches_reference_per_channel() {
    let mut chasm =
        ChasmProcessor::<f64>::new(ProcessSpec::new(SAMPLE_RATE, 256, ChannelLayout::Stereo));
    chasm.update_parameters(&wet_only_params());

    let input_l = generate_sine(1000.0, 4096, 0.5);
    let input_r = generate_sine(250.0, 4096, 0.3);
    let mut left = input_l.clone();
    let mut right = input_r.clone();
    {
        let mut channels: [&mut [f64]; 2] = [&mut left, &mut right];
        chasm.process_block(&mut channels);
    }

    // Width 100 % only rounds through the mid/side split
    for (out, expected) in left.iter().zip(reference_wet(&input_l)) {
        assert!((out - expected).abs() < 1e-12);
    }
    for (out, expected) in right.iter().zip(reference_wet(&input_r)) {
        assert!((out - expected).abs() < 1e-12);
    }
}

#[test]
fn wet_path_preserves_level() {
    // Allpass diffusion with neutral tone keeps RMS close to the input
    let input = generate_sine(440.0, 48000, 0.5);
    let wet = reference_wet(&input);
    let ratio = rms(&wet[9600..]) / rms(&input[9600..]);
    assert!((ratio - 1.0).abs() < 0.05, "wet/dry RMS ratio {ratio:.4}");
}

// ============================================================================
// 2. Stereo width through the engine
// ============================================================================

#[test]
fn zero_width_collapses_wet_signal() {
    let mut chasm =
        ChasmProcessor::<f32>::new(ProcessSpec::new(SAMPLE_RATE, 512, ChannelLayout::Stereo));
    chasm.update_parameters(
        &ChasmParams::default()
            .with(ParamId::Mix, 100.0)
            .with(ParamId::Width, 0.0),
    );

    let mut left: Vec<f32> = generate_sine(500.0, 1024, 0.5).iter().map(|&x| x as f32).collect();
    let mut right = vec![0.0_f32; 1024];
    chasm.process_stereo(&mut left, &mut right);
    assert_eq!(left, right);
}

// ============================================================================
// 3. Limiter and tone
// ============================================================================

#[test]
fn limiter_keeps_hot_signal_in_range() {
    let mut chasm =
        ChasmProcessor::<f32>::new(ProcessSpec::new(SAMPLE_RATE, 128, ChannelLayout::Stereo));
    chasm.update_parameters(
        &ChasmParams::default()
            .with(ParamId::InputGain, 24.0)
            .with(ParamId::OutputGain, 24.0),
    );
    chasm.limiter_mut().set_ceiling_db(-3.0);
    let ceiling = chasm.limiter().ceiling();

    let mut left = vec![0.9_f32; 4096];
    let mut right = vec![-0.9_f32; 4096];
    chasm.process_stereo(&mut left, &mut right);
    assert!(left.iter().chain(&right).all(|x| x.abs() <= ceiling));
    assert!(chasm.gain_reduction_db() <= 0.0);
}

#[test]
fn cut_at_one_percent_is_exact_bypass() {
    let input = generate_sine(60.0, 2048, 0.7);

    let mut cuts = DualCutFilter::<f64>::new(SAMPLE_RATE);
    cuts.set_low_cut(1.0);
    cuts.set_high_cut(1.0);
    let mut output = input.clone();
    cuts.process_block(&mut output);
    assert_eq!(output, input);

    let mut chasm =
        ChasmProcessor::<f64>::new(ProcessSpec::new(SAMPLE_RATE, 256, ChannelLayout::Mono));
    chasm.update_parameters(
        &wet_only_params()
            .with(ParamId::LowCut, 1.0)
            .with(ParamId::HighCut, 0.5),
    );
    let mut engine_out = input.clone();
    chasm.process_mono(&mut engine_out);
    assert_eq!(engine_out, reference_wet(&input));
}

#[test]
fn low_cut_removes_rumble() {
    let mut chasm =
        ChasmProcessor::<f64>::new(ProcessSpec::new(SAMPLE_RATE, 256, ChannelLayout::Mono));
    chasm.update_parameters(&wet_only_params().with(ParamId::LowCut, 100.0));

    let input = generate_sine(40.0, 48000, 0.5);
    let mut output = input.clone();
    chasm.process_mono(&mut output);
    let ratio = rms(&output[24000..]) / rms(&input[24000..]);
    assert!(ratio < 0.05, "40 Hz should be cut hard at 1 kHz corner, ratio {ratio:.4}");
}

// ============================================================================
// 4. Parameter smoothing
// ============================================================================

#[test]
fn mix_change_ramps_without_jump() {
    let mut chasm =
        ChasmProcessor::<f64>::new(ProcessSpec::new(SAMPLE_RATE, 64, ChannelLayout::Mono));
    chasm.update_parameters(
        &ChasmParams::default()
            .with(ParamId::Mix, 0.0)
            .with(ParamId::Limiter, 0.0),
    );

    let mut warmup = vec![0.5; 64];
    chasm.process_mono(&mut warmup);
    assert!(warmup.iter().all(|&x| x == 0.5));

    // Mix is read once per chunk: after 64 of 960 ramp samples the wet share
    // is about 7 %, so the output moves a little away from the dry level
    chasm.update_parameters(
        &ChasmParams::default()
            .with(ParamId::Mix, 100.0)
            .with(ParamId::Limiter, 0.0),
    );
    let mut first = vec![0.5; 64];
    chasm.process_mono(&mut first);
    assert!(first.iter().all(|&x| (x - 0.5).abs() < 0.2), "jump in first block");
    assert!(first[0] < 0.49, "ramp should have started, got {}", first[0]);
}

#[test]
fn parameters_push_on_update_interval() {
    assert_eq!(UPDATE_INTERVAL, 32);

    let mut chasm =
        ChasmProcessor::<f64>::new(ProcessSpec::new(SAMPLE_RATE, 512, ChannelLayout::Mono));
    chasm.update_parameters(&wet_only_params());
    chasm.update_parameters(&wet_only_params().with(ParamId::Brightness, 12.0));

    let mut buffer = vec![0.0; 31];
    chasm.process_mono(&mut buffer);
    let tone_gain = chasm.strip(0).map(|s| s.second().brightness().gain_db());
    // Only the push at index 0 has happened: one step into a 10 ms ramp
    let one_step = 12.0 / 480.0;
    assert!(tone_gain.is_some_and(|g| (g - one_step).abs() < 1e-9), "{tone_gain:?}");
}

#[test]
fn reset_then_update_snaps_again() {
    let mut chasm =
        ChasmProcessor::<f64>::new(ProcessSpec::new(SAMPLE_RATE, 256, ChannelLayout::Mono));
    chasm.update_parameters(&wet_only_params());
    let input = generate_sine(1000.0, 1024, 0.5);
    let mut scratch = input.clone();
    chasm.process_mono(&mut scratch);

    chasm.reset();
    chasm.update_parameters(&wet_only_params());
    let mut output = input.clone();
    chasm.process_mono(&mut output);
    assert_eq!(output, reference_wet(&input));
}
