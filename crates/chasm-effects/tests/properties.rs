//! Property-based tests for the chasm effect stages.
//!
//! Limiter ceiling, end-to-end finiteness and parameter clamping under
//! randomized input.

use chasm_effects::{
    ChannelLayout, ChasmParams, ChasmProcessor, Limiter, PARAMS, ParamId, ProcessSpec,
    SchroederAllpassChain, StereoEnhancer,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// No output sample ever exceeds the ceiling, for any finite input.
    #[test]
    fn limiter_respects_ceiling(
        ceiling_db in -24.0f64..=0.0,
        left in prop::collection::vec(-1.0e6f32..1.0e6f32, 1..256),
        stereo in any::<bool>(),
    ) {
        let mut limiter = Limiter::<f32>::new(48000.0);
        limiter.set_ceiling_db(ceiling_db);
        let ceiling = limiter.ceiling();

        let mut left = left;
        let mut right: Vec<f32> = left.iter().map(|x| -0.5 * x).collect();
        if stereo {
            limiter.process_stereo(&mut left, &mut right);
            for &x in &right {
                prop_assert!(x.abs() <= ceiling, "right {} above ceiling {}", x, ceiling);
            }
        } else {
            limiter.process_mono(&mut left);
        }
        for &x in &left {
            prop_assert!(x.abs() <= ceiling, "left {} above ceiling {}", x, ceiling);
        }
    }

    /// Disabled limiter is bit-exact identity.
    #[test]
    fn disabled_limiter_is_identity(
        input in prop::collection::vec(-100.0f64..100.0, 1..128),
    ) {
        let mut limiter = Limiter::<f64>::new(44100.0);
        limiter.set_enabled(false);
        let mut buffer = input.clone();
        limiter.process_mono(&mut buffer);
        prop_assert_eq!(buffer, input);
    }

    /// Width 0 always collapses the pair to identical channels.
    #[test]
    fn zero_width_is_mono(
        left in prop::collection::vec(-1.0f32..=1.0, 1..128),
        low_cut in 0.0f64..100.0,
        high_cut in 0.0f64..100.0,
    ) {
        let mut enhancer = StereoEnhancer::<f32>::new(48000.0);
        enhancer.set_width(0.0);
        enhancer.set_low_cut(low_cut);
        enhancer.set_high_cut(high_cut);
        enhancer.snap_to_targets();

        let mut left = left;
        let mut right: Vec<f32> = left.iter().rev().copied().collect();
        enhancer.process_block(&mut left, &mut right);
        prop_assert_eq!(left, right);
    }

    /// The diffuser stays finite for any legal setting and bounded input.
    #[test]
    fn diffusion_stays_finite(
        delay_ms in 0.0f64..150.0,
        character in 0.0f64..20.0,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut diffuser = SchroederAllpassChain::<f32>::new(48000.0);
        diffuser.set_delay_time(delay_ms);
        diffuser.set_character(character);

        for _ in 0..64 {
            for &x in &input {
                let y = diffuser.process_sample(x);
                prop_assert!(y.is_finite(), "diffuser produced {}", y);
            }
        }
    }

    /// The whole processor produces finite output within the ceiling for
    /// arbitrary (even out-of-range) parameters.
    #[test]
    fn processor_output_is_finite(
        normalized in prop::array::uniform10(0.0f64..=1.0),
        input in prop::collection::vec(-2.0f32..=2.0, 64..512),
    ) {
        let mut params = ChasmParams::default();
        for (spec, n) in PARAMS.iter().zip(normalized) {
            params.set(spec.id, spec.from_normalized(n));
        }
        params.set(ParamId::Limiter, 1.0);

        let mut chasm =
            ChasmProcessor::<f32>::new(ProcessSpec::new(48000.0, 128, ChannelLayout::Stereo));
        chasm.update_parameters(&params);

        let mut left = input.clone();
        let mut right: Vec<f32> = input.iter().map(|x| x * 0.5).collect();
        chasm.process_stereo(&mut left, &mut right);
        for x in left.iter().chain(&right) {
            prop_assert!(x.is_finite() && x.abs() <= 1.0, "sample {}", x);
        }
    }

    /// `clamped` is idempotent and lands every field inside its range.
    #[test]
    fn params_clamp_into_range(values in prop::array::uniform10(-1.0e4f64..1.0e4)) {
        let mut raw = ChasmParams::default();
        raw.input_gain_db = values[0];
        raw.output_gain_db = values[1];
        raw.mix_percent = values[2];
        raw.delay_ms = values[3];
        raw.brightness_db = values[4];
        raw.character = values[5];
        raw.low_cut_percent = values[6];
        raw.high_cut_percent = values[7];
        raw.width_percent = values[8];
        raw.limiter_enabled = values[9] > 0.0;

        let clamped = raw.clamped();
        prop_assert_eq!(clamped.clamped(), clamped);
        for spec in &PARAMS {
            let v = clamped.get(spec.id);
            prop_assert!(v >= spec.min && v <= spec.max, "{} = {}", spec.name, v);
        }
    }
}
