//! Integration tests for chasm-io WAV I/O.

use chasm_io::{AudioClip, Error, WavFormat, WavSpec, read_wav, read_wav_info, write_wav};
use tempfile::NamedTempFile;

/// Generate a sine wave at the given sample rate.
fn sine_wave(sample_rate: u32, freq_hz: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| (2.0 * std::f32::consts::PI * freq_hz * i as f32 / sample_rate as f32).sin())
        .collect()
}

// ---------------------------------------------------------------------------
// Roundtrips
// ---------------------------------------------------------------------------

#[test]
fn wav_roundtrip_stereo_f32_keeps_channels_apart() {
    let sr = 48000;
    let left = sine_wave(sr, 440.0, sr as usize);
    let right = sine_wave(sr, 220.0, sr as usize);
    let clip = AudioClip::stereo(left.clone(), right.clone(), sr).unwrap();

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &clip).unwrap();

    let loaded = read_wav(file.path()).unwrap();
    assert_eq!(loaded.spec, clip.spec);
    assert_eq!(loaded.channels[0], left);
    assert_eq!(loaded.channels[1], right);
}

#[test]
fn wav_roundtrip_mono_24bit() {
    let sr = 44100;
    let samples: Vec<f32> = sine_wave(sr, 1000.0, 4410).iter().map(|x| x * 0.5).collect();
    let mut clip = AudioClip::mono(samples.clone(), sr);
    clip.spec.bits_per_sample = 24;

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &clip).unwrap();

    let loaded = read_wav(file.path()).unwrap();
    assert_eq!(loaded.spec.bits_per_sample, 24);
    for (a, b) in samples.iter().zip(&loaded.channels[0]) {
        assert!((a - b).abs() < 1e-6, "24-bit sample mismatch: {a} vs {b}");
    }
}

#[test]
fn int_output_clamps_out_of_range_samples() {
    let mut clip = AudioClip::mono(vec![2.0, -2.0, 0.0], 48000);
    clip.spec.bits_per_sample = 16;

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &clip).unwrap();

    let loaded = read_wav(file.path()).unwrap();
    let max = 32767.0 / 32768.0;
    assert_eq!(loaded.channels[0], vec![max, -1.0, 0.0]);
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

#[test]
fn wav_info_reports_frames_not_samples() {
    let clip = AudioClip::stereo(vec![0.0; 1200], vec![0.0; 1200], 48000).unwrap();
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &clip).unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.channels, 2);
    assert_eq!(info.num_frames, 1200);
    assert_eq!(info.format, WavFormat::IeeeFloat);
    assert!((info.duration_secs - 0.025).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[test]
fn read_rejects_multichannel_files() {
    let file = NamedTempFile::new().unwrap();
    let spec = hound::WavSpec {
        channels: 4,
        sample_rate: 48000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(file.path(), spec).unwrap();
    for _ in 0..16 {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();

    let err = read_wav(file.path()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedChannels(4)), "got {err}");
}

#[test]
fn write_rejects_ragged_channels() {
    let clip = AudioClip {
        spec: WavSpec::default(),
        channels: vec![vec![0.0; 10], vec![0.0; 9]],
    };
    let file = NamedTempFile::new().unwrap();
    let err = write_wav(file.path(), &clip).unwrap_err();
    assert!(matches!(err, Error::ChannelLengthMismatch(10, 9)));
}

#[test]
fn read_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_wav(dir.path().join("missing.wav"));
    assert!(result.is_err());
}
