//! File-based rendering through the chasm engine.

use chasm_config::{Precision, RenderConfig};
use chasm_core::{Sample, gain_to_db};
use chasm_effects::{ChannelLayout, ChasmParams, ChasmProcessor, ProcessSpec};
use chasm_io::{AudioClip, read_wav, write_wav};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file (mono or stereo)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Render settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dry/wet mix in percent
    #[arg(long)]
    mix: Option<f64>,

    /// Base allpass delay in milliseconds
    #[arg(long)]
    delay: Option<f64>,

    /// Diffusion character (0.1 to 10)
    #[arg(long)]
    character: Option<f64>,

    /// Brightness in dB
    #[arg(long, allow_negative_numbers = true)]
    brightness: Option<f64>,

    /// Low-cut amount in percent
    #[arg(long)]
    low_cut: Option<f64>,

    /// High-cut amount in percent
    #[arg(long)]
    high_cut: Option<f64>,

    /// Stereo width in percent
    #[arg(long)]
    width: Option<f64>,

    /// Input gain in dB
    #[arg(long, allow_negative_numbers = true)]
    input_gain: Option<f64>,

    /// Output gain in dB
    #[arg(long, allow_negative_numbers = true)]
    output_gain: Option<f64>,

    /// Bypass the output limiter
    #[arg(long)]
    no_limiter: bool,

    /// Any parameter by key (e.g., "character=2.5")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, f64)>,

    /// Processing block size
    #[arg(long)]
    block_size: Option<usize>,

    /// Output bit depth (16, 24, or 32)
    #[arg(long)]
    bit_depth: Option<u16>,

    /// Engine sample type
    #[arg(long, value_enum)]
    precision: Option<PrecisionArg>,

    /// Seconds of silence appended so the diffusion tail can ring out
    #[arg(long, default_value = "0")]
    tail: f64,
}

#[derive(Clone, Copy, ValueEnum)]
enum PrecisionArg {
    F32,
    F64,
}

impl From<PrecisionArg> for Precision {
    fn from(arg: PrecisionArg) -> Self {
        match arg {
            PrecisionArg::F32 => Precision::F32,
            PrecisionArg::F64 => Precision::F64,
        }
    }
}

fn parse_key_val(s: &str) -> Result<(String, f64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid parameter format: '{}' (expected key=value)", s))?;
    let value = match value {
        "on" | "true" => 1.0,
        "off" | "false" => 0.0,
        v => v
            .parse::<f64>()
            .map_err(|e| format!("Invalid value for '{}': {}", key, e))?,
    };
    Ok((key.to_string(), value))
}

/// Merge the settings file with command-line overrides.
fn resolve_config(args: &ProcessArgs) -> anyhow::Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };

    let flags = [
        ("mix", args.mix),
        ("delay", args.delay),
        ("character", args.character),
        ("brightness", args.brightness),
        ("low_cut", args.low_cut),
        ("high_cut", args.high_cut),
        ("width", args.width),
        ("input_gain", args.input_gain),
        ("output_gain", args.output_gain),
    ];
    for (key, value) in flags {
        if let Some(value) = value {
            config.params.set_by_key(key, value);
        }
    }
    for (key, value) in &args.param {
        if !config.params.set_by_key(key, *value) {
            anyhow::bail!("Unknown parameter: '{}' (see 'chasm params')", key);
        }
    }
    if args.no_limiter {
        config.params.limiter = false;
    }

    if let Some(block_size) = args.block_size {
        config.block_size = block_size;
    }
    if let Some(bit_depth) = args.bit_depth {
        config.bit_depth = bit_depth;
    }
    if let Some(precision) = args.precision {
        config.precision = precision.into();
    }

    config.params.sanitize();
    config.validate()?;
    Ok(config)
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    if !args.tail.is_finite() || args.tail < 0.0 {
        anyhow::bail!("--tail must be a non-negative number of seconds");
    }

    println!("Reading {}...", args.input.display());
    let clip = read_wav(&args.input)?;
    let sample_rate = clip.spec.sample_rate;
    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        clip.frames(),
        clip.channel_count(),
        sample_rate,
        clip.duration_secs()
    );

    let params = config.params.to_chasm_params();
    let tail_frames = (args.tail * f64::from(sample_rate)).round() as usize;
    tracing::info!(
        block_size = config.block_size,
        precision = ?config.precision,
        tail_frames,
        "rendering"
    );

    let pb = ProgressBar::new((clip.frames() + tail_frames) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let rendered = match config.precision {
        Precision::F32 => render::<f32>(&clip, &params, config.block_size, tail_frames, &pb),
        Precision::F64 => render::<f64>(&clip, &params, config.block_size, tail_frames, &pb),
    }?;
    pb.finish_with_message("done");

    let mut output = AudioClip {
        spec: clip.spec,
        channels: rendered.channels,
    };
    output.spec.bits_per_sample = config.bit_depth;

    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        level_db(clip.rms()),
        level_db(clip.peak())
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        level_db(output.rms()),
        level_db(output.peak())
    );
    if params.limiter_enabled {
        println!("  Limiter: max gain reduction {:.1} dB", rendered.max_reduction_db);
    }

    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &output)?;
    println!("Done!");

    Ok(())
}

/// Engine output plus the deepest limiter reduction seen.
struct Render {
    channels: Vec<Vec<f32>>,
    max_reduction_db: f64,
}

fn render<T: Sample>(
    clip: &AudioClip,
    params: &ChasmParams,
    block_size: usize,
    tail_frames: usize,
    pb: &ProgressBar,
) -> anyhow::Result<Render> {
    let layout = ChannelLayout::from_channel_count(clip.channel_count()).ok_or_else(|| {
        anyhow::anyhow!("Cannot process {} channels", clip.channel_count())
    })?;
    let spec = ProcessSpec::new(f64::from(clip.spec.sample_rate), block_size, layout);
    let mut chasm = ChasmProcessor::<T>::new(spec);
    chasm.update_parameters(params);

    let mut buffers: Vec<Vec<T>> = clip
        .channels
        .iter()
        .map(|channel| {
            channel
                .iter()
                .map(|&s| T::from_f64(f64::from(s)))
                .chain(std::iter::repeat_n(T::ZERO, tail_frames))
                .collect()
        })
        .collect();

    let mut max_reduction_db = 0.0_f64;
    let mut done = 0;
    match buffers.as_mut_slice() {
        [mono] => {
            for chunk in mono.chunks_mut(block_size) {
                chasm.process_mono(chunk);
                max_reduction_db = max_reduction_db.min(chasm.gain_reduction_db());
                done += chunk.len();
                pb.set_position(done as u64);
            }
        }
        [left, right] => {
            for (l, r) in left.chunks_mut(block_size).zip(right.chunks_mut(block_size)) {
                chasm.process_stereo(l, r);
                max_reduction_db = max_reduction_db.min(chasm.gain_reduction_db());
                done += l.len();
                pb.set_position(done as u64);
            }
        }
        other => anyhow::bail!("Cannot process {} channels", other.len()),
    }

    let channels = buffers
        .into_iter()
        .map(|channel| channel.into_iter().map(|s| s.to_f64() as f32).collect())
        .collect();
    Ok(Render {
        channels,
        max_reduction_db,
    })
}

fn level_db(linear: f32) -> f64 {
    if linear <= 0.0 {
        -120.0
    } else {
        gain_to_db(f64::from(linear))
    }
}
