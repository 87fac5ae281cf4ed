//! Display WAV file metadata.

use chasm_effects::ChannelLayout;
use chasm_io::{WavFormat, read_wav_info};
use clap::Args;

/// Display WAV file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the WAV file
    pub file: std::path::PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.file)?;

    let format_str = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "IEEE Float",
    };
    let layout = match ChannelLayout::from_channel_count(usize::from(info.channels)) {
        Some(ChannelLayout::Mono) => "mono",
        Some(ChannelLayout::Stereo) => "stereo",
        None => "not processable",
    };

    println!("File:        {}", args.file.display());
    println!("Format:      {} {}-bit", format_str, info.bits_per_sample);
    println!("Channels:    {} ({layout})", info.channels);
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!(
        "Duration:    {:.3}s ({} frames)",
        info.duration_secs, info.num_frames
    );

    Ok(())
}
