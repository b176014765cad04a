// src/main.rs
//
// vcf-render: push a test signal through one filter and write or print the result.

use std::f64::consts::TAU;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use hound::{SampleFormat, WavSpec, WavWriter};
use log::{debug, info};
use tracing_subscriber::filter::LevelFilter;

use vcf::{FilterParams, PortInfo, PortKind, Topology, VcfFilter, descriptors};

/// ===============================
/// Command line
/// ===============================

#[derive(Parser, Debug)]
#[command(name = "vcf-render")]
#[command(about = "Render test signals through the vcf filters", long_about = None)]
struct Args {
    /// Print the plugin table with port ranges and exit
    #[arg(long)]
    list: bool,

    /// Filter topology (lowpass, highpass, bandpass1, bandpass2, notch,
    /// low_shelf, high_shelf, peak_eq, resonant_lowpass)
    #[arg(short, long, default_value = "lowpass")]
    topology: Topology,

    #[arg(short, long, value_enum, default_value_t = Signal::Saw)]
    signal: Signal,

    /// Saw frequency in Hz
    #[arg(long, default_value = "110")]
    osc_freq: f64,

    #[arg(short = 'r', long, default_value = "48000")]
    sample_rate: u32,

    /// Length in seconds
    #[arg(short, long, default_value = "2.0")]
    duration: f64,

    /// Frames per processing block
    #[arg(short, long, default_value = "256")]
    block: usize,

    #[arg(long, default_value = "1.0")]
    gain: f32,

    /// Base frequency in Hz
    #[arg(short, long, default_value = "1000")]
    freq: f32,

    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pitch: f32,

    #[arg(long, default_value = "0.05")]
    reso: f32,

    /// Shelf/peak gain in dB
    #[arg(long, default_value = "6")]
    db_gain: f32,

    /// Ramp the frequency CV from 0 to 1 over the whole render
    #[arg(long)]
    freq_sweep: bool,

    /// Modulate resonance with a sine LFO at this rate (Hz)
    #[arg(long)]
    reso_lfo: Option<f64>,

    /// Resonance LFO depth
    #[arg(long, default_value = "0.25")]
    reso_depth: f32,

    /// Seed for the noise generator
    #[arg(long, default_value = "305419896")]
    seed: u32,

    /// Write a 32-bit float mono WAV here instead of printing samples
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Signal {
    Impulse,
    Noise,
    Saw,
}

/// ===============================
/// Test signals
/// ===============================

/// Simple xorshift random number generator, uniform in -1..1.
struct Noise {
    state: u32,
}

impl Noise {
    fn new(seed: u32) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    fn sample(&mut self) -> f32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        (x as f32) / (u32::MAX as f32) * 2.0 - 1.0
    }
}

fn signal(args: &Args, frames: usize) -> Vec<f32> {
    match args.signal {
        Signal::Impulse => {
            let mut v = vec![0.0; frames];
            if let Some(first) = v.first_mut() {
                *first = 1.0;
            }
            v
        }
        Signal::Noise => {
            let mut noise = Noise::new(args.seed);
            (0..frames).map(|_| noise.sample()).collect()
        }
        Signal::Saw => {
            let step = args.osc_freq / args.sample_rate as f64;
            let mut phase = 0.0_f64;
            (0..frames)
                .map(|_| {
                    let y = (2.0 * phase - 1.0) as f32;
                    phase = (phase + step).fract();
                    y
                })
                .collect()
        }
    }
}

fn freq_sweep(frames: usize) -> Vec<f32> {
    let last = frames.saturating_sub(1).max(1) as f32;
    (0..frames).map(|i| i as f32 / last).collect()
}

fn reso_lfo(rate: f64, depth: f32, sample_rate: u32, frames: usize) -> Vec<f32> {
    let step = TAU * rate / sample_rate as f64;
    (0..frames)
        .map(|i| depth * (step * i as f64).sin() as f32)
        .collect()
}

/// ===============================
/// Commands
/// ===============================

fn port_line(port: &PortInfo) -> String {
    let mut line = format!("  {:>2} {:<12} {:?}", port.index, port.symbol, port.kind);
    if matches!(port.kind, PortKind::Control | PortKind::Cv) {
        line += &format!(" {} .. {}", port.format(port.min), port.format(port.max));
    }
    // A CV port reads zero when unconnected, so only controls have a default.
    if port.is_control() {
        line += &format!(" (default {})", port.format(port.default));
    }
    line
}

fn list() {
    for d in descriptors() {
        println!("{}  {}", d.uri(), d.name);
        for port in d.ports {
            println!("{}", port_line(port));
        }
    }
}

fn render(args: &Args) -> Result<Vec<f32>> {
    if args.block == 0 {
        bail!("--block must be at least 1");
    }
    if !args.duration.is_finite() || args.duration < 0.0 {
        bail!("--duration must be a non-negative number of seconds");
    }
    let frames = (args.duration * args.sample_rate as f64).round() as usize;

    let mut filter = VcfFilter::new(args.topology, args.sample_rate as f64)
        .with_context(|| format!("cannot build {} filter", args.topology))?;
    filter.activate();

    let input = signal(args, frames);
    let sweep = args.freq_sweep.then(|| freq_sweep(frames));
    let lfo = args
        .reso_lfo
        .map(|rate| reso_lfo(rate, args.reso_depth, args.sample_rate, frames));

    info!(
        "rendering {} frames of {:?} through {} ({} Hz, block {})",
        frames,
        args.signal,
        filter.topology(),
        filter.sample_rate(),
        args.block
    );

    let base = FilterParams::new()
        .gain(args.gain)
        .freq(args.freq)
        .pitch(args.pitch)
        .reso(args.reso)
        .db_gain(args.db_gain);

    let mut output = vec![0.0_f32; frames];
    for (n, start) in (0..frames).step_by(args.block).enumerate() {
        let end = (start + args.block).min(frames);
        let mut params = base;
        if let Some(sweep) = &sweep {
            params = params.freq_mod(&sweep[start..end]);
        }
        if let Some(lfo) = &lfo {
            params = params.reso_mod(&lfo[start..end]);
        }
        filter.process(&params, &input[start..end], &mut output[start..end]);
        debug!("block {} [{}..{})", n, start, end);
    }

    Ok(output)
}

fn write_wav(path: &Path, sample_rate: u32, samples: &[f32]) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// ===============================
/// Main
/// ===============================

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    if args.list {
        list();
        return Ok(());
    }

    let output = render(&args)?;

    match &args.output {
        Some(path) => {
            write_wav(path, args.sample_rate, &output)?;
            info!("wrote {} samples to {}", output.len(), path.display());
        }
        None => {
            for (i, y) in output.iter().enumerate() {
                println!("{i}\t{y:.6}");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_topology_names() {
        let args = Args::parse_from(["vcf-render", "-t", "peak_eq", "--reso-lfo", "2"]);
        assert_eq!(args.topology, Topology::PeakEq);
        assert_eq!(args.reso_lfo, Some(2.0));
        assert!(Args::try_parse_from(["vcf-render", "-t", "comb"]).is_err());
    }

    #[test]
    fn block_size_does_not_change_the_render() {
        let mut a = Args::parse_from(["vcf-render", "-d", "0.01", "--freq-sweep", "-s", "noise"]);
        a.block = 7;
        let small = render(&a).unwrap();
        a.block = 4096;
        let large = render(&a).unwrap();
        assert_eq!(small, large);
    }

    #[test]
    fn port_lines_show_defaults_for_controls_only() {
        let d = vcf::descriptor_for(Topology::PeakEq, true);
        let freq = d.port_for(vcf::PortRole::FreqOffset).unwrap();
        assert_eq!(
            port_line(freq),
            format!("  {:>2} freq_ofs     Control 20.000 Hz .. 20000.000 Hz (default 1000.000 Hz)", freq.index)
        );

        let cv = d.port_for(vcf::PortRole::ResoCv).unwrap();
        assert!(port_line(cv).ends_with("Cv -1.000 .. 1.000"));

        let input = d.port_for(vcf::PortRole::Input).unwrap();
        assert!(port_line(input).ends_with("AudioInput"));
    }

    #[test]
    fn noise_stays_in_range() {
        let mut noise = Noise::new(0);
        assert!((0..1000).map(|_| noise.sample()).all(|x| (-1.0..=1.0).contains(&x)));
    }
}
