//! Chorus characterization against the reference mode values.

use anyhow::Context;
use clap::Args;
use std::path::{Path, PathBuf};
use synthscope_analysis::modulation::analyze;
use synthscope_analysis::{ChorusExpectation, ChorusMode, ModulationMeasurement};
use synthscope_config::MeasurementConfig;
use synthscope_io::{read_wav_buffer, read_wav_mono};

use super::common::{percent_error, print_json};

#[derive(Args)]
pub struct ChorusArgs {
    /// Processed (wet) WAV file, ideally stereo
    #[arg(value_name = "INPUT", required_unless_present = "compare_modes")]
    input: Option<PathBuf>,

    /// Dry reference WAV file; enables the delay measurement
    #[arg(long)]
    dry: Option<PathBuf>,

    /// Chorus mode to compare against (1, 2 or both)
    #[arg(long, default_value = "1")]
    mode: ChorusMode,

    /// Measure one recording per mode (Mode I, Mode II, Mode I+II) side by side
    #[arg(
        long,
        num_args = 3,
        value_names = ["MODE_I", "MODE_II", "MODE_I_II"],
        conflicts_with = "input"
    )]
    compare_modes: Option<Vec<PathBuf>>,

    /// Print a JSON report instead of a table
    #[arg(long)]
    json: bool,
}

/// One analyzed recording.
struct ModeReport {
    mode: ChorusMode,
    input: PathBuf,
    channels: usize,
    sample_rate: u32,
    measured: ModulationMeasurement,
    expected: Option<ChorusExpectation>,
}

impl ModeReport {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "input": self.input.to_string_lossy(),
            "mode": self.mode.to_string(),
            "channels": self.channels,
            "sample_rate": self.sample_rate,
            "measured": {
                "delay_ms": self.measured.delay_ms,
                "modulation_rate_hz": self.measured.modulation_rate_hz,
                "stereo_correlation": self.measured.stereo_correlation,
            },
            "expected": self.expected.map(|e| serde_json::json!({
                "delay_ms": e.delay_ms,
                "depth_ms": e.depth_ms,
                "rate_hz": e.rate_hz,
            })),
        })
    }
}

fn measure(
    mode: ChorusMode,
    input: &Path,
    dry: Option<&(Vec<f64>, u32)>,
    profile: &MeasurementConfig,
) -> anyhow::Result<ModeReport> {
    let (buffer, spec) =
        read_wav_buffer(input).with_context(|| format!("reading {}", input.display()))?;

    if let Some((_, dry_rate)) = dry {
        if *dry_rate != spec.sample_rate {
            anyhow::bail!("Sample rate mismatch: {} vs {}", dry_rate, spec.sample_rate);
        }
    }

    let measured = analyze(
        &buffer,
        dry.map(|(samples, _)| samples.as_slice()),
        f64::from(spec.sample_rate),
        &profile.modulation_settings(),
    )
    .with_context(|| format!("analyzing modulation of {}", input.display()))?;
    tracing::info!(%mode, input = %input.display(), "analyzed chorus recording");

    Ok(ModeReport {
        mode,
        input: input.to_path_buf(),
        channels: buffer.channels(),
        sample_rate: spec.sample_rate,
        measured,
        expected: profile.expectation(mode),
    })
}

pub fn run(args: ChorusArgs, profile: &MeasurementConfig) -> anyhow::Result<()> {
    let dry = match &args.dry {
        Some(path) => {
            let (samples, spec) =
                read_wav_mono(path).with_context(|| format!("reading {}", path.display()))?;
            Some((samples, spec.sample_rate))
        }
        None => None,
    };

    if let Some(paths) = &args.compare_modes {
        let reports = ChorusMode::ALL
            .into_iter()
            .zip(paths)
            .map(|(mode, path)| measure(mode, path, dry.as_ref(), profile))
            .collect::<anyhow::Result<Vec<_>>>()?;
        return if args.json {
            print_json(&serde_json::json!({
                "modes": reports.iter().map(ModeReport::to_json).collect::<Vec<_>>(),
            }))
        } else {
            print_mode_comparison(&reports);
            Ok(())
        };
    }

    let input = args
        .input
        .as_deref()
        .context("an INPUT recording or --compare-modes is required")?;
    let report = measure(args.mode, input, dry.as_ref(), profile)?;
    if args.json {
        return print_json(&report.to_json());
    }
    print_single(&report);
    Ok(())
}

fn print_single(report: &ModeReport) {
    let measured = &report.measured;

    println!("Chorus Analysis ({})", report.mode);
    println!("====================");
    println!("  Input:    {}", report.input.display());
    println!("  {} channel(s) at {} Hz", report.channels, report.sample_rate);
    println!();
    println!("  {:18}  {:>10}  {:>10}  {:>8}", "Metric", "Measured", "Expected", "Error");
    println!("  {:18}  {:>10}  {:>10}  {:>8}", "------", "--------", "--------", "-----");
    print_metric("Delay (ms)", measured.delay_ms, report.expected.map(|e| e.delay_ms));
    print_metric(
        "LFO rate (Hz)",
        Some(measured.modulation_rate_hz),
        report.expected.map(|e| e.rate_hz),
    );
    println!("  {:18}  {:>10.3}", "Stereo correlation", measured.stereo_correlation);

    if report.expected.is_none() {
        println!();
        println!("No reference values for {}.", report.mode);
    }
    if measured.delay_ms.is_none() {
        println!();
        println!("Pass --dry to measure the delay.");
    }
}

fn print_metric(name: &str, measured: Option<f64>, expected: Option<f64>) {
    let measured_col = measured.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"));
    let expected_col = expected.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"));
    let error_col = match (measured, expected) {
        (Some(m), Some(e)) => format!("{:.1}%", percent_error(m, e)),
        _ => "-".to_string(),
    };
    println!("  {name:18}  {measured_col:>10}  {expected_col:>10}  {error_col:>8}");
}

fn print_mode_comparison(reports: &[ModeReport]) {
    println!("Chorus Mode Comparison");
    println!("======================");
    for report in reports {
        println!("  {:10} {}", report.mode.to_string(), report.input.display());
    }
    println!();
    println!(
        "  {:10}  {:>10}  {:>10}  {:>11}  {:>12}",
        "Mode", "Delay (ms)", "LFO (Hz)", "Correlation", "Expected LFO"
    );
    println!(
        "  {:10}  {:>10}  {:>10}  {:>11}  {:>12}",
        "----", "----------", "--------", "-----------", "------------"
    );
    for report in reports {
        let delay = report
            .measured
            .delay_ms
            .map_or_else(|| "-".to_string(), |v| format!("{v:.3}"));
        let expected_rate = report
            .expected
            .map_or_else(|| "-".to_string(), |e| format!("{:.3}", e.rate_hz));
        println!(
            "  {:10}  {:>10}  {:>10.3}  {:>11.3}  {:>12}",
            report.mode.to_string(),
            delay,
            report.measured.modulation_rate_hz,
            report.measured.stereo_correlation,
            expected_rate
        );
    }
}
