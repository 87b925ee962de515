//! Filter response measurement from a sweep recording.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use synthscope_analysis::FrequencyResponse;
use synthscope_config::MeasurementConfig;
use synthscope_io::{read_wav_mono, write_response_csv};

use super::common::print_json;

#[derive(Args)]
pub struct FilterArgs {
    /// Stimulus WAV file (the sweep or noise fed into the filter)
    #[arg(value_name = "STIMULUS")]
    stimulus: PathBuf,

    /// Recorded filter output WAV file
    #[arg(value_name = "RESPONSE")]
    response: PathBuf,

    /// Cutoff threshold in dB below the passband
    #[arg(long, allow_hyphen_values = true)]
    threshold: Option<f64>,

    /// Write the magnitude response to a CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a JSON report instead of a summary
    #[arg(long)]
    json: bool,
}

pub fn run(args: FilterArgs, profile: &MeasurementConfig) -> anyhow::Result<()> {
    let (stimulus, stimulus_spec) = read_wav_mono(&args.stimulus)
        .with_context(|| format!("reading {}", args.stimulus.display()))?;
    let (response, response_spec) = read_wav_mono(&args.response)
        .with_context(|| format!("reading {}", args.response.display()))?;

    if stimulus_spec.sample_rate != response_spec.sample_rate {
        anyhow::bail!(
            "Sample rate mismatch: {} vs {}",
            stimulus_spec.sample_rate,
            response_spec.sample_rate
        );
    }
    let sample_rate = f64::from(stimulus_spec.sample_rate);
    let threshold = args.threshold.unwrap_or(profile.filter.cutoff_db);

    let measured = FrequencyResponse::estimate(&stimulus, &response, sample_rate)
        .context("estimating frequency response")?;
    let cutoff = measured.find_cutoff(threshold)?;
    let (peak_hz, peak_db) = measured.find_resonance_peak()?;

    if let Some(output_path) = &args.output {
        write_response_csv(output_path, &measured)
            .with_context(|| format!("writing {}", output_path.display()))?;
        tracing::info!(path = %output_path.display(), bins = measured.len(), "wrote response");
    }

    if args.json {
        return print_json(&serde_json::json!({
            "stimulus": args.stimulus.to_string_lossy(),
            "response": args.response.to_string_lossy(),
            "sample_rate": stimulus_spec.sample_rate,
            "bins": measured.len(),
            "threshold_db": threshold,
            "cutoff_hz": cutoff,
            "resonance": {
                "frequency_hz": peak_hz,
                "magnitude_db": peak_db,
            },
        }));
    }

    println!("Filter Response");
    println!("===============");
    println!("  Stimulus: {}", args.stimulus.display());
    println!("  Response: {}", args.response.display());
    println!("  {} bins at {} Hz", measured.len(), stimulus_spec.sample_rate);
    println!();
    println!("  Cutoff ({:+.1} dB):  {:.1} Hz", threshold, cutoff);
    println!("  Resonance peak:    {:.1} Hz ({:+.2} dB)", peak_hz, peak_db);

    Ok(())
}
