//! A/B comparison of two measured responses.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use synthscope_analysis::compare_responses;
use synthscope_io::read_response_csv;

use super::common::print_json;

#[derive(Args)]
pub struct CompareArgs {
    /// Reference response CSV (e.g., hardware measurement)
    #[arg(value_name = "REFERENCE")]
    reference: PathBuf,

    /// Candidate response CSV (e.g., emulation measurement)
    #[arg(value_name = "CANDIDATE")]
    candidate: PathBuf,

    /// Print a JSON report instead of a summary
    #[arg(long)]
    json: bool,
}

pub fn run(args: CompareArgs) -> anyhow::Result<()> {
    let reference = read_response_csv(&args.reference)
        .with_context(|| format!("reading {}", args.reference.display()))?;
    let candidate = read_response_csv(&args.candidate)
        .with_context(|| format!("reading {}", args.candidate.display()))?;

    let comparison =
        compare_responses(&reference, &candidate).context("comparing responses")?;

    let match_quality = if comparison.max_error_db < 1.0 {
        "closely matches"
    } else if comparison.max_error_db < 3.0 {
        "moderately matches"
    } else {
        "differs significantly from"
    };

    if args.json {
        return print_json(&serde_json::json!({
            "reference": args.reference.to_string_lossy(),
            "candidate": args.candidate.to_string_lossy(),
            "bins": comparison.frequencies.len(),
            "rms_error_db": comparison.rms_error_db,
            "max_error_db": comparison.max_error_db,
            "correlation": comparison.correlation,
            "summary": {
                "match_quality": match_quality,
            },
        }));
    }

    println!("Response Comparison");
    println!("===================");
    println!("  Reference: {}", args.reference.display());
    println!("  Candidate: {}", args.candidate.display());
    println!();
    println!("  RMS error:   {:.3} dB", comparison.rms_error_db);
    println!("  Max error:   {:.3} dB", comparison.max_error_db);
    println!("  Correlation: {:.4}", comparison.correlation);
    println!();
    println!("Candidate {} the reference", match_quality);

    Ok(())
}
