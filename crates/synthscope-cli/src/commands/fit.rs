//! Parameter sweep curve fitting.

use anyhow::Context;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use synthscope_analysis::{CurveSelection, SweepParameter, fit_candidates, select_best};
use synthscope_config::MeasurementConfig;
use synthscope_io::read_dataset;

use super::common::print_json;

/// Swept control, as named on the command line
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliParameter {
    #[value(name = "filter_cutoff")]
    FilterCutoff,
    #[value(name = "filter_resonance")]
    FilterResonance,
    #[value(name = "envelope_attack")]
    EnvelopeAttack,
    #[value(name = "envelope_decay")]
    EnvelopeDecay,
    #[value(name = "envelope_release")]
    EnvelopeRelease,
    #[value(name = "lfo_rate")]
    LfoRate,
}

impl From<CliParameter> for SweepParameter {
    fn from(p: CliParameter) -> Self {
        match p {
            CliParameter::FilterCutoff => SweepParameter::FilterCutoff,
            CliParameter::FilterResonance => SweepParameter::FilterResonance,
            CliParameter::EnvelopeAttack => SweepParameter::EnvelopeAttack,
            CliParameter::EnvelopeDecay => SweepParameter::EnvelopeDecay,
            CliParameter::EnvelopeRelease => SweepParameter::EnvelopeRelease,
            CliParameter::LfoRate => SweepParameter::LfoRate,
        }
    }
}

#[derive(Args)]
pub struct FitArgs {
    /// Sweep CSV with `parameter_value,measured_value` rows
    #[arg(value_name = "CSV")]
    input: PathBuf,

    /// Swept control; labels the report and picks the envelope curve family
    #[arg(long, short, value_enum)]
    parameter: Option<CliParameter>,

    /// Curve family: auto, linear, exponential, logarithmic or power
    #[arg(long)]
    curve: Option<CurveSelection>,

    /// Residual evaluations allowed per candidate
    #[arg(long)]
    max_evaluations: Option<usize>,

    /// Print a JSON report instead of a table
    #[arg(long)]
    json: bool,
}

/// `--curve` wins, then the swept parameter's own family, then the profile.
fn resolve_selection(
    curve: Option<CurveSelection>,
    parameter: Option<SweepParameter>,
    profile: &MeasurementConfig,
) -> anyhow::Result<CurveSelection> {
    if let Some(selection) = curve {
        return Ok(selection);
    }
    if let Some(selection) = parameter.and_then(SweepParameter::default_selection) {
        return Ok(selection);
    }
    Ok(profile.curve_selection()?)
}

pub fn run(args: FitArgs, profile: &MeasurementConfig) -> anyhow::Result<()> {
    let loaded = read_dataset(&args.input)
        .with_context(|| format!("loading sweep {}", args.input.display()))?;

    let parameter = args.parameter.map(SweepParameter::from);
    let selection = resolve_selection(args.curve, parameter, profile)?;
    let mut options = profile.fit_options();
    if let Some(max_evaluations) = args.max_evaluations {
        options.max_evaluations = max_evaluations;
    }

    let candidates =
        fit_candidates(&loaded.dataset, selection, &options).context("fitting curves")?;
    let best = select_best(candidates.clone()).context("selecting curve model")?;
    let (y_min, y_max) = loaded.dataset.y_range();

    if args.json {
        let candidate_reports: Vec<serde_json::Value> = candidates
            .iter()
            .map(|c| match &c.outcome {
                Ok(fitted) => serde_json::json!({
                    "kind": c.kind.to_string(),
                    "coefficients": fitted.coefficients(),
                    "r_squared": fitted.r_squared(),
                }),
                Err(reason) => serde_json::json!({
                    "kind": c.kind.to_string(),
                    "error": reason,
                }),
            })
            .collect();
        let report = serde_json::json!({
            "input": args.input.to_string_lossy(),
            "parameter": parameter.map(|p| p.name()),
            "quantity": parameter.map(|p| p.quantity()),
            "unit": parameter.map(|p| p.unit()),
            "points": loaded.dataset.len(),
            "skipped_rows": loaded.skipped,
            "selection": selection.to_string(),
            "range": [y_min, y_max],
            "candidates": candidate_reports,
            "best": {
                "kind": best.kind().to_string(),
                "equation": best.model().to_string(),
                "coefficients": best.coefficients(),
                "r_squared": best.r_squared(),
            },
        });
        return print_json(&report);
    }

    let title = match parameter {
        Some(parameter) => format!("Curve Fit: {}", parameter.title()),
        None => "Curve Fit".to_string(),
    };
    println!("{title}");
    println!("{}", "=".repeat(title.chars().count()));
    println!("  Input:   {}", args.input.display());
    println!("  Points:  {} ({} skipped)", loaded.dataset.len(), loaded.skipped);
    match parameter {
        Some(parameter) => {
            let precision = parameter.precision();
            println!(
                "  Range:   {:.*} .. {:.*} {} ({})",
                precision,
                y_min,
                precision,
                y_max,
                parameter.unit(),
                parameter.quantity()
            );
        }
        None => println!("  Range:   {:.3} .. {:.3}", y_min, y_max),
    }
    println!();

    println!("  {:12}  {:>10}  {}", "Model", "R²", "Equation");
    println!("  {:12}  {:>10}  {}", "-----", "--", "--------");
    for candidate in &candidates {
        match &candidate.outcome {
            Ok(fitted) => println!(
                "  {:12}  {:>10.6}  {}",
                candidate.kind.to_string(),
                fitted.r_squared(),
                fitted.model()
            ),
            Err(reason) => println!(
                "  {:12}  {:>10}  {}",
                candidate.kind.to_string(),
                "failed",
                reason
            ),
        }
    }
    println!();
    println!("Best: {} (R² = {:.6})", best.kind(), best.r_squared());
    println!("  y = {}", best.model());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthscope_analysis::CurveKind;

    #[test]
    fn test_selection_precedence() {
        let mut profile = MeasurementConfig::default();
        profile.fit.curve = "linear".to_string();
        let exponential = CurveSelection::Only(CurveKind::Exponential);

        let from_profile = resolve_selection(None, Some(SweepParameter::LfoRate), &profile);
        assert_eq!(from_profile.unwrap(), CurveSelection::Only(CurveKind::Linear));

        let from_parameter =
            resolve_selection(None, Some(SweepParameter::EnvelopeRelease), &profile);
        assert_eq!(from_parameter.unwrap(), exponential);

        let from_flag = resolve_selection(
            Some(CurveSelection::Auto),
            Some(SweepParameter::EnvelopeAttack),
            &profile,
        );
        assert_eq!(from_flag.unwrap(), CurveSelection::Auto);
    }
}
