//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use std::path::Path;
use synthscope_config::{MeasurementConfig, resolve_profile};

/// Load the profile named on the command line, or the user default.
pub fn load_profile(path: Option<&Path>) -> anyhow::Result<MeasurementConfig> {
    let profile = match path {
        Some(path) => resolve_profile(Some(path))
            .with_context(|| format!("loading profile {}", path.display()))?,
        None => resolve_profile(None).context("loading user profile")?,
    };
    tracing::debug!(name = %profile.name, "using profile");
    Ok(profile)
}

/// Print a JSON report to stdout.
pub fn print_json(report: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Signed percentage error of `measured` against `expected`.
pub fn percent_error(measured: f64, expected: f64) -> f64 {
    if expected == 0.0 {
        0.0
    } else {
        (measured - expected) / expected * 100.0
    }
}
