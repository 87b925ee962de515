//! Parameter-sweep CSV loading.
//!
//! Rows are `parameter_value,measured_value`. A header line, blank lines,
//! `#` comments and malformed rows (too few columns, non-numeric or
//! non-finite values, a parameter value outside [0, 1]) are skipped; extra
//! columns are ignored.

use crate::{Error, Result};
use std::path::Path;
use synthscope_analysis::ParameterCurveDataset;

/// A dataset together with what was dropped while loading it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDataset {
    /// The valid rows.
    pub dataset: ParameterCurveDataset,
    /// Number of non-empty, non-comment lines that were skipped.
    pub skipped: usize,
}

/// Parse CSV text into valid `(x, y)` rows and a skipped-line count.
///
/// Never fails; an unreadable line is only counted.
pub fn parse_dataset(text: &str) -> (Vec<(f64, f64)>, usize) {
    let mut rows = Vec::new();
    let mut skipped = 0;

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_row(line) {
            Some(row) => rows.push(row),
            None => {
                tracing::debug!(line = number + 1, content = line, "skipping malformed row");
                skipped += 1;
            }
        }
    }

    (rows, skipped)
}

fn parse_row(line: &str) -> Option<(f64, f64)> {
    let mut fields = line.split(',').map(str::trim);
    let x = fields.next()?.parse::<f64>().ok()?;
    let y = fields.next()?.parse::<f64>().ok()?;
    (x.is_finite() && y.is_finite() && (0.0..=1.0).contains(&x)).then_some((x, y))
}

/// Load a sweep from a CSV file.
///
/// Fails when the file cannot be read or fewer than two valid rows remain.
pub fn read_dataset<P: AsRef<Path>>(path: P) -> Result<LoadedDataset> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let (rows, skipped) = parse_dataset(&text);

    if skipped > 0 {
        tracing::warn!(path = %path.display(), skipped, "skipped malformed rows");
    }

    let dataset = ParameterCurveDataset::from_pairs(&rows).map_err(|source| Error::Dataset {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), rows = dataset.len(), "loaded sweep");

    Ok(LoadedDataset { dataset, skipped })
}
