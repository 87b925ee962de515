//! A/B comparison of two measured frequency responses

use crate::error::{Result, SignalShapeError};
use crate::response::FrequencyResponse;

/// Difference between two responses on the first one's frequency grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseComparison {
    /// Common frequency grid (Hz), taken from the first response.
    pub frequencies: Vec<f64>,
    /// `a − b` in dB at each frequency.
    pub difference_db: Vec<f64>,
    /// Root-mean-square of the difference (dB).
    pub rms_error_db: f64,
    /// Largest absolute difference (dB).
    pub max_error_db: f64,
    /// Pearson correlation of the two magnitude curves (0.0 when either is flat).
    pub correlation: f64,
}

/// Compare `a` against `b`.
///
/// `b` is linearly interpolated onto `a`'s grid, extending its end segments
/// where `a` reaches beyond it.
pub fn compare_responses(
    a: &FrequencyResponse,
    b: &FrequencyResponse,
) -> Result<ResponseComparison> {
    if a.is_empty() {
        return Err(SignalShapeError::empty("first response").into());
    }
    if b.is_empty() {
        return Err(SignalShapeError::empty("second response").into());
    }

    let b_on_a: Vec<f64> = a
        .frequencies()
        .iter()
        .filter_map(|&f| b.magnitude_at(f))
        .collect();

    let difference_db: Vec<f64> = a
        .magnitude_db()
        .iter()
        .zip(&b_on_a)
        .map(|(x, y)| x - y)
        .collect();

    let n = difference_db.len() as f64;
    let rms_error_db = (difference_db.iter().map(|d| d * d).sum::<f64>() / n).sqrt();
    let max_error_db = difference_db.iter().map(|d| d.abs()).fold(0.0, f64::max);
    let correlation = pearson(a.magnitude_db(), &b_on_a);

    tracing::debug!(rms_error_db, max_error_db, correlation, "compared responses");

    Ok(ResponseComparison {
        frequencies: a.frequencies().to_vec(),
        difference_db,
        rms_error_db,
        max_error_db,
        correlation,
    })
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }

    let mean_a = a[..len].iter().sum::<f64>() / len as f64;
    let mean_b = b[..len].iter().sum::<f64>() / len as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;

    for (x, y) in a[..len].iter().zip(&b[..len]) {
        let da = x - mean_a;
        let db = y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    if var_a > 1e-10 && var_b > 1e-10 {
        cov / (var_a.sqrt() * var_b.sqrt())
    } else {
        0.0
    }
}
