//! Curve model fitting with automatic model selection.
//!
//! Each candidate family is fitted by Levenberg–Marquardt from its fixed
//! initial guess and scored by the coefficient of determination
//!
//! ```text
//! R² = 1 − SS_res / SS_tot
//! ```
//!
//! A candidate that fails to converge is skipped with a warning. In auto
//! mode the strictly highest R² wins; ties keep the earlier family in
//! [`CurveKind::ALL`] order.
//!
//! # Example
//!
//! ```rust
//! use synthscope_analysis::{CurveSelection, FitOptions, ParameterCurveDataset, fit};
//!
//! let data = ParameterCurveDataset::new(
//!     vec![0.0, 0.25, 0.5, 0.75, 1.0],
//!     vec![30.0, 65.0, 180.0, 1500.0, 12000.0],
//! )
//! .unwrap();
//!
//! let best = fit(&data, CurveSelection::Auto, &FitOptions::default()).unwrap();
//! println!("{} (R² = {:.4})", best.model(), best.r_squared());
//! ```

use crate::curve::{CurveKind, CurveModel, CurveSelection};
use crate::dataset::ParameterCurveDataset;
use crate::error::{DatasetError, FitAttempt, FitError, Result};
use crate::lm::{self, LmOptions};

/// Optimizer budget for each candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Residual evaluations allowed per candidate family.
    ///
    /// Measured sweeps are noisy and some families converge slowly from the
    /// fixed starting point, so the default is generous.
    pub max_evaluations: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_evaluations: 10_000,
        }
    }
}

impl FitOptions {
    fn lm_options(&self) -> LmOptions {
        LmOptions {
            max_evaluations: self.max_evaluations,
            ..LmOptions::default()
        }
    }
}

/// A fitted model and its goodness of fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedCurve {
    model: CurveModel,
    r_squared: f64,
}

impl FittedCurve {
    /// The fitted model with its coefficients.
    pub fn model(&self) -> CurveModel {
        self.model
    }

    /// Model family.
    pub fn kind(&self) -> CurveKind {
        self.model.kind()
    }

    /// Coefficients in `a, b[, c]` order.
    pub fn coefficients(&self) -> Vec<f64> {
        self.model.coefficients()
    }

    /// Coefficient of determination, at most 1.0.
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Evaluate the fitted curve at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.model.evaluate(x)
    }
}

/// Outcome of fitting a single family.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFit {
    /// The family that was tried.
    pub kind: CurveKind,
    /// The fit, or why it was rejected.
    pub outcome: std::result::Result<FittedCurve, String>,
}

/// Fit the dataset and return the best candidate.
///
/// Fails with [`DatasetError::ConstantResponse`] when every `y` is identical
/// (R² undefined) and with [`FitError`] when no candidate converges.
pub fn fit(
    dataset: &ParameterCurveDataset,
    selection: CurveSelection,
    options: &FitOptions,
) -> Result<FittedCurve> {
    let candidates = fit_candidates(dataset, selection, options)?;
    select_best(candidates)
}

/// Keep the candidate with the highest R².
///
/// Ties go to the earlier candidate. Fails with [`FitError`], listing every
/// rejected family, when no candidate succeeded.
pub fn select_best(candidates: Vec<CandidateFit>) -> Result<FittedCurve> {
    let mut best: Option<FittedCurve> = None;
    let mut attempts = Vec::new();
    for candidate in candidates {
        match candidate.outcome {
            Ok(fitted) => {
                if best.is_none_or(|current| fitted.r_squared > current.r_squared) {
                    best = Some(fitted);
                }
            }
            Err(reason) => attempts.push(FitAttempt {
                kind: candidate.kind,
                reason,
            }),
        }
    }

    match best {
        Some(fitted) => {
            tracing::info!(
                kind = %fitted.kind(),
                r_squared = fitted.r_squared,
                coefficients = ?fitted.coefficients(),
                "selected curve model"
            );
            Ok(fitted)
        }
        None => Err(FitError::new(attempts).into()),
    }
}

/// Fit every candidate family of `selection`, in evaluation order.
///
/// Failed candidates are reported (and logged at `warn`) rather than
/// aborting the whole call.
pub fn fit_candidates(
    dataset: &ParameterCurveDataset,
    selection: CurveSelection,
    options: &FitOptions,
) -> Result<Vec<CandidateFit>> {
    let ss_tot = dataset.total_sum_of_squares();
    if ss_tot <= 0.0 {
        return Err(DatasetError::ConstantResponse.into());
    }

    let candidates = selection
        .candidates()
        .iter()
        .map(|&kind| {
            let outcome = fit_kind(dataset, kind, ss_tot, options);
            match &outcome {
                Ok(fitted) => tracing::debug!(
                    %kind,
                    r_squared = fitted.r_squared,
                    coefficients = ?fitted.coefficients(),
                    "candidate fitted"
                ),
                Err(reason) => tracing::warn!(%kind, %reason, "failed to fit candidate, skipping"),
            }
            CandidateFit { kind, outcome }
        })
        .collect();

    Ok(candidates)
}

fn fit_kind(
    dataset: &ParameterCurveDataset,
    kind: CurveKind,
    ss_tot: f64,
    options: &FitOptions,
) -> std::result::Result<FittedCurve, String> {
    let x = dataset.x();
    let y = dataset.y();

    let report = lm::minimize(
        |params, out| {
            for ((r, &xi), &yi) in out.iter_mut().zip(x).zip(y) {
                *r = kind.evaluate(xi, params) - yi;
            }
        },
        kind.initial_guess(),
        dataset.len(),
        &options.lm_options(),
    )
    .map_err(|e| e.to_string())?;

    tracing::trace!(
        %kind,
        evaluations = report.evaluations,
        termination = ?report.termination,
        "optimizer finished"
    );

    let model = CurveModel::from_params(kind, &report.params)
        .ok_or_else(|| format!("optimizer returned {} coefficients", report.params.len()))?;
    let r_squared = r_squared(dataset, |xi| model.evaluate(xi), ss_tot);
    if !r_squared.is_finite() {
        return Err("fitted curve is not finite over the data".to_string());
    }

    Ok(FittedCurve { model, r_squared })
}

/// R² of `predict` against the dataset, given its total sum of squares.
fn r_squared(dataset: &ParameterCurveDataset, predict: impl Fn(f64) -> f64, ss_tot: f64) -> f64 {
    let ss_res: f64 = dataset
        .x()
        .iter()
        .zip(dataset.y())
        .map(|(&xi, &yi)| (yi - predict(xi)).powi(2))
        .sum();
    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    fn sample(kind: CurveKind, params: &[f64], points: usize) -> ParameterCurveDataset {
        let x: Vec<f64> = (0..points).map(|i| i as f64 / (points - 1) as f64).collect();
        let y = x.iter().map(|&xi| kind.evaluate(xi, params)).collect();
        ParameterCurveDataset::new(x, y).unwrap()
    }

    fn assert_recovers(kind: CurveKind, truth: &[f64]) {
        let data = sample(kind, truth, 21);
        let fitted = fit(&data, CurveSelection::Only(kind), &FitOptions::default()).unwrap();

        assert_eq!(fitted.kind(), kind);
        assert!(fitted.r_squared() >= 0.999, "{kind}: R² = {}", fitted.r_squared());
        for (got, want) in fitted.coefficients().iter().zip(truth) {
            let rel = ((got - want) / want).abs();
            assert!(rel < 0.01, "{kind}: coefficient {got} vs {want} ({rel:.2e} relative)");
        }
    }

    #[test]
    fn recovers_linear() {
        assert_recovers(CurveKind::Linear, &[2.5, -1.0]);
    }

    #[test]
    fn recovers_exponential() {
        assert_recovers(CurveKind::Exponential, &[3.0, 2.0, 1.0]);
    }

    #[test]
    fn recovers_logarithmic() {
        assert_recovers(CurveKind::Logarithmic, &[4.0, 0.5]);
    }

    #[test]
    fn recovers_power() {
        assert_recovers(CurveKind::Power, &[5.0, 1.5, 2.0]);
    }

    #[test]
    fn filter_cutoff_sweep_prefers_growth_model() {
        let data = ParameterCurveDataset::new(
            vec![0.0, 0.25, 0.5, 0.75, 1.0],
            vec![30.0, 65.0, 180.0, 1500.0, 12000.0],
        )
        .unwrap();

        let best = fit(&data, CurveSelection::Auto, &FitOptions::default()).unwrap();
        assert!(
            matches!(best.kind(), CurveKind::Exponential | CurveKind::Power),
            "selected {}",
            best.kind()
        );
        assert!(best.r_squared() > 0.95, "R² = {}", best.r_squared());
    }

    #[test]
    fn auto_reports_every_candidate() {
        let data = sample(CurveKind::Linear, &[1.0, 1.0], 6);
        let candidates =
            fit_candidates(&data, CurveSelection::Auto, &FitOptions::default()).unwrap();
        let kinds: Vec<CurveKind> = candidates.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, CurveKind::ALL.to_vec());
    }

    fn candidate(model: CurveModel, r_squared: f64) -> CandidateFit {
        CandidateFit {
            kind: model.kind(),
            outcome: Ok(FittedCurve { model, r_squared }),
        }
    }

    #[test]
    fn tie_keeps_first_in_evaluation_order() {
        let best = select_best(vec![
            candidate(CurveModel::Linear { a: 2.0, b: 3.0 }, 0.9),
            candidate(CurveModel::Exponential { a: 1.0, b: 1.0, c: 0.0 }, 0.8),
            candidate(CurveModel::Power { a: 2.0, b: 1.0, c: 3.0 }, 0.9),
        ])
        .unwrap();
        assert_eq!(best.kind(), CurveKind::Linear);
    }

    #[test]
    fn failed_candidates_are_skipped() {
        let best = select_best(vec![
            CandidateFit {
                kind: CurveKind::Linear,
                outcome: Err("diverged".to_string()),
            },
            candidate(CurveModel::Logarithmic { a: 1.0, b: 0.0 }, 0.5),
        ])
        .unwrap();
        assert_eq!(best.kind(), CurveKind::Logarithmic);

        let err = select_best(vec![CandidateFit {
            kind: CurveKind::Power,
            outcome: Err("diverged".to_string()),
        }])
        .unwrap_err();
        assert!(err.to_string().contains("power: diverged"), "{err}");
    }

    #[test]
    fn constant_response_is_dataset_error() {
        let data = ParameterCurveDataset::new(vec![0.0, 0.5, 1.0], vec![4.0, 4.0, 4.0]).unwrap();
        let err = fit(&data, CurveSelection::Auto, &FitOptions::default()).unwrap_err();
        assert_eq!(err, AnalysisError::Dataset(DatasetError::ConstantResponse));
    }

    #[test]
    fn exhausted_budget_is_fit_error() {
        let data = sample(CurveKind::Exponential, &[3.0, 2.0, 1.0], 11);
        let options = FitOptions { max_evaluations: 3 };
        let err = fit(&data, CurveSelection::Only(CurveKind::Exponential), &options).unwrap_err();
        match err {
            AnalysisError::Fit(fit_error) => {
                assert_eq!(fit_error.attempts.len(), 1);
                assert_eq!(fit_error.attempts[0].kind, CurveKind::Exponential);
            }
            other => panic!("expected fit error, got {other:?}"),
        }
    }

    #[test]
    fn r_squared_of_mean_is_zero() {
        let data = ParameterCurveDataset::new(vec![0.0, 1.0], vec![1.0, 3.0]).unwrap();
        let r2 = r_squared(&data, |_| 2.0, data.total_sum_of_squares());
        assert_eq!(r2, 0.0);
    }
}
