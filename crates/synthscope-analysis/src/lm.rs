//! Levenberg–Marquardt nonlinear least squares.
//!
//! Minimizes `Σ r_i(p)²` for a residual function `r: ℝⁿ → ℝᵐ` starting from
//! a fixed guess. Each iteration builds a forward-difference Jacobian `J`,
//! then solves the damped normal equations
//!
//! ```text
//! (JᵀJ + λ·diag(JᵀJ)) δ = −Jᵀr
//! ```
//!
//! accepting `p + δ` only when it lowers the cost. λ shrinks tenfold after an
//! accepted step and grows tenfold after a rejected one, moving between
//! Gauss–Newton and scaled gradient descent.
//!
//! Termination mirrors MINPACK's `lmdif` tests:
//!
//! - relative cost reduction of an accepted step `<= ftol`
//! - step length `<= xtol · (‖p‖ + xtol)`
//! - cosine between `r` and any Jacobian column `<= gtol`
//!
//! Every residual evaluation (including those spent on the Jacobian) counts
//! against `max_evaluations`; running out is a failure, not a converged
//! result.
//!
//! Reference: Moré, "The Levenberg-Marquardt algorithm: implementation and
//! theory", Lecture Notes in Mathematics 630 (1978).

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

/// `sqrt(f64::EPSILON)`, the relative step used for finite differences.
const SQRT_EPSILON: f64 = 1.490_116_119_384_765_6e-8;

/// λ above which the solver gives up on finding a descent step.
const MAX_DAMPING: f64 = 1e32;

/// Solver settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LmOptions {
    /// Residual evaluations allowed before giving up.
    pub max_evaluations: usize,
    /// Relative cost-reduction tolerance.
    pub ftol: f64,
    /// Relative step-length tolerance.
    pub xtol: f64,
    /// Orthogonality tolerance between residuals and Jacobian columns (0 disables).
    pub gtol: f64,
    /// Starting damping factor λ.
    pub initial_damping: f64,
}

impl Default for LmOptions {
    fn default() -> Self {
        Self {
            max_evaluations: 10_000,
            ftol: SQRT_EPSILON,
            xtol: SQRT_EPSILON,
            gtol: 0.0,
            initial_damping: 1e-3,
        }
    }
}

/// Which test stopped the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Residuals are exactly zero.
    ZeroResidual,
    /// Relative cost reduction fell below `ftol`.
    CostTolerance,
    /// Step length fell below `xtol`.
    StepTolerance,
    /// Residuals are orthogonal to the Jacobian within `gtol`.
    GradientTolerance,
}

/// Successful minimization.
#[derive(Debug, Clone, PartialEq)]
pub struct LmReport {
    /// Parameters at the minimum.
    pub params: Vec<f64>,
    /// Sum of squared residuals at `params`.
    pub cost: f64,
    /// Residual evaluations spent.
    pub evaluations: usize,
    /// Accepted steps taken.
    pub iterations: usize,
    /// Convergence test that fired.
    pub termination: Termination,
}

/// Failure to converge.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LmError {
    /// Nothing to fit.
    #[error("need at least one parameter and one residual (got {params} and {residuals})")]
    EmptyProblem {
        /// Parameter count.
        params: usize,
        /// Residual count.
        residuals: usize,
    },

    /// The starting point already produces NaN or infinite residuals.
    #[error("residuals are not finite at the initial guess")]
    NonFiniteStart,

    /// The Jacobian could not be evaluated.
    #[error("jacobian has non-finite entries at iteration {iteration}")]
    NonFiniteJacobian {
        /// Accepted steps taken before the failure.
        iteration: usize,
    },

    /// The evaluation budget ran out before any tolerance was met.
    #[error("evaluation budget of {budget} exhausted before convergence")]
    MaxEvaluations {
        /// The budget that was exhausted.
        budget: usize,
    },

    /// Damping grew without finding a step that lowers the cost.
    #[error("no descent step found before damping diverged")]
    Stalled,
}

/// Minimize the sum of squares of `residuals`.
///
/// `residuals(p, out)` must write `n_residuals` values into `out`. Non-finite
/// residuals at a trial point reject that step.
pub fn minimize<F>(
    mut residuals: F,
    initial: &[f64],
    n_residuals: usize,
    options: &LmOptions,
) -> Result<LmReport, LmError>
where
    F: FnMut(&[f64], &mut [f64]),
{
    let n = initial.len();
    let m = n_residuals;
    if n == 0 || m == 0 {
        return Err(LmError::EmptyProblem {
            params: n,
            residuals: m,
        });
    }

    let mut p = DVector::from_column_slice(initial);
    let mut r = DVector::zeros(m);
    residuals(p.as_slice(), r.as_mut_slice());
    let mut evaluations = 1;
    let mut cost = r.norm_squared();
    if !cost.is_finite() {
        return Err(LmError::NonFiniteStart);
    }

    let mut lambda = options.initial_damping;
    let mut iterations = 0;
    let mut jacobian = DMatrix::zeros(m, n);
    let mut trial = DVector::zeros(m);

    let report = |p: &DVector<f64>,
                  cost: f64,
                  evaluations: usize,
                  iterations: usize,
                  termination: Termination| LmReport {
        params: p.as_slice().to_vec(),
        cost,
        evaluations,
        iterations,
        termination,
    };

    loop {
        if cost == 0.0 {
            return Ok(report(&p, cost, evaluations, iterations, Termination::ZeroResidual));
        }
        if evaluations + n > options.max_evaluations {
            return Err(LmError::MaxEvaluations {
                budget: options.max_evaluations,
            });
        }

        // Forward-difference Jacobian
        for j in 0..n {
            let step = if p[j] == 0.0 {
                SQRT_EPSILON
            } else {
                SQRT_EPSILON * p[j].abs()
            };
            let mut shifted = p.clone();
            shifted[j] += step;
            residuals(shifted.as_slice(), trial.as_mut_slice());
            evaluations += 1;
            let column = (&trial - &r) / step;
            if column.iter().any(|v| !v.is_finite()) {
                return Err(LmError::NonFiniteJacobian {
                    iteration: iterations,
                });
            }
            jacobian.set_column(j, &column);
        }

        let normal = jacobian.tr_mul(&jacobian);
        let gradient = jacobian.tr_mul(&r);

        if options.gtol > 0.0 && gradient_cosine(&jacobian, &gradient, r.norm()) <= options.gtol {
            return Ok(report(
                &p,
                cost,
                evaluations,
                iterations,
                Termination::GradientTolerance,
            ));
        }

        let scale: Vec<f64> = (0..n)
            .map(|i| if normal[(i, i)] > 0.0 { normal[(i, i)] } else { 1.0 })
            .collect();
        let rhs = -&gradient;

        // Inner loop: raise damping until a step lowers the cost
        loop {
            let mut damped = normal.clone();
            for i in 0..n {
                damped[(i, i)] += lambda * scale[i];
            }

            let Some(delta) = solve_damped(damped, &rhs) else {
                lambda *= 10.0;
                if lambda > MAX_DAMPING {
                    return Err(LmError::Stalled);
                }
                continue;
            };

            if delta.norm() <= options.xtol * (p.norm() + options.xtol) {
                return Ok(report(&p, cost, evaluations, iterations, Termination::StepTolerance));
            }
            if evaluations >= options.max_evaluations {
                return Err(LmError::MaxEvaluations {
                    budget: options.max_evaluations,
                });
            }

            let candidate = &p + &delta;
            residuals(candidate.as_slice(), trial.as_mut_slice());
            evaluations += 1;
            let candidate_cost = trial.norm_squared();

            if candidate_cost.is_finite() && candidate_cost < cost {
                let reduction = (cost - candidate_cost) / cost;
                p = candidate;
                r.copy_from(&trial);
                cost = candidate_cost;
                lambda = (lambda / 10.0).max(1e-15);
                iterations += 1;
                tracing::trace!(iterations, cost, lambda, "lm step accepted");

                if reduction <= options.ftol {
                    return Ok(report(
                        &p,
                        cost,
                        evaluations,
                        iterations,
                        Termination::CostTolerance,
                    ));
                }
                break;
            }

            lambda *= 10.0;
            if lambda > MAX_DAMPING {
                return Err(LmError::Stalled);
            }
        }
    }
}

/// Solve the damped system, preferring Cholesky and falling back to SVD.
fn solve_damped(matrix: DMatrix<f64>, rhs: &DVector<f64>) -> Option<DVector<f64>> {
    if let Some(cholesky) = matrix.clone().cholesky() {
        let delta = cholesky.solve(rhs);
        if delta.iter().all(|v| v.is_finite()) {
            return Some(delta);
        }
    }

    let svd = matrix.svd(true, true);
    svd.solve(rhs, 1e-12)
        .ok()
        .filter(|delta| delta.iter().all(|v| v.is_finite()))
}

/// Largest |cos| between the residual vector and any Jacobian column.
fn gradient_cosine(jacobian: &DMatrix<f64>, gradient: &DVector<f64>, residual_norm: f64) -> f64 {
    if residual_norm == 0.0 {
        return 0.0;
    }
    jacobian
        .column_iter()
        .zip(gradient.iter())
        .map(|(column, g)| {
            let norm = column.norm();
            if norm > 0.0 {
                g.abs() / (norm * residual_norm)
            } else {
                0.0
            }
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_linear_problem() {
        // y = 2 + 3x on x = [0, 1, 2]
        let xs = [0.0, 1.0, 2.0];
        let ys = [2.0, 5.0, 8.0];
        let report = minimize(
            |p, out| {
                for (i, (x, y)) in xs.iter().zip(&ys).enumerate() {
                    out[i] = p[0] + p[1] * x - y;
                }
            },
            &[0.0, 0.0],
            3,
            &LmOptions::default(),
        )
        .unwrap();

        assert!((report.params[0] - 2.0).abs() < 1e-6, "{:?}", report);
        assert!((report.params[1] - 3.0).abs() < 1e-6, "{:?}", report);
        assert!(report.cost < 1e-12);
    }

    #[test]
    fn rosenbrock_converges() {
        let report = minimize(
            |p, out| {
                out[0] = 10.0 * (p[1] - p[0] * p[0]);
                out[1] = 1.0 - p[0];
            },
            &[-1.2, 1.0],
            2,
            &LmOptions::default(),
        )
        .unwrap();

        assert!((report.params[0] - 1.0).abs() < 1e-4, "{:?}", report);
        assert!((report.params[1] - 1.0).abs() < 1e-4, "{:?}", report);
    }

    #[test]
    fn budget_exhaustion_is_an_error() {
        let options = LmOptions {
            max_evaluations: 4,
            ..LmOptions::default()
        };
        let err = minimize(
            |p, out| {
                out[0] = 10.0 * (p[1] - p[0] * p[0]);
                out[1] = 1.0 - p[0];
            },
            &[-1.2, 1.0],
            2,
            &options,
        )
        .unwrap_err();
        assert_eq!(err, LmError::MaxEvaluations { budget: 4 });
    }

    #[test]
    fn non_finite_start_is_rejected() {
        let err = minimize(
            |_, out| out[0] = f64::NAN,
            &[1.0],
            1,
            &LmOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, LmError::NonFiniteStart);
    }

    #[test]
    fn empty_problem_is_rejected() {
        let err = minimize(|_, _| {}, &[], 3, &LmOptions::default()).unwrap_err();
        assert!(matches!(err, LmError::EmptyProblem { params: 0, residuals: 3 }));
    }

    #[test]
    fn zero_residual_stops_immediately() {
        let report = minimize(|p, out| out[0] = p[0] - 1.0, &[1.0], 1, &LmOptions::default())
            .unwrap();
        assert_eq!(report.termination, Termination::ZeroResidual);
        assert_eq!(report.evaluations, 1);
    }
}
