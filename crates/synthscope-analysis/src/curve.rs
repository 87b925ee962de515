//! Parametric curve families used to model parameter sweeps.
//!
//! Each family maps a normalized parameter value `x` in [0, 1] to a measured
//! quantity (cutoff in Hz, envelope time in seconds, LFO rate, ...):
//!
//! | kind        | form              | params  |
//! |-------------|-------------------|---------|
//! | linear      | `a·x + b`         | a, b    |
//! | exponential | `a·e^(b·x) + c`   | a, b, c |
//! | logarithmic | `a·ln(x + 1) + b` | a, b    |
//! | power       | `a·x^b + c`       | a, b, c |
//!
//! `power` is only defined for `x >= 0`, which the parameter domain guarantees.

use std::fmt;
use std::str::FromStr;

/// A curve family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveKind {
    /// `a·x + b`
    Linear,
    /// `a·e^(b·x) + c`
    Exponential,
    /// `a·ln(x + 1) + b`
    Logarithmic,
    /// `a·x^b + c`
    Power,
}

impl CurveKind {
    /// All families in evaluation order. Auto selection breaks R² ties in
    /// favour of the earlier entry.
    pub const ALL: [CurveKind; 4] = [
        CurveKind::Linear,
        CurveKind::Exponential,
        CurveKind::Logarithmic,
        CurveKind::Power,
    ];

    /// Lower-case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            CurveKind::Linear => "linear",
            CurveKind::Exponential => "exponential",
            CurveKind::Logarithmic => "logarithmic",
            CurveKind::Power => "power",
        }
    }

    /// Human-readable formula.
    pub fn formula(self) -> &'static str {
        match self {
            CurveKind::Linear => "a*x + b",
            CurveKind::Exponential => "a*exp(b*x) + c",
            CurveKind::Logarithmic => "a*ln(x + 1) + b",
            CurveKind::Power => "a*x^b + c",
        }
    }

    /// Number of coefficients the family takes.
    pub fn param_count(self) -> usize {
        match self {
            CurveKind::Linear | CurveKind::Logarithmic => 2,
            CurveKind::Exponential | CurveKind::Power => 3,
        }
    }

    /// Fixed starting point for the optimizer.
    pub fn initial_guess(self) -> &'static [f64] {
        match self {
            CurveKind::Linear => &[1.0, 0.0],
            CurveKind::Exponential => &[1.0, 1.0, 0.0],
            CurveKind::Logarithmic => &[1.0, 0.0],
            CurveKind::Power => &[1.0, 2.0, 0.0],
        }
    }

    /// Evaluate the family at `x` with the given coefficients.
    ///
    /// `params` must hold exactly [`param_count`](Self::param_count) values.
    pub fn evaluate(self, x: f64, params: &[f64]) -> f64 {
        debug_assert_eq!(params.len(), self.param_count());
        match self {
            CurveKind::Linear => params[0] * x + params[1],
            CurveKind::Exponential => params[0] * (params[1] * x).exp() + params[2],
            CurveKind::Logarithmic => params[0] * x.ln_1p() + params[1],
            CurveKind::Power => params[0] * x.powf(params[1]) + params[2],
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized curve family name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown curve type '{0}' (expected linear, exponential, logarithmic, power or auto)")]
pub struct ParseCurveError(pub String);

impl FromStr for CurveKind {
    type Err = ParseCurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "lin" => Ok(CurveKind::Linear),
            "exponential" | "exp" => Ok(CurveKind::Exponential),
            "logarithmic" | "log" => Ok(CurveKind::Logarithmic),
            "power" | "pow" => Ok(CurveKind::Power),
            _ => Err(ParseCurveError(s.to_string())),
        }
    }
}

/// Which families a fit should try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveSelection {
    /// Try every family and keep the best R².
    #[default]
    Auto,
    /// Fit a single family.
    Only(CurveKind),
}

impl CurveSelection {
    /// Candidate families in evaluation order.
    pub fn candidates(self) -> &'static [CurveKind] {
        match self {
            CurveSelection::Auto => &CurveKind::ALL,
            CurveSelection::Only(CurveKind::Linear) => &[CurveKind::Linear],
            CurveSelection::Only(CurveKind::Exponential) => &[CurveKind::Exponential],
            CurveSelection::Only(CurveKind::Logarithmic) => &[CurveKind::Logarithmic],
            CurveSelection::Only(CurveKind::Power) => &[CurveKind::Power],
        }
    }
}

impl fmt::Display for CurveSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveSelection::Auto => f.write_str("auto"),
            CurveSelection::Only(kind) => kind.fmt(f),
        }
    }
}

impl FromStr for CurveSelection {
    type Err = ParseCurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(CurveSelection::Auto)
        } else {
            s.parse().map(CurveSelection::Only)
        }
    }
}

/// A fitted curve: the family together with its coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveModel {
    /// `a·x + b`
    Linear {
        /// Slope.
        a: f64,
        /// Intercept.
        b: f64,
    },
    /// `a·e^(b·x) + c`
    Exponential {
        /// Scale.
        a: f64,
        /// Growth rate.
        b: f64,
        /// Offset.
        c: f64,
    },
    /// `a·ln(x + 1) + b`
    Logarithmic {
        /// Scale.
        a: f64,
        /// Offset.
        b: f64,
    },
    /// `a·x^b + c`
    Power {
        /// Scale.
        a: f64,
        /// Exponent.
        b: f64,
        /// Offset.
        c: f64,
    },
}

impl CurveModel {
    /// Assemble a model from an ordered coefficient slice.
    ///
    /// Returns `None` when the slice length does not match the family.
    pub fn from_params(kind: CurveKind, params: &[f64]) -> Option<Self> {
        match (kind, params) {
            (CurveKind::Linear, &[a, b]) => Some(CurveModel::Linear { a, b }),
            (CurveKind::Exponential, &[a, b, c]) => Some(CurveModel::Exponential { a, b, c }),
            (CurveKind::Logarithmic, &[a, b]) => Some(CurveModel::Logarithmic { a, b }),
            (CurveKind::Power, &[a, b, c]) => Some(CurveModel::Power { a, b, c }),
            _ => None,
        }
    }

    /// The family of this model.
    pub fn kind(&self) -> CurveKind {
        match self {
            CurveModel::Linear { .. } => CurveKind::Linear,
            CurveModel::Exponential { .. } => CurveKind::Exponential,
            CurveModel::Logarithmic { .. } => CurveKind::Logarithmic,
            CurveModel::Power { .. } => CurveKind::Power,
        }
    }

    /// Coefficients in `a, b[, c]` order.
    pub fn coefficients(&self) -> Vec<f64> {
        match *self {
            CurveModel::Linear { a, b } | CurveModel::Logarithmic { a, b } => vec![a, b],
            CurveModel::Exponential { a, b, c } | CurveModel::Power { a, b, c } => vec![a, b, c],
        }
    }

    /// Evaluate the model at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        match *self {
            CurveModel::Linear { a, b } => a * x + b,
            CurveModel::Exponential { a, b, c } => a * (b * x).exp() + c,
            CurveModel::Logarithmic { a, b } => a * x.ln_1p() + b,
            CurveModel::Power { a, b, c } => a * x.powf(b) + c,
        }
    }
}

impl fmt::Display for CurveModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            CurveModel::Linear { a, b } => write!(f, "{a:.6}*x + {b:.6}"),
            CurveModel::Exponential { a, b, c } => write!(f, "{a:.6}*exp({b:.6}*x) + {c:.6}"),
            CurveModel::Logarithmic { a, b } => write!(f, "{a:.6}*ln(x + 1) + {b:.6}"),
            CurveModel::Power { a, b, c } => write!(f, "{a:.6}*x^{b:.6} + {c:.6}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_family_is_finite_on_unit_interval() {
        for kind in CurveKind::ALL {
            let params = kind.initial_guess();
            assert_eq!(params.len(), kind.param_count());
            for i in 0..=10 {
                let x = f64::from(i) / 10.0;
                let y = kind.evaluate(x, params);
                assert!(y.is_finite(), "{kind} at x={x} gave {y}");
            }
        }
    }

    #[test]
    fn kind_and_model_evaluate_identically() {
        let params = [2.0, 0.7, -1.0];
        for kind in [CurveKind::Exponential, CurveKind::Power] {
            let model = CurveModel::from_params(kind, &params).unwrap();
            assert_eq!(model.kind(), kind);
            assert_eq!(model.coefficients(), params.to_vec());
            for x in [0.0, 0.3, 1.0] {
                assert_eq!(model.evaluate(x), kind.evaluate(x, &params));
            }
        }
    }

    #[test]
    fn known_values() {
        assert_eq!(CurveKind::Linear.evaluate(0.5, &[4.0, 1.0]), 3.0);
        assert_eq!(CurveKind::Exponential.evaluate(0.0, &[2.0, 5.0, 1.0]), 3.0);
        let log = CurveKind::Logarithmic.evaluate(std::f64::consts::E - 1.0, &[3.0, 1.0]);
        assert!((log - 4.0).abs() < 1e-12);
        assert_eq!(CurveKind::Power.evaluate(0.0, &[5.0, 2.0, 1.0]), 1.0);
        assert_eq!(CurveKind::Power.evaluate(0.5, &[4.0, 2.0, 0.0]), 1.0);
    }

    #[test]
    fn from_params_rejects_wrong_arity() {
        assert!(CurveModel::from_params(CurveKind::Linear, &[1.0, 2.0, 3.0]).is_none());
        assert!(CurveModel::from_params(CurveKind::Power, &[1.0]).is_none());
    }

    #[test]
    fn parse_names() {
        assert_eq!("Exponential".parse::<CurveKind>(), Ok(CurveKind::Exponential));
        assert_eq!("log".parse::<CurveKind>(), Ok(CurveKind::Logarithmic));
        assert!("cubic".parse::<CurveKind>().is_err());
        assert_eq!("auto".parse::<CurveSelection>(), Ok(CurveSelection::Auto));
        assert_eq!(
            "power".parse::<CurveSelection>(),
            Ok(CurveSelection::Only(CurveKind::Power))
        );
    }

    #[test]
    fn selection_candidates_keep_evaluation_order() {
        assert_eq!(CurveSelection::Auto.candidates(), &CurveKind::ALL);
        assert_eq!(
            CurveSelection::Only(CurveKind::Logarithmic).candidates(),
            &[CurveKind::Logarithmic]
        );
    }
}
