//! Profile validation.
//!
//! Every numeric setting has an allowed range. [`validate_profile`] checks
//! them all and reports every problem at once.
//!
//! # Example
//!
//! ```rust
//! use synthscope_config::{MeasurementConfig, validate_profile};
//!
//! let mut config = MeasurementConfig::default();
//! assert!(validate_profile(&config).is_ok());
//!
//! config.chorus.rate_search_hz = [2.0, 0.1];
//! assert!(validate_profile(&config).is_err());
//! ```

use thiserror::Error;

use crate::profile::{MeasurementConfig, ModeExpectation};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Value out of range.
    #[error("'{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Dotted path of the setting.
        field: String,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// A frequency band whose bounds are not ordered.
    #[error("'{field}' band [{low}, {high}] must satisfy 0 <= low <= high")]
    InvalidBand {
        /// Dotted path of the setting.
        field: String,
        /// Lower bound in Hz.
        low: f64,
        /// Upper bound in Hz.
        high: f64,
    },

    /// A string setting that does not parse.
    #[error("invalid format for '{field}': {reason}")]
    InvalidFormat {
        /// Dotted path of the setting.
        field: String,
        /// Description of the format error.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn check_range(errors: &mut Vec<ValidationError>, field: &str, value: f64, min: f64, max: f64) {
    if !(value.is_finite() && (min..=max).contains(&value)) {
        errors.push(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        });
    }
}

fn check_mode(errors: &mut Vec<ValidationError>, section: &str, mode: &ModeExpectation) {
    check_range(
        errors,
        &format!("{section}.delay_ms"),
        mode.delay_ms,
        0.0,
        100.0,
    );
    check_range(
        errors,
        &format!("{section}.depth_ms"),
        mode.depth_ms,
        0.0,
        100.0,
    );
    check_range(errors, &format!("{section}.rate_hz"), mode.rate_hz, 0.0, 100.0);
}

/// Validate a whole profile.
pub fn validate_profile(config: &MeasurementConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if let Err(e) = config.curve_selection() {
        errors.push(e);
    }
    if config.fit.max_evaluations == 0 {
        errors.push(ValidationError::OutOfRange {
            field: "fit.max_evaluations".to_string(),
            value: 0.0,
            min: 1.0,
            max: f64::INFINITY,
        });
    }

    check_range(
        &mut errors,
        "filter.cutoff_db",
        config.filter.cutoff_db,
        -120.0,
        0.0,
    );

    if config.chorus.max_delay_samples == 0 {
        errors.push(ValidationError::OutOfRange {
            field: "chorus.max_delay_samples".to_string(),
            value: 0.0,
            min: 1.0,
            max: f64::INFINITY,
        });
    }

    let [low, high] = config.chorus.rate_search_hz;
    if !(low.is_finite() && high.is_finite() && low >= 0.0 && low <= high) {
        errors.push(ValidationError::InvalidBand {
            field: "chorus.rate_search_hz".to_string(),
            low,
            high,
        });
    }

    check_mode(&mut errors, "chorus.mode_i", &config.chorus.mode_i);
    check_mode(&mut errors, "chorus.mode_ii", &config.chorus.mode_ii);

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        assert!(validate_profile(&MeasurementConfig::default()).is_ok());
    }

    #[test]
    fn test_single_error_is_not_wrapped() {
        let mut config = MeasurementConfig::default();
        config.filter.cutoff_db = 3.0;

        match validate_profile(&config) {
            Err(ValidationError::OutOfRange { field, value, .. }) => {
                assert_eq!(field, "filter.cutoff_db");
                assert_eq!(value, 3.0);
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_inverted_band() {
        let mut config = MeasurementConfig::default();
        config.chorus.rate_search_hz = [2.0, 1.0];
        assert!(matches!(
            validate_profile(&config),
            Err(ValidationError::InvalidBand { .. })
        ));
    }

    #[test]
    fn test_single_frequency_band_is_valid() {
        let mut config = MeasurementConfig::default();
        config.chorus.rate_search_hz = [0.5, 0.5];
        assert!(validate_profile(&config).is_ok());
        assert_eq!(config.modulation_settings().search_range_hz, (0.5, 0.5));
    }

    #[test]
    fn test_nan_is_out_of_range() {
        let mut config = MeasurementConfig::default();
        config.chorus.mode_i.rate_hz = f64::NAN;
        let err = validate_profile(&config).unwrap_err();
        assert!(err.to_string().contains("chorus.mode_i.rate_hz"), "{err}");
    }

    #[test]
    fn test_multiple_errors_collected() {
        let mut config = MeasurementConfig::default();
        config.fit.curve = "spline".to_string();
        config.fit.max_evaluations = 0;
        config.chorus.max_delay_samples = 0;

        match validate_profile(&config) {
            Err(ValidationError::Multiple(errors)) => {
                assert_eq!(errors.len(), 3);
                let msg = ValidationError::Multiple(errors).to_string();
                assert!(msg.contains("fit.curve"));
                assert!(msg.contains("fit.max_evaluations"));
                assert!(msg.contains("chorus.max_delay_samples"));
            }
            other => panic!("expected Multiple, got {other:?}"),
        }
    }
}
