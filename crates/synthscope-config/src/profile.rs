//! Measurement profile file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;
use synthscope_analysis::{
    ChorusExpectation, ChorusMode, CurveSelection, FitOptions, ModulationSettings,
};

use crate::error::ConfigError;
use crate::validation::{ValidationError, validate_profile};

/// Tunable settings for every measurement.
///
/// Every field has a default, so a profile file only needs to list what it
/// changes. An empty file is the default profile.
///
/// # TOML Format
///
/// ```toml
/// name = "Juno bench"
/// description = "Slow sweeps, long chorus captures"
///
/// [fit]
/// curve = "auto"
/// max_evaluations = 10000
///
/// [filter]
/// cutoff_db = -3.0
///
/// [chorus]
/// max_delay_samples = 1000
/// rate_search_hz = [0.1, 2.0]
///
/// [chorus.mode_i]
/// delay_ms = 2.5
/// depth_ms = 0.5
/// rate_hz = 0.65
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasurementConfig {
    /// Name of the profile.
    #[serde(default = "default_name")]
    pub name: String,

    /// Optional description of the profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Curve fitting.
    #[serde(default)]
    pub fit: FitConfig,

    /// Frequency-response features.
    #[serde(default)]
    pub filter: FilterConfig,

    /// Chorus and stereo analysis.
    #[serde(default)]
    pub chorus: ChorusConfig,
}

fn default_name() -> String {
    "default".to_string()
}

/// `[fit]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FitConfig {
    /// `auto` or one of `linear`, `exponential`, `logarithmic`, `power`.
    #[serde(default = "default_curve")]
    pub curve: String,

    /// Residual evaluations allowed per candidate.
    #[serde(default = "default_max_evaluations")]
    pub max_evaluations: usize,
}

fn default_curve() -> String {
    CurveSelection::Auto.to_string()
}

fn default_max_evaluations() -> usize {
    FitOptions::default().max_evaluations
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            curve: default_curve(),
            max_evaluations: default_max_evaluations(),
        }
    }
}

/// `[filter]` section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FilterConfig {
    /// Drop below the passband that marks the cutoff, in dB.
    #[serde(default = "default_cutoff_db")]
    pub cutoff_db: f64,
}

fn default_cutoff_db() -> f64 {
    synthscope_analysis::response::DEFAULT_CUTOFF_DB
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            cutoff_db: default_cutoff_db(),
        }
    }
}

/// `[chorus]` section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChorusConfig {
    /// Largest delay searched, in samples.
    #[serde(default = "default_max_delay_samples")]
    pub max_delay_samples: usize,

    /// Band searched for the LFO line, in Hz.
    #[serde(default = "default_rate_search_hz")]
    pub rate_search_hz: [f64; 2],

    /// Reference values for Mode I.
    #[serde(default = "default_mode_i")]
    pub mode_i: ModeExpectation,

    /// Reference values for Mode II.
    #[serde(default = "default_mode_ii")]
    pub mode_ii: ModeExpectation,
}

fn default_max_delay_samples() -> usize {
    ModulationSettings::default().max_delay_samples
}

fn default_rate_search_hz() -> [f64; 2] {
    let (low, high) = ModulationSettings::default().search_range_hz;
    [low, high]
}

fn default_mode_i() -> ModeExpectation {
    ChorusExpectation::MODE_I.into()
}

fn default_mode_ii() -> ModeExpectation {
    ChorusExpectation::MODE_II.into()
}

impl Default for ChorusConfig {
    fn default() -> Self {
        Self {
            max_delay_samples: default_max_delay_samples(),
            rate_search_hz: default_rate_search_hz(),
            mode_i: default_mode_i(),
            mode_ii: default_mode_ii(),
        }
    }
}

/// Expected delay, depth and rate of one chorus mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ModeExpectation {
    /// Center delay in ms.
    pub delay_ms: f64,
    /// Modulation depth in ms.
    pub depth_ms: f64,
    /// LFO rate in Hz.
    pub rate_hz: f64,
}

impl From<ChorusExpectation> for ModeExpectation {
    fn from(e: ChorusExpectation) -> Self {
        Self {
            delay_ms: e.delay_ms,
            depth_ms: e.depth_ms,
            rate_hz: e.rate_hz,
        }
    }
}

impl From<ModeExpectation> for ChorusExpectation {
    fn from(e: ModeExpectation) -> Self {
        Self {
            delay_ms: e.delay_ms,
            depth_ms: e.depth_ms,
            rate_hz: e.rate_hz,
        }
    }
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self::new(default_name())
    }
}

impl MeasurementConfig {
    /// Create a profile with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fit: FitConfig::default(),
            filter: FilterConfig::default(),
            chorus: ChorusConfig::default(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Load and validate a profile from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), name = %config.name, "loaded profile");
        Ok(config)
    }

    /// Parse and validate a profile from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: MeasurementConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the profile to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the profile to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value against its allowed range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_profile(self)
    }

    /// Curve families to try.
    pub fn curve_selection(&self) -> Result<CurveSelection, ValidationError> {
        self.fit
            .curve
            .parse()
            .map_err(|e: synthscope_analysis::ParseCurveError| ValidationError::InvalidFormat {
                field: "fit.curve".to_string(),
                reason: e.to_string(),
            })
    }

    /// Optimizer budget for [`synthscope_analysis::fit`].
    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            max_evaluations: self.fit.max_evaluations,
        }
    }

    /// Search limits for the chorus analysis.
    pub fn modulation_settings(&self) -> ModulationSettings {
        let [low, high] = self.chorus.rate_search_hz;
        ModulationSettings {
            max_delay_samples: self.chorus.max_delay_samples,
            search_range_hz: (low, high),
        }
    }

    /// Reference values for a chorus mode, as configured. The combined
    /// mode has none.
    pub fn expectation(&self, mode: ChorusMode) -> Option<ChorusExpectation> {
        match mode {
            ChorusMode::One => Some(self.chorus.mode_i.into()),
            ChorusMode::Two => Some(self.chorus.mode_ii.into()),
            ChorusMode::Both => None,
        }
    }
}
