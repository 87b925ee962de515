//! Platform-specific location of the user's measurement profile.
//!
//! - Linux: `~/.config/synthscope/`
//! - macOS: `~/Library/Application Support/synthscope/`
//! - Windows: `%APPDATA%\synthscope\`

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::profile::MeasurementConfig;

/// Application name used for directory paths.
const APP_NAME: &str = "synthscope";

/// File name of the default profile inside [`user_config_dir`].
pub const PROFILE_FILE_NAME: &str = "profile.toml";

/// Returns the user-specific configuration directory.
///
/// Falls back to the current directory if the platform directory cannot be
/// determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the user's default profile (which may not exist).
pub fn default_profile_path() -> PathBuf {
    user_config_dir().join(PROFILE_FILE_NAME)
}

/// Resolve the profile to use.
///
/// An explicit path must exist and be valid. Without one, the user's default
/// profile is loaded if present, otherwise the built-in defaults are used.
pub fn resolve_profile(explicit: Option<&Path>) -> Result<MeasurementConfig, ConfigError> {
    if let Some(path) = explicit {
        return MeasurementConfig::load(path);
    }
    load_or_default(&default_profile_path())
}

/// Load `path` if it exists, otherwise return the default profile.
pub fn load_or_default(path: &Path) -> Result<MeasurementConfig, ConfigError> {
    if path.is_file() {
        MeasurementConfig::load(path)
    } else {
        tracing::debug!(path = %path.display(), "no profile found, using defaults");
        Ok(MeasurementConfig::default())
    }
}
