//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.windock/config.toml`
//! 3. **Project config** - `./.windock/config.toml`
//! 4. **CLI arguments** - Command-line flags (highest priority)

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::types::{
    AccessibilityConfig, CacheConfig, DisplayConfig, GeometryConfig, MatchingConfig,
    WindockConfig,
};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed,
/// or if the merged configuration fails validation. Missing files are not
/// errors.
pub fn load_hierarchy() -> Result<WindockConfig, ConfigError> {
    let mut config = WindockConfig::default();

    if let Some(path) = user_config_path()
        && let Some(user_config) = load_config_file(&path)?
    {
        config = merge_configs(config, user_config);
    }

    if let Some(path) = project_config_path()
        && let Some(project_config) = load_config_file(&path)?
    {
        config = merge_configs(config, project_config);
    }

    validate_config(&config)?;

    tracing::debug!(event = "core.config.load_completed", config = ?config);

    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".windock").join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(".windock").join("config.toml"))
}

/// Load a configuration file. A missing file yields `Ok(None)`.
pub fn load_config_file(path: &Path) -> Result<Option<WindockConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            tracing::warn!(
                event = "core.config.read_failed",
                path = %path.display(),
                error = %e
            );
            return Err(ConfigError::IoError { source: e });
        }
    };

    let config = toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    tracing::info!(event = "core.config.file_loaded", path = %path.display());

    Ok(Some(config))
}

/// Merge two configurations, with `override_config` taking precedence
/// wherever it sets a value.
pub fn merge_configs(base: WindockConfig, override_config: WindockConfig) -> WindockConfig {
    WindockConfig {
        geometry: GeometryConfig {
            min_width: override_config.geometry.min_width.or(base.geometry.min_width),
            min_height: override_config
                .geometry
                .min_height
                .or(base.geometry.min_height),
        },
        accessibility: AccessibilityConfig {
            include_transient: override_config
                .accessibility
                .include_transient
                .or(base.accessibility.include_transient),
            messaging_timeout_secs: override_config
                .accessibility
                .messaging_timeout_secs
                .or(base.accessibility.messaging_timeout_secs),
        },
        matching: MatchingConfig {
            iou_threshold: override_config
                .matching
                .iou_threshold
                .or(base.matching.iou_threshold),
        },
        display: DisplayConfig {
            min_overlap_percent: override_config
                .display
                .min_overlap_percent
                .or(base.display.min_overlap_percent),
            min_overlap_px: override_config
                .display
                .min_overlap_px
                .or(base.display.min_overlap_px),
            default_display_id: override_config
                .display
                .default_display_id
                .or(base.display.default_display_id),
        },
        cache: CacheConfig {
            enabled: override_config.cache.enabled.or(base.cache.enabled),
            path: override_config.cache.path.or(base.cache.path),
        },
    }
}
