//! Configuration type definitions for windock.
//!
//! Every setting is optional in the file; the accessor methods in
//! [`super::defaults`] supply the built-in value when a key is absent.
//!
//! # Example Configuration
//!
//! ```toml
//! [geometry]
//! min_width = 40
//! min_height = 40
//!
//! [accessibility]
//! include_transient = false
//! messaging_timeout_secs = 1.0
//!
//! [matching]
//! iou_threshold = 0.8
//!
//! [display]
//! min_overlap_percent = 20.0
//! min_overlap_px = 4096.0
//! default_display_id = 1
//!
//! [cache]
//! enabled = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration loaded from TOML config files.
///
/// Loaded from:
/// 1. User config: `~/.windock/config.toml`
/// 2. Project config: `./.windock/config.toml`
///
/// Project config values override user config values.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WindockConfig {
    #[serde(default)]
    pub geometry: GeometryConfig,

    #[serde(default)]
    pub accessibility: AccessibilityConfig,

    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// Window-server collector filters.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GeometryConfig {
    /// Windows narrower than this are ignored. Default: 40 points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,

    /// Windows shorter than this are ignored. Default: 40 points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f64>,
}

/// Accessibility collector settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AccessibilityConfig {
    /// Keep sheets, floating panels and other non-standard subroles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_transient: Option<bool>,

    /// Per-application AX messaging timeout. Default: 1.0 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_timeout_secs: Option<f32>,
}

/// Cross-source matching heuristics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MatchingConfig {
    /// Minimum intersection-over-union for two frames to describe the
    /// same window. Default: 0.8.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iou_threshold: Option<f64>,
}

/// Display assignment thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    /// Share of the window's own area a display must cover. Default: 20%.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_overlap_percent: Option<f64>,

    /// Absolute overlap floor in square points. Default: 4096.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_overlap_px: Option<f64>,

    /// Display used when no primary display is reported. Default: 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_display_id: Option<u32>,
}

/// Affinity cache persistence.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CacheConfig {
    /// Read and write the persisted cache. Default: true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Cache file location. Default: `~/.windock/affinity.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}
