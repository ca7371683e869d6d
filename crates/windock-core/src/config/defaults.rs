//! Default values for configuration settings.
//!
//! Each config section exposes accessor methods that fall back to the
//! constants below when the key is absent from every config file.

use std::path::PathBuf;

use crate::config::types::{
    AccessibilityConfig, CacheConfig, DisplayConfig, GeometryConfig, MatchingConfig,
};

pub const DEFAULT_MIN_WINDOW_WIDTH: f64 = 40.0;
pub const DEFAULT_MIN_WINDOW_HEIGHT: f64 = 40.0;
pub const DEFAULT_AX_MESSAGING_TIMEOUT_SECS: f32 = 1.0;
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.8;
pub const DEFAULT_MIN_OVERLAP_PERCENT: f64 = 20.0;
/// 64x64 points.
pub const DEFAULT_MIN_OVERLAP_PX: f64 = 4096.0;
pub const DEFAULT_DISPLAY_ID: u32 = 1;

impl GeometryConfig {
    pub fn min_width(&self) -> f64 {
        self.min_width.unwrap_or(DEFAULT_MIN_WINDOW_WIDTH)
    }

    pub fn min_height(&self) -> f64 {
        self.min_height.unwrap_or(DEFAULT_MIN_WINDOW_HEIGHT)
    }
}

impl AccessibilityConfig {
    pub fn include_transient(&self) -> bool {
        self.include_transient.unwrap_or(false)
    }

    pub fn messaging_timeout_secs(&self) -> f32 {
        self.messaging_timeout_secs
            .unwrap_or(DEFAULT_AX_MESSAGING_TIMEOUT_SECS)
    }
}

impl MatchingConfig {
    pub fn iou_threshold(&self) -> f64 {
        self.iou_threshold.unwrap_or(DEFAULT_IOU_THRESHOLD)
    }
}

impl DisplayConfig {
    pub fn min_overlap_percent(&self) -> f64 {
        self.min_overlap_percent
            .unwrap_or(DEFAULT_MIN_OVERLAP_PERCENT)
    }

    pub fn min_overlap_px(&self) -> f64 {
        self.min_overlap_px.unwrap_or(DEFAULT_MIN_OVERLAP_PX)
    }

    pub fn default_display_id(&self) -> u32 {
        self.default_display_id.unwrap_or(DEFAULT_DISPLAY_ID)
    }
}

impl CacheConfig {
    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Configured cache path, if any. The store applies the env override and
    /// the home-directory default.
    pub fn path(&self) -> Option<PathBuf> {
        self.path.clone()
    }
}
