use serde::Serialize;

use crate::config::DisplayConfig;
use crate::config::defaults::{
    DEFAULT_DISPLAY_ID, DEFAULT_MIN_OVERLAP_PERCENT, DEFAULT_MIN_OVERLAP_PX,
};
use crate::geometry::Rect;

/// One connected physical display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayInfo {
    id: u32,
    name: String,
    /// Region windows can occupy, in window-server coordinates.
    visible: Rect,
    is_primary: bool,
}

impl DisplayInfo {
    pub fn new(id: u32, name: impl Into<String>, visible: Rect, is_primary: bool) -> Self {
        Self {
            id,
            name: name.into(),
            visible,
            is_primary,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn visible(&self) -> Rect {
        self.visible
    }
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }
}

/// Displays connected at snapshot time, in enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayLayout {
    pub displays: Vec<DisplayInfo>,
    pub primary: Option<u32>,
}

impl DisplayLayout {
    /// Layout whose primary is the first display flagged primary.
    pub fn new(displays: Vec<DisplayInfo>) -> Self {
        let primary = displays.iter().find(|d| d.is_primary()).map(|d| d.id());
        Self { displays, primary }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.displays.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&DisplayInfo> {
        self.displays.iter().find(|d| d.id() == id)
    }

    /// The primary display, or `default_id` when none is known.
    pub fn primary_or(&self, default_id: u32) -> u32 {
        self.primary.unwrap_or(default_id)
    }
}

/// Thresholds for accepting a display by overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPolicy {
    /// Share of the window's own area a display must cover, 0..=1.
    pub min_overlap_fraction: f64,
    /// Absolute overlap floor in square points.
    pub min_overlap_px: f64,
    /// Final fallback when the layout has no primary.
    pub default_display_id: u32,
}

impl DisplayPolicy {
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self {
            min_overlap_fraction: config.min_overlap_percent() / 100.0,
            min_overlap_px: config.min_overlap_px(),
            default_display_id: config.default_display_id(),
        }
    }

    /// Overlap a display needs to be accepted for a window of `window_area`.
    pub fn required_overlap(&self, window_area: f64) -> f64 {
        (self.min_overlap_fraction * window_area).max(self.min_overlap_px)
    }

    pub fn accepts(&self, overlap: f64, window_area: f64) -> bool {
        overlap > 0.0 && overlap >= self.required_overlap(window_area)
    }
}

impl Default for DisplayPolicy {
    fn default() -> Self {
        Self {
            min_overlap_fraction: DEFAULT_MIN_OVERLAP_PERCENT / 100.0,
            min_overlap_px: DEFAULT_MIN_OVERLAP_PX,
            default_display_id: DEFAULT_DISPLAY_ID,
        }
    }
}
