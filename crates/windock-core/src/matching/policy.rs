//! Pluggable identity heuristics.

use crate::config::MatchingConfig;
use crate::geometry::Rect;

/// Decides when two observations plausibly describe the same window.
///
/// Used by the linker and by the title pass of the grouper. Exact-key
/// matches (window id, process + window number) are not policy decisions.
pub trait MatchPolicy: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    /// Live frames overlap enough to be the same surface.
    fn frames_correspond(&self, a: &Rect, b: &Rect) -> bool;

    /// Normalized titles identify the same window. Empty titles never do.
    fn titles_correspond(&self, a: &str, b: &str) -> bool {
        !a.is_empty() && a == b
    }

    /// Geometry does not contradict two same-title records being one window.
    ///
    /// A zero-area frame carries no position, so it is compatible with any
    /// frame; two live frames must correspond.
    fn geometry_corroborates(&self, a: &Rect, b: &Rect) -> bool {
        a.is_zero_area() || b.is_zero_area() || self.frames_correspond(a, b)
    }
}

/// Intersection-over-union threshold policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IouMatchPolicy {
    iou_threshold: f64,
}

impl IouMatchPolicy {
    pub fn new(iou_threshold: f64) -> Self {
        Self { iou_threshold }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(config.iou_threshold())
    }

    pub fn iou_threshold(&self) -> f64 {
        self.iou_threshold
    }
}

impl Default for IouMatchPolicy {
    fn default() -> Self {
        Self::new(crate::config::defaults::DEFAULT_IOU_THRESHOLD)
    }
}

impl MatchPolicy for IouMatchPolicy {
    fn name(&self) -> &'static str {
        "iou"
    }

    fn frames_correspond(&self, a: &Rect, b: &Rect) -> bool {
        if a.is_zero_area() || b.is_zero_area() {
            return false;
        }
        a.iou(b) >= self.iou_threshold
    }
}
