//! Rectangle arithmetic shared by the matcher and the display assigner.
//!
//! Coordinates are window-server points with the origin at the top-left
//! corner of the primary display. A rectangle with a non-positive or
//! non-finite side has zero area; minimized and off-screen accessibility
//! records are reported that way.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    pub fn area(&self) -> f64 {
        if !self.is_finite() || self.width <= 0.0 || self.height <= 0.0 {
            return 0.0;
        }
        self.width * self.height
    }

    pub fn is_zero_area(&self) -> bool {
        self.area() <= 0.0
    }

    /// Area shared by both rectangles; 0 when disjoint or either is degenerate.
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        if self.is_zero_area() || other.is_zero_area() {
            return 0.0;
        }
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);
        if right <= left || bottom <= top {
            return 0.0;
        }
        (right - left) * (bottom - top)
    }

    /// Intersection-over-union; 0 when disjoint or either is degenerate.
    pub fn iou(&self, other: &Rect) -> f64 {
        let intersection = self.intersection_area(other);
        if intersection <= 0.0 {
            return 0.0;
        }
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.0},{:.0} {:.0}x{:.0})",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_of_degenerate_rects_is_zero() {
        assert_eq!(Rect::ZERO.area(), 0.0);
        assert_eq!(Rect::new(10.0, 10.0, -5.0, 20.0).area(), 0.0);
        assert_eq!(Rect::new(0.0, 0.0, f64::NAN, 20.0).area(), 0.0);
        assert!(Rect::new(0.0, 0.0, 100.0, 0.0).is_zero_area());
    }

    #[test]
    fn test_intersection_area() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 100.0, 100.0);
        assert_eq!(a.intersection_area(&b), 2500.0);
        assert_eq!(b.intersection_area(&a), 2500.0);
    }

    #[test]
    fn test_disjoint_and_touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(a.intersection_area(&Rect::new(200.0, 0.0, 50.0, 50.0)), 0.0);
        assert_eq!(a.intersection_area(&Rect::new(100.0, 0.0, 50.0, 50.0)), 0.0);
    }

    #[test]
    fn test_iou_identical_rects_is_one() {
        let a = Rect::new(10.0, 20.0, 800.0, 600.0);
        assert!((a.iou(&a) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_iou_half_overlap() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 0.0, 100.0, 100.0);
        // 5000 / 15000
        assert!((a.iou(&b) - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_iou_with_zero_area_is_zero() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(a.iou(&Rect::ZERO), 0.0);
        assert_eq!(Rect::ZERO.iou(&Rect::ZERO), 0.0);
    }

    #[test]
    fn test_display_format() {
        let r = Rect::new(0.0, 25.0, 800.0, 600.0);
        assert_eq!(r.to_string(), "(0,25 800x600)");
    }
}
