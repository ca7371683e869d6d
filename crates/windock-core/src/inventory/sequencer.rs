use crate::window::WindowInfo;

/// Sort by display, bundle id, normalized title, then pid.
///
/// Stable, so windows equal on all four keys keep their grouping order.
pub fn sequence(windows: &mut [WindowInfo]) {
    windows.sort_by(|a, b| {
        a.display_id()
            .cmp(&b.display_id())
            .then_with(|| a.bundle_id().cmp(b.bundle_id()))
            .then_with(|| a.normalized_title().cmp(b.normalized_title()))
            .then_with(|| a.pid().cmp(&b.pid()))
    });
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::geometry::Rect;
    use crate::window::{AssignmentSource, MergedWindowRecord};

    fn info(display_id: u32, bundle: &str, title: &str, pid: i32) -> WindowInfo {
        let window = MergedWindowRecord {
            pid,
            bundle_id: bundle.to_string(),
            window_id: None,
            window_number: None,
            title: title.to_string(),
            normalized_title: title.to_string(),
            frame: Rect::ZERO,
            minimized: false,
            active: false,
            fullscreen: false,
            sources: BTreeSet::new(),
        };
        WindowInfo::new(window, display_id, AssignmentSource::Primary)
    }

    #[test]
    fn test_sequence_orders_by_all_keys() {
        let mut windows = vec![
            info(2, "a", "x", 1),
            info(1, "b", "a", 1),
            info(1, "a", "z", 1),
            info(1, "a", "m", 9),
            info(1, "a", "m", 3),
        ];
        sequence(&mut windows);

        let keys: Vec<_> = windows
            .iter()
            .map(|w| (w.display_id(), w.bundle_id(), w.normalized_title(), w.pid()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (1, "a", "m", 3),
                (1, "a", "m", 9),
                (1, "a", "z", 1),
                (1, "b", "a", 1),
                (2, "a", "x", 1),
            ]
        );
    }
}
