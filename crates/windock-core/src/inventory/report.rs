//! Human-readable snapshot rendering, one block per display.

use std::collections::BTreeSet;

use super::engine::Snapshot;
use crate::window::WindowInfo;

/// Render a snapshot grouped by display.
///
/// Connected displays come first in layout order, followed by any display
/// that windows were assigned to but that is not connected (cache or
/// default fallbacks).
pub fn render_report(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    let connected: Vec<u32> = snapshot.layout.displays.iter().map(|d| d.id()).collect();
    let disconnected: BTreeSet<u32> = snapshot
        .windows
        .iter()
        .map(|w| w.display_id())
        .filter(|id| !connected.contains(id))
        .collect();

    for id in connected.iter().chain(disconnected.iter()) {
        let header = match snapshot.layout.get(*id) {
            Some(display) => format!(
                "Display {} \"{}\"{} {}",
                display.id(),
                display.name(),
                if display.is_primary() { " (primary)" } else { "" },
                display.visible()
            ),
            None => format!("Display {} (not connected)", id),
        };
        out.push_str(&header);
        out.push('\n');

        let windows: Vec<&WindowInfo> = snapshot
            .windows
            .iter()
            .filter(|w| w.display_id() == *id)
            .collect();
        if windows.is_empty() {
            out.push_str("  (no windows)\n");
        }
        for window in windows {
            out.push_str(&render_window(window));
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "{} window{} on {} display{}\n",
        snapshot.windows.len(),
        if snapshot.windows.len() == 1 { "" } else { "s" },
        connected.len(),
        if connected.len() == 1 { "" } else { "s" }
    ));

    out
}

fn render_window(info: &WindowInfo) -> String {
    let w = &info.window;
    let sources: Vec<&str> = w.sources.iter().map(|s| s.as_str()).collect();
    format!(
        "  pid={:<6} id={:<6} num={:<6} {} \"{}\" [{}] {} sources={} via={}",
        w.pid,
        w.window_id.map_or("-".to_string(), |id| id.to_string()),
        w.window_number.map_or("-".to_string(), |n| n.to_string()),
        w.bundle_id,
        w.title,
        flags(w.minimized, w.active, w.fullscreen),
        w.frame,
        sources.join("+"),
        info.assignment.as_str()
    )
}

/// `m`inimized, `a`ctive, `f`ullscreen; `-` when unset.
fn flags(minimized: bool, active: bool, fullscreen: bool) -> String {
    [(minimized, 'm'), (active, 'a'), (fullscreen, 'f')]
        .iter()
        .map(|(set, c)| if *set { *c } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{DisplayInfo, DisplayLayout};
    use crate::geometry::Rect;
    use crate::window::{AssignmentSource, MergedWindowRecord, SourceTag};

    fn info(display_id: u32, title: &str, minimized: bool) -> WindowInfo {
        let window = MergedWindowRecord {
            pid: 412,
            bundle_id: "com.apple.Notes".to_string(),
            window_id: Some(7),
            window_number: None,
            title: title.to_string(),
            normalized_title: title.to_string(),
            frame: Rect::new(0.0, 25.0, 800.0, 600.0),
            minimized,
            active: !minimized,
            fullscreen: false,
            sources: [SourceTag::Geometry, SourceTag::Accessibility]
                .into_iter()
                .collect(),
        };
        let assignment = if minimized {
            AssignmentSource::CacheWindowId
        } else {
            AssignmentSource::Geometry
        };
        WindowInfo::new(window, display_id, assignment)
    }

    fn layout() -> DisplayLayout {
        DisplayLayout::new(vec![
            DisplayInfo::new(1, "Built-in", Rect::new(0.0, 0.0, 1512.0, 982.0), true),
            DisplayInfo::new(2, "External", Rect::new(1512.0, 0.0, 2560.0, 1440.0), false),
        ])
    }

    #[test]
    fn test_report_has_block_per_display() {
        let snapshot = Snapshot {
            windows: vec![info(1, "Shopping List", false)],
            layout: layout(),
        };
        let report = render_report(&snapshot);

        assert!(report.contains("Display 1 \"Built-in\" (primary) (0,0 1512x982)"));
        assert!(report.contains("Display 2 \"External\" (1512,0 2560x1440)"));
        assert!(report.contains("  (no windows)"));
        assert!(report.contains("\"Shopping List\" [-a-] (0,25 800x600)"));
        assert!(report.contains("sources=geometry+accessibility via=geometry"));
        assert!(report.ends_with("1 window on 2 displays\n"));
    }

    #[test]
    fn test_report_includes_disconnected_display() {
        let snapshot = Snapshot {
            windows: vec![info(5, "Old", true)],
            layout: layout(),
        };
        let report = render_report(&snapshot);

        assert!(report.contains("Display 5 (not connected)"));
        assert!(report.contains("[m--]"));
        assert!(report.contains("via=cache:window-id"));
    }

    #[test]
    fn test_flags() {
        assert_eq!(flags(false, false, false), "---");
        assert_eq!(flags(true, true, true), "maf");
    }
}
