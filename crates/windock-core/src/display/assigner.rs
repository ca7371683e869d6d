use tracing::{debug, info};

use super::types::{DisplayLayout, DisplayPolicy};
use crate::affinity::{AffinityCache, AffinityUpdate};
use crate::geometry::Rect;
use crate::window::{AssignmentSource, MergedWindowRecord, WindowInfo};

/// Result of attributing a snapshot's windows to displays.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub windows: Vec<WindowInfo>,
    /// Cache writes earned this cycle, in window order.
    pub updates: Vec<AffinityUpdate>,
}

/// Display with the greatest accepted overlap, first in layout order on ties.
pub fn best_display(frame: &Rect, layout: &DisplayLayout, policy: &DisplayPolicy) -> Option<u32> {
    let area = frame.area();
    let mut best: Option<(u32, f64)> = None;
    for display in &layout.displays {
        let overlap = frame.intersection_area(&display.visible());
        if !policy.accepts(overlap, area) {
            continue;
        }
        if best.is_none_or(|(_, current)| overlap > current) {
            best = Some((display.id(), overlap));
        }
    }
    best.map(|(id, _)| id)
}

/// Attribute every window to exactly one display.
///
/// Windows with live geometry go to the display they overlap most, if any
/// display's overlap is accepted by `policy`. Everything else falls back to
/// the cache (window id, then pid#number, then bundle) and finally to the
/// primary display.
///
/// The cache is only read. Only windows placed by overlap produce updates,
/// so a minimized or ambiguous window never overwrites its last known-good
/// display.
pub fn assign_displays(
    records: Vec<MergedWindowRecord>,
    layout: &DisplayLayout,
    policy: &DisplayPolicy,
    cache: &AffinityCache,
) -> Assignment {
    let fallback_display = layout.primary_or(policy.default_display_id);
    let mut windows = Vec::with_capacity(records.len());
    let mut updates = Vec::new();

    for record in records {
        let live = if record.has_live_geometry() {
            best_display(&record.frame, layout, policy)
        } else {
            None
        };

        let (display_id, assignment) = match live {
            Some(display_id) => {
                updates.push(AffinityUpdate::for_window(&record, display_id));
                (display_id, AssignmentSource::Geometry)
            }
            None => cache
                .lookup(&record)
                .unwrap_or((fallback_display, AssignmentSource::Primary)),
        };

        debug!(
            event = "core.display.window_assigned",
            pid = record.pid,
            window_id = ?record.window_id,
            display_id = display_id,
            assignment = assignment.as_str()
        );
        windows.push(WindowInfo::new(record, display_id, assignment));
    }

    info!(
        event = "core.display.assign_completed",
        count = windows.len(),
        by_geometry = updates.len(),
        displays = layout.displays.len()
    );

    Assignment { windows, updates }
}
