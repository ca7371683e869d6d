use tracing::debug;

use super::policy::MatchPolicy;
use crate::window::RawWindowRecord;

/// Attach window-server ids to accessibility records that describe the
/// same window.
///
/// For each accessibility record without a window id, geometry records of
/// the same process are tried in enumeration order and the first match
/// wins. When both sides carry a window number the numbers decide alone;
/// otherwise titles and live frames must both correspond.
///
/// Returns the accessibility list in its original order. Linked entries
/// are new records; inputs are never modified.
pub fn link_sources(
    geometry: &[RawWindowRecord],
    accessibility: &[RawWindowRecord],
    policy: &dyn MatchPolicy,
) -> Vec<RawWindowRecord> {
    let mut linked_count = 0usize;

    let linked: Vec<RawWindowRecord> = accessibility
        .iter()
        .map(|ax| {
            if ax.window_id().is_some() {
                return ax.clone();
            }
            let found = geometry
                .iter()
                .filter(|g| g.pid() == ax.pid())
                .find_map(|g| {
                    let id = g.window_id()?;
                    describes_same_window(g, ax, policy).then_some(id)
                });
            match found {
                Some(id) => {
                    linked_count += 1;
                    debug!(
                        event = "core.matching.record_linked",
                        pid = ax.pid(),
                        window_id = id,
                        title = ax.normalized_title()
                    );
                    ax.linked_to(id)
                }
                None => ax.clone(),
            }
        })
        .collect();

    debug!(
        event = "core.matching.link_completed",
        policy = policy.name(),
        accessibility_count = accessibility.len(),
        linked_count = linked_count
    );

    linked
}

fn describes_same_window(
    geometry: &RawWindowRecord,
    accessibility: &RawWindowRecord,
    policy: &dyn MatchPolicy,
) -> bool {
    match (geometry.window_number(), accessibility.window_number()) {
        (Some(a), Some(b)) => a == b,
        _ => {
            policy.titles_correspond(geometry.normalized_title(), accessibility.normalized_title())
                && policy.frames_correspond(&geometry.frame(), &accessibility.frame())
        }
    }
}
