use std::thread;

use tracing::{debug, info, warn};

use super::errors::CollectError;
use super::permissions::AccessibilityPermission;
use super::traits::WindowSource;
use crate::errors::WindockError;
use crate::window::RawWindowRecord;

/// Records gathered from both sources for one snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedRecords {
    pub geometry: Vec<RawWindowRecord>,
    pub accessibility: Vec<RawWindowRecord>,
}

impl CollectedRecords {
    pub fn total(&self) -> usize {
        self.geometry.len() + self.accessibility.len()
    }
}

/// Run both sources concurrently and return whatever they could see.
///
/// Never fails: an unavailable source contributes an empty list, the
/// accessibility source is skipped entirely without permission, and
/// malformed records are dropped one at a time.
pub fn collect_sources(
    geometry: &dyn WindowSource,
    accessibility: &dyn WindowSource,
    permission: &dyn AccessibilityPermission,
) -> CollectedRecords {
    let ax_trusted = permission.is_trusted();
    if !ax_trusted {
        warn!(
            event = "core.collect.accessibility_skipped",
            reason = "permission_denied"
        );
    }

    let (geometry_result, accessibility_result) = thread::scope(|scope| {
        let geometry_handle = scope.spawn(|| geometry.collect());
        let ax_handle = ax_trusted.then(|| scope.spawn(|| accessibility.collect()));
        let geometry_result = join_source(geometry, geometry_handle);
        let accessibility_result = match ax_handle {
            Some(handle) => join_source(accessibility, handle),
            None => Ok(Vec::new()),
        };
        (geometry_result, accessibility_result)
    });

    let collected = CollectedRecords {
        geometry: retain_well_formed(settle(geometry, geometry_result)),
        accessibility: retain_well_formed(settle(accessibility, accessibility_result)),
    };

    info!(
        event = "core.collect.sources_completed",
        geometry_count = collected.geometry.len(),
        accessibility_count = collected.accessibility.len()
    );

    collected
}

/// A panicking collector counts as an unavailable source.
fn join_source(
    source: &dyn WindowSource,
    handle: thread::ScopedJoinHandle<'_, Result<Vec<RawWindowRecord>, CollectError>>,
) -> Result<Vec<RawWindowRecord>, CollectError> {
    handle.join().unwrap_or_else(|_| {
        Err(CollectError::EnumerationFailed {
            source_name: source.tag().as_str(),
            message: "collector thread panicked".to_string(),
        })
    })
}

fn settle(
    source: &dyn WindowSource,
    result: Result<Vec<RawWindowRecord>, CollectError>,
) -> Vec<RawWindowRecord> {
    match result {
        Ok(records) => records
            .into_iter()
            .filter(|r| {
                let matches = r.source() == source.tag();
                if !matches {
                    debug!(
                        event = "core.collect.record_source_mismatch",
                        expected = source.tag().as_str(),
                        actual = r.source().as_str()
                    );
                }
                matches
            })
            .collect(),
        Err(e) => {
            warn!(
                event = "core.collect.source_unavailable",
                source = source.tag().as_str(),
                error = %e,
                error_code = e.error_code()
            );
            Vec::new()
        }
    }
}

fn retain_well_formed(records: Vec<RawWindowRecord>) -> Vec<RawWindowRecord> {
    let before = records.len();
    let kept: Vec<RawWindowRecord> = records.into_iter().filter(|r| r.is_well_formed()).collect();
    if kept.len() < before {
        warn!(
            event = "core.collect.records_dropped",
            dropped_count = before - kept.len(),
            returned_count = kept.len()
        );
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::test_helpers::{FixedPermission, StaticSource};
    use crate::geometry::Rect;
    use crate::window::SourceTag;

    fn geo(id: u32) -> RawWindowRecord {
        RawWindowRecord::new(SourceTag::Geometry, 100, "com.example")
            .with_window_id(id)
            .with_frame(Rect::new(0.0, 0.0, 100.0, 100.0))
    }

    fn ax(title: &str) -> RawWindowRecord {
        RawWindowRecord::new(SourceTag::Accessibility, 100, "com.example").with_title(title)
    }

    #[test]
    fn test_collects_both_sources() {
        let g = StaticSource::new(SourceTag::Geometry, vec![geo(1), geo(2)]);
        let a = StaticSource::new(SourceTag::Accessibility, vec![ax("One")]);

        let collected = collect_sources(&g, &a, &FixedPermission(true));
        assert_eq!(collected.geometry.len(), 2);
        assert_eq!(collected.accessibility.len(), 1);
        assert_eq!(collected.total(), 3);
    }

    #[test]
    fn test_accessibility_skipped_without_permission() {
        let g = StaticSource::new(SourceTag::Geometry, vec![geo(1)]);
        let a = StaticSource::new(SourceTag::Accessibility, vec![ax("One")]);

        let collected = collect_sources(&g, &a, &FixedPermission(false));
        assert_eq!(collected.geometry.len(), 1);
        assert!(collected.accessibility.is_empty());
        assert_eq!(a.calls(), 0);
    }

    #[test]
    fn test_failing_source_degrades_to_empty() {
        let g = StaticSource::failing(SourceTag::Geometry);
        let a = StaticSource::new(SourceTag::Accessibility, vec![ax("One")]);

        let collected = collect_sources(&g, &a, &FixedPermission(true));
        assert!(collected.geometry.is_empty());
        assert_eq!(collected.accessibility.len(), 1);
    }

    struct PanickingSource(SourceTag);

    impl WindowSource for PanickingSource {
        fn tag(&self) -> SourceTag {
            self.0
        }

        fn collect(&self) -> Result<Vec<RawWindowRecord>, CollectError> {
            panic!("window list unavailable");
        }
    }

    #[test]
    fn test_panicking_geometry_source_degrades_to_empty() {
        let g = PanickingSource(SourceTag::Geometry);
        let a = StaticSource::new(SourceTag::Accessibility, vec![ax("One")]);

        let collected = collect_sources(&g, &a, &FixedPermission(true));
        assert!(collected.geometry.is_empty());
        assert_eq!(collected.accessibility.len(), 1);
    }

    #[test]
    fn test_panicking_accessibility_source_degrades_to_empty() {
        let g = StaticSource::new(SourceTag::Geometry, vec![geo(1)]);
        let a = PanickingSource(SourceTag::Accessibility);

        let collected = collect_sources(&g, &a, &FixedPermission(true));
        assert_eq!(collected.geometry.len(), 1);
        assert!(collected.accessibility.is_empty());
    }

    #[test]
    fn test_malformed_records_dropped_individually() {
        let bad = RawWindowRecord::new(SourceTag::Geometry, -1, "com.example").with_window_id(9);
        let g = StaticSource::new(SourceTag::Geometry, vec![geo(1), bad, geo(2)]);
        let a = StaticSource::new(SourceTag::Accessibility, Vec::new());

        let collected = collect_sources(&g, &a, &FixedPermission(true));
        let ids: Vec<_> = collected.geometry.iter().map(|r| r.window_id()).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_records_with_wrong_source_tag_dropped() {
        let g = StaticSource::new(SourceTag::Geometry, vec![geo(1), ax("stray")]);
        let a = StaticSource::new(SourceTag::Accessibility, Vec::new());

        let collected = collect_sources(&g, &a, &FixedPermission(true));
        assert_eq!(collected.geometry.len(), 1);
    }
}
