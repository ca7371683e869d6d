use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::bundle::BundleResolver;
use super::errors::CollectError;
use super::traits::WindowSource;
use crate::config::GeometryConfig;
use crate::geometry::Rect;
use crate::window::{RawWindowRecord, SourceTag};

/// Windows at or below this opacity are treated as invisible overlays.
const MIN_VISIBLE_ALPHA: f64 = 0.01;

/// One entry of the window server's on-screen list, before filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowServerEntry {
    pub number: u32,
    pub owner_pid: i64,
    pub owner_name: String,
    pub title: String,
    pub layer: i64,
    pub alpha: f64,
    pub bounds: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    Layer,
    Transparent,
    TooSmall,
    BadOwner,
}

impl SkipReason {
    fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Layer => "non_normal_layer",
            SkipReason::Transparent => "transparent",
            SkipReason::TooSmall => "too_small",
            SkipReason::BadOwner => "bad_owner_pid",
        }
    }
}

/// Window-server source: on-screen windows with reliable ids and frames.
pub struct GeometrySource {
    min_width: f64,
    min_height: f64,
    resolver: Arc<dyn BundleResolver>,
}

impl GeometrySource {
    pub fn new(min_width: f64, min_height: f64, resolver: Arc<dyn BundleResolver>) -> Self {
        Self {
            min_width,
            min_height,
            resolver,
        }
    }

    pub fn from_config(config: &GeometryConfig, resolver: Arc<dyn BundleResolver>) -> Self {
        Self::new(config.min_width(), config.min_height(), resolver)
    }

    fn check_entry(&self, entry: &WindowServerEntry) -> Result<i32, SkipReason> {
        if entry.layer != 0 {
            return Err(SkipReason::Layer);
        }
        if !entry.alpha.is_finite() || entry.alpha <= MIN_VISIBLE_ALPHA {
            return Err(SkipReason::Transparent);
        }
        if !(entry.bounds.width >= self.min_width && entry.bounds.height >= self.min_height) {
            return Err(SkipReason::TooSmall);
        }
        match i32::try_from(entry.owner_pid) {
            Ok(pid) if pid > 0 => Ok(pid),
            _ => Err(SkipReason::BadOwner),
        }
    }

    /// Filter window-server entries (front-to-back order) into records.
    ///
    /// The first surviving entry is the frontmost normal window and is
    /// marked active.
    pub fn records_from_entries(&self, entries: Vec<WindowServerEntry>) -> Vec<RawWindowRecord> {
        let mut bundles: HashMap<i32, String> = HashMap::new();
        let mut skipped: HashMap<&'static str, usize> = HashMap::new();
        let mut records = Vec::with_capacity(entries.len());

        for entry in entries {
            let pid = match self.check_entry(&entry) {
                Ok(pid) => pid,
                Err(reason) => {
                    debug!(
                        event = "core.collect.geometry_window_skipped",
                        window_id = entry.number,
                        reason = reason.as_str()
                    );
                    *skipped.entry(reason.as_str()).or_default() += 1;
                    continue;
                }
            };

            let bundle_id = bundles
                .entry(pid)
                .or_insert_with(|| {
                    self.resolver
                        .bundle_id(pid)
                        .filter(|id| !id.is_empty())
                        .unwrap_or_else(|| fallback_bundle_id(&entry.owner_name, pid))
                })
                .clone();

            let is_frontmost = records.is_empty();
            records.push(
                RawWindowRecord::new(SourceTag::Geometry, pid, bundle_id)
                    .with_window_id(entry.number)
                    .with_window_number(i64::from(entry.number))
                    .with_title(entry.title)
                    .with_frame(entry.bounds)
                    .with_active(is_frontmost),
            );
        }

        if skipped.contains_key(SkipReason::BadOwner.as_str()) {
            warn!(
                event = "core.collect.geometry_records_dropped",
                skipped = ?skipped,
                returned_count = records.len()
            );
        }

        records
    }
}

fn fallback_bundle_id(owner_name: &str, pid: i32) -> String {
    if owner_name.is_empty() {
        format!("pid:{}", pid)
    } else {
        owner_name.to_string()
    }
}

impl WindowSource for GeometrySource {
    fn tag(&self) -> SourceTag {
        SourceTag::Geometry
    }

    fn collect(&self) -> Result<Vec<RawWindowRecord>, CollectError> {
        info!(event = "core.collect.geometry_started");
        let entries = copy_onscreen_windows()?;
        let total = entries.len();
        let records = self.records_from_entries(entries);
        info!(
            event = "core.collect.geometry_completed",
            seen = total,
            count = records.len()
        );
        Ok(records)
    }
}

#[cfg(target_os = "macos")]
fn copy_onscreen_windows() -> Result<Vec<WindowServerEntry>, CollectError> {
    super::macos::copy_onscreen_windows()
}

#[cfg(not(target_os = "macos"))]
fn copy_onscreen_windows() -> Result<Vec<WindowServerEntry>, CollectError> {
    Err(CollectError::Unsupported {
        source_name: SourceTag::Geometry.as_str(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedResolver;

    impl BundleResolver for FixedResolver {
        fn bundle_id(&self, pid: i32) -> Option<String> {
            (pid == 100).then(|| "com.apple.Notes".to_string())
        }
    }

    fn source() -> GeometrySource {
        GeometrySource::new(40.0, 40.0, Arc::new(FixedResolver))
    }

    fn entry(number: u32, pid: i64) -> WindowServerEntry {
        WindowServerEntry {
            number,
            owner_pid: pid,
            owner_name: "Owner".to_string(),
            title: format!("Window {}", number),
            layer: 0,
            alpha: 1.0,
            bounds: Rect::new(0.0, 0.0, 800.0, 600.0),
        }
    }

    #[test]
    fn test_records_carry_id_number_and_bundle() {
        let records = source().records_from_entries(vec![entry(7, 100)]);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.source(), SourceTag::Geometry);
        assert_eq!(r.window_id(), Some(7));
        assert_eq!(r.window_number(), Some(7));
        assert_eq!(r.bundle_id(), "com.apple.Notes");
        assert_eq!(r.title(), "Window 7");
    }

    #[test]
    fn test_filters_layer_alpha_and_size() {
        let mut menubar = entry(1, 100);
        menubar.layer = 25;
        let mut invisible = entry(2, 100);
        invisible.alpha = 0.0;
        let mut tiny = entry(3, 100);
        tiny.bounds = Rect::new(0.0, 0.0, 20.0, 600.0);
        let normal = entry(4, 100);

        let records = source().records_from_entries(vec![menubar, invisible, tiny, normal]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].window_id(), Some(4));
    }

    #[test]
    fn test_drops_bad_owner_pid() {
        let records = source().records_from_entries(vec![entry(1, 0), entry(2, -4), entry(3, 100)]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].window_id(), Some(3));
    }

    #[test]
    fn test_unresolved_bundle_falls_back_to_owner_name() {
        let records = source().records_from_entries(vec![entry(9, 200)]);
        assert_eq!(records[0].bundle_id(), "Owner");

        let mut nameless = entry(10, 300);
        nameless.owner_name = String::new();
        let records = source().records_from_entries(vec![nameless]);
        assert_eq!(records[0].bundle_id(), "pid:300");
    }

    #[test]
    fn test_frontmost_surviving_window_is_active() {
        let mut overlay = entry(1, 100);
        overlay.layer = 3;
        let records = source().records_from_entries(vec![overlay, entry(2, 100), entry(3, 100)]);
        assert!(records[0].is_active());
        assert!(!records[1].is_active());
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_collect_unsupported_off_macos() {
        let err = source().collect().unwrap_err();
        assert!(matches!(err, CollectError::Unsupported { .. }));
    }
}
