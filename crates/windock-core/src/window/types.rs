use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::title::normalize_title;
use crate::geometry::Rect;

/// Which OS facility reported a record.
///
/// Ordered so that `Geometry` sorts first; it is the more reliable source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    Geometry,
    Accessibility,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Geometry => "geometry",
            SourceTag::Accessibility => "accessibility",
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One window as reported by one source during one snapshot.
///
/// Built once and never changed; cross-source linking produces a new
/// record via [`RawWindowRecord::linked_to`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawWindowRecord {
    source: SourceTag,
    pid: i32,
    bundle_id: String,
    window_id: Option<u32>,
    window_number: Option<i64>,
    title: String,
    normalized_title: String,
    frame: Rect,
    minimized: bool,
    active: bool,
    fullscreen: bool,
}

impl RawWindowRecord {
    pub fn new(source: SourceTag, pid: i32, bundle_id: impl Into<String>) -> Self {
        Self {
            source,
            pid,
            bundle_id: bundle_id.into(),
            window_id: None,
            window_number: None,
            title: String::new(),
            normalized_title: String::new(),
            frame: Rect::ZERO,
            minimized: false,
            active: false,
            fullscreen: false,
        }
    }

    pub fn with_window_id(mut self, window_id: u32) -> Self {
        self.window_id = Some(window_id);
        self
    }

    pub fn with_window_number(mut self, window_number: i64) -> Self {
        self.window_number = Some(window_number);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self.normalized_title = normalize_title(&self.title);
        self
    }

    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.frame = frame;
        self
    }

    pub fn with_minimized(mut self, minimized: bool) -> Self {
        self.minimized = minimized;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    /// Copy of this record carrying a window id established by the linker.
    pub fn linked_to(&self, window_id: u32) -> Self {
        self.clone().with_window_id(window_id)
    }

    pub fn source(&self) -> SourceTag {
        self.source
    }
    pub fn pid(&self) -> i32 {
        self.pid
    }
    pub fn bundle_id(&self) -> &str {
        &self.bundle_id
    }
    pub fn window_id(&self) -> Option<u32> {
        self.window_id
    }
    pub fn window_number(&self) -> Option<i64> {
        self.window_number
    }
    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn normalized_title(&self) -> &str {
        &self.normalized_title
    }
    pub fn frame(&self) -> Rect {
        self.frame
    }
    pub fn is_minimized(&self) -> bool {
        self.minimized
    }
    pub fn is_active(&self) -> bool {
        self.active
    }
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Records with a nonsensical owner or unusable geometry are dropped
    /// individually before matching.
    pub fn is_well_formed(&self) -> bool {
        self.pid > 0 && self.frame.is_finite()
    }
}

/// The canonical record for one real window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedWindowRecord {
    pub pid: i32,
    pub bundle_id: String,
    pub window_id: Option<u32>,
    pub window_number: Option<i64>,
    pub title: String,
    pub normalized_title: String,
    pub frame: Rect,
    pub minimized: bool,
    pub active: bool,
    pub fullscreen: bool,
    pub sources: BTreeSet<SourceTag>,
}

impl MergedWindowRecord {
    /// Whether live geometry is usable for display assignment.
    pub fn has_live_geometry(&self) -> bool {
        !self.minimized && !self.frame.is_zero_area()
    }

    /// Affinity key combining process and window number, e.g. `"412#3"`.
    pub fn process_window_key(&self) -> Option<String> {
        self.window_number
            .map(|number| format!("{}#{}", self.pid, number))
    }
}

/// How a window's display was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentSource {
    /// Live overlap with a connected display.
    Geometry,
    /// Affinity cache hit on the window id.
    CacheWindowId,
    /// Affinity cache hit on the process id and window number.
    CacheProcessWindow,
    /// Affinity cache hit on the bundle identifier.
    CacheBundle,
    /// Nothing else applied; the primary or configured default display.
    Primary,
}

impl AssignmentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentSource::Geometry => "geometry",
            AssignmentSource::CacheWindowId => "cache:window-id",
            AssignmentSource::CacheProcessWindow => "cache:pid#number",
            AssignmentSource::CacheBundle => "cache:bundle",
            AssignmentSource::Primary => "primary",
        }
    }
}

/// A merged window attributed to exactly one display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowInfo {
    #[serde(flatten)]
    pub window: MergedWindowRecord,
    pub display_id: u32,
    pub assignment: AssignmentSource,
}

impl WindowInfo {
    pub fn new(window: MergedWindowRecord, display_id: u32, assignment: AssignmentSource) -> Self {
        Self {
            window,
            display_id,
            assignment,
        }
    }

    pub fn pid(&self) -> i32 {
        self.window.pid
    }
    pub fn bundle_id(&self) -> &str {
        &self.window.bundle_id
    }
    pub fn window_id(&self) -> Option<u32> {
        self.window.window_id
    }
    pub fn title(&self) -> &str {
        &self.window.title
    }
    pub fn normalized_title(&self) -> &str {
        &self.window.normalized_title
    }
    pub fn display_id(&self) -> u32 {
        self.display_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_builder_normalizes_title() {
        let record = RawWindowRecord::new(SourceTag::Accessibility, 100, "com.apple.Notes")
            .with_title("Shopping   List — Edited")
            .with_minimized(true);

        assert_eq!(record.title(), "Shopping   List — Edited");
        assert_eq!(record.normalized_title(), "Shopping List");
        assert_eq!(record.source(), SourceTag::Accessibility);
        assert!(record.is_minimized());
        assert!(record.frame().is_zero_area());
        assert_eq!(record.window_id(), None);
    }

    #[test]
    fn test_linked_to_leaves_original_untouched() {
        let record = RawWindowRecord::new(SourceTag::Accessibility, 100, "com.apple.Notes")
            .with_title("Notes");
        let linked = record.linked_to(7);

        assert_eq!(record.window_id(), None);
        assert_eq!(linked.window_id(), Some(7));
        assert_eq!(linked.title(), "Notes");
    }

    #[test]
    fn test_well_formed_rejects_bad_pid_and_nan_frame() {
        let ok = RawWindowRecord::new(SourceTag::Geometry, 1, "a");
        assert!(ok.is_well_formed());

        let zero_pid = RawWindowRecord::new(SourceTag::Geometry, 0, "a");
        assert!(!zero_pid.is_well_formed());

        let nan_frame = RawWindowRecord::new(SourceTag::Geometry, 5, "a")
            .with_frame(Rect::new(f64::NAN, 0.0, 10.0, 10.0));
        assert!(!nan_frame.is_well_formed());
    }

    #[test]
    fn test_source_tag_ordering_prefers_geometry() {
        assert!(SourceTag::Geometry < SourceTag::Accessibility);
    }

    #[test]
    fn test_process_window_key() {
        let merged = MergedWindowRecord {
            pid: 412,
            bundle_id: "com.example".to_string(),
            window_id: None,
            window_number: Some(3),
            title: String::new(),
            normalized_title: String::new(),
            frame: Rect::ZERO,
            minimized: false,
            active: false,
            fullscreen: false,
            sources: BTreeSet::new(),
        };
        assert_eq!(merged.process_window_key().as_deref(), Some("412#3"));
        assert!(!merged.has_live_geometry());
    }

    #[test]
    fn test_window_info_serializes_flat() {
        let merged = MergedWindowRecord {
            pid: 1,
            bundle_id: "com.example".to_string(),
            window_id: Some(9),
            window_number: None,
            title: "T".to_string(),
            normalized_title: "T".to_string(),
            frame: Rect::new(0.0, 0.0, 10.0, 10.0),
            minimized: false,
            active: true,
            fullscreen: false,
            sources: [SourceTag::Geometry].into_iter().collect(),
        };
        let info = WindowInfo::new(merged, 2, AssignmentSource::Geometry);
        let json = serde_json::to_value(&info).unwrap();

        assert_eq!(json["window_id"], 9);
        assert_eq!(json["display_id"], 2);
        assert_eq!(json["assignment"], "geometry");
        assert_eq!(json["sources"][0], "geometry");
    }
}
