use std::sync::Arc;

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tracing::{debug, info, warn};

use super::bundle::{BundleResolver, bundle_root};
use super::errors::CollectError;
use super::traits::WindowSource;
use crate::config::AccessibilityConfig;
use crate::geometry::Rect;
use crate::window::{RawWindowRecord, SourceTag};

pub const ROLE_WINDOW: &str = "AXWindow";
pub const SUBROLE_STANDARD: &str = "AXStandardWindow";
pub const SUBROLE_DIALOG: &str = "AXDialog";

/// Attributes read from one accessibility window element.
///
/// Every field is optional: a failed read is `None` and is replaced by its
/// documented default when the record is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxWindowEntry {
    pub role: Option<String>,
    pub subrole: Option<String>,
    /// Default: empty.
    pub title: Option<String>,
    /// Default: zero-area frame (position and size must both be present).
    pub position: Option<(f64, f64)>,
    pub size: Option<(f64, f64)>,
    /// Default: false.
    pub minimized: Option<bool>,
    /// Default: false.
    pub fullscreen: Option<bool>,
    /// Default: false.
    pub main: Option<bool>,
    /// Default: absent. Not every application exposes it.
    pub window_number: Option<i64>,
}

/// All primary-candidate windows of one application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxApplicationWindows {
    pub pid: i32,
    pub frontmost: bool,
    pub windows: Vec<AxWindowEntry>,
}

/// Role `AXWindow` with a standard or dialog subrole, unless transient
/// windows were requested.
pub fn is_primary_window(entry: &AxWindowEntry, include_transient: bool) -> bool {
    if entry.role.as_deref() != Some(ROLE_WINDOW) {
        return false;
    }
    if include_transient {
        return true;
    }
    matches!(
        entry.subrole.as_deref(),
        Some(SUBROLE_STANDARD) | Some(SUBROLE_DIALOG)
    )
}

/// Accessibility source: walks every running application's window tree.
pub struct AccessibilitySource {
    include_transient: bool,
    messaging_timeout_secs: f32,
    resolver: Arc<dyn BundleResolver>,
}

impl AccessibilitySource {
    pub fn new(
        include_transient: bool,
        messaging_timeout_secs: f32,
        resolver: Arc<dyn BundleResolver>,
    ) -> Self {
        Self {
            include_transient,
            messaging_timeout_secs,
            resolver,
        }
    }

    pub fn from_config(config: &AccessibilityConfig, resolver: Arc<dyn BundleResolver>) -> Self {
        Self::new(
            config.include_transient(),
            config.messaging_timeout_secs(),
            resolver,
        )
    }

    /// Build records for one application's windows.
    pub fn records_from_application(&self, app: AxApplicationWindows) -> Vec<RawWindowRecord> {
        if app.pid <= 0 {
            warn!(event = "core.collect.ax_application_dropped", pid = app.pid);
            return Vec::new();
        }

        let primary: Vec<AxWindowEntry> = app
            .windows
            .into_iter()
            .filter(|w| is_primary_window(w, self.include_transient))
            .collect();
        if primary.is_empty() {
            return Vec::new();
        }

        let bundle_id = self
            .resolver
            .bundle_id(app.pid)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("pid:{}", app.pid));

        primary
            .into_iter()
            .map(|w| {
                let frame = match (w.position, w.size) {
                    (Some((x, y)), Some((width, height))) => Rect::new(x, y, width, height),
                    _ => Rect::ZERO,
                };
                let mut record = RawWindowRecord::new(SourceTag::Accessibility, app.pid, &bundle_id)
                    .with_title(w.title.unwrap_or_default())
                    .with_frame(frame)
                    .with_minimized(w.minimized.unwrap_or(false))
                    .with_fullscreen(w.fullscreen.unwrap_or(false))
                    .with_active(app.frontmost && w.main.unwrap_or(false));
                if let Some(number) = w.window_number {
                    record = record.with_window_number(number);
                }
                record
            })
            .collect()
    }
}

impl WindowSource for AccessibilitySource {
    fn tag(&self) -> SourceTag {
        SourceTag::Accessibility
    }

    fn collect(&self) -> Result<Vec<RawWindowRecord>, CollectError> {
        info!(event = "core.collect.accessibility_started");

        let pids = running_application_pids();
        let mut records = Vec::new();
        let mut failed_apps = 0usize;

        for pid in &pids {
            match copy_application_windows(*pid, self.messaging_timeout_secs) {
                Ok(app) => records.extend(self.records_from_application(app)),
                Err(CollectError::AccessibilityPermissionDenied) => {
                    return Err(CollectError::AccessibilityPermissionDenied);
                }
                Err(e) => {
                    debug!(
                        event = "core.collect.ax_application_skipped",
                        pid = pid,
                        error = %e
                    );
                    failed_apps += 1;
                }
            }
        }

        info!(
            event = "core.collect.accessibility_completed",
            applications = pids.len(),
            failed_applications = failed_apps,
            count = records.len()
        );
        Ok(records)
    }
}

/// PIDs of processes running from inside an application bundle.
pub fn running_application_pids() -> Vec<i32> {
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::nothing().with_exe(UpdateKind::OnlyIfNotSet),
    );

    let mut pids: Vec<i32> = system
        .processes()
        .iter()
        .filter(|(_, process)| {
            process
                .exe()
                .is_some_and(|exe| bundle_root(exe).is_some())
        })
        .filter_map(|(pid, _)| i32::try_from(pid.as_u32()).ok())
        .collect();
    pids.sort_unstable();
    pids
}

#[cfg(target_os = "macos")]
fn copy_application_windows(
    pid: i32,
    timeout_secs: f32,
) -> Result<AxApplicationWindows, CollectError> {
    super::macos::copy_application_windows(pid, timeout_secs)
}

#[cfg(not(target_os = "macos"))]
fn copy_application_windows(
    _pid: i32,
    _timeout_secs: f32,
) -> Result<AxApplicationWindows, CollectError> {
    Err(CollectError::Unsupported {
        source_name: SourceTag::Accessibility.as_str(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoBundles;

    impl BundleResolver for NoBundles {
        fn bundle_id(&self, _pid: i32) -> Option<String> {
            None
        }
    }

    fn source(include_transient: bool) -> AccessibilitySource {
        AccessibilitySource::new(include_transient, 1.0, Arc::new(NoBundles))
    }

    fn standard(title: &str) -> AxWindowEntry {
        AxWindowEntry {
            role: Some(ROLE_WINDOW.to_string()),
            subrole: Some(SUBROLE_STANDARD.to_string()),
            title: Some(title.to_string()),
            position: Some((10.0, 20.0)),
            size: Some((800.0, 600.0)),
            ..Default::default()
        }
    }

    #[test]
    fn test_primary_window_filter() {
        let mut dialog = standard("Save");
        dialog.subrole = Some(SUBROLE_DIALOG.to_string());
        let mut floating = standard("Inspector");
        floating.subrole = Some("AXFloatingWindow".to_string());
        let mut sheet = standard("Sheet");
        sheet.role = Some("AXSheet".to_string());

        assert!(is_primary_window(&standard("Doc"), false));
        assert!(is_primary_window(&dialog, false));
        assert!(!is_primary_window(&floating, false));
        assert!(is_primary_window(&floating, true));
        assert!(!is_primary_window(&sheet, true));
        assert!(!is_primary_window(&AxWindowEntry::default(), true));
    }

    #[test]
    fn test_failed_reads_use_defaults() {
        let entry = AxWindowEntry {
            role: Some(ROLE_WINDOW.to_string()),
            subrole: Some(SUBROLE_STANDARD.to_string()),
            position: Some((5.0, 5.0)),
            ..Default::default()
        };
        let app = AxApplicationWindows {
            pid: 42,
            frontmost: true,
            windows: vec![entry],
        };

        let records = source(false).records_from_application(app);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.title(), "");
        assert!(r.frame().is_zero_area());
        assert!(!r.is_minimized());
        assert!(!r.is_fullscreen());
        assert!(!r.is_active());
        assert_eq!(r.window_id(), None);
        assert_eq!(r.window_number(), None);
        assert_eq!(r.bundle_id(), "pid:42");
    }

    #[test]
    fn test_active_requires_frontmost_app_and_main_window() {
        let mut main = standard("Main");
        main.main = Some(true);
        let app = AxApplicationWindows {
            pid: 42,
            frontmost: false,
            windows: vec![main.clone()],
        };
        assert!(!source(false).records_from_application(app)[0].is_active());

        let app = AxApplicationWindows {
            pid: 42,
            frontmost: true,
            windows: vec![main, standard("Other")],
        };
        let records = source(false).records_from_application(app);
        assert!(records[0].is_active());
        assert!(!records[1].is_active());
    }

    #[test]
    fn test_window_number_and_flags_carried() {
        let mut entry = standard("Notes");
        entry.window_number = Some(3);
        entry.minimized = Some(true);
        entry.fullscreen = Some(true);
        let app = AxApplicationWindows {
            pid: 100,
            frontmost: false,
            windows: vec![entry],
        };

        let r = &source(false).records_from_application(app)[0];
        assert_eq!(r.window_number(), Some(3));
        assert!(r.is_minimized());
        assert!(r.is_fullscreen());
        assert_eq!(r.frame(), Rect::new(10.0, 20.0, 800.0, 600.0));
        assert_eq!(r.source(), SourceTag::Accessibility);
    }

    #[test]
    fn test_invalid_pid_application_dropped() {
        let app = AxApplicationWindows {
            pid: 0,
            frontmost: true,
            windows: vec![standard("Ghost")],
        };
        assert!(source(false).records_from_application(app).is_empty());
    }

    #[test]
    fn test_running_application_pids_is_sorted() {
        let pids = running_application_pids();
        assert!(pids.windows(2).all(|w| w[0] <= w[1]));
    }
}
