use std::path::Path;
use std::sync::Mutex;

use sysinfo::{Pid as SysinfoPid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tracing::debug;

/// Maps an owning process to its application bundle identifier.
///
/// Injected into both collectors so tests can supply fixed answers.
pub trait BundleResolver: Send + Sync {
    fn bundle_id(&self, pid: i32) -> Option<String>;
}

/// Resolves bundle identifiers from the process executable path.
///
/// Resolution order:
/// 1. `CFBundleIdentifier` of the enclosing `.app` bundle (macOS)
/// 2. The `.app` bundle's file stem (e.g. `"Safari"`)
/// 3. The process name
pub struct ProcessBundleResolver {
    system: Mutex<System>,
}

impl ProcessBundleResolver {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for ProcessBundleResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl BundleResolver for ProcessBundleResolver {
    fn bundle_id(&self, pid: i32) -> Option<String> {
        let pid_u32 = u32::try_from(pid).ok()?;
        let pid_obj = SysinfoPid::from_u32(pid_u32);

        let mut system = match self.system.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid_obj]),
            true,
            ProcessRefreshKind::nothing().with_exe(UpdateKind::OnlyIfNotSet),
        );

        let Some(process) = system.process(pid_obj) else {
            debug!(event = "core.collect.bundle_process_missing", pid = pid);
            return None;
        };

        let process_name = process.name().to_string_lossy().to_string();
        let resolved = match process.exe().and_then(bundle_root) {
            Some(root) => bundle_identifier_at(root).or_else(|| bundle_stem(root)),
            None => None,
        };

        resolved.or_else(|| (!process_name.is_empty()).then_some(process_name))
    }
}

/// Innermost `.app` directory containing `exe`.
pub fn bundle_root(exe: &Path) -> Option<&Path> {
    exe.ancestors()
        .skip(1)
        .find(|p| p.extension().is_some_and(|ext| ext == "app"))
}

fn bundle_stem(root: &Path) -> Option<String> {
    root.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.is_empty())
}

#[cfg(target_os = "macos")]
fn bundle_identifier_at(root: &Path) -> Option<String> {
    super::macos::bundle_identifier_at(root)
}

#[cfg(not(target_os = "macos"))]
fn bundle_identifier_at(_root: &Path) -> Option<String> {
    None
}
