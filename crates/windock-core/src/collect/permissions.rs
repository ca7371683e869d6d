/// Whether this process may read other applications' accessibility trees.
///
/// When the answer is `false` the accessibility source is skipped and the
/// snapshot is built from window-server data alone.
pub trait AccessibilityPermission: Send + Sync {
    fn is_trusted(&self) -> bool;
}

/// Asks the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPermission;

impl AccessibilityPermission for SystemPermission {
    #[cfg(target_os = "macos")]
    fn is_trusted(&self) -> bool {
        // SAFETY: AXIsProcessTrusted takes no arguments and returns false
        // when the process lacks accessibility permission (does not crash).
        unsafe { accessibility_sys::AXIsProcessTrusted() }
    }

    #[cfg(not(target_os = "macos"))]
    fn is_trusted(&self) -> bool {
        false
    }
}
