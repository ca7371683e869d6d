//! Window sources and the OS collaborators they depend on.
//!
//! Two independent sources observe the desktop each snapshot:
//! - [`GeometrySource`]: the window server's on-screen list (reliable ids
//!   and frames, blind to minimized windows)
//! - [`AccessibilitySource`]: each application's accessibility tree (sees
//!   minimized windows, often lacks ids and live frames)
//!
//! [`collect_sources`] runs both and degrades any failure to an empty list.

pub mod accessibility;
pub mod bundle;
pub mod errors;
pub mod geometry;
pub mod handler;
#[cfg(target_os = "macos")]
mod macos;
pub mod permissions;
pub mod traits;

pub use accessibility::AccessibilitySource;
pub use bundle::{BundleResolver, ProcessBundleResolver};
pub use errors::CollectError;
pub use geometry::GeometrySource;
pub use handler::{CollectedRecords, collect_sources};
pub use permissions::{AccessibilityPermission, SystemPermission};
pub use traits::WindowSource;

/// Fake sources for tests and for driving the engine without OS access.
#[doc(hidden)]
pub mod test_helpers {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::errors::CollectError;
    use super::permissions::AccessibilityPermission;
    use super::traits::WindowSource;
    use crate::window::{RawWindowRecord, SourceTag};

    /// Source that replays a fixed list, or fails with a fixed error.
    pub struct StaticSource {
        tag: SourceTag,
        records: Vec<RawWindowRecord>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl StaticSource {
        pub fn new(tag: SourceTag, records: Vec<RawWindowRecord>) -> Self {
            Self {
                tag,
                records,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(tag: SourceTag) -> Self {
            Self {
                tag,
                records: Vec::new(),
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl WindowSource for StaticSource {
        fn tag(&self) -> SourceTag {
            self.tag
        }

        fn collect(&self) -> Result<Vec<RawWindowRecord>, CollectError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CollectError::EnumerationFailed {
                    source_name: self.tag.as_str(),
                    message: "static failure".to_string(),
                });
            }
            Ok(self.records.clone())
        }
    }

    /// Permission signal with a fixed answer.
    pub struct FixedPermission(pub bool);

    impl AccessibilityPermission for FixedPermission {
        fn is_trusted(&self) -> bool {
            self.0
        }
    }
}
