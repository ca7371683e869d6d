//! Persistent window-to-display affinity.
//!
//! The cache is a fallback for windows without usable live geometry. It is
//! read before each snapshot's assignment and updated once at the end, only
//! from windows whose display was established by overlap this cycle.

pub mod errors;
pub mod persistence;
pub mod types;

pub use errors::AffinityError;
pub use persistence::{AffinityStore, affinity_file_path};
pub use types::{AffinityCache, AffinityUpdate};

/// Environment lock for tests that point the store at a temp file.
#[doc(hidden)]
pub mod test_helpers {
    use std::sync::Mutex;

    use super::persistence::AFFINITY_FILE_ENV;

    /// Mutex to serialize tests that modify `WINDOCK_AFFINITY_FILE`.
    pub static AFFINITY_FILE_ENV_LOCK: Mutex<()> = Mutex::new(());

    /// RAII guard that removes `WINDOCK_AFFINITY_FILE` on drop.
    pub struct AffinityFileEnvGuard;

    impl AffinityFileEnvGuard {
        pub fn new(path: &std::path::Path) -> Self {
            // SAFETY: Caller must hold AFFINITY_FILE_ENV_LOCK to serialize access
            // from Rust test code.
            unsafe { std::env::set_var(AFFINITY_FILE_ENV, path) };
            Self
        }
    }

    impl Drop for AffinityFileEnvGuard {
        fn drop(&mut self) {
            // SAFETY: Caller holds AFFINITY_FILE_ENV_LOCK for the guard's lifetime.
            unsafe { std::env::remove_var(AFFINITY_FILE_ENV) };
        }
    }
}
