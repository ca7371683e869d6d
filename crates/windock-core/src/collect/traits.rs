//! Window source trait definition.

use super::errors::CollectError;
use crate::window::{RawWindowRecord, SourceTag};

/// A facility that reports the windows it can see right now.
///
/// Implementations hold no state across calls. Both sources of a snapshot
/// run concurrently, hence `Send + Sync`.
pub trait WindowSource: Send + Sync {
    /// Which source this is; every record it returns carries this tag.
    fn tag(&self) -> SourceTag;

    /// Enumerate the windows currently visible to this source.
    ///
    /// Per-attribute read failures are absorbed into defaults; an `Err`
    /// means the source as a whole is unavailable.
    fn collect(&self) -> Result<Vec<RawWindowRecord>, CollectError>;
}
