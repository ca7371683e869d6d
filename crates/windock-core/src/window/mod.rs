//! Window records at each stage of a snapshot.
//!
//! - [`RawWindowRecord`]: one observation from one source, immutable
//! - [`MergedWindowRecord`]: one per real window after grouping and merging
//! - [`WindowInfo`]: a merged record attributed to a display

pub mod title;
pub mod types;

pub use title::normalize_title;
pub use types::{AssignmentSource, MergedWindowRecord, RawWindowRecord, SourceTag, WindowInfo};
