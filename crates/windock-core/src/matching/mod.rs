//! Turning the raw record pool into one record per real window.
//!
//! Pipeline: [`link_sources`] enriches accessibility records with window
//! ids, [`group_records`] partitions the pool into same-window classes, and
//! [`merge_groups`] collapses each class into a [`MergedWindowRecord`].
//!
//! The heuristic parts are delegated to a [`MatchPolicy`] so thresholds can
//! be swapped without touching the pipeline.
//!
//! [`MergedWindowRecord`]: crate::window::MergedWindowRecord

pub mod grouper;
pub mod linker;
pub mod merger;
pub mod policy;

pub use grouper::{GroupRule, WindowGroup, group_records};
pub use linker::link_sources;
pub use merger::{compare_candidates, merge_group, merge_groups, score_record};
pub use policy::{IouMatchPolicy, MatchPolicy};
