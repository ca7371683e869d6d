//! The snapshot engine.
//!
//! [`WindowInventory::snapshot`] runs one complete cycle: collect both
//! sources, link, group, merge, assign displays, fold the earned cache
//! updates in, persist them off the critical path, and sort.

pub mod engine;
pub mod report;
pub mod sequencer;

pub use engine::{Snapshot, WindowInventory, WindowInventoryBuilder};
pub use report::render_report;
pub use sequencer::sequence;
