//! windock-core: deduplicated, display-attributed window inventory
//!
//! Reconciles two imperfect views of the desktop (the window server's
//! on-screen list and each application's accessibility tree) into one
//! authoritative list of real windows, each attributed to exactly one
//! physical display.
//!
//! # Main Entry Points
//!
//! - [`inventory`] - The snapshot engine ([`WindowInventory`])
//! - [`collect`] - Window sources and the permission/bundle collaborators
//! - [`matching`] - Cross-source linking, grouping and merging
//! - [`display`] - Display layout and display assignment
//! - [`affinity`] - Persistent window-to-display affinity cache
//! - [`config`] - Configuration management

pub mod affinity;
pub mod collect;
pub mod config;
pub mod display;
pub mod errors;
pub mod events;
pub mod geometry;
pub mod inventory;
pub mod logging;
pub mod matching;
pub mod window;

// Re-export commonly used types at crate root for convenience
pub use affinity::{AffinityCache, AffinityStore};
pub use config::WindockConfig;
pub use display::{DisplayInfo, DisplayLayout, DisplayPolicy};
pub use geometry::Rect;
pub use inventory::{Snapshot, WindowInventory, render_report};
pub use window::{
    AssignmentSource, MergedWindowRecord, RawWindowRecord, SourceTag, WindowInfo,
};

// Re-export logging initialization
pub use logging::init_logging;
