//! # Configuration System
//!
//! Hierarchical TOML configuration for windock.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.windock/config.toml`
//! 3. **Project config** - `./.windock/config.toml`
//! 4. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.windock/config.toml
//! [geometry]
//! min_width = 60
//! min_height = 60
//!
//! [matching]
//! iou_threshold = 0.75
//!
//! [display]
//! min_overlap_percent = 25.0
//! default_display_id = 1
//!
//! [cache]
//! path = "/Users/me/Library/Caches/windock/affinity.json"
//! ```
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use windock_core::config::WindockConfig;
//!
//! fn example() -> Result<(), windock_core::errors::ConfigError> {
//!     let config = WindockConfig::load_hierarchy()?;
//!     let threshold = config.matching.iou_threshold();
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use types::{
    AccessibilityConfig, CacheConfig, DisplayConfig, GeometryConfig, MatchingConfig,
    WindockConfig,
};
pub use validation::validate_config;

impl WindockConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
