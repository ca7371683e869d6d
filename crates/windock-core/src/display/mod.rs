//! Connected displays and window-to-display attribution.

pub mod assigner;
pub mod errors;
pub mod provider;
pub mod types;

pub use assigner::{Assignment, assign_displays, best_display};
pub use errors::DisplayError;
pub use provider::{DisplayProvider, SystemDisplays};
pub use types::{DisplayInfo, DisplayLayout, DisplayPolicy};

/// Fixed display layouts for tests and offline runs.
#[doc(hidden)]
pub mod test_helpers {
    use super::errors::DisplayError;
    use super::provider::DisplayProvider;
    use super::types::DisplayLayout;

    /// Provider that always reports the same layout, or always fails.
    pub struct StaticDisplays {
        layout: Option<DisplayLayout>,
    }

    impl StaticDisplays {
        pub fn new(layout: DisplayLayout) -> Self {
            Self {
                layout: Some(layout),
            }
        }

        pub fn failing() -> Self {
            Self { layout: None }
        }
    }

    impl DisplayProvider for StaticDisplays {
        fn layout(&self) -> Result<DisplayLayout, DisplayError> {
            self.layout
                .clone()
                .ok_or_else(|| DisplayError::EnumerationFailed {
                    message: "static failure".to_string(),
                })
        }
    }
}
