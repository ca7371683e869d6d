use tracing::{debug, info, warn};

use super::errors::DisplayError;
use super::types::{DisplayInfo, DisplayLayout};
#[cfg(target_os = "macos")]
use crate::geometry::Rect;

/// Source of the connected display list.
pub trait DisplayProvider: Send + Sync {
    fn layout(&self) -> Result<DisplayLayout, DisplayError>;
}

/// Enumerates physical monitors through `xcap`.
///
/// Monitor bounds stand in for the visible region; menu bar and dock
/// insets are not subtracted.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDisplays;

impl DisplayProvider for SystemDisplays {
    fn layout(&self) -> Result<DisplayLayout, DisplayError> {
        info!(event = "core.display.list_started");
        let displays = enumerate_monitors()?;
        let layout = DisplayLayout::new(displays);
        if layout.primary.is_none() && !layout.is_empty() {
            warn!(
                event = "core.display.primary_unknown",
                count = layout.displays.len()
            );
        }
        info!(
            event = "core.display.list_completed",
            count = layout.displays.len(),
            primary = ?layout.primary
        );
        Ok(layout)
    }
}

#[cfg(target_os = "macos")]
fn enumerate_monitors() -> Result<Vec<DisplayInfo>, DisplayError> {
    let monitors = xcap::Monitor::all().map_err(|e| DisplayError::EnumerationFailed {
        message: e.to_string(),
    })?;

    let mut skipped_count = 0;
    let displays: Vec<DisplayInfo> = monitors
        .into_iter()
        .enumerate()
        .filter_map(|(idx, m)| {
            let bounds = (|| -> Result<(u32, i32, i32, u32, u32), xcap::XCapError> {
                Ok((m.id()?, m.x()?, m.y()?, m.width()?, m.height()?))
            })();
            let (id, x, y, width, height) = match bounds {
                Ok(bounds) => bounds,
                Err(e) => {
                    debug!(
                        event = "core.display.property_access_failed",
                        monitor_index = idx,
                        error = %e
                    );
                    skipped_count += 1;
                    return None;
                }
            };
            let name = m.name().unwrap_or_else(|_| format!("Display {}", id));
            let is_primary = m.is_primary().unwrap_or(false);
            Some(DisplayInfo::new(
                id,
                name,
                Rect::new(
                    f64::from(x),
                    f64::from(y),
                    f64::from(width),
                    f64::from(height),
                ),
                is_primary,
            ))
        })
        .collect();

    if skipped_count > 0 {
        warn!(
            event = "core.display.list_incomplete",
            skipped_count = skipped_count,
            returned_count = displays.len()
        );
    }

    Ok(displays)
}

#[cfg(not(target_os = "macos"))]
fn enumerate_monitors() -> Result<Vec<DisplayInfo>, DisplayError> {
    debug!(event = "core.display.unsupported_platform");
    Err(DisplayError::Unsupported)
}
