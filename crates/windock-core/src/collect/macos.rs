//! macOS bindings for both window sources.
//!
//! Everything here converts CoreFoundation values into plain Rust entries;
//! filtering and record construction live in the platform-neutral modules.

use std::ffi::c_void;
use std::path::Path;
use std::ptr;

use accessibility_sys::{
    AXError, AXUIElementCopyAttributeValue, AXUIElementCreateApplication, AXUIElementRef,
    AXUIElementSetMessagingTimeout, AXValueGetTypeID, AXValueGetValue, AXValueRef,
    kAXErrorAPIDisabled, kAXErrorNoValue, kAXErrorSuccess, kAXFrontmostAttribute, kAXMainAttribute,
    kAXMinimizedAttribute, kAXPositionAttribute, kAXRoleAttribute, kAXSizeAttribute,
    kAXSubroleAttribute, kAXTitleAttribute, kAXValueTypeCGPoint, kAXValueTypeCGSize,
    kAXWindowsAttribute,
};
use core_foundation::array::{CFArray, CFArrayGetTypeID, CFArrayRef};
use core_foundation::base::{CFGetTypeID, CFRelease, CFType, CFTypeRef, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::bundle::CFBundle;
use core_foundation::dictionary::{CFDictionary, CFDictionaryGetTypeID, CFDictionaryRef};
use core_foundation::number::CFNumber;
use core_foundation::string::{CFString, CFStringRef};
use core_foundation::url::CFURL;
use core_graphics::geometry::{CGPoint, CGRect, CGSize};
use core_graphics::window::{
    copy_window_info, kCGNullWindowID, kCGWindowAlpha, kCGWindowBounds, kCGWindowLayer,
    kCGWindowListExcludeDesktopElements, kCGWindowListOptionOnScreenOnly, kCGWindowName,
    kCGWindowNumber, kCGWindowOwnerName, kCGWindowOwnerPID,
};
use tracing::debug;

use super::accessibility::{AxApplicationWindows, AxWindowEntry};
use super::errors::CollectError;
use super::geometry::WindowServerEntry;
use crate::geometry::Rect;

const FULLSCREEN_ATTRIBUTE: &str = "AXFullScreen";
// Not exposed by every application; absent reads are expected.
const WINDOW_NUMBER_ATTRIBUTE: &str = "AXWindowNumber";

// =============================================================================
// Window server (CGWindowList)
// =============================================================================

pub(super) fn copy_onscreen_windows() -> Result<Vec<WindowServerEntry>, CollectError> {
    let options = kCGWindowListOptionOnScreenOnly | kCGWindowListExcludeDesktopElements;
    let list = copy_window_info(options, kCGNullWindowID).ok_or_else(|| {
        CollectError::EnumerationFailed {
            source_name: "geometry",
            message: "CGWindowListCopyWindowInfo returned no list".to_string(),
        }
    })?;

    let mut entries = Vec::with_capacity(list.len() as usize);
    for item in list.iter() {
        let raw = *item as CFDictionaryRef;
        if raw.is_null() {
            continue;
        }
        // SAFETY: every element of the window info array is a CFDictionary
        // owned by the array; wrap_under_get_rule retains it for our use.
        let dict: CFDictionary<CFString, CFType> = unsafe { CFDictionary::wrap_under_get_rule(raw) };

        let Some(number) = dict_number(&dict, unsafe { kCGWindowNumber }).and_then(|n| n.to_i64())
        else {
            debug!(event = "core.collect.geometry_entry_skipped", reason = "no_window_number");
            continue;
        };
        let Ok(number) = u32::try_from(number) else {
            continue;
        };

        entries.push(WindowServerEntry {
            number,
            owner_pid: dict_number(&dict, unsafe { kCGWindowOwnerPID })
                .and_then(|n| n.to_i64())
                .unwrap_or(0),
            owner_name: dict_string(&dict, unsafe { kCGWindowOwnerName }).unwrap_or_default(),
            title: dict_string(&dict, unsafe { kCGWindowName }).unwrap_or_default(),
            layer: dict_number(&dict, unsafe { kCGWindowLayer })
                .and_then(|n| n.to_i64())
                .unwrap_or(0),
            alpha: dict_number(&dict, unsafe { kCGWindowAlpha })
                .and_then(|n| n.to_f64())
                .unwrap_or(1.0),
            bounds: dict_bounds(&dict, unsafe { kCGWindowBounds }).unwrap_or(Rect::ZERO),
        });
    }

    Ok(entries)
}

fn dict_value(dict: &CFDictionary<CFString, CFType>, key: CFStringRef) -> Option<CFType> {
    // SAFETY: key is a static CFString constant exported by CoreGraphics.
    let key = unsafe { CFString::wrap_under_get_rule(key) };
    dict.find(&key).map(|value| (*value).clone())
}

fn dict_number(dict: &CFDictionary<CFString, CFType>, key: CFStringRef) -> Option<CFNumber> {
    dict_value(dict, key).and_then(|v| v.downcast::<CFNumber>())
}

fn dict_string(dict: &CFDictionary<CFString, CFType>, key: CFStringRef) -> Option<String> {
    dict_value(dict, key)
        .and_then(|v| v.downcast::<CFString>())
        .map(|s| s.to_string())
}

fn dict_bounds(dict: &CFDictionary<CFString, CFType>, key: CFStringRef) -> Option<Rect> {
    let value = dict_value(dict, key)?;
    let raw = value.as_CFTypeRef();
    // SAFETY: raw is a valid CFTypeRef kept alive by `value`.
    if unsafe { CFGetTypeID(raw) != CFDictionaryGetTypeID() } {
        return None;
    }
    // SAFETY: type checked above; get rule retains while `bounds` lives.
    let bounds: CFDictionary = unsafe { CFDictionary::wrap_under_get_rule(raw as CFDictionaryRef) };
    let rect: CGRect = CGRect::from_dict_representation(&bounds)?;
    Some(Rect::new(
        rect.origin.x,
        rect.origin.y,
        rect.size.width,
        rect.size.height,
    ))
}

// =============================================================================
// Accessibility (AXUIElement)
// =============================================================================

/// Owned application element, released on drop.
struct AxApplication(AXUIElementRef);

impl AxApplication {
    fn new(pid: i32) -> Option<Self> {
        // SAFETY: AXUIElementCreateApplication creates a +1 retained AXUIElementRef.
        let element = unsafe { AXUIElementCreateApplication(pid) };
        (!element.is_null()).then_some(Self(element))
    }
}

impl Drop for AxApplication {
    fn drop(&mut self) {
        // SAFETY: Release the app element (Create Rule — we own it).
        unsafe { CFRelease(self.0 as *mut c_void) };
    }
}

pub(super) fn copy_application_windows(
    pid: i32,
    timeout_secs: f32,
) -> Result<AxApplicationWindows, CollectError> {
    let app = AxApplication::new(pid).ok_or_else(|| CollectError::EnumerationFailed {
        source_name: "accessibility",
        message: format!("Failed to create AX element for PID {}", pid),
    })?;

    // SAFETY: app.0 is a valid AXUIElementRef we own.
    unsafe {
        AXUIElementSetMessagingTimeout(app.0, timeout_secs);
    }

    let windows_value = match ax_copy_attribute(app.0, kAXWindowsAttribute) {
        Ok(value) => value,
        Err(err) if err == kAXErrorAPIDisabled => {
            return Err(CollectError::AccessibilityPermissionDenied);
        }
        Err(err) => {
            return Err(CollectError::EnumerationFailed {
                source_name: "accessibility",
                message: format!("Failed to read windows of PID {} (AXError: {})", pid, err),
            });
        }
    };

    let raw = windows_value.as_CFTypeRef();
    // SAFETY: raw is kept alive by windows_value.
    if unsafe { CFGetTypeID(raw) != CFArrayGetTypeID() } {
        return Ok(AxApplicationWindows {
            pid,
            frontmost: false,
            windows: Vec::new(),
        });
    }
    // SAFETY: type checked above; get rule retains the array.
    let windows: CFArray<CFType> = unsafe { CFArray::wrap_under_get_rule(raw as CFArrayRef) };

    let frontmost = ax_bool(app.0, kAXFrontmostAttribute).unwrap_or(false);
    let mut entries = Vec::with_capacity(windows.len() as usize);

    for item in windows.iter() {
        let element = item.as_CFTypeRef() as AXUIElementRef;
        entries.push(AxWindowEntry {
            role: ax_string(element, kAXRoleAttribute),
            subrole: ax_string(element, kAXSubroleAttribute),
            title: ax_string(element, kAXTitleAttribute),
            position: ax_point(element),
            size: ax_size(element),
            minimized: ax_bool(element, kAXMinimizedAttribute),
            fullscreen: ax_bool(element, FULLSCREEN_ATTRIBUTE),
            main: ax_bool(element, kAXMainAttribute),
            window_number: ax_i64(element, WINDOW_NUMBER_ATTRIBUTE),
        });
    }

    Ok(AxApplicationWindows {
        pid,
        frontmost,
        windows: entries,
    })
}

fn ax_copy_attribute(element: AXUIElementRef, attribute: &str) -> Result<CFType, AXError> {
    let cf_attr = CFString::new(attribute);
    let mut value: CFTypeRef = ptr::null();

    // SAFETY: Standard AXUIElementCopyAttributeValue (Copy Rule: +1 retained on success).
    let result = unsafe {
        AXUIElementCopyAttributeValue(element, cf_attr.as_concrete_TypeRef(), &mut value)
    };

    if result != kAXErrorSuccess {
        return Err(result);
    }
    if value.is_null() {
        return Err(kAXErrorNoValue);
    }

    // SAFETY: value is a +1 retained CFTypeRef. wrap_under_create_rule takes ownership.
    Ok(unsafe { TCFType::wrap_under_create_rule(value) })
}

fn ax_string(element: AXUIElementRef, attribute: &str) -> Option<String> {
    ax_copy_attribute(element, attribute)
        .ok()?
        .downcast::<CFString>()
        .map(|s| s.to_string())
}

fn ax_bool(element: AXUIElementRef, attribute: &str) -> Option<bool> {
    ax_copy_attribute(element, attribute)
        .ok()?
        .downcast::<CFBoolean>()
        .map(bool::from)
}

fn ax_i64(element: AXUIElementRef, attribute: &str) -> Option<i64> {
    ax_copy_attribute(element, attribute)
        .ok()?
        .downcast::<CFNumber>()
        .and_then(|n| n.to_i64())
}

fn ax_value<T: Default>(element: AXUIElementRef, attribute: &str, value_type: u32) -> Option<T> {
    let value = ax_copy_attribute(element, attribute).ok()?;
    let raw = value.as_CFTypeRef();
    // SAFETY: raw is kept alive by `value`.
    if unsafe { CFGetTypeID(raw) != AXValueGetTypeID() } {
        return None;
    }
    let mut out = T::default();
    // SAFETY: raw is an AXValue; AXValueGetValue returns false on type mismatch
    // and otherwise writes exactly one T into `out`.
    let ok = unsafe {
        AXValueGetValue(
            raw as AXValueRef,
            value_type,
            &mut out as *mut T as *mut c_void,
        )
    };
    ok.then_some(out)
}

fn ax_point(element: AXUIElementRef) -> Option<(f64, f64)> {
    ax_value::<CGPoint>(element, kAXPositionAttribute, kAXValueTypeCGPoint).map(|p| (p.x, p.y))
}

fn ax_size(element: AXUIElementRef) -> Option<(f64, f64)> {
    ax_value::<CGSize>(element, kAXSizeAttribute, kAXValueTypeCGSize)
        .map(|s| (s.width, s.height))
}

// =============================================================================
// Bundles
// =============================================================================

pub(super) fn bundle_identifier_at(root: &Path) -> Option<String> {
    let url = CFURL::from_path(root, true)?;
    let bundle = CFBundle::new(url)?;
    let info = bundle.info_dictionary();
    let key = CFString::from_static_string("CFBundleIdentifier");
    info.find(&key)
        .and_then(|value| value.downcast::<CFString>())
        .map(|s| s.to_string())
        .filter(|id| !id.is_empty())
}
