use crate::errors::WindockError;

#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error(
        "Accessibility permission required: enable in System Settings > Privacy & Security > Accessibility"
    )]
    AccessibilityPermissionDenied,

    #[error("Failed to enumerate windows from {source_name} source: {message}")]
    EnumerationFailed {
        source_name: &'static str,
        message: String,
    },

    #[error("The {source_name} source is not available on this platform")]
    Unsupported { source_name: &'static str },
}

impl WindockError for CollectError {
    fn error_code(&self) -> &'static str {
        match self {
            CollectError::AccessibilityPermissionDenied => "COLLECT_ACCESSIBILITY_DENIED",
            CollectError::EnumerationFailed { .. } => "COLLECT_ENUMERATION_FAILED",
            CollectError::Unsupported { .. } => "COLLECT_UNSUPPORTED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, CollectError::AccessibilityPermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_error() {
        let error = CollectError::AccessibilityPermissionDenied;
        assert!(error.to_string().contains("Accessibility permission"));
        assert_eq!(error.error_code(), "COLLECT_ACCESSIBILITY_DENIED");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_enumeration_failed_error() {
        let error = CollectError::EnumerationFailed {
            source_name: "geometry",
            message: "window list unavailable".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to enumerate windows from geometry source: window list unavailable"
        );
        assert_eq!(error.error_code(), "COLLECT_ENUMERATION_FAILED");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_unsupported_error() {
        let error = CollectError::Unsupported {
            source_name: "accessibility",
        };
        assert_eq!(
            error.to_string(),
            "The accessibility source is not available on this platform"
        );
        assert_eq!(error.error_code(), "COLLECT_UNSUPPORTED");
    }
}
