use crate::errors::WindockError;

#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("Failed to enumerate displays: {message}")]
    EnumerationFailed { message: String },

    #[error("Display enumeration is not available on this platform")]
    Unsupported,
}

impl WindockError for DisplayError {
    fn error_code(&self) -> &'static str {
        match self {
            DisplayError::EnumerationFailed { .. } => "DISPLAY_ENUMERATION_FAILED",
            DisplayError::Unsupported => "DISPLAY_UNSUPPORTED",
        }
    }
}
