use crate::errors::WindockError;

/// Cache I/O failures. Never surfaced by a snapshot; only `windock cache`
/// maintenance commands report them.
#[derive(Debug, thiserror::Error)]
pub enum AffinityError {
    #[error("Failed to save affinity cache to '{path}': {source}")]
    SaveFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to serialize affinity cache: {message}")]
    SerializeFailed { message: String },

    #[error("Failed to remove affinity cache '{path}': {source}")]
    ClearFailed {
        path: String,
        source: std::io::Error,
    },
}

impl WindockError for AffinityError {
    fn error_code(&self) -> &'static str {
        match self {
            AffinityError::SaveFailed { .. } => "AFFINITY_SAVE_FAILED",
            AffinityError::SerializeFailed { .. } => "AFFINITY_SERIALIZE_FAILED",
            AffinityError::ClearFailed { .. } => "AFFINITY_CLEAR_FAILED",
        }
    }
}
