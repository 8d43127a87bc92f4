use serde::{Deserialize, Serialize};

/// Main application error type
///
/// Keeps "not configured" apart from "rejected by service": the first is an
/// operator fix, the second may clear up on its own.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Rejected by service: {0}")]
    Rejected(String),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Invalid script: {0}")]
    InvalidScript(String),

    #[error("Audio decode failed: {0}")]
    Decode(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error summary handed to the UI layer
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: String,
    pub message: String,
}

impl AppError {
    /// Stable machine-readable category for this error
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotConfigured(_) => "not_configured",
            Self::Rejected(_) => "rejected",
            Self::Synthesis(_) => "synthesis",
            Self::InvalidScript(_) => "invalid_script",
            Self::Decode(_) => "decode",
            Self::Playback(_) => "playback",
            Self::Storage(_) => "storage",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the operator can fix this by changing configuration
    pub fn is_operator_fixable(&self) -> bool {
        matches!(self, Self::NotConfigured(_))
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            kind: self.kind().to_string(),
            message: self.to_string(),
        }
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
