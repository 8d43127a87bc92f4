use crate::domain::assembly::AssemblyError;
use crate::domain::playback::PlaybackError;
use crate::domain::script::ScriptError;
use crate::domain::tts::TtsServiceError;
use crate::error::AppError;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Synthesis(#[from] TtsServiceError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid track record: {0}")]
    InvalidRecord(String),
}

/// Never fatal: the pipeline keeps the unmastered audio on any of these
#[derive(Debug, thiserror::Error)]
pub enum MasteringError {
    #[error("mastering timed out after {0:?}")]
    Timeout(Duration),
    #[error("mastering service error: {0}")]
    Service(String),
    #[error("invalid mastering response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("track {0} not found")]
    NotFound(Uuid),
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt track record: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => AppError::NotFound(format!("track {}", id)),
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl From<TrackError> for AppError {
    fn from(err: TrackError) -> Self {
        match err {
            TrackError::Script(e) => e.into(),
            TrackError::Synthesis(e) => e.into(),
            TrackError::Assembly(e) => e.into(),
            TrackError::Playback(e) => e.into(),
            TrackError::Storage(e) => e.into(),
            TrackError::InvalidRecord(msg) => AppError::Storage(msg),
        }
    }
}
