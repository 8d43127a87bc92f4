use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("script has no lines")]
    Empty,
    #[error("line {0} has no speaker")]
    MissingSpeaker(usize),
    #[error("script has more than two speakers: {0}")]
    TooManySpeakers(String),
    #[error("malformed script: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<ScriptError> for AppError {
    fn from(err: ScriptError) -> Self {
        AppError::InvalidScript(err.to_string())
    }
}
