use serde::{Deserialize, Serialize};

/// Output of the script-generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedScript {
    pub title: String,
    pub script: Vec<GeneratedLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedLine {
    pub speaker: String,
    pub text: String,
}
