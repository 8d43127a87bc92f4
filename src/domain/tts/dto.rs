use crate::domain::voice::VoiceProfile;
use serde::{Deserialize, Serialize};

/// Body of a text-to-speech request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    pub model_id: String,
    pub voice_settings: VoiceSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl From<&VoiceProfile> for VoiceSettings {
    fn from(profile: &VoiceProfile) -> Self {
        Self {
            stability: profile.stability,
            similarity_boost: profile.similarity_boost,
            style: profile.style,
            use_speaker_boost: profile.speaker_boost,
        }
    }
}

impl SpeechRequest {
    pub fn new(text: &str, model_id: &str, profile: &VoiceProfile) -> Self {
        Self {
            text: text.to_string(),
            model_id: model_id.to_string(),
            voice_settings: VoiceSettings::from(profile),
        }
    }
}
