use crate::domain::script::Speaker;
use serde::{Deserialize, Serialize};

pub const DEFAULT_VOICE_ID_A: &str = "mCQMfsqGDT6IDkEKR20a";
pub const DEFAULT_VOICE_ID_B: &str = "2zRM7PkgwBPiau2jvVXc";

/// Voice settings for one speaker.
///
/// Fixed for the whole session: varying them per line makes the two voices
/// drift audibly between turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    pub speaker: Speaker,
    pub voice_id: String,
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub speaker_boost: bool,
}

impl VoiceProfile {
    pub fn new(speaker: Speaker, voice_id: impl Into<String>) -> Self {
        Self {
            speaker,
            voice_id: voice_id.into(),
            stability: 0.35,
            similarity_boost: 0.75,
            style: 0.55,
            speaker_boost: true,
        }
    }

    /// Clamp every parameter into the service's accepted range
    pub fn with_settings(mut self, stability: f32, similarity_boost: f32, style: f32) -> Self {
        self.stability = stability.clamp(0.0, 1.0);
        self.similarity_boost = similarity_boost.clamp(0.0, 1.0);
        self.style = style.clamp(0.0, 1.0);
        self
    }
}

/// Speaker-indexed voice configuration, passed explicitly to whoever needs it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    pub a: VoiceProfile,
    pub b: VoiceProfile,
}

impl VoiceConfig {
    pub fn new(a: VoiceProfile, b: VoiceProfile) -> Self {
        Self { a, b }
    }

    pub fn for_speaker(&self, speaker: Speaker) -> &VoiceProfile {
        match speaker {
            Speaker::A => &self.a,
            Speaker::B => &self.b,
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            a: VoiceProfile::new(Speaker::A, DEFAULT_VOICE_ID_A),
            b: VoiceProfile::new(Speaker::B, DEFAULT_VOICE_ID_B),
        }
    }
}
