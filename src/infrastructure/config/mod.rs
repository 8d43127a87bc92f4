use crate::domain::assembly::PauseSettings;
use crate::domain::script::Speaker;
use crate::domain::track::MasteringSettings;
use crate::domain::tts::{OutputFormat, RetryPolicy};
use crate::domain::voice::{VoiceConfig, VoiceProfile, DEFAULT_VOICE_ID_A, DEFAULT_VOICE_ID_B};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // ElevenLabs
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub tts_model_id: String,
    pub tts_output_format: String,
    // Voices
    pub voice_id_a: String,
    pub voice_id_b: String,
    pub voice_stability: f32,
    pub voice_similarity_boost: f32,
    pub voice_style: f32,
    // Synthesis
    pub synthesis_max_attempts: u32,
    pub synthesis_retry_delay_ms: u64,
    pub synthesis_cache_enabled: bool,
    // Pause model
    pub pause_same_speaker_ms: u64,
    pub pause_speaker_change_ms: u64,
    // Mastering
    pub mastering_url: Option<String>,
    pub mastering_timeout_secs: u64,
    pub mastering_target_lufs: f32,
    // Storage
    pub tracks_dir: PathBuf,
    pub environment: Environment,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; `from_env` passes the process
    /// environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());
        // Unset or blank variables count as absent
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let config = Config {
            elevenlabs_api_key: optional("ELEVENLABS_API_KEY"),
            elevenlabs_base_url: var("ELEVENLABS_BASE_URL", "https://api.elevenlabs.io"),
            tts_model_id: var("TTS_MODEL_ID", "eleven_multilingual_v2"),
            tts_output_format: var("TTS_OUTPUT_FORMAT", "mp3_44100_128"),
            voice_id_a: var("VOICE_ID_A", DEFAULT_VOICE_ID_A),
            voice_id_b: var("VOICE_ID_B", DEFAULT_VOICE_ID_B),
            voice_stability: var("VOICE_STABILITY", "0.35").parse()?,
            voice_similarity_boost: var("VOICE_SIMILARITY_BOOST", "0.75").parse()?,
            voice_style: var("VOICE_STYLE", "0.55").parse()?,
            synthesis_max_attempts: var("SYNTHESIS_MAX_ATTEMPTS", "3").parse()?,
            synthesis_retry_delay_ms: var("SYNTHESIS_RETRY_DELAY_MS", "1000").parse()?,
            synthesis_cache_enabled: var("SYNTHESIS_CACHE_ENABLED", "false").to_lowercase()
                == "true",
            pause_same_speaker_ms: var("PAUSE_SAME_SPEAKER_MS", "300").parse()?,
            pause_speaker_change_ms: var("PAUSE_SPEAKER_CHANGE_MS", "250").parse()?,
            mastering_url: optional("MASTERING_URL"),
            mastering_timeout_secs: var("MASTERING_TIMEOUT_SECS", "30").parse()?,
            mastering_target_lufs: var("MASTERING_TARGET_LUFS", "-14.0").parse()?,
            tracks_dir: PathBuf::from(var("TRACKS_DIR", "./tracks")),
            environment: match var("ENVIRONMENT", "development").as_str() {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match var("LOG_FORMAT", "pretty").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        if config.synthesis_max_attempts == 0 {
            return Err("SYNTHESIS_MAX_ATTEMPTS must be at least 1".into());
        }
        if OutputFormat::parse(&config.tts_output_format).is_none() {
            return Err(format!(
                "TTS_OUTPUT_FORMAT must look like mp3_44100_128, got {}",
                config.tts_output_format
            )
            .into());
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::parse(&self.tts_output_format).unwrap_or_default()
    }

    pub fn voices(&self) -> VoiceConfig {
        let profile = |speaker, voice_id: &str| {
            VoiceProfile::new(speaker, voice_id).with_settings(
                self.voice_stability,
                self.voice_similarity_boost,
                self.voice_style,
            )
        };
        VoiceConfig::new(
            profile(Speaker::A, &self.voice_id_a),
            profile(Speaker::B, &self.voice_id_b),
        )
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.synthesis_max_attempts,
            delay: Duration::from_millis(self.synthesis_retry_delay_ms),
        }
    }

    pub fn pause_settings(&self) -> PauseSettings {
        PauseSettings {
            same_speaker: self.pause_same_speaker_ms as f64 / 1000.0,
            speaker_change: self.pause_speaker_change_ms as f64 / 1000.0,
            ..PauseSettings::default()
        }
    }

    pub fn mastering_settings(&self) -> MasteringSettings {
        MasteringSettings {
            target_lufs: self.mastering_target_lufs,
            timeout: Duration::from_secs(self.mastering_timeout_secs),
        }
    }
}
