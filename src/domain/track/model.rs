use super::error::TrackError;
use crate::domain::assembly::SegmentTiming;
use crate::domain::script::{NormalizedLine, Speaker};
use crate::infrastructure::audio::DecodedAudio;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything needed to reload a track and recompute its timings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub speaker_names: [String; 2],
    pub lines: Vec<NormalizedLine>,
    pub audio_base64: String,
    /// Unmastered per-line byte lengths; absent on older records
    #[serde(default)]
    pub chunk_byte_lengths: Option<Vec<usize>>,
    pub timing_seed: u64,
    pub output_format: String,
    #[serde(default)]
    pub mastered: bool,
}

impl TrackRecord {
    pub fn audio_bytes(&self) -> Result<Vec<u8>, TrackError> {
        STANDARD
            .decode(&self.audio_base64)
            .map_err(|e| TrackError::InvalidRecord(format!("audio is not valid base64: {}", e)))
    }

    pub fn speaker_name(&self, speaker: Speaker) -> &str {
        match speaker {
            Speaker::A => &self.speaker_names[0],
            Speaker::B => &self.speaker_names[1],
        }
    }

    pub fn summary(&self) -> TrackSummary {
        TrackSummary {
            id: self.id,
            title: self.title.clone(),
            created_at: self.created_at,
            line_count: self.lines.len(),
            mastered: self.mastered,
        }
    }
}

/// Listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub line_count: usize,
    pub mastered: bool,
}

/// A playable track: the stored record, its decoded audio and the timings
/// rescaled to the decoded duration
#[derive(Debug, Clone)]
pub struct Track {
    pub record: TrackRecord,
    pub audio: DecodedAudio,
    pub timings: Vec<SegmentTiming>,
}

impl Track {
    pub fn duration(&self) -> f64 {
        self.audio.duration
    }

    pub fn line(&self, index: usize) -> Option<&NormalizedLine> {
        self.record.lines.get(index)
    }
}
