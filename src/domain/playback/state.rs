use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum PlaybackStatus {
    Stopped,
    Playing,
    Paused,
    /// Reached the end of the track naturally
    Ended,
    Failed(String),
}

/// Snapshot published to observers on every tick and transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    pub is_playing: bool,
    /// Seconds, always within `[0, duration]`
    pub current_time: f64,
    pub duration: f64,
    pub volume: f32,
    pub muted: bool,
    pub speed: f32,
    /// Output level from the analysis stage
    pub level: f32,
}

impl PlaybackState {
    pub fn set_status(&mut self, status: PlaybackStatus) {
        self.is_playing = status == PlaybackStatus::Playing;
        if !self.is_playing {
            self.level = 0.0;
        }
        self.status = status;
    }

    /// Gain actually applied to the output
    pub fn effective_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            status: PlaybackStatus::Stopped,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            muted: false,
            speed: 1.0,
            level: 0.0,
        }
    }
}
