use crate::domain::script::NormalizedLine;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Pause model parameters, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PauseSettings {
    /// Base pause when the same speaker continues
    pub same_speaker: f64,
    /// Base pause when the other speaker takes over
    pub speaker_change: f64,
    /// Range for an interrupted line handing off to the next
    pub handoff_min: f64,
    pub handoff_max: f64,
    /// Maximum random deviation added to every non-handoff pause
    pub jitter: f64,
    /// Hard bounds on any pause
    pub min: f64,
    pub max: f64,
}

impl Default for PauseSettings {
    fn default() -> Self {
        Self {
            same_speaker: 0.30,
            speaker_change: 0.25,
            handoff_min: 0.08,
            handoff_max: 0.11,
            jitter: 0.05,
            min: 0.08,
            max: 0.60,
        }
    }
}

const INTERRUPTION_MARKERS: [&str; 4] = ["—", "–", "--", "-"];

fn ends_interrupted(text: &str) -> bool {
    let text = text.trim_end();
    INTERRUPTION_MARKERS.iter().any(|m| text.ends_with(m))
}

fn starts_interrupting(text: &str) -> bool {
    let text = text.trim_start();
    INTERRUPTION_MARKERS.iter().any(|m| text.starts_with(m))
}

/// Conversation-position pacing: brisk open, weighted middle, slow close
fn position_factor(position: f64) -> f64 {
    if position < 0.2 {
        0.85
    } else if (0.4..=0.6).contains(&position) {
        1.15
    } else if position >= 0.8 {
        1.2
    } else {
        1.0
    }
}

/// Decides how long the silence between two consecutive lines is assumed
/// to last
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PauseModel {
    pub settings: PauseSettings,
}

impl PauseModel {
    pub fn new(settings: PauseSettings) -> Self {
        Self { settings }
    }

    /// Pause between `lines[index]` and `lines[index + 1]`
    pub fn pause_after(
        &self,
        index: usize,
        lines: &[NormalizedLine],
        rng: &mut dyn RngCore,
    ) -> f64 {
        let s = &self.settings;
        let (Some(current), Some(next)) = (lines.get(index), lines.get(index + 1)) else {
            return 0.0;
        };

        if ends_interrupted(&current.raw_text) && starts_interrupting(&next.raw_text) {
            return rng.gen_range(s.handoff_min..=s.handoff_max).clamp(s.min, s.max);
        }

        let base = if current.speaker == next.speaker {
            s.same_speaker
        } else {
            s.speaker_change
        };

        let position = index as f64 / lines.len() as f64;
        let jitter = if s.jitter > 0.0 {
            rng.gen_range(-s.jitter..=s.jitter)
        } else {
            0.0
        };

        (base * position_factor(position) + jitter).clamp(s.min, s.max)
    }
}
