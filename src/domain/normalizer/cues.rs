//! Bracketed stage directions: emotion cues and pause cues.

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::RngCore;
use regex::{Captures, Regex};

/// Any single bracketed cue, `(laughs)` or `[laughs]`, without nesting
pub(super) static BRACKETED_CUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\(\[]\s*([^\(\)\[\]]*?)\s*[\)\]]").unwrap());

/// Emotion cues with a spoken rendition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emotion {
    Laughs,
    Giggles,
    Chuckles,
    Sighs,
    Surprised,
    Excited,
    Thinking,
}

impl Emotion {
    pub fn parse(cue: &str) -> Option<Self> {
        match cue.trim().to_lowercase().as_str() {
            "laugh" | "laughs" | "laughing" => Some(Emotion::Laughs),
            "giggle" | "giggles" | "giggling" => Some(Emotion::Giggles),
            "chuckle" | "chuckles" | "chuckling" => Some(Emotion::Chuckles),
            "sigh" | "sighs" | "sighing" => Some(Emotion::Sighs),
            "surprise" | "surprised" => Some(Emotion::Surprised),
            "excite" | "excited" => Some(Emotion::Excited),
            "think" | "thinks" | "thinking" => Some(Emotion::Thinking),
            _ => None,
        }
    }

    /// Interjections the synthesis voice pronounces naturally.
    /// An empty bank means the cue is dropped without a replacement.
    pub fn expressions(&self) -> &'static [&'static str] {
        match self {
            Emotion::Laughs => &["haha", "hahaha", "ha ha"],
            Emotion::Giggles => &["hehe", "hee hee"],
            Emotion::Chuckles => &["heh", "heh heh"],
            Emotion::Sighs => &["haah", "uff"],
            Emotion::Surprised => &["arey", "oh", "arrey wah"],
            Emotion::Excited => &[],
            Emotion::Thinking => &["hmm", "umm", "hmm hmm"],
        }
    }
}

/// Pause cues the synthesis engine should hear as punctuation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseCue {
    /// Rendered as a comma
    Short,
    /// Rendered as an ellipsis
    Long,
}

impl PauseCue {
    pub fn parse(cue: &str) -> Option<Self> {
        let lowered = cue.trim().to_lowercase();
        let collapsed: String = lowered
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        match collapsed.as_str() {
            "micro pause" | "micropause" | "breath" | "breathes" | "breathing" | "pause"
            | "short pause" | "beat" => Some(PauseCue::Short),
            "thinking pause" | "long pause" | "dramatic pause" => Some(PauseCue::Long),
            _ => None,
        }
    }

    pub fn punctuation(&self) -> &'static str {
        match self {
            PauseCue::Short => ", ",
            PauseCue::Long => "... ",
        }
    }
}

/// Replace emotion cues with a randomly chosen interjection, padded with
/// spaces so it is voiced as its own unit. Pause cues are left for the
/// punctuation pass; every other cue is deleted.
pub(super) fn substitute_emotions(text: &str, rng: &mut dyn RngCore) -> String {
    BRACKETED_CUE
        .replace_all(text, |caps: &Captures| {
            let cue = &caps[1];
            if let Some(emotion) = Emotion::parse(cue) {
                match emotion.expressions().choose(rng) {
                    Some(expression) => format!(" {} ", expression),
                    None => " ".to_string(),
                }
            } else if PauseCue::parse(cue).is_some() {
                caps[0].to_string()
            } else {
                " ".to_string()
            }
        })
        .into_owned()
}
