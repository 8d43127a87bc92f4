use super::dto::GeneratedScript;
use super::error::ScriptError;
use serde::{Deserialize, Serialize};

/// One of the two voices in a dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    A,
    B,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::A => "A",
            Speaker::B => "B",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One turn of scripted speech, as produced by script generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: Speaker,
    pub raw_text: String,
}

impl DialogueLine {
    pub fn new(speaker: Speaker, raw_text: impl Into<String>) -> Self {
        Self {
            speaker,
            raw_text: raw_text.into(),
        }
    }
}

/// A dialogue line together with its synthesis-ready text
///
/// `cleaned_text` is always derived from `raw_text`; build a new value
/// instead of editing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedLine {
    pub speaker: Speaker,
    pub raw_text: String,
    pub cleaned_text: String,
}

/// A two-speaker dialogue script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub title: String,
    /// Display names, indexed by speaker (A first)
    pub speaker_names: [String; 2],
    pub lines: Vec<DialogueLine>,
}

impl Script {
    /// Build a script from the script-generation service's output.
    ///
    /// The first distinct speaker name becomes `Speaker::A`, the second
    /// `Speaker::B`.
    pub fn from_generated(generated: GeneratedScript) -> Result<Self, ScriptError> {
        if generated.script.is_empty() {
            return Err(ScriptError::Empty);
        }

        let mut names: Vec<String> = Vec::with_capacity(2);
        let mut lines = Vec::with_capacity(generated.script.len());

        for (index, line) in generated.script.into_iter().enumerate() {
            let name = line.speaker.trim();
            if name.is_empty() {
                return Err(ScriptError::MissingSpeaker(index));
            }

            let position = match names.iter().position(|n| n == name) {
                Some(position) => position,
                None if names.len() < 2 => {
                    names.push(name.to_string());
                    names.len() - 1
                }
                None => return Err(ScriptError::TooManySpeakers(name.to_string())),
            };

            let speaker = if position == 0 { Speaker::A } else { Speaker::B };
            lines.push(DialogueLine::new(speaker, line.text));
        }

        // A monologue still gets a placeholder name for B
        let name_b = names.get(1).cloned().unwrap_or_default();
        let name_a = names.swap_remove(0);

        Ok(Self {
            title: generated.title,
            speaker_names: [name_a, name_b],
            lines,
        })
    }

    /// Parse the script-generation service's JSON output
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let generated: GeneratedScript = serde_json::from_str(json)?;
        Self::from_generated(generated)
    }

    pub fn speaker_name(&self, speaker: Speaker) -> &str {
        match speaker {
            Speaker::A => &self.speaker_names[0],
            Speaker::B => &self.speaker_names[1],
        }
    }
}
