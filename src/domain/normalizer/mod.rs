//! Turns raw dialogue lines into text the synthesis voice pronounces
//! naturally.
//!
//! The passes run in a fixed order, each on the previous one's output:
//!
//! 1. exclamation softening after multi-word proper nouns
//! 2. emotion cue substitution (unknown cues are dropped)
//! 3. year spelling
//! 4. pause cues to punctuation
//! 5. comma cleanup
//! 6. ellipsis cleanup
//! 7. residual bracket strip
//! 8. whitespace normalization
//!
//! A later pass can expose a pattern an earlier pass handles (a stripped cue
//! joining two capitalized words, a removed marker leaving `,,`), so the
//! whole sequence is repeated until the text stops changing. That is what
//! makes `normalize` idempotent.

pub mod cues;
pub mod numerals;
mod punctuation;

pub use cues::{Emotion, PauseCue};
pub use numerals::year_to_words;

use crate::domain::script::{DialogueLine, NormalizedLine};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::panic::{catch_unwind, AssertUnwindSafe};

const MAX_ROUNDS: usize = 8;

fn apply_passes(text: &str, rng: &mut dyn RngCore) -> String {
    let text = punctuation::soften_exclamations(text);
    let text = cues::substitute_emotions(&text, rng);
    let text = numerals::spell_years(&text);
    let text = punctuation::translate_pause_cues(&text);
    let text = punctuation::discipline_commas(&text);
    let text = punctuation::discipline_ellipses(&text);
    let text = punctuation::strip_residual_markers(&text);
    punctuation::normalize_whitespace(&text)
}

/// Normalize one line using the given random source for interjection choice.
///
/// Never fails: if a pass panics, the input comes back unchanged so the
/// synthesis call downstream still happens.
pub fn normalize_with(line: &str, rng: &mut dyn RngCore) -> String {
    if line.trim().is_empty() {
        return String::new();
    }

    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut current = apply_passes(line, rng);
        for _ in 1..MAX_ROUNDS {
            let next = apply_passes(&current, rng);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }));

    match result {
        Ok(cleaned) => cleaned,
        Err(_) => {
            tracing::warn!(
                text_length = line.len(),
                "Normalization pass panicked, using raw text"
            );
            line.to_string()
        }
    }
}

/// Text normalizer with its own seedable random source
pub struct TextNormalizer {
    rng: ChaCha20Rng,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Reproducible normalizer: same seed, same interjections
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn normalize(&mut self, line: &str) -> String {
        normalize_with(line, &mut self.rng)
    }

    /// Derive a fresh normalized line from a dialogue line
    pub fn normalize_line(&mut self, line: &DialogueLine) -> NormalizedLine {
        NormalizedLine {
            speaker: line.speaker,
            raw_text: line.raw_text.clone(),
            cleaned_text: self.normalize(&line.raw_text),
        }
    }

    pub fn normalize_script(&mut self, lines: &[DialogueLine]) -> Vec<NormalizedLine> {
        lines.iter().map(|line| self.normalize_line(line)).collect()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
