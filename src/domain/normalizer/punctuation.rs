//! Punctuation passes: exclamations, pause cues, commas, ellipses, leftover
//! markers and whitespace.

use super::cues::{PauseCue, BRACKETED_CUE};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PROPER_NOUN_EXCLAMATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\p{Lu}[\p{L}'’]*(?:[ \t]+\p{Lu}[\p{L}'’]*)+)!+(\s|$)").unwrap()
});

static PAUSE_CUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[\(\[]\s*([^\(\)\[\]]*?)\s*[\)\]]\s*").unwrap());

static SPACE_BEFORE_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+,").unwrap());
static COMMA_AFTER_TERMINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.!?])\s*,").unwrap());
static COMMA_BEFORE_TERMINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([.!?;:])").unwrap());
static PROPER_NOUN_COMMA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([^.!?\s][ \t]+)(\p{Lu}\p{L}+),[ \t]+(\p{Lu}\p{L}+)\b").unwrap()
});
static NATIVE_WORD_COMMA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(kya|kyun|kyon|kaise|kaisa|kab|kahan|kaun|kitna|kitne|main|mai|hum|tum|aap|woh|wo|yeh|ye)\s*,",
    )
    .unwrap()
});
static REPEATED_COMMAS: Lazy<Regex> = Lazy::new(|| Regex::new(r",(?:\s*,)+").unwrap());
static LEADING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*,\s*").unwrap());
static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*$").unwrap());

static LONG_DOT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{4,}\s*").unwrap());
static GLUE_AFTER_CONNECTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(and|but|so|because|then|or|aur|lekin|par|toh|phir)[ \t]*\.\.\.[ \t]*(\p{L})")
        .unwrap()
});
static GLUE_BEFORE_CONNECTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\p{L})[ \t]*\.\.\.[ \t]+(and|but|so|because|then|aur|lekin|toh|phir)\b").unwrap()
});
static ELLIPSIS_THEN_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.\.\.[ \t]*,[ \t]*").unwrap());
static COMMA_THEN_ELLIPSIS: Lazy<Regex> = Lazy::new(|| Regex::new(r",[ \t]*\.\.\.").unwrap());

static STRAY_BRACKET: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\(\)\[\]\{\}]").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SPACE_BEFORE_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" ([,.!?;:])").unwrap());

/// Bound on pair-stripping rounds for nested brackets
const MAX_NESTING: usize = 16;

/// "Mumbai Indians!" → "Mumbai Indians." so a factual mention is not shouted
pub(super) fn soften_exclamations(text: &str) -> String {
    PROPER_NOUN_EXCLAMATION
        .replace_all(text, "${1}.${2}")
        .into_owned()
}

/// Short pause cues become a comma, long ones an ellipsis
pub(super) fn translate_pause_cues(text: &str) -> String {
    PAUSE_CUE
        .replace_all(text, |caps: &Captures| match PauseCue::parse(&caps[1]) {
            Some(cue) => cue.punctuation().to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Remove commas that are fine on the page but sound robotic when spoken
pub(super) fn discipline_commas(text: &str) -> String {
    let text = SPACE_BEFORE_COMMA.replace_all(text, ",");
    let text = COMMA_AFTER_TERMINAL.replace_all(&text, "${1} ");
    let text = COMMA_BEFORE_TERMINAL.replace_all(&text, "${1}");
    let text = PROPER_NOUN_COMMA.replace_all(&text, "${1}${2} ${3}");
    let text = NATIVE_WORD_COMMA.replace_all(&text, "${1}");
    let text = REPEATED_COMMAS.replace_all(&text, ",");
    let text = LEADING_COMMA.replace_all(&text, "");
    TRAILING_COMMA.replace_all(&text, "").into_owned()
}

/// Keep ellipses that mark hesitation, drop the ones gluing clauses together
pub(super) fn discipline_ellipses(text: &str) -> String {
    let text = text.replace('…', "...");
    let text = LONG_DOT_RUN.replace_all(&text, "... ");
    let text = ELLIPSIS_THEN_COMMA.replace_all(&text, "... ");
    let text = COMMA_THEN_ELLIPSIS.replace_all(&text, "...");
    let text = GLUE_AFTER_CONNECTOR.replace_all(&text, "${1} ${2}");
    GLUE_BEFORE_CONNECTOR
        .replace_all(&text, "${1} ${2}")
        .into_owned()
}

/// Drop whatever bracketed content survived the earlier passes
pub(super) fn strip_residual_markers(text: &str) -> String {
    let mut current = text.to_string();
    for _ in 0..MAX_NESTING {
        if !BRACKETED_CUE.is_match(&current) {
            break;
        }
        current = BRACKETED_CUE.replace_all(&current, " ").into_owned();
    }
    STRAY_BRACKET.replace_all(&current, " ").into_owned()
}

pub(super) fn normalize_whitespace(text: &str) -> String {
    let text = WHITESPACE.replace_all(text, " ");
    SPACE_BEFORE_PUNCTUATION
        .replace_all(&text, "${1}")
        .trim()
        .to_string()
}
