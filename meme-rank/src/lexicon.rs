//! Stop words and the emotion trigger lexicon.
//!
//! Both are plain values injected into the tokenizer, classifier and
//! scorer. [`Lexicon::default`] carries the built-in tables; callers may
//! swap either table (from config or in tests) without touching globals.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::EmotionLabel;

// ── Built-in tables ─────────────────────────────────────────────────────

const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at",
];

/// (label, trigger words). Trigger lists overlap: "amazing" fires
/// happy, surprised and excited.
const DEFAULT_EMOTIONS: &[(EmotionLabel, &[&str])] = &[
    (
        EmotionLabel::Happy,
        &[
            "success",
            "win",
            "happy",
            "great",
            "awesome",
            "amazing",
            "excellent",
            "perfect",
            "joy",
        ],
    ),
    (
        EmotionLabel::Sad,
        &[
            "fail",
            "sad",
            "bad",
            "terrible",
            "awful",
            "wrong",
            "poor",
            "unfortunate",
        ],
    ),
    (
        EmotionLabel::Surprised,
        &[
            "shock",
            "surprise",
            "unexpected",
            "amazing",
            "incredible",
            "unbelievable",
        ],
    ),
    (
        EmotionLabel::Confused,
        &["what", "confused", "strange", "weird", "odd", "mysterious"],
    ),
    (
        EmotionLabel::Excited,
        &[
            "wow",
            "awesome",
            "incredible",
            "amazing",
            "fantastic",
            "extraordinary",
        ],
    ),
];

// ── Lexicon ─────────────────────────────────────────────────────────────

/// Trigger words for one emotion label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionEntry {
    pub label: EmotionLabel,
    pub triggers: Vec<String>,
}

/// Immutable word tables used by the analysis and scoring stages.
///
/// Words are stored trimmed and lower-cased however they were supplied,
/// including through deserialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLexicon")]
pub struct Lexicon {
    /// Lower-case words dropped during tokenization.
    pub stop_words: BTreeSet<String>,
    /// Emotion categories in classification order.
    pub emotions: Vec<EmotionEntry>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| (*w).to_string()).collect(),
            emotions: DEFAULT_EMOTIONS
                .iter()
                .map(|(label, triggers)| EmotionEntry {
                    label: *label,
                    triggers: triggers.iter().map(|w| (*w).to_string()).collect(),
                })
                .collect(),
        }
    }
}

/// Lexicon as written in a config file, before normalisation.
#[derive(Deserialize)]
#[serde(default)]
struct RawLexicon {
    stop_words: Vec<String>,
    emotions: Vec<EmotionEntry>,
}

impl Default for RawLexicon {
    fn default() -> Self {
        let lexicon = Lexicon::default();
        Self {
            stop_words: lexicon.stop_words.into_iter().collect(),
            emotions: lexicon.emotions,
        }
    }
}

impl From<RawLexicon> for Lexicon {
    fn from(raw: RawLexicon) -> Self {
        Self {
            stop_words: normalize_words(raw.stop_words).collect(),
            emotions: raw
                .emotions
                .into_iter()
                .map(|entry| EmotionEntry {
                    label: entry.label,
                    triggers: normalize_words(entry.triggers).collect(),
                })
                .collect(),
        }
    }
}

/// Trim and lower-case `words`, dropping blanks.
fn normalize_words<I, S>(words: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| !w.is_empty())
}

impl Lexicon {
    /// A lexicon with no stop words and no emotion categories.
    pub fn empty() -> Self {
        Self {
            stop_words: BTreeSet::new(),
            emotions: Vec::new(),
        }
    }

    /// Replace the stop-word table. Words are lower-cased.
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words = normalize_words(words).collect();
        self
    }

    /// Set the trigger words for `label`, replacing any existing entry.
    pub fn with_emotion<I, S>(mut self, label: EmotionLabel, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let triggers: Vec<String> = normalize_words(triggers).collect();
        match self.emotions.iter_mut().find(|e| e.label == label) {
            Some(entry) => entry.triggers = triggers,
            None => self.emotions.push(EmotionEntry { label, triggers }),
        }
        self
    }

    /// Returns `true` if `word` (already lower-cased) is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Trigger words for `label`; empty if the label has no entry.
    pub fn triggers(&self, label: EmotionLabel) -> &[String] {
        self.emotions
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.triggers.as_slice())
            .unwrap_or(&[])
    }
}
