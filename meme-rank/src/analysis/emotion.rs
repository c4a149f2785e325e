//! Lexicon-based emotion tagging (premium tier only).

use std::collections::HashSet;

use crate::lexicon::Lexicon;
use crate::types::{EmotionLabel, EmotionSet, Token};

/// Tag a token sequence with every emotion whose trigger list shares at
/// least one word with it. Exact word matches only.
pub fn classify_emotions(tokens: &[Token], lexicon: &Lexicon) -> EmotionSet {
    let words: HashSet<&str> = tokens.iter().map(|t| t.text.as_str()).collect();

    lexicon
        .emotions
        .iter()
        .filter(|entry| entry.triggers.iter().any(|t| words.contains(t.as_str())))
        .map(|entry| entry.label)
        .collect()
}

/// Returns `true` if any trigger word for `label` occurs as a substring
/// of `text_lower`. Used when matching meme names rather than tokens.
pub fn mentions_emotion(text_lower: &str, label: EmotionLabel, lexicon: &Lexicon) -> bool {
    lexicon
        .triggers(label)
        .iter()
        .any(|trigger| text_lower.contains(trigger.as_str()))
}
