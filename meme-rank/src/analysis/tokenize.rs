//! Raw text to ordered token sequence.

use crate::lexicon::Lexicon;
use crate::types::Token;

/// Words with this many characters or fewer are dropped.
const MAX_DROPPED_LEN: usize = 2;

/// Normalise `text` into tokens.
///
/// Splits on whitespace, lower-cases every word, drops words of two
/// characters or fewer, and drops stop words. No stemming. Positions
/// index the surviving sequence, so they run `0..tokens.len()`.
pub fn tokenize(text: &str, lexicon: &Lexicon) -> Vec<Token> {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|word| word.chars().count() > MAX_DROPPED_LEN)
        .filter(|word| !lexicon.is_stop_word(word))
        .enumerate()
        .map(|(position, text)| Token { text, position })
        .collect()
}
