//! Free-tier keyword scoring: term frequency weighted by position.
//!
//! Formula, for the token at position `i` in a sequence of length `N`:
//!
//! ```text
//! score       = tf(word) * position * title_bonus
//! tf(word)    = count(word) / N
//! position    = 1 - i / N
//! title_bonus = 1.5 if i < 0.1 * N, else 1.0
//! ```
//!
//! Every occurrence is scored separately, so a repeated word can fill
//! more than one query slot.

use std::collections::HashMap;

use crate::types::{Query, Token};

/// Multiplier for tokens in the leading tenth of the document.
const TITLE_BONUS: f64 = 1.5;

/// Fraction of the document that counts as the "title" region.
const TITLE_REGION: f64 = 0.1;

/// A scored occurrence of a token.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordScore {
    pub term: String,
    pub position: usize,
    pub score: f64,
}

/// Occurrences of `term` divided by the sequence length.
pub fn term_frequency(term: &str, tokens: &[Token]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let count = tokens.iter().filter(|t| t.text == term).count();
    count as f64 / tokens.len() as f64
}

/// Positional relevance of index `position` in a sequence of `total`
/// tokens: linear decay times the title bonus.
pub fn positional_relevance(position: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    let i = position as f64;
    let decay = 1.0 - i / n;
    let bonus = if i < TITLE_REGION * n { TITLE_BONUS } else { 1.0 };
    decay * bonus
}

/// Score every token occurrence and order by score, highest first.
///
/// The sort is stable, so equal scores keep document order.
pub fn score_keywords(tokens: &[Token]) -> Vec<KeywordScore> {
    let total = tokens.len();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        *counts.entry(token.text.as_str()).or_default() += 1;
    }

    let mut scored: Vec<KeywordScore> = tokens
        .iter()
        .map(|token| {
            let tf = counts.get(token.text.as_str()).copied().unwrap_or(0) as f64 / total as f64;
            KeywordScore {
                term: token.text.clone(),
                position: token.position,
                score: tf * positional_relevance(token.position, total),
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Build the free-tier query from the `count` best-scoring occurrences,
/// joined in rank order.
pub fn keyword_query(tokens: &[Token], count: usize) -> Query {
    let scored = score_keywords(tokens);
    Query::from_terms(scored.iter().take(count).map(|k| k.term.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokenize;
    use crate::lexicon::Lexicon;

    fn tokens(words: &[&str]) -> Vec<Token> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new(*w, i))
            .collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn term_frequency_literal() {
        let seq = tokens(&["great", "great", "fail"]);
        assert!(close(term_frequency("great", &seq), 2.0 / 3.0));
        assert!(close(term_frequency("fail", &seq), 1.0 / 3.0));
        assert!(close(term_frequency("absent", &seq), 0.0));
    }

    #[test]
    fn positional_relevance_for_three_tokens() {
        // i=0: 0 < 0.3 → bonus 1.5, decay 1.0
        assert!(close(positional_relevance(0, 3), 1.5));
        // i=1: 1 >= 0.3 → no bonus, decay 2/3
        assert!(close(positional_relevance(1, 3), 2.0 / 3.0));
        // i=2: decay 1/3
        assert!(close(positional_relevance(2, 3), 1.0 / 3.0));
    }

    #[test]
    fn score_keywords_literal_index_math() {
        let scored = score_keywords(&tokens(&["great", "great", "fail"]));
        assert_eq!(scored.len(), 3);

        assert_eq!(scored[0].term, "great");
        assert_eq!(scored[0].position, 0);
        assert!(close(scored[0].score, 2.0 / 3.0 * 1.0 * 1.5));

        assert_eq!(scored[1].term, "great");
        assert_eq!(scored[1].position, 1);
        assert!(close(scored[1].score, 2.0 / 3.0 * (2.0 / 3.0)));

        assert_eq!(scored[2].term, "fail");
        assert!(close(scored[2].score, 1.0 / 3.0 * (1.0 / 3.0)));
    }

    #[test]
    fn scores_are_non_increasing() {
        let seq = tokens(&[
            "market", "crash", "stocks", "market", "panic", "crash", "market", "traders",
            "sell", "panic", "bonds", "rally",
        ]);
        let scored = score_keywords(&seq);
        for pair in scored.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn ties_keep_document_order() {
        // N=4, only i=0 is in the title region.
        // aaa@0: 1/4 * 1.0 * 1.5 = 0.375
        // bbb@1: 2/4 * 3/4       = 0.375
        // bbb@2: 2/4 * 2/4       = 0.25
        // ccc@3: 1/4 * 1/4       = 0.0625
        let scored = score_keywords(&tokens(&["aaa", "bbb", "bbb", "ccc"]));
        assert!(close(scored[0].score, scored[1].score));
        let positions: Vec<_> = scored.iter().map(|k| k.position).collect();
        assert_eq!(positions, [0, 1, 2, 3]);
    }

    #[test]
    fn keyword_query_caps_terms() {
        let seq = tokens(&[
            "one1", "two2", "three", "four", "five", "six6", "seven",
        ]);
        let query = keyword_query(&seq, 5);
        assert_eq!(query.terms().count(), 5);
        for term in query.terms() {
            assert!(seq.iter().any(|t| t.text == term));
        }
    }

    #[test]
    fn keyword_query_fewer_tokens_than_count() {
        let seq = tokenize("The cat won a great prize today", &Lexicon::default());
        let query = keyword_query(&seq, 5);
        assert_eq!(query.as_str(), "cat won great prize today");
    }

    #[test]
    fn keyword_query_repeats_frequent_words() {
        let query = keyword_query(&tokens(&["great", "great", "fail"]), 5);
        assert_eq!(query.as_str(), "great great fail");
    }

    #[test]
    fn empty_tokens_yield_empty_query() {
        assert!(score_keywords(&[]).is_empty());
        assert!(keyword_query(&[], 5).is_empty());
        assert!(close(positional_relevance(0, 0), 0.0));
    }
}
