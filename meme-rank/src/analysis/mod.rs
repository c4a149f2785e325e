//! Document analysis: tokenization, free-tier keyword scoring, and
//! lexicon-based emotion tagging.
//!
//! Every function here is pure and deterministic; the same text and
//! lexicon always produce the same tokens, query and labels.

pub mod emotion;
pub mod keywords;
pub mod tokenize;

pub use emotion::classify_emotions;
pub use keywords::{keyword_query, score_keywords, KeywordScore};
pub use tokenize::tokenize;
