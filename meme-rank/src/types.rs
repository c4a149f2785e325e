//! Core types shared across the ranking pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Access tier of a request. Selects the provider set, the result cap,
/// and whether emotion tagging and phrase suggestion run.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Keyword query, primary provider only.
    #[default]
    Free,
    /// Suggested phrases, emotion labels, all providers.
    Premium,
}

impl Tier {
    /// Map an opaque entitlement flag to a tier.
    pub fn from_premium_flag(premium: bool) -> Self {
        if premium {
            Self::Premium
        } else {
            Self::Free
        }
    }

    /// Returns `true` for [`Tier::Premium`].
    pub fn is_premium(&self) -> bool {
        matches!(self, Self::Premium)
    }

    /// Returns the lower-case tier name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A normalised word with its index in the filtered token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lower-cased word text.
    pub text: String,
    /// 0-based position after stop-word and short-word removal.
    pub position: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            position,
        }
    }
}

/// Coarse emotion category assigned from the lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Happy,
    Sad,
    Surprised,
    Confused,
    Excited,
}

impl EmotionLabel {
    /// Returns the lower-case label name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Surprised => "surprised",
            Self::Confused => "confused",
            Self::Excited => "excited",
        }
    }

    /// Returns all labels in lexicon order.
    pub fn all() -> &'static [EmotionLabel] {
        &[
            Self::Happy,
            Self::Sad,
            Self::Surprised,
            Self::Confused,
            Self::Excited,
        ]
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of emotion labels for one document. Ordered for stable output.
pub type EmotionSet = BTreeSet<EmotionLabel>;

/// A search query: space-separated terms, weight-free.
///
/// The free tier builds it from top-scored keywords, the premium tier
/// from suggested phrases. An empty query means "no usable search terms".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    /// Join terms or phrases with single spaces, preserving their order.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self(joined)
    }

    /// The empty query.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The query as a single space-joined string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Individual whitespace-separated terms, in order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }

    /// Returns `true` when the query carries no terms.
    pub fn is_empty(&self) -> bool {
        self.terms().next().is_none()
    }

    /// The single term that best stands in for the whole query.
    ///
    /// A one-term query yields that term. Otherwise the longest term
    /// wins, with ties going to the earliest occurrence.
    pub fn most_specific_term(&self) -> Option<&str> {
        self.terms().fold(None, |best: Option<&str>, term| match best {
            Some(b) if b.chars().count() >= term.chars().count() => Some(b),
            _ => Some(term),
        })
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A provider-agnostic meme record.
///
/// Ids from non-primary providers are namespaced by source so they can
/// never collide with primary ids. Dimensions default to zero when the
/// provider does not report them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub box_count: u32,
    pub source_id: String,
}

impl Candidate {
    /// Build a candidate with zeroed dimensions.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            width: 0,
            height: 0,
            box_count: 0,
            source_id: source_id.into(),
        }
    }

    /// Set the image dimensions and caption box count.
    pub fn with_dimensions(mut self, width: u32, height: u32, box_count: u32) -> Self {
        self.width = width;
        self.height = height;
        self.box_count = box_count;
        self
    }
}

/// A candidate with its relevance score and its provider's dispatch
/// priority (lower dispatches first and wins score ties).
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    /// Finite and non-negative.
    pub score: f64,
    pub priority: usize,
}
