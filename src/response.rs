//! Response envelope returned by [`crate::MemeFinder::find_memes`].
//!
//! Serialised as `{ "success": true, ... }` on success and
//! `{ "success": false, "error": "..." }` otherwise. Error strings are
//! fixed and never carry internal detail.

use meme_rank::{Candidate, EmotionSet, Query, RankedResult};
use serde::Serialize;

/// Title echoed when the document has none.
pub const UNTITLED: &str = "Untitled Article";
/// Message for an unusable document.
pub const INPUT_ERROR_MESSAGE: &str = "Could not read the article. Please try another one.";
/// Message for a request that ran but found nothing.
pub const NO_MATCHES_MESSAGE: &str = "no relevant matches";
/// Message for any other failure.
pub const TECHNICAL_ERROR_MESSAGE: &str = "Failed to process the article. Please try another one.";

/// Successful find.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundMemes {
    success: bool,
    pub title: String,
    pub query: Query,
    pub emotion_labels: EmotionSet,
    pub memes: Vec<Candidate>,
}

/// Soft or technical failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    success: bool,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FinderResponse {
    Found(FoundMemes),
    Failed(Failure),
}

impl FinderResponse {
    pub fn found(title: Option<&str>, result: RankedResult) -> Self {
        Self::Found(FoundMemes {
            success: true,
            title: title.unwrap_or(UNTITLED).to_string(),
            query: result.query,
            emotion_labels: result.emotion_labels,
            memes: result.memes,
        })
    }

    pub fn no_matches() -> Self {
        Self::failed(NO_MATCHES_MESSAGE)
    }

    pub fn input_error() -> Self {
        Self::failed(INPUT_ERROR_MESSAGE)
    }

    pub fn technical_error() -> Self {
        Self::failed(TECHNICAL_ERROR_MESSAGE)
    }

    fn failed(message: &str) -> Self {
        Self::Failed(Failure {
            success: false,
            error: message.to_string(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The error message of a failed response.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Found(_) => None,
            Self::Failed(failure) => Some(&failure.error),
        }
    }

    /// Memes of a successful response; empty otherwise.
    pub fn memes(&self) -> &[Candidate] {
        match self {
            Self::Found(found) => &found.memes,
            Self::Failed(_) => &[],
        }
    }
}
