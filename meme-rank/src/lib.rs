//! # meme-rank
//!
//! Content-based meme relevance ranking.
//!
//! Given the text of a document and an access tier, this crate derives a
//! search query from the text, asks one or more meme providers for
//! candidates, scores them, and returns a single ranked list.
//!
//! ## Design
//!
//! - Free tier: a position-weighted keyword scorer builds the query; only
//!   the primary catalog (Imgflip) is consulted, capped at 5 results
//! - Premium tier: an external suggestion service (Together chat
//!   completions) proposes phrases, emotion labels are tagged locally, and
//!   Imgflip, Giphy and Tenor are queried concurrently, capped at 15
//! - Every provider call is time-bounded; a failed provider contributes
//!   nothing and never aborts the request
//! - Stop words and emotion triggers live in an injectable [`Lexicon`]
//!
//! ## Security
//!
//! - API keys are sent only to their own provider and never logged
//! - Document text and queries are logged only at trace level
//! - Error messages strip request URLs

pub mod analysis;
pub mod config;
pub mod error;
pub mod http;
pub mod lexicon;
pub mod orchestrator;
pub mod provider;
pub mod providers;
pub mod suggest;
pub mod types;

pub use config::RankConfig;
pub use error::{ProviderError, RankError, Result, SuggestError};
pub use lexicon::Lexicon;
pub use orchestrator::{Analysis, RankEngine, RankOutcome, RankReport, RankedResult};
pub use provider::{Provider, ProviderRegistry, ProviderSpec};
pub use providers::standard_registry;
pub use suggest::{Suggester, TogetherConfig, TogetherSuggester};
pub use types::{Candidate, EmotionLabel, EmotionSet, Query, Tier};

/// Rank memes for `text` with a one-off engine.
///
/// Convenience wrapper around [`RankEngine::new`] and [`RankEngine::rank`]
/// for callers that do not keep an engine around.
///
/// # Errors
///
/// Returns [`RankError::Config`] if `config` is invalid or no provider in
/// `registry` serves `tier`.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> meme_rank::Result<()> {
/// use meme_rank::providers::{GiphyConfig, ImgflipConfig, TenorConfig};
///
/// let registry = meme_rank::standard_registry(
///     ImgflipConfig::default(),
///     GiphyConfig::default(),
///     TenorConfig::default(),
/// )?;
/// let outcome = meme_rank::rank(
///     "The cat won a great prize today",
///     meme_rank::Tier::Free,
///     meme_rank::RankConfig::default(),
///     registry,
/// )
/// .await?;
/// println!("query: {}", outcome.query());
/// # Ok(())
/// # }
/// ```
pub async fn rank(
    text: &str,
    tier: Tier,
    config: RankConfig,
    registry: ProviderRegistry,
) -> Result<RankOutcome> {
    RankEngine::new(config, registry)?.rank(text, tier).await
}
