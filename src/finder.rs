//! The request boundary.
//!
//! [`MemeFinder::find_memes`] never fails: input problems, technical
//! errors and empty results all become a [`FinderResponse`] with a fixed
//! message, and the detail goes to the log.

use std::sync::Arc;

use meme_rank::{standard_registry, Analysis, RankEngine, RankOutcome, TogetherSuggester};

use crate::config::FinderConfig;
use crate::error::Result;
use crate::request::FinderRequest;
use crate::response::FinderResponse;

/// Meme search over an injected ranking engine.
#[derive(Debug, Clone)]
pub struct MemeFinder {
    engine: RankEngine,
}

impl MemeFinder {
    pub fn new(engine: RankEngine) -> Self {
        Self { engine }
    }

    /// Build the standard provider set and suggestion client from `config`.
    ///
    /// Missing API keys are not an error here; the affected provider or
    /// the suggestion step degrades at request time instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the ranking policy or any endpoint is invalid.
    pub fn from_config(config: &FinderConfig) -> Result<Self> {
        config.validate()?;
        let registry = standard_registry(
            config.imgflip.clone(),
            config.giphy.clone(),
            config.tenor.clone(),
        )?;
        let suggester = TogetherSuggester::new(config.together.clone())?;
        let engine = RankEngine::new(config.rank.clone(), registry)?
            .with_lexicon(config.lexicon.clone())
            .with_suggester(Arc::new(suggester));
        tracing::debug!(providers = ?engine.registry().ids(), "meme finder ready");
        Ok(Self::new(engine))
    }

    pub fn engine(&self) -> &RankEngine {
        &self.engine
    }

    /// Offline analysis of a document, for inspection.
    pub fn analyze(&self, text: &str) -> Analysis {
        self.engine.analyze(text)
    }

    /// Find memes for `request`.
    pub async fn find_memes(&self, request: &FinderRequest) -> FinderResponse {
        match self.try_find(request).await {
            Ok(RankOutcome::Matches(result)) => {
                FinderResponse::found(request.document.title(), result)
            }
            Ok(RankOutcome::NoMatches { report, .. }) => {
                tracing::info!(
                    tier = %request.tier,
                    failed_providers = report.failed(),
                    "no relevant matches"
                );
                FinderResponse::no_matches()
            }
            Err(err) if err.is_input() => {
                tracing::warn!(error = %err, "rejected document");
                FinderResponse::input_error()
            }
            Err(err) => {
                tracing::error!(error = %err, "find request failed");
                FinderResponse::technical_error()
            }
        }
    }

    async fn try_find(&self, request: &FinderRequest) -> Result<RankOutcome> {
        request.document.validate()?;
        let text = request.document.ranking_text();
        tracing::trace!(chars = text.len(), "ranking document");
        Ok(self.engine.rank(&text, request.tier).await?)
    }
}
