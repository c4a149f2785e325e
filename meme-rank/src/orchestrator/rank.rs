//! The ranking engine: document text and tier in, ranked memes out.
//!
//! # Pipeline
//!
//! 1. Tokenize the document with the injected lexicon
//! 2. Free tier: keyword query. Premium tier: emotion labels plus a
//!    query from the suggestion service (empty on failure, or the keyword
//!    query when `fallback_to_keywords` is set)
//! 3. Empty query: stop with [`RankOutcome::NoMatches`], nothing dispatched
//! 4. Fan out to the tier's providers, each call bounded by the provider
//!    timeout and the time left before the request deadline
//! 5. Merge, sort, deduplicate, cap; empty result is `NoMatches`

use serde::Serialize;
use std::sync::Arc;
use tokio::time::Instant;

use crate::analysis::{classify_emotions, keyword_query, tokenize};
use crate::config::RankConfig;
use crate::error::{RankError, Result};
use crate::lexicon::Lexicon;
use crate::provider::ProviderRegistry;
use crate::suggest::{premium_query, Suggester};
use crate::types::{Candidate, EmotionSet, Query, Tier, Token};

use super::dispatch::dispatch;
use super::merge::{merge, RankReport};

/// A successful ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    pub query: Query,
    pub emotion_labels: EmotionSet,
    /// Ordered by score, ids unique, length within the tier cap.
    pub memes: Vec<Candidate>,
    #[serde(skip)]
    pub report: RankReport,
}

/// Outcome of a ranking request that ran to completion.
///
/// `NoMatches` is an expected business result, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum RankOutcome {
    Matches(RankedResult),
    NoMatches {
        query: Query,
        emotion_labels: EmotionSet,
        report: RankReport,
    },
}

impl RankOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matches(_))
    }

    pub fn query(&self) -> &Query {
        match self {
            Self::Matches(result) => &result.query,
            Self::NoMatches { query, .. } => query,
        }
    }

    pub fn report(&self) -> &RankReport {
        match self {
            Self::Matches(result) => &result.report,
            Self::NoMatches { report, .. } => report,
        }
    }
}

/// Offline view of how a document would be queried.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub tokens: Vec<Token>,
    pub keyword_query: Query,
    pub emotion_labels: EmotionSet,
}

/// Stateless ranking engine. Shared configuration only; safe to reuse
/// across concurrent requests.
#[derive(Clone)]
pub struct RankEngine {
    config: RankConfig,
    lexicon: Arc<Lexicon>,
    registry: ProviderRegistry,
    suggester: Option<Arc<dyn Suggester>>,
}

impl RankEngine {
    /// # Errors
    ///
    /// Returns [`RankError::Config`] if `config` is invalid or the
    /// registry is empty.
    pub fn new(config: RankConfig, registry: ProviderRegistry) -> Result<Self> {
        config.validate()?;
        if registry.is_empty() {
            return Err(RankError::Config(
                "at least one provider must be registered".into(),
            ));
        }
        Ok(Self {
            config,
            lexicon: Arc::new(Lexicon::default()),
            registry,
            suggester: None,
        })
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = Arc::new(lexicon);
        self
    }

    pub fn with_suggester(mut self, suggester: Arc<dyn Suggester>) -> Self {
        self.suggester = Some(suggester);
        self
    }

    pub fn config(&self) -> &RankConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Tokens, free-tier query and emotion labels for `text`, without
    /// any network calls.
    pub fn analyze(&self, text: &str) -> Analysis {
        let tokens = tokenize(text, &self.lexicon);
        let keyword_query = keyword_query(&tokens, self.config.free_keyword_count);
        let emotion_labels = classify_emotions(&tokens, &self.lexicon);
        Analysis {
            tokens,
            keyword_query,
            emotion_labels,
        }
    }

    /// Rank memes for `text` at `tier`.
    ///
    /// Provider and suggestion failures degrade rather than error.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::Config`] if no registered provider serves
    /// `tier`.
    pub async fn rank(&self, text: &str, tier: Tier) -> Result<RankOutcome> {
        let started = Instant::now();
        let deadline = started + self.config.request_deadline();

        let providers = self.registry.for_tier(tier);
        if providers.is_empty() {
            return Err(RankError::Config(format!(
                "no provider serves the {tier} tier"
            )));
        }

        let tokens = tokenize(text, &self.lexicon);
        let (query, emotion_labels) = if tier.is_premium() {
            let emotions = classify_emotions(&tokens, &self.lexicon);
            let query = self.premium_query(text, &tokens, deadline).await;
            (query, emotions)
        } else {
            let query = keyword_query(&tokens, self.config.free_keyword_count);
            (query, EmotionSet::new())
        };

        tracing::debug!(
            %tier,
            tokens = tokens.len(),
            terms = query.terms().count(),
            emotions = emotion_labels.len(),
            "document analysed"
        );
        tracing::trace!(query = %query, "search query");

        if query.is_empty() {
            tracing::info!(%tier, "no usable search terms");
            return Ok(RankOutcome::NoMatches {
                query,
                emotion_labels,
                report: RankReport::default(),
            });
        }

        let cap = self.config.cap(tier);
        let remaining = deadline.saturating_duration_since(Instant::now());
        let call_timeout = self.config.provider_timeout().min(remaining);

        let outcomes = dispatch(
            &providers,
            &query,
            &emotion_labels,
            cap,
            call_timeout,
            &self.lexicon,
        )
        .await;
        let (memes, report) = merge(outcomes, cap);

        tracing::info!(
            %tier,
            results = memes.len(),
            failed_providers = report.failed(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "ranking complete"
        );

        if memes.is_empty() {
            return Ok(RankOutcome::NoMatches {
                query,
                emotion_labels,
                report,
            });
        }

        Ok(RankOutcome::Matches(RankedResult {
            query,
            emotion_labels,
            memes,
            report,
        }))
    }

    async fn premium_query(&self, text: &str, tokens: &[Token], deadline: Instant) -> Query {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let query = premium_query(
            self.suggester.as_deref(),
            text,
            self.config.max_suggestions,
            remaining,
        )
        .await;

        if query.is_empty() && self.config.fallback_to_keywords {
            tracing::info!("falling back to keyword query");
            return keyword_query(tokens, self.config.free_keyword_count);
        }
        query
    }
}

impl std::fmt::Debug for RankEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankEngine")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field(
                "suggester",
                &self.suggester.as_ref().map(|s| s.name().to_string()),
            )
            .finish()
    }
}
