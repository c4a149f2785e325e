//! Concurrent fan-out to the providers serving a tier.
//!
//! Every provider call runs concurrently under its own time bound. A
//! failure or timeout is confined to that provider's [`ProviderOutcome`];
//! the others complete normally.

use std::sync::Arc;
use std::time::Duration;

use crate::error::ProviderError;
use crate::lexicon::Lexicon;
use crate::provider::Provider;
use crate::types::{EmotionSet, Query, ScoredCandidate};

use super::scoring::score_candidates;

/// Result of one provider call.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome {
    /// The call succeeded; `candidates` may still be empty.
    Fetched {
        provider: &'static str,
        candidates: Vec<ScoredCandidate>,
    },
    /// The call failed and contributes no candidates.
    Failed {
        provider: &'static str,
        error: ProviderError,
    },
}

impl ProviderOutcome {
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Fetched { provider, .. } | Self::Failed { provider, .. } => provider,
        }
    }

    /// Candidates for ranking; empty for a failed call.
    pub fn into_candidates(self) -> Vec<ScoredCandidate> {
        match self {
            Self::Fetched { candidates, .. } => candidates,
            Self::Failed { .. } => Vec::new(),
        }
    }
}

/// Fan `query` out to `providers` and score each provider's candidates.
///
/// # Pipeline
///
/// 1. Shape the request per provider (full query or single term, limit
///    capped by `cap`)
/// 2. Run all calls concurrently with [`futures::future::join_all`],
///    each bounded by `call_timeout`
/// 3. Score successful results per the provider's scoring policy
///
/// Outcomes are returned in `providers` order, which is the priority
/// order used for tie-breaking. A provider that receives no usable term
/// is reported as fetched-empty without being called.
pub async fn dispatch(
    providers: &[Arc<dyn Provider>],
    query: &Query,
    emotions: &EmotionSet,
    cap: usize,
    call_timeout: Duration,
    lexicon: &Lexicon,
) -> Vec<ProviderOutcome> {
    let calls = providers.iter().enumerate().map(|(priority, provider)| {
        let provider = Arc::clone(provider);
        async move {
            let spec = provider.spec();
            let Some(request) = spec.shape_request(query, emotions, cap) else {
                return ProviderOutcome::Fetched {
                    provider: spec.id,
                    candidates: Vec::new(),
                };
            };

            let result = match tokio::time::timeout(call_timeout, provider.fetch(&request)).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(call_timeout.as_millis() as u64)),
            };

            match result {
                Ok(candidates) => {
                    let returned = candidates.len();
                    let scored = score_candidates(spec, priority, candidates, &request, lexicon);
                    tracing::debug!(
                        provider = spec.id,
                        returned,
                        kept = scored.len(),
                        "provider returned results"
                    );
                    ProviderOutcome::Fetched {
                        provider: spec.id,
                        candidates: scored,
                    }
                }
                Err(error) => {
                    tracing::warn!(provider = spec.id, error = %error, "provider call failed");
                    ProviderOutcome::Failed {
                        provider: spec.id,
                        error,
                    }
                }
            }
        }
    });

    futures::future::join_all(calls).await
}
