//! Trait definition and registry for pluggable content providers.
//!
//! Each provider (Imgflip, Giphy, Tenor, or a test double) implements
//! [`Provider`] and describes itself with a static [`ProviderSpec`]. The
//! dispatcher and merger only ever see the trait, so adding a provider
//! means registering one more implementation.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ProviderError;
use crate::types::{Candidate, EmotionSet, Query, Tier};

/// What part of the query a provider receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPolicy {
    /// Every query term, plus the document's emotion labels.
    FullQuery,
    /// One term standing in for the query; see [`Query::most_specific_term`].
    MostSpecificTerm,
}

/// How candidates from a provider are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringPolicy {
    /// Local text matching against the candidate name.
    ContentMatch,
    /// Every candidate receives the provider's source-trust weight.
    SourceTrust,
}

/// Static description of a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSpec {
    /// Stable identifier, also used as the candidate `source_id`.
    pub id: &'static str,
    /// Maximum candidates kept from one call, before the tier cap applies.
    pub result_limit: usize,
    /// Score assigned when no content-based score is computed.
    pub source_weight: f64,
    pub query_policy: QueryPolicy,
    pub scoring: ScoringPolicy,
    /// Lowest tier that dispatches to this provider.
    pub min_tier: Tier,
}

impl ProviderSpec {
    /// Returns `true` if requests at `tier` should reach this provider.
    pub fn serves(&self, tier: Tier) -> bool {
        tier >= self.min_tier
    }

    /// Per-call result limit for a tier whose total cap is `cap`.
    pub fn effective_limit(&self, cap: usize) -> usize {
        self.result_limit.min(cap)
    }

    /// Shape `query` and `emotions` into this provider's request.
    ///
    /// Returns `None` when the query has no usable term.
    pub fn shape_request(
        &self,
        query: &Query,
        emotions: &EmotionSet,
        cap: usize,
    ) -> Option<ProviderRequest> {
        let limit = self.effective_limit(cap);
        match self.query_policy {
            QueryPolicy::FullQuery => {
                let terms: Vec<String> = query.terms().map(str::to_lowercase).collect();
                if terms.is_empty() {
                    return None;
                }
                Some(ProviderRequest {
                    terms,
                    emotions: emotions.clone(),
                    limit,
                })
            }
            QueryPolicy::MostSpecificTerm => {
                let term = query.most_specific_term()?;
                Some(ProviderRequest {
                    terms: vec![term.to_string()],
                    emotions: EmotionSet::new(),
                    limit,
                })
            }
        }
    }
}

/// A single provider call, already shaped by the provider's policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// Search terms; exactly one for [`QueryPolicy::MostSpecificTerm`].
    pub terms: Vec<String>,
    /// Emotion labels; empty unless the policy forwards them.
    pub emotions: EmotionSet,
    /// Maximum candidates wanted from this call.
    pub limit: usize,
}

impl ProviderRequest {
    /// Terms joined with spaces, as sent to keyed search endpoints.
    pub fn query_text(&self) -> String {
        self.terms.join(" ")
    }
}

/// A pluggable content provider.
///
/// Implementors fetch raw records and normalise them into
/// [`Candidate`] values: ids namespaced for non-primary sources, missing
/// dimensions set to zero. Scoring is applied by the dispatcher
/// according to [`ProviderSpec::scoring`].
///
/// All implementations must be `Send + Sync` for concurrent dispatch.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Returns this provider's static description.
    fn spec(&self) -> &ProviderSpec;

    /// Fetch candidates for one request.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the HTTP request fails, the response
    /// cannot be parsed, or the provider rejects the request.
    async fn fetch(&self, request: &ProviderRequest) -> Result<Vec<Candidate>, ProviderError>;

    /// Shorthand for `self.spec().id`.
    fn id(&self) -> &'static str {
        self.spec().id
    }
}

/// Ordered set of providers. Registration order is dispatch order, and
/// dispatch order breaks score ties.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider. Later registrations lose score ties.
    pub fn with_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.register(provider);
        self
    }

    /// Append a provider in place.
    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        tracing::debug!(provider = provider.id(), "provider registered");
        self.providers.push(provider);
    }

    /// Providers serving `tier`, in dispatch order.
    pub fn for_tier(&self, tier: Tier) -> Vec<Arc<dyn Provider>> {
        self.providers
            .iter()
            .filter(|p| p.spec().serves(tier))
            .cloned()
            .collect()
    }

    /// Identifiers of all registered providers, in dispatch order.
    pub fn ids(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EmotionLabel;

    /// A mock provider for testing trait bounds and registry order.
    struct MockProvider {
        spec: ProviderSpec,
        results: Vec<Candidate>,
    }

    impl MockProvider {
        fn new(id: &'static str, min_tier: Tier, results: Vec<Candidate>) -> Self {
            Self {
                spec: ProviderSpec {
                    id,
                    result_limit: 4,
                    source_weight: 0.8,
                    query_policy: QueryPolicy::MostSpecificTerm,
                    scoring: ScoringPolicy::SourceTrust,
                    min_tier,
                },
                results,
            }
        }
    }

    #[async_trait]
    impl Provider for MockProvider {
        fn spec(&self) -> &ProviderSpec {
            &self.spec
        }

        async fn fetch(&self, _request: &ProviderRequest) -> Result<Vec<Candidate>, ProviderError> {
            if self.results.is_empty() {
                return Err(ProviderError::Parse("mock provider failure".into()));
            }
            Ok(self.results.clone())
        }
    }

    fn full_spec() -> ProviderSpec {
        ProviderSpec {
            id: "primary",
            result_limit: 10,
            source_weight: 1.0,
            query_policy: QueryPolicy::FullQuery,
            scoring: ScoringPolicy::ContentMatch,
            min_tier: Tier::Free,
        }
    }

    #[test]
    fn mock_provider_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockProvider>();
        assert_send_sync::<ProviderRegistry>();
    }

    #[tokio::test]
    async fn mock_provider_returns_results() {
        let candidate = Candidate::new("giphy-1", "Cat", "https://g/1.gif", "mock");
        let provider = MockProvider::new("mock", Tier::Free, vec![candidate]);
        let request = ProviderRequest {
            terms: vec!["cat".into()],
            emotions: EmotionSet::new(),
            limit: 4,
        };
        let results = provider.fetch(&request).await.expect("should succeed");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Cat");
    }

    #[tokio::test]
    async fn mock_provider_propagates_errors() {
        let provider = MockProvider::new("mock", Tier::Free, vec![]);
        let request = ProviderRequest {
            terms: vec!["cat".into()],
            emotions: EmotionSet::new(),
            limit: 4,
        };
        let err = provider.fetch(&request).await.unwrap_err();
        assert!(err.to_string().contains("mock provider failure"));
    }

    #[test]
    fn serves_respects_min_tier() {
        let mut spec = full_spec();
        assert!(spec.serves(Tier::Free));
        assert!(spec.serves(Tier::Premium));
        spec.min_tier = Tier::Premium;
        assert!(!spec.serves(Tier::Free));
        assert!(spec.serves(Tier::Premium));
    }

    #[test]
    fn effective_limit_is_capped_by_tier() {
        let spec = full_spec();
        assert_eq!(spec.effective_limit(5), 5);
        assert_eq!(spec.effective_limit(15), 10);
    }

    #[test]
    fn full_query_policy_forwards_terms_and_emotions() {
        let spec = full_spec();
        let query = Query::from_terms(["Success", "Kid", "meme"]);
        let emotions: EmotionSet = [EmotionLabel::Happy].into_iter().collect();
        let request = spec.shape_request(&query, &emotions, 15).expect("request");
        assert_eq!(request.terms, ["success", "kid", "meme"]);
        assert_eq!(request.emotions, emotions);
        assert_eq!(request.limit, 10);
    }

    #[test]
    fn single_term_policy_picks_longest_and_drops_emotions() {
        let spec = ProviderSpec {
            query_policy: QueryPolicy::MostSpecificTerm,
            result_limit: 4,
            ..full_spec()
        };
        let query = Query::from_terms(["cat", "prize", "today"]);
        let emotions: EmotionSet = [EmotionLabel::Excited].into_iter().collect();
        let request = spec.shape_request(&query, &emotions, 15).expect("request");
        assert_eq!(request.terms, ["prize"]);
        assert!(request.emotions.is_empty());
        assert_eq!(request.limit, 4);
        assert_eq!(request.query_text(), "prize");
    }

    #[test]
    fn empty_query_shapes_nothing() {
        let spec = full_spec();
        assert!(spec
            .shape_request(&Query::empty(), &EmotionSet::new(), 5)
            .is_none());
    }

    #[test]
    fn registry_filters_by_tier_in_order() {
        let registry = ProviderRegistry::new()
            .with_provider(Arc::new(MockProvider::new("a", Tier::Free, vec![])))
            .with_provider(Arc::new(MockProvider::new("b", Tier::Premium, vec![])))
            .with_provider(Arc::new(MockProvider::new("c", Tier::Premium, vec![])));

        assert_eq!(registry.len(), 3);
        let free: Vec<_> = registry.for_tier(Tier::Free).iter().map(|p| p.id()).collect();
        assert_eq!(free, ["a"]);
        let premium: Vec<_> = registry
            .for_tier(Tier::Premium)
            .iter()
            .map(|p| p.id())
            .collect();
        assert_eq!(premium, ["a", "b", "c"]);
    }

    #[test]
    fn empty_registry() {
        let registry = ProviderRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.for_tier(Tier::Premium).is_empty());
    }
}
