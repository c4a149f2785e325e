//! Giphy: secondary provider, premium only.
//!
//! Keyed search endpoint queried with a single best-guess term. Records
//! are trusted as pre-ranked by Giphy and scored with the source weight.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, RankError};
use crate::http;
use crate::provider::{Provider, ProviderRequest, ProviderSpec, QueryPolicy, ScoringPolicy};
use crate::types::{Candidate, Tier};

/// Source id and id namespace for Giphy candidates.
pub const GIPHY_ID: &str = "giphy";

/// Endpoint configuration for Giphy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GiphyConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Content rating filter sent with every search.
    pub rating: String,
    /// HTTP client timeout backstop, in seconds.
    pub timeout_seconds: u64,
}

impl Default for GiphyConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.giphy.com".into(),
            api_key: None,
            rating: "g".into(),
            timeout_seconds: 10,
        }
    }
}

impl GiphyConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Giphy GIF search client.
pub struct GiphyProvider {
    config: GiphyConfig,
    client: reqwest::Client,
    spec: ProviderSpec,
}

impl GiphyProvider {
    /// # Errors
    ///
    /// Returns [`RankError`] if the base URL is invalid or the HTTP
    /// client cannot be built. A missing API key is not an error here;
    /// it fails each call instead.
    pub fn new(config: GiphyConfig) -> Result<Self, RankError> {
        http::validate_base_url(GIPHY_ID, &config.base_url)?;
        let client = http::build_client(std::time::Duration::from_secs(config.timeout_seconds))?;
        Ok(Self {
            config,
            client,
            spec: Self::default_spec(),
        })
    }

    /// Secondary: limit 4, weight 0.8, single term, trust-scored, premium.
    pub fn default_spec() -> ProviderSpec {
        ProviderSpec {
            id: GIPHY_ID,
            result_limit: 4,
            source_weight: 0.8,
            query_policy: QueryPolicy::MostSpecificTerm,
            scoring: ScoringPolicy::SourceTrust,
            min_tier: Tier::Premium,
        }
    }
}

#[async_trait]
impl Provider for GiphyProvider {
    fn spec(&self) -> &ProviderSpec {
        &self.spec
    }

    async fn fetch(&self, request: &ProviderRequest) -> Result<Vec<Candidate>, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ProviderError::MissingKey(GIPHY_ID))?;

        let term = request.query_text();
        tracing::trace!(term = %term, limit = request.limit, "Giphy search");

        let url = http::endpoint(&self.config.base_url, "v1/gifs/search");
        let limit = request.limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", api_key),
                ("q", term.as_str()),
                ("limit", limit.as_str()),
                ("rating", self.config.rating.as_str()),
            ])
            .send()
            .await;

        let body = super::read_body(response).await?;
        parse_giphy_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct GiphyResponse {
    #[serde(default)]
    data: Option<Vec<GiphyGif>>,
}

#[derive(Debug, Deserialize)]
struct GiphyGif {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    images: Option<GiphyImages>,
}

#[derive(Debug, Deserialize)]
struct GiphyImages {
    original: Option<GiphyImage>,
}

#[derive(Debug, Deserialize)]
struct GiphyImage {
    url: Option<String>,
}

/// Parse a Giphy search body into candidates, namespacing ids.
///
/// Records without an original image URL are skipped. A body without a
/// `data` array is an empty result, not an error.
pub(crate) fn parse_giphy_response(body: &str) -> Result<Vec<Candidate>, ProviderError> {
    let parsed: GiphyResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    Ok(parsed
        .data
        .unwrap_or_default()
        .into_iter()
        .filter_map(|gif| {
            let id = gif.id.filter(|id| !id.is_empty())?;
            let url = gif.images?.original?.url?;
            Some(Candidate::new(
                format!("{GIPHY_ID}-{id}"),
                gif.title,
                url,
                GIPHY_ID,
            ))
        })
        .collect())
}
