//! Tenor: tertiary provider, premium only.
//!
//! Keyed search endpoint queried with a single best-guess term; one GIF
//! per request, scored with the source weight.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, RankError};
use crate::http;
use crate::provider::{Provider, ProviderRequest, ProviderSpec, QueryPolicy, ScoringPolicy};
use crate::types::{Candidate, Tier};

/// Source id and id namespace for Tenor candidates.
pub const TENOR_ID: &str = "tenor";

/// Endpoint configuration for Tenor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenorConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// HTTP client timeout backstop, in seconds.
    pub timeout_seconds: u64,
}

impl Default for TenorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://tenor.googleapis.com".into(),
            api_key: None,
            timeout_seconds: 10,
        }
    }
}

impl TenorConfig {
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

/// Tenor GIF search client.
pub struct TenorProvider {
    config: TenorConfig,
    client: reqwest::Client,
    spec: ProviderSpec,
}

impl TenorProvider {
    /// # Errors
    ///
    /// Returns [`RankError`] if the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: TenorConfig) -> Result<Self, RankError> {
        http::validate_base_url(TENOR_ID, &config.base_url)?;
        let client = http::build_client(std::time::Duration::from_secs(config.timeout_seconds))?;
        Ok(Self {
            config,
            client,
            spec: Self::default_spec(),
        })
    }

    /// Tertiary: limit 1, weight 0.6, single term, trust-scored, premium.
    pub fn default_spec() -> ProviderSpec {
        ProviderSpec {
            id: TENOR_ID,
            result_limit: 1,
            source_weight: 0.6,
            query_policy: QueryPolicy::MostSpecificTerm,
            scoring: ScoringPolicy::SourceTrust,
            min_tier: Tier::Premium,
        }
    }
}

#[async_trait]
impl Provider for TenorProvider {
    fn spec(&self) -> &ProviderSpec {
        &self.spec
    }

    async fn fetch(&self, request: &ProviderRequest) -> Result<Vec<Candidate>, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ProviderError::MissingKey(TENOR_ID))?;

        let term = request.query_text();
        tracing::trace!(term = %term, limit = request.limit, "Tenor search");

        let url = http::endpoint(&self.config.base_url, "v2/search");
        let limit = request.limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", api_key),
                ("q", term.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await;

        let body = super::read_body(response).await?;
        parse_tenor_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct TenorResponse {
    #[serde(default)]
    results: Option<Vec<TenorResult>>,
}

#[derive(Debug, Deserialize)]
struct TenorResult {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content_description: String,
    #[serde(default)]
    media_formats: Option<TenorMediaFormats>,
}

#[derive(Debug, Deserialize)]
struct TenorMediaFormats {
    gif: Option<TenorMedia>,
}

#[derive(Debug, Deserialize)]
struct TenorMedia {
    url: Option<String>,
}

/// Parse a Tenor search body into candidates, namespacing ids.
///
/// Tenor titles are often blank; the content description stands in
/// when they are. Records without a GIF URL are skipped.
pub(crate) fn parse_tenor_response(body: &str) -> Result<Vec<Candidate>, ProviderError> {
    let parsed: TenorResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    Ok(parsed
        .results
        .unwrap_or_default()
        .into_iter()
        .filter_map(|result| {
            let id = result.id.filter(|id| !id.is_empty())?;
            let url = result.media_formats?.gif?.url?;
            let name = if result.title.trim().is_empty() {
                result.content_description
            } else {
                result.title
            };
            Some(Candidate::new(
                format!("{TENOR_ID}-{id}"),
                name,
                url,
                TENOR_ID,
            ))
        })
        .collect())
}
