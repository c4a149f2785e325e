//! Imgflip: the primary provider.
//!
//! `GET /get_memes` returns the whole template catalog with no query
//! parameter; all relevance filtering happens locally in the
//! content-match scorer. Imgflip ids are used as-is.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, RankError};
use crate::http;
use crate::provider::{Provider, ProviderRequest, ProviderSpec, QueryPolicy, ScoringPolicy};
use crate::types::{Candidate, Tier};

/// Source id for Imgflip candidates.
pub const IMGFLIP_ID: &str = "imgflip";

/// Endpoint configuration for Imgflip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImgflipConfig {
    pub base_url: String,
    /// HTTP client timeout backstop, in seconds.
    pub timeout_seconds: u64,
}

impl Default for ImgflipConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.imgflip.com".into(),
            timeout_seconds: 10,
        }
    }
}

impl ImgflipConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Imgflip catalog client.
///
/// Dispatched for every tier, with the full query and emotion labels,
/// and scored by content match.
pub struct ImgflipProvider {
    config: ImgflipConfig,
    client: reqwest::Client,
    spec: ProviderSpec,
}

impl ImgflipProvider {
    /// # Errors
    ///
    /// Returns [`RankError`] if the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: ImgflipConfig) -> Result<Self, RankError> {
        http::validate_base_url(IMGFLIP_ID, &config.base_url)?;
        let client = http::build_client(std::time::Duration::from_secs(config.timeout_seconds))?;
        Ok(Self {
            config,
            client,
            spec: Self::default_spec(),
        })
    }

    /// Primary: limit 10, weight 1.0, full query, content-scored, all tiers.
    pub fn default_spec() -> ProviderSpec {
        ProviderSpec {
            id: IMGFLIP_ID,
            result_limit: 10,
            source_weight: 1.0,
            query_policy: QueryPolicy::FullQuery,
            scoring: ScoringPolicy::ContentMatch,
            min_tier: Tier::Free,
        }
    }
}

#[async_trait]
impl Provider for ImgflipProvider {
    fn spec(&self) -> &ProviderSpec {
        &self.spec
    }

    async fn fetch(&self, _request: &ProviderRequest) -> Result<Vec<Candidate>, ProviderError> {
        let url = http::endpoint(&self.config.base_url, "get_memes");
        tracing::trace!(%url, "Imgflip catalog fetch");

        let body = super::read_body(self.client.get(&url).send().await).await?;
        tracing::trace!(bytes = body.len(), "Imgflip response received");

        parse_imgflip_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ImgflipResponse {
    success: bool,
    #[serde(default)]
    data: Option<ImgflipData>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImgflipData {
    #[serde(default)]
    memes: Vec<ImgflipMeme>,
}

#[derive(Debug, Deserialize)]
struct ImgflipMeme {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    box_count: u32,
}

/// Parse an Imgflip `get_memes` body into candidates.
///
/// Templates without an id or image URL are skipped; the rest of the
/// catalog is still usable.
///
/// Extracted as a separate function for testability with canned JSON.
pub(crate) fn parse_imgflip_response(body: &str) -> Result<Vec<Candidate>, ProviderError> {
    let parsed: ImgflipResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    if !parsed.success {
        return Err(ProviderError::Rejected(
            parsed
                .error_message
                .unwrap_or_else(|| "success=false".into()),
        ));
    }

    let memes = parsed.data.map(|d| d.memes).unwrap_or_default();
    Ok(memes
        .into_iter()
        .filter_map(|m| {
            let id = m.id.filter(|id| !id.is_empty())?;
            let url = m.url.filter(|url| !url.is_empty())?;
            Some(
                Candidate::new(id, m.name, url, IMGFLIP_ID).with_dimensions(
                    m.width,
                    m.height,
                    m.box_count,
                ),
            )
        })
        .collect())
}
