//! Content provider implementations.
//!
//! Each module provides a struct implementing [`crate::provider::Provider`]
//! for one meme source, plus its endpoint configuration and a standalone
//! response parser for testing without network access.

pub mod giphy;
pub mod imgflip;
pub mod tenor;

pub use giphy::{GiphyConfig, GiphyProvider};
pub use imgflip::{ImgflipConfig, ImgflipProvider};
pub use tenor::{TenorConfig, TenorProvider};

use std::sync::Arc;

use crate::error::{ProviderError, RankError};
use crate::http;
use crate::provider::ProviderRegistry;

/// Registry with the three standard providers in priority order:
/// Imgflip, Giphy, Tenor.
///
/// # Errors
///
/// Returns [`RankError`] if any endpoint configuration is invalid.
pub fn standard_registry(
    imgflip: ImgflipConfig,
    giphy: GiphyConfig,
    tenor: TenorConfig,
) -> Result<ProviderRegistry, RankError> {
    Ok(ProviderRegistry::new()
        .with_provider(Arc::new(ImgflipProvider::new(imgflip)?))
        .with_provider(Arc::new(GiphyProvider::new(giphy)?))
        .with_provider(Arc::new(TenorProvider::new(tenor)?)))
}

/// Read a JSON response body, mapping transport and status failures.
pub(crate) async fn read_body(
    response: Result<reqwest::Response, reqwest::Error>,
) -> Result<String, ProviderError> {
    let response = response.map_err(|e| ProviderError::Http(http::describe(e)))?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status.as_u16()));
    }
    response
        .text()
        .await
        .map_err(|e| ProviderError::Http(http::describe(e)))
}
