//! Shared HTTP client construction for provider and suggestion calls.

use crate::error::RankError;
use std::time::Duration;

/// User-Agent sent with every outbound request.
const USER_AGENT: &str = concat!("meme-rank/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] for JSON APIs.
///
/// The client has:
/// - Timeout from the caller (a backstop; dispatch applies its own bound)
/// - A fixed crate User-Agent
/// - Brotli and gzip decompression
///
/// # Errors
///
/// Returns [`RankError::Http`] if the client cannot be constructed.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, RankError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| RankError::Http(format!("failed to build HTTP client: {e}")))
}

/// Join `path` onto `base`, tolerating a trailing slash on `base`.
pub fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Check that `base` parses as an absolute http(s) URL.
///
/// # Errors
///
/// Returns [`RankError::Config`] naming `what` if the URL is unusable.
pub fn validate_base_url(what: &str, base: &str) -> Result<(), RankError> {
    let parsed = url::Url::parse(base)
        .map_err(|e| RankError::Config(format!("{what} base_url is invalid: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(RankError::Config(format!(
            "{what} base_url must be http or https, got {other}"
        ))),
    }
}

/// Strip the URL (which may carry an API key) from a reqwest error.
pub(crate) fn describe(err: reqwest::Error) -> String {
    err.without_url().to_string()
}
