//! Error types for the meme-rank crate.
//!
//! All errors use stable string messages suitable for logging. No API
//! keys or request URLs (which may carry keys) appear in error messages.

/// Technical errors that stop a ranking request from running at all.
///
/// Provider and suggestion failures are *not* represented here: they
/// degrade to empty results and never abort a request.
#[derive(Debug, thiserror::Error)]
pub enum RankError {
    /// Invalid ranking or endpoint configuration.
    #[error("config error: {0}")]
    Config(String),

    /// An HTTP client could not be constructed.
    #[error("HTTP error: {0}")]
    Http(String),
}

/// Failure of a single content provider call.
///
/// Isolated per provider: the dispatcher converts it into a failed
/// outcome and the merger treats it as zero candidates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider answered with a non-success HTTP status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// The response body did not match the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// The call did not finish within its time budget.
    #[error("timed out after {0}ms")]
    Timeout(u64),

    /// A keyed provider has no API key configured.
    #[error("missing API key for {0}")]
    MissingKey(&'static str),

    /// The provider answered but flagged the request as unsuccessful.
    #[error("provider rejected request: {0}")]
    Rejected(String),
}

/// Failure of the external phrase-suggestion service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SuggestError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service answered with a non-success HTTP status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// The reply did not contain a usable completion.
    #[error("parse error: {0}")]
    Parse(String),

    /// No API key is configured for the service.
    #[error("missing API key")]
    MissingKey,

    /// The call did not finish within the request deadline.
    #[error("timed out after {0}ms")]
    Timeout(u64),
}

/// Convenience type alias for meme-rank results.
pub type Result<T> = std::result::Result<T, RankError>;
