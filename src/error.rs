//! Error types for the meme-finder boundary.

use meme_rank::RankError;

/// Errors that stop a find request before or during ranking.
///
/// None of these reach the caller as-is: the boundary turns each into a
/// generic response message and logs the detail.
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    /// The document could not be used (empty or unreadable).
    #[error("input error: {0}")]
    Input(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The ranking engine rejected its configuration.
    #[error("rank error: {0}")]
    Rank(#[from] RankError),
}

impl FinderError {
    /// Returns `true` for errors caused by the submitted document.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, FinderError>;
