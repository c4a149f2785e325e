//! Find requests: an extracted document plus the caller's tier.

use meme_rank::Tier;
use serde::{Deserialize, Serialize};

use crate::error::{FinderError, Result};

/// Already-extracted article content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub title: Option<String>,
    pub body: String,
}

impl Document {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: body.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The non-blank title, if any.
    pub fn title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Text handed to the ranking engine. The title, when present, comes
    /// first so its words sit in the early-position region.
    pub fn ranking_text(&self) -> String {
        match self.title() {
            Some(title) => format!("{title}\n{}", self.body),
            None => self.body.clone(),
        }
    }

    /// # Errors
    ///
    /// Returns [`FinderError::Input`] if the body is empty or whitespace.
    pub fn validate(&self) -> Result<()> {
        if self.body.trim().is_empty() {
            return Err(FinderError::Input("document body is empty".into()));
        }
        Ok(())
    }
}

/// One find request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinderRequest {
    pub document: Document,
    #[serde(default)]
    pub tier: Tier,
}

impl FinderRequest {
    pub fn new(document: Document, tier: Tier) -> Self {
        Self { document, tier }
    }

    /// Build a request from an entitlement flag.
    pub fn from_premium_flag(document: Document, premium: bool) -> Self {
        Self::new(document, Tier::from_premium_flag(premium))
    }
}
