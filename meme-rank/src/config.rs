//! Ranking configuration with sensible defaults.
//!
//! [`RankConfig`] controls tier caps, the keyword and suggestion budgets,
//! and the time bounds on provider calls. Treated as immutable once an
//! engine is built.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::RankError;
use crate::types::Tier;

/// Configuration for a ranking engine.
///
/// Use [`Default::default()`] for the standard tier policy, or construct
/// with field overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    /// Maximum results returned to a free-tier request.
    pub free_cap: usize,
    /// Maximum results returned to a premium request.
    pub premium_cap: usize,
    /// Number of keyword occurrences joined into a free-tier query.
    pub free_keyword_count: usize,
    /// Maximum phrases kept from the suggestion service.
    pub max_suggestions: usize,
    /// Upper bound on a single provider call, in milliseconds.
    pub provider_timeout_ms: u64,
    /// Upper bound on the whole request (suggestion plus fan-out), in
    /// milliseconds.
    pub request_deadline_ms: u64,
    /// When the suggestion service fails or returns nothing, build the
    /// premium query with the free-tier keyword scorer instead of
    /// leaving it empty.
    pub fallback_to_keywords: bool,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            free_cap: 5,
            premium_cap: 15,
            free_keyword_count: 5,
            max_suggestions: 10,
            provider_timeout_ms: 5_000,
            request_deadline_ms: 8_000,
            fallback_to_keywords: false,
        }
    }
}

impl RankConfig {
    /// Result cap for `tier`.
    pub fn cap(&self, tier: Tier) -> usize {
        match tier {
            Tier::Free => self.free_cap,
            Tier::Premium => self.premium_cap,
        }
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    pub fn request_deadline(&self) -> Duration {
        Duration::from_millis(self.request_deadline_ms)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - both caps must be greater than 0
    /// - `free_keyword_count` and `max_suggestions` must be greater than 0
    /// - both timeouts must be greater than 0
    /// - `provider_timeout_ms` must be <= `request_deadline_ms`
    pub fn validate(&self) -> Result<(), RankError> {
        if self.free_cap == 0 || self.premium_cap == 0 {
            return Err(RankError::Config(
                "free_cap and premium_cap must be greater than 0".into(),
            ));
        }
        if self.free_keyword_count == 0 {
            return Err(RankError::Config(
                "free_keyword_count must be greater than 0".into(),
            ));
        }
        if self.max_suggestions == 0 {
            return Err(RankError::Config(
                "max_suggestions must be greater than 0".into(),
            ));
        }
        if self.provider_timeout_ms == 0 || self.request_deadline_ms == 0 {
            return Err(RankError::Config(
                "provider_timeout_ms and request_deadline_ms must be greater than 0".into(),
            ));
        }
        if self.provider_timeout_ms > self.request_deadline_ms {
            return Err(RankError::Config(
                "provider_timeout_ms must be <= request_deadline_ms".into(),
            ));
        }
        Ok(())
    }
}
