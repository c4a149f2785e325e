//! Ranking orchestrator: tier routing, concurrent dispatch, scoring, merge.
//!
//! [`RankEngine`] turns document text into a query, fans it out to the
//! providers serving the request's tier, scores each provider's answer
//! under that provider's policy, and merges everything into one sorted,
//! deduplicated, capped list.

pub mod dispatch;
pub mod merge;
pub mod rank;
pub mod scoring;

pub use dispatch::{dispatch, ProviderOutcome};
pub use merge::{merge, rank_candidates, ProviderReport, ProviderStatus, RankReport};
pub use rank::{Analysis, RankEngine, RankOutcome, RankedResult};
