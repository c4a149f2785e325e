//! Merge provider outcomes into one ranked, deduplicated, capped list.
//!
//! Candidates from all providers are concatenated in dispatch order,
//! sorted by score (descending), deduplicated by id keeping the first
//! (best) occurrence, and truncated to the tier cap. Alongside the list,
//! a [`RankReport`] records what each provider contributed, so "no
//! matches" and "call failed" stay distinguishable.

use serde::Serialize;
use std::collections::HashSet;

use crate::types::{Candidate, ScoredCandidate};

use super::dispatch::ProviderOutcome;

/// Whether a provider call produced a usable answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    Ok,
    Failed,
}

/// Per-provider summary of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderReport {
    pub provider: &'static str,
    pub status: ProviderStatus,
    /// Candidates contributed after provider-level scoring and limits.
    pub returned: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Dispatch summary for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RankReport {
    pub providers: Vec<ProviderReport>,
}

impl RankReport {
    /// Number of providers whose call failed.
    pub fn failed(&self) -> usize {
        self.providers
            .iter()
            .filter(|p| p.status == ProviderStatus::Failed)
            .count()
    }

    /// Returns `true` when every dispatched provider failed.
    pub fn all_failed(&self) -> bool {
        !self.providers.is_empty() && self.failed() == self.providers.len()
    }
}

/// Merge `outcomes` (in dispatch order) into at most `cap` candidates.
pub fn merge(outcomes: Vec<ProviderOutcome>, cap: usize) -> (Vec<Candidate>, RankReport) {
    let mut report = RankReport::default();
    let mut all: Vec<ScoredCandidate> = Vec::new();

    for outcome in outcomes {
        let provider = outcome.provider();
        match outcome {
            ProviderOutcome::Fetched { candidates, .. } => {
                report.providers.push(ProviderReport {
                    provider,
                    status: ProviderStatus::Ok,
                    returned: candidates.len(),
                    error: None,
                });
                all.extend(candidates);
            }
            ProviderOutcome::Failed { error, .. } => {
                report.providers.push(ProviderReport {
                    provider,
                    status: ProviderStatus::Failed,
                    returned: 0,
                    error: Some(error.to_string()),
                });
            }
        }
    }

    (rank_candidates(all, cap), report)
}

/// Sort, deduplicate and truncate scored candidates.
///
/// Equal scores order by provider priority, then by the order each
/// provider returned them (the sort is stable).
pub fn rank_candidates(mut all: Vec<ScoredCandidate>, cap: usize) -> Vec<Candidate> {
    all.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.priority.cmp(&b.priority))
    });

    let mut seen: HashSet<String> = HashSet::new();
    all.into_iter()
        .filter(|sc| seen.insert(sc.candidate.id.clone()))
        .take(cap)
        .map(|sc| sc.candidate)
        .collect()
}
