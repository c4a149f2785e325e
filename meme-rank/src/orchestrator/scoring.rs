//! Per-provider relevance scoring.
//!
//! Content-match providers (the primary catalog) are scored by local text
//! matching against the candidate name:
//!
//! ```text
//! score = 2.0 * (query terms found in name)
//!       + 1.5 * (emotion labels with a trigger found in name)
//!       + 1.0 / word_count(name)
//! ```
//!
//! Source-trust providers give every candidate the provider's fixed
//! weight. Either way the provider's result limit is applied afterwards.

use crate::analysis::emotion::mentions_emotion;
use crate::lexicon::Lexicon;
use crate::provider::{ProviderRequest, ProviderSpec, ScoringPolicy};
use crate::types::{Candidate, ScoredCandidate};

/// Bonus per query term that occurs in a candidate name.
const TERM_MATCH_WEIGHT: f64 = 2.0;

/// Bonus per emotion label with a trigger word in a candidate name.
const EMOTION_MATCH_WEIGHT: f64 = 1.5;

/// Content-match score of one candidate name.
///
/// `terms` must already be lower-case. Matching is by substring on the
/// lower-cased name. Shorter names get a larger iconicity bonus.
pub fn content_score(name: &str, request: &ProviderRequest, lexicon: &Lexicon) -> f64 {
    let name = name.to_lowercase();

    let term_hits = request
        .terms
        .iter()
        .filter(|term| name.contains(term.as_str()))
        .count();

    let emotion_hits = request
        .emotions
        .iter()
        .filter(|label| mentions_emotion(&name, **label, lexicon))
        .count();

    let word_count = name.split_whitespace().count().max(1);

    term_hits as f64 * TERM_MATCH_WEIGHT
        + emotion_hits as f64 * EMOTION_MATCH_WEIGHT
        + 1.0 / word_count as f64
}

/// Clamp a score into the finite, non-negative range.
fn sanitize(score: f64) -> f64 {
    if score.is_finite() && score > 0.0 {
        score
    } else {
        0.0
    }
}

/// Score one provider's candidates and keep at most `request.limit`.
///
/// Content-match scoring skips unnamed records and stable-sorts by score,
/// so equal scores keep the provider's order. Source-trust scoring keeps
/// the provider's order untouched.
pub fn score_candidates(
    spec: &ProviderSpec,
    priority: usize,
    candidates: Vec<Candidate>,
    request: &ProviderRequest,
    lexicon: &Lexicon,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = match spec.scoring {
        ScoringPolicy::ContentMatch => {
            let mut scored: Vec<ScoredCandidate> = candidates
                .into_iter()
                .filter(|c| !c.name.trim().is_empty())
                .map(|candidate| {
                    let score = sanitize(content_score(&candidate.name, request, lexicon));
                    ScoredCandidate {
                        candidate,
                        score,
                        priority,
                    }
                })
                .collect();
            scored.sort_by(|a, b| b.score.total_cmp(&a.score));
            scored
        }
        ScoringPolicy::SourceTrust => {
            let score = sanitize(spec.source_weight);
            candidates
                .into_iter()
                .map(|candidate| ScoredCandidate {
                    candidate,
                    score,
                    priority,
                })
                .collect()
        }
    };

    scored.truncate(request.limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::QueryPolicy;
    use crate::types::{EmotionLabel, EmotionSet, Tier};

    fn request(terms: &[&str], emotions: &[EmotionLabel], limit: usize) -> ProviderRequest {
        ProviderRequest {
            terms: terms.iter().map(|t| t.to_string()).collect(),
            emotions: emotions.iter().copied().collect::<EmotionSet>(),
            limit,
        }
    }

    fn spec(scoring: ScoringPolicy, weight: f64) -> ProviderSpec {
        ProviderSpec {
            id: "test",
            result_limit: 10,
            source_weight: weight,
            query_policy: QueryPolicy::FullQuery,
            scoring,
            min_tier: Tier::Free,
        }
    }

    fn candidate(id: &str, name: &str) -> Candidate {
        Candidate::new(id, name, format!("https://i.example/{id}.jpg"), "test")
    }

    #[test]
    fn iconicity_only_when_nothing_matches() {
        let req = request(&["stonks"], &[], 10);
        let score = content_score("Drake Hotline Bling", &req, &Lexicon::default());
        assert!((score - 1.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn each_matching_term_adds_two() {
        let req = request(&["success", "kid", "absent"], &[], 10);
        let score = content_score("Success Kid", &req, &Lexicon::default());
        // 2 terms * 2.0 + 1/2
        assert!((score - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn terms_match_as_substrings() {
        let req = request(&["cat"], &[], 10);
        let score = content_score("Grumpy Cats", &req, &Lexicon::default());
        assert!((score - (2.0 + 0.5)).abs() < f64::EPSILON);
    }

    #[test]
    fn emotion_labels_add_one_and_a_half() {
        let req = request(&[], &[EmotionLabel::Happy, EmotionLabel::Sad], 10);
        // "success" triggers happy; nothing triggers sad.
        let score = content_score("Success Kid", &req, &Lexicon::default());
        assert!((score - (1.5 + 0.5)).abs() < f64::EPSILON);
    }

    #[test]
    fn emotion_counted_once_per_label() {
        let req = request(&[], &[EmotionLabel::Excited], 10);
        // "wow" and "amazing" both trigger excited.
        let score = content_score("wow amazing", &req, &Lexicon::default());
        assert!((score - (1.5 + 0.5)).abs() < f64::EPSILON);
    }

    #[test]
    fn content_match_sorts_and_limits() {
        let candidates = vec![
            candidate("1", "Drake Hotline Bling"),
            candidate("2", "Success Kid"),
            candidate("3", "Grumpy Cat"),
            candidate("4", "Cat Success Story Meme"),
        ];
        let req = request(&["cat", "success"], &[], 2);
        let scored = score_candidates(
            &spec(ScoringPolicy::ContentMatch, 1.0),
            0,
            candidates,
            &req,
            &Lexicon::default(),
        );
        assert_eq!(scored.len(), 2);
        // "Cat Success Story Meme": 4.0 + 0.25; "Success Kid": 2.0 + 0.5
        assert_eq!(scored[0].candidate.id, "4");
        assert_eq!(scored[1].candidate.id, "2");
        assert!(scored[0].score >= scored[1].score);
    }

    #[test]
    fn content_match_ties_keep_provider_order() {
        let candidates = vec![candidate("a", "Alpha Beta"), candidate("b", "Gamma Delta")];
        let req = request(&["zzz"], &[], 10);
        let scored = score_candidates(
            &spec(ScoringPolicy::ContentMatch, 1.0),
            0,
            candidates,
            &req,
            &Lexicon::default(),
        );
        assert_eq!(scored[0].candidate.id, "a");
        assert_eq!(scored[1].candidate.id, "b");
    }

    #[test]
    fn unnamed_records_are_skipped() {
        let candidates = vec![candidate("1", ""), candidate("2", "   "), candidate("3", "Doge")];
        let scored = score_candidates(
            &spec(ScoringPolicy::ContentMatch, 1.0),
            0,
            candidates,
            &request(&["doge"], &[], 10),
            &Lexicon::default(),
        );
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].candidate.id, "3");
    }

    #[test]
    fn source_trust_assigns_weight_and_priority() {
        let candidates = vec![candidate("giphy-1", "x"), candidate("giphy-2", "")];
        let scored = score_candidates(
            &spec(ScoringPolicy::SourceTrust, 0.8),
            1,
            candidates,
            &request(&["cat"], &[], 4),
            &Lexicon::default(),
        );
        assert_eq!(scored.len(), 2);
        for s in &scored {
            assert!((s.score - 0.8).abs() < f64::EPSILON);
            assert_eq!(s.priority, 1);
        }
    }

    #[test]
    fn source_trust_limit_applies() {
        let candidates = (0..5).map(|i| candidate(&format!("t{i}"), "gif")).collect();
        let scored = score_candidates(
            &spec(ScoringPolicy::SourceTrust, 0.6),
            2,
            candidates,
            &request(&["cat"], &[], 1),
            &Lexicon::default(),
        );
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].candidate.id, "t0");
    }

    #[test]
    fn invalid_weights_are_clamped() {
        for weight in [f64::NAN, f64::INFINITY, -1.0] {
            let scored = score_candidates(
                &spec(ScoringPolicy::SourceTrust, weight),
                0,
                vec![candidate("1", "x")],
                &request(&["x"], &[], 4),
                &Lexicon::default(),
            );
            assert!(scored[0].score.is_finite());
            assert!(scored[0].score >= 0.0);
        }
    }
}
