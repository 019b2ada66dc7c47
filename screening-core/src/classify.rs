//! Tiered classification of scored candidates
//!
//! Keeps every candidate at or above the threshold, always at
//! `pending_review`; terminal dispositions come only from the review
//! workflow. Ordering is fully deterministic: score descending, then list
//! severity (sanctions > pep > adverse media), then entry id.

use crate::index::IndexedEntry;
use crate::types::{MatchDetails, MatchStatus, ScreeningMatch};
use std::sync::Arc;

/// A scored candidate awaiting classification
pub type ScoredCandidate = (Arc<IndexedEntry>, f64, MatchDetails);

/// Apply the threshold and produce ordered screening matches
///
/// Name similarity is necessary evidence: a candidate whose name score is
/// exactly zero is never a match, whatever the threshold. An empty result
/// means the record is clear.
pub fn classify(
    record_id: &str,
    candidates: Vec<ScoredCandidate>,
    threshold: f64,
) -> Vec<ScreeningMatch> {
    let mut kept: Vec<ScreeningMatch> = candidates
        .into_iter()
        .filter(|(_, score, details)| *score >= threshold && details.name_score > 0.0)
        .map(|(candidate, match_score, details)| ScreeningMatch {
            record_id: record_id.to_string(),
            entry: candidate.entry.clone(),
            match_score,
            details,
            status: MatchStatus::PendingReview,
        })
        .collect();

    kept.sort_by(|a, b| {
        b.match_score
            .total_cmp(&a.match_score)
            .then_with(|| {
                a.entry
                    .list_type
                    .severity_rank()
                    .cmp(&b.entry.list_type.severity_rank())
            })
            .then_with(|| a.entry.id.cmp(&b.entry.id))
    });
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::types::{DobMatch, ListType, PartyType, WatchlistEntry};

    fn scored(id: &str, list_type: ListType, score: f64) -> ScoredCandidate {
        let entry = WatchlistEntry {
            id: id.to_string(),
            name: "John Smith".to_string(),
            party_type: PartyType::Individual,
            dob: None,
            countries: vec![],
            aliases: vec![],
            list_name: "Test List".to_string(),
            list_type,
            reason: None,
            source_url: None,
        };
        let indexed = IndexedEntry {
            primary: normalize(&entry.name).unwrap(),
            aliases: vec![],
            entry,
        };
        let details = MatchDetails {
            name_score: score,
            dob: DobMatch::none(),
            country_match: false,
            alias_matched: None,
        };
        (Arc::new(indexed), score, details)
    }

    #[test]
    fn test_threshold_filter() {
        let matches = classify(
            "r1",
            vec![
                scored("E1", ListType::Sanctions, 0.95),
                scored("E2", ListType::Sanctions, 0.69),
                scored("E3", ListType::Pep, 0.70),
            ],
            0.7,
        );
        let kept: Vec<&str> = matches.iter().map(|m| m.entry.id.as_str()).collect();
        assert_eq!(kept, vec!["E1", "E3"]);
        assert!(matches.iter().all(|m| m.match_score >= 0.7));
        assert!(matches
            .iter()
            .all(|m| m.status == MatchStatus::PendingReview));
    }

    #[test]
    fn test_ordering_score_then_severity_then_id() {
        let matches = classify(
            "r1",
            vec![
                scored("B", ListType::AdverseMedia, 0.8),
                scored("A", ListType::Pep, 0.8),
                scored("D", ListType::Sanctions, 0.8),
                scored("C", ListType::Sanctions, 0.8),
                scored("E", ListType::AdverseMedia, 0.9),
            ],
            0.5,
        );
        let order: Vec<&str> = matches.iter().map(|m| m.entry.id.as_str()).collect();
        assert_eq!(order, vec!["E", "C", "D", "A", "B"]);
    }

    #[test]
    fn test_empty_means_clear() {
        let matches = classify("r1", vec![scored("E1", ListType::Sanctions, 0.4)], 0.7);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_zero_name_score_never_kept() {
        // Even a zero threshold does not surface a candidate with no name
        // evidence at all
        let matches = classify("r1", vec![scored("E1", ListType::Sanctions, 0.0)], 0.0);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_record_id_propagates() {
        let matches = classify("acct-42", vec![scored("E1", ListType::Sanctions, 0.9)], 0.5);
        assert_eq!(matches[0].record_id, "acct-42");
    }
}
