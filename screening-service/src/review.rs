//! Review workflow state machine
//!
//! Every engine-emitted match starts at `pending_review` and is resolved by
//! a human to exactly one terminal disposition. Transitions are
//! compare-and-set under a per-match exclusive guard: of two concurrent
//! resolvers exactly one wins, and the loser observes the terminal state
//! rather than an error. Terminal states never transition again; re-opening
//! means re-running screening, not mutating the old match.

use crate::error::{Result, ServiceError};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use screening_core::{BatchScreeningResult, MatchStatus, ScreeningMatch};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// A match registered for disposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewedMatch {
    pub id: Uuid,
    pub screening: ScreeningMatch,
}

/// Audit record of one applied transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEvent {
    pub match_id: Uuid,
    pub actor: String,
    pub from: MatchStatus,
    pub to: MatchStatus,
    pub at: DateTime<Utc>,
}

/// Outcome of a resolution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// This caller performed the transition
    Applied { status: MatchStatus },
    /// The match was already terminal; reported, not an error
    AlreadyResolved { status: MatchStatus },
}

impl Resolution {
    pub fn status(&self) -> MatchStatus {
        match self {
            Resolution::Applied { status } | Resolution::AlreadyResolved { status } => *status,
        }
    }
}

/// Store of matches awaiting (or past) human disposition
///
/// Ids are assigned here, at the persistence boundary, so batch results stay
/// byte-identical across reruns.
pub struct ReviewQueue {
    matches: DashMap<Uuid, ReviewedMatch>,
    audit: RwLock<Vec<ReviewEvent>>,
}

impl ReviewQueue {
    pub fn new() -> Self {
        Self {
            matches: DashMap::new(),
            audit: RwLock::new(Vec::new()),
        }
    }

    /// Register a single match for review
    pub fn register(&self, screening: ScreeningMatch) -> Uuid {
        let id = Uuid::new_v4();
        self.matches.insert(id, ReviewedMatch { id, screening });
        id
    }

    /// Register every match surfaced by a batch run
    pub fn register_batch(&self, result: &BatchScreeningResult) -> Vec<Uuid> {
        let ids: Vec<Uuid> = result
            .results
            .iter()
            .flat_map(|r| r.matches.iter())
            .map(|m| self.register(m.clone()))
            .collect();
        info!("Registered {} match(es) for review", ids.len());
        ids
    }

    /// Resolve a pending match as a true hit
    ///
    /// Idempotent from the caller's perspective: resolving an
    /// already-terminal match is a no-op that reports the existing state.
    pub fn confirm(&self, match_id: Uuid, actor: &str) -> Result<Resolution> {
        self.resolve(match_id, actor, MatchStatus::ConfirmedMatch)
    }

    /// Resolve a pending match as a false positive
    pub fn mark_false_positive(&self, match_id: Uuid, actor: &str) -> Result<Resolution> {
        self.resolve(match_id, actor, MatchStatus::FalsePositive)
    }

    fn resolve(&self, match_id: Uuid, actor: &str, to: MatchStatus) -> Result<Resolution> {
        // get_mut holds the shard write guard: the check-and-set below is
        // atomic per match, while unrelated matches resolve concurrently
        let mut entry = self
            .matches
            .get_mut(&match_id)
            .ok_or(ServiceError::MatchNotFound(match_id))?;

        let from = entry.screening.status;
        if from.is_terminal() {
            return Ok(Resolution::AlreadyResolved { status: from });
        }

        entry.screening.status = to;
        self.audit.write().push(ReviewEvent {
            match_id,
            actor: actor.to_string(),
            from,
            to,
            at: Utc::now(),
        });
        drop(entry);

        info!("Match {match_id} resolved to {to:?} by {actor}");
        Ok(Resolution::Applied { status: to })
    }

    pub fn get(&self, match_id: Uuid) -> Option<ReviewedMatch> {
        self.matches.get(&match_id).map(|m| m.value().clone())
    }

    /// Matches still awaiting disposition
    pub fn pending(&self) -> Vec<ReviewedMatch> {
        let mut pending: Vec<ReviewedMatch> = self
            .matches
            .iter()
            .filter(|m| m.screening.status == MatchStatus::PendingReview)
            .map(|m| m.value().clone())
            .collect();
        pending.sort_by(|a, b| a.id.cmp(&b.id));
        pending
    }

    /// Applied transitions, in application order
    pub fn audit_trail(&self) -> Vec<ReviewEvent> {
        self.audit.read().clone()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

impl Default for ReviewQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screening_core::{
        DobMatch, ListType, MatchDetails, PartyType, WatchlistEntry,
    };

    fn pending_match() -> ScreeningMatch {
        ScreeningMatch {
            record_id: "r1".to_string(),
            entry: WatchlistEntry {
                id: "E1".to_string(),
                name: "John Smith".to_string(),
                party_type: PartyType::Individual,
                dob: None,
                countries: vec!["US".to_string()],
                aliases: vec![],
                list_name: "OFAC SDN".to_string(),
                list_type: ListType::Sanctions,
                reason: None,
                source_url: None,
            },
            match_score: 0.95,
            details: MatchDetails {
                name_score: 0.95,
                dob: DobMatch::none(),
                country_match: true,
                alias_matched: None,
            },
            status: MatchStatus::PendingReview,
        }
    }

    #[test]
    fn test_confirm_then_idempotent() {
        let queue = ReviewQueue::new();
        let id = queue.register(pending_match());

        let first = queue.confirm(id, "analyst.a").unwrap();
        assert_eq!(
            first,
            Resolution::Applied {
                status: MatchStatus::ConfirmedMatch
            }
        );

        // Second call is a no-op reporting the terminal state
        let second = queue.confirm(id, "analyst.b").unwrap();
        assert_eq!(
            second,
            Resolution::AlreadyResolved {
                status: MatchStatus::ConfirmedMatch
            }
        );

        // And the opposite disposition cannot overwrite it
        let third = queue.mark_false_positive(id, "analyst.c").unwrap();
        assert_eq!(third.status(), MatchStatus::ConfirmedMatch);
        assert_eq!(
            queue.get(id).unwrap().screening.status,
            MatchStatus::ConfirmedMatch
        );
    }

    #[test]
    fn test_false_positive_is_symmetric() {
        let queue = ReviewQueue::new();
        let id = queue.register(pending_match());
        let first = queue.mark_false_positive(id, "analyst.a").unwrap();
        assert_eq!(first.status(), MatchStatus::FalsePositive);
        assert_eq!(
            queue.confirm(id, "analyst.b").unwrap().status(),
            MatchStatus::FalsePositive
        );
    }

    #[test]
    fn test_unknown_match_is_an_error() {
        let queue = ReviewQueue::new();
        assert!(matches!(
            queue.confirm(Uuid::new_v4(), "analyst.a"),
            Err(ServiceError::MatchNotFound(_))
        ));
    }

    #[test]
    fn test_audit_trail_records_actor_and_transition() {
        let queue = ReviewQueue::new();
        let id = queue.register(pending_match());
        queue.confirm(id, "analyst.a").unwrap();
        // No-ops do not append audit events
        queue.confirm(id, "analyst.b").unwrap();

        let trail = queue.audit_trail();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].match_id, id);
        assert_eq!(trail[0].actor, "analyst.a");
        assert_eq!(trail[0].from, MatchStatus::PendingReview);
        assert_eq!(trail[0].to, MatchStatus::ConfirmedMatch);
    }

    #[test]
    fn test_pending_listing() {
        let queue = ReviewQueue::new();
        let a = queue.register(pending_match());
        let b = queue.register(pending_match());
        assert_eq!(queue.pending().len(), 2);

        queue.confirm(a, "analyst.a").unwrap();
        let pending = queue.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, b);
    }

    #[test]
    fn test_concurrent_resolution_has_one_winner() {
        use std::sync::Arc;

        for _ in 0..50 {
            let queue = Arc::new(ReviewQueue::new());
            let id = queue.register(pending_match());

            let confirmer = {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || queue.confirm(id, "analyst.a").unwrap())
            };
            let dismisser = {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || queue.mark_false_positive(id, "analyst.b").unwrap())
            };

            let outcomes = [confirmer.join().unwrap(), dismisser.join().unwrap()];
            let applied = outcomes
                .iter()
                .filter(|o| matches!(o, Resolution::Applied { .. }))
                .count();
            assert_eq!(applied, 1, "exactly one resolver wins");

            // The loser observed the winner's terminal state, and the stored
            // status matches it
            let final_status = queue.get(id).unwrap().screening.status;
            assert!(final_status.is_terminal());
            for outcome in outcomes {
                assert_eq!(outcome.status(), final_status);
            }
            assert_eq!(queue.audit_trail().len(), 1);
        }
    }
}
