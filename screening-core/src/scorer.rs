//! Multi-factor match scoring
//!
//! Name similarity dominates; date-of-birth and country agreement act as
//! confidence boosters that can raise a score but never create a match on
//! their own. Monotonicity is a hard contract: a better name score, a
//! stronger DOB tier, or a country match can only ever raise the aggregate.

use crate::index::IndexedEntry;
use crate::normalize::NormalizedName;
use crate::similarity::name_similarity;
use crate::types::{DobMatch, MatchDetails, PartialDate, ScreeningOptions};
use serde::{Deserialize, Serialize};

/// Weighting knobs for the aggregate score
///
/// `match_score = name_score * (1 + dob_weight * dob_boost + country_weight * country_boost)`,
/// clamped to [0, 1]. Defaults are a reasonable starting point, not a tuned
/// policy; deployments should calibrate against labeled data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerWeights {
    pub dob_weight: f64,
    pub country_weight: f64,
    /// Candidates with a name score below this floor are never retained,
    /// regardless of DOB or country agreement
    pub name_floor: f64,
}

impl Default for ScorerWeights {
    fn default() -> Self {
        Self {
            dob_weight: 0.15,
            country_weight: 0.10,
            name_floor: 0.3,
        }
    }
}

/// A party record prepared for scoring: canonical name plus parsed evidence
#[derive(Debug, Clone)]
pub struct ScreenSubject {
    pub name: NormalizedName,
    pub dob: Option<PartialDate>,
    pub country: Option<String>,
}

/// Scores one record against one candidate entry
#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    weights: ScorerWeights,
}

impl MatchScorer {
    pub fn new(weights: ScorerWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScorerWeights {
        &self.weights
    }

    /// Compute the aggregate score and its per-factor breakdown
    pub fn score(
        &self,
        subject: &ScreenSubject,
        candidate: &IndexedEntry,
        options: &ScreeningOptions,
    ) -> (f64, MatchDetails) {
        let mut name_score = name_similarity(&subject.name, &candidate.primary);
        let mut alias_matched = None;

        if options.include_aliases {
            for alias in &candidate.aliases {
                let score = name_similarity(&subject.name, &alias.norm);
                // Strictly greater: the primary name wins ties
                if score > name_score {
                    name_score = score;
                    alias_matched = Some(alias.raw.clone());
                }
            }
        }

        let dob = if options.check_dob {
            match (subject.dob.as_ref(), candidate.entry.dob.as_ref()) {
                (Some(record_dob), Some(entry_dob)) => {
                    DobMatch::from_confidence(record_dob.compare(entry_dob))
                }
                // A missing DOB on either side is absence of evidence, not an error
                _ => DobMatch::none(),
            }
        } else {
            DobMatch::none()
        };

        let country_match = options.check_country
            && subject
                .country
                .as_deref()
                .map(|code| {
                    candidate
                        .entry
                        .countries
                        .iter()
                        .any(|c| c.eq_ignore_ascii_case(code))
                })
                .unwrap_or(false);

        let country_boost = if country_match { 1.0 } else { 0.0 };
        let boost = 1.0
            + self.weights.dob_weight * dob.confidence.boost()
            + self.weights.country_weight * country_boost;
        let match_score = (name_score * boost).clamp(0.0, 1.0);

        (
            match_score,
            MatchDetails {
                name_score,
                dob,
                country_match,
                alias_matched,
            },
        )
    }
}
