//! Core types for watchlist screening
//!
//! All types are designed for:
//! - Deterministic serialization (stable field order, no maps)
//! - Closed status enums with exhaustive matching
//! - Reproducible batch results (no ids or timestamps inside them)

use crate::error::{Result, ScreeningError};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a reference watchlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    Sanctions,
    Pep,
    AdverseMedia,
}

impl ListType {
    /// Stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ListType::Sanctions => "sanctions",
            ListType::Pep => "pep",
            ListType::AdverseMedia => "adverse_media",
        }
    }

    /// Severity rank used for deterministic tie-breaks (lower is more severe)
    pub fn severity_rank(&self) -> u8 {
        match self {
            ListType::Sanctions => 0,
            ListType::Pep => 1,
            ListType::AdverseMedia => 2,
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Kind of party being screened or listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyType {
    #[default]
    Individual,
    Company,
}

/// A possibly incomplete date of birth
///
/// Reference lists frequently carry year-only or year-month dates. A component
/// that is absent on either side never counts as matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDate {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl PartialDate {
    /// Parse `YYYY`, `YYYY-MM` or `YYYY-MM-DD`
    ///
    /// Full dates must exist on the calendar (leap years included).
    /// Slash-separated forms are rejected: `DD/MM/YYYY` and `MM/DD/YYYY` cannot
    /// be told apart, so guessing would silently corrupt DOB evidence.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let invalid = || ScreeningError::InvalidDate(raw.to_string());

        let mut parts = trimmed.splitn(3, '-');
        let year: i32 = parts
            .next()
            .filter(|y| y.len() == 4)
            .and_then(|y| y.parse().ok())
            .ok_or_else(invalid)?;

        let month = match parts.next() {
            Some(m) => Some(
                m.parse::<u32>()
                    .ok()
                    .filter(|m| (1..=12).contains(m))
                    .ok_or_else(invalid)?,
            ),
            None => None,
        };

        let day = match parts.next() {
            Some(d) => Some(d.parse::<u32>().ok().ok_or_else(invalid)?),
            None => None,
        };

        if let (Some(month), Some(day)) = (month, day) {
            if NaiveDate::from_ymd_opt(year, month, day).is_none() {
                return Err(invalid());
            }
        }

        Ok(Self { year, month, day })
    }

    /// Graded strength of agreement with another date
    pub fn compare(&self, other: &PartialDate) -> DobConfidence {
        if self.year != other.year {
            return DobConfidence::None;
        }

        let month_match = matches!((self.month, other.month), (Some(a), Some(b)) if a == b);
        let day_match = matches!((self.day, other.day), (Some(a), Some(b)) if a == b);

        match (month_match, day_match) {
            (true, true) => DobConfidence::Exact,
            (true, false) | (false, true) => DobConfidence::Partial,
            (false, false) => DobConfidence::YearOnly,
        }
    }
}

impl From<NaiveDate> for PartialDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: Some(date.month()),
            day: Some(date.day()),
        }
    }
}

/// A reference watchlist entry (externally supplied, read-only to the engine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    /// Stable id, unique within a list snapshot
    pub id: String,
    pub name: String,
    pub party_type: PartyType,
    pub dob: Option<PartialDate>,
    /// ISO country codes
    pub countries: Vec<String>,
    pub aliases: Vec<String>,
    pub list_name: String,
    pub list_type: ListType,
    pub reason: Option<String>,
    pub source_url: Option<String>,
}

/// An input party record, ephemeral per batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyRecord {
    /// Caller-supplied, unique within the batch
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub party_type: PartyType,
    /// Raw date string; parsed during the run so a bad value degrades that
    /// record instead of failing the batch
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Graded strength of a date-of-birth match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DobConfidence {
    Exact,
    Partial,
    YearOnly,
    None,
}

impl DobConfidence {
    /// Booster weight applied to the aggregate score
    pub fn boost(&self) -> f64 {
        match self {
            DobConfidence::Exact => 1.0,
            DobConfidence::Partial => 0.5,
            DobConfidence::YearOnly => 0.2,
            DobConfidence::None => 0.0,
        }
    }

    /// Only exact and partial agreement count as a match; a bare year is too
    /// weak on its own
    pub fn is_match(&self) -> bool {
        matches!(self, DobConfidence::Exact | DobConfidence::Partial)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DobMatch {
    pub matches: bool,
    pub confidence: DobConfidence,
}

impl DobMatch {
    pub fn none() -> Self {
        Self {
            matches: false,
            confidence: DobConfidence::None,
        }
    }

    pub fn from_confidence(confidence: DobConfidence) -> Self {
        Self {
            matches: confidence.is_match(),
            confidence,
        }
    }
}

/// Per-factor breakdown behind an aggregate match score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    /// Name similarity in [0, 1]
    pub name_score: f64,
    pub dob: DobMatch,
    pub country_match: bool,
    /// The alias that drove the name score, when it beat the primary name
    pub alias_matched: Option<String>,
}

/// Disposition state of a surfaced match
///
/// The engine only ever emits `PendingReview`; the terminal states are
/// assigned exclusively by the review workflow and are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    PendingReview,
    ConfirmedMatch,
    FalsePositive,
}

impl MatchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::ConfirmedMatch | MatchStatus::FalsePositive)
    }
}

/// A scored candidate retained above the threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningMatch {
    pub record_id: String,
    pub entry: WatchlistEntry,
    /// Aggregate of `details`, in [0, 1]
    pub match_score: f64,
    pub details: MatchDetails,
    pub status: MatchStatus,
}

/// Rolled-up status of one screened record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Clear,
    PendingReview,
    ConfirmedMatch,
    FalsePositive,
}

impl RecordStatus {
    /// Most severe status present among a record's matches
    pub fn from_matches(matches: &[ScreeningMatch]) -> Self {
        let mut status = RecordStatus::Clear;
        for m in matches {
            let candidate = match m.status {
                MatchStatus::ConfirmedMatch => RecordStatus::ConfirmedMatch,
                MatchStatus::PendingReview => RecordStatus::PendingReview,
                MatchStatus::FalsePositive => RecordStatus::FalsePositive,
            };
            if Self::severity(candidate) < Self::severity(status) {
                status = candidate;
            }
        }
        status
    }

    fn severity(status: RecordStatus) -> u8 {
        match status {
            RecordStatus::ConfirmedMatch => 0,
            RecordStatus::PendingReview => 1,
            RecordStatus::FalsePositive => 2,
            RecordStatus::Clear => 3,
        }
    }
}

/// Result for one input record, in submission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordResult {
    pub record_id: String,
    pub record_name: String,
    pub status: RecordStatus,
    /// Descending by match score
    pub matches: Vec<ScreeningMatch>,
    /// Per-record degradations (bad DOB, empty name); never a batch failure
    pub diagnostics: Vec<String>,
}

/// Aggregate counters, recomputed from `results` so they cannot drift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub clear: usize,
    /// Records with at least one pending-review match
    pub potential_matches: usize,
    /// Records with at least one confirmed match
    pub confirmed_matches: usize,
    /// All matches across all records
    pub total_matches: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[RecordResult]) -> Self {
        Self {
            total: results.len(),
            clear: results
                .iter()
                .filter(|r| r.status == RecordStatus::Clear)
                .count(),
            potential_matches: results
                .iter()
                .filter(|r| {
                    r.matches
                        .iter()
                        .any(|m| m.status == MatchStatus::PendingReview)
                })
                .count(),
            confirmed_matches: results
                .iter()
                .filter(|r| {
                    r.matches
                        .iter()
                        .any(|m| m.status == MatchStatus::ConfirmedMatch)
                })
                .count(),
            total_matches: results.iter().map(|r| r.matches.len()).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchScreeningResult {
    pub summary: BatchSummary,
    pub results: Vec<RecordResult>,
}

/// Per-batch screening options
///
/// An explicit value object passed into every run; there is no process-wide
/// selected-lists state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningOptions {
    pub threshold: f64,
    pub lists: Vec<String>,
    pub include_aliases: bool,
    pub check_dob: bool,
    pub check_country: bool,
}

impl ScreeningOptions {
    /// Fail-fast validation; an invalid batch processes nothing
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ScreeningError::InvalidThreshold(self.threshold));
        }
        if self.lists.is_empty() {
            return Err(ScreeningError::NoListsSelected);
        }
        Ok(())
    }
}
