//! Watchlist screening core
//!
//! The pure scoring pipeline: name canonicalization, candidate retrieval
//! against immutable watchlist snapshots, multi-factor match scoring, and
//! tiered classification. No I/O, no clock, no randomness; identical inputs
//! always produce identical output.

pub mod classify;
pub mod error;
pub mod index;
pub mod normalize;
pub mod scorer;
pub mod similarity;
pub mod types;

pub use classify::classify;
pub use error::{Result, ScreeningError};
pub use index::{IndexedEntry, WatchlistIndex, DEFAULT_EXHAUSTIVE_SCAN_CUTOFF};
pub use normalize::{normalize, NormalizedName};
pub use scorer::{MatchScorer, ScorerWeights, ScreenSubject};
pub use similarity::name_similarity;
pub use types::{
    BatchScreeningResult, BatchSummary, DobConfidence, DobMatch, ListType, MatchDetails,
    MatchStatus, PartialDate, PartyRecord, PartyType, RecordResult, RecordStatus,
    ScreeningMatch, ScreeningOptions, WatchlistEntry,
};
