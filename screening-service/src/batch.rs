//! Batch screening orchestrator
//!
//! Runs every record of a batch through the scoring pipeline. Records are
//! independent and screened concurrently, one task per record over a shared
//! watchlist snapshot; results are joined in submission order. Option errors
//! fail the whole batch before any work; per-record faults degrade that one
//! record and never abort the batch.

use crate::error::{Result, ServiceError};
use screening_core::{
    classify, normalize, BatchScreeningResult, BatchSummary, MatchScorer, PartialDate,
    PartyRecord, RecordResult, RecordStatus, ScorerWeights, ScreenSubject, ScreeningOptions,
    WatchlistIndex,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Screens batches of party records against a watchlist snapshot
pub struct BatchScreener {
    index: Arc<WatchlistIndex>,
    weights: ScorerWeights,
}

impl BatchScreener {
    pub fn new(index: Arc<WatchlistIndex>, weights: ScorerWeights) -> Self {
        Self { index, weights }
    }

    /// Run a full batch
    ///
    /// Deterministic for fixed records, options, and snapshot: no randomness,
    /// no clock, and summary counters are recomputed from the results.
    pub async fn run_batch(
        &self,
        records: Vec<PartyRecord>,
        options: ScreeningOptions,
    ) -> Result<BatchScreeningResult> {
        options.validate()?;
        for code in &options.lists {
            if !self.index.contains_list(code) {
                return Err(screening_core::ScreeningError::UnknownList(code.clone()).into());
            }
        }

        let options = Arc::new(options);
        let mut handles = Vec::with_capacity(records.len());
        for record in records {
            let index = Arc::clone(&self.index);
            let options = Arc::clone(&options);
            let weights = self.weights.clone();
            handles.push(tokio::spawn(async move {
                screen_record(&index, &weights, record, &options)
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(
                handle
                    .await
                    .map_err(|e| ServiceError::Task(e.to_string()))?,
            );
        }

        Ok(BatchScreeningResult {
            summary: BatchSummary::from_results(&results),
            results,
        })
    }
}

// One record through the pipeline: canonicalize, retrieve, score, classify.
// Field-level faults downgrade to diagnostics; the record always appears in
// the results.
fn screen_record(
    index: &WatchlistIndex,
    weights: &ScorerWeights,
    record: PartyRecord,
    options: &ScreeningOptions,
) -> RecordResult {
    let mut diagnostics = Vec::new();

    let name = match normalize(&record.name) {
        Ok(name) => name,
        Err(_) => {
            warn!("Record {} has a blank name; not screened", record.id);
            diagnostics.push("name is empty after normalization; record not screened".to_string());
            return RecordResult {
                record_id: record.id,
                record_name: record.name,
                status: RecordStatus::Clear,
                matches: vec![],
                diagnostics,
            };
        }
    };

    let dob = match record.dob.as_deref().filter(|_| options.check_dob) {
        Some(raw) => match PartialDate::parse(raw) {
            Ok(date) => Some(date),
            Err(_) => {
                warn!("Record {} has unparseable dob {:?}", record.id, raw);
                diagnostics.push(format!(
                    "unparseable dob {raw:?}; screened without date of birth"
                ));
                None
            }
        },
        None => None,
    };

    let subject = ScreenSubject {
        name,
        dob,
        country: record.country.clone(),
    };

    let candidates = match index.retrieve(
        &subject.name,
        record.party_type,
        &options.lists,
        options.include_aliases,
    ) {
        Ok(candidates) => candidates,
        Err(e) => {
            // Lists are validated up front, so this is unexpected; isolate it
            // to this record rather than failing the batch
            warn!("Candidate retrieval failed for record {}: {e}", record.id);
            diagnostics.push(format!("candidate retrieval failed: {e}"));
            return RecordResult {
                record_id: record.id,
                record_name: record.name,
                status: RecordStatus::Clear,
                matches: vec![],
                diagnostics,
            };
        }
    };

    let scorer = MatchScorer::new(weights.clone());
    let scored = candidates
        .into_iter()
        .filter_map(|candidate| {
            let (score, details) = scorer.score(&subject, &candidate, options);
            // Name similarity is necessary evidence; below the floor the
            // candidate is dropped no matter what DOB/country say
            (details.name_score >= weights.name_floor).then_some((candidate, score, details))
        })
        .collect();

    let matches = classify(&record.id, scored, options.threshold);
    if !matches.is_empty() {
        debug!(
            "Record {} has {} potential match(es), top score {:.3}",
            record.id,
            matches.len(),
            matches[0].match_score
        );
    }

    RecordResult {
        record_id: record.id,
        record_name: record.name,
        status: RecordStatus::from_matches(&matches),
        matches,
        diagnostics,
    }
}
