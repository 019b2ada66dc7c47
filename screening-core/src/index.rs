//! Watchlist index and candidate retrieval
//!
//! Holds immutable list snapshots with pre-normalized names and bounds the
//! cost of scoring against large lists via blocking: entries are posted
//! under one key per folded character of their names, and a record only
//! retrieves entries sharing at least one key. The pruning is provably
//! behavior-preserving: two strings sharing no character have zero Jaro
//! similarity, and zero-name-similarity candidates are never classified as
//! matches. Small lists are scanned exhaustively and both paths apply the
//! same list and party-type filters.

use crate::error::{Result, ScreeningError};
use crate::normalize::{normalize, NormalizedName};
use crate::types::{PartyType, WatchlistEntry};
use dashmap::DashMap;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

/// Lists at or below this size are scanned exhaustively
pub const DEFAULT_EXHAUSTIVE_SCAN_CUTOFF: usize = 512;

/// An alias with its canonical form, kept so the scorer can report which
/// alias string drove a match
#[derive(Debug, Clone)]
pub struct NormalizedAlias {
    pub raw: String,
    pub norm: NormalizedName,
}

/// A watchlist entry with pre-computed canonical forms
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    pub entry: WatchlistEntry,
    pub primary: NormalizedName,
    pub aliases: Vec<NormalizedAlias>,
}

struct ListShard {
    entries: Vec<Arc<IndexedEntry>>,
    // blocking key -> entry positions, ascending
    primary_blocks: HashMap<char, Vec<usize>>,
    alias_blocks: HashMap<char, Vec<usize>>,
}

/// In-memory registry of loaded watchlist snapshots
///
/// Entries are immutable once loaded; screening against a newer snapshot is
/// a new index, not a mutation.
pub struct WatchlistIndex {
    shards: DashMap<String, Arc<ListShard>>,
    exhaustive_cutoff: usize,
}

impl WatchlistIndex {
    pub fn new(exhaustive_cutoff: usize) -> Self {
        Self {
            shards: DashMap::new(),
            exhaustive_cutoff,
        }
    }

    /// Load a list snapshot under a list code
    ///
    /// Entries whose name cannot be normalized are skipped with a warning;
    /// they could never be matched. Unnormalizable aliases are dropped the
    /// same way while the entry itself is kept.
    pub fn load_list(&self, code: &str, entries: Vec<WatchlistEntry>) -> Result<()> {
        let mut indexed = Vec::with_capacity(entries.len());
        let mut primary_blocks: HashMap<char, Vec<usize>> = HashMap::new();
        let mut alias_blocks: HashMap<char, Vec<usize>> = HashMap::new();
        let mut skipped = 0usize;

        for entry in entries {
            let primary = match normalize(&entry.name) {
                Ok(norm) => norm,
                Err(_) => {
                    warn!("Skipping watchlist entry {} with blank name", entry.id);
                    skipped += 1;
                    continue;
                }
            };

            let aliases: Vec<NormalizedAlias> = entry
                .aliases
                .iter()
                .filter_map(|raw| match normalize(raw) {
                    Ok(norm) => Some(NormalizedAlias {
                        raw: raw.clone(),
                        norm,
                    }),
                    Err(_) => {
                        warn!("Dropping blank alias on watchlist entry {}", entry.id);
                        None
                    }
                })
                .collect();

            let position = indexed.len();
            for key in blocking_keys(&primary) {
                primary_blocks.entry(key).or_default().push(position);
            }
            let mut alias_keys = BTreeSet::new();
            for alias in &aliases {
                alias_keys.extend(blocking_keys(&alias.norm));
            }
            for key in alias_keys {
                alias_blocks.entry(key).or_default().push(position);
            }

            indexed.push(Arc::new(IndexedEntry {
                entry,
                primary,
                aliases,
            }));
        }

        info!(
            "Loaded watchlist {} with {} entries ({} skipped)",
            code,
            indexed.len(),
            skipped
        );

        self.shards.insert(
            code.to_string(),
            Arc::new(ListShard {
                entries: indexed,
                primary_blocks,
                alias_blocks,
            }),
        );
        Ok(())
    }

    pub fn contains_list(&self, code: &str) -> bool {
        self.shards.contains_key(code)
    }

    pub fn loaded_lists(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.shards.iter().map(|s| s.key().clone()).collect();
        codes.sort();
        codes
    }

    pub fn total_entries(&self) -> usize {
        self.shards.iter().map(|s| s.value().entries.len()).sum()
    }

    /// Shortlist entries worth full scoring for one record
    ///
    /// Filters to the selected lists and to entries of the same party type;
    /// over-inclusion is always acceptable, exclusion is only allowed when
    /// the excluded entry could never score above zero. Repeated list codes
    /// in the selection are screened once. Result order is load order within
    /// each list, lists in selection order, for determinism.
    pub fn retrieve(
        &self,
        name: &NormalizedName,
        party_type: PartyType,
        lists: &[String],
        include_aliases: bool,
    ) -> Result<Vec<Arc<IndexedEntry>>> {
        let mut candidates = Vec::new();
        let mut seen = HashSet::new();

        for code in lists {
            if !seen.insert(code.as_str()) {
                continue;
            }
            let shard = self
                .shards
                .get(code)
                .ok_or_else(|| ScreeningError::UnknownList(code.clone()))?;

            if shard.entries.len() <= self.exhaustive_cutoff {
                candidates.extend(
                    shard
                        .entries
                        .iter()
                        .filter(|c| c.entry.party_type == party_type)
                        .cloned(),
                );
                continue;
            }

            // An entry absent from every block shares no character with the
            // record, so every Jaro comparison against it is exactly zero
            // and it can never classify as a match. Alias blocks only count
            // when the scorer will look at aliases at all.
            let mut positions = BTreeSet::new();
            for key in blocking_keys(name) {
                if let Some(block) = shard.primary_blocks.get(&key) {
                    positions.extend(block.iter().copied());
                }
                if include_aliases {
                    if let Some(block) = shard.alias_blocks.get(&key) {
                        positions.extend(block.iter().copied());
                    }
                }
            }
            candidates.extend(
                positions
                    .into_iter()
                    .map(|i| &shard.entries[i])
                    .filter(|c| c.entry.party_type == party_type)
                    .cloned(),
            );
        }

        Ok(candidates)
    }
}

impl Default for WatchlistIndex {
    fn default() -> Self {
        Self::new(DEFAULT_EXHAUSTIVE_SCAN_CUTOFF)
    }
}

/// Blocking keys for a normalized name: every character it contains, folded
/// into coarse phonetic groups so common spelling variants share keys.
/// Character-level keys keep the prune conservative: a name missing all of
/// an entry's keys shares no character with it.
fn blocking_keys(name: &NormalizedName) -> BTreeSet<char> {
    name.joined
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(fold_char)
        .collect()
}

fn fold_char(c: char) -> char {
    match c {
        'k' | 'q' => 'c',
        'z' => 's',
        'y' | 'j' => 'i',
        'w' => 'v',
        other => other,
    }
}
