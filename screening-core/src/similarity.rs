//! Fuzzy name similarity
//!
//! Jaro-Winkler over canonical forms, taking the better of the
//! original-order and token-sorted comparisons. Bounded to [0, 1];
//! equality of normalized strings yields exactly 1.0.

use crate::normalize::NormalizedName;
use strsim::jaro_winkler;

/// Similarity between two canonical names, in [0, 1]
///
/// The token-sorted comparison makes the metric symmetric under word
/// reordering ("Acme Trading" vs "Trading Acme"), which is the dominant
/// variation for company names.
pub fn name_similarity(a: &NormalizedName, b: &NormalizedName) -> f64 {
    if a.joined == b.joined || a.sorted == b.sorted {
        return 1.0;
    }

    let direct = jaro_winkler(&a.joined, &b.joined);
    let reordered = jaro_winkler(&a.sorted, &b.sorted);
    direct.max(reordered).clamp(0.0, 1.0)
}
