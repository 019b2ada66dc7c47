//! Name canonicalization
//!
//! Free-text names are folded into a comparable form before any similarity
//! scoring: diacritics stripped, case folded, punctuation and whitespace
//! collapsed, then tokenized. Both the original token order and a sorted
//! token order are retained; surname/given-name order carries signal for
//! individuals, while company names compare word-order-insensitively.

use crate::error::{Result, ScreeningError};
use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical form of a name, ready for comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    /// Tokens joined in original order
    pub joined: String,
    /// Tokens joined in sorted order
    pub sorted: String,
    pub tokens: Vec<String>,
}

fn punctuation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\p{L}\p{N}\s]+").unwrap())
}

/// Canonicalize a raw name
///
/// Deterministic and locale-free: identical input always yields identical
/// output. An empty result after normalization is an input error.
pub fn normalize(raw: &str) -> Result<NormalizedName> {
    // NFD decomposition, then drop combining marks: "Müller" -> "Muller"
    let stripped: String = raw.nfd().filter(|c| !is_combining_mark(*c)).collect();
    let lowered = stripped.to_lowercase();
    let cleaned = punctuation_re().replace_all(&lowered, " ");

    let tokens: Vec<String> = cleaned
        .split_whitespace()
        .map(|t| t.to_string())
        .collect();

    if tokens.is_empty() {
        return Err(ScreeningError::EmptyName);
    }

    let joined = tokens.join(" ");
    let mut ordered = tokens.clone();
    ordered.sort();
    let sorted = ordered.join(" ");

    Ok(NormalizedName {
        joined,
        sorted,
        tokens,
    })
}
