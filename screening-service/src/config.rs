//! Configuration for the screening service

use crate::error::{Result, ServiceError};
use screening_core::{ScorerWeights, ScreeningOptions, DEFAULT_EXHAUSTIVE_SCAN_CUTOFF};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Screening service configuration
///
/// Per-batch `ScreeningOptions` always travel with the batch; these are the
/// deployment-level defaults behind them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Default match threshold when the caller does not supply one
    pub default_threshold: f64,

    /// Lists at or below this entry count are scanned exhaustively instead
    /// of using the blocking index
    pub exhaustive_scan_cutoff: usize,

    /// Score weighting knobs
    pub weights: ScorerWeights,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_threshold: 0.7,
            exhaustive_scan_cutoff: DEFAULT_EXHAUSTIVE_SCAN_CUTOFF,
            weights: ScorerWeights::default(),
        }
    }
}

impl ServiceConfig {
    /// Load from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ServiceError::Config(format!("cannot read config file: {e}")))?;
        toml::from_str(&raw).map_err(|e| ServiceError::Config(format!("invalid config: {e}")))
    }

    /// Batch options over these defaults for a list selection
    pub fn options_for(&self, lists: Vec<String>) -> ScreeningOptions {
        ScreeningOptions {
            threshold: self.default_threshold,
            lists,
            include_aliases: true,
            check_dob: true,
            check_country: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.default_threshold, 0.7);
        assert_eq!(config.exhaustive_scan_cutoff, DEFAULT_EXHAUSTIVE_SCAN_CUTOFF);
        assert_eq!(config.weights.name_floor, 0.3);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: ServiceConfig = toml::from_str(
            r#"
            default_threshold = 0.85

            [weights]
            dob_weight = 0.2
            country_weight = 0.1
            name_floor = 0.4
            "#,
        )
        .unwrap();
        assert_eq!(config.default_threshold, 0.85);
        assert_eq!(config.weights.dob_weight, 0.2);
        // Unset fields keep their defaults
        assert_eq!(config.exhaustive_scan_cutoff, DEFAULT_EXHAUSTIVE_SCAN_CUTOFF);
    }

    #[test]
    fn test_options_for() {
        let options = ServiceConfig::default().options_for(vec!["ofac_sdn".to_string()]);
        assert_eq!(options.threshold, 0.7);
        assert!(options.validate().is_ok());
    }
}
