//! Factorization configuration
//!
//! [`LuConfig`] carries the size limits, lane count and singular-pivot
//! policy. Every field has a default, so a partial JSON document is enough:
//!
//! ```json
//! { "lanes": 8, "singular_policy": "strict", "pivot_tolerance": 1e-12 }
//! ```

use crate::error::{LuError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How the sweep reacts to a zero, tiny or non-finite pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SingularPolicy {
    /// No detection: `info` stays 0 and non-finite values propagate.
    Ignore,
    /// Keep eliminating, but record the first singular step in `info`.
    #[default]
    Report,
    /// Stop at the first singular step and return an error.
    Strict,
}

/// Configuration for [`getrf_nopivot`](crate::getrf_nopivot) and
/// [`lu_nopivot`](crate::lu_nopivot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LuConfig {
    /// Maximum number of rows accepted (NRMAX)
    pub max_rows: usize,
    /// Maximum number of columns accepted (NCMAX)
    pub max_cols: usize,
    /// Number of computation lanes the rows are distributed over (NCU)
    pub lanes: usize,
    /// Reaction to singular pivots
    pub singular_policy: SingularPolicy,
    /// Pivots with magnitude `<=` this value are singular
    pub pivot_tolerance: f64,
    /// Process lanes concurrently when the `rayon` feature is enabled
    pub parallel: bool,
    /// Run the sweep inside a thread pool with one thread per lane
    pub dedicated_pool: bool,
    /// Log progress every N elimination steps (0 = no output)
    pub print_interval: usize,
}

impl Default for LuConfig {
    fn default() -> Self {
        Self {
            max_rows: 1024,
            max_cols: 1024,
            lanes: 4,
            singular_policy: SingularPolicy::Report,
            pivot_tolerance: 0.0,
            parallel: true,
            dedicated_pool: false,
            print_interval: 0,
        }
    }
}

impl LuConfig {
    /// Configuration with the given lane count and default everything else
    pub fn with_lanes(lanes: usize) -> Self {
        Self {
            lanes,
            ..Self::default()
        }
    }

    /// Same configuration with the strict singular policy
    pub fn strict(mut self) -> Self {
        self.singular_policy = SingularPolicy::Strict;
        self
    }

    /// Parse a configuration from a JSON string and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LuConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file and validate it
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| LuError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    /// Check the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.lanes == 0 {
            return Err(LuError::InvalidLaneCount);
        }
        if self.max_rows == 0 || self.max_cols == 0 {
            return Err(LuError::Config(
                "max_rows and max_cols must be positive".to_string(),
            ));
        }
        if !self.pivot_tolerance.is_finite() || self.pivot_tolerance < 0.0 {
            return Err(LuError::Config(format!(
                "pivot_tolerance must be a finite non-negative number, got {}",
                self.pivot_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = LuConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.singular_policy, SingularPolicy::Report);
    }

    #[test]
    fn test_partial_json() {
        let config =
            LuConfig::from_json_str(r#"{ "lanes": 8, "singular_policy": "strict" }"#).unwrap();
        assert_eq!(config.lanes, 8);
        assert_eq!(config.singular_policy, SingularPolicy::Strict);
        assert_eq!(config.max_rows, 1024);
        assert!(config.parallel);
    }

    #[test]
    fn test_zero_lanes_rejected() {
        let err = LuConfig::from_json_str(r#"{ "lanes": 0 }"#).unwrap_err();
        assert!(matches!(err, LuError::InvalidLaneCount));
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let config = LuConfig {
            pivot_tolerance: -1.0,
            ..LuConfig::default()
        };
        assert!(matches!(config.validate(), Err(LuError::Config(_))));
    }

    #[test]
    fn test_malformed_json() {
        let err = LuConfig::from_json_str("{ lanes: ").unwrap_err();
        assert!(matches!(err, LuError::Config(_)));
    }
}
