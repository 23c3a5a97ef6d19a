//! Engine configuration
//!
//! All fields have defaults so a partial TOML file is enough.

use crate::{
    AdjustmentFactors, BonificationError, BonificationResult, MetricSet, DEFAULT_HISTORY_LIMIT,
    MAX_QUALITY_SCORE, MIN_HISTORY_LIMIT, MIN_PERFORMANCE_FOR_BONUS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration shared by the scorer and the evaluator
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity of every category's history window
    pub history_limit: usize,

    /// Minimum corroborating score for a bonification
    pub min_performance_for_bonus: u32,

    /// Upper bound on a single scorer call made by the evaluator
    pub score_timeout_ms: u64,

    /// Factors installed for the "default" category at startup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_factors: Option<AdjustmentFactors>,

    /// Base targets installed for the "default" category at startup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_base_targets: Option<MetricSet>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            min_performance_for_bonus: MIN_PERFORMANCE_FOR_BONUS,
            score_timeout_ms: 2_000,
            default_factors: None,
            default_base_targets: None,
        }
    }
}

impl EngineConfig {
    pub fn score_timeout(&self) -> Duration {
        Duration::from_millis(self.score_timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> BonificationResult<()> {
        if self.history_limit < MIN_HISTORY_LIMIT {
            return Err(BonificationError::Config(format!(
                "history_limit must be at least {}",
                MIN_HISTORY_LIMIT
            )));
        }
        if self.min_performance_for_bonus == 0 || self.min_performance_for_bonus > MAX_QUALITY_SCORE
        {
            return Err(BonificationError::Config(format!(
                "min_performance_for_bonus {} outside [1, 100]",
                self.min_performance_for_bonus
            )));
        }
        if self.score_timeout_ms == 0 {
            return Err(BonificationError::Config(
                "score_timeout_ms must be non-zero".into(),
            ));
        }
        if let Some(factors) = &self.default_factors {
            factors
                .validate()
                .map_err(|e| BonificationError::Config(format!("default_factors: {}", e)))?;
        }
        if let Some(targets) = &self.default_base_targets {
            if !targets.is_fully_set() {
                return Err(BonificationError::Config(
                    "default_base_targets must all be non-zero".into(),
                ));
            }
        }
        Ok(())
    }
}
