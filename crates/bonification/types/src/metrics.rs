//! Performance metric types
//!
//! Each job carries four measured dimensions. Fabrication, pickup and
//! assembly are time-like (lower is better); quality is higher-is-better.

use crate::{AccountId, BonificationError, BonificationResult, Category, JobId};
use serde::{Deserialize, Serialize};

/// Score of a component exactly on target
pub const BASE_SCORE: u32 = 80;
/// Maximum bonus above [`BASE_SCORE`]
pub const MAX_BONUS: u32 = 20;
/// Upper bound of the component scale
pub const MAX_SCORE: u32 = 100;
/// Floor applied to heavy time overruns and the score of a missing quality reading
pub const MIN_PERFORMANCE_THRESHOLD: u32 = 60;
/// Score of a time-like component with no measurement
pub const MISSING_DATA_SCORE: u32 = 1;
/// Intermediate scale of the weighted aggregate
pub const FIXED_POINT_SCALE: u128 = 10_000;
/// Completed jobs required before targets adapt
pub const MIN_HISTORY_FOR_ADJUSTMENT: usize = 3;
/// Smallest permitted history window
pub const MIN_HISTORY_LIMIT: usize = 3;
/// History window capacity when nothing is configured
pub const DEFAULT_HISTORY_LIMIT: usize = 10;
/// Inclusive band for an adjustment threshold
pub const ADJUSTMENT_THRESHOLD_BAND: (u32, u32) = (60, 95);
/// Target scaling applied when a category underperforms
pub const TARGET_RAISE_PERCENT: u64 = 105;
/// Target scaling applied when a category overperforms
pub const TARGET_LOWER_PERCENT: u64 = 95;

/// The four measured dimensions of a job
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MetricSet {
    pub fabrication_time: u64,
    pub quality: u64,
    pub pickup_time: u64,
    pub assembly_time: u64,
}

impl MetricSet {
    pub fn new(fabrication_time: u64, quality: u64, pickup_time: u64, assembly_time: u64) -> Self {
        Self {
            fabrication_time,
            quality,
            pickup_time,
            assembly_time,
        }
    }

    /// True when every dimension is non-zero
    pub fn is_fully_set(&self) -> bool {
        self.fabrication_time > 0 && self.quality > 0 && self.pickup_time > 0 && self.assembly_time > 0
    }
}

/// Recorded measurements of a single job
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobMetrics {
    pub job_id: JobId,
    pub category: Category,
    /// Copied from the category's base targets the first time the job is scored
    pub targets: Option<MetricSet>,
    pub actuals: MetricSet,
    pub completed: bool,
    pub performance_score: u32,
    pub submitted_by: AccountId,
}

impl JobMetrics {
    pub fn new(job_id: JobId, category: Category, actuals: MetricSet, submitted_by: AccountId) -> Self {
        Self {
            job_id,
            category,
            targets: None,
            actuals,
            completed: false,
            performance_score: 0,
            submitted_by,
        }
    }
}

/// Per-metric weights
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weights {
    pub fabrication_time: u32,
    pub quality: u32,
    pub pickup_time: u32,
    pub assembly_time: u32,
}

impl Weights {
    pub fn new(fabrication_time: u32, quality: u32, pickup_time: u32, assembly_time: u32) -> Self {
        Self {
            fabrication_time,
            quality,
            pickup_time,
            assembly_time,
        }
    }

    pub fn unit() -> Self {
        Self::new(1, 1, 1, 1)
    }

    pub fn total(&self) -> u64 {
        self.fabrication_time as u64
            + self.quality as u64
            + self.pickup_time as u64
            + self.assembly_time as u64
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::unit()
    }
}

/// Weights and adjustment threshold of a category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentFactors {
    pub weights: Weights,
    pub threshold: u32,
}

impl AdjustmentFactors {
    pub fn new(weights: Weights, threshold: u32) -> Self {
        Self { weights, threshold }
    }

    /// Every weight must be at least 1 and the threshold inside the band
    pub fn validate(&self) -> BonificationResult<()> {
        let w = &self.weights;
        if w.fabrication_time == 0 || w.quality == 0 || w.pickup_time == 0 || w.assembly_time == 0 {
            return Err(BonificationError::InvalidParameters(
                "every weight must be at least 1".into(),
            ));
        }
        let (low, high) = ADJUSTMENT_THRESHOLD_BAND;
        if self.threshold < low || self.threshold > high {
            return Err(BonificationError::InvalidParameters(format!(
                "threshold {} outside [{}, {}]",
                self.threshold, low, high
            )));
        }
        Ok(())
    }
}

impl Default for AdjustmentFactors {
    fn default() -> Self {
        Self {
            weights: Weights::unit(),
            threshold: ADJUSTMENT_THRESHOLD_BAND.0,
        }
    }
}

/// Component scores of the four dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ComponentScores {
    pub fabrication_time: u32,
    pub quality: u32,
    pub pickup_time: u32,
    pub assembly_time: u32,
}

impl ComponentScores {
    pub fn min(&self) -> u32 {
        self.fabrication_time
            .min(self.quality)
            .min(self.pickup_time)
            .min(self.assembly_time)
    }

    pub fn max(&self) -> u32 {
        self.fabrication_time
            .max(self.quality)
            .max(self.pickup_time)
            .max(self.assembly_time)
    }
}

/// Outcome of one adaptive controller run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetAdjustment {
    /// Targets loosened by [`TARGET_RAISE_PERCENT`]
    Raised,
    /// Targets tightened by [`TARGET_LOWER_PERCENT`]
    Lowered,
    /// Average inside the dead band
    Held,
}
