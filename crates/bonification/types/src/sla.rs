//! SLA types: contractual targets, evaluation results and violations
//!
//! SLA targets are independent of the scorer's adaptive targets. They are
//! fixed per job at configuration time and never drift.

use crate::{AccountId, BonificationError, BonificationResult, Category, DesignId, JobId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound of a quality score
pub const MAX_QUALITY_SCORE: u32 = 100;
/// Default minimum performance score for a job to earn a bonification
pub const MIN_PERFORMANCE_FOR_BONUS: u32 = 90;
/// Share of a design's price paid out per bonification
pub const BONIFICATION_PERCENT: u64 = 10;

/// Targets supplied when configuring a job's SLA
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaTargets {
    pub target_completion_time: u64,
    pub max_temperature_deviation: u64,
    pub min_quality_score: u32,
    pub manufacturing_type: Category,
    pub design_id: DesignId,
}

impl SlaTargets {
    pub fn validate(&self) -> BonificationResult<()> {
        if self.target_completion_time == 0 {
            return Err(BonificationError::InvalidParameters(
                "target completion time must be non-zero".into(),
            ));
        }
        if self.min_quality_score == 0 || self.min_quality_score > MAX_QUALITY_SCORE {
            return Err(BonificationError::InvalidParameters(format!(
                "minimum quality score {} outside (0, {}]",
                self.min_quality_score, MAX_QUALITY_SCORE
            )));
        }
        if self.manufacturing_type.is_empty() {
            return Err(BonificationError::InvalidParameters(
                "manufacturing type must not be empty".into(),
            ));
        }
        if self.design_id.is_empty() {
            return Err(BonificationError::InvalidParameters(
                "design identifier must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Contractual metrics stored for a job
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SlaMetrics {
    pub job_id: JobId,
    pub target_completion_time: u64,
    pub max_temperature_deviation: u64,
    pub min_quality_score: u32,
    pub timestamp: DateTime<Utc>,
    pub manufacturing_type: Category,
    pub design_id: DesignId,
    pub operator: AccountId,
    pub is_active: bool,
}

impl SlaMetrics {
    pub fn new(job_id: JobId, targets: SlaTargets, operator: AccountId) -> Self {
        Self {
            job_id,
            target_completion_time: targets.target_completion_time,
            max_temperature_deviation: targets.max_temperature_deviation,
            min_quality_score: targets.min_quality_score,
            timestamp: Utc::now(),
            manufacturing_type: targets.manufacturing_type,
            design_id: targets.design_id,
            operator,
            is_active: true,
        }
    }

    /// Compare actual values against the contractual targets
    ///
    /// Violations are reported in a fixed order: completion time,
    /// temperature deviation, quality.
    pub fn check(&self, actuals: &SlaActuals) -> Vec<Violation> {
        let mut violations = Vec::new();
        if actuals.completion_time > self.target_completion_time {
            violations.push(Violation::CompletionTimeExceeded);
        }
        if actuals.temperature_deviation > self.max_temperature_deviation {
            violations.push(Violation::TemperatureDeviationExceeded);
        }
        if actuals.quality_score < self.min_quality_score {
            violations.push(Violation::QualityBelowMinimum);
        }
        violations
    }
}

/// Actual values submitted for evaluation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SlaActuals {
    pub completion_time: u64,
    pub temperature_deviation: u64,
    pub quality_score: u32,
}

/// Reason a job failed its SLA
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Violation {
    CompletionTimeExceeded,
    TemperatureDeviationExceeded,
    QualityBelowMinimum,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Violation::CompletionTimeExceeded => "completion time exceeded",
            Violation::TemperatureDeviationExceeded => "temperature deviation exceeded",
            Violation::QualityBelowMinimum => "quality below minimum",
        };
        f.write_str(name)
    }
}

/// Outcome of an SLA evaluation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub job_id: JobId,
    pub evaluated: bool,
    pub is_compliant: bool,
    pub actual_completion_time: u64,
    pub actual_temperature_deviation: u64,
    pub actual_quality_score: u32,
    /// Corroborating score, 0 when the scorer was unavailable
    pub performance_score: u32,
    pub score_available: bool,
    pub bonification_pending: bool,
    pub bonification_paid: bool,
    pub violations: Vec<Violation>,
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationResult {
    pub fn state(&self) -> SlaJobState {
        if self.bonification_paid {
            SlaJobState::BonusPaid
        } else if self.bonification_pending {
            SlaJobState::BonusPending
        } else {
            SlaJobState::Evaluated
        }
    }
}

/// Lifecycle of a job on the evaluator side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlaJobState {
    Unset,
    MetricsSet,
    Evaluated,
    BonusPending,
    BonusPaid,
}

/// Summary of a job awaiting payout
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PendingBonification {
    pub job_id: JobId,
    pub design_id: DesignId,
    pub operator: AccountId,
    pub performance_score: u32,
    pub evaluated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> SlaTargets {
        SlaTargets {
            target_completion_time: 100,
            max_temperature_deviation: 5,
            min_quality_score: 80,
            manufacturing_type: Category::new("printing"),
            design_id: DesignId::new("design-1"),
        }
    }

    #[test]
    fn test_validate_targets() {
        assert!(targets().validate().is_ok());

        let mut t = targets();
        t.target_completion_time = 0;
        assert!(t.validate().is_err());

        let mut t = targets();
        t.min_quality_score = 101;
        assert!(t.validate().is_err());

        let mut t = targets();
        t.min_quality_score = 0;
        assert!(t.validate().is_err());

        let mut t = targets();
        t.design_id = DesignId::new("");
        assert!(t.validate().is_err());

        let mut t = targets();
        t.manufacturing_type = Category::new("");
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_violation_order() {
        let sla = SlaMetrics::new(JobId::new(1), targets(), AccountId::new("op"));
        let violations = sla.check(&SlaActuals {
            completion_time: 150,
            temperature_deviation: 9,
            quality_score: 10,
        });
        assert_eq!(
            violations,
            vec![
                Violation::CompletionTimeExceeded,
                Violation::TemperatureDeviationExceeded,
                Violation::QualityBelowMinimum,
            ]
        );
    }

    #[test]
    fn test_boundaries_are_compliant() {
        let sla = SlaMetrics::new(JobId::new(1), targets(), AccountId::new("op"));
        let violations = sla.check(&SlaActuals {
            completion_time: 100,
            temperature_deviation: 5,
            quality_score: 80,
        });
        assert!(violations.is_empty());
    }
}
