//! Scoring - pure, integer-only scoring functions
//!
//! Given the same inputs these functions always return the same output.
//! No floating point is used anywhere in the scoring path.

use bonification_types::{
    ComponentScores, MetricSet, TargetAdjustment, Weights, BASE_SCORE, FIXED_POINT_SCALE,
    MAX_BONUS, MAX_SCORE, MIN_PERFORMANCE_THRESHOLD, MISSING_DATA_SCORE,
};

/// Score a lower-is-better metric
///
/// On or under target earns `BASE_SCORE` plus a bonus proportional to the
/// saving. Over target loses `BASE_SCORE` proportionally to the overrun;
/// an overrun of 100% or more scores `MIN_PERFORMANCE_THRESHOLD`.
///
/// The linear penalty is kept literal: an overrun between 50% and 100%
/// scores below `MIN_PERFORMANCE_THRESHOLD`.
pub fn time_component_score(actual: u64, target: u64) -> u32 {
    if target == 0 {
        return 0;
    }
    if actual == 0 {
        return MISSING_DATA_SCORE;
    }

    let target = target as u128;
    let actual = actual as u128;
    let base = BASE_SCORE as u128;

    if actual <= target {
        let improvement = MAX_BONUS as u128 * (target - actual) / target;
        (base + improvement).min(MAX_SCORE as u128) as u32
    } else {
        let excess = base * (actual - target) / target;
        if excess >= base {
            MIN_PERFORMANCE_THRESHOLD
        } else {
            (base - excess) as u32
        }
    }
}

/// Score a higher-is-better metric
pub fn quality_component_score(actual: u64, target: u64) -> u32 {
    if target == 0 {
        return 0;
    }
    if actual == 0 {
        return MIN_PERFORMANCE_THRESHOLD;
    }

    let target = target as u128;
    let actual = actual as u128;

    if actual >= target {
        let improvement = (MAX_BONUS as u128 * (actual - target) / target).min(MAX_BONUS as u128);
        BASE_SCORE + improvement as u32
    } else {
        (actual * BASE_SCORE as u128 / target) as u32
    }
}

/// Score all four dimensions of a job
pub fn component_scores(targets: &MetricSet, actuals: &MetricSet) -> ComponentScores {
    ComponentScores {
        fabrication_time: time_component_score(actuals.fabrication_time, targets.fabrication_time),
        quality: quality_component_score(actuals.quality, targets.quality),
        pickup_time: time_component_score(actuals.pickup_time, targets.pickup_time),
        assembly_time: time_component_score(actuals.assembly_time, targets.assembly_time),
    }
}

/// Weighted mean of the component scores, truncated to an integer
///
/// A zero total weight is replaced by unit weights.
pub fn weighted_score(components: &ComponentScores, weights: &Weights) -> u32 {
    let weights = if weights.total() == 0 {
        Weights::unit()
    } else {
        *weights
    };

    let pairs = [
        (components.fabrication_time, weights.fabrication_time),
        (components.quality, weights.quality),
        (components.pickup_time, weights.pickup_time),
        (components.assembly_time, weights.assembly_time),
    ];

    let weighted_sum: u128 = pairs
        .iter()
        .map(|&(score, weight)| score as u128 * weight as u128 * FIXED_POINT_SCALE)
        .sum();

    (weighted_sum / weights.total() as u128 / FIXED_POINT_SCALE) as u32
}

/// Full performance score for a job
pub fn performance_score(targets: &MetricSet, actuals: &MetricSet, weights: &Weights) -> u32 {
    weighted_score(&component_scores(targets, actuals), weights)
}

/// Mean of a window of scores (floor); `None` for an empty window
pub fn average_score(scores: &[u32]) -> Option<u32> {
    if scores.is_empty() {
        return None;
    }
    let sum: u64 = scores.iter().map(|&s| s as u64).sum();
    Some((sum / scores.len() as u64) as u32)
}

/// Two-band controller decision
///
/// Below `threshold` the targets are loosened; above `100 - threshold` they
/// are tightened; otherwise they are held.
pub fn adjustment_for(average: u32, threshold: u32) -> TargetAdjustment {
    if average < threshold {
        TargetAdjustment::Raised
    } else if average > MAX_SCORE.saturating_sub(threshold) {
        TargetAdjustment::Lowered
    } else {
        TargetAdjustment::Held
    }
}

/// Scale every target by `percent / 100`
///
/// Raises round up and lowers round down, so a non-zero target always moves
/// and never reaches zero. A zero (unset) target stays zero.
pub fn scale_targets(targets: &MetricSet, percent: u64) -> MetricSet {
    let scale = |v: u64| -> u64 {
        if v == 0 {
            return 0;
        }
        let product = v as u128 * percent as u128;
        let scaled = if percent > 100 {
            product.div_ceil(100)
        } else {
            product / 100
        };
        scaled.clamp(1, u64::MAX as u128) as u64
    };
    MetricSet {
        fabrication_time: scale(targets.fabrication_time),
        quality: scale(targets.quality),
        pickup_time: scale(targets.pickup_time),
        assembly_time: scale(targets.assembly_time),
    }
}
