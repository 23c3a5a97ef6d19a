//! Adjustment Engine - base targets and the adaptive controller
//!
//! Base targets are kept per category, with the "default" category as the
//! seed for categories that have none. All mutation of base targets goes
//! through [`AdjustmentEngine::initialize`] or [`AdjustmentEngine::apply`],
//! and `apply` only ever sees an explicit snapshot of the history scores.
//!
//! The controller is a simple two-band proportional step rather than a PID
//! loop: a window averaging below the threshold loosens every target by 5%,
//! a window averaging above `100 - threshold` tightens every target by 5%.

use crate::scoring::{adjustment_for, average_score, scale_targets};
use bonification_types::{
    BonificationError, BonificationResult, Category, MetricSet, TargetAdjustment,
    MIN_HISTORY_FOR_ADJUSTMENT, TARGET_LOWER_PERCENT, TARGET_RAISE_PERCENT,
};
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Default)]
pub struct AdjustmentEngine {
    base: HashMap<Category, MetricSet>,
}

impl AdjustmentEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or reset the base targets of a category
    pub fn initialize(&mut self, category: Category, targets: MetricSet) -> BonificationResult<()> {
        if !targets.is_fully_set() {
            return Err(BonificationError::InvalidParameters(
                "every base target must be non-zero".into(),
            ));
        }
        self.base.insert(category, targets);
        Ok(())
    }

    /// Targets a new job of this category starts from
    pub fn targets_for(&self, category: &Category) -> MetricSet {
        self.base
            .get(category)
            .or_else(|| self.base.get(&Category::default_category()))
            .copied()
            .unwrap_or_default()
    }

    pub fn base(&self, category: &Category) -> Option<&MetricSet> {
        self.base.get(category)
    }

    /// Run the controller over a snapshot of completed-job scores
    pub fn apply(
        &mut self,
        category: &Category,
        history_scores: &[u32],
        threshold: u32,
    ) -> BonificationResult<TargetAdjustment> {
        let average = match average_score(history_scores) {
            Some(avg) if history_scores.len() >= MIN_HISTORY_FOR_ADJUSTMENT => avg,
            _ => {
                return Err(BonificationError::InsufficientHistory {
                    category: category.clone(),
                    have: history_scores.len(),
                    need: MIN_HISTORY_FOR_ADJUSTMENT,
                })
            }
        };

        let adjustment = adjustment_for(average, threshold);
        let percent = match adjustment {
            TargetAdjustment::Raised => TARGET_RAISE_PERCENT,
            TargetAdjustment::Lowered => TARGET_LOWER_PERCENT,
            TargetAdjustment::Held => return Ok(adjustment),
        };

        let current = self.targets_for(category);
        let adjusted = scale_targets(&current, percent);
        self.base.insert(category.clone(), adjusted);

        info!(
            category = %category,
            average,
            threshold,
            ?adjustment,
            fabrication_time = adjusted.fabrication_time,
            quality = adjusted.quality,
            "Base targets adjusted"
        );

        Ok(adjustment)
    }
}
