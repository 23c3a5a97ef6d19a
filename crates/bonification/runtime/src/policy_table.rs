//! Adjustment Policy Table - per-category weights and thresholds

use bonification_types::{AdjustmentFactors, BonificationResult, Category};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct PolicyTable {
    factors: HashMap<Category, AdjustmentFactors>,
}

impl PolicyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, category: Category, factors: AdjustmentFactors) -> BonificationResult<()> {
        factors.validate()?;
        self.factors.insert(category, factors);
        Ok(())
    }

    pub fn get(&self, category: &Category) -> Option<&AdjustmentFactors> {
        self.factors.get(category)
    }

    /// Factors for a category, falling back to "default", then unit weights
    pub fn resolve(&self, category: &Category) -> AdjustmentFactors {
        if let Some(factors) = self.factors.get(category) {
            return *factors;
        }
        if let Some(factors) = self.factors.get(&Category::default_category()) {
            debug!(category = %category, "Using default adjustment factors");
            return *factors;
        }
        debug!(category = %category, "No adjustment factors configured, using unit weights");
        AdjustmentFactors::default()
    }
}
