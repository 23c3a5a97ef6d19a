//! Scenario files
//!
//! A scenario describes the initial world (balances, operators, category
//! targets, designs and licenses) and the jobs to run through it.

use crate::error::{CliError, CliResult};
use bonification_types::{AdjustmentFactors, MetricSet, SlaActuals, SlaTargets};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_admin() -> String {
    "admin".to_string()
}

fn default_evaluator() -> String {
    "sla-evaluator".to_string()
}

/// A complete simulation input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Administrator of every component
    #[serde(default = "default_admin")]
    pub admin: String,

    /// Identity the evaluator pays out with
    #[serde(default = "default_evaluator")]
    pub evaluator: String,

    /// Starting token balances
    #[serde(default)]
    pub accounts: Vec<AccountSpec>,

    /// Authenticated operators
    #[serde(default)]
    pub operators: Vec<String>,

    #[serde(default)]
    pub categories: Vec<CategorySpec>,

    #[serde(default)]
    pub designs: Vec<DesignSpec>,

    #[serde(default)]
    pub licenses: Vec<LicenseSpec>,

    #[serde(default)]
    pub jobs: Vec<JobSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSpec {
    pub id: String,
    pub balance: u64,
}

/// Base targets (and optionally factors) of a manufacturing category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    pub targets: MetricSet,
    #[serde(default)]
    pub factors: Option<AdjustmentFactors>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignSpec {
    pub id: String,
    pub owner: String,
    pub price: u64,
    #[serde(default)]
    pub initial_pool: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseSpec {
    pub design: String,
    pub buyer: String,
}

/// One manufacturing job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    pub id: u64,
    pub operator: String,
    pub category: String,
    /// Measurements submitted to the scorer; omitted jobs are never scored
    #[serde(default)]
    pub metrics: Option<MetricSet>,
    /// Contractual SLA; omitted jobs are evaluated without one
    #[serde(default)]
    pub sla: Option<SlaTargets>,
    pub actuals: SlaActuals,
}

impl Scenario {
    pub fn load(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> CliResult<Self> {
        let scenario: Scenario =
            toml::from_str(contents).map_err(|e| CliError::Scenario(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> CliResult<()> {
        let mut seen = std::collections::HashSet::new();
        for job in &self.jobs {
            if !seen.insert(job.id) {
                return Err(CliError::Scenario(format!("job {} listed twice", job.id)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
operators = ["op-1"]

[[jobs]]
id = 1
operator = "op-1"
category = "printing"
actuals = { completion_time = 100, temperature_deviation = 1, quality_score = 90 }
"#;

    #[test]
    fn test_parse_minimal() {
        let scenario = Scenario::parse(MINIMAL).unwrap();
        assert_eq!(scenario.admin, "admin");
        assert_eq!(scenario.evaluator, "sla-evaluator");
        assert_eq!(scenario.jobs.len(), 1);
        assert!(scenario.jobs[0].metrics.is_none());
        assert!(scenario.jobs[0].sla.is_none());
    }

    #[test]
    fn test_parse_sla_targets() {
        let contents = format!(
            "{}{}",
            MINIMAL,
            r#"
[jobs.sla]
target_completion_time = 120
max_temperature_deviation = 3
min_quality_score = 85
manufacturing_type = "printing"
design_id = "0xbracket"
"#
        );
        let scenario = Scenario::parse(&contents).unwrap();
        let sla = scenario.jobs[0].sla.as_ref().unwrap();
        assert_eq!(sla.design_id.0, "0xbracket");
        assert_eq!(sla.manufacturing_type.0, "printing");
    }

    #[test]
    fn test_duplicate_jobs_rejected() {
        let contents = format!("{}{}", MINIMAL, MINIMAL.replace("operators = [\"op-1\"]", ""));
        assert!(matches!(
            Scenario::parse(&contents),
            Err(CliError::Scenario(_))
        ));
    }
}
