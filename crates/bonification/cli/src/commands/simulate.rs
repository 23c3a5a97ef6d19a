//! Simulate command

use crate::error::CliResult;
use crate::output::{print_json, OutputFormat};
use crate::scenario::Scenario;
use bonification_runtime::{
    BonificationLedger, InMemoryTokenLedger, PerformanceScorer, SlaEvaluator,
    StaticOperatorDirectory,
};
use bonification_types::{
    AccountId, Amount, Category, DesignId, EngineConfig, JobId, SlaJobState,
};
use clap::Args;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Args)]
pub struct SimulateArgs {
    /// Scenario file (TOML)
    #[arg(short, long)]
    pub scenario: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// What happened to one job
#[derive(Debug, Serialize)]
pub struct JobOutcome {
    pub job_id: u64,
    pub state: SlaJobState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliant: Option<bool>,
    pub violations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PoolSummary {
    pub design_id: String,
    pub owner: String,
    pub price: u64,
    pub pool: u64,
    pub licenses: u64,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub jobs: Vec<JobOutcome>,
    pub pools: Vec<PoolSummary>,
    pub balances: Vec<(String, u64)>,
}

/// Run a scenario against in-memory collaborators
pub async fn run_scenario(scenario: &Scenario, config: &EngineConfig) -> CliResult<SimulationReport> {
    let admin = AccountId::new(scenario.admin.as_str());
    let identity = AccountId::new(scenario.evaluator.as_str());

    let funds = Arc::new(InMemoryTokenLedger::new());
    for account in &scenario.accounts {
        funds.mint(&AccountId::new(account.id.as_str()), Amount::new(account.balance))?;
    }

    let operators = Arc::new(StaticOperatorDirectory::with_operators(
        scenario.operators.iter().map(|o| AccountId::new(o.as_str())),
    ));

    let scorer = Arc::new(PerformanceScorer::new(admin.clone(), config, operators.clone())?);
    for category in &scenario.categories {
        let name = Category::new(category.name.as_str());
        scorer
            .initialize_base_metrics(&admin, name.clone(), category.targets)
            .await?;
        if let Some(factors) = category.factors {
            scorer.set_adjustment_factors(&admin, name, factors).await?;
        }
    }

    let ledger = Arc::new(BonificationLedger::new(admin.clone(), funds.clone()));
    for design in &scenario.designs {
        ledger
            .register_design(
                &AccountId::new(design.owner.as_str()),
                DesignId::new(design.id.as_str()),
                Amount::new(design.price),
                Amount::new(design.initial_pool),
            )
            .await?;
    }
    for license in &scenario.licenses {
        ledger
            .purchase_license(
                &AccountId::new(license.buyer.as_str()),
                &DesignId::new(license.design.as_str()),
            )
            .await?;
    }
    ledger
        .add_bonification_manager(&admin, identity.clone())
        .await?;

    let evaluator = SlaEvaluator::new(
        identity,
        admin,
        config,
        scorer.clone(),
        ledger.clone(),
        operators,
    )?;

    let mut errors: HashMap<u64, String> = HashMap::new();
    for job in &scenario.jobs {
        let job_id = JobId::new(job.id);
        let operator = AccountId::new(job.operator.as_str());

        let steps = async {
            if let Some(metrics) = job.metrics {
                scorer
                    .submit_metrics(&operator, job_id, Category::new(job.category.as_str()), metrics)
                    .await?;
            }
            if let Some(sla) = &job.sla {
                evaluator
                    .set_sla_metrics(&operator, job_id, sla.clone())
                    .await?;
            }
            evaluator.evaluate_sla(&operator, job_id, job.actuals).await
        };

        if let Err(e) = steps.await {
            warn!(job = %job_id, error = %e, "Job did not complete evaluation");
            errors.insert(job.id, e.to_string());
        }
    }

    let mut payouts = HashMap::new();
    for (job_id, outcome) in evaluator.process_pending_batch(usize::MAX).await {
        match outcome {
            Ok(receipt) => {
                payouts.insert(job_id.0, receipt.amount.0);
            }
            Err(e) => {
                errors.insert(job_id.0, e.to_string());
            }
        }
    }

    let mut jobs = Vec::new();
    for job in &scenario.jobs {
        let job_id = JobId::new(job.id);
        let evaluation = evaluator.evaluation(job_id).await;
        jobs.push(JobOutcome {
            job_id: job.id,
            state: evaluator.job_state(job_id).await,
            performance_score: evaluation.as_ref().map(|e| e.performance_score),
            compliant: evaluation.as_ref().map(|e| e.is_compliant),
            violations: evaluation
                .map(|e| e.violations.iter().map(ToString::to_string).collect())
                .unwrap_or_default(),
            payout: payouts.get(&job.id).copied(),
            error: errors.remove(&job.id),
        });
    }

    let mut pools = Vec::new();
    for design in &scenario.designs {
        if let Some(pool) = ledger.design(&DesignId::new(design.id.as_str())).await {
            pools.push(PoolSummary {
                design_id: pool.design_id.0,
                owner: pool.owner.0,
                price: pool.price.0,
                pool: pool.bonification_pool.0,
                licenses: pool.total_licenses,
                active: pool.active,
            });
        }
    }

    let names: BTreeSet<&str> = scenario
        .accounts
        .iter()
        .map(|a| a.id.as_str())
        .chain(scenario.operators.iter().map(String::as_str))
        .chain(scenario.designs.iter().map(|d| d.owner.as_str()))
        .collect();
    let balances = names
        .into_iter()
        .map(|name| (name.to_string(), funds.balance_of(&AccountId::new(name)).0))
        .collect();

    info!(
        jobs = jobs.len(),
        paid = payouts.len(),
        "Scenario complete"
    );

    Ok(SimulationReport {
        jobs,
        pools,
        balances,
    })
}

fn print_text(report: &SimulationReport) {
    println!("Jobs:");
    for job in &report.jobs {
        let score = job
            .performance_score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  job-{:<6} {:<13} score {:>3}", job.job_id, format!("{:?}", job.state), score);
        for violation in &job.violations {
            println!("      violation: {}", violation);
        }
        if let Some(amount) = job.payout {
            println!("      paid: {}", amount);
        }
        if let Some(error) = &job.error {
            println!("      error: {}", error);
        }
    }

    println!("Pools:");
    for pool in &report.pools {
        println!(
            "  {:<20} pool {:>8}  price {:>8}  licenses {:>3}{}",
            pool.design_id,
            pool.pool,
            pool.price,
            pool.licenses,
            if pool.active { "" } else { "  (inactive)" }
        );
    }

    println!("Balances:");
    for (account, balance) in &report.balances {
        println!("  {:<20} {:>8}", account, balance);
    }
}

pub async fn execute(args: SimulateArgs, config: &EngineConfig) -> CliResult<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let report = run_scenario(&scenario, config).await?;
    match args.output {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            print_text(&report);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
operators = ["op-1"]

[[accounts]]
id = "designer"
balance = 10000

[[accounts]]
id = "shop"
balance = 5000

[[categories]]
name = "default"
targets = { fabrication_time = 100, quality = 80, pickup_time = 40, assembly_time = 60 }

[[designs]]
id = "0xbracket"
owner = "designer"
price = 1000
initial_pool = 500

[[licenses]]
design = "0xbracket"
buyer = "shop"

[[jobs]]
id = 1
operator = "op-1"
category = "printing"
metrics = { fabrication_time = 50, quality = 160, pickup_time = 20, assembly_time = 30 }
actuals = { completion_time = 110, temperature_deviation = 1, quality_score = 97 }
sla = { target_completion_time = 120, max_temperature_deviation = 3, min_quality_score = 85, manufacturing_type = "printing", design_id = "0xbracket" }

[[jobs]]
id = 2
operator = "op-1"
category = "printing"
metrics = { fabrication_time = 150, quality = 60, pickup_time = 50, assembly_time = 90 }
actuals = { completion_time = 150, temperature_deviation = 1, quality_score = 70 }
sla = { target_completion_time = 120, max_temperature_deviation = 3, min_quality_score = 85, manufacturing_type = "printing", design_id = "0xbracket" }

[[jobs]]
id = 3
operator = "op-1"
category = "printing"
actuals = { completion_time = 100, temperature_deviation = 1, quality_score = 90 }
"#;

    #[tokio::test]
    async fn test_run_scenario() {
        let scenario = Scenario::parse(SCENARIO).unwrap();
        let report = run_scenario(&scenario, &EngineConfig::default()).await.unwrap();

        assert_eq!(report.jobs[0].state, SlaJobState::BonusPaid);
        assert_eq!(report.jobs[0].performance_score, Some(92));
        assert_eq!(report.jobs[0].payout, Some(100));

        assert_eq!(report.jobs[1].state, SlaJobState::Evaluated);
        assert_eq!(report.jobs[1].compliant, Some(false));
        assert_eq!(report.jobs[1].violations.len(), 2);
        assert!(report.jobs[1].payout.is_none());

        assert_eq!(report.jobs[2].state, SlaJobState::Unset);
        assert!(report.jobs[2].error.is_some());

        // 500 seeded + 100 from the license sale - 100 paid out
        assert_eq!(report.pools[0].pool, 500);
        assert_eq!(report.pools[0].licenses, 1);

        let balance = |name: &str| {
            report
                .balances
                .iter()
                .find(|(account, _)| account == name)
                .map(|(_, balance)| *balance)
        };
        assert_eq!(balance("op-1"), Some(100));
        assert_eq!(balance("shop"), Some(4000));
        assert_eq!(balance("designer"), Some(10000 - 500 + 900));
    }
}
