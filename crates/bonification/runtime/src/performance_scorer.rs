//! Performance Scorer - converts job measurements into a weighted score
//!
//! The scorer owns the metric store, the policy table, the per-category
//! history windows and the adjustment engine. They live behind a single
//! lock so that completing a job, appending it to its window and running
//! the adaptive controller happen as one atomic step.

use crate::adjustment_engine::AdjustmentEngine;
use crate::collaborators::{OperatorDirectory, ScoreProvider, ScoreUnavailable};
use crate::history_window::HistoryWindow;
use crate::metric_store::MetricStore;
use crate::policy_table::PolicyTable;
use crate::scoring;
use async_trait::async_trait;
use bonification_types::{
    AccountId, AdjustmentFactors, BonificationError, BonificationResult, Category,
    ComponentScores, EngineConfig, JobId, JobMetrics, MetricSet, TargetAdjustment,
    MIN_HISTORY_FOR_ADJUSTMENT,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

struct ScorerState {
    metrics: MetricStore,
    policies: PolicyTable,
    adjustment: AdjustmentEngine,
    history: HashMap<Category, HistoryWindow>,
    history_limit: usize,
}

impl ScorerState {
    /// Targets, weights and actuals a job would be scored with right now
    fn scoring_inputs(&self, job_id: &JobId) -> (MetricSet, AdjustmentFactors, MetricSet) {
        match self.metrics.get(job_id) {
            Some(job) => {
                let targets = job
                    .targets
                    .unwrap_or_else(|| self.adjustment.targets_for(&job.category));
                (targets, self.policies.resolve(&job.category), job.actuals)
            }
            None => {
                let category = Category::default_category();
                (
                    self.adjustment.targets_for(&category),
                    self.policies.resolve(&category),
                    MetricSet::default(),
                )
            }
        }
    }

    fn window_scores(&self, category: &Category) -> Vec<u32> {
        self.history
            .get(category)
            .map(|window| window.iter().map(|id| self.metrics.score_of(id)).collect())
            .unwrap_or_default()
    }
}

/// The Performance Scorer
pub struct PerformanceScorer {
    admin: AccountId,
    operators: Arc<dyn OperatorDirectory>,
    state: RwLock<ScorerState>,
}

impl PerformanceScorer {
    pub fn new(
        admin: AccountId,
        config: &EngineConfig,
        operators: Arc<dyn OperatorDirectory>,
    ) -> BonificationResult<Self> {
        config.validate()?;

        let mut policies = PolicyTable::new();
        if let Some(factors) = config.default_factors {
            policies.set(Category::default_category(), factors)?;
        }
        let mut adjustment = AdjustmentEngine::new();
        if let Some(targets) = config.default_base_targets {
            adjustment.initialize(Category::default_category(), targets)?;
        }

        Ok(Self {
            admin,
            operators,
            state: RwLock::new(ScorerState {
                metrics: MetricStore::new(),
                policies,
                adjustment,
                history: HashMap::new(),
                history_limit: config.history_limit,
            }),
        })
    }

    pub fn admin(&self) -> &AccountId {
        &self.admin
    }

    fn ensure_admin(&self, caller: &AccountId) -> BonificationResult<()> {
        if caller != &self.admin {
            return Err(BonificationError::NotAuthorized(caller.clone()));
        }
        Ok(())
    }

    // --- Administration ---

    /// Install or reset the base targets new jobs of a category start from
    pub async fn initialize_base_metrics(
        &self,
        caller: &AccountId,
        category: Category,
        targets: MetricSet,
    ) -> BonificationResult<()> {
        self.ensure_admin(caller)?;
        if category.is_empty() {
            return Err(BonificationError::InvalidParameters(
                "category must not be empty".into(),
            ));
        }
        self.state
            .write()
            .await
            .adjustment
            .initialize(category.clone(), targets)?;
        info!(category = %category, ?targets, "Base metrics initialized");
        Ok(())
    }

    pub async fn set_adjustment_factors(
        &self,
        caller: &AccountId,
        category: Category,
        factors: AdjustmentFactors,
    ) -> BonificationResult<()> {
        self.ensure_admin(caller)?;
        if category.is_empty() {
            return Err(BonificationError::InvalidParameters(
                "category must not be empty".into(),
            ));
        }
        self.state
            .write()
            .await
            .policies
            .set(category.clone(), factors)?;
        info!(category = %category, threshold = factors.threshold, "Adjustment factors set");
        Ok(())
    }

    /// Change the capacity of every history window
    pub async fn set_history_limit(&self, caller: &AccountId, limit: usize) -> BonificationResult<()> {
        self.ensure_admin(caller)?;
        // validate before touching any window
        HistoryWindow::new(limit)?;

        let mut state = self.state.write().await;
        for (category, window) in state.history.iter_mut() {
            let evicted = window.set_limit(limit)?;
            if !evicted.is_empty() {
                debug!(category = %category, evicted = evicted.len(), "History window truncated");
            }
        }
        state.history_limit = limit;
        info!(limit, "History limit updated");
        Ok(())
    }

    /// Run the controller for a category on demand
    pub async fn adjust_targets(
        &self,
        caller: &AccountId,
        category: &Category,
    ) -> BonificationResult<TargetAdjustment> {
        self.ensure_admin(caller)?;
        let mut state = self.state.write().await;
        let scores = state.window_scores(category);
        let threshold = state.policies.resolve(category).threshold;
        state.adjustment.apply(category, &scores, threshold)
    }

    // --- Job lifecycle ---

    /// Record (or resubmit) the actual measurements of a job
    pub async fn submit_metrics(
        &self,
        caller: &AccountId,
        job_id: JobId,
        category: Category,
        actuals: MetricSet,
    ) -> BonificationResult<()> {
        if !self.operators.is_operator_authenticated(caller).await {
            return Err(BonificationError::NotAuthorized(caller.clone()));
        }
        if category.is_empty() {
            return Err(BonificationError::InvalidParameters(
                "category must not be empty".into(),
            ));
        }

        self.state
            .write()
            .await
            .metrics
            .record(job_id, category.clone(), actuals, caller.clone())?;

        debug!(job = %job_id, category = %category, operator = %caller, "Metrics submitted");
        Ok(())
    }

    /// Score a job without changing anything
    ///
    /// Unknown jobs are scored against the default category's targets with
    /// no measurements, which yields the deterministic minimum-style score.
    pub async fn calculate_performance_score(&self, job_id: JobId) -> u32 {
        let state = self.state.read().await;
        let (targets, factors, actuals) = state.scoring_inputs(&job_id);
        let score = scoring::performance_score(&targets, &actuals, &factors.weights);
        debug!(job = %job_id, score, "Performance score calculated");
        score
    }

    /// Component breakdown of the current score
    pub async fn component_scores(&self, job_id: JobId) -> ComponentScores {
        let state = self.state.read().await;
        let (targets, _, actuals) = state.scoring_inputs(&job_id);
        scoring::component_scores(&targets, &actuals)
    }

    /// Score, cache and complete a job, then feed the adaptive controller
    ///
    /// Completing an already completed job returns its cached score. A job
    /// with no measurements gets the same minimum-style score as
    /// [`PerformanceScorer::calculate_performance_score`] and is left untouched.
    pub async fn evaluate_performance(&self, job_id: JobId) -> BonificationResult<u32> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let Some(job) = state.metrics.get(&job_id) else {
            let (targets, factors, actuals) = state.scoring_inputs(&job_id);
            let score = scoring::performance_score(&targets, &actuals, &factors.weights);
            debug!(job = %job_id, score, "No metrics submitted, scored with defaults");
            return Ok(score);
        };
        if job.completed {
            return Ok(job.performance_score);
        }

        let category = job.category.clone();
        let (targets, factors, actuals) = state.scoring_inputs(&job_id);
        let score = scoring::performance_score(&targets, &actuals, &factors.weights);
        state.metrics.complete(job_id, targets, score)?;

        if !state.history.contains_key(&category) {
            state
                .history
                .insert(category.clone(), HistoryWindow::new(state.history_limit)?);
        }
        if let Some(window) = state.history.get_mut(&category) {
            if let Some(evicted) = window.push(job_id) {
                debug!(category = %category, evicted = %evicted, "History window evicted oldest job");
            }
        }

        info!(job = %job_id, category = %category, score, "Job performance evaluated");

        let scores = state.window_scores(&category);
        if scores.len() >= MIN_HISTORY_FOR_ADJUSTMENT {
            if let Err(e) = state.adjustment.apply(&category, &scores, factors.threshold) {
                warn!(category = %category, error = %e, "Target adjustment skipped");
            }
        }

        Ok(score)
    }

    // --- Queries ---

    pub async fn job_metrics(&self, job_id: JobId) -> Option<JobMetrics> {
        self.state.read().await.metrics.get(&job_id).cloned()
    }

    pub async fn base_targets(&self, category: &Category) -> MetricSet {
        self.state.read().await.adjustment.targets_for(category)
    }

    pub async fn adjustment_factors(&self, category: &Category) -> AdjustmentFactors {
        self.state.read().await.policies.resolve(category)
    }

    /// Completed jobs of a category, oldest first
    pub async fn history(&self, category: &Category) -> Vec<JobId> {
        self.state
            .read()
            .await
            .history
            .get(category)
            .map(HistoryWindow::snapshot)
            .unwrap_or_default()
    }

    pub async fn history_limit(&self) -> usize {
        self.state.read().await.history_limit
    }
}

#[async_trait]
impl ScoreProvider for PerformanceScorer {
    async fn calculate_performance_score(&self, job_id: JobId) -> Result<u32, ScoreUnavailable> {
        Ok(PerformanceScorer::calculate_performance_score(self, job_id).await)
    }

    async fn evaluate_performance(&self, job_id: JobId) -> Result<u32, ScoreUnavailable> {
        PerformanceScorer::evaluate_performance(self, job_id)
            .await
            .map_err(|e| ScoreUnavailable::Rejected(e.to_string()))
    }
}
