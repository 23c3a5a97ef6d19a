//! SLA Evaluator - contractual compliance and bonification eligibility
//!
//! The evaluator checks a job's actual values against its contractual
//! targets, asks the scorer for a corroborating score, and decides whether
//! the job earns a bonification. Payout is a separate step that re-checks
//! the score and then asks the ledger to pay from the design's pool.
//!
//! Every operation holds the job's lock for its whole duration, including
//! the awaited scorer and ledger calls.

use crate::collaborators::{DesignRegistry, OperatorDirectory, ScoreProvider, ScoreUnavailable};
use crate::job_locks::JobLocks;
use bonification_types::{
    AccountId, BonificationError, BonificationResult, EngineConfig, EvaluationResult, JobId,
    LedgerReceipt, PendingBonification, SlaActuals, SlaJobState, SlaMetrics, SlaTargets,
    BONIFICATION_PERCENT, MAX_QUALITY_SCORE,
};
use chrono::Utc;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

struct EvaluatorState {
    sla: HashMap<JobId, SlaMetrics>,
    results: HashMap<JobId, EvaluationResult>,
    min_performance_for_bonus: u32,
}

/// The SLA Evaluator
pub struct SlaEvaluator {
    /// Identity presented to the ledger when paying out
    identity: AccountId,
    admin: AccountId,
    scores: Arc<dyn ScoreProvider>,
    registry: Arc<dyn DesignRegistry>,
    operators: Arc<dyn OperatorDirectory>,
    score_timeout: Duration,
    locks: JobLocks,
    state: RwLock<EvaluatorState>,
}

impl SlaEvaluator {
    pub fn new(
        identity: AccountId,
        admin: AccountId,
        config: &EngineConfig,
        scores: Arc<dyn ScoreProvider>,
        registry: Arc<dyn DesignRegistry>,
        operators: Arc<dyn OperatorDirectory>,
    ) -> BonificationResult<Self> {
        config.validate()?;
        Ok(Self {
            identity,
            admin,
            scores,
            registry,
            operators,
            score_timeout: config.score_timeout(),
            locks: JobLocks::new(),
            state: RwLock::new(EvaluatorState {
                sla: HashMap::new(),
                results: HashMap::new(),
                min_performance_for_bonus: config.min_performance_for_bonus,
            }),
        })
    }

    pub fn identity(&self) -> &AccountId {
        &self.identity
    }

    async fn ensure_operator(&self, caller: &AccountId) -> BonificationResult<()> {
        if !self.operators.is_operator_authenticated(caller).await {
            return Err(BonificationError::NotAuthorized(caller.clone()));
        }
        Ok(())
    }

    /// Bounded scorer call; a timeout is reported like any other failure
    async fn bounded_score<F>(&self, call: F) -> Result<u32, ScoreUnavailable>
    where
        F: Future<Output = Result<u32, ScoreUnavailable>>,
    {
        match tokio::time::timeout(self.score_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ScoreUnavailable::Timeout),
        }
    }

    // --- Administration ---

    pub async fn set_min_performance_for_bonus(
        &self,
        caller: &AccountId,
        value: u32,
    ) -> BonificationResult<()> {
        if caller != &self.admin {
            return Err(BonificationError::NotAuthorized(caller.clone()));
        }
        if value == 0 || value > MAX_QUALITY_SCORE {
            return Err(BonificationError::InvalidParameters(format!(
                "bonus threshold {} outside [1, {}]",
                value, MAX_QUALITY_SCORE
            )));
        }
        self.state.write().await.min_performance_for_bonus = value;
        info!(threshold = value, "Bonus threshold updated");
        Ok(())
    }

    pub async fn min_performance_for_bonus(&self) -> u32 {
        self.state.read().await.min_performance_for_bonus
    }

    // --- Job lifecycle ---

    /// Configure (or reconfigure before evaluation) the SLA of a job
    pub async fn set_sla_metrics(
        &self,
        caller: &AccountId,
        job_id: JobId,
        targets: SlaTargets,
    ) -> BonificationResult<()> {
        let _guard = self.locks.acquire(job_id).await;

        self.ensure_operator(caller).await?;
        targets.validate()?;

        let mut state = self.state.write().await;
        if state.results.contains_key(&job_id) {
            return Err(BonificationError::AlreadyEvaluated(job_id));
        }
        let replaced = state
            .sla
            .insert(job_id, SlaMetrics::new(job_id, targets, caller.clone()))
            .is_some();

        info!(job = %job_id, operator = %caller, replaced, "SLA metrics set");
        Ok(())
    }

    /// Stop a job from being evaluated
    pub async fn deactivate_sla_metrics(
        &self,
        caller: &AccountId,
        job_id: JobId,
    ) -> BonificationResult<()> {
        let _guard = self.locks.acquire(job_id).await;

        let mut state = self.state.write().await;
        let sla = state
            .sla
            .get_mut(&job_id)
            .ok_or(BonificationError::MetricsNotSet(job_id))?;
        if caller != &self.admin && caller != &sla.operator {
            return Err(BonificationError::NotAuthorized(caller.clone()));
        }
        sla.is_active = false;

        info!(job = %job_id, "SLA metrics deactivated");
        Ok(())
    }

    /// Evaluate a job's actual values against its SLA
    #[instrument(skip(self, actuals), fields(job = %job_id))]
    pub async fn evaluate_sla(
        &self,
        caller: &AccountId,
        job_id: JobId,
        actuals: SlaActuals,
    ) -> BonificationResult<EvaluationResult> {
        let _guard = self.locks.acquire(job_id).await;

        self.ensure_operator(caller).await?;

        let sla = {
            let state = self.state.read().await;
            let sla = state
                .sla
                .get(&job_id)
                .ok_or(BonificationError::MetricsNotSet(job_id))?;
            if !sla.is_active {
                return Err(BonificationError::MetricsInactive(job_id));
            }
            if state.results.contains_key(&job_id) {
                return Err(BonificationError::AlreadyEvaluated(job_id));
            }
            sla.clone()
        };

        let violations = sla.check(&actuals);
        let is_compliant = violations.is_empty();

        let (performance_score, score_available) = match self
            .bounded_score(self.scores.evaluate_performance(job_id))
            .await
        {
            Ok(score) => (score, true),
            Err(e) => {
                warn!(job = %job_id, error = %e, "Corroborating score unavailable, using 0");
                (0, false)
            }
        };

        let mut state = self.state.write().await;
        let bonification_pending = is_compliant
            && score_available
            && performance_score >= state.min_performance_for_bonus;

        let result = EvaluationResult {
            job_id,
            evaluated: true,
            is_compliant,
            actual_completion_time: actuals.completion_time,
            actual_temperature_deviation: actuals.temperature_deviation,
            actual_quality_score: actuals.quality_score,
            performance_score,
            score_available,
            bonification_pending,
            bonification_paid: false,
            violations,
            evaluated_at: Utc::now(),
        };
        state.results.insert(job_id, result.clone());

        info!(
            job = %job_id,
            compliant = is_compliant,
            score = performance_score,
            pending = bonification_pending,
            violations = result.violations.len(),
            "SLA evaluated"
        );
        Ok(result)
    }

    /// Pay the pending bonification of a job
    ///
    /// Either the ledger pays and the pending flag is cleared, or nothing
    /// changes at all.
    #[instrument(skip(self), fields(job = %job_id))]
    pub async fn process_pending_bonification(
        &self,
        job_id: JobId,
    ) -> BonificationResult<LedgerReceipt> {
        let _guard = self.locks.acquire(job_id).await;

        let (sla, required) = {
            let state = self.state.read().await;
            let pending = state
                .results
                .get(&job_id)
                .map(|r| r.evaluated && r.bonification_pending && r.is_compliant)
                .unwrap_or(false);
            if !pending {
                return Err(BonificationError::NoPendingBonification(job_id));
            }
            let sla = state
                .sla
                .get(&job_id)
                .cloned()
                .ok_or(BonificationError::MetricsNotSet(job_id))?;
            (sla, state.min_performance_for_bonus)
        };

        // Eligibility may have gone stale since the evaluation
        let score = match self
            .bounded_score(self.scores.calculate_performance_score(job_id))
            .await
        {
            Ok(score) => score,
            Err(e) => {
                warn!(job = %job_id, error = %e, "Score unavailable at payout");
                0
            }
        };
        if score < required {
            return Err(BonificationError::ScoreBelowThreshold { score, required });
        }

        let details = self.registry.design_details(&sla.design_id).await;
        if !details.registered {
            return Err(BonificationError::DesignNotRegistered(sla.design_id.clone()));
        }
        if !details.active {
            return Err(BonificationError::DesignInactive(sla.design_id.clone()));
        }
        if details.price.is_zero() {
            return Err(BonificationError::InvalidParameters(format!(
                "design {} has no price",
                sla.design_id
            )));
        }
        let amount = details.price.percent(BONIFICATION_PERCENT);
        if amount.is_zero() {
            return Err(BonificationError::InvalidParameters(format!(
                "price of {} too small for a bonification",
                sla.design_id
            )));
        }

        debug!(job = %job_id, design = %sla.design_id, amount = amount.0, "Requesting payout");
        let receipt = self
            .registry
            .process_bonification(
                &self.identity,
                &sla.design_id,
                &sla.operator,
                amount,
                Some(job_id),
            )
            .await
            .map_err(|e| match e {
                BonificationError::BonificationFailed(_) => e,
                other => BonificationError::BonificationFailed(other.to_string()),
            })?;

        let mut state = self.state.write().await;
        if let Some(result) = state.results.get_mut(&job_id) {
            result.bonification_pending = false;
            result.bonification_paid = true;
        }

        info!(
            job = %job_id,
            operator = %sla.operator,
            amount = amount.0,
            "Bonification processed"
        );
        Ok(receipt)
    }

    /// Pay pending bonifications in priority order
    ///
    /// Failures are reported per job and do not stop the batch.
    pub async fn process_pending_batch(
        &self,
        limit: usize,
    ) -> Vec<(JobId, BonificationResult<LedgerReceipt>)> {
        let mut outcomes = Vec::new();
        for pending in self.pending_bonifications().await.into_iter().take(limit) {
            let outcome = self.process_pending_bonification(pending.job_id).await;
            if let Err(e) = &outcome {
                warn!(job = %pending.job_id, error = %e, "Pending bonification not paid");
            }
            outcomes.push((pending.job_id, outcome));
        }
        outcomes
    }

    // --- Queries ---

    /// Jobs awaiting payout, highest score first, then oldest evaluation
    pub async fn pending_bonifications(&self) -> Vec<PendingBonification> {
        let state = self.state.read().await;
        let mut pending: Vec<PendingBonification> = state
            .results
            .values()
            .filter(|r| r.bonification_pending)
            .filter_map(|r| {
                state.sla.get(&r.job_id).map(|sla| PendingBonification {
                    job_id: r.job_id,
                    design_id: sla.design_id.clone(),
                    operator: sla.operator.clone(),
                    performance_score: r.performance_score,
                    evaluated_at: r.evaluated_at,
                })
            })
            .collect();

        pending.sort_by(|a, b| {
            b.performance_score
                .cmp(&a.performance_score)
                .then_with(|| a.evaluated_at.cmp(&b.evaluated_at))
                .then_with(|| a.job_id.cmp(&b.job_id))
        });
        pending
    }

    pub async fn sla_metrics(&self, job_id: JobId) -> Option<SlaMetrics> {
        self.state.read().await.sla.get(&job_id).cloned()
    }

    pub async fn evaluation(&self, job_id: JobId) -> Option<EvaluationResult> {
        self.state.read().await.results.get(&job_id).cloned()
    }

    pub async fn job_state(&self, job_id: JobId) -> SlaJobState {
        let state = self.state.read().await;
        match (state.results.get(&job_id), state.sla.contains_key(&job_id)) {
            (Some(result), _) => result.state(),
            (None, true) => SlaJobState::MetricsSet,
            (None, false) => SlaJobState::Unset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::StaticOperatorDirectory;
    use async_trait::async_trait;
    use bonification_types::{
        Amount, Category, DesignDetails, DesignId, LedgerOperation, Violation,
    };
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

    /// Scorer returning a fixed, adjustable score
    struct FixedScores {
        score: AtomicU32,
        fail: bool,
        delay: Option<Duration>,
    }

    impl FixedScores {
        fn new(score: u32) -> Self {
            Self {
                score: AtomicU32::new(score),
                fail: false,
                delay: None,
            }
        }
    }

    #[async_trait]
    impl ScoreProvider for FixedScores {
        async fn calculate_performance_score(&self, _job: JobId) -> Result<u32, ScoreUnavailable> {
            Ok(self.score.load(Ordering::SeqCst))
        }

        async fn evaluate_performance(&self, _job: JobId) -> Result<u32, ScoreUnavailable> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ScoreUnavailable::Rejected("reverted".into()));
            }
            Ok(self.score.load(Ordering::SeqCst))
        }
    }

    /// Registry that records payouts and can be told to fail
    struct RecordingRegistry {
        details: DesignDetails,
        fail: bool,
        payouts: AtomicUsize,
    }

    #[async_trait]
    impl DesignRegistry for RecordingRegistry {
        async fn is_design_licensed(&self, _design: &DesignId, _account: &AccountId) -> bool {
            true
        }

        async fn design_details(&self, _design: &DesignId) -> DesignDetails {
            self.details.clone()
        }

        async fn process_bonification(
            &self,
            _caller: &AccountId,
            design_id: &DesignId,
            recipient: &AccountId,
            amount: Amount,
            job_id: Option<JobId>,
        ) -> BonificationResult<LedgerReceipt> {
            if self.fail {
                return Err(BonificationError::InsufficientPool {
                    required: amount.0,
                    available: 0,
                });
            }
            self.payouts.fetch_add(1, Ordering::SeqCst);
            let mut receipt = LedgerReceipt::new(
                LedgerOperation::Payout,
                design_id.clone(),
                recipient.clone(),
                amount,
                Amount::zero(),
            );
            if let Some(job_id) = job_id {
                receipt = receipt.with_job(job_id);
            }
            Ok(receipt)
        }
    }

    fn operator() -> AccountId {
        AccountId::new("op-1")
    }

    fn admin() -> AccountId {
        AccountId::new("admin")
    }

    fn registry(fail: bool) -> Arc<RecordingRegistry> {
        Arc::new(RecordingRegistry {
            details: DesignDetails {
                registered: true,
                owner: AccountId::new("designer"),
                price: Amount::new(1_000),
                pool: Amount::new(10_000),
                license_count: 1,
                active: true,
            },
            fail,
            payouts: AtomicUsize::new(0),
        })
    }

    fn evaluator(scores: Arc<FixedScores>, registry: Arc<RecordingRegistry>) -> SlaEvaluator {
        let config = EngineConfig {
            score_timeout_ms: 50,
            ..Default::default()
        };
        SlaEvaluator::new(
            AccountId::new("evaluator"),
            admin(),
            &config,
            scores,
            registry,
            Arc::new(StaticOperatorDirectory::with_operators([operator()])),
        )
        .unwrap()
    }

    fn targets() -> SlaTargets {
        SlaTargets {
            target_completion_time: 100,
            max_temperature_deviation: 5,
            min_quality_score: 80,
            manufacturing_type: Category::new("printing"),
            design_id: DesignId::new("0xdesign"),
        }
    }

    fn good_actuals() -> SlaActuals {
        SlaActuals {
            completion_time: 90,
            temperature_deviation: 2,
            quality_score: 95,
        }
    }

    #[tokio::test]
    async fn test_missing_metrics() {
        let eval = evaluator(Arc::new(FixedScores::new(95)), registry(false));
        let result = eval.evaluate_sla(&operator(), JobId::new(1), good_actuals()).await;
        assert_eq!(result.unwrap_err(), BonificationError::MetricsNotSet(JobId::new(1)));
        assert!(eval.evaluation(JobId::new(1)).await.is_none());
        assert_eq!(eval.job_state(JobId::new(1)).await, SlaJobState::Unset);
    }

    #[tokio::test]
    async fn test_invalid_targets_rejected() {
        let eval = evaluator(Arc::new(FixedScores::new(95)), registry(false));
        let mut bad = targets();
        bad.min_quality_score = 0;
        let result = eval.set_sla_metrics(&operator(), JobId::new(1), bad).await;
        assert!(matches!(result, Err(BonificationError::InvalidParameters(_))));

        let result = eval
            .set_sla_metrics(&AccountId::new("stranger"), JobId::new(1), targets())
            .await;
        assert!(matches!(result, Err(BonificationError::NotAuthorized(_))));
        assert!(eval.sla_metrics(JobId::new(1)).await.is_none());
    }

    #[tokio::test]
    async fn test_compliant_high_score_is_pending() {
        let eval = evaluator(Arc::new(FixedScores::new(92)), registry(false));
        let job = JobId::new(1);
        eval.set_sla_metrics(&operator(), job, targets()).await.unwrap();
        assert_eq!(eval.job_state(job).await, SlaJobState::MetricsSet);

        let result = eval.evaluate_sla(&operator(), job, good_actuals()).await.unwrap();
        assert!(result.is_compliant);
        assert!(result.violations.is_empty());
        assert!(result.bonification_pending);
        assert_eq!(eval.job_state(job).await, SlaJobState::BonusPending);

        let again = eval.evaluate_sla(&operator(), job, good_actuals()).await;
        assert_eq!(again.unwrap_err(), BonificationError::AlreadyEvaluated(job));

        let reconfigure = eval.set_sla_metrics(&operator(), job, targets()).await;
        assert_eq!(reconfigure.unwrap_err(), BonificationError::AlreadyEvaluated(job));
    }

    #[tokio::test]
    async fn test_violations_block_bonus() {
        let eval = evaluator(Arc::new(FixedScores::new(99)), registry(false));
        let job = JobId::new(1);
        eval.set_sla_metrics(&operator(), job, targets()).await.unwrap();

        let result = eval
            .evaluate_sla(
                &operator(),
                job,
                SlaActuals {
                    completion_time: 120,
                    temperature_deviation: 2,
                    quality_score: 70,
                },
            )
            .await
            .unwrap();
        assert!(!result.is_compliant);
        assert_eq!(
            result.violations,
            vec![Violation::CompletionTimeExceeded, Violation::QualityBelowMinimum]
        );
        assert!(!result.bonification_pending);
        assert_eq!(eval.job_state(job).await, SlaJobState::Evaluated);
    }

    #[tokio::test]
    async fn test_low_score_blocks_bonus() {
        let eval = evaluator(Arc::new(FixedScores::new(89)), registry(false));
        let job = JobId::new(1);
        eval.set_sla_metrics(&operator(), job, targets()).await.unwrap();
        let result = eval.evaluate_sla(&operator(), job, good_actuals()).await.unwrap();
        assert!(result.is_compliant);
        assert!(!result.bonification_pending);
    }

    #[tokio::test]
    async fn test_failed_scorer_degrades_to_zero() {
        let scores = Arc::new(FixedScores {
            score: AtomicU32::new(99),
            fail: true,
            delay: None,
        });
        let eval = evaluator(scores, registry(false));
        let job = JobId::new(1);
        eval.set_sla_metrics(&operator(), job, targets()).await.unwrap();

        let result = eval.evaluate_sla(&operator(), job, good_actuals()).await.unwrap();
        assert!(result.evaluated);
        assert!(result.is_compliant);
        assert_eq!(result.performance_score, 0);
        assert!(!result.score_available);
        assert!(!result.bonification_pending);
    }

    #[tokio::test]
    async fn test_slow_scorer_times_out() {
        let scores = Arc::new(FixedScores {
            score: AtomicU32::new(99),
            fail: false,
            delay: Some(Duration::from_millis(500)),
        });
        let eval = evaluator(scores, registry(false));
        let job = JobId::new(1);
        eval.set_sla_metrics(&operator(), job, targets()).await.unwrap();

        let result = eval.evaluate_sla(&operator(), job, good_actuals()).await.unwrap();
        assert_eq!(result.performance_score, 0);
        assert!(!result.bonification_pending);
    }

    #[tokio::test]
    async fn test_inactive_metrics() {
        let eval = evaluator(Arc::new(FixedScores::new(95)), registry(false));
        let job = JobId::new(1);
        eval.set_sla_metrics(&operator(), job, targets()).await.unwrap();
        assert!(eval
            .deactivate_sla_metrics(&AccountId::new("stranger"), job)
            .await
            .is_err());
        eval.deactivate_sla_metrics(&operator(), job).await.unwrap();

        let result = eval.evaluate_sla(&operator(), job, good_actuals()).await;
        assert_eq!(result.unwrap_err(), BonificationError::MetricsInactive(job));
    }

    #[tokio::test]
    async fn test_payout_is_one_shot() {
        let registry = registry(false);
        let eval = evaluator(Arc::new(FixedScores::new(95)), registry.clone());
        let job = JobId::new(1);
        eval.set_sla_metrics(&operator(), job, targets()).await.unwrap();
        eval.evaluate_sla(&operator(), job, good_actuals()).await.unwrap();

        let receipt = eval.process_pending_bonification(job).await.unwrap();
        assert_eq!(receipt.amount, Amount::new(100));
        assert_eq!(receipt.account, operator());
        assert_eq!(eval.job_state(job).await, SlaJobState::BonusPaid);

        let second = eval.process_pending_bonification(job).await;
        assert_eq!(second.unwrap_err(), BonificationError::NoPendingBonification(job));
        assert_eq!(registry.payouts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ledger_failure_keeps_pending() {
        let eval = evaluator(Arc::new(FixedScores::new(95)), registry(true));
        let job = JobId::new(1);
        eval.set_sla_metrics(&operator(), job, targets()).await.unwrap();
        eval.evaluate_sla(&operator(), job, good_actuals()).await.unwrap();

        let result = eval.process_pending_bonification(job).await;
        assert!(matches!(result, Err(BonificationError::BonificationFailed(_))));
        let evaluation = eval.evaluation(job).await.unwrap();
        assert!(evaluation.bonification_pending);
        assert!(!evaluation.bonification_paid);
    }

    #[tokio::test]
    async fn test_stale_score_blocks_payout() {
        let scores = Arc::new(FixedScores::new(95));
        let eval = evaluator(scores.clone(), registry(false));
        let job = JobId::new(1);
        eval.set_sla_metrics(&operator(), job, targets()).await.unwrap();
        eval.evaluate_sla(&operator(), job, good_actuals()).await.unwrap();

        scores.score.store(70, Ordering::SeqCst);
        let result = eval.process_pending_bonification(job).await;
        assert_eq!(
            result.unwrap_err(),
            BonificationError::ScoreBelowThreshold {
                score: 70,
                required: 90
            }
        );
        assert!(eval.evaluation(job).await.unwrap().bonification_pending);
    }

    #[tokio::test]
    async fn test_pending_sorted_by_score() {
        let scores = Arc::new(FixedScores::new(91));
        let eval = evaluator(scores.clone(), registry(false));

        for (id, score) in [(1u64, 91u32), (2, 99), (3, 95), (4, 99)] {
            scores.score.store(score, Ordering::SeqCst);
            eval.set_sla_metrics(&operator(), JobId::new(id), targets())
                .await
                .unwrap();
            eval.evaluate_sla(&operator(), JobId::new(id), good_actuals())
                .await
                .unwrap();
        }

        let order: Vec<u64> = eval
            .pending_bonifications()
            .await
            .iter()
            .map(|p| p.job_id.0)
            .collect();
        assert_eq!(order, vec![2, 4, 3, 1]);

        scores.score.store(100, Ordering::SeqCst);
        let outcomes = eval.process_pending_batch(2).await;
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|(_, r)| r.is_ok()));
        assert_eq!(eval.pending_bonifications().await.len(), 2);
    }

    #[tokio::test]
    async fn test_threshold_administration() {
        let eval = evaluator(Arc::new(FixedScores::new(85)), registry(false));
        assert!(eval.set_min_performance_for_bonus(&operator(), 80).await.is_err());
        assert!(eval.set_min_performance_for_bonus(&admin(), 101).await.is_err());
        eval.set_min_performance_for_bonus(&admin(), 80).await.unwrap();
        assert_eq!(eval.min_performance_for_bonus().await, 80);

        let job = JobId::new(1);
        eval.set_sla_metrics(&operator(), job, targets()).await.unwrap();
        let result = eval.evaluate_sla(&operator(), job, good_actuals()).await.unwrap();
        assert!(result.bonification_pending);
    }
}
