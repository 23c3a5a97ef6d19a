//! Metric Store - per-job measurements
//!
//! Actual values can be resubmitted until the job is completed; after that
//! the record only changes through [`MetricStore::complete`].

use bonification_types::{
    AccountId, BonificationError, BonificationResult, Category, JobId, JobMetrics, MetricSet,
};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MetricStore {
    jobs: HashMap<JobId, JobMetrics>,
}

impl MetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record or overwrite the actual measurements of a job
    pub fn record(
        &mut self,
        job_id: JobId,
        category: Category,
        actuals: MetricSet,
        submitted_by: AccountId,
    ) -> BonificationResult<&JobMetrics> {
        match self.jobs.entry(job_id) {
            Entry::Occupied(entry) => {
                let job = entry.into_mut();
                if job.completed {
                    return Err(BonificationError::JobAlreadyCompleted(job_id));
                }
                job.category = category;
                job.actuals = actuals;
                job.submitted_by = submitted_by;
                Ok(job)
            }
            Entry::Vacant(entry) => Ok(entry.insert(JobMetrics::new(
                job_id,
                category,
                actuals,
                submitted_by,
            ))),
        }
    }

    /// Freeze targets and cache the final score
    pub fn complete(
        &mut self,
        job_id: JobId,
        targets: MetricSet,
        score: u32,
    ) -> BonificationResult<&JobMetrics> {
        let job = self
            .jobs
            .get_mut(&job_id)
            .ok_or_else(|| BonificationError::NotFound(format!("metrics for {}", job_id)))?;
        if job.completed {
            return Err(BonificationError::JobAlreadyCompleted(job_id));
        }
        job.targets.get_or_insert(targets);
        job.performance_score = score;
        job.completed = true;
        Ok(job)
    }

    pub fn get(&self, job_id: &JobId) -> Option<&JobMetrics> {
        self.jobs.get(job_id)
    }

    pub fn score_of(&self, job_id: &JobId) -> u32 {
        self.jobs
            .get(job_id)
            .map(|job| job.performance_score)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
