//! Per-job mutual exclusion
//!
//! Operations on the same job id are serialized for their whole duration,
//! including any awaited calls to other components. Different jobs proceed
//! concurrently. A job's entry is dropped again once nobody holds or waits
//! for its lock.

use bonification_types::JobId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OwnedMutexGuard;

type LockMap = HashMap<JobId, Arc<tokio::sync::Mutex<()>>>;

#[derive(Debug, Default)]
pub struct JobLocks {
    locks: Mutex<LockMap>,
}

/// Exclusive access to one job, released on drop
#[derive(Debug)]
pub struct JobGuard<'a> {
    owner: &'a JobLocks,
    job_id: JobId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl JobLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, LockMap> {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Wait for exclusive access to a job
    pub async fn acquire(&self, job_id: JobId) -> JobGuard<'_> {
        let lock = Arc::clone(self.map().entry(job_id).or_default());
        JobGuard {
            owner: self,
            job_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Number of jobs currently held or waited on
    pub fn tracked(&self) -> usize {
        self.map().len()
    }
}

impl Drop for JobGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Clones are only taken under the map lock, so a count of one means
        // the map holds the last reference.
        let mut locks = self.owner.map();
        if locks
            .get(&self.job_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.job_id);
        }
    }
}
