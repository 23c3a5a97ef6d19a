//! History Window - bounded FIFO of recently completed jobs
//!
//! One window exists per category. Once the window is at capacity every
//! insertion evicts the oldest entry.

use bonification_types::{BonificationError, BonificationResult, JobId, MIN_HISTORY_LIMIT};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Bounded, insertion-ordered list of job ids
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryWindow {
    limit: usize,
    entries: VecDeque<JobId>,
}

impl HistoryWindow {
    pub fn new(limit: usize) -> BonificationResult<Self> {
        validate_limit(limit)?;
        Ok(Self {
            limit,
            entries: VecDeque::with_capacity(limit),
        })
    }

    /// Append a job, returning the evicted entry if the window was full
    pub fn push(&mut self, job_id: JobId) -> Option<JobId> {
        let evicted = if self.entries.len() >= self.limit {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(job_id);
        evicted
    }

    /// Change the capacity, dropping the oldest entries that no longer fit
    pub fn set_limit(&mut self, limit: usize) -> BonificationResult<Vec<JobId>> {
        validate_limit(limit)?;
        self.limit = limit;
        let mut evicted = Vec::new();
        while self.entries.len() > self.limit {
            if let Some(oldest) = self.entries.pop_front() {
                evicted.push(oldest);
            }
        }
        Ok(evicted)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, job_id: &JobId) -> bool {
        self.entries.contains(job_id)
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &JobId> {
        self.entries.iter()
    }

    pub fn snapshot(&self) -> Vec<JobId> {
        self.entries.iter().copied().collect()
    }
}

fn validate_limit(limit: usize) -> BonificationResult<()> {
    if limit < MIN_HISTORY_LIMIT {
        return Err(BonificationError::InvalidParameters(format!(
            "history limit {} below minimum {}",
            limit, MIN_HISTORY_LIMIT
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<JobId> {
        raw.iter().copied().map(JobId::new).collect()
    }

    #[test]
    fn test_rejects_small_limit() {
        assert!(HistoryWindow::new(2).is_err());
        assert!(HistoryWindow::new(3).is_ok());
    }

    #[test]
    fn test_fifo_eviction() {
        let mut window = HistoryWindow::new(3).unwrap();
        assert_eq!(window.push(JobId::new(1)), None);
        assert_eq!(window.push(JobId::new(2)), None);
        assert_eq!(window.push(JobId::new(3)), None);
        assert_eq!(window.push(JobId::new(4)), Some(JobId::new(1)));
        assert_eq!(window.len(), 3);
        assert_eq!(window.snapshot(), ids(&[2, 3, 4]));
    }

    #[test]
    fn test_shrinking_limit_drops_oldest() {
        let mut window = HistoryWindow::new(5).unwrap();
        for id in 1..=5 {
            window.push(JobId::new(id));
        }
        let evicted = window.set_limit(3).unwrap();
        assert_eq!(evicted, ids(&[1, 2]));
        assert_eq!(window.snapshot(), ids(&[3, 4, 5]));
        assert!(window.set_limit(1).is_err());
        assert_eq!(window.limit(), 3);
    }
}
