//! Identifier assignment and completion correlation.

use std::collections::HashMap;

use crate::{EnqueuedJob, Job, JobId};

/// Assigns submission identifiers and retains jobs until the worker's
/// completion or error event for them has been delivered.
///
/// Pure bookkeeping: the registry imposes no ordering and never fails.
#[derive(Debug, Default)]
pub struct JobRegistry {
    counter: u64,
    jobs: HashMap<JobId, EnqueuedJob>,
}

impl JobRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next identifier and retain the job for correlation.
    pub fn register(&mut self, job: Job) -> EnqueuedJob {
        self.counter += 1;
        let enqueued = EnqueuedJob::new(JobId::from_counter(self.counter), job);
        self.jobs.insert(enqueued.id.clone(), enqueued.clone());
        enqueued
    }

    /// Look up a retained job by identifier.
    pub fn get(&self, id: &JobId) -> Option<&EnqueuedJob> {
        self.jobs.get(id)
    }

    /// Remove a job once its completion or error event has been delivered.
    pub fn remove(&mut self, id: &JobId) -> Option<EnqueuedJob> {
        self.jobs.remove(id)
    }

    /// Number of jobs retained for correlation.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether no jobs are retained.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Drop every retained job; used when shutdown clears state.
    pub fn clear(&mut self) {
        self.jobs.clear();
    }
}
