//! Dual-lane queue of jobs awaiting dispatch.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{EnqueuedJob, JobKind};

/// Lane a job is queued on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    /// Workspace mutations; always dispatched first.
    Priority,
    /// Checks and compute requests.
    Normal,
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lane::Priority => write!(f, "priority"),
            Lane::Normal => write!(f, "normal"),
        }
    }
}

/// Outcome of a dequeue step.
#[derive(Debug)]
pub struct Dequeued {
    /// The job to dispatch next.
    pub job: EnqueuedJob,
    /// Lane the job came from.
    pub lane: Lane,
    /// True when this pop left the priority lane empty, which obliges the
    /// caller to schedule a consistency check.
    pub drained_priority: bool,
}

/// Two ordered lanes of jobs awaiting dispatch, plus the single-flight
/// flag for the dispatch pump.
///
/// Invariants: the normal lane holds at most one check job, and if present
/// it occupies the head; `dispatch_running` is true iff a dispatch cycle is
/// logically in flight.
#[derive(Debug, Default)]
pub struct DualQueue {
    priority: VecDeque<EnqueuedJob>,
    normal: VecDeque<EnqueuedJob>,
    dispatch_running: bool,
}

impl DualQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single job to the priority lane.
    pub fn push_priority(&mut self, job: EnqueuedJob) {
        self.priority.push_back(job);
    }

    /// Append a flushed mutation batch to the priority lane.
    pub fn push_priority_batch(&mut self, batch: Vec<EnqueuedJob>) {
        self.priority.extend(batch);
    }

    /// Insert a job into the normal lane.
    ///
    /// Check jobs replace any queued check and move to the head; everything
    /// else appends in arrival order.
    pub fn push_normal(&mut self, job: EnqueuedJob) {
        if job.kind() == JobKind::Check {
            self.normal.retain(|queued| queued.kind() != JobKind::Check);
            self.normal.push_front(job);
        } else {
            self.normal.push_back(job);
        }
    }

    /// Pop the next job by lane priority.
    pub fn dequeue(&mut self) -> Option<Dequeued> {
        if let Some(job) = self.priority.pop_front() {
            return Some(Dequeued {
                job,
                lane: Lane::Priority,
                drained_priority: self.priority.is_empty(),
            });
        }
        self.normal.pop_front().map(|job| Dequeued {
            job,
            lane: Lane::Normal,
            drained_priority: false,
        })
    }

    /// Jobs queued across both lanes.
    pub fn pending(&self) -> usize {
        self.priority.len() + self.normal.len()
    }

    /// Whether both lanes are empty.
    pub fn is_empty(&self) -> bool {
        self.priority.is_empty() && self.normal.is_empty()
    }

    /// Whether a dispatch cycle is logically in flight.
    pub fn dispatch_running(&self) -> bool {
        self.dispatch_running
    }

    /// Flip the single-flight dispatch flag.
    pub fn set_dispatch_running(&mut self, running: bool) {
        self.dispatch_running = running;
    }

    /// Clear both lanes and the running flag; used only by shutdown.
    pub fn drain_all(&mut self) {
        self.priority.clear();
        self.normal.clear();
        self.dispatch_running = false;
    }
}
