//! Event types for real-time updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EnqueuedJob, JobId, JobKind, Lane};

/// Events emitted by the scheduler for observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SchedulerEvent {
    /// A job entered a lane.
    JobQueued {
        job: EnqueuedJob,
        lane: Lane,
        timestamp: DateTime<Utc>,
    },
    /// A coalesced mutation batch was flushed to the priority lane.
    BatchFlushed {
        count: usize,
        timestamp: DateTime<Utc>,
    },
    /// A dispatch cycle started.
    PumpStarted { timestamp: DateTime<Utc> },
    /// A dispatch cycle ended: no more work, or the worker is not ready.
    PumpIdle { timestamp: DateTime<Utc> },
    /// A job was handed to the transport.
    JobDispatched {
        id: JobId,
        kind: JobKind,
        lane: Lane,
        timestamp: DateTime<Utc>,
    },
    /// A job was dropped because its resource failed to load.
    JobSkipped {
        id: JobId,
        uri: String,
        error: String,
        timestamp: DateTime<Utc>,
    },
    /// A consistency check was queued after the priority lane emptied.
    CheckScheduled {
        id: JobId,
        timestamp: DateTime<Utc>,
    },
    /// The worker's completion or error event for a job was delivered.
    JobResolved {
        id: JobId,
        timestamp: DateTime<Utc>,
    },
    /// Shutdown finished and all queue state was cleared.
    Drained { timestamp: DateTime<Utc> },
}

impl SchedulerEvent {
    /// Get the timestamp of the event.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            SchedulerEvent::JobQueued { timestamp, .. } => *timestamp,
            SchedulerEvent::BatchFlushed { timestamp, .. } => *timestamp,
            SchedulerEvent::PumpStarted { timestamp } => *timestamp,
            SchedulerEvent::PumpIdle { timestamp } => *timestamp,
            SchedulerEvent::JobDispatched { timestamp, .. } => *timestamp,
            SchedulerEvent::JobSkipped { timestamp, .. } => *timestamp,
            SchedulerEvent::CheckScheduled { timestamp, .. } => *timestamp,
            SchedulerEvent::JobResolved { timestamp, .. } => *timestamp,
            SchedulerEvent::Drained { timestamp } => *timestamp,
        }
    }

    /// Get the job ID associated with this event, if any.
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            SchedulerEvent::JobQueued { job, .. } => Some(&job.id),
            SchedulerEvent::JobDispatched { id, .. } => Some(id),
            SchedulerEvent::JobSkipped { id, .. } => Some(id),
            SchedulerEvent::CheckScheduled { id, .. } => Some(id),
            SchedulerEvent::JobResolved { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Get a short description of this event for logging.
    pub fn description(&self) -> String {
        match self {
            SchedulerEvent::JobQueued { job, lane, .. } => {
                format!("Job {} queued on {} lane", job.id, lane)
            }
            SchedulerEvent::BatchFlushed { count, .. } => {
                format!("Flushed {} coalesced mutations", count)
            }
            SchedulerEvent::PumpStarted { .. } => "Dispatch cycle started".to_string(),
            SchedulerEvent::PumpIdle { .. } => "Dispatch cycle idle".to_string(),
            SchedulerEvent::JobDispatched { id, kind, .. } => {
                format!("Job {} ({}) dispatched", id, kind)
            }
            SchedulerEvent::JobSkipped { id, uri, error, .. } => {
                format!("Job {} skipped, {} failed to load: {}", id, uri, error)
            }
            SchedulerEvent::CheckScheduled { id, .. } => {
                format!("Check {} scheduled after mutations", id)
            }
            SchedulerEvent::JobResolved { id, .. } => format!("Job {} resolved", id),
            SchedulerEvent::Drained { .. } => "Scheduler drained".to_string(),
        }
    }
}
