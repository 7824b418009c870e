//! Message types for the scheduler actor.

use ractor::RpcReplyPort;
use sched_core::{EnqueuedJob, Job, JobId};

/// Messages for the SchedulerActor.
#[derive(Debug)]
pub enum SchedulerMessage {
    /// Submit a job.
    Enqueue {
        job: Job,
        reply: RpcReplyPort<EnqueuedJob>,
    },

    /// Bulk-load jobs at startup, resetting dispatch state first.
    Initialize {
        jobs: Vec<Job>,
        reply: RpcReplyPort<Vec<EnqueuedJob>>,
    },

    /// Flush the pending mutation batch into the priority lane.
    ///
    /// Self-sent by the actor when the first mutation since the last flush
    /// is held; external senders have no reason to use it.
    FlushMutations,

    /// Start a dispatch cycle if one is not already running.
    Pump,

    /// The worker reported it is ready to accept work.
    WorkerReady,

    /// Look up a queued or in-flight job by identifier.
    GetJob {
        id: JobId,
        reply: RpcReplyPort<Option<EnqueuedJob>>,
    },

    /// The transport delivered the worker's completion or error event.
    ///
    /// Replies with the correlated job, removed from the registry.
    Resolve {
        id: JobId,
        reply: RpcReplyPort<Option<EnqueuedJob>>,
    },

    /// Jobs awaiting dispatch plus the transport's in-flight count.
    PendingCount { reply: RpcReplyPort<usize> },

    /// Send the shutdown job and clear all state once it completes.
    Terminate { reply: RpcReplyPort<()> },
}
