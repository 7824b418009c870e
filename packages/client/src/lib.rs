//! Client facade for the worker job scheduler.
//!
//! Wraps the scheduler actor in a typed async handle so hosts never touch
//! messages or reply ports directly:
//!
//! ```ignore
//! use client::SchedulerClient;
//! use sched_core::Job;
//!
//! let (scheduler, _handle) = SchedulerClient::start(transport, loader, errors).await?;
//! let enqueued = scheduler.enqueue(Job::add_source("src/main.ext")).await?;
//! scheduler.worker_ready()?;
//! ```

use std::sync::Arc;

use actors::{
    ErrorSink, ResourceLoader, RpcReplyPort, SchedulerMessage, WorkerTransport, concurrency,
    start_scheduler,
};
use tokio::sync::broadcast;

// Re-export core types for convenience.
pub use sched_core::{EnqueuedJob, Job, JobId, JobKind, Lane, SchedulerEvent};

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("scheduler is not running")]
    SchedulerStopped,

    #[error("scheduler dropped the reply")]
    ReplyDropped,

    #[error("failed to spawn scheduler: {0}")]
    Spawn(String),
}

/// Handle for submitting work to the scheduler.
///
/// Cheap to clone; all clones drive the same actor.
#[derive(Clone)]
pub struct SchedulerClient {
    actor: actors::ActorRef<SchedulerMessage>,
    events: broadcast::Sender<SchedulerEvent>,
}

impl SchedulerClient {
    /// Spawn a scheduler actor and return its client.
    pub async fn start(
        transport: Arc<dyn WorkerTransport>,
        loader: Arc<dyn ResourceLoader>,
        errors: Arc<dyn ErrorSink>,
    ) -> Result<(Self, tokio::task::JoinHandle<()>), ClientError> {
        let (actor, events, handle) = start_scheduler(transport, loader, errors)
            .await
            .map_err(|e| ClientError::Spawn(e.to_string()))?;
        Ok((Self { actor, events }, handle))
    }

    /// The underlying actor reference, for hosts that wire messages
    /// themselves.
    pub fn actor(&self) -> &actors::ActorRef<SchedulerMessage> {
        &self.actor
    }

    /// Subscribe to scheduler events.
    pub fn subscribe(&self) -> broadcast::Receiver<SchedulerEvent> {
        self.events.subscribe()
    }

    /// Submit a job; replies with its assigned identifier.
    pub async fn enqueue(&self, job: Job) -> Result<EnqueuedJob, ClientError> {
        self.call(|reply| SchedulerMessage::Enqueue { job, reply })
            .await
    }

    /// Bulk-load jobs at startup, resetting dispatch state first.
    pub async fn initialize(&self, jobs: Vec<Job>) -> Result<Vec<EnqueuedJob>, ClientError> {
        self.call(|reply| SchedulerMessage::Initialize { jobs, reply })
            .await
    }

    /// Jobs awaiting dispatch plus the transport's in-flight count.
    pub async fn pending_count(&self) -> Result<usize, ClientError> {
        self.call(|reply| SchedulerMessage::PendingCount { reply })
            .await
    }

    /// Look up a queued or in-flight job by identifier.
    pub async fn lookup(&self, id: JobId) -> Result<Option<EnqueuedJob>, ClientError> {
        self.call(|reply| SchedulerMessage::GetJob { id, reply })
            .await
    }

    /// Deliver the worker's completion or error event for a job.
    ///
    /// Returns the correlated job, removed from the registry. Delivering
    /// the shutdown identifier completes a pending [`terminate`].
    ///
    /// [`terminate`]: SchedulerClient::terminate
    pub async fn resolve(&self, id: JobId) -> Result<Option<EnqueuedJob>, ClientError> {
        self.call(|reply| SchedulerMessage::Resolve { id, reply })
            .await
    }

    /// Notify the scheduler that the worker is ready for the next job.
    pub fn worker_ready(&self) -> Result<(), ClientError> {
        self.actor
            .send_message(SchedulerMessage::WorkerReady)
            .map_err(|_| ClientError::SchedulerStopped)
    }

    /// Request a dispatch cycle; redundant requests coalesce.
    pub fn request_pump(&self) -> Result<(), ClientError> {
        self.actor
            .send_message(SchedulerMessage::Pump)
            .map_err(|_| ClientError::SchedulerStopped)
    }

    /// Send the shutdown job and wait until the worker confirms it and all
    /// queue state is cleared.
    ///
    /// Never times out on its own; callers impose their own deadline.
    pub async fn terminate(&self) -> Result<(), ClientError> {
        self.call(|reply| SchedulerMessage::Terminate { reply })
            .await
    }

    async fn call<T, F>(&self, make_msg: F) -> Result<T, ClientError>
    where
        T: Send + 'static,
        F: FnOnce(RpcReplyPort<T>) -> SchedulerMessage,
    {
        let (tx, rx) = concurrency::oneshot();
        self.actor
            .send_message(make_msg(tx.into()))
            .map_err(|_| ClientError::SchedulerStopped)?;
        rx.await.map_err(|_| ClientError::ReplyDropped)
    }
}
