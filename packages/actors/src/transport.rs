//! Worker transport and error-reporting interfaces.

use sched_core::EnqueuedJob;

/// The serialized channel to the long-running worker process.
///
/// `send` is fire and forget from the scheduler's perspective; the
/// transport's own event stream delivers per-identifier completion and
/// error events, which the host feeds back through the `Resolve` message.
pub trait WorkerTransport: Send + Sync + 'static {
    /// Whether the worker can accept a job right now.
    ///
    /// Polled at the top of each dispatch attempt; the scheduler never
    /// waits on it, it relies on a `WorkerReady` notification instead.
    fn is_ready(&self) -> bool;

    /// Hand a job to the worker. Must not block.
    fn send(&self, job: &EnqueuedJob);

    /// Jobs sent but not yet resolved by the worker.
    fn in_flight(&self) -> usize;
}

/// One-way sink for errors that must reach the user.
pub trait ErrorSink: Send + Sync + 'static {
    /// Surface a human-readable error message.
    fn notify(&self, message: &str);
}

/// Error sink that reports through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn notify(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}
