//! Core domain types for the worker job scheduler.
//!
//! This crate contains the pure scheduling state shared across packages:
//! - Job, JobKind and EnqueuedJob for requests bound for the worker
//! - JobRegistry for identifier assignment and result correlation
//! - PriorityCoalescer for batching workspace mutations
//! - DualQueue for the two dispatch lanes
//! - Events for real-time updates
//!
//! Nothing here is async or does I/O; the actor package owns all mutation.

mod coalescer;
mod events;
mod job;
mod queue;
mod registry;

pub use coalescer::PriorityCoalescer;
pub use events::SchedulerEvent;
pub use job::{EnqueuedJob, Job, JobId, JobKind};
pub use queue::{Dequeued, DualQueue, Lane};
pub use registry::JobRegistry;
