//! Actor system for the worker job scheduler.
//!
//! This crate provides the Ractor-based actor that owns all queue state,
//! together with the interfaces to its external collaborators.
//!
//! # Architecture
//!
//! - `SchedulerActor` - single actor owning the registry, the coalescer and
//!   both dispatch lanes; all mutation flows through its mailbox
//! - `WorkerTransport` / `ResourceLoader` / `ErrorSink` - collaborator
//!   interfaces implemented by the host
//!
//! # Usage
//!
//! ```ignore
//! use actors::{start_scheduler, SchedulerMessage};
//!
//! let (scheduler, events, handle) = start_scheduler(transport, loader, errors).await?;
//! scheduler.send_message(SchedulerMessage::Pump)?;
//! ```

mod loader;
mod messages;
mod scheduler_actor;
mod transport;

pub use loader::{FsLoader, LoadError, LoadResult, ResourceLoader};
pub use messages::SchedulerMessage;
pub use scheduler_actor::{SchedulerActor, SchedulerActorState, start_scheduler};
pub use transport::{ErrorSink, TracingSink, WorkerTransport};

/// Re-export ractor types for convenience.
pub use ractor::{Actor, ActorRef, RpcReplyPort, concurrency};
