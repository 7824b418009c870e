//! Scheduler actor owning all queue state.
//!
//! Every submission, dequeue and flag flip happens inside this actor's
//! message handler, so queue transitions never interleave. The only
//! suspension the scheduler observes is worker readiness (a `WorkerReady`
//! message, never a poll) and the shutdown completion signal (a `Resolve`
//! for the well-known shutdown identifier).

use std::sync::Arc;

use chrono::Utc;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort, SpawnErr};
use sched_core::{
    DualQueue, EnqueuedJob, Job, JobKind, JobRegistry, Lane, PriorityCoalescer, SchedulerEvent,
};
use tokio::sync::broadcast;

use crate::loader::{LoadError, ResourceLoader};
use crate::messages::SchedulerMessage;
use crate::transport::{ErrorSink, WorkerTransport};

/// State for the scheduler actor.
pub struct SchedulerActorState {
    registry: JobRegistry,
    coalescer: PriorityCoalescer,
    queue: DualQueue,
    transport: Arc<dyn WorkerTransport>,
    loader: Arc<dyn ResourceLoader>,
    errors: Arc<dyn ErrorSink>,
    event_tx: broadcast::Sender<SchedulerEvent>,
    /// Reply port parked until the shutdown job resolves.
    shutdown_reply: Option<RpcReplyPort<()>>,
}

impl SchedulerActorState {
    /// Create a new scheduler actor state.
    pub fn new(
        transport: Arc<dyn WorkerTransport>,
        loader: Arc<dyn ResourceLoader>,
        errors: Arc<dyn ErrorSink>,
        event_tx: broadcast::Sender<SchedulerEvent>,
    ) -> Self {
        Self {
            registry: JobRegistry::new(),
            coalescer: PriorityCoalescer::new(),
            queue: DualQueue::new(),
            transport,
            loader,
            errors,
            event_tx,
            shutdown_reply: None,
        }
    }

    /// Broadcast an event.
    fn broadcast(&self, event: SchedulerEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Route a freshly registered job to its lane.
    ///
    /// Mutations are held by the coalescer; the first one held since the
    /// last flush schedules a `FlushMutations` behind everything already in
    /// the mailbox, so a same-burst submission can still coalesce onto it.
    async fn submit(&mut self, myself: &ActorRef<SchedulerMessage>, job: EnqueuedJob) {
        if job.kind().is_priority() {
            if self.coalescer.submit(job) {
                let _ = myself.send_message(SchedulerMessage::FlushMutations);
            }
        } else {
            self.push_normal(job);
            self.request_pump().await;
        }
    }

    /// Insert into the normal lane and announce it.
    fn push_normal(&mut self, job: EnqueuedJob) {
        self.broadcast(SchedulerEvent::JobQueued {
            job: job.clone(),
            lane: Lane::Normal,
            timestamp: Utc::now(),
        });
        self.queue.push_normal(job);
    }

    /// Move the coalesced batch into the priority lane.
    fn flush_mutations(&mut self) {
        let batch = self.coalescer.flush();
        if batch.is_empty() {
            // Shutdown may have cleared the map under a scheduled flush.
            return;
        }
        self.broadcast(SchedulerEvent::BatchFlushed {
            count: batch.len(),
            timestamp: Utc::now(),
        });
        for job in &batch {
            self.broadcast(SchedulerEvent::JobQueued {
                job: job.clone(),
                lane: Lane::Priority,
                timestamp: Utc::now(),
            });
        }
        self.queue.push_priority_batch(batch);
    }

    /// Queue a fresh consistency check behind a drained mutation burst.
    ///
    /// The normal-lane insertion rules dedup against any check already
    /// queued, so the synthesis is never suppressed here. The active
    /// dispatch cycle picks it up on its next dequeue.
    fn schedule_check(&mut self) {
        let check = self.registry.register(Job::check());
        self.broadcast(SchedulerEvent::CheckScheduled {
            id: check.id.clone(),
            timestamp: Utc::now(),
        });
        self.push_normal(check);
    }

    /// Run a dispatch cycle unless one is already in flight.
    ///
    /// While the worker reports itself ready, pulls the next job by lane
    /// priority, loads its resource if needed and hands it to the
    /// transport. Dispatch does not wait for results, only readiness; the
    /// worker serializes processing on its side. Ends when the lanes run
    /// dry or the worker stops reporting ready, to be resumed by the next
    /// `Pump` or `WorkerReady` message.
    async fn request_pump(&mut self) {
        if self.queue.dispatch_running() {
            return;
        }
        self.queue.set_dispatch_running(true);
        self.broadcast(SchedulerEvent::PumpStarted {
            timestamp: Utc::now(),
        });

        while self.transport.is_ready() {
            let Some(dequeued) = self.queue.dequeue() else {
                break;
            };
            if dequeued.drained_priority {
                self.schedule_check();
            }
            match self.hydrate(dequeued.job).await {
                Ok(job) => {
                    self.transport.send(&job);
                    self.broadcast(SchedulerEvent::JobDispatched {
                        id: job.id.clone(),
                        kind: job.kind(),
                        lane: dequeued.lane,
                        timestamp: Utc::now(),
                    });
                }
                Err((job, error)) => {
                    let message = format!("Skipping {} job: {}", job.kind(), error);
                    tracing::warn!("{}", message);
                    self.errors.notify(&message);
                    self.broadcast(SchedulerEvent::JobSkipped {
                        id: job.id.clone(),
                        uri: error.uri.clone(),
                        error: error.source.to_string(),
                        timestamp: Utc::now(),
                    });
                }
            }
        }

        self.queue.set_dispatch_running(false);
        self.broadcast(SchedulerEvent::PumpIdle {
            timestamp: Utc::now(),
        });
    }

    /// Fill in resource content for jobs submitted without it.
    async fn hydrate(&self, mut job: EnqueuedJob) -> Result<EnqueuedJob, (EnqueuedJob, LoadError)> {
        if !job.job.needs_content() {
            return Ok(job);
        }
        let Some(uri) = job.job.uri.clone() else {
            return Ok(job);
        };
        let loaded = match job.kind() {
            JobKind::AddSource => self.loader.read_text(&uri).await,
            JobKind::AddPackage | JobKind::AddArchive => {
                self.loader.read_binary_as_base64(&uri).await
            }
            _ => return Ok(job),
        };
        match loaded {
            Ok(content) => {
                job.job.content = Some(content);
                Ok(job)
            }
            Err(error) => Err((job, error)),
        }
    }

    /// Clear every piece of queue state once the worker confirms shutdown.
    fn finish_shutdown(&mut self) {
        tracing::info!("Worker confirmed shutdown, clearing queue state");
        self.queue.drain_all();
        self.coalescer.clear();
        self.registry.clear();
        self.broadcast(SchedulerEvent::Drained {
            timestamp: Utc::now(),
        });
        if let Some(reply) = self.shutdown_reply.take() {
            let _ = reply.send(());
        }
    }
}

/// Scheduler actor that feeds the worker in priority order.
pub struct SchedulerActor;

impl Actor for SchedulerActor {
    type Msg = SchedulerMessage;
    type State = SchedulerActorState;
    type Arguments = SchedulerActorState;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("Starting worker scheduler");
        Ok(args)
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            SchedulerMessage::Enqueue { job, reply } => {
                let enqueued = state.registry.register(job);
                state.submit(&myself, enqueued.clone()).await;
                let _ = reply.send(enqueued);
            }

            SchedulerMessage::Initialize { jobs, reply } => {
                // Startup replay goes straight to the lanes; burst batching
                // exists to absorb editor keystrokes, not bulk loads.
                state.queue.set_dispatch_running(false);
                let mut enqueued_jobs = Vec::with_capacity(jobs.len());
                for job in jobs {
                    let enqueued = state.registry.register(job);
                    enqueued_jobs.push(enqueued.clone());
                    if enqueued.kind().is_priority() {
                        state.broadcast(SchedulerEvent::JobQueued {
                            job: enqueued.clone(),
                            lane: Lane::Priority,
                            timestamp: Utc::now(),
                        });
                        state.queue.push_priority(enqueued);
                    } else {
                        state.push_normal(enqueued);
                    }
                }
                state.request_pump().await;
                let _ = reply.send(enqueued_jobs);
            }

            SchedulerMessage::FlushMutations => {
                state.flush_mutations();
                state.request_pump().await;
            }

            SchedulerMessage::Pump | SchedulerMessage::WorkerReady => {
                state.request_pump().await;
            }

            SchedulerMessage::GetJob { id, reply } => {
                let _ = reply.send(state.registry.get(&id).cloned());
            }

            SchedulerMessage::Resolve { id, reply } => {
                let job = state.registry.remove(&id);
                state.broadcast(SchedulerEvent::JobResolved {
                    id: id.clone(),
                    timestamp: Utc::now(),
                });
                if id.is_shutdown() {
                    state.finish_shutdown();
                }
                let _ = reply.send(job);
            }

            SchedulerMessage::PendingCount { reply } => {
                let _ = reply.send(state.queue.pending() + state.transport.in_flight());
            }

            SchedulerMessage::Terminate { reply } => {
                tracing::info!("Sending shutdown job to worker");
                // Shutdown bypasses both lanes; it must not wait behind
                // queued work.
                let job = EnqueuedJob::shutdown();
                state.transport.send(&job);
                state.shutdown_reply = Some(reply);
            }
        }

        Ok(())
    }
}

/// Start a scheduler actor with the given collaborators.
///
/// Returns the actor reference, the event broadcaster and the join handle.
pub async fn start_scheduler(
    transport: Arc<dyn WorkerTransport>,
    loader: Arc<dyn ResourceLoader>,
    errors: Arc<dyn ErrorSink>,
) -> Result<
    (
        ActorRef<SchedulerMessage>,
        broadcast::Sender<SchedulerEvent>,
        tokio::task::JoinHandle<()>,
    ),
    SpawnErr,
> {
    let (event_tx, _) = broadcast::channel(1024);
    let state = SchedulerActorState::new(transport, loader, errors, event_tx.clone());
    // Unnamed: a host may run more than one scheduler, and ractor's name
    // registry is process-global.
    let (actor, handle) = Actor::spawn(None, SchedulerActor, state).await?;

    Ok((actor, event_tx, handle))
}
