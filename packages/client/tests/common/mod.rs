//! Test doubles for the scheduler's external collaborators.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use actors::{ErrorSink, LoadError, LoadResult, ResourceLoader, WorkerTransport};
use futures_util::future::BoxFuture;
use sched_core::{EnqueuedJob, JobKind, SchedulerEvent};
use tokio::sync::broadcast;

/// Transport double recording every sent job.
#[derive(Default)]
pub struct TestTransport {
    ready: AtomicBool,
    in_flight: AtomicUsize,
    sent: Mutex<Vec<EnqueuedJob>>,
}

impl TestTransport {
    pub fn new(ready: bool) -> Self {
        let transport = Self::default();
        transport.ready.store(ready, Ordering::SeqCst);
        transport
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn set_in_flight(&self, count: usize) {
        self.in_flight.store(count, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<EnqueuedJob> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_kinds(&self) -> Vec<JobKind> {
        self.sent().iter().map(|job| job.kind()).collect()
    }
}

impl WorkerTransport for TestTransport {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn send(&self, job: &EnqueuedJob) {
        self.sent.lock().unwrap().push(job.clone());
    }

    fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Loader double serving canned resources; anything else fails to load.
#[derive(Default)]
pub struct StaticLoader {
    texts: HashMap<String, String>,
    encoded: HashMap<String, String>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, uri: &str, text: &str) -> Self {
        self.texts.insert(uri.to_string(), text.to_string());
        self
    }

    /// Register an already base64-encoded binary resource.
    pub fn with_encoded(mut self, uri: &str, encoded: &str) -> Self {
        self.encoded.insert(uri.to_string(), encoded.to_string());
        self
    }
}

fn missing(uri: &str) -> LoadError {
    LoadError {
        uri: uri.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such test resource"),
    }
}

impl ResourceLoader for StaticLoader {
    fn read_text(&self, uri: &str) -> BoxFuture<'static, LoadResult> {
        let result = self.texts.get(uri).cloned().ok_or_else(|| missing(uri));
        Box::pin(async move { result })
    }

    fn read_binary_as_base64(&self, uri: &str) -> BoxFuture<'static, LoadResult> {
        let result = self.encoded.get(uri).cloned().ok_or_else(|| missing(uri));
        Box::pin(async move { result })
    }
}

/// Error sink double recording every notification.
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl ErrorSink for RecordingSink {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Drain events until the dispatch cycle goes idle.
pub async fn collect_until_idle(rx: &mut broadcast::Receiver<SchedulerEvent>) -> Vec<SchedulerEvent> {
    let mut events = Vec::new();
    loop {
        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out waiting for scheduler events")
            .expect("event channel closed");
        let idle = matches!(event, SchedulerEvent::PumpIdle { .. });
        events.push(event);
        if idle {
            return events;
        }
    }
}
