//! Job domain types for requests bound for the analysis worker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for an enqueued job.
///
/// Identifiers are the string form of a per-scheduler counter, assigned at
/// submission time and unique for the process lifetime. The terminal
/// shutdown job carries the fixed identifier [`JobId::SHUTDOWN`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Well-known identifier carried by the shutdown job.
    pub const SHUTDOWN: &'static str = "shutdown";

    pub(crate) fn from_counter(counter: u64) -> Self {
        Self(counter.to_string())
    }

    /// The fixed identifier of the terminal shutdown job.
    pub fn shutdown() -> Self {
        Self(Self::SHUTDOWN.to_string())
    }

    /// Whether this is the shutdown identifier.
    pub fn is_shutdown(&self) -> bool {
        self.0 == Self::SHUTDOWN
    }

    /// The identifier as sent over the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of request sent to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Add or replace a source file in the worker's workspace.
    AddSource,
    /// Remove a source file from the worker's workspace.
    RemoveSource,
    /// Add a package to the worker's workspace.
    AddPackage,
    /// Remove a package from the worker's workspace.
    RemovePackage,
    /// Add a packed archive to the worker's workspace.
    AddArchive,
    /// Remove a packed archive from the worker's workspace.
    RemoveArchive,
    /// Run a consistency check over the workspace.
    Check,
    /// Compile the current workspace.
    Compile,
    /// Execute a compiled program.
    Execute,
    /// Terminal request telling the worker to exit.
    Shutdown,
}

impl JobKind {
    /// Workspace mutations take the priority lane; everything else
    /// (including checks) queues normally.
    pub fn is_priority(&self) -> bool {
        matches!(
            self,
            JobKind::AddSource
                | JobKind::RemoveSource
                | JobKind::AddPackage
                | JobKind::RemovePackage
                | JobKind::AddArchive
                | JobKind::RemoveArchive
        )
    }

    /// Get a simple kind string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::AddSource => "add_source",
            JobKind::RemoveSource => "remove_source",
            JobKind::AddPackage => "add_package",
            JobKind::RemovePackage => "remove_package",
            JobKind::AddArchive => "add_archive",
            JobKind::RemoveArchive => "remove_archive",
            JobKind::Check => "check",
            JobKind::Compile => "compile",
            JobKind::Execute => "execute",
            JobKind::Shutdown => "shutdown",
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request for the worker, immutable once constructed by the caller.
///
/// Workspace mutation kinds carry the resource identifier they target;
/// `content` may be supplied inline or loaded at dispatch time. Compute
/// kinds carry their request payload as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Kind of request, used for lane routing and payload rules.
    pub kind: JobKind,
    /// Resource identifier this request targets, when kind-specific.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Inline resource content; loaded at dispatch when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Extra payload for compute kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl Job {
    /// Create a new job of the given kind with no payload fields.
    pub fn new(kind: JobKind) -> Self {
        Self {
            kind,
            uri: None,
            content: None,
            payload: None,
        }
    }

    /// Add or replace the source file at `uri`.
    pub fn add_source(uri: impl Into<String>) -> Self {
        Self::new(JobKind::AddSource).with_uri(uri)
    }

    /// Remove the source file at `uri`.
    pub fn remove_source(uri: impl Into<String>) -> Self {
        Self::new(JobKind::RemoveSource).with_uri(uri)
    }

    /// Add the package at `uri`.
    pub fn add_package(uri: impl Into<String>) -> Self {
        Self::new(JobKind::AddPackage).with_uri(uri)
    }

    /// Remove the package at `uri`.
    pub fn remove_package(uri: impl Into<String>) -> Self {
        Self::new(JobKind::RemovePackage).with_uri(uri)
    }

    /// Add the archive at `uri`.
    pub fn add_archive(uri: impl Into<String>) -> Self {
        Self::new(JobKind::AddArchive).with_uri(uri)
    }

    /// Remove the archive at `uri`.
    pub fn remove_archive(uri: impl Into<String>) -> Self {
        Self::new(JobKind::RemoveArchive).with_uri(uri)
    }

    /// Run a workspace consistency check.
    pub fn check() -> Self {
        Self::new(JobKind::Check)
    }

    /// Terminal request telling the worker to exit.
    pub fn shutdown() -> Self {
        Self::new(JobKind::Shutdown)
    }

    /// Set the resource identifier for this job.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Supply the resource content inline, skipping the load at dispatch.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Attach a JSON payload for compute kinds.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Whether dispatch must load the resource before sending.
    ///
    /// Source kinds load raw text, package and archive kinds load
    /// base64-encoded bytes; removals and compute kinds carry no content.
    pub fn needs_content(&self) -> bool {
        self.content.is_none()
            && matches!(
                self.kind,
                JobKind::AddSource | JobKind::AddPackage | JobKind::AddArchive
            )
    }
}

/// A job enriched with its scheduler-assigned identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnqueuedJob {
    /// Identifier used to correlate the worker's completion event.
    pub id: JobId,
    /// The submitted request.
    pub job: Job,
    /// When the job was submitted.
    pub submitted_at: DateTime<Utc>,
}

impl EnqueuedJob {
    pub(crate) fn new(id: JobId, job: Job) -> Self {
        Self {
            id,
            job,
            submitted_at: Utc::now(),
        }
    }

    /// The terminal shutdown job with its fixed identifier.
    ///
    /// Never allocated by the registry: shutdown bypasses both lanes and is
    /// correlated by the well-known identifier alone.
    pub fn shutdown() -> Self {
        Self::new(JobId::shutdown(), Job::shutdown())
    }

    /// Kind of the underlying request.
    pub fn kind(&self) -> JobKind {
        self.job.kind
    }

    /// Resource identifier of the underlying request, if any.
    pub fn uri(&self) -> Option<&str> {
        self.job.uri.as_deref()
    }
}
