//! Input batching for workspace mutations.

use std::collections::HashMap;

use crate::EnqueuedJob;

/// Collects mutation jobs keyed by resource identifier until the next
/// flush, so a burst of edits enters the priority lane as one batch.
///
/// At most one entry is pending per resource; a newer submission for the
/// same resource replaces the older one.
#[derive(Debug, Default)]
pub struct PriorityCoalescer {
    pending: HashMap<String, EnqueuedJob>,
}

impl PriorityCoalescer {
    /// Create an empty coalescer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold a mutation until the next flush, replacing any pending entry
    /// for the same resource.
    ///
    /// Returns true when this was the first entry held since the last
    /// flush, i.e. when the caller must schedule one.
    pub fn submit(&mut self, job: EnqueuedJob) -> bool {
        let was_empty = self.pending.is_empty();
        // Priority jobs always carry a resource identifier.
        let uri = job.uri().unwrap_or_default().to_string();
        self.pending.insert(uri, job);
        was_empty
    }

    /// Take every pending mutation as one batch.
    ///
    /// Order within the batch is unspecified; all entries pending at flush
    /// time enter together.
    pub fn flush(&mut self) -> Vec<EnqueuedJob> {
        self.pending.drain().map(|(_, job)| job).collect()
    }

    /// Number of resources with a pending mutation.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending mutation; used when shutdown clears state.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
