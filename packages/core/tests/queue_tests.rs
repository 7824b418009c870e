use sched_core::{DualQueue, Job, JobKind, JobRegistry, Lane, PriorityCoalescer};

#[test]
fn registry_assigns_monotonic_string_ids() {
    let mut registry = JobRegistry::new();

    let first = registry.register(Job::check());
    let second = registry.register(Job::new(JobKind::Compile));
    assert_eq!(first.id.as_str(), "1");
    assert_eq!(second.id.as_str(), "2");
    assert_eq!(registry.len(), 2);

    let removed = registry.remove(&first.id).expect("job retained");
    assert_eq!(removed.kind(), JobKind::Check);
    assert!(registry.get(&first.id).is_none());
    assert!(registry.get(&second.id).is_some());

    registry.clear();
    assert!(registry.is_empty());

    // The counter survives a clear; identifiers are unique for the
    // process lifetime.
    let third = registry.register(Job::check());
    assert_eq!(third.id.as_str(), "3");
}

#[test]
fn coalescer_keeps_latest_submission_per_resource() {
    let mut registry = JobRegistry::new();
    let mut coalescer = PriorityCoalescer::new();

    let first = registry.register(Job::add_source("a.ext").with_content("old"));
    let second = registry.register(Job::add_source("b.ext"));
    let third = registry.register(Job::add_source("a.ext").with_content("new"));

    assert!(coalescer.submit(first), "first held entry schedules a flush");
    assert!(!coalescer.submit(second));
    assert!(!coalescer.submit(third));
    assert_eq!(coalescer.len(), 2);

    let batch = coalescer.flush();
    assert!(coalescer.is_empty());
    assert_eq!(batch.len(), 2);

    let for_a = batch
        .iter()
        .find(|job| job.uri() == Some("a.ext"))
        .expect("a.ext in batch");
    assert_eq!(for_a.job.content.as_deref(), Some("new"));
    assert!(batch.iter().any(|job| job.uri() == Some("b.ext")));

    // The next submission after a flush is a fresh first entry.
    let fourth = registry.register(Job::remove_source("a.ext"));
    assert!(coalescer.submit(fourth));
}

#[test]
fn dual_queue_dispatches_priority_lane_first() {
    let mut registry = JobRegistry::new();
    let mut queue = DualQueue::new();

    queue.push_normal(registry.register(Job::new(JobKind::Compile)));
    queue.push_priority_batch(vec![
        registry.register(Job::add_source("a.ext")),
        registry.register(Job::remove_package("p.pkg")),
    ]);
    assert_eq!(queue.pending(), 3);

    let first = queue.dequeue().expect("priority head");
    assert_eq!(first.lane, Lane::Priority);
    assert_eq!(first.job.kind(), JobKind::AddSource);
    assert!(!first.drained_priority);

    let second = queue.dequeue().expect("priority tail");
    assert_eq!(second.job.kind(), JobKind::RemovePackage);
    assert!(second.drained_priority, "last priority pop reports the drain");

    let third = queue.dequeue().expect("normal job");
    assert_eq!(third.lane, Lane::Normal);
    assert!(!third.drained_priority);

    assert!(queue.dequeue().is_none());
}

#[test]
fn normal_lane_keeps_one_check_at_the_head() {
    let mut registry = JobRegistry::new();
    let mut queue = DualQueue::new();

    let stale_check = registry.register(Job::check());
    queue.push_normal(stale_check.clone());
    queue.push_normal(registry.register(Job::new(JobKind::Compile)));
    let fresh_check = registry.register(Job::check());
    queue.push_normal(fresh_check.clone());

    assert_eq!(queue.pending(), 2, "stale check was replaced");

    let head = queue.dequeue().expect("check at head");
    assert_eq!(head.job.kind(), JobKind::Check);
    assert_eq!(head.job.id, fresh_check.id);
    assert_ne!(head.job.id, stale_check.id);

    assert_eq!(
        queue.dequeue().expect("compile next").job.kind(),
        JobKind::Compile
    );
}

#[test]
fn drain_all_clears_lanes_and_running_flag() {
    let mut registry = JobRegistry::new();
    let mut queue = DualQueue::new();

    queue.push_priority(registry.register(Job::add_archive("lib.tar")));
    queue.push_normal(registry.register(Job::check()));
    queue.set_dispatch_running(true);

    queue.drain_all();
    assert!(queue.is_empty());
    assert_eq!(queue.pending(), 0);
    assert!(!queue.dispatch_running());
}

#[test]
fn job_kind_classification_and_content_rules() {
    for kind in [
        JobKind::AddSource,
        JobKind::RemoveSource,
        JobKind::AddPackage,
        JobKind::RemovePackage,
        JobKind::AddArchive,
        JobKind::RemoveArchive,
    ] {
        assert!(kind.is_priority(), "{kind} belongs to the priority lane");
    }
    for kind in [
        JobKind::Check,
        JobKind::Compile,
        JobKind::Execute,
        JobKind::Shutdown,
    ] {
        assert!(!kind.is_priority(), "{kind} queues normally");
    }

    assert!(Job::add_source("a.ext").needs_content());
    assert!(Job::add_package("p.pkg").needs_content());
    assert!(Job::add_archive("lib.tar").needs_content());
    assert!(!Job::add_source("a.ext").with_content("inline").needs_content());
    assert!(!Job::remove_source("a.ext").needs_content());
    assert!(!Job::check().needs_content());
}
