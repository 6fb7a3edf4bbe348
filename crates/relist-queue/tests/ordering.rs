//! Ordering and isolation tests for the notify queue.
//!
//! These drive the queue the way a renderer-facing controller would:
//! mutations submitted back to back, some needing a slow background
//! comparison, with the sink watching what arrives and when.

use relist_core::compare::{EqComparator, ItemComparator};
use relist_core::diff::DiffEngine;
use relist_core::mutation::Mutation;
use relist_core::script::EditScript;
use relist_core::sink::{Recorder, SinkCall};
use relist_diff::SliceDiff;
use relist_queue::{NotifyQueue, QueueConfig, QueueEvent};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Wraps the default engine, delaying every comparison and counting how
/// many run at once.
struct ProbeDiff {
    inner: SliceDiff,
    delay: Duration,
    active: AtomicUsize,
    overlaps: AtomicUsize,
    runs: AtomicUsize,
}

impl ProbeDiff {
    fn slow(delay: Duration) -> Self {
        Self {
            inner: SliceDiff::new(),
            delay,
            active: AtomicUsize::new(0),
            overlaps: AtomicUsize::new(0),
            runs: AtomicUsize::new(0),
        }
    }
}

impl<T> DiffEngine<T> for ProbeDiff {
    fn diff(&self, old: &[T], new: &[T], cmp: &dyn ItemComparator<T>) -> EditScript {
        if self.active.fetch_add(1, Ordering::SeqCst) > 0 {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        std::thread::sleep(self.delay);
        let script = self.inner.diff(old, new, cmp);
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.runs.fetch_add(1, Ordering::SeqCst);
        script
    }
}

/// A mutation series exercising every variant, with indices chosen to stay
/// valid through the whole run.
fn burst() -> Vec<Mutation<char>> {
    vec![
        Mutation::append_all(vec!['a', 'b', 'c', 'd']),
        Mutation::move_item(3, 0),
        Mutation::refresh(vec!['x', 'b', 'a']),
        Mutation::remove('b'),
        Mutation::update_where(|c| *c == 'x', |c| *c = 'y'),
        Mutation::insert(1, 'q'),
        Mutation::remove_all(vec!['q', 'z']),
        Mutation::replace(0, 'm'),
        Mutation::append('n'),
        Mutation::remove_range(0, 1),
        Mutation::clear(),
        Mutation::append_all(vec!['1', '2', '3']),
        Mutation::refresh(vec!['3', '1']),
    ]
}

/// The same series applied offline, with no queue or sink involved.
fn burst_replayed() -> Vec<char> {
    let mut items = Vec::new();
    for m in burst() {
        m.apply_direct(&mut items, &EqComparator).unwrap();
    }
    items
}

#[tokio::test]
async fn test_fast_mutation_waits_for_slow_diff() {
    let probe = Arc::new(ProbeDiff::slow(Duration::from_millis(50)));
    let queue: NotifyQueue<char> =
        NotifyQueue::with_engine(EqComparator, probe.clone(), QueueConfig::default());

    queue.submit(Mutation::append_all(vec!['a', 'b']));
    queue.settled().await;

    let recorder = Arc::new(Recorder::new());
    queue.attach(&recorder);

    // The refresh needs a slow comparison; the append after it is cheap and
    // must still wait its turn.
    queue.submit(Mutation::refresh(vec!['c']));
    queue.submit(Mutation::append('d'));
    queue.settled().await;

    assert_eq!(queue.snapshot(), vec!['c', 'd']);
    assert_eq!(
        recorder.calls(),
        vec![
            SinkCall::Removed { index: 0, count: 2 },
            SinkCall::Inserted { index: 0, count: 1 },
            SinkCall::Inserted { index: 1, count: 1 },
        ]
    );
}

#[tokio::test]
async fn test_comparisons_never_overlap() {
    let probe = Arc::new(ProbeDiff::slow(Duration::from_millis(10)));
    let queue: NotifyQueue<char> =
        NotifyQueue::with_engine(EqComparator, probe.clone(), QueueConfig::default());

    for round in 0..6u8 {
        let fill = (b'a' + round) as char;
        queue.submit(Mutation::refresh(vec![fill, 'z']));
        queue.submit(Mutation::append('!'));
    }
    queue.settled().await;

    assert_eq!(probe.runs.load(Ordering::SeqCst), 6);
    assert_eq!(probe.overlaps.load(Ordering::SeqCst), 0);
    assert_eq!(queue.snapshot(), vec!['f', 'z', '!']);
}

#[tokio::test]
async fn test_mixed_burst_applies_cleanly() {
    let queue: NotifyQueue<char> = NotifyQueue::new(EqComparator);
    let recorder = Arc::new(Recorder::new());
    queue.attach(&recorder);
    let mut events = queue.subscribe();

    let series = burst();
    let total = series.len();
    for m in series {
        queue.submit(m);
    }
    queue.settled().await;

    assert_eq!(queue.snapshot(), burst_replayed());

    let mut applied = 0;
    while let Ok(event) = events.try_recv() {
        match event {
            QueueEvent::Applied { .. } => applied += 1,
            QueueEvent::Rejected { error } => panic!("unexpected rejection: {}", error),
        }
    }
    assert_eq!(applied, total);
}

#[tokio::test]
async fn test_detached_queue_reaches_same_state() {
    // No sink at any point; the sequence must still end up identical to the
    // offline replay.
    let queue: NotifyQueue<char> = NotifyQueue::new(EqComparator);
    for m in burst() {
        queue.submit(m);
    }
    queue.settled().await;

    assert_eq!(queue.snapshot(), burst_replayed());
}

#[tokio::test]
async fn test_remove_then_refresh_scenario() {
    let queue: NotifyQueue<char> = NotifyQueue::new(EqComparator);
    queue.submit(Mutation::append_all(vec!['a', 'b', 'c']));
    queue.settled().await;

    let recorder = Arc::new(Recorder::new());
    queue.attach(&recorder);

    queue.submit(Mutation::remove('b'));
    queue.submit(Mutation::refresh(vec!['c', 'a', 'd']));
    queue.settled().await;

    assert_eq!(queue.snapshot(), vec!['c', 'a', 'd']);
    assert_eq!(
        recorder.calls(),
        vec![
            SinkCall::Removed { index: 1, count: 1 },
            SinkCall::Moved { from: 1, to: 0 },
            SinkCall::Inserted { index: 2, count: 1 },
        ]
    );
}

#[tokio::test]
async fn test_append_on_empty_sequence() {
    let queue: NotifyQueue<char> = NotifyQueue::new(EqComparator);
    let recorder = Arc::new(Recorder::new());
    queue.attach(&recorder);

    queue.submit(Mutation::append('x'));
    queue.settled().await;

    assert_eq!(queue.snapshot(), vec!['x']);
    assert_eq!(
        recorder.calls(),
        vec![SinkCall::Inserted { index: 0, count: 1 }]
    );
}

#[tokio::test]
async fn test_late_sink_sees_only_later_changes() {
    let queue: NotifyQueue<char> = NotifyQueue::new(EqComparator);
    queue.submit(Mutation::append_all(vec!['a', 'b']));
    queue.settled().await;

    let recorder = Arc::new(Recorder::new());
    queue.attach(&recorder);
    queue.submit(Mutation::replace(1, 'z'));
    queue.settled().await;

    assert_eq!(
        recorder.calls(),
        vec![SinkCall::Changed {
            index: 1,
            count: 1,
            with_payload: false,
        }]
    );
}

#[tokio::test]
async fn test_rejection_does_not_stall_later_diffs() {
    let queue: NotifyQueue<char> = NotifyQueue::new(EqComparator);
    let mut events = queue.subscribe();

    queue.submit(Mutation::move_item(0, 3));
    queue.submit(Mutation::refresh(vec!['a']));
    queue.settled().await;

    assert_eq!(queue.snapshot(), vec!['a']);
    assert!(matches!(
        events.try_recv().unwrap(),
        QueueEvent::Rejected { .. }
    ));
    assert!(matches!(
        events.try_recv().unwrap(),
        QueueEvent::Applied { .. }
    ));
}
