//! The asynchronous mutation queue owning an ordered sequence.

use crate::config::QueueConfig;
use parking_lot::RwLock;
use relist_core::compare::ItemComparator;
use relist_core::diff::DiffEngine;
use relist_core::mutation::Mutation;
use relist_core::sink::ChangeSink;
use relist_diff::SliceDiff;
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, mpsc, watch};

/// Events emitted by a queue.
#[derive(Clone, Debug)]
pub enum QueueEvent {
    /// A mutation was applied and its notification dispatched.
    Applied { pending: usize },
    /// A mutation failed validation and was dropped; the queue advanced.
    Rejected { error: String },
}

/// Owns an ordered sequence and applies submitted mutations to it in strict
/// submission order, one at a time.
///
/// All writes to the sequence, and every call into the attached sink, happen
/// on the queue's worker task. Mutations that need a full before/after
/// comparison have it computed on a blocking thread against an independent
/// snapshot, and the next mutation is not touched until the previous one has
/// been fully applied and dispatched, whatever its latency. Reads (`count`,
/// `item`, `snapshot`) are allowed from any thread, including from inside a
/// sink callback.
///
/// Dropping the queue handle closes the channel; the worker finishes what
/// was already submitted and exits.
pub struct NotifyQueue<T> {
    data: Arc<RwLock<Vec<T>>>,
    sink: Arc<RwLock<Option<Weak<dyn ChangeSink>>>>,
    tx: mpsc::UnboundedSender<Mutation<T>>,
    depth: Arc<watch::Sender<usize>>,
    events: broadcast::Sender<QueueEvent>,
}

struct Worker<T> {
    rx: mpsc::UnboundedReceiver<Mutation<T>>,
    data: Arc<RwLock<Vec<T>>>,
    sink: Arc<RwLock<Option<Weak<dyn ChangeSink>>>>,
    cmp: Arc<dyn ItemComparator<T>>,
    engine: Arc<dyn DiffEngine<T>>,
    depth: Arc<watch::Sender<usize>>,
    events: broadcast::Sender<QueueEvent>,
}

impl<T> NotifyQueue<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Queue with the default engine and configuration. Must be called
    /// within a tokio runtime.
    pub fn new(cmp: impl ItemComparator<T> + 'static) -> Self {
        Self::with_config(cmp, QueueConfig::default())
    }

    pub fn with_config(cmp: impl ItemComparator<T> + 'static, config: QueueConfig) -> Self {
        let engine = if config.detect_moves {
            SliceDiff::new()
        } else {
            SliceDiff::without_moves()
        };
        Self::with_engine(cmp, Arc::new(engine), config)
    }

    /// Queue with a caller-provided diff engine.
    pub fn with_engine(
        cmp: impl ItemComparator<T> + 'static,
        engine: Arc<dyn DiffEngine<T>>,
        config: QueueConfig,
    ) -> Self {
        let data = Arc::new(RwLock::new(Vec::new()));
        let sink: Arc<RwLock<Option<Weak<dyn ChangeSink>>>> = Arc::new(RwLock::new(None));
        let (tx, rx) = mpsc::unbounded_channel();
        let (depth, _) = watch::channel(0usize);
        let depth = Arc::new(depth);
        let (events, _) = broadcast::channel(config.event_capacity);

        tokio::spawn(run_worker(Worker {
            rx,
            data: data.clone(),
            sink: sink.clone(),
            cmp: Arc::new(cmp),
            engine,
            depth: depth.clone(),
            events: events.clone(),
        }));

        Self {
            data,
            sink,
            tx,
            depth,
            events,
        }
    }

    /// Queue the next mutation. Never blocks; the mutation is applied once
    /// every earlier submission has fully finished, in submission order.
    pub fn submit(&self, mutation: Mutation<T>) {
        self.depth.send_modify(|d| *d += 1);
        if self.tx.send(mutation).is_err() {
            self.depth.send_modify(|d| *d -= 1);
            tracing::warn!("mutation submitted after queue worker shut down");
        }
    }

    /// Number of elements currently in the sequence.
    pub fn count(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// The element at `index`, if present.
    pub fn item(&self, index: usize) -> Option<T> {
        self.data.read().get(index).cloned()
    }

    /// A copy of the whole sequence.
    pub fn snapshot(&self) -> Vec<T> {
        self.data.read().clone()
    }

    /// Mutations submitted but not yet fully applied.
    pub fn pending(&self) -> usize {
        *self.depth.borrow()
    }

    /// Wait until no mutation is queued or being applied.
    pub async fn settled(&self) {
        let mut rx = self.depth.subscribe();
        while *rx.borrow_and_update() != 0 {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Bind `sink` as the receiver of change notifications. The queue keeps
    /// only a weak reference, so the binding does not keep the sink alive;
    /// the previous binding is replaced and missed notifications are not
    /// replayed.
    pub fn attach<S: ChangeSink + 'static>(&self, sink: &Arc<S>) {
        let sink: Arc<dyn ChangeSink> = sink.clone();
        *self.sink.write() = Some(Arc::downgrade(&sink));
    }

    /// Drop the sink binding. Mutations keep applying; notifications are
    /// discarded until a new sink is attached.
    pub fn detach(&self) {
        *self.sink.write() = None;
    }

    /// Subscribe to queue events.
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.events.subscribe()
    }
}

async fn run_worker<T>(mut worker: Worker<T>)
where
    T: Clone + Send + Sync + 'static,
{
    while let Some(mutation) = worker.rx.recv().await {
        tracing::debug!(?mutation, "processing queued mutation");
        let outcome = if mutation.requires_diff() {
            // The comparison runs against an independent copy so reads and
            // later submissions never race it.
            let snapshot = worker.data.read().clone();
            let cmp = worker.cmp.clone();
            let engine = worker.engine.clone();
            let computed = tokio::task::spawn_blocking(move || {
                let mut mutation = mutation;
                mutation.compute_diff(&snapshot, engine.as_ref(), cmp.as_ref());
                mutation
            })
            .await;
            match computed {
                Ok(mutation) => apply_head(&worker, mutation),
                Err(e) => Err(format!("diff computation failed: {}", e)),
            }
        } else {
            apply_head(&worker, mutation)
        };

        match outcome {
            Ok(()) => {
                let pending = worker.depth.borrow().saturating_sub(1);
                let _ = worker.events.send(QueueEvent::Applied { pending });
            }
            Err(error) => {
                tracing::warn!(%error, "mutation dropped");
                let _ = worker.events.send(QueueEvent::Rejected { error });
            }
        }
        worker.depth.send_modify(|d| *d -= 1);
    }
}

/// Apply one mutation to the authoritative sequence and dispatch its
/// notification. The write lock covers only the sequence edit; the sink is
/// called after it is released.
fn apply_head<T>(worker: &Worker<T>, mutation: Mutation<T>) -> Result<(), String>
where
    T: Clone + Send + Sync + 'static,
{
    let scripted = mutation.requires_diff();
    let applied = {
        let mut items = worker.data.write();
        mutation.apply(&mut items, worker.cmp.as_ref())
    };
    let script = applied.map_err(|e| e.to_string())?;
    if script.is_empty() {
        return Ok(());
    }

    let bound = worker.sink.read().as_ref().and_then(Weak::upgrade);
    if let Some(sink) = bound {
        if scripted {
            sink.on_script(&script);
        } else {
            script.dispatch(sink.as_ref());
        }
    }
    Ok(())
}
