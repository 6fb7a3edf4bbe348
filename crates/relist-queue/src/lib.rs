//! relist-queue - Ordered-sequence mutation queue for renderer updates
//!
//! A [`NotifyQueue`] owns an ordered, in-memory sequence that backs a
//! renderer which only tolerates updates from one context (a virtualized
//! list adapter, a table view). Callers submit [`Mutation`]s from anywhere;
//! the queue applies them strictly in submission order and tells the
//! attached [`ChangeSink`] exactly what changed. Mutations that can
//! describe their own change apply immediately; the ones that need a full
//! before/after comparison (`remove_all`, `update_where`, `refresh`) have
//! it computed on a background thread without ever letting two mutations
//! overlap or reorder.
//!
//! # Quick Start
//!
//! ```rust
//! use relist_queue::{Mutation, NotifyQueue, EqComparator};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let queue: NotifyQueue<&str> = NotifyQueue::new(EqComparator);
//!
//!     queue.submit(Mutation::append_all(vec!["a", "b", "c"]));
//!     queue.submit(Mutation::remove("b"));
//!     queue.submit(Mutation::refresh(vec!["c", "a", "d"]));
//!
//!     queue.settled().await;
//!     assert_eq!(queue.snapshot(), vec!["c", "a", "d"]);
//! }
//! ```
//!
//! # Architecture
//!
//! - [`queue`] - the queue itself: FIFO application, background diffing,
//!   weak sink binding, event stream
//! - [`config`] - queue configuration and builder
//! - the data model (mutations, edit scripts, sinks, comparators) lives in
//!   `relist-core`; the default diff engine in `relist-diff`

pub mod config;
pub mod queue;

// Re-exports for convenience
pub use config::{QueueConfig, QueueConfigBuilder};
pub use queue::{NotifyQueue, QueueEvent};

// Re-export commonly used types from the data-model crates
pub use relist_core::compare::{EqComparator, ItemComparator};
pub use relist_core::diff::DiffEngine;
pub use relist_core::error::ListError;
pub use relist_core::mutation::Mutation;
pub use relist_core::script::{EditOp, EditScript};
pub use relist_core::sink::{ChangePayload, ChangeSink, Recorder, SinkCall};
pub use relist_diff::SliceDiff;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::QueueConfig;
    pub use crate::queue::{NotifyQueue, QueueEvent};
    pub use relist_core::compare::{EqComparator, ItemComparator};
    pub use relist_core::mutation::Mutation;
    pub use relist_core::sink::{ChangeSink, Recorder};
    pub use relist_diff::SliceDiff;
}
