//! Core data model for the relist notify queue: sequence mutations, the
//! edit scripts that describe them, and the sink/comparator/diff-engine
//! traits the queue is wired together with.

pub mod compare;
pub mod diff;
pub mod error;
pub mod mutation;
pub mod script;
pub mod sink;
