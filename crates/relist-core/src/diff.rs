//! The diffing capability consumed by mutations that compare full sequences.

use crate::compare::ItemComparator;
use crate::script::EditScript;

/// Computes an edit script that turns `old` into `new`.
///
/// Implementations must be pure and safe to call from any thread; the queue
/// guarantees that no two computations ever run against the same sequence
/// concurrently. Elements left untouched must not appear in the script.
pub trait DiffEngine<T>: Send + Sync {
    fn diff(&self, old: &[T], new: &[T], cmp: &dyn ItemComparator<T>) -> EditScript;
}
