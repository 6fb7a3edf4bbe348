//! Default diff engine for the relist notify queue.
//!
//! [`SliceDiff`] compares two ordered sequences under an
//! [`ItemComparator`] and produces an [`EditScript`] of coalesced
//! insert/remove/change ranges plus (optionally) moves. The approach:
//! match every target element to the first unmatched source element with
//! the same identity, then walk the target once, pulling each matched
//! element into place in a working copy of the source. Script indices are
//! therefore valid at the moment each op is dispatched.
//!
//! Quadratic in the worst case; intended for renderer-sized lists, not
//! bulk data.

use relist_core::compare::ItemComparator;
use relist_core::diff::DiffEngine;
use relist_core::script::{EditOp, EditScript};

/// Edit-script accumulator that coalesces adjacent ranges.
#[derive(Default)]
struct Builder {
    ops: Vec<EditOp>,
}

impl Builder {
    fn inserted(&mut self, index: usize) {
        if let Some(EditOp::Insert { index: at, count }) = self.ops.last_mut() {
            if index == *at + *count {
                *count += 1;
                return;
            }
        }
        self.ops.push(EditOp::Insert { index, count: 1 });
    }

    fn removed(&mut self, index: usize) {
        if let Some(EditOp::Remove { index: at, count }) = self.ops.last_mut() {
            if index == *at {
                *count += 1;
                return;
            }
        }
        self.ops.push(EditOp::Remove { index, count: 1 });
    }

    fn changed(&mut self, index: usize) {
        if let Some(EditOp::Change {
            index: at, count, ..
        }) = self.ops.last_mut()
        {
            if index == *at + *count {
                *count += 1;
                return;
            }
        }
        self.ops.push(EditOp::Change {
            index,
            count: 1,
            payload: None,
        });
    }

    fn moved(&mut self, from: usize, to: usize) {
        self.ops.push(EditOp::Move { from, to });
    }

    fn finish(self) -> EditScript {
        EditScript::from_ops(self.ops)
    }
}

/// Diff engine over slices with optional move detection.
#[derive(Clone, Copy, Debug)]
pub struct SliceDiff {
    detect_moves: bool,
}

impl SliceDiff {
    /// Engine that reports reordered elements as moves.
    pub fn new() -> Self {
        Self { detect_moves: true }
    }

    /// Engine that expresses a reordered element as remove + insert.
    /// Some renderers animate large numbers of moves poorly.
    pub fn without_moves() -> Self {
        Self {
            detect_moves: false,
        }
    }

    pub fn detects_moves(&self) -> bool {
        self.detect_moves
    }
}

impl Default for SliceDiff {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DiffEngine<T> for SliceDiff {
    fn diff(&self, old: &[T], new: &[T], cmp: &dyn ItemComparator<T>) -> EditScript {
        // Pair every target element with the first unmatched source element
        // of the same identity. Unpaired source elements get removed,
        // unpaired target elements get inserted.
        let mut paired = vec![false; old.len()];
        let mut source_for: Vec<Option<usize>> = Vec::with_capacity(new.len());
        for item in new {
            let mut hit = None;
            for (oi, candidate) in old.iter().enumerate() {
                if !paired[oi] && cmp.same_item(candidate, item) {
                    hit = Some(oi);
                    paired[oi] = true;
                    break;
                }
            }
            source_for.push(hit);
        }

        // Walk the target, transforming a working copy of the source. Each
        // slot holds the source index it came from, or None for a fresh
        // insertion.
        let mut work: Vec<Option<usize>> = (0..old.len()).map(Some).collect();
        let mut script = Builder::default();
        for (i, item) in new.iter().enumerate() {
            // Unpaired occupants blocking this position go first.
            while let Some(&Some(oi)) = work.get(i) {
                if paired[oi] {
                    break;
                }
                work.remove(i);
                script.removed(i);
            }
            match source_for[i] {
                None => {
                    work.insert(i, None);
                    script.inserted(i);
                }
                Some(oi) => {
                    let at = work
                        .iter()
                        .position(|slot| *slot == Some(oi))
                        .expect("paired element still in working copy");
                    if at == i {
                        if !cmp.same_content(&old[oi], item) {
                            script.changed(i);
                        }
                    } else if self.detect_moves {
                        let slot = work.remove(at);
                        work.insert(i, slot);
                        script.moved(at, i);
                        if !cmp.same_content(&old[oi], item) {
                            script.changed(i);
                        }
                    } else {
                        work.remove(at);
                        script.removed(at);
                        work.insert(i, None);
                        script.inserted(i);
                    }
                }
            }
        }

        // Everything left past the end of the target goes.
        while work.len() > new.len() {
            work.remove(new.len());
            script.removed(new.len());
        }

        script.finish()
    }
}
