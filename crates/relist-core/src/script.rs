//! Primitive change notifications and the scripts that carry them.

use crate::sink::{ChangePayload, ChangeSink};
use std::fmt;

/// A single primitive change notification.
///
/// Indices are valid at the moment the op is dispatched: a script is meant
/// to be replayed in order against a mirror of the sequence as it was when
/// the script was produced.
#[derive(Clone)]
pub enum EditOp {
    /// `count` elements inserted starting at `index`.
    Insert { index: usize, count: usize },
    /// `count` elements removed starting at `index`.
    Remove { index: usize, count: usize },
    /// `count` elements changed in place starting at `index`.
    Change {
        index: usize,
        count: usize,
        payload: Option<ChangePayload>,
    },
    /// One element moved from `from` to `to` (its final position).
    Move { from: usize, to: usize },
}

impl PartialEq for EditOp {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                EditOp::Insert { index: a, count: b },
                EditOp::Insert { index: c, count: d },
            ) => a == c && b == d,
            (
                EditOp::Remove { index: a, count: b },
                EditOp::Remove { index: c, count: d },
            ) => a == c && b == d,
            (
                EditOp::Change {
                    index: a,
                    count: b,
                    payload: p,
                },
                EditOp::Change {
                    index: c,
                    count: d,
                    payload: q,
                },
            ) => a == c && b == d && p.is_some() == q.is_some(),
            (EditOp::Move { from: a, to: b }, EditOp::Move { from: c, to: d }) => {
                a == c && b == d
            }
            _ => false,
        }
    }
}

impl fmt::Debug for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOp::Insert { index, count } => {
                write!(f, "Insert {{ index: {}, count: {} }}", index, count)
            }
            EditOp::Remove { index, count } => {
                write!(f, "Remove {{ index: {}, count: {} }}", index, count)
            }
            EditOp::Change {
                index,
                count,
                payload,
            } => write!(
                f,
                "Change {{ index: {}, count: {}, payload: {} }}",
                index,
                count,
                if payload.is_some() { "yes" } else { "no" }
            ),
            EditOp::Move { from, to } => write!(f, "Move {{ from: {}, to: {} }}", from, to),
        }
    }
}

/// An ordered list of primitive notifications describing one sequence change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditScript {
    ops: Vec<EditOp>,
}

impl EditScript {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// A script holding a single op.
    pub fn from_op(op: EditOp) -> Self {
        Self { ops: vec![op] }
    }

    pub fn from_ops(ops: Vec<EditOp>) -> Self {
        Self { ops }
    }

    pub fn push(&mut self, op: EditOp) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Replay every notification against `sink`, in order.
    pub fn dispatch<S: ChangeSink + ?Sized>(&self, sink: &S) {
        for op in &self.ops {
            match op {
                EditOp::Insert { index, count } => sink.on_inserted(*index, *count),
                EditOp::Remove { index, count } => sink.on_removed(*index, *count),
                EditOp::Change {
                    index,
                    count,
                    payload,
                } => sink.on_changed(*index, *count, payload.as_ref()),
                EditOp::Move { from, to } => sink.on_moved(*from, *to),
            }
        }
    }
}
