//! Sequence mutations and their application.

use crate::compare::ItemComparator;
use crate::diff::DiffEngine;
use crate::error::{ListError, Result};
use crate::script::{EditOp, EditScript};
use crate::sink::{ChangePayload, ChangeSink};
use std::fmt;

/// What a replacement writes into the slot: a ready value or an in-place
/// update of the current one.
enum Replacement<T> {
    Value(T),
    With(Box<dyn FnOnce(&mut T) + Send>),
}

/// New sequence contents and edit script produced ahead of application.
struct Computed<T> {
    items: Vec<T>,
    script: EditScript,
}

enum Kind<T> {
    Insert {
        index: Option<usize>,
        element: T,
    },
    InsertAll {
        index: Option<usize>,
        elements: Vec<T>,
    },
    RemoveAt {
        index: usize,
        count: usize,
    },
    Remove {
        element: T,
    },
    RemoveAll {
        targets: Vec<T>,
        computed: Option<Computed<T>>,
    },
    Replace {
        index: usize,
        with: Replacement<T>,
        payload: Option<ChangePayload>,
    },
    UpdateWhere {
        filter: Box<dyn Fn(&T) -> bool + Send>,
        update: Box<dyn Fn(&mut T) + Send>,
        computed: Option<Computed<T>>,
    },
    Refresh {
        items: Vec<T>,
        computed: Option<Computed<T>>,
    },
    Move {
        from: usize,
        to: usize,
    },
    Clear,
}

/// One immutable description of a change to an ordered sequence.
///
/// A mutation is constructed, submitted (or applied directly), consumed
/// once, and discarded. Most mutations can describe their own change
/// notification from their parameters alone; `remove_all`, `update_where`
/// and `refresh` need a full before/after comparison first. See
/// [`requires_diff`](Mutation::requires_diff) and
/// [`compute_diff`](Mutation::compute_diff).
pub struct Mutation<T> {
    kind: Kind<T>,
}

impl<T> Mutation<T> {
    /// Append one element at the end of the sequence.
    pub fn append(element: T) -> Self {
        Self {
            kind: Kind::Insert {
                index: None,
                element,
            },
        }
    }

    /// Insert one element at `index`.
    pub fn insert(index: usize, element: T) -> Self {
        Self {
            kind: Kind::Insert {
                index: Some(index),
                element,
            },
        }
    }

    /// Append several elements at the end of the sequence.
    pub fn append_all(elements: Vec<T>) -> Self {
        Self {
            kind: Kind::InsertAll {
                index: None,
                elements,
            },
        }
    }

    /// Insert several elements starting at `index`.
    pub fn insert_all(index: usize, elements: Vec<T>) -> Self {
        Self {
            kind: Kind::InsertAll {
                index: Some(index),
                elements,
            },
        }
    }

    /// Remove the element at `index`.
    pub fn remove_at(index: usize) -> Self {
        Self {
            kind: Kind::RemoveAt { index, count: 1 },
        }
    }

    /// Remove `count` elements starting at `index`.
    pub fn remove_range(index: usize, count: usize) -> Self {
        Self {
            kind: Kind::RemoveAt { index, count },
        }
    }

    /// Remove the first element that is the same logical item as `element`.
    /// Removing a value that is not present is a no-op.
    pub fn remove(element: T) -> Self {
        Self {
            kind: Kind::Remove { element },
        }
    }

    /// Remove every element matching one of `targets`.
    pub fn remove_all(targets: Vec<T>) -> Self {
        Self {
            kind: Kind::RemoveAll {
                targets,
                computed: None,
            },
        }
    }

    /// Replace the element at `index` with `element`.
    pub fn replace(index: usize, element: T) -> Self {
        Self {
            kind: Kind::Replace {
                index,
                with: Replacement::Value(element),
                payload: None,
            },
        }
    }

    /// Update the element at `index` in place.
    pub fn update_at(index: usize, update: impl FnOnce(&mut T) + Send + 'static) -> Self {
        Self {
            kind: Kind::Replace {
                index,
                with: Replacement::With(Box::new(update)),
                payload: None,
            },
        }
    }

    /// Attach an opaque payload forwarded with the change notification.
    /// Only meaningful for `replace` and `update_at`.
    pub fn with_payload(mut self, payload: ChangePayload) -> Self {
        if let Kind::Replace { payload: slot, .. } = &mut self.kind {
            *slot = Some(payload);
        }
        self
    }

    /// Update, in place, every element accepted by `filter`.
    pub fn update_where(
        filter: impl Fn(&T) -> bool + Send + 'static,
        update: impl Fn(&mut T) + Send + 'static,
    ) -> Self {
        Self {
            kind: Kind::UpdateWhere {
                filter: Box::new(filter),
                update: Box::new(update),
                computed: None,
            },
        }
    }

    /// Replace the whole sequence with `items`.
    pub fn refresh(items: Vec<T>) -> Self {
        Self {
            kind: Kind::Refresh {
                items,
                computed: None,
            },
        }
    }

    /// Move the element at `from` to position `to`.
    pub fn move_item(from: usize, to: usize) -> Self {
        Self {
            kind: Kind::Move { from, to },
        }
    }

    /// Remove every element.
    pub fn clear() -> Self {
        Self { kind: Kind::Clear }
    }

    /// Whether this mutation needs a full sequence comparison before it can
    /// describe its change to a sink.
    pub fn requires_diff(&self) -> bool {
        matches!(
            self.kind,
            Kind::RemoveAll { .. } | Kind::UpdateWhere { .. } | Kind::Refresh { .. }
        )
    }

    /// Apply to `items`, returning the change description for a renderer.
    ///
    /// Mutations for which [`requires_diff`](Self::requires_diff) is true
    /// must have had [`compute_diff`](Self::compute_diff) run first; they
    /// fail with [`ListError::DiffMissing`] otherwise. A failing mutation
    /// leaves `items` untouched.
    pub fn apply(self, items: &mut Vec<T>, cmp: &dyn ItemComparator<T>) -> Result<EditScript> {
        match self.kind {
            Kind::Insert { index, element } => {
                let at = index.unwrap_or(items.len());
                if at > items.len() {
                    return Err(ListError::IndexOutOfBounds {
                        index: at,
                        len: items.len(),
                    });
                }
                items.insert(at, element);
                Ok(EditScript::from_op(EditOp::Insert {
                    index: at,
                    count: 1,
                }))
            }
            Kind::InsertAll { index, elements } => {
                let at = index.unwrap_or(items.len());
                if at > items.len() {
                    return Err(ListError::IndexOutOfBounds {
                        index: at,
                        len: items.len(),
                    });
                }
                if elements.is_empty() {
                    return Ok(EditScript::new());
                }
                let count = elements.len();
                let tail = items.split_off(at);
                items.extend(elements);
                items.extend(tail);
                Ok(EditScript::from_op(EditOp::Insert { index: at, count }))
            }
            Kind::RemoveAt { index, count } => {
                if index.saturating_add(count) > items.len() {
                    return Err(ListError::IndexOutOfBounds {
                        index,
                        len: items.len(),
                    });
                }
                if count == 0 {
                    return Ok(EditScript::new());
                }
                items.drain(index..index + count);
                Ok(EditScript::from_op(EditOp::Remove { index, count }))
            }
            Kind::Remove { element } => {
                match items.iter().position(|x| cmp.same_item(x, &element)) {
                    Some(index) => {
                        items.remove(index);
                        Ok(EditScript::from_op(EditOp::Remove { index, count: 1 }))
                    }
                    None => Ok(EditScript::new()),
                }
            }
            Kind::Replace {
                index,
                with,
                payload,
            } => {
                if index >= items.len() {
                    return Err(ListError::IndexOutOfBounds {
                        index,
                        len: items.len(),
                    });
                }
                match with {
                    Replacement::Value(value) => items[index] = value,
                    Replacement::With(update) => update(&mut items[index]),
                }
                Ok(EditScript::from_op(EditOp::Change {
                    index,
                    count: 1,
                    payload,
                }))
            }
            Kind::Move { from, to } => {
                let len = items.len();
                if from >= len {
                    return Err(ListError::IndexOutOfBounds { index: from, len });
                }
                if to >= len {
                    return Err(ListError::IndexOutOfBounds { index: to, len });
                }
                if from == to {
                    return Ok(EditScript::new());
                }
                let element = items.remove(from);
                items.insert(to, element);
                Ok(EditScript::from_op(EditOp::Move { from, to }))
            }
            Kind::Clear => {
                if items.is_empty() {
                    return Ok(EditScript::new());
                }
                let count = items.len();
                items.clear();
                Ok(EditScript::from_op(EditOp::Remove { index: 0, count }))
            }
            Kind::RemoveAll { computed, .. }
            | Kind::UpdateWhere { computed, .. }
            | Kind::Refresh { computed, .. } => {
                let Computed {
                    items: next,
                    script,
                } = computed.ok_or(ListError::DiffMissing)?;
                *items = next;
                Ok(script)
            }
        }
    }

    /// Apply to `items` and dispatch the resulting notification to `sink`.
    ///
    /// Changes that went through [`compute_diff`](Self::compute_diff) arrive
    /// at the sink as one script; the rest as individual primitive calls.
    /// Degenerate changes (for example removing an absent value) dispatch
    /// nothing.
    pub fn apply_and_notify(
        self,
        items: &mut Vec<T>,
        cmp: &dyn ItemComparator<T>,
        sink: &dyn ChangeSink,
    ) -> Result<()> {
        let scripted = self.requires_diff();
        let script = self.apply(items, cmp)?;
        if script.is_empty() {
            return Ok(());
        }
        if scripted {
            sink.on_script(&script);
        } else {
            script.dispatch(sink);
        }
        Ok(())
    }

    /// Apply to `items` without producing any notification.
    ///
    /// Works for every variant with no prior diff; meant for bulk loads and
    /// offline replays where no renderer is listening.
    pub fn apply_direct(self, items: &mut Vec<T>, cmp: &dyn ItemComparator<T>) -> Result<()> {
        match self.kind {
            Kind::RemoveAll { targets, .. } => {
                items.retain(|x| !targets.iter().any(|t| cmp.same_item(x, t)));
                Ok(())
            }
            Kind::UpdateWhere { filter, update, .. } => {
                for item in items.iter_mut() {
                    if filter(item) {
                        update(item);
                    }
                }
                Ok(())
            }
            Kind::Refresh { items: next, .. } => {
                *items = next;
                Ok(())
            }
            kind => Mutation { kind }.apply(items, cmp).map(|_| ()),
        }
    }
}

impl<T: Clone> Mutation<T> {
    /// For mutations that need one, materialize the new sequence and its
    /// edit script against `current`. The queue runs this on a background
    /// thread; a second call, or a call on a mutation that describes
    /// itself, is a no-op.
    pub fn compute_diff(
        &mut self,
        current: &[T],
        engine: &dyn DiffEngine<T>,
        cmp: &dyn ItemComparator<T>,
    ) {
        match &mut self.kind {
            Kind::RemoveAll {
                computed: Some(_), ..
            }
            | Kind::UpdateWhere {
                computed: Some(_), ..
            }
            | Kind::Refresh {
                computed: Some(_), ..
            } => {}
            Kind::RemoveAll { targets, computed } => {
                let next: Vec<T> = current
                    .iter()
                    .filter(|x| !targets.iter().any(|t| cmp.same_item(x, t)))
                    .cloned()
                    .collect();
                let script = engine.diff(current, &next, cmp);
                *computed = Some(Computed {
                    items: next,
                    script,
                });
            }
            Kind::UpdateWhere {
                filter,
                update,
                computed,
            } => {
                let mut next = current.to_vec();
                for item in next.iter_mut() {
                    if filter(item) {
                        update(item);
                    }
                }
                let script = engine.diff(current, &next, cmp);
                *computed = Some(Computed {
                    items: next,
                    script,
                });
            }
            Kind::Refresh { items, computed } => {
                let next = std::mem::take(items);
                let script = engine.diff(current, &next, cmp);
                *computed = Some(Computed {
                    items: next,
                    script,
                });
            }
            _ => {}
        }
    }
}

impl<T> fmt::Debug for Mutation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Insert { index, .. } => write!(f, "Insert {{ index: {:?} }}", index),
            Kind::InsertAll { index, elements } => write!(
                f,
                "InsertAll {{ index: {:?}, count: {} }}",
                index,
                elements.len()
            ),
            Kind::RemoveAt { index, count } => {
                write!(f, "RemoveAt {{ index: {}, count: {} }}", index, count)
            }
            Kind::Remove { .. } => write!(f, "Remove"),
            Kind::RemoveAll { targets, .. } => {
                write!(f, "RemoveAll {{ count: {} }}", targets.len())
            }
            Kind::Replace { index, .. } => write!(f, "Replace {{ index: {} }}", index),
            Kind::UpdateWhere { .. } => write!(f, "UpdateWhere"),
            Kind::Refresh { items, .. } => write!(f, "Refresh {{ count: {} }}", items.len()),
            Kind::Move { from, to } => write!(f, "Move {{ from: {}, to: {} }}", from, to),
            Kind::Clear => write!(f, "Clear"),
        }
    }
}
