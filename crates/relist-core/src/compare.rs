//! Element comparison predicates used for diffing and value lookups.

/// Decides identity and content equality between two elements.
///
/// `same_item` answers whether two values denote the same logical item
/// (it controls move/keep versus remove/insert decisions when diffing);
/// `same_content` is only consulted once identity matches and decides
/// whether a change notification is needed.
pub trait ItemComparator<T>: Send + Sync {
    fn same_item(&self, a: &T, b: &T) -> bool;
    fn same_content(&self, a: &T, b: &T) -> bool;
}

/// Comparator for element types where plain equality answers both questions.
#[derive(Clone, Copy, Debug, Default)]
pub struct EqComparator;

impl<T: PartialEq> ItemComparator<T> for EqComparator {
    fn same_item(&self, a: &T, b: &T) -> bool {
        a == b
    }

    fn same_content(&self, a: &T, b: &T) -> bool {
        a == b
    }
}
