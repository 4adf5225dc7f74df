// Copyright 2025 Cowboy AI, LLC.

//! Identity memos for traversals over possibly cyclic graphs
//!
//! Nodes are keyed by the address of their shared allocation, never by value,
//! so a walk costs at most one visit per distinct node.

use std::collections::HashSet;
use std::rc::Rc;

/// Address of an `Rc` allocation, usable as an identity key
pub(crate) fn identity<T>(rc: &Rc<T>) -> usize {
    Rc::as_ptr(rc) as *const () as usize
}

/// Set of visited node identities
#[derive(Debug, Default)]
pub(crate) struct Visited(HashSet<usize>);

impl Visited {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as visited; false if it already was
    pub(crate) fn insert(&mut self, id: usize) -> bool {
        self.0.insert(id)
    }

    pub(crate) fn contains(&self, id: usize) -> bool {
        self.0.contains(&id)
    }
}

/// Set of visited `(left, right)` identity pairs for coinductive comparison
///
/// A pair already on record is assumed equal; a mismatch anywhere else in
/// the walk still decides the comparison.
#[derive(Debug, Default)]
pub(crate) struct VisitedPairs(HashSet<(usize, usize)>);

impl VisitedPairs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records the pair; false if it was already recorded
    pub(crate) fn insert(&mut self, left: usize, right: usize) -> bool {
        self.0.insert((left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_distinguishes_allocations_not_values() {
        let a = Rc::new(1);
        let b = Rc::new(1);
        assert_ne!(identity(&a), identity(&b));
        assert_eq!(identity(&a), identity(&a.clone()));
    }

    #[test]
    fn test_pairs_are_ordered() {
        let mut pairs = VisitedPairs::new();
        assert!(pairs.insert(1, 2));
        assert!(!pairs.insert(1, 2));
        assert!(pairs.insert(2, 1));
    }

    #[test]
    fn test_visited_reports_first_insert_only() {
        let mut visited = Visited::new();
        assert!(visited.insert(7));
        assert!(!visited.insert(7));
        assert!(visited.contains(7));
    }
}
