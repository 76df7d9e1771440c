//! Assignment store: the live partial matching
//!
//! Holds the current matching as an injective map from assigned elements to
//! the predicate each one satisfies, plus the inverse view kept in lockstep.
//! The store is owned by a single resolution and lent by `&mut` to the
//! augmenting-path search; nothing about it outlives that call.

use std::collections::BTreeMap;

use crate::algorithm::traits::{ElementId, PredicateId};

/// Partial injective function `Element → Predicate`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentStore {
    /// `owner[e]` is the predicate element `e` is currently assigned to
    owner: Vec<Option<PredicateId>>,
    /// `holding[p]` is the element currently assigned to predicate `p`
    holding: Vec<Option<ElementId>>,
    /// Number of assigned elements
    assigned: usize,
}

impl AssignmentStore {
    /// Empty matching over `predicate_count` predicates and `element_count` elements
    pub fn new(predicate_count: usize, element_count: usize) -> Self {
        Self {
            owner: vec![None; element_count],
            holding: vec![None; predicate_count],
            assigned: 0,
        }
    }

    /// Assigns `element` to `predicate`, overwriting any prior owner of `element`
    ///
    /// A displaced predicate is not re-homed here; during an augmentation the
    /// caller applies the next swap of the chain, which gives it a new element.
    pub fn assign(&mut self, element: ElementId, predicate: PredicateId) {
        let previous = self.owner[element.0].replace(predicate);
        match previous {
            Some(displaced) if displaced != predicate => {
                if self.holding[displaced.0] == Some(element) {
                    self.holding[displaced.0] = None;
                }
            }
            Some(_) => {}
            None => self.assigned += 1,
        }

        // A predicate moving to a new element releases its old one.
        if let Some(old) = self.holding[predicate.0].replace(element) {
            if old != element && self.owner[old.0] == Some(predicate) {
                self.owner[old.0] = None;
                self.assigned -= 1;
            }
        }
    }

    #[inline]
    pub fn is_assigned(&self, element: ElementId) -> bool {
        self.owner[element.0].is_some()
    }

    /// Predicate currently holding `element`
    #[inline]
    pub fn predicate_of(&self, element: ElementId) -> Option<PredicateId> {
        self.owner[element.0]
    }

    /// Element currently held by `predicate`
    #[inline]
    pub fn element_of(&self, predicate: PredicateId) -> Option<ElementId> {
        self.holding[predicate.0]
    }

    #[inline]
    pub fn is_matched(&self, predicate: PredicateId) -> bool {
        self.holding[predicate.0].is_some()
    }

    /// Number of matched pairs
    #[inline]
    pub fn len(&self) -> usize {
        self.assigned
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assigned == 0
    }

    /// Matched `(predicate, element)` pairs in ascending element order
    pub fn pairs(&self) -> impl Iterator<Item = (PredicateId, ElementId)> + '_ {
        self.owner
            .iter()
            .enumerate()
            .filter_map(|(e, owner)| owner.map(|p| (p, ElementId(e))))
    }

    /// Inverse view: predicate → element
    pub fn as_predicate_to_element_map(&self) -> BTreeMap<PredicateId, ElementId> {
        self.pairs().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_and_lookup() {
        let mut store = AssignmentStore::new(2, 3);
        assert!(store.is_empty());

        store.assign(ElementId(1), PredicateId(0));

        assert!(store.is_assigned(ElementId(1)));
        assert!(!store.is_assigned(ElementId(0)));
        assert_eq!(store.predicate_of(ElementId(1)), Some(PredicateId(0)));
        assert_eq!(store.element_of(PredicateId(0)), Some(ElementId(1)));
        assert!(!store.is_matched(PredicateId(1)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_assign_overwrites_owner() {
        let mut store = AssignmentStore::new(2, 2);
        store.assign(ElementId(0), PredicateId(0));
        store.assign(ElementId(0), PredicateId(1));

        assert_eq!(store.predicate_of(ElementId(0)), Some(PredicateId(1)));
        assert_eq!(store.element_of(PredicateId(0)), None);
        assert_eq!(store.element_of(PredicateId(1)), Some(ElementId(0)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_swap_chain_keeps_both_views_injective() {
        // P0 holds A; P1 wants A, P0 moves to B.
        let mut store = AssignmentStore::new(2, 2);
        store.assign(ElementId(0), PredicateId(0));

        store.assign(ElementId(0), PredicateId(1));
        store.assign(ElementId(1), PredicateId(0));

        assert_eq!(store.len(), 2);
        let map = store.as_predicate_to_element_map();
        assert_eq!(map.get(&PredicateId(0)), Some(&ElementId(1)));
        assert_eq!(map.get(&PredicateId(1)), Some(&ElementId(0)));
    }

    #[test]
    fn test_moving_predicate_releases_old_element() {
        let mut store = AssignmentStore::new(1, 2);
        store.assign(ElementId(0), PredicateId(0));
        store.assign(ElementId(1), PredicateId(0));

        assert!(!store.is_assigned(ElementId(0)));
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.pairs().collect::<Vec<_>>(),
            vec![(PredicateId(0), ElementId(1))]
        );
    }

    #[test]
    fn test_reassigning_same_pair_is_noop() {
        let mut store = AssignmentStore::new(1, 1);
        store.assign(ElementId(0), PredicateId(0));
        store.assign(ElementId(0), PredicateId(0));

        assert_eq!(store.len(), 1);
        assert_eq!(store.element_of(PredicateId(0)), Some(ElementId(0)));
    }
}
