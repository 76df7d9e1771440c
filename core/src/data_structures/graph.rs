//! Bipartite graph between predicates and elements
//!
//! The graph is the static input of the matching: for every predicate index
//! it stores the ordered list of element indices that predicate accepts.
//! It is computed once per resolution and never mutated afterward.
//!
//! # Theoretical Foundation
//! `G = (P, E, Edges)` with `Edges ⊆ P × E`. Construction probes every pair
//! exactly once, `O(P·E)` predicate evaluations, which is unavoidable since
//! any element may satisfy any predicate.

use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{AlgorithmError, ElementId, Predicate, PredicateId};

/// Adjacency structure: predicate → accepted elements, ascending element order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BipartiteGraph {
    /// `adjacency[p]` lists the elements predicate `p` accepts
    adjacency: Vec<Vec<ElementId>>,
    /// Number of elements on the right-hand side
    element_count: usize,
}

impl BipartiteGraph {
    /// Evaluates every predicate against every element, in order
    pub fn build<T, P>(predicates: &[P], elements: &[T]) -> Self
    where
        P: Predicate<T>,
    {
        let adjacency = predicates
            .iter()
            .map(|predicate| Self::probe(predicate, elements))
            .collect();

        Self {
            adjacency,
            element_count: elements.len(),
        }
    }

    /// Same graph as [`BipartiteGraph::build`], with predicates probed on the rayon pool
    ///
    /// Each predicate's row is still evaluated in element order, so the
    /// result is identical to the sequential build.
    pub fn build_parallel<T, P>(predicates: &[P], elements: &[T]) -> Self
    where
        T: Sync,
        P: Predicate<T> + Sync,
    {
        let adjacency = predicates
            .par_iter()
            .map(|predicate| Self::probe(predicate, elements))
            .collect();

        Self {
            adjacency,
            element_count: elements.len(),
        }
    }

    fn probe<T, P>(predicate: &P, elements: &[T]) -> Vec<ElementId>
    where
        P: Predicate<T>,
    {
        elements
            .iter()
            .enumerate()
            .filter(|(_, element)| predicate.accepts(element))
            .map(|(index, _)| ElementId(index))
            .collect()
    }

    /// Builds a graph from an explicit edge list
    ///
    /// Duplicate edges collapse; adjacency lists come out in ascending
    /// element order regardless of input order.
    pub fn from_edges<I>(
        predicate_count: usize,
        element_count: usize,
        edges: I,
    ) -> Result<Self, AlgorithmError>
    where
        I: IntoIterator<Item = (PredicateId, ElementId)>,
    {
        let mut rows = vec![BTreeSet::new(); predicate_count];

        for (predicate, element) in edges {
            if predicate.0 >= predicate_count || element.0 >= element_count {
                return Err(AlgorithmError::InvalidEdge { predicate, element });
            }
            rows[predicate.0].insert(element);
        }

        Ok(Self {
            adjacency: rows.into_iter().map(|row| row.into_iter().collect()).collect(),
            element_count,
        })
    }

    #[inline]
    pub fn predicate_count(&self) -> usize {
        self.adjacency.len()
    }

    #[inline]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Number of predicate evaluations needed to build this graph
    pub fn evaluations(&self) -> usize {
        self.predicate_count() * self.element_count
    }

    /// Elements accepted by `predicate`, in ascending order
    #[inline]
    pub fn candidates(&self, predicate: PredicateId) -> &[ElementId] {
        &self.adjacency[predicate.0]
    }

    pub fn accepts(&self, predicate: PredicateId, element: ElementId) -> bool {
        self.adjacency
            .get(predicate.0)
            .map_or(false, |row| row.binary_search(&element).is_ok())
    }

    pub fn predicates(&self) -> impl Iterator<Item = PredicateId> + '_ {
        (0..self.predicate_count()).map(PredicateId)
    }

    pub fn edges(&self) -> impl Iterator<Item = (PredicateId, ElementId)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(p, row)| row.iter().map(move |&e| (PredicateId(p), e)))
    }

    /// Predicates with an empty adjacency list; these can never be matched
    pub fn predicates_without_candidates(&self) -> Vec<PredicateId> {
        self.predicates()
            .filter(|&p| self.candidates(p).is_empty())
            .collect()
    }

    /// Elements that no predicate accepts
    pub fn elements_without_candidates(&self) -> Vec<ElementId> {
        let mut covered = vec![false; self.element_count];
        for (_, element) in self.edges() {
            covered[element.0] = true;
        }

        covered
            .iter()
            .enumerate()
            .filter(|(_, &hit)| !hit)
            .map(|(index, _)| ElementId(index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_probes_in_order() {
        let elements = [1, 2, 3];
        let predicates: Vec<Box<dyn Fn(&i32) -> bool + Sync>> = vec![
            Box::new(|x: &i32| *x > 0),
            Box::new(|x: &i32| *x > 1),
            Box::new(|x: &i32| *x > 2),
        ];

        let graph = BipartiteGraph::build(&predicates, &elements);

        assert_eq!(graph.predicate_count(), 3);
        assert_eq!(graph.element_count(), 3);
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(graph.evaluations(), 9);
        assert_eq!(graph.candidates(PredicateId(0)), &[ElementId(0), ElementId(1), ElementId(2)]);
        assert_eq!(graph.candidates(PredicateId(2)), &[ElementId(2)]);
        assert!(graph.accepts(PredicateId(1), ElementId(1)));
        assert!(!graph.accepts(PredicateId(1), ElementId(0)));
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let elements: Vec<i32> = (0..40).collect();
        let predicates: Vec<Box<dyn Fn(&i32) -> bool + Sync>> = (1..9)
            .map(|k| Box::new(move |x: &i32| x % k == 0) as Box<dyn Fn(&i32) -> bool + Sync>)
            .collect();

        assert_eq!(
            BipartiteGraph::build(&predicates, &elements),
            BipartiteGraph::build_parallel(&predicates, &elements)
        );
    }

    #[test]
    fn test_empty_adjacency_is_valid() {
        let elements = [1, 2];
        let predicates: [fn(&i32) -> bool; 2] = [|x| *x > 5, |x| *x > 5];

        let graph = BipartiteGraph::build(&predicates, &elements);

        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.predicates_without_candidates(), vec![PredicateId(0), PredicateId(1)]);
        assert_eq!(graph.elements_without_candidates(), vec![ElementId(0), ElementId(1)]);
    }

    #[test]
    fn test_zero_sided_graphs() {
        let no_elements: [i32; 0] = [];
        let predicates = [|_: &i32| true];
        let graph = BipartiteGraph::build(&predicates, &no_elements);
        assert_eq!(graph.predicate_count(), 1);
        assert_eq!(graph.element_count(), 0);
        assert!(graph.candidates(PredicateId(0)).is_empty());

        let no_predicates: [fn(&i32) -> bool; 0] = [];
        let graph = BipartiteGraph::build(&no_predicates, &[7, 8]);
        assert_eq!(graph.predicate_count(), 0);
        assert_eq!(graph.elements_without_candidates().len(), 2);
    }

    #[test]
    fn test_from_edges_sorts_and_deduplicates() {
        let graph = BipartiteGraph::from_edges(
            2,
            3,
            [
                (PredicateId(0), ElementId(2)),
                (PredicateId(0), ElementId(0)),
                (PredicateId(0), ElementId(2)),
                (PredicateId(1), ElementId(1)),
            ],
        )
        .unwrap();

        assert_eq!(graph.candidates(PredicateId(0)), &[ElementId(0), ElementId(2)]);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(
            graph.edges().collect::<Vec<_>>(),
            vec![
                (PredicateId(0), ElementId(0)),
                (PredicateId(0), ElementId(2)),
                (PredicateId(1), ElementId(1)),
            ]
        );
    }

    #[test]
    fn test_from_edges_rejects_out_of_range() {
        let err = BipartiteGraph::from_edges(1, 1, [(PredicateId(0), ElementId(1))]).unwrap_err();
        assert_eq!(
            err,
            AlgorithmError::InvalidEdge { predicate: PredicateId(0), element: ElementId(1) }
        );

        assert!(BipartiteGraph::from_edges(1, 1, [(PredicateId(1), ElementId(0))]).is_err());
    }
}
