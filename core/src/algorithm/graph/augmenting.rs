//! Breadth-first augmenting-path search
//!
//! Given a predicate that currently holds no element, the search explores
//! alternating layers of the bipartite graph: predicate → accepted element →
//! the predicate already holding that element → another accepted element, and
//! so on, until it reaches an element nobody holds. The swaps along that path
//! grow the matching by exactly one.
//!
//! # Mathematical Foundation
//! This is the augmenting step of Kuhn's algorithm, explored breadth-first.
//! Every element is visited at most once per search, so a single call costs
//! `O(E + Σ deg)`. By Berge's lemma a matching is maximum iff no augmenting
//! path exists from any unmatched predicate.

use std::collections::{HashMap, VecDeque};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{ElementId, PredicateId};
use crate::data_structures::assignment::AssignmentStore;
use crate::data_structures::graph::BipartiteGraph;
use crate::execution::tracer::{ExecutionTracer, TraceEvent};

/// Ordered chain of reassignments realizing one augmentation
///
/// The first swap gives the search target its element; every later swap
/// re-homes the predicate displaced by the swap before it. The last swap
/// claims a previously free element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentingPath {
    swaps: Vec<(PredicateId, ElementId)>,
}

impl AugmentingPath {
    pub fn swaps(&self) -> &[(PredicateId, ElementId)] {
        &self.swaps
    }

    /// Number of swaps
    pub fn len(&self) -> usize {
        self.swaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swaps.is_empty()
    }

    /// Predicate the search started from
    pub fn target(&self) -> Option<PredicateId> {
        self.swaps.first().map(|&(p, _)| p)
    }

    /// Free element claimed at the end of the path
    pub fn endpoint(&self) -> Option<ElementId> {
        self.swaps.last().map(|&(_, e)| e)
    }

    /// Applies every swap in order
    pub fn apply(&self, store: &mut AssignmentStore) {
        for &(predicate, element) in &self.swaps {
            store.assign(element, predicate);
        }
    }
}

/// Search counters accumulated across calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStatistics {
    pub searches: usize,
    pub paths_found: usize,
    pub elements_visited: usize,
    pub predicates_enqueued: usize,
    pub longest_path: usize,
}

/// Reusable breadth-first search over one bipartite graph
#[derive(Debug)]
pub struct AugmentingPathSearch<'g> {
    graph: &'g BipartiteGraph,
    visited: Vec<bool>,
    queue: VecDeque<PredicateId>,
    /// Displaced predicate → (element it loses, predicate that takes it)
    came_from: HashMap<PredicateId, (ElementId, PredicateId)>,
    statistics: PathStatistics,
}

impl<'g> AugmentingPathSearch<'g> {
    pub fn new(graph: &'g BipartiteGraph) -> Self {
        Self {
            graph,
            visited: vec![false; graph.element_count()],
            queue: VecDeque::new(),
            came_from: HashMap::new(),
            statistics: PathStatistics::default(),
        }
    }

    pub fn statistics(&self) -> &PathStatistics {
        &self.statistics
    }

    /// Finds an augmenting path from `target`, which must hold no element
    ///
    /// Returns `None` when every element reachable by alternating paths is
    /// already held; at that point `target` can never be matched by a later
    /// augmentation either.
    pub fn find(
        &mut self,
        store: &AssignmentStore,
        target: PredicateId,
        mut tracer: Option<&mut ExecutionTracer>,
    ) -> Option<AugmentingPath> {
        debug_assert!(!store.is_matched(target), "{target} already holds an element");

        self.statistics.searches += 1;
        self.visited.iter_mut().for_each(|v| *v = false);
        self.queue.clear();
        self.came_from.clear();
        record(&mut tracer, target, TraceEvent::SearchStarted);

        let graph = self.graph;
        self.queue.push_back(target);
        let mut elements_visited = 0;

        while let Some(predicate) = self.queue.pop_front() {
            for &element in graph.candidates(predicate) {
                if self.visited[element.0] {
                    continue;
                }
                self.visited[element.0] = true;
                elements_visited += 1;
                record(&mut tracer, target, TraceEvent::ElementVisited { predicate, element });

                match store.predicate_of(element) {
                    None => {
                        self.statistics.elements_visited += elements_visited;
                        let path = self.reconstruct(target, predicate, element)?;

                        self.statistics.paths_found += 1;
                        self.statistics.longest_path = self.statistics.longest_path.max(path.len());
                        record(
                            &mut tracer,
                            target,
                            TraceEvent::PathFound { element, length: path.len() },
                        );
                        trace!(
                            "{target}: augmenting path of {} swap(s) ends at {element}",
                            path.len()
                        );
                        return Some(path);
                    }
                    Some(holder) => {
                        self.came_from.insert(holder, (element, predicate));
                        self.queue.push_back(holder);
                        self.statistics.predicates_enqueued += 1;
                        record(
                            &mut tracer,
                            target,
                            TraceEvent::ElementDisplaced { element, from: holder, to: predicate },
                        );
                    }
                }
            }
        }

        self.statistics.elements_visited += elements_visited;
        record(&mut tracer, target, TraceEvent::SearchExhausted { elements_visited });
        trace!("{target}: no augmenting path after visiting {elements_visited} element(s)");
        None
    }

    /// Walks the back-pointers from the predicate that reached the free element to `target`
    fn reconstruct(
        &self,
        target: PredicateId,
        last: PredicateId,
        free: ElementId,
    ) -> Option<AugmentingPath> {
        let mut swaps = vec![(last, free)];
        let mut current = last;

        while current != target {
            let &(element, taker) = self.came_from.get(&current)?;
            swaps.push((taker, element));
            current = taker;
        }

        swaps.reverse();
        Some(AugmentingPath { swaps })
    }
}

fn record(tracer: &mut Option<&mut ExecutionTracer>, target: PredicateId, event: TraceEvent) {
    if let Some(tracer) = tracer.as_deref_mut() {
        tracer.record(target, event);
    }
}
