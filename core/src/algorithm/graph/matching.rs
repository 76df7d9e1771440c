//! Maximum bipartite matching between predicates and elements
//!
//! The orchestrator drives Kuhn's algorithm over a prebuilt
//! [`BipartiteGraph`]: predicates are attempted one at a time, each attempt
//! runs a breadth-first augmenting-path search against the live
//! [`AssignmentStore`], and a found path is applied immediately.
//!
//! # Mathematical Foundation
//! Each successful search grows the matching by exactly one. A predicate
//! whose search fails can never be matched by a later augmentation: the
//! alternating tree rooted at it only ever loses free elements. So the
//! result after one pass is a maximum matching (König), and its size is
//! independent of the order predicates are attempted in.
//!
//! # Complexity
//! One search is `O(E + Σ deg)`; one pass is `O(P·(E + |Edges|))`.

use std::collections::BTreeSet;

use log::debug;

use crate::algorithm::graph::augmenting::AugmentingPathSearch;
use crate::algorithm::graph::outcome::{MatchingOutcome, MatchingStatistics};
use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmId, AlgorithmParameter, Predicate,
};
use crate::config::ResolverConfig;
use crate::data_structures::assignment::AssignmentStore;
use crate::data_structures::graph::BipartiteGraph;
use crate::execution::tracer::ExecutionTracer;

// ═══════════════════════════════════════════════════════════════════════════════════════
// ORCHESTRATOR
// ═══════════════════════════════════════════════════════════════════════════════════════

/// Breadth-first augmenting-path matcher
///
/// Holds configuration only. Every resolution allocates its own assignment
/// store and search buffers and drops them on return, so one resolver can
/// be reused across unrelated graphs.
#[derive(Debug, Clone, Default)]
pub struct AssignmentResolver {
    config: ResolverConfig,
}

impl AssignmentResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Builds the graph for `predicates × elements`, in parallel when configured
    pub fn build_graph<T, P>(&self, predicates: &[P], elements: &[T]) -> BipartiteGraph
    where
        T: Sync,
        P: Predicate<T> + Sync,
    {
        if self.config.parallel_evaluation {
            BipartiteGraph::build_parallel(predicates, elements)
        } else {
            BipartiteGraph::build(predicates, elements)
        }
    }

    /// Computes a maximum matching and the predicates it leaves unmatched
    ///
    /// Predicates are attempted in the configured order. A predicate whose
    /// search fails is recorded as unmatched for good.
    pub fn find_best_matching(
        &self,
        graph: &BipartiteGraph,
        mut tracer: Option<&mut ExecutionTracer>,
    ) -> MatchingOutcome {
        debug!(
            "resolving {} predicate(s) against {} element(s) over {} edge(s), order={}",
            graph.predicate_count(),
            graph.element_count(),
            graph.edge_count(),
            self.config.predicate_order
        );

        let mut store = AssignmentStore::new(graph.predicate_count(), graph.element_count());
        let mut search = AugmentingPathSearch::new(graph);
        let mut unmatched = BTreeSet::new();
        let mut augmentations = 0;

        for predicate in self.config.predicate_order.arrange(graph) {
            match search.find(&store, predicate, tracer.as_deref_mut()) {
                Some(path) => {
                    path.apply(&mut store);
                    augmentations += 1;
                }
                None => {
                    unmatched.insert(predicate);
                }
            }
        }

        let path_statistics = search.statistics();
        let statistics = MatchingStatistics {
            predicate_evaluations: graph.evaluations(),
            path_searches: path_statistics.searches,
            augmentations,
            elements_visited: path_statistics.elements_visited,
            predicates_enqueued: path_statistics.predicates_enqueued,
            longest_augmenting_path: path_statistics.longest_path,
        };

        debug!(
            "matched {} pair(s), {} predicate(s) unmatched after {} search(es)",
            store.len(),
            unmatched.len(),
            statistics.path_searches
        );

        MatchingOutcome::new(
            store.as_predicate_to_element_map(),
            unmatched,
            graph.predicate_count(),
            graph.element_count(),
            statistics,
        )
    }
}

/// Checks that no unmatched predicate of `outcome` has an augmenting path
///
/// Rebuilds the assignment store from the reported pairing and re-runs the
/// search for every unmatched predicate. Also rejects pairings that use an
/// edge missing from `graph` or pair an element twice.
pub fn is_maximum(graph: &BipartiteGraph, outcome: &MatchingOutcome) -> bool {
    let mut store = AssignmentStore::new(graph.predicate_count(), graph.element_count());

    for (&predicate, &element) in outcome.pairing() {
        if !graph.accepts(predicate, element) || store.is_assigned(element) {
            return false;
        }
        store.assign(element, predicate);
    }

    let mut search = AugmentingPathSearch::new(graph);
    graph
        .predicates()
        .filter(|&p| !store.is_matched(p))
        .all(|p| search.find(&store, p, None).is_none())
}

// ═══════════════════════════════════════════════════════════════════════════════════════
// ALGORITHM TRAIT IMPLEMENTATION
// ═══════════════════════════════════════════════════════════════════════════════════════

impl Algorithm for AssignmentResolver {
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new("augmenting_bfs")
    }

    fn name(&self) -> &'static str {
        "Breadth-First Augmenting Path Matching"
    }

    fn category(&self) -> &'static str {
        "bipartite_matching"
    }

    fn description(&self) -> String {
        "Maximum-cardinality bipartite matching between predicates and the elements they accept. \
         Each predicate is attempted once; a breadth-first search over alternating \
         predicate/element layers finds a chain of reassignments ending at a free element."
            .to_string()
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            time_complexity: "O(P·(E + |Edges|))".to_string(),
            space_complexity: "O(P + E + |Edges|)".to_string(),
            best_case: "O(P + |Edges|)".to_string(),
            worst_case: "O(P·(E + |Edges|))".to_string(),
        }
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        self.config.describe()
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        self.config.set(name, value)
    }

    fn get_parameter(&self, name: &str) -> Option<String> {
        self.config.get(name)
    }

    fn execute_with_tracing(
        &mut self,
        graph: &BipartiteGraph,
        tracer: Option<&mut ExecutionTracer>,
    ) -> MatchingOutcome {
        self.find_best_matching(graph, tracer)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════════════
// UNIT TESTS
// ═══════════════════════════════════════════════════════════════════════════════════════


// ═══════════════════════════════════════════════════════════════════════════════════════
// PROPERTY-BASED VERIFICATION
// ═══════════════════════════════════════════════════════════════════════════════════════
