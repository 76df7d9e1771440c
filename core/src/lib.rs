//! Bipartite assignment resolver
//!
//! Decides whether a collection satisfies exactly a set of conditions, one
//! to one: every predicate paired with a distinct element it accepts, and
//! every element paired with a predicate. The resolver builds the
//! predicate × element acceptance graph once, computes a maximum matching
//! with breadth-first augmenting-path search, and reports either the
//! pairing or the predicates and elements left over.
//!
//! Everything inside works on plain indices (`PredicateId`, `ElementId`).
//! Callers keep the mapping back to their own predicate and element values
//! and render failure messages themselves.
//!
//! ```
//! use assign_core::{ensure_exact_correspondence, PredicateId, ElementId};
//!
//! let elements = [1, 2];
//! let predicates: [fn(&i32) -> bool; 2] = [|x| *x > 0, |x| *x == 1];
//!
//! let pairing = ensure_exact_correspondence(&predicates, &elements).unwrap();
//! assert_eq!(pairing[&PredicateId(1)], ElementId(0));
//! assert_eq!(pairing[&PredicateId(0)], ElementId(1));
//! ```

pub mod algorithm;
pub mod config;
pub mod data_structures;
pub mod execution;

use std::collections::{BTreeMap, BTreeSet};

use log::warn;

pub use crate::algorithm::graph::{
    is_maximum, AssignmentResolver, AugmentingPath, AugmentingPathSearch, Diagnosis,
    DiagnosisKind, MatchingOutcome, MatchingStatistics,
};
pub use crate::algorithm::traits::{Algorithm, AlgorithmError, ElementId, Predicate, PredicateId};
pub use crate::config::{PredicateOrder, ResolverConfig};
pub use crate::data_structures::{AssignmentStore, BipartiteGraph};
pub use crate::execution::{ExecutionTracer, TraceEvent};

/// Everything produced by one configured resolution
#[derive(Debug)]
pub struct Resolution {
    pub graph: BipartiteGraph,
    pub outcome: MatchingOutcome,
    /// Present when the configuration asked for a trace
    pub trace: Option<ExecutionTracer>,
}

impl Resolution {
    pub fn diagnosis(&self) -> Diagnosis {
        self.outcome.diagnosis(&self.graph)
    }
}

/// Resolves `predicates` against `elements` with the default configuration
pub fn resolve<T, P>(predicates: &[P], elements: &[T]) -> MatchingOutcome
where
    P: Predicate<T>,
{
    let graph = BipartiteGraph::build(predicates, elements);
    AssignmentResolver::new().find_best_matching(&graph, None)
}

/// Resolves with an explicit configuration, keeping the graph and optional trace
pub fn resolve_with<T, P>(config: &ResolverConfig, predicates: &[P], elements: &[T]) -> Resolution
where
    T: Sync,
    P: Predicate<T> + Sync,
{
    let resolver = AssignmentResolver::with_config(config.clone());
    let graph = resolver.build_graph(predicates, elements);

    let mut trace = config.record_trace.then(|| {
        let parameters: BTreeMap<String, String> = resolver
            .parameters()
            .into_iter()
            .map(|p| (p.name, p.value))
            .collect();
        let mut tracer = ExecutionTracer::with_config(config.execution_config());
        if let Err(err) = tracer.start_trace_with_parameters(resolver.name(), parameters) {
            warn!("trace not started: {err}");
        }
        tracer
    });

    let outcome = resolver.find_best_matching(&graph, trace.as_mut());

    if let Some(tracer) = trace.as_mut() {
        if let Err(err) = tracer.finish_trace() {
            warn!("trace not finished: {err}");
        }
    }

    Resolution { graph, outcome, trace }
}

/// Requires a perfect one-to-one correspondence between predicates and elements
///
/// The counting precondition is checked before any predicate is evaluated.
pub fn ensure_exact_correspondence<T, P>(
    predicates: &[P],
    elements: &[T],
) -> Result<BTreeMap<PredicateId, ElementId>, AlgorithmError>
where
    P: Predicate<T>,
{
    if predicates.len() != elements.len() {
        return Err(AlgorithmError::CardinalityMismatch {
            predicates: predicates.len(),
            elements: elements.len(),
        });
    }

    resolve(predicates, elements).into_perfect()
}

/// Predicates that could not be paired, as a set
pub fn unmatched_predicates<T, P>(predicates: &[P], elements: &[T]) -> BTreeSet<PredicateId>
where
    P: Predicate<T>,
{
    resolve(predicates, elements).unmatched_predicates().clone()
}
