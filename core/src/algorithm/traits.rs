//! Core algorithm trait definitions for the assignment resolver
//!
//! This module establishes the typed index space shared by every component
//! (predicates on one side of the bipartite graph, elements on the other),
//! the error type surfaced at the crate boundary, and the `Algorithm` trait
//! through which a resolver is configured and executed.
//!
//! # Key Design Principles
//! - Plain integer indices internally; callers own the identities
//! - Distinct newtypes per side so a predicate index can never be used as an element index
//! - String-typed parameters validated at the trait boundary

use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

use crate::algorithm::graph::outcome::MatchingOutcome;
use crate::data_structures::graph::BipartiteGraph;
use crate::execution::tracer::ExecutionTracer;

/// Universal algorithm identifier for type-safe dispatch
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmId(String);

impl AlgorithmId {
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Index of a predicate in the caller's ordered predicate sequence
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PredicateId(pub usize);

impl PredicateId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl Display for PredicateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "predicate#{}", self.0)
    }
}

/// Index of an element in the caller's subject collection (traversal order)
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ElementId(pub usize);

impl ElementId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Boolean test over the element type
///
/// Blanket-implemented for every `Fn(&T) -> bool`, so plain closures,
/// function pointers and boxed closures can all be handed to the resolver.
pub trait Predicate<T: ?Sized> {
    /// Returns whether `element` satisfies this predicate
    fn accepts(&self, element: &T) -> bool;
}

impl<T: ?Sized, F> Predicate<T> for F
where
    F: Fn(&T) -> bool,
{
    #[inline]
    fn accepts(&self, element: &T) -> bool {
        self(element)
    }
}

/// Algorithm parameter with strongly typed values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmParameter {
    pub name: String,
    pub value: String,
    pub value_type: ParameterType,
    pub constraints: Option<ParameterConstraints>,
}

/// Parameter type enumeration for type-safe parameter handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterType {
    Integer,
    Boolean,
    Enum(Vec<String>),
}

/// Parameter constraints for validating algorithm parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterConstraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub allowed_values: Option<Vec<String>>,
}

/// Errors surfaced at the resolver boundary
///
/// The matching core itself never fails: an incomplete matching is an
/// ordinary outcome. These variants cover configuration mistakes and the
/// explicit perfect-matching precondition enforced by callers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlgorithmError {
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid edge: {predicate} -> {element} lies outside the graph")]
    InvalidEdge { predicate: PredicateId, element: ElementId },

    #[error("Cardinality mismatch: {predicates} predicate(s) cannot pair one-to-one with {elements} element(s)")]
    CardinalityMismatch { predicates: usize, elements: usize },

    #[error("Incomplete matching: {matched} pair(s) found, {unmatched_predicates} predicate(s) and {unmatched_elements} element(s) left unmatched")]
    IncompleteMatching {
        matched: usize,
        unmatched_predicates: usize,
        unmatched_elements: usize,
    },
}

/// Algorithm complexity information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmComplexity {
    pub time_complexity: String,
    pub space_complexity: String,
    pub best_case: String,
    pub worst_case: String,
}

/// Main algorithm trait
///
/// # Invariants
/// - State isolation between runs: nothing computed for one graph leaks into the next
/// - Deterministic behavior for a given graph and configuration
pub trait Algorithm: Debug {
    /// Returns the algorithm's unique identifier
    fn id(&self) -> AlgorithmId;

    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's category
    fn category(&self) -> &'static str;

    /// Returns the algorithm's description
    fn description(&self) -> String;

    /// Returns the algorithm's asymptotic complexity
    fn complexity(&self) -> AlgorithmComplexity;

    /// Returns supported parameters with their current values
    fn parameters(&self) -> Vec<AlgorithmParameter>;

    /// Sets algorithm parameter with type validation
    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError>;

    /// Gets algorithm parameter value
    fn get_parameter(&self, name: &str) -> Option<String>;

    /// Computes a maximum matching over `graph`, optionally recording a trace
    fn execute_with_tracing(
        &mut self,
        graph: &BipartiteGraph,
        tracer: Option<&mut ExecutionTracer>,
    ) -> MatchingOutcome;

    /// Computes a maximum matching over `graph` without tracing
    fn execute(&mut self, graph: &BipartiteGraph) -> MatchingOutcome {
        self.execute_with_tracing(graph, None)
    }
}
