//! Execution tracing for augmenting-path searches
//!
//! The tracer is an optional observer handed to the resolver. Each search
//! step is recorded as a `TracePoint` tagged with the predicate whose search
//! produced it, so a caller can replay why a given predicate ended up
//! matched, reassigned, or left unmatched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::traits::{ElementId, PredicateId};

/// Default cap on stored trace points
pub const DEFAULT_MAX_TRACE_EVENTS: usize = 10_000;

/// Tracer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Trace points beyond this count are dropped and only counted
    pub max_trace_events: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_trace_events: DEFAULT_MAX_TRACE_EVENTS,
        }
    }
}

/// Single step of an augmenting-path search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    /// Search begins for an unmatched predicate
    SearchStarted,
    /// `element` was reached from `predicate` for the first time in this search
    ElementVisited { predicate: PredicateId, element: ElementId },
    /// `element` is held by `from`; the search will try to re-home `from` so `to` can take it
    ElementDisplaced { element: ElementId, from: PredicateId, to: PredicateId },
    /// A free element ended the search; `length` swaps realize the augmentation
    PathFound { element: ElementId, length: usize },
    /// The queue emptied without reaching a free element
    SearchExhausted { elements_visited: usize },
}

/// Trace event tagged with its position and the search that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracePoint {
    pub step: usize,
    pub target: PredicateId,
    pub event: TraceEvent,
}

/// Metadata describing a recorded trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceMetadata {
    pub algorithm_name: String,
    pub parameters: BTreeMap<String, String>,
}

/// Serializable export of a finished or running trace
#[derive(Debug, Serialize)]
struct SerializedTrace<'a> {
    metadata: Option<&'a TraceMetadata>,
    trace_points: &'a [TracePoint],
    dropped: usize,
}

/// Error types for tracer operations
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Trace already active for {0}")]
    TraceAlreadyActive(String),

    #[error("No active trace")]
    NoActiveTrace,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Recorder for augmenting-path search events
#[derive(Debug, Default)]
pub struct ExecutionTracer {
    config: ExecutionConfig,
    metadata: Option<TraceMetadata>,
    trace_points: Vec<TracePoint>,
    dropped: usize,
    active: bool,
}

impl ExecutionTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExecutionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Begins a trace; any previously recorded points are discarded
    pub fn start_trace(&mut self, algorithm_name: &str) -> Result<(), TraceError> {
        self.start_trace_with_parameters(algorithm_name, BTreeMap::new())
    }

    pub fn start_trace_with_parameters(
        &mut self,
        algorithm_name: &str,
        parameters: BTreeMap<String, String>,
    ) -> Result<(), TraceError> {
        if self.active {
            let running = self
                .metadata
                .as_ref()
                .map(|m| m.algorithm_name.clone())
                .unwrap_or_default();
            return Err(TraceError::TraceAlreadyActive(running));
        }

        self.metadata = Some(TraceMetadata {
            algorithm_name: algorithm_name.to_owned(),
            parameters,
        });
        self.trace_points.clear();
        self.dropped = 0;
        self.active = true;
        Ok(())
    }

    /// Ends the active trace, returning the number of points kept
    pub fn finish_trace(&mut self) -> Result<usize, TraceError> {
        if !self.active {
            return Err(TraceError::NoActiveTrace);
        }
        self.active = false;
        Ok(self.trace_points.len())
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Records `event` for the search targeting `target`; ignored when no trace is active
    pub fn record(&mut self, target: PredicateId, event: TraceEvent) {
        if !self.active {
            return;
        }
        if self.trace_points.len() >= self.config.max_trace_events {
            self.dropped += 1;
            return;
        }

        let step = self.trace_points.len() + self.dropped;
        self.trace_points.push(TracePoint { step, target, event });
    }

    pub fn metadata(&self) -> Option<&TraceMetadata> {
        self.metadata.as_ref()
    }

    pub fn trace_points(&self) -> &[TracePoint] {
        &self.trace_points
    }

    /// Trace points dropped after the configured cap was reached
    pub fn dropped_events(&self) -> usize {
        self.dropped
    }

    /// Trace points produced by the search for `target`
    pub fn events_for(&self, target: PredicateId) -> Vec<&TracePoint> {
        self.trace_points
            .iter()
            .filter(|point| point.target == target)
            .collect()
    }

    /// Exports metadata, trace points and the dropped count as JSON
    pub fn to_json(&self) -> Result<String, TraceError> {
        let export = SerializedTrace {
            metadata: self.metadata.as_ref(),
            trace_points: &self.trace_points,
            dropped: self.dropped,
        };
        Ok(serde_json::to_string(&export)?)
    }
}
