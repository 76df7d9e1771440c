//! Resolver configuration
//!
//! A `ResolverConfig` can be built in code, parsed from JSON, or adjusted one
//! string parameter at a time through the `Algorithm` trait. All three paths
//! share the validation in this module.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{
    AlgorithmError, AlgorithmParameter, ParameterConstraints, ParameterType, PredicateId,
};
use crate::data_structures::graph::BipartiteGraph;
use crate::execution::tracer::{ExecutionConfig, DEFAULT_MAX_TRACE_EVENTS};

pub const PARAM_PREDICATE_ORDER: &str = "predicate_order";
pub const PARAM_PARALLEL_EVALUATION: &str = "parallel_evaluation";
pub const PARAM_RECORD_TRACE: &str = "record_trace";
pub const PARAM_MAX_TRACE_EVENTS: &str = "max_trace_events";

/// Order in which the orchestrator attempts predicates
///
/// Every order yields a matching of the same size; only the specific
/// pairing may differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateOrder {
    /// Ascending predicate index
    #[default]
    Sequential,
    /// Descending predicate index
    Reverse,
    /// Ascending number of accepted elements, ties by index
    FewestCandidates,
}

impl PredicateOrder {
    pub const ALL: [PredicateOrder; 3] = [
        PredicateOrder::Sequential,
        PredicateOrder::Reverse,
        PredicateOrder::FewestCandidates,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PredicateOrder::Sequential => "sequential",
            PredicateOrder::Reverse => "reverse",
            PredicateOrder::FewestCandidates => "fewest_candidates",
        }
    }

    /// Predicate indices of `graph` in this order
    pub fn arrange(self, graph: &BipartiteGraph) -> Vec<PredicateId> {
        let mut order: Vec<PredicateId> = graph.predicates().collect();
        match self {
            PredicateOrder::Sequential => {}
            PredicateOrder::Reverse => order.reverse(),
            PredicateOrder::FewestCandidates => {
                order.sort_by_key(|&p| graph.candidates(p).len());
            }
        }
        order
    }
}

impl fmt::Display for PredicateOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PredicateOrder {
    type Err = AlgorithmError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PredicateOrder::ALL
            .into_iter()
            .find(|order| order.as_str() == value)
            .ok_or_else(|| AlgorithmError::InvalidParameter {
                name: PARAM_PREDICATE_ORDER.to_string(),
                reason: format!(
                    "unknown order '{value}'. Valid options: sequential, reverse, fewest_candidates"
                ),
            })
    }
}

/// Resolver settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    pub predicate_order: PredicateOrder,
    /// Probe predicates on the rayon pool while building the graph
    pub parallel_evaluation: bool,
    pub record_trace: bool,
    pub max_trace_events: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            predicate_order: PredicateOrder::Sequential,
            parallel_evaluation: false,
            record_trace: false,
            max_trace_events: DEFAULT_MAX_TRACE_EVENTS,
        }
    }
}

impl ResolverConfig {
    /// Parses a JSON document; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, AlgorithmError> {
        serde_json::from_str(json).map_err(|e| AlgorithmError::InvalidConfiguration(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, AlgorithmError> {
        serde_json::to_string(self).map_err(|e| AlgorithmError::InvalidConfiguration(e.to_string()))
    }

    pub fn execution_config(&self) -> ExecutionConfig {
        ExecutionConfig {
            max_trace_events: self.max_trace_events,
        }
    }

    /// Sets one parameter from its string form
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        match name {
            PARAM_PREDICATE_ORDER => self.predicate_order = value.parse()?,
            PARAM_PARALLEL_EVALUATION => self.parallel_evaluation = parse_bool(name, value)?,
            PARAM_RECORD_TRACE => self.record_trace = parse_bool(name, value)?,
            PARAM_MAX_TRACE_EVENTS => {
                self.max_trace_events =
                    value.parse().map_err(|_| AlgorithmError::InvalidParameter {
                        name: name.to_string(),
                        reason: format!("expected a non-negative integer, got '{value}'"),
                    })?;
            }
            _ => {
                return Err(AlgorithmError::InvalidParameter {
                    name: name.to_string(),
                    reason: "unknown parameter. Valid parameters: predicate_order, \
                             parallel_evaluation, record_trace, max_trace_events"
                        .to_string(),
                })
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<String> {
        match name {
            PARAM_PREDICATE_ORDER => Some(self.predicate_order.to_string()),
            PARAM_PARALLEL_EVALUATION => Some(self.parallel_evaluation.to_string()),
            PARAM_RECORD_TRACE => Some(self.record_trace.to_string()),
            PARAM_MAX_TRACE_EVENTS => Some(self.max_trace_events.to_string()),
            _ => None,
        }
    }

    /// Parameter descriptors with current values
    pub fn describe(&self) -> Vec<AlgorithmParameter> {
        let orders: Vec<String> = PredicateOrder::ALL.iter().map(|o| o.as_str().to_string()).collect();

        vec![
            AlgorithmParameter {
                name: PARAM_PREDICATE_ORDER.to_string(),
                value: self.predicate_order.to_string(),
                value_type: ParameterType::Enum(orders.clone()),
                constraints: Some(ParameterConstraints {
                    min: None,
                    max: None,
                    allowed_values: Some(orders),
                }),
            },
            AlgorithmParameter {
                name: PARAM_PARALLEL_EVALUATION.to_string(),
                value: self.parallel_evaluation.to_string(),
                value_type: ParameterType::Boolean,
                constraints: None,
            },
            AlgorithmParameter {
                name: PARAM_RECORD_TRACE.to_string(),
                value: self.record_trace.to_string(),
                value_type: ParameterType::Boolean,
                constraints: None,
            },
            AlgorithmParameter {
                name: PARAM_MAX_TRACE_EVENTS.to_string(),
                value: self.max_trace_events.to_string(),
                value_type: ParameterType::Integer,
                constraints: Some(ParameterConstraints {
                    min: Some(0.0),
                    max: None,
                    allowed_values: None,
                }),
            },
        ]
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, AlgorithmError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(AlgorithmError::InvalidParameter {
            name: name.to_string(),
            reason: format!("invalid setting '{value}'. Valid options: true, false"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::traits::ElementId;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.predicate_order, PredicateOrder::Sequential);
        assert!(!config.parallel_evaluation);
        assert!(!config.record_trace);
        assert_eq!(config.max_trace_events, DEFAULT_MAX_TRACE_EVENTS);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config =
            ResolverConfig::from_json(r#"{"predicate_order": "fewest_candidates", "record_trace": true}"#)
                .unwrap();

        assert_eq!(config.predicate_order, PredicateOrder::FewestCandidates);
        assert!(config.record_trace);
        assert!(!config.parallel_evaluation);
        assert_eq!(config.max_trace_events, DEFAULT_MAX_TRACE_EVENTS);

        let echoed = ResolverConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(echoed, config);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            ResolverConfig::from_json(r#"{"predicate_order": "random"}"#),
            Err(AlgorithmError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            ResolverConfig::from_json(r#"{"greedy": true}"#),
            Err(AlgorithmError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_parameter_setting() {
        let mut config = ResolverConfig::default();

        config.set(PARAM_PREDICATE_ORDER, "reverse").unwrap();
        config.set(PARAM_MAX_TRACE_EVENTS, "50").unwrap();
        config.set(PARAM_PARALLEL_EVALUATION, "true").unwrap();

        assert_eq!(config.get(PARAM_PREDICATE_ORDER).as_deref(), Some("reverse"));
        assert_eq!(config.get(PARAM_MAX_TRACE_EVENTS).as_deref(), Some("50"));
        assert_eq!(config.get(PARAM_PARALLEL_EVALUATION).as_deref(), Some("true"));
        assert_eq!(config.get("unknown"), None);

        assert!(config.set("invalid_param", "value").is_err());
        assert!(config.set(PARAM_RECORD_TRACE, "yes").is_err());
        assert!(config.set(PARAM_MAX_TRACE_EVENTS, "-1").is_err());
        assert!(config.set(PARAM_PREDICATE_ORDER, "random").is_err());
    }

    #[test]
    fn test_describe_lists_every_parameter() {
        let names: Vec<String> = ResolverConfig::default().describe().into_iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![PARAM_PREDICATE_ORDER, PARAM_PARALLEL_EVALUATION, PARAM_RECORD_TRACE, PARAM_MAX_TRACE_EVENTS]
        );
    }

    #[test]
    fn test_arrange_orders() {
        let graph = BipartiteGraph::from_edges(
            3,
            3,
            [
                (PredicateId(0), ElementId(0)),
                (PredicateId(0), ElementId(1)),
                (PredicateId(0), ElementId(2)),
                (PredicateId(2), ElementId(0)),
                (PredicateId(2), ElementId(1)),
            ],
        )
        .unwrap();

        assert_eq!(
            PredicateOrder::Sequential.arrange(&graph),
            vec![PredicateId(0), PredicateId(1), PredicateId(2)]
        );
        assert_eq!(
            PredicateOrder::Reverse.arrange(&graph),
            vec![PredicateId(2), PredicateId(1), PredicateId(0)]
        );
        assert_eq!(
            PredicateOrder::FewestCandidates.arrange(&graph),
            vec![PredicateId(1), PredicateId(2), PredicateId(0)]
        );
    }
}
