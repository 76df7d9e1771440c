//! Matching outcome and diagnosis
//!
//! A `MatchingOutcome` is what the orchestrator hands back to the assertion
//! layer: the predicate → element pairing, the predicates left without an
//! element, and enough shape information to decide whether the pairing is a
//! perfect one-to-one correspondence. Rendering any of this as text is the
//! caller's business; this module only classifies.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{AlgorithmError, ElementId, PredicateId};
use crate::data_structures::graph::BipartiteGraph;

/// Counters describing one resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingStatistics {
    pub predicate_evaluations: usize,
    pub path_searches: usize,
    pub augmentations: usize,
    pub elements_visited: usize,
    pub predicates_enqueued: usize,
    pub longest_augmenting_path: usize,
}

/// Maximum matching between predicates and elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingOutcome {
    pairing: BTreeMap<PredicateId, ElementId>,
    unmatched_predicates: BTreeSet<PredicateId>,
    predicate_count: usize,
    element_count: usize,
    statistics: MatchingStatistics,
}

impl MatchingOutcome {
    pub(crate) fn new(
        pairing: BTreeMap<PredicateId, ElementId>,
        unmatched_predicates: BTreeSet<PredicateId>,
        predicate_count: usize,
        element_count: usize,
        statistics: MatchingStatistics,
    ) -> Self {
        debug_assert_eq!(pairing.len() + unmatched_predicates.len(), predicate_count);
        Self {
            pairing,
            unmatched_predicates,
            predicate_count,
            element_count,
            statistics,
        }
    }

    /// Number of matched pairs
    pub fn size(&self) -> usize {
        self.pairing.len()
    }

    pub fn pairing(&self) -> &BTreeMap<PredicateId, ElementId> {
        &self.pairing
    }

    pub fn into_pairing(self) -> BTreeMap<PredicateId, ElementId> {
        self.pairing
    }

    pub fn unmatched_predicates(&self) -> &BTreeSet<PredicateId> {
        &self.unmatched_predicates
    }

    /// Elements no predicate was paired with, ascending
    pub fn unmatched_elements(&self) -> Vec<ElementId> {
        let taken: BTreeSet<ElementId> = self.pairing.values().copied().collect();
        (0..self.element_count)
            .map(ElementId)
            .filter(|e| !taken.contains(e))
            .collect()
    }

    pub fn element_for(&self, predicate: PredicateId) -> Option<ElementId> {
        self.pairing.get(&predicate).copied()
    }

    pub fn predicate_for(&self, element: ElementId) -> Option<PredicateId> {
        self.pairing
            .iter()
            .find(|(_, &e)| e == element)
            .map(|(&p, _)| p)
    }

    pub fn predicate_count(&self) -> usize {
        self.predicate_count
    }

    pub fn element_count(&self) -> usize {
        self.element_count
    }

    pub fn statistics(&self) -> &MatchingStatistics {
        &self.statistics
    }

    /// Every predicate holds an element
    pub fn is_saturating(&self) -> bool {
        self.unmatched_predicates.is_empty()
    }

    /// Every predicate and every element is paired; requires `P == E`
    pub fn is_perfect(&self) -> bool {
        self.predicate_count == self.element_count && self.is_saturating()
    }

    /// Returns the pairing only if it is a perfect one-to-one correspondence
    pub fn into_perfect(self) -> Result<BTreeMap<PredicateId, ElementId>, AlgorithmError> {
        if self.predicate_count != self.element_count {
            return Err(AlgorithmError::CardinalityMismatch {
                predicates: self.predicate_count,
                elements: self.element_count,
            });
        }
        if !self.is_saturating() {
            return Err(AlgorithmError::IncompleteMatching {
                matched: self.size(),
                unmatched_predicates: self.unmatched_predicates.len(),
                unmatched_elements: self.element_count - self.size(),
            });
        }
        Ok(self.pairing)
    }

    /// Classifies why the matching is (or is not) perfect
    pub fn diagnosis(&self, graph: &BipartiteGraph) -> Diagnosis {
        let predicates_without_candidates = graph.predicates_without_candidates();
        let hopeless = self
            .unmatched_predicates
            .iter()
            .any(|&p| graph.candidates(p).is_empty());

        let kind = if self.is_perfect() {
            DiagnosisKind::Perfect
        } else if self.predicate_count != self.element_count {
            DiagnosisKind::CardinalityMismatch
        } else if hopeless {
            DiagnosisKind::NoCandidates
        } else {
            DiagnosisKind::Contention
        };

        Diagnosis {
            kind,
            unmatched_predicates: self.unmatched_predicates.iter().copied().collect(),
            unmatched_elements: self.unmatched_elements(),
            predicates_without_candidates,
            elements_without_candidates: graph.elements_without_candidates(),
        }
    }
}

/// Primary reason a matching falls short of a one-to-one correspondence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisKind {
    /// Every predicate and every element is paired
    Perfect,
    /// Predicate and element counts differ, so no bijection can exist
    CardinalityMismatch,
    /// Some unmatched predicate accepts no element at all
    NoCandidates,
    /// Unmatched predicates accept elements, but a group of predicates
    /// competes for fewer elements than it has members
    Contention,
}

/// Structured explanation of a matching outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub kind: DiagnosisKind,
    pub unmatched_predicates: Vec<PredicateId>,
    pub unmatched_elements: Vec<ElementId>,
    pub predicates_without_candidates: Vec<PredicateId>,
    pub elements_without_candidates: Vec<ElementId>,
}

impl Diagnosis {
    pub fn is_perfect(&self) -> bool {
        self.kind == DiagnosisKind::Perfect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(
        pairs: &[(usize, usize)],
        unmatched: &[usize],
        predicates: usize,
        elements: usize,
    ) -> MatchingOutcome {
        MatchingOutcome::new(
            pairs.iter().map(|&(p, e)| (PredicateId(p), ElementId(e))).collect(),
            unmatched.iter().map(|&p| PredicateId(p)).collect(),
            predicates,
            elements,
            MatchingStatistics::default(),
        )
    }

    #[test]
    fn test_perfect_outcome() {
        let result = outcome(&[(0, 1), (1, 0)], &[], 2, 2);

        assert!(result.is_saturating());
        assert!(result.is_perfect());
        assert!(result.unmatched_elements().is_empty());
        assert_eq!(result.element_for(PredicateId(0)), Some(ElementId(1)));
        assert_eq!(result.predicate_for(ElementId(1)), Some(PredicateId(0)));
        assert_eq!(result.predicate_for(ElementId(5)), None);

        let pairing = result.into_perfect().unwrap();
        assert_eq!(pairing.len(), 2);
    }

    #[test]
    fn test_saturating_but_not_perfect() {
        // One predicate, two elements: every predicate matched, one element left over.
        let result = outcome(&[(0, 1)], &[], 1, 2);

        assert!(result.is_saturating());
        assert!(!result.is_perfect());
        assert_eq!(result.unmatched_elements(), vec![ElementId(0)]);
        assert_eq!(
            result.into_perfect(),
            Err(AlgorithmError::CardinalityMismatch { predicates: 1, elements: 2 })
        );
    }

    #[test]
    fn test_incomplete_matching_error() {
        let result = outcome(&[(0, 0)], &[1], 2, 2);

        assert_eq!(
            result.into_perfect(),
            Err(AlgorithmError::IncompleteMatching {
                matched: 1,
                unmatched_predicates: 1,
                unmatched_elements: 1,
            })
        );
    }

    #[test]
    fn test_diagnosis_kinds() {
        let graph = BipartiteGraph::from_edges(
            2,
            2,
            [(PredicateId(0), ElementId(0)), (PredicateId(1), ElementId(0))],
        )
        .unwrap();
        let contention = outcome(&[(0, 0)], &[1], 2, 2).diagnosis(&graph);
        assert_eq!(contention.kind, DiagnosisKind::Contention);
        assert_eq!(contention.unmatched_predicates, vec![PredicateId(1)]);
        assert_eq!(contention.unmatched_elements, vec![ElementId(1)]);
        assert_eq!(contention.elements_without_candidates, vec![ElementId(1)]);

        let graph = BipartiteGraph::from_edges(2, 2, [(PredicateId(0), ElementId(0))]).unwrap();
        let starved = outcome(&[(0, 0)], &[1], 2, 2).diagnosis(&graph);
        assert_eq!(starved.kind, DiagnosisKind::NoCandidates);
        assert_eq!(starved.predicates_without_candidates, vec![PredicateId(1)]);

        let graph = BipartiteGraph::from_edges(1, 2, [(PredicateId(0), ElementId(0))]).unwrap();
        let mismatch = outcome(&[(0, 0)], &[], 1, 2).diagnosis(&graph);
        assert_eq!(mismatch.kind, DiagnosisKind::CardinalityMismatch);
        assert!(!mismatch.is_perfect());
    }

    #[test]
    fn test_diagnosis_serializes_for_callers() {
        let graph = BipartiteGraph::from_edges(1, 1, []).unwrap();
        let diagnosis = outcome(&[], &[0], 1, 1).diagnosis(&graph);

        let json = serde_json::to_value(&diagnosis).unwrap();
        assert_eq!(json["kind"], "no_candidates");
        assert_eq!(json["unmatched_predicates"][0], 0);
        assert_eq!(json["unmatched_elements"][0], 0);
    }
}
