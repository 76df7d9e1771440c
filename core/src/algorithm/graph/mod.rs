//! Bipartite matching: augmenting-path search, orchestration, outcome analysis

pub mod augmenting;
pub mod matching;
pub mod outcome;

pub use self::augmenting::{AugmentingPath, AugmentingPathSearch, PathStatistics};
pub use self::matching::{is_maximum, AssignmentResolver};
pub use self::outcome::{Diagnosis, DiagnosisKind, MatchingOutcome, MatchingStatistics};
