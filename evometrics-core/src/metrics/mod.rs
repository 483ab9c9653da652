pub mod edit;
pub mod matrices;
pub mod pairwise;

pub use pairwise::{compute_distances, DistanceResult, DistanceTable};

use crate::error::EvoError;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceMetric {
    Hamming,
    Levenshtein,
    /// Ungapped BLOSUM62 sum over the shared prefix. A similarity score.
    Blosum62,
}

/// Whether larger values mean further apart or more alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Distance,
    Similarity,
}

/// A pair the metric is undefined for. Rendered as-is, never as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NotApplicable {
    #[error("N/A (length mismatch)")]
    LengthMismatch { left: usize, right: usize },
}

impl DistanceMetric {
    pub const ALL: [DistanceMetric; 3] = [
        DistanceMetric::Hamming,
        DistanceMetric::Levenshtein,
        DistanceMetric::Blosum62,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::Hamming => "Hamming",
            DistanceMetric::Levenshtein => "Levenshtein",
            DistanceMetric::Blosum62 => "BLOSUM62",
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            DistanceMetric::Hamming | DistanceMetric::Levenshtein => MetricKind::Distance,
            DistanceMetric::Blosum62 => MetricKind::Similarity,
        }
    }

    pub fn compute(&self, a: &[u8], b: &[u8]) -> Result<i64, NotApplicable> {
        match self {
            DistanceMetric::Hamming => edit::hamming(a, b).map(|d| d as i64),
            DistanceMetric::Levenshtein => Ok(edit::levenshtein(a, b) as i64),
            DistanceMetric::Blosum62 => Ok(matrices::blosum62_score(a, b)),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistanceMetric {
    type Err = EvoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DistanceMetric::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EvoError::UnknownMetric { name: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_length_scenario() {
        assert_eq!(DistanceMetric::Hamming.compute(b"ATGC", b"ATGG"), Ok(1));
        assert_eq!(DistanceMetric::Levenshtein.compute(b"ATGC", b"ATGG"), Ok(1));
    }

    #[test]
    fn unequal_length_scenario() {
        let hamming = DistanceMetric::Hamming.compute(b"ATG", b"ATGA");
        assert!(hamming.is_err());
        assert_eq!(hamming.unwrap_err().to_string(), "N/A (length mismatch)");
        assert_eq!(DistanceMetric::Levenshtein.compute(b"ATG", b"ATGA"), Ok(1));
    }

    #[test]
    fn blosum_is_a_similarity() {
        assert_eq!(DistanceMetric::Blosum62.kind(), MetricKind::Similarity);
        assert_eq!(DistanceMetric::Hamming.kind(), MetricKind::Distance);
        assert_eq!(DistanceMetric::Blosum62.compute(b"WW", b"WW"), Ok(22));
    }

    #[test]
    fn parse_names() {
        assert_eq!("hamming".parse::<DistanceMetric>().unwrap(), DistanceMetric::Hamming);
        assert_eq!("BLOSUM62".parse::<DistanceMetric>().unwrap(), DistanceMetric::Blosum62);
        assert_eq!(
            " Levenshtein ".parse::<DistanceMetric>().unwrap(),
            DistanceMetric::Levenshtein
        );
        assert!(matches!(
            "jc69".parse::<DistanceMetric>(),
            Err(EvoError::UnknownMetric { .. })
        ));
    }
}
