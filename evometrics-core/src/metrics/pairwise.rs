use log::debug;

use super::{DistanceMetric, NotApplicable};
use crate::error::{EvoError, EvoResult};
use crate::seq::set::SequenceSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceResult {
    pub id1: Box<str>,
    pub id2: Box<str>,
    pub metric: DistanceMetric,
    pub value: Result<i64, NotApplicable>,
}

impl DistanceResult {
    /// The number, or the not-applicable marker text.
    pub fn display_value(&self) -> String {
        match &self.value {
            Ok(v) => v.to_string(),
            Err(na) => na.to_string(),
        }
    }
}

/// Per-metric results, in the order the metrics were requested.
#[derive(Debug, Clone, Default)]
pub struct DistanceTable {
    entries: Vec<(DistanceMetric, Vec<DistanceResult>)>,
}

impl DistanceTable {
    pub fn metrics(&self) -> impl Iterator<Item = DistanceMetric> + '_ {
        self.entries.iter().map(|(m, _)| *m)
    }

    pub fn results(&self, metric: DistanceMetric) -> Option<&[DistanceResult]> {
        self.entries
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, r)| r.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (DistanceMetric, &[DistanceResult])> + '_ {
        self.entries.iter().map(|(m, r)| (*m, r.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All index pairs `(i, j)` with `i < j`, ordered by `i` then `j`.
pub(crate) fn index_pairs(n: usize) -> Vec<(usize, usize)> {
    (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect()
}

/// Run every requested metric over each unordered pair of sequences in `set`.
///
/// Repeated metrics are computed once. Fails only when the set holds fewer
/// than two sequences.
pub fn compute_distances(set: &SequenceSet, metrics: &[DistanceMetric]) -> EvoResult<DistanceTable> {
    let n = set.len();
    if n < 2 {
        return Err(EvoError::InsufficientInput {
            operation: "pairwise distances",
            needed: 2,
            found: n,
        });
    }

    let seqs = set.as_slice();
    let pairs = index_pairs(n);
    debug!("computing {} metrics over {} pairs", metrics.len(), pairs.len());

    let mut entries: Vec<(DistanceMetric, Vec<DistanceResult>)> = Vec::with_capacity(metrics.len());
    for &metric in metrics {
        if entries.iter().any(|(m, _)| *m == metric) {
            continue;
        }
        let results: Vec<DistanceResult> = par_map!(&pairs, |&(i, j)| {
            let (a, b) = (&seqs[i], &seqs[j]);
            DistanceResult {
                id1: a.id().into(),
                id2: b.id().into(),
                metric,
                value: metric.compute(a.residues(), b.residues()),
            }
        });
        entries.push((metric, results));
    }

    Ok(DistanceTable { entries })
}
