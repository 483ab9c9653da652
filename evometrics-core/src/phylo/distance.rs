use crate::error::{EvoError, EvoResult};
use crate::seq::set::SequenceSet;

pub const PAD_BYTE: u8 = b'-';

/// Symmetric distances stored as a packed lower triangle (entries `j < i`).
/// The diagonal is implicitly zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    labels: Vec<Box<str>>,
    data: Vec<f64>,
}

#[inline]
fn tri_index(i: usize, j: usize) -> usize {
    let (i, j) = if i > j { (i, j) } else { (j, i) };
    i * (i - 1) / 2 + j
}

impl DistanceMatrix {
    pub fn zeros(labels: Vec<Box<str>>) -> Self {
        let n = labels.len();
        Self {
            labels,
            data: vec![0.0; n * n.saturating_sub(1) / 2],
        }
    }

    /// Row `i` of `rows` must hold the `i` distances to labels `0..i`.
    pub fn from_lower_triangle(labels: Vec<Box<str>>, rows: Vec<Vec<f64>>) -> EvoResult<Self> {
        if rows.len() != labels.len() {
            return Err(EvoError::LabelCountMismatch {
                labels: labels.len(),
                seqs: rows.len(),
            });
        }
        let mut data = Vec::with_capacity(labels.len() * labels.len().saturating_sub(1) / 2);
        for (row, values) in rows.into_iter().enumerate() {
            // A trailing zero diagonal is accepted.
            let values = match values.len() {
                len if len == row => values,
                len if len == row + 1 => values[..row].to_vec(),
                found => {
                    return Err(EvoError::TriangleShape {
                        row,
                        expected: row,
                        found,
                    })
                }
            };
            data.extend(values);
        }
        Ok(Self { labels, data })
    }

    pub fn n(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[Box<str>] {
        &self.labels
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i == j {
            0.0
        } else {
            self.data[tri_index(i, j)]
        }
    }

    /// Setting a diagonal entry is a no-op.
    pub fn set(&mut self, i: usize, j: usize, val: f64) {
        if i != j {
            self.data[tri_index(i, j)] = val;
        }
    }

    /// Rows of the lower triangle, row `i` holding `i` values.
    pub fn lower_triangle(&self) -> Vec<&[f64]> {
        (0..self.n())
            .map(|i| {
                let start = i * i.saturating_sub(1) / 2;
                &self.data[start..start + i]
            })
            .collect()
    }

    pub fn to_square(&self) -> Vec<Vec<f64>> {
        let n = self.n();
        (0..n)
            .map(|i| (0..n).map(|j| self.get(i, j)).collect())
            .collect()
    }
}

/// Right-pad every sequence with `-` to the longest length. This is not an
/// alignment; residues keep their original columns.
pub fn pad_sequences(seqs: &[&[u8]]) -> Vec<Vec<u8>> {
    let max_len = seqs.iter().map(|s| s.len()).max().unwrap_or(0);
    seqs.iter()
        .map(|s| {
            let mut padded = Vec::with_capacity(max_len);
            padded.extend_from_slice(s);
            padded.resize(max_len, PAD_BYTE);
            padded
        })
        .collect()
}

/// 1 - (identical columns / columns). Gaps compare like any other byte.
fn identity_distance(a: &[u8], b: &[u8]) -> f64 {
    if a.is_empty() {
        return 1.0;
    }
    let identical = a.iter().zip(b.iter()).filter(|(x, y)| x == y).count();
    1.0 - identical as f64 / a.len() as f64
}

fn validate_distance_inputs(seqs: &[&[u8]], labels: &[Box<str>]) -> EvoResult<()> {
    let n = seqs.len();
    if n < 2 {
        return Err(EvoError::InsufficientInput {
            operation: "distance matrix",
            needed: 2,
            found: n,
        });
    }
    if labels.len() != n {
        return Err(EvoError::LabelCountMismatch {
            labels: labels.len(),
            seqs: n,
        });
    }
    let expected_len = seqs[0].len();
    for (idx, seq) in seqs.iter().enumerate() {
        if seq.len() != expected_len {
            return Err(EvoError::SequenceLengthMismatch {
                index: idx,
                len: seq.len(),
                expected: expected_len,
            });
        }
    }
    Ok(())
}

/// Identity distance matrix over equal-length (padded) sequences.
pub fn build_distance_matrix(labels: Vec<Box<str>>, padded: &[&[u8]]) -> EvoResult<DistanceMatrix> {
    validate_distance_inputs(padded, &labels)?;
    let n = padded.len();

    // Row-major over the lower triangle, which is also the storage order.
    let pairs: Vec<(usize, usize)> = (1..n).flat_map(|i| (0..i).map(move |j| (i, j))).collect();
    let data: Vec<f64> = par_map!(&pairs, |&(i, j)| identity_distance(padded[i], padded[j]));

    Ok(DistanceMatrix { labels, data })
}

/// Pad the residues of `set` and build the identity matrix labeled by id.
pub fn distance_matrix_from_set(set: &SequenceSet) -> EvoResult<DistanceMatrix> {
    let raw: Vec<&[u8]> = set.iter().map(|s| s.residues()).collect();
    let padded = pad_sequences(&raw);
    let padded_refs: Vec<&[u8]> = padded.iter().map(|s| s.as_slice()).collect();
    let labels: Vec<Box<str>> = set.ids().map(Box::from).collect();
    build_distance_matrix(labels, &padded_refs)
}
