use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvoError {
    #[error("{operation} needs at least {needed} sequences, got {found}")]
    InsufficientInput {
        operation: &'static str,
        needed: usize,
        found: usize,
    },

    #[error("label count mismatch (labels={labels}, seqs={seqs})")]
    LabelCountMismatch { labels: usize, seqs: usize },

    #[error("sequence {index} has length {len}, expected {expected}")]
    SequenceLengthMismatch {
        index: usize,
        len: usize,
        expected: usize,
    },

    #[error("lower triangle row {row} has {found} entries, expected {expected}")]
    TriangleShape {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("newick format error at byte {pos}: {msg}")]
    NewickFormat { msg: &'static str, pos: usize },

    #[error("unknown distance metric '{name}' (valid: 'Hamming', 'Levenshtein', 'BLOSUM62')")]
    UnknownMetric { name: String },

    #[error("unknown tree method '{name}' (valid: 'upgma', 'nj')")]
    UnknownTreeMethod { name: String },

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type EvoResult<T> = Result<T, EvoError>;
