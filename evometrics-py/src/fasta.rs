#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;
use pyo3::types::PyModule;

use evometrics_core::io::{fasta, SkippedRecord};

use crate::seqs::PySequenceSet;
use crate::utils::{extract_text_bytes, to_py_err};

/// A FASTA record dropped while reading, with the 1-based line it started on.
#[pyclass(frozen, get_all, name = "SkippedRecord")]
pub struct PySkippedRecord {
    line: usize,
    id: Option<String>,
    message: String,
}

#[pymethods]
impl PySkippedRecord {
    fn __repr__(&self) -> String {
        format!("SkippedRecord(line {}: {})", self.line, self.message)
    }
}

impl From<SkippedRecord> for PySkippedRecord {
    fn from(rec: SkippedRecord) -> Self {
        Self {
            line: rec.line,
            id: rec.id.map(String::from),
            message: rec.message.into(),
        }
    }
}

#[pyfunction]
#[pyo3(signature = (path, label = "File1"))]
fn read_fasta(path: &str, label: &str) -> PyResult<PySequenceSet> {
    fasta::parse_fasta_path(path, label)
        .map(|inner| PySequenceSet { inner })
        .map_err(to_py_err)
}

/// Returns the parsed set together with the records that were skipped.
#[pyfunction]
#[pyo3(signature = (data, label = "Pasted"))]
fn parse_fasta(
    data: &Bound<'_, PyAny>,
    label: &str,
) -> PyResult<(PySequenceSet, Vec<PySkippedRecord>)> {
    let report = fasta::parse_fasta_report(&extract_text_bytes(data)?, label);
    let skipped = report.skipped.into_iter().map(Into::into).collect();
    Ok((PySequenceSet { inner: report.data }, skipped))
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySkippedRecord>()?;
    m.add_function(wrap_pyfunction!(read_fasta, m)?)?;
    m.add_function(wrap_pyfunction!(parse_fasta, m)?)?;
    Ok(())
}
