use pyo3::exceptions::PyKeyError;
use pyo3::prelude::*;
use pyo3::types::PyModule;

use evometrics_core::seq::{SequenceInputs, SequenceSet};

use crate::utils::extract_text_bytes;

#[pyclass(frozen, name = "SequenceSet")]
pub struct PySequenceSet {
    pub(crate) inner: SequenceSet,
}

#[pymethods]
impl PySequenceSet {
    fn ids(&self) -> Vec<String> {
        self.inner.ids().map(str::to_string).collect()
    }

    fn items(&self) -> Vec<(String, String)> {
        self.inner
            .iter()
            .map(|s| (s.id().to_string(), s.residues_str().into_owned()))
            .collect()
    }

    fn get(&self, id: &str) -> Option<String> {
        self.inner.get(id).map(|s| s.residues_str().into_owned())
    }

    fn __getitem__(&self, id: &str) -> PyResult<String> {
        self.get(id)
            .ok_or_else(|| PyKeyError::new_err(id.to_string()))
    }

    fn __contains__(&self, id: &str) -> bool {
        self.inner.contains(id)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!("SequenceSet(n={})", self.inner.len())
    }
}

/// Merge uploaded files, pasted FASTA text and manual `(id, residues)`
/// entries into one set.
#[pyfunction]
#[pyo3(signature = (files = None, pasted = None, manual = None, namespaced = true))]
fn read_sequences(
    py: Python<'_>,
    files: Option<Vec<Bound<'_, PyAny>>>,
    pasted: Option<Bound<'_, PyAny>>,
    manual: Option<Vec<(String, String)>>,
    namespaced: bool,
) -> PyResult<PySequenceSet> {
    let mut inputs = SequenceInputs::new();
    for file in files.unwrap_or_default() {
        inputs = inputs.with_file(extract_text_bytes(&file)?);
    }
    if let Some(text) = pasted {
        inputs = inputs.with_pasted(extract_text_bytes(&text)?);
    }
    for (id, residues) in manual.unwrap_or_default() {
        inputs = inputs.with_manual(id, residues);
    }
    if !namespaced {
        inputs = inputs.without_namespaces();
    }

    let set = py.allow_threads(|| inputs.collect());
    Ok(PySequenceSet { inner: set })
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySequenceSet>()?;
    m.add_function(wrap_pyfunction!(read_sequences, m)?)?;
    Ok(())
}
