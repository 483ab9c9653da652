#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyModule};

use evometrics_core::io::csv::write_distance_table;
use evometrics_core::metrics::{self, DistanceMetric, DistanceResult, DistanceTable};

use crate::seqs::PySequenceSet;
use crate::utils::{to_py_err, utf8_output};

#[pyclass(frozen, name = "DistanceTable")]
pub struct PyDistanceTable {
    inner: DistanceTable,
}

fn result_tuple(py: Python<'_>, r: &DistanceResult) -> (String, String, PyObject) {
    let value = match &r.value {
        Ok(v) => v.into_py(py),
        Err(na) => na.to_string().into_py(py),
    };
    (r.id1.to_string(), r.id2.to_string(), value)
}

#[pymethods]
impl PyDistanceTable {
    fn metrics(&self) -> Vec<&'static str> {
        self.inner.metrics().map(|m| m.name()).collect()
    }

    /// `(id1, id2, value)` rows for one metric. Not-applicable values are
    /// returned as their marker string.
    fn results(&self, py: Python<'_>, metric: &str) -> PyResult<Vec<(String, String, PyObject)>> {
        let metric: DistanceMetric = metric.parse().map_err(to_py_err)?;
        Ok(self
            .inner
            .results(metric)
            .unwrap_or_default()
            .iter()
            .map(|r| result_tuple(py, r))
            .collect())
    }

    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let out = PyDict::new_bound(py);
        for (metric, results) in self.inner.iter() {
            let rows: Vec<_> = results.iter().map(|r| result_tuple(py, r)).collect();
            out.set_item(metric.name(), rows)?;
        }
        Ok(out)
    }

    fn to_csv(&self) -> PyResult<String> {
        let mut buf = Vec::new();
        write_distance_table(&self.inner, &mut buf).map_err(to_py_err)?;
        utf8_output(buf)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        let names: Vec<&str> = self.inner.metrics().map(|m| m.name()).collect();
        format!("DistanceTable(metrics=[{}])", names.join(", "))
    }
}

#[pyfunction]
#[pyo3(signature = (seqs, metrics = None))]
fn compute_distances(
    py: Python<'_>,
    seqs: &PySequenceSet,
    metrics: Option<Vec<String>>,
) -> PyResult<PyDistanceTable> {
    let selected: Vec<DistanceMetric> = match metrics {
        Some(names) => names
            .iter()
            .map(|n| n.parse())
            .collect::<Result<_, _>>()
            .map_err(to_py_err)?,
        None => DistanceMetric::ALL.to_vec(),
    };

    let set = &seqs.inner;
    let table = py
        .allow_threads(|| metrics::compute_distances(set, &selected))
        .map_err(to_py_err)?;
    Ok(PyDistanceTable { inner: table })
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDistanceTable>()?;
    m.add_function(wrap_pyfunction!(compute_distances, m)?)?;
    Ok(())
}
