#![allow(clippy::useless_conversion)]

use pyo3::exceptions::PyIndexError;
use pyo3::prelude::*;
use pyo3::types::PyModule;

use evometrics_core::io::csv::write_distance_matrix;
use evometrics_core::phylo::{self, DistanceMatrix, NewickFormat, PhyloTree, TreeMethod};

use crate::seqs::PySequenceSet;
use crate::utils::{to_py_err, utf8_output};

/// Identity distances over right-padded sequences, labeled by sequence id.
#[pyclass(frozen, name = "DistanceMatrix")]
pub struct PyDistanceMatrix {
    inner: DistanceMatrix,
}

#[pymethods]
impl PyDistanceMatrix {
    /// Row `i` of `rows` holds the `i` distances to the earlier labels,
    /// optionally followed by the zero diagonal.
    #[new]
    fn new(labels: Vec<String>, rows: Vec<Vec<f64>>) -> PyResult<Self> {
        let labels = labels.into_iter().map(String::into_boxed_str).collect();
        DistanceMatrix::from_lower_triangle(labels, rows)
            .map(|inner| Self { inner })
            .map_err(to_py_err)
    }

    #[getter]
    fn labels(&self) -> Vec<&str> {
        self.inner.labels().iter().map(|l| &**l).collect()
    }

    fn __getitem__(&self, key: (usize, usize)) -> PyResult<f64> {
        let (i, j) = key;
        if i.max(j) >= self.inner.n() {
            return Err(PyIndexError::new_err(format!(
                "({i}, {j}) outside a {0}x{0} distance matrix",
                self.inner.n()
            )));
        }
        Ok(self.inner.get(i, j))
    }

    fn lower_triangle(&self) -> Vec<Vec<f64>> {
        self.inner
            .lower_triangle()
            .into_iter()
            .map(<[f64]>::to_vec)
            .collect()
    }

    fn to_square(&self) -> Vec<Vec<f64>> {
        self.inner.to_square()
    }

    fn to_csv(&self) -> PyResult<String> {
        let mut buf = Vec::new();
        write_distance_matrix(&self.inner, &mut buf).map_err(to_py_err)?;
        utf8_output(buf)
    }

    fn __len__(&self) -> usize {
        self.inner.n()
    }

    fn __repr__(&self) -> String {
        format!("DistanceMatrix(labels={:?})", self.labels())
    }
}

#[pyclass(frozen, name = "PhyloTree")]
pub struct PyPhyloTree {
    inner: PhyloTree,
}

#[pymethods]
impl PyPhyloTree {
    #[pyo3(signature = (precision = 5, internal_labels = true))]
    fn to_newick(&self, precision: usize, internal_labels: bool) -> String {
        let mut format = NewickFormat::default().with_precision(precision);
        if !internal_labels {
            format = format.without_internal_labels();
        }
        phylo::to_newick_with(&self.inner, &format)
    }

    #[getter]
    fn rooted(&self) -> bool {
        self.inner.is_rooted()
    }

    #[getter]
    fn leaf_labels(&self) -> Vec<String> {
        self.inner.leaf_labels()
    }

    /// `(label, path length to the root)` per leaf, in node order.
    fn leaf_depths(&self) -> Vec<(String, f64)> {
        self.inner
            .leaves()
            .into_iter()
            .map(|leaf| {
                let label = self.inner.node(leaf).label.as_deref().unwrap_or_default();
                (label.to_string(), self.inner.distance_to_root(leaf))
            })
            .collect()
    }

    fn __len__(&self) -> usize {
        self.inner.num_leaves()
    }

    fn __repr__(&self) -> String {
        format!(
            "PhyloTree(rooted={}, leaves={})",
            self.inner.is_rooted(),
            self.inner.num_leaves()
        )
    }

    fn __str__(&self) -> String {
        phylo::to_newick(&self.inner)
    }
}

#[pyfunction]
fn distance_matrix(py: Python<'_>, seqs: &PySequenceSet) -> PyResult<PyDistanceMatrix> {
    let set = &seqs.inner;
    py.allow_threads(|| phylo::distance_matrix_from_set(set))
        .map(|inner| PyDistanceMatrix { inner })
        .map_err(to_py_err)
}

/// `method` is `"upgma"` or `"nj"` (also `"neighbor-joining"`).
#[pyfunction]
#[pyo3(signature = (dist_matrix, method = "nj"))]
fn build_tree(
    py: Python<'_>,
    dist_matrix: &PyDistanceMatrix,
    method: &str,
) -> PyResult<PyPhyloTree> {
    let method: TreeMethod = method.parse().map_err(to_py_err)?;
    let dm = &dist_matrix.inner;
    py.allow_threads(|| phylo::construct_tree(dm, method))
        .map(|inner| PyPhyloTree { inner })
        .map_err(to_py_err)
}

#[pyfunction]
fn parse_newick(text: &str) -> PyResult<PyPhyloTree> {
    phylo::parse_newick(text)
        .map(|inner| PyPhyloTree { inner })
        .map_err(to_py_err)
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDistanceMatrix>()?;
    m.add_class::<PyPhyloTree>()?;
    m.add_function(wrap_pyfunction!(distance_matrix, m)?)?;
    m.add_function(wrap_pyfunction!(build_tree, m)?)?;
    m.add_function(wrap_pyfunction!(parse_newick, m)?)?;
    Ok(())
}
