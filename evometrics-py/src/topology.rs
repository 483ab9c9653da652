use num_bigint::BigUint;
use pyo3::prelude::*;
use pyo3::types::PyModule;

use evometrics_core::topology;

/// Rooted binary topologies over `n` labeled taxa; zero below two taxa.
#[pyfunction]
fn count_rooted(n: u32) -> BigUint {
    topology::count_rooted(n)
}

/// Unrooted binary topologies over `n` labeled taxa; zero below three taxa.
#[pyfunction]
fn count_unrooted(n: u32) -> BigUint {
    topology::count_unrooted(n)
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(count_rooted, m)?)?;
    m.add_function(wrap_pyfunction!(count_unrooted, m)?)?;
    Ok(())
}
