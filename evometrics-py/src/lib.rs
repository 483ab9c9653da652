use pyo3::prelude::*;

mod distances;
mod fasta;
mod phylo;
mod seqs;
mod topology;
mod utils;

#[pymodule]
fn _native(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    seqs::register(m)?;
    fasta::register(m)?;
    distances::register(m)?;
    phylo::register(m)?;
    topology::register(m)?;
    Ok(())
}
