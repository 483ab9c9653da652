use pyo3::exceptions::{PyIOError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyString;

use evometrics_core::error::EvoError;

/// I/O failures surface as `OSError`, everything else as `ValueError`.
pub fn to_py_err(err: EvoError) -> PyErr {
    match err {
        EvoError::Io(io) => PyIOError::new_err(io.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// FASTA content handed over as either `str` or a bytes-like object.
pub fn extract_text_bytes(obj: &Bound<'_, PyAny>) -> PyResult<Vec<u8>> {
    if let Ok(s) = obj.downcast::<PyString>() {
        return Ok(s.to_str()?.as_bytes().to_vec());
    }

    obj.extract::<Vec<u8>>()
        .map_err(|_| PyTypeError::new_err("expected str or bytes-like object"))
}

pub fn utf8_output(buf: Vec<u8>) -> PyResult<String> {
    String::from_utf8(buf).map_err(|e| PyValueError::new_err(e.to_string()))
}
