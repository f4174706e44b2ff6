use numpy::{
    ndarray::Array2, IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2,
};
use pyo3::{exceptions::PyValueError, prelude::*, types::PyBytes};
use varfloat::{
    slice::{decode_bounded_ints, encode_bounded_ints},
    vector::{decode_vec3_slice, encode_vec3_slice},
    Config, VarfloatError, Vec3,
};

fn value_error(err: VarfloatError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Encodes one float with `bits` mantissa bits.
#[pyfunction]
#[pyo3(signature = (value, bits = varfloat::DEFAULT_MANTISSA_BITS))]
fn encode_float(py: Python<'_>, value: f64, bits: u32) -> PyResult<&PyBytes> {
    let bytes = varfloat::encode_float(value, bits).map_err(value_error)?;
    Ok(PyBytes::new(py, &bytes))
}

/// Decodes one float, returning `(value, bytes_consumed)`.
#[pyfunction]
#[pyo3(signature = (data, bits = varfloat::DEFAULT_MANTISSA_BITS))]
fn decode_float(data: &[u8], bits: u32) -> PyResult<(f64, usize)> {
    varfloat::decode_float(data, bits).map_err(value_error)
}

/// Encodes a 1D float64 array as a length-prefixed slice.
#[pyfunction]
#[pyo3(signature = (values, bits = varfloat::DEFAULT_MANTISSA_BITS))]
fn encode_floats<'py>(
    py: Python<'py>,
    values: PyReadonlyArray1<'_, f64>,
    bits: u32,
) -> PyResult<&'py PyBytes> {
    let values = values.as_slice()?;
    let bytes = py
        .allow_threads(|| varfloat::encode_floats(values, bits))
        .map_err(value_error)?;
    Ok(PyBytes::new(py, &bytes))
}

/// Decodes a slice written by `encode_floats`, returning `(array, bytes_consumed)`.
#[pyfunction]
#[pyo3(signature = (data, bits = varfloat::DEFAULT_MANTISSA_BITS))]
fn decode_floats<'py>(
    py: Python<'py>,
    data: &[u8],
    bits: u32,
) -> PyResult<(&'py PyArray1<f64>, usize)> {
    let (values, used) = varfloat::decode_floats(data, bits).map_err(value_error)?;
    Ok((values.into_pyarray(py), used))
}

#[pyfunction]
fn encode_bounded_int(py: Python<'_>, value: i64, min: i64, max: i64, bits: u32) -> PyResult<&PyBytes> {
    let bytes = varfloat::encode_bounded_int(value, min, max, bits).map_err(value_error)?;
    Ok(PyBytes::new(py, &bytes))
}

/// Decodes an integer in `[min, max]`. Out of range results are clamped.
#[pyfunction]
fn decode_bounded_int(data: &[u8], min: i64, max: i64, bits: u32) -> PyResult<(i64, usize)> {
    varfloat::decode_bounded_int(data, min, max, bits).map_err(value_error)
}

/// Encodes an int64 array with a leading width byte.
#[pyfunction]
fn encode_bounded_int_array<'py>(
    py: Python<'py>,
    values: PyReadonlyArray1<'_, i64>,
    min: i64,
    max: i64,
    bits: u32,
) -> PyResult<&'py PyBytes> {
    let bytes = encode_bounded_ints(values.as_slice()?, min, max, bits).map_err(value_error)?;
    Ok(PyBytes::new(py, &bytes))
}

/// Returns `(array, bits, bytes_consumed)`.
#[pyfunction]
fn decode_bounded_int_array<'py>(
    py: Python<'py>,
    data: &[u8],
    min: i64,
    max: i64,
) -> PyResult<(&'py PyArray1<i64>, u32, usize)> {
    let (values, bits, used) = decode_bounded_ints(data, min, max).map_err(value_error)?;
    Ok((values.into_pyarray(py), bits, used))
}

/// Encodes an (N, 3) float64 array of vectors.
#[pyfunction]
#[pyo3(signature = (vectors, bits = varfloat::DEFAULT_MANTISSA_BITS))]
fn encode_vec3s<'py>(
    py: Python<'py>,
    vectors: PyReadonlyArray2<'_, f64>,
    bits: u32,
) -> PyResult<&'py PyBytes> {
    if vectors.shape()[1] != 3 {
        return Err(PyValueError::new_err("only 3D is supported"));
    }
    let Ok(flat) = vectors.as_slice() else {
        return Err(PyValueError::new_err("vector array is not in C order"));
    };
    let vs: Vec<Vec3> = flat
        .chunks_exact(3)
        .map(|c| Vec3::new(c[0], c[1], c[2]))
        .collect();
    let bytes = encode_vec3_slice(&vs, bits).map_err(value_error)?;
    Ok(PyBytes::new(py, &bytes))
}

/// Decodes vectors into an (N, 3) array, returning `(array, bytes_consumed)`.
#[pyfunction]
#[pyo3(signature = (data, bits = varfloat::DEFAULT_MANTISSA_BITS))]
fn decode_vec3s<'py>(
    py: Python<'py>,
    data: &[u8],
    bits: u32,
) -> PyResult<(&'py PyArray2<f64>, usize)> {
    let (vs, used) = decode_vec3_slice(data, bits).map_err(value_error)?;
    let flat: Vec<f64> = vs.iter().flat_map(|v| v.to_array()).collect();
    let array = Array2::from_shape_vec((vs.len(), 3), flat)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok((array.into_pyarray(py), used))
}

#[pyfunction]
fn bits_for_max_relative_error(max_rel_err: f64) -> PyResult<u32> {
    varfloat::bits_for_max_relative_error(max_rel_err).map_err(value_error)
}

#[pyfunction]
fn bits_for_int_range(min: i64, max: i64) -> PyResult<u32> {
    varfloat::bits_for_int_range(min, max).map_err(value_error)
}

#[pyfunction]
fn bits_for_int_max_error(min: i64, max: i64, max_abs_err: i64) -> PyResult<u32> {
    varfloat::bits_for_int_max_error(min, max, max_abs_err).map_err(value_error)
}

/// A float codec bound to one mantissa width.
#[pyclass]
pub struct Codec {
    config: Config,
}

#[pymethods]
impl Codec {
    #[new]
    #[pyo3(signature = (bits = varfloat::DEFAULT_MANTISSA_BITS))]
    fn new(bits: u32) -> PyResult<Codec> {
        Ok(Codec {
            config: Config::new(bits).map_err(value_error)?,
        })
    }

    /// Smallest width whose relative error is at most `max_rel_err`.
    #[staticmethod]
    fn for_max_relative_error(max_rel_err: f64) -> PyResult<Codec> {
        Ok(Codec {
            config: Config::from_max_relative_error(max_rel_err).map_err(value_error)?,
        })
    }

    #[getter]
    fn bits(&self) -> u32 {
        self.config.mantissa_bits()
    }

    #[getter]
    fn max_relative_error(&self) -> f64 {
        self.config.max_relative_error()
    }

    fn encode<'py>(&self, py: Python<'py>, value: f64) -> PyResult<&'py PyBytes> {
        let bytes = self.config.encode(value).map_err(value_error)?;
        Ok(PyBytes::new(py, &bytes))
    }

    fn decode(&self, data: &[u8]) -> PyResult<(f64, usize)> {
        self.config.decode(data).map_err(value_error)
    }

    fn encode_array<'py>(
        &self,
        py: Python<'py>,
        values: PyReadonlyArray1<'_, f64>,
    ) -> PyResult<&'py PyBytes> {
        encode_floats(py, values, self.config.mantissa_bits())
    }

    fn decode_array<'py>(
        &self,
        py: Python<'py>,
        data: &[u8],
    ) -> PyResult<(&'py PyArray1<f64>, usize)> {
        decode_floats(py, data, self.config.mantissa_bits())
    }

    fn __repr__(&self) -> String {
        format!("Codec(bits={})", self.config.mantissa_bits())
    }
}

/// Precision-tunable variable-length encoding for floats and bounded integers.
#[pymodule]
fn varfloat_py(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(encode_float, m)?)?;
    m.add_function(wrap_pyfunction!(decode_float, m)?)?;
    m.add_function(wrap_pyfunction!(encode_floats, m)?)?;
    m.add_function(wrap_pyfunction!(decode_floats, m)?)?;
    m.add_function(wrap_pyfunction!(encode_bounded_int, m)?)?;
    m.add_function(wrap_pyfunction!(decode_bounded_int, m)?)?;
    m.add_function(wrap_pyfunction!(encode_bounded_int_array, m)?)?;
    m.add_function(wrap_pyfunction!(decode_bounded_int_array, m)?)?;
    m.add_function(wrap_pyfunction!(encode_vec3s, m)?)?;
    m.add_function(wrap_pyfunction!(decode_vec3s, m)?)?;
    m.add_function(wrap_pyfunction!(bits_for_max_relative_error, m)?)?;
    m.add_function(wrap_pyfunction!(bits_for_int_range, m)?)?;
    m.add_function(wrap_pyfunction!(bits_for_int_max_error, m)?)?;
    m.add_class::<Codec>()?;
    m.add("MAX_MANTISSA_BITS", varfloat::MAX_MANTISSA_BITS)?;
    Ok(())
}
