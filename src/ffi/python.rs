// In: src/ffi/python.rs

//! The Python face of the binding.
//!
//! Resource classes wrap the core types one-to-one. Methods that accept a
//! prepared dictionary take an untyped object and route it through the
//! resource binding layer, so a wrong-kind object raises the tag-mismatch
//! error instead of being misinterpreted. `__sizeof__` reports the native
//! footprint so Python-side tooling sees the real cost of a wrapper.

use std::fs::OpenOptions;
use std::sync::Once;

use log::LevelFilter;
use pyo3::prelude::*;
use pyo3::types::{PyByteArray, PyBytes};

use crate::accounting;
use crate::binding::{BoundResource, ResourceKind};
use crate::bridge;
use crate::config::{CompressOptions, DecompressOptions};
use crate::dict::{train_dictionary, CompiledDictionary, DecompressDictionary};
use crate::error::MampatError;
use crate::kernels::{frame, zstd as engine};
use crate::params::{
    c_param_bounds, d_param_bounds, CParam, DParam, EndDirective, ResetDirective,
};
use crate::session::{CompressionSession, DecompressionSession};

//==================================================================================
// I. Boundary helpers
//==================================================================================

/// A mampat resource received as an untyped Python object, pinned for the
/// duration of one call.
enum PyBound<'p> {
    CompressionSession(PyRef<'p, PyCompressionSession>),
    DecompressionSession(PyRef<'p, PyDecompressionSession>),
    CompiledDictionary(PyRef<'p, PyCompiledDictionary>),
    DecompressDictionary(PyRef<'p, PyDecompressDictionary>),
}

impl<'p> PyBound<'p> {
    fn of(obj: &'p PyAny) -> Option<Self> {
        if let Ok(r) = obj.extract::<PyRef<PyCompressionSession>>() {
            return Some(PyBound::CompressionSession(r));
        }
        if let Ok(r) = obj.extract::<PyRef<PyDecompressionSession>>() {
            return Some(PyBound::DecompressionSession(r));
        }
        if let Ok(r) = obj.extract::<PyRef<PyCompiledDictionary>>() {
            return Some(PyBound::CompiledDictionary(r));
        }
        if let Ok(r) = obj.extract::<PyRef<PyDecompressDictionary>>() {
            return Some(PyBound::DecompressDictionary(r));
        }
        None
    }

    /// The type-erased handle the core binding layer verifies.
    fn as_resource(&self) -> BoundResource<'_> {
        match self {
            PyBound::CompressionSession(r) => BoundResource::CompressionSession(&r.inner),
            PyBound::DecompressionSession(r) => BoundResource::DecompressionSession(&r.inner),
            PyBound::CompiledDictionary(r) => BoundResource::CompiledDictionary(&r.inner),
            PyBound::DecompressDictionary(r) => BoundResource::DecompressDictionary(&r.inner),
        }
    }
}

fn bind_resource<'p>(obj: &'p PyAny, expected: ResourceKind) -> PyResult<PyBound<'p>> {
    PyBound::of(obj).ok_or_else(|| {
        MampatError::TagMismatch {
            expected: expected.name(),
            actual: "foreign object",
        }
        .into()
    })
}

fn parse_reset_directive(id: i32) -> Result<ResetDirective, MampatError> {
    ResetDirective::from_id(id)
        .ok_or_else(|| MampatError::InvalidArgument(format!("unknown reset directive id {}", id)))
}

//==================================================================================
// II. Resource classes
//==================================================================================

#[pyclass(name = "CompressionSession", module = "mampat_zstd")]
pub struct PyCompressionSession {
    pub(crate) inner: CompressionSession,
}

#[pymethods]
impl PyCompressionSession {
    #[new]
    fn new() -> PyResult<Self> {
        Ok(PyCompressionSession {
            inner: CompressionSession::new()?,
        })
    }

    fn set_parameter(&mut self, param: i32, value: i32) -> PyResult<()> {
        let param = CParam::from_id(param).ok_or_else(|| {
            MampatError::InvalidParameter(format!("unknown compression parameter id {}", param))
        })?;
        Ok(self.inner.set_parameter(param, value)?)
    }

    fn set_pledged_source_size(&mut self, size: u64) -> PyResult<()> {
        Ok(self.inner.set_pledged_source_size(size)?)
    }

    fn load_dictionary(&mut self, dict: &[u8]) -> PyResult<()> {
        Ok(self.inner.load_dictionary(dict)?)
    }

    fn reset(&mut self, directive: i32) -> PyResult<()> {
        Ok(self.inner.reset(parse_reset_directive(directive)?)?)
    }

    /// One-shot compression. With `level` set, ignores applied parameters;
    /// otherwise honors them.
    #[pyo3(signature = (src, level = None))]
    fn compress<'py>(
        &mut self,
        py: Python<'py>,
        src: &[u8],
        level: Option<i32>,
    ) -> PyResult<&'py PyBytes> {
        let mut dst = vec![0u8; engine::compress_bound(src.len())];
        let written = match level {
            Some(level) => self.inner.compress_with_level(&mut dst, src, level)?,
            None => self.inner.compress(&mut dst, src)?,
        };
        Ok(PyBytes::new(py, &dst[..written]))
    }

    fn compress_using_dict<'py>(
        &mut self,
        py: Python<'py>,
        src: &[u8],
        dict: &[u8],
        level: i32,
    ) -> PyResult<&'py PyBytes> {
        let mut dst = vec![0u8; engine::compress_bound(src.len())];
        let written = self
            .inner
            .compress_with_dict_bytes(&mut dst, src, dict, level)?;
        Ok(PyBytes::new(py, &dst[..written]))
    }

    fn compress_using_cdict<'py>(
        &mut self,
        py: Python<'py>,
        src: &[u8],
        dict: &PyAny,
    ) -> PyResult<&'py PyBytes> {
        let bound = bind_resource(dict, ResourceKind::CompiledDictionary)?;
        let resource = bound.as_resource();
        let cdict = resource.as_compiled_dictionary()?;

        let mut dst = vec![0u8; engine::compress_bound(src.len())];
        let written = self.inner.compress_with_dictionary(&mut dst, src, cdict)?;
        Ok(PyBytes::new(py, &dst[..written]))
    }

    /// One streaming step. Returns `(remaining_hint, produced, consumed)`.
    fn stream_step(
        &mut self,
        dst: &PyByteArray,
        src: &[u8],
        end_directive: i32,
    ) -> PyResult<(usize, usize, usize)> {
        let directive = EndDirective::from_id(end_directive).ok_or_else(|| {
            MampatError::InvalidArgument(format!("unknown end directive id {}", end_directive))
        })?;
        // SAFETY: no Python code runs while this borrow is held.
        let dst_slice = unsafe { dst.as_bytes_mut() };
        let step = self.inner.stream_step(dst_slice, src, directive)?;
        Ok((step.remaining_hint, step.produced, step.consumed))
    }

    fn native_size(&self) -> usize {
        self.inner.native_size()
    }

    fn __sizeof__(&self) -> usize {
        std::mem::size_of::<Self>() + self.inner.native_size()
    }
}

#[pyclass(name = "DecompressionSession", module = "mampat_zstd")]
pub struct PyDecompressionSession {
    pub(crate) inner: DecompressionSession,
}

#[pymethods]
impl PyDecompressionSession {
    #[new]
    fn new() -> PyResult<Self> {
        Ok(PyDecompressionSession {
            inner: DecompressionSession::new()?,
        })
    }

    fn set_parameter(&mut self, param: i32, value: i32) -> PyResult<()> {
        let param = DParam::from_id(param).ok_or_else(|| {
            MampatError::InvalidParameter(format!("unknown decompression parameter id {}", param))
        })?;
        Ok(self.inner.set_parameter(param, value)?)
    }

    fn load_dictionary(&mut self, dict: &[u8]) -> PyResult<()> {
        Ok(self.inner.load_dictionary(dict)?)
    }

    fn reset(&mut self, directive: i32) -> PyResult<()> {
        Ok(self.inner.reset(parse_reset_directive(directive)?)?)
    }

    /// One-shot decompression into a caller-sized destination.
    fn decompress<'py>(
        &mut self,
        py: Python<'py>,
        src: &[u8],
        dst_capacity: usize,
    ) -> PyResult<&'py PyBytes> {
        let mut dst = vec![0u8; dst_capacity];
        let written = self.inner.decompress(&mut dst, src)?;
        Ok(PyBytes::new(py, &dst[..written]))
    }

    fn decompress_using_dict<'py>(
        &mut self,
        py: Python<'py>,
        src: &[u8],
        dict: &[u8],
        dst_capacity: usize,
    ) -> PyResult<&'py PyBytes> {
        let mut dst = vec![0u8; dst_capacity];
        let written = self
            .inner
            .decompress_with_dict_bytes(&mut dst, src, dict)?;
        Ok(PyBytes::new(py, &dst[..written]))
    }

    fn decompress_using_ddict<'py>(
        &mut self,
        py: Python<'py>,
        src: &[u8],
        dict: &PyAny,
        dst_capacity: usize,
    ) -> PyResult<&'py PyBytes> {
        let bound = bind_resource(dict, ResourceKind::DecompressDictionary)?;
        let resource = bound.as_resource();
        let ddict = resource.as_decompress_dictionary()?;

        let mut dst = vec![0u8; dst_capacity];
        let written = self
            .inner
            .decompress_with_dictionary(&mut dst, src, ddict)?;
        Ok(PyBytes::new(py, &dst[..written]))
    }

    /// One streaming step. Returns `(remaining_hint, produced, consumed)`.
    fn stream_step(&mut self, dst: &PyByteArray, src: &[u8]) -> PyResult<(usize, usize, usize)> {
        // SAFETY: no Python code runs while this borrow is held.
        let dst_slice = unsafe { dst.as_bytes_mut() };
        let step = self.inner.stream_step(dst_slice, src)?;
        Ok((step.remaining_hint, step.produced, step.consumed))
    }

    fn native_size(&self) -> usize {
        self.inner.native_size()
    }

    fn __sizeof__(&self) -> usize {
        std::mem::size_of::<Self>() + self.inner.native_size()
    }
}

#[pyclass(name = "CompiledDictionary", module = "mampat_zstd")]
pub struct PyCompiledDictionary {
    pub(crate) inner: CompiledDictionary,
}

#[pymethods]
impl PyCompiledDictionary {
    #[new]
    fn new(dict: &[u8], level: i32) -> PyResult<Self> {
        Ok(PyCompiledDictionary {
            inner: CompiledDictionary::new(dict, level)?,
        })
    }

    fn dictionary_id(&self) -> u32 {
        self.inner.dictionary_id()
    }

    fn level(&self) -> i32 {
        self.inner.level()
    }

    fn native_size(&self) -> usize {
        self.inner.native_size()
    }

    fn __sizeof__(&self) -> usize {
        std::mem::size_of::<Self>() + self.inner.native_size()
    }
}

#[pyclass(name = "DecompressDictionary", module = "mampat_zstd")]
pub struct PyDecompressDictionary {
    pub(crate) inner: DecompressDictionary,
}

#[pymethods]
impl PyDecompressDictionary {
    #[new]
    fn new(dict: &[u8]) -> PyResult<Self> {
        Ok(PyDecompressDictionary {
            inner: DecompressDictionary::new(dict)?,
        })
    }

    fn dictionary_id(&self) -> u32 {
        self.inner.dictionary_id()
    }

    fn native_size(&self) -> usize {
        self.inner.native_size()
    }

    fn __sizeof__(&self) -> usize {
        std::mem::size_of::<Self>() + self.inner.native_size()
    }
}

//==================================================================================
// III. Stateless module functions
//==================================================================================

#[pyfunction]
#[pyo3(name = "compress", signature = (src, level = None))]
pub fn compress_py<'py>(
    py: Python<'py>,
    src: &[u8],
    level: Option<i32>,
) -> PyResult<&'py PyBytes> {
    let options = CompressOptions {
        compression_level: level,
        ..Default::default()
    };
    let compressed = bridge::compress(src, &options)?;
    Ok(PyBytes::new(py, &compressed))
}

#[pyfunction]
#[pyo3(name = "decompress")]
pub fn decompress_py<'py>(py: Python<'py>, src: &[u8]) -> PyResult<&'py PyBytes> {
    let restored = bridge::decompress(src, &DecompressOptions::default())?;
    Ok(PyBytes::new(py, &restored))
}

#[pyfunction]
#[pyo3(name = "compress_bound")]
pub fn compress_bound_py(src_size: usize) -> usize {
    engine::compress_bound(src_size)
}

#[pyfunction]
#[pyo3(name = "min_level")]
pub fn min_level_py() -> i32 {
    engine::min_level()
}

#[pyfunction]
#[pyo3(name = "max_level")]
pub fn max_level_py() -> i32 {
    engine::max_level()
}

#[pyfunction]
#[pyo3(name = "default_level")]
pub fn default_level_py() -> i32 {
    engine::default_level()
}

#[pyfunction]
#[pyo3(name = "version_number")]
pub fn version_number_py() -> u32 {
    engine::version_number()
}

#[pyfunction]
#[pyo3(name = "version_string")]
pub fn version_string_py() -> &'static str {
    engine::version_string()
}

#[pyfunction]
#[pyo3(name = "frame_content_size")]
pub fn frame_content_size_py(frame_buf: &[u8]) -> PyResult<Option<u64>> {
    Ok(frame::frame_content_size(frame_buf)?)
}

#[pyfunction]
#[pyo3(name = "find_frame_compressed_size")]
pub fn find_frame_compressed_size_py(frame_buf: &[u8]) -> PyResult<usize> {
    Ok(frame::find_frame_compressed_size(frame_buf)?)
}

#[pyfunction]
#[pyo3(name = "dict_id_from_dict")]
pub fn dict_id_from_dict_py(dict_buf: &[u8]) -> u32 {
    frame::dict_id_from_dict(dict_buf)
}

#[pyfunction]
#[pyo3(name = "dict_id_from_frame")]
pub fn dict_id_from_frame_py(frame_buf: &[u8]) -> u32 {
    frame::dict_id_from_frame(frame_buf)
}

#[pyfunction]
#[pyo3(name = "c_param_bounds")]
pub fn c_param_bounds_py(param: i32) -> PyResult<(i32, i32)> {
    let param = CParam::from_id(param).ok_or_else(|| {
        MampatError::InvalidParameter(format!("unknown compression parameter id {}", param))
    })?;
    let bounds = c_param_bounds(param)?;
    Ok((bounds.lower_bound, bounds.upper_bound))
}

#[pyfunction]
#[pyo3(name = "d_param_bounds")]
pub fn d_param_bounds_py(param: i32) -> PyResult<(i32, i32)> {
    let param = DParam::from_id(param).ok_or_else(|| {
        MampatError::InvalidParameter(format!("unknown decompression parameter id {}", param))
    })?;
    let bounds = d_param_bounds(param)?;
    Ok((bounds.lower_bound, bounds.upper_bound))
}

#[pyfunction]
#[pyo3(name = "train_dictionary")]
pub fn train_dictionary_py<'py>(
    py: Python<'py>,
    samples: Vec<Vec<u8>>,
    max_size: usize,
) -> PyResult<&'py PyBytes> {
    let dict = train_dictionary(&samples, max_size)?;
    Ok(PyBytes::new(py, &dict))
}

#[pyfunction]
#[pyo3(name = "stream_in_size")]
pub fn stream_in_size_py() -> usize {
    engine::stream_in_size()
}

#[pyfunction]
#[pyo3(name = "stream_out_size")]
pub fn stream_out_size_py() -> usize {
    engine::stream_out_size()
}

#[pyfunction]
#[pyo3(name = "dstream_in_size")]
pub fn dstream_in_size_py() -> usize {
    engine::dstream_in_size()
}

#[pyfunction]
#[pyo3(name = "dstream_out_size")]
pub fn dstream_out_size_py() -> usize {
    engine::dstream_out_size()
}

#[pyfunction]
#[pyo3(name = "external_memory")]
pub fn external_memory_py() -> i64 {
    accounting::external_memory_bytes()
}

//==================================================================================
// IV. Logging
//==================================================================================

static INIT_LOGGER: Once = Once::new();

#[pyfunction]
#[pyo3(name = "enable_verbose_logging", signature = (log_file = None))]
pub fn enable_verbose_logging_py(log_file: Option<String>) -> PyResult<()> {
    let mut opened: PyResult<()> = Ok(());
    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(LevelFilter::Trace);

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(filename) = log_file {
            match OpenOptions::new().append(true).create(true).open(&filename) {
                Ok(file) => {
                    builder.target(env_logger::Target::Pipe(Box::new(file)));
                }
                Err(e) => {
                    opened = Err(MampatError::Ffi(format!(
                        "could not open log file {}: {}",
                        filename, e
                    ))
                    .into());
                    return;
                }
            }
        }

        let _ = builder.try_init();
    });
    opened
}
