//! This file is the root of the `mampat_zstd` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library (`session`,
//!     `dict`, `bridge`, etc.) so the Rust compiler knows they exist.
//! 2.  Defining the `#[pymodule]` entry point used when the compiled library
//!     is imported into Python (feature `python`).

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod accounting;
pub mod binding;
pub mod bridge;
pub mod config;
pub mod dict;
pub mod error;
pub mod kernels;
pub mod params;
pub mod session;

#[cfg(feature = "python")]
mod ffi;

//==================================================================================
// 2. Python Module Definition
//==================================================================================
#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The `mampat_zstd` Python module, containing all exposed Rust functions.
#[cfg(feature = "python")]
#[pymodule]
fn mampat_zstd(py: Python, m: &PyModule) -> PyResult<()> {
    use ffi::python;

    // --- Resource classes ---
    m.add_class::<python::PyCompressionSession>()?;
    m.add_class::<python::PyDecompressionSession>()?;
    m.add_class::<python::PyCompiledDictionary>()?;
    m.add_class::<python::PyDecompressDictionary>()?;

    // --- Stateless surface ---
    m.add_function(wrap_pyfunction!(python::compress_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::decompress_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::compress_bound_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::min_level_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::max_level_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::default_level_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::version_number_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::version_string_py, m)?)?;

    // --- Frame introspection ---
    m.add_function(wrap_pyfunction!(python::frame_content_size_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::find_frame_compressed_size_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::dict_id_from_dict_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::dict_id_from_frame_py, m)?)?;

    // --- Parameter tables & bounds ---
    m.add_function(wrap_pyfunction!(python::c_param_bounds_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::d_param_bounds_py, m)?)?;

    // --- Dictionary training ---
    m.add_function(wrap_pyfunction!(python::train_dictionary_py, m)?)?;

    // --- Streaming buffer size hints ---
    m.add_function(wrap_pyfunction!(python::stream_in_size_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::stream_out_size_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::dstream_in_size_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::dstream_out_size_py, m)?)?;

    // --- Memory accounting & logging ---
    m.add_function(wrap_pyfunction!(python::external_memory_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::enable_verbose_logging_py, m)?)?;

    // --- Expose the custom error type ---
    m.add("MampatError", py.get_type::<pyo3::exceptions::PyValueError>())?;

    // --- Expose version string as a module attribute ---
    m.add("__version__", VERSION)?;

    Ok(())
}
