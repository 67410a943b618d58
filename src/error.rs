// In: src/error.rs

//! This module defines the single, unified error type for the entire mampat
//! library. It uses the `thiserror` crate to provide ergonomic, context-aware
//! error handling.
//!
//! The taxonomy deliberately mirrors the failure points of the binding layer:
//! caller-shape errors are caught before any native call, engine failures
//! carry the engine's own diagnostic text verbatim, and construction failures
//! never leave a half-initialized object behind.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MampatError {
    // =========================================================================
    // === Caller errors (rejected before any native call)
    // =========================================================================
    /// Malformed caller input: an unknown directive id at the host boundary,
    /// a value that cannot be converted, and similar. Raising this guarantees
    /// no partial native mutation happened.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A handle crossed the boundary tagged as one resource kind but was used
    /// as another. Raised before touching native memory.
    #[error("Native handle tag mismatch: expected {expected}, got {actual}")]
    TagMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// An unknown parameter id/name, or the engine rejecting a parameter
    /// id/value for the current session state.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // =========================================================================
    // === Engine-reported errors
    // =========================================================================
    /// Any other Zstandard failure, carrying `ZSTD_getErrorName` text.
    #[error("Zstd operation failed: {0}")]
    Zstd(String),

    /// A native constructor returned null; no object was created.
    #[error("Native allocation failed: {0}")]
    AllocationFailed(String),

    /// A compressed-frame header could not be parsed during introspection.
    #[error("Frame header parse failed: {0}")]
    FrameParse(String),

    // =========================================================================
    // === Host-boundary errors
    // =========================================================================
    /// An error for FFI (Foreign Function Interface) operations.
    #[error("FFI operation failed: {0}")]
    Ffi(String),
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for MampatError {
    fn from(err: pyo3::PyErr) -> Self {
        MampatError::Ffi(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<MampatError> for pyo3::PyErr {
    fn from(err: MampatError) -> pyo3::PyErr {
        match err {
            MampatError::TagMismatch { .. } | MampatError::InvalidArgument(_) => {
                pyo3::exceptions::PyTypeError::new_err(err.to_string())
            }
            _ => pyo3::exceptions::PyValueError::new_err(err.to_string()),
        }
    }
}
