// In: src/binding.rs

//! The resource binding layer: kind tags for every native handle that crosses
//! the host boundary.
//!
//! Within Rust the type system keeps a `CompiledDictionary` from being used
//! as a session. At the host boundary that guarantee disappears — a dynamic
//! host hands back opaque objects — so every wrapper carries a
//! [`ResourceKind`] tag, and any operation that needs a specific kind goes
//! through [`BoundResource`], whose typed accessors verify the tag and fail
//! with a tag-mismatch error before any native memory is interpreted.
//!
//! Release-exactly-once is owned by the wrapper types themselves: each native
//! handle lives in exactly one wrapper whose `Drop` frees it, and a failed
//! constructor yields no wrapper at all, so teardown never sees a
//! half-initialized object.

use std::fmt;

use crate::dict::{CompiledDictionary, DecompressDictionary};
use crate::error::MampatError;
use crate::session::{CompressionSession, DecompressionSession};

//==================================================================================
// I. Kind tags
//==================================================================================

/// The closed set of native resource kinds managed by this library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceKind {
    CompressionSession,
    DecompressionSession,
    CompiledDictionary,
    DecompressDictionary,
}

impl ResourceKind {
    /// Stable tag name, used in accounting labels and mismatch diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::CompressionSession => "CompressionSession",
            ResourceKind::DecompressionSession => "DecompressionSession",
            ResourceKind::CompiledDictionary => "CompiledDictionary",
            ResourceKind::DecompressDictionary => "DecompressDictionary",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//==================================================================================
// II. Type-erased handles
//==================================================================================

/// A type-erased reference to a live native resource, as received from the
/// host boundary.
///
/// Hosts that pass resources dynamically (the FFI layer, embedders with their
/// own object models) wrap them in this enum; the `as_*` accessors are the
/// single place a tag is rechecked before the underlying handle is used as a
/// specific kind.
pub enum BoundResource<'a> {
    CompressionSession(&'a CompressionSession),
    DecompressionSession(&'a DecompressionSession),
    CompiledDictionary(&'a CompiledDictionary),
    DecompressDictionary(&'a DecompressDictionary),
}

impl<'a> BoundResource<'a> {
    /// The tag recorded when the resource was created.
    pub fn kind(&self) -> ResourceKind {
        match self {
            BoundResource::CompressionSession(_) => ResourceKind::CompressionSession,
            BoundResource::DecompressionSession(_) => ResourceKind::DecompressionSession,
            BoundResource::CompiledDictionary(_) => ResourceKind::CompiledDictionary,
            BoundResource::DecompressDictionary(_) => ResourceKind::DecompressDictionary,
        }
    }

    /// Native bytes owned by the resource, whatever its kind.
    pub fn native_size(&self) -> usize {
        match self {
            BoundResource::CompressionSession(s) => s.native_size(),
            BoundResource::DecompressionSession(s) => s.native_size(),
            BoundResource::CompiledDictionary(d) => d.native_size(),
            BoundResource::DecompressDictionary(d) => d.native_size(),
        }
    }

    fn mismatch(&self, expected: ResourceKind) -> MampatError {
        MampatError::TagMismatch {
            expected: expected.name(),
            actual: self.kind().name(),
        }
    }

    /// Unwraps as a compression session, verifying the tag first.
    pub fn as_compression_session(&self) -> Result<&'a CompressionSession, MampatError> {
        match self {
            BoundResource::CompressionSession(s) => Ok(s),
            _ => Err(self.mismatch(ResourceKind::CompressionSession)),
        }
    }

    /// Unwraps as a decompression session, verifying the tag first.
    pub fn as_decompression_session(&self) -> Result<&'a DecompressionSession, MampatError> {
        match self {
            BoundResource::DecompressionSession(s) => Ok(s),
            _ => Err(self.mismatch(ResourceKind::DecompressionSession)),
        }
    }

    /// Unwraps as a compiled (compression) dictionary, verifying the tag
    /// first.
    pub fn as_compiled_dictionary(&self) -> Result<&'a CompiledDictionary, MampatError> {
        match self {
            BoundResource::CompiledDictionary(d) => Ok(d),
            _ => Err(self.mismatch(ResourceKind::CompiledDictionary)),
        }
    }

    /// Unwraps as a decompression dictionary, verifying the tag first.
    pub fn as_decompress_dictionary(&self) -> Result<&'a DecompressDictionary, MampatError> {
        match self {
            BoundResource::DecompressDictionary(d) => Ok(d),
            _ => Err(self.mismatch(ResourceKind::DecompressDictionary)),
        }
    }
}

//==================================================================================
// III. Unit Tests
//==================================================================================
