// In: src/kernels/zstd.rs

//! Stateless Zstandard primitives: one-shot (de)compression, destination
//! bounds, compression-level range, library version, and the recommended
//! streaming buffer sizes.
//!
//! This module is a safe, panic-free wrapper around `zstd-safe`. Engine
//! failures come back as numeric codes; they are mapped to [`MampatError`]
//! carrying the engine's own `ZSTD_getErrorName` diagnostic, verbatim, so
//! callers see the same text the native library would print.

use crate::error::MampatError;

//==================================================================================
// 1. Error-code mapping (shared by the stateful layers)
//==================================================================================

/// Translates a raw engine error code into the crate error type.
pub(crate) fn map_error_code(code: zstd_safe::ErrorCode) -> MampatError {
    MampatError::Zstd(zstd_safe::get_error_name(code).to_string())
}

/// Lifts an engine `SafeResult` (byte count or error code) into ours.
pub(crate) fn zstd_result(
    ret: Result<usize, zstd_safe::ErrorCode>,
) -> Result<usize, MampatError> {
    ret.map_err(map_error_code)
}

//==================================================================================
// 2. Version & level introspection
//==================================================================================

/// Returns the native library version as a number (wraps `ZSTD_versionNumber`).
pub fn version_number() -> u32 {
    zstd_safe::version_number()
}

/// Returns the native library version as a string (wraps `ZSTD_versionString`).
pub fn version_string() -> &'static str {
    zstd_safe::version_string()
}

/// Minimum valid compression level (wraps `ZSTD_minCLevel`).
pub fn min_level() -> i32 {
    zstd_safe::min_c_level()
}

/// Maximum valid compression level (wraps `ZSTD_maxCLevel`).
pub fn max_level() -> i32 {
    zstd_safe::max_c_level()
}

/// The level used when a caller does not pick one.
pub fn default_level() -> i32 {
    zstd::DEFAULT_COMPRESSION_LEVEL
}

//==================================================================================
// 3. One-shot stateless API
//==================================================================================

/// Worst-case compressed size for `src_size` input bytes.
///
/// A destination of this size never fails with a too-small error.
pub fn compress_bound(src_size: usize) -> usize {
    zstd_safe::compress_bound(src_size)
}

/// Compresses `src` into `dst` as one complete frame, without any reusable
/// context. Returns the number of bytes written.
pub fn compress(dst: &mut [u8], src: &[u8], level: i32) -> Result<usize, MampatError> {
    zstd_result(zstd_safe::compress(dst, src, level))
}

/// Decompresses `src` (which must end on a frame boundary) into `dst`.
/// Returns the number of bytes written.
pub fn decompress(dst: &mut [u8], src: &[u8]) -> Result<usize, MampatError> {
    zstd_result(zstd_safe::decompress(dst, src))
}

//==================================================================================
// 4. Streaming buffer size hints
//==================================================================================

/// Recommended input buffer size for streaming compression.
pub fn stream_in_size() -> usize {
    zstd_safe::CCtx::in_size()
}

/// Recommended output buffer size for streaming compression.
pub fn stream_out_size() -> usize {
    zstd_safe::CCtx::out_size()
}

/// Recommended input buffer size for streaming decompression.
pub fn dstream_in_size() -> usize {
    zstd_safe::DCtx::in_size()
}

/// Recommended output buffer size for streaming decompression.
pub fn dstream_out_size() -> usize {
    zstd_safe::DCtx::out_size()
}

//==================================================================================
// 5. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_roundtrip() {
        let original = b"hello world, this is a stateless zstd roundtrip. hello again.";

        let mut compressed = vec![0u8; compress_bound(original.len())];
        let written = compress(&mut compressed, original, 3).unwrap();
        compressed.truncate(written);

        let mut decompressed = vec![0u8; original.len()];
        let read = decompress(&mut decompressed, &compressed).unwrap();

        assert_eq!(read, original.len());
        assert_eq!(&decompressed, original);
    }

    #[test]
    fn test_compress_bound_covers_frame_overhead_for_tiny_inputs() {
        // Tiny inputs are the worst case for frame overhead.
        for len in [0usize, 1, 2, 63] {
            let src = vec![0xA5u8; len];
            let mut dst = vec![0u8; compress_bound(len)];
            let written = compress(&mut dst, &src, max_level()).unwrap();
            assert!(written <= dst.len());
        }
    }

    #[test]
    fn test_undersized_destination_reports_engine_error() {
        let src = vec![7u8; 4096];
        let mut dst = vec![0u8; 4]; // Far too small for any frame.
        let err = compress(&mut dst, &src, 3).unwrap_err();
        assert!(matches!(err, MampatError::Zstd(_)));
    }

    #[test]
    fn test_decompress_rejects_garbage() {
        let mut dst = vec![0u8; 64];
        let err = decompress(&mut dst, &[1, 2, 3, 4, 5]).unwrap_err();
        assert!(matches!(err, MampatError::Zstd(_)));
    }

    #[test]
    fn test_level_range_and_version_sanity() {
        assert!(min_level() < 0);
        assert!(max_level() >= 19);
        assert!((min_level()..=max_level()).contains(&default_level()));
        assert!(version_number() >= 10_400); // v1.4.0+, required for the advanced API
        assert!(!version_string().is_empty());
    }

    #[test]
    fn test_stream_size_hints_are_nonzero() {
        assert!(stream_in_size() > 0);
        assert!(stream_out_size() > 0);
        assert!(dstream_in_size() > 0);
        assert!(dstream_out_size() > 0);
    }
}
