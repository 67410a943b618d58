// In: src/kernels/frame.rs

//! Frame introspection: reading a Zstandard frame header without
//! decompressing anything.
//!
//! These entry points are not surfaced by `zstd-safe` in the shape the
//! binding needs (sentinel-free content size, dictionary IDs from raw
//! buffers), so this module calls `zstd-sys` directly. Each call only reads
//! within the bounds of the given slice.

use std::ffi::c_void;

use crate::error::MampatError;

//==================================================================================
// 1. Frame magic constants
//==================================================================================

/// Magic number opening every Zstandard frame (`ZSTD_MAGICNUMBER`).
pub const MAGICNUMBER: u32 = 0xFD2F_B528;

/// Magic number opening a Zstandard dictionary (`ZSTD_MAGIC_DICTIONARY`).
pub const MAGIC_DICTIONARY: u32 = 0xEC30_A437;

/// First magic number of the skippable-frame range (`ZSTD_MAGIC_SKIPPABLE_START`).
pub const MAGIC_SKIPPABLE_START: u32 = 0x184D_2A50;

/// Mask selecting the skippable-frame magic range (`ZSTD_MAGIC_SKIPPABLE_MASK`).
pub const MAGIC_SKIPPABLE_MASK: u32 = 0xFFFF_FFF0;

// `ZSTD_getFrameContentSize` sentinels; the header defines them as 0ULL-1 and
// 0ULL-2.
const CONTENTSIZE_UNKNOWN: u64 = u64::MAX;
const CONTENTSIZE_ERROR: u64 = u64::MAX - 1;

//==================================================================================
// 2. Introspection calls
//==================================================================================

/// Reads the decompressed content size recorded in a frame header.
///
/// Returns `Ok(Some(size))` when the header carries a size, `Ok(None)` when
/// the frame was produced without one (streaming without a pledged size), and
/// a [`MampatError::FrameParse`] when the buffer does not start with a valid
/// frame header. Wraps `ZSTD_getFrameContentSize`.
pub fn frame_content_size(frame: &[u8]) -> Result<Option<u64>, MampatError> {
    // SAFETY: the engine reads at most `frame.len()` bytes from the pointer.
    let raw = unsafe {
        zstd_sys::ZSTD_getFrameContentSize(frame.as_ptr() as *const c_void, frame.len())
    };
    match raw as u64 {
        CONTENTSIZE_UNKNOWN => Ok(None),
        CONTENTSIZE_ERROR => Err(MampatError::FrameParse(
            "could not parse Zstandard frame header".to_string(),
        )),
        size => Ok(Some(size)),
    }
}

/// Returns the compressed size of the first complete frame in `frame`.
///
/// Wraps `ZSTD_findFrameCompressedSize`; the buffer must contain at least one
/// whole frame.
pub fn find_frame_compressed_size(frame: &[u8]) -> Result<usize, MampatError> {
    // SAFETY: the engine reads at most `frame.len()` bytes from the pointer.
    let ret = unsafe {
        zstd_sys::ZSTD_findFrameCompressedSize(frame.as_ptr() as *const c_void, frame.len())
    };
    // SAFETY: ZSTD_isError only inspects the code value.
    if unsafe { zstd_sys::ZSTD_isError(ret) } != 0 {
        return Err(MampatError::FrameParse(
            zstd_safe::get_error_name(ret).to_string(),
        ));
    }
    Ok(ret)
}

/// Returns the dictionary ID embedded in a dictionary buffer, or 0 for raw
/// content (or non-dictionary) bytes. Wraps `ZSTD_getDictID_fromDict`.
pub fn dict_id_from_dict(dict: &[u8]) -> u32 {
    // SAFETY: the engine reads at most `dict.len()` bytes from the pointer.
    unsafe { zstd_sys::ZSTD_getDictID_fromDict(dict.as_ptr() as *const c_void, dict.len()) }
}

/// Returns the dictionary ID recorded in a frame header, or 0 when the frame
/// does not name one (or the header is not valid). Wraps
/// `ZSTD_getDictID_fromFrame`.
pub fn dict_id_from_frame(frame: &[u8]) -> u32 {
    // SAFETY: the engine reads at most `frame.len()` bytes from the pointer.
    unsafe { zstd_sys::ZSTD_getDictID_fromFrame(frame.as_ptr() as *const c_void, frame.len()) }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
