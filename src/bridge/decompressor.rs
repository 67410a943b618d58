// In: src/bridge/decompressor.rs

//! The stateful high-level decompression facade.
//!
//! Sizing the destination is the whole problem here: a frame header may or
//! may not record its content size. When every frame in the input does, the
//! facade allocates exactly once and decompresses in one shot; otherwise it
//! falls back to the streaming protocol with a growth heuristic borrowed from
//! the input size.

use crate::config::DecompressOptions;
use crate::error::MampatError;
use crate::kernels::{frame, zstd as engine};
use crate::params::ResetDirective;
use crate::session::DecompressionSession;

/// Sums the recorded content sizes of every frame in `buffer`, or reports
/// `None` as soon as one frame omits it.
fn total_content_size(buffer: &[u8]) -> Result<Option<u64>, MampatError> {
    let mut total: u64 = 0;
    let mut rest = buffer;
    while !rest.is_empty() {
        match frame::frame_content_size(rest)? {
            None => return Ok(None),
            Some(size) => {
                total = total.checked_add(size).ok_or_else(|| {
                    MampatError::FrameParse("total content size overflows u64".to_string())
                })?;
            }
        }
        let frame_len = frame::find_frame_compressed_size(rest)?;
        rest = &rest[frame_len..];
    }
    Ok(Some(total))
}

/// A reusable, buffer-managing decompressor.
pub struct Decompressor {
    session: DecompressionSession,
}

impl Decompressor {
    /// Creates a decompressor with engine-default parameters.
    pub fn new() -> Result<Self, MampatError> {
        Ok(Decompressor {
            session: DecompressionSession::new()?,
        })
    }

    /// Creates a decompressor and applies an options batch.
    pub fn with_options(options: &DecompressOptions) -> Result<Self, MampatError> {
        let mut decompressor = Decompressor::new()?;
        options.apply(&mut decompressor.session)?;
        Ok(decompressor)
    }

    /// Decompresses every frame in `data`, concatenated.
    pub fn decompress(&mut self, data: &[u8]) -> Result<Vec<u8>, MampatError> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        // Fast path: every frame records its content size.
        if let Some(total) = total_content_size(data)? {
            // TODO: add an allocation ceiling for hostile content-size headers
            let total = usize::try_from(total).map_err(|_| {
                MampatError::InvalidArgument(
                    "content size exceeds addressable memory".to_string(),
                )
            })?;
            let mut out = vec![0u8; total];
            let written = self.session.decompress(&mut out, data)?;
            if written != total {
                return Err(MampatError::Zstd(format!(
                    "decompressed size does not match frame headers: expected {}, got {}",
                    total, written
                )));
            }
            return Ok(out);
        }

        // Fallback: streaming decompression. With the complete input in hand
        // the input length is a usable lower bound on the content size, which
        // saves native calls for everything but extreme ratios.
        let buf_size = engine::dstream_out_size();
        let mut out = Vec::new();
        let mut rest = data;
        let mut last_hint = 0;
        while !rest.is_empty() {
            let mut chunk = vec![0u8; buf_size.max(rest.len())];
            let step = self.session.stream_step(&mut chunk, rest)?;
            if step.consumed == 0 && step.produced == 0 {
                return Err(MampatError::Zstd(
                    "decompression made no progress".to_string(),
                ));
            }
            out.extend_from_slice(&chunk[..step.produced]);
            rest = &rest[step.consumed..];
            last_hint = step.remaining_hint;
        }
        if last_hint != 0 {
            return Err(MampatError::Zstd(
                "input ended in the middle of a frame".to_string(),
            ));
        }
        Ok(out)
    }

    /// Loads a dictionary for subsequent decompress calls.
    pub fn load_dictionary(&mut self, dict: &[u8]) -> Result<(), MampatError> {
        self.session.load_dictionary(dict)
    }

    /// Replaces the whole parameter set: restores engine defaults, then
    /// applies `options`.
    pub fn set_parameters(&mut self, options: &DecompressOptions) -> Result<(), MampatError> {
        self.session.reset(ResetDirective::Parameters)?;
        options.apply(&mut self.session)
    }

    /// Applies `options` on top of the current parameter set.
    pub fn update_parameters(&mut self, options: &DecompressOptions) -> Result<(), MampatError> {
        options.apply(&mut self.session)
    }

    /// Native bytes currently owned by the underlying session.
    pub fn native_size(&self) -> usize {
        self.session.native_size()
    }
}
