// In: src/bridge/compressor.rs

//! The stateful high-level compression facade.
//!
//! Owns one [`CompressionSession`] and reuses it across calls, which is where
//! the engine's context reuse pays off. Destinations are sized with
//! `compress_bound`, so a compress call can only fail on an engine-internal
//! error, never on destination size.

use crate::config::CompressOptions;
use crate::error::MampatError;
use crate::kernels::zstd as engine;
use crate::params::ResetDirective;
use crate::session::CompressionSession;

/// A reusable, buffer-managing compressor.
pub struct Compressor {
    session: CompressionSession,
}

impl Compressor {
    /// Creates a compressor with engine-default parameters.
    pub fn new() -> Result<Self, MampatError> {
        Ok(Compressor {
            session: CompressionSession::new()?,
        })
    }

    /// Creates a compressor and applies an options batch.
    pub fn with_options(options: &CompressOptions) -> Result<Self, MampatError> {
        let mut compressor = Compressor::new()?;
        options.apply(&mut compressor.session)?;
        Ok(compressor)
    }

    /// Compresses `data` into one complete frame, honoring the applied
    /// parameters.
    pub fn compress(&mut self, data: &[u8]) -> Result<Vec<u8>, MampatError> {
        let mut dst = vec![0u8; engine::compress_bound(data.len())];
        let written = self.session.compress(&mut dst, data)?;
        dst.truncate(written);
        Ok(dst)
    }

    /// Loads a dictionary for subsequent compress calls. The parameters get
    /// locked in on the next compress operation and cleared again by
    /// [`set_parameters`](Self::set_parameters).
    pub fn load_dictionary(&mut self, dict: &[u8]) -> Result<(), MampatError> {
        self.session.load_dictionary(dict)
    }

    /// Replaces the whole parameter set: restores engine defaults, then
    /// applies `options`.
    pub fn set_parameters(&mut self, options: &CompressOptions) -> Result<(), MampatError> {
        self.session.reset(ResetDirective::Parameters)?;
        options.apply(&mut self.session)
    }

    /// Applies `options` on top of the current parameter set.
    pub fn update_parameters(&mut self, options: &CompressOptions) -> Result<(), MampatError> {
        options.apply(&mut self.session)
    }

    /// Native bytes currently owned by the underlying session.
    pub fn native_size(&self) -> usize {
        self.session.native_size()
    }
}
