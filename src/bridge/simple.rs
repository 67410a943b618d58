// In: src/bridge/simple.rs

//! One-call compression and decompression.
//!
//! Each function drives a lazily-created, thread-local default facade, which
//! keeps the engine-context reuse benefit without any setup on the caller's
//! side. Callers that need dictionaries (or cross-thread reuse) create their
//! own [`Compressor`]/[`Decompressor`] instead.

use std::cell::RefCell;

use crate::bridge::{Compressor, Decompressor};
use crate::config::{CompressOptions, DecompressOptions};
use crate::error::MampatError;

thread_local! {
    static DEFAULT_COMPRESSOR: RefCell<Option<Compressor>> = RefCell::new(None);
    static DEFAULT_DECOMPRESSOR: RefCell<Option<Decompressor>> = RefCell::new(None);
}

/// Compresses `data` into one complete frame with the given options.
pub fn compress(data: &[u8], options: &CompressOptions) -> Result<Vec<u8>, MampatError> {
    DEFAULT_COMPRESSOR.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(Compressor::new()?);
        }
        let compressor = slot.as_mut().expect("default compressor just initialized");
        compressor.set_parameters(options)?;
        compressor.compress(data)
    })
}

/// Decompresses every frame in `data`, concatenated, with the given options.
pub fn decompress(data: &[u8], options: &DecompressOptions) -> Result<Vec<u8>, MampatError> {
    DEFAULT_DECOMPRESSOR.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(Decompressor::new()?);
        }
        let decompressor = slot.as_mut().expect("default decompressor just initialized");
        decompressor.set_parameters(options)?;
        decompressor.decompress(data)
    })
}
