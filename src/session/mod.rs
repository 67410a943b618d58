// In: src/session/mod.rs

//! Stateful (de)compression sessions.
//!
//! A session exclusively owns one native engine context and drives it through
//! configuration, one-shot calls and the chunked streaming protocol. The
//! context is mutated in place and is not internally synchronized, so every
//! operation takes `&mut self`: exclusive access for the session's lifetime
//! is enforced at compile time. Sessions are `Send`; callers needing
//! non-blocking behavior dispatch a session to a dedicated worker thread.

pub mod compress;
pub mod decompress;

pub use compress::{CompressPhase, CompressionSession};
pub use decompress::{DecompressPhase, DecompressionSession};

/// Composite result of one streaming step.
///
/// A streaming call consumes as much of the source as it can and produces as
/// much output as fits the destination; the caller loops, re-slicing both
/// buffers, until the source is exhausted and (for an `End` directive)
/// `remaining_hint` reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamResult {
    /// The engine's lower-bound estimate of output still to be written before
    /// the current flush/end completes (compression), or an input-size hint
    /// with 0 meaning "frame fully decoded" (decompression).
    pub remaining_hint: usize,
    /// Bytes written into the destination by this call.
    pub produced: usize,
    /// Bytes read from the source by this call.
    pub consumed: usize,
}
