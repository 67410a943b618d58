// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the convenience surface of the mampat library. The session
// layer underneath is deliberately explicit — caller-provided buffers, exact
// streaming steps, engine-verbatim errors — because the host binding needs
// that control. Most embedders don't: they want bytes in, bytes out.
//
// Data Flow (Compression):
//
//   1. [Stateless API (simple::compress)]   -> lazily-created thread-local Compressor
//         |
//   2. [Stateful Facade (Compressor)]       -> sizes the destination via compress_bound,
//         |                                    applies CompressOptions in a batch
//   3. [CompressionSession]                 -> one owned engine context, re-measured
//                                              after every call
//
// Data Flow (Decompression):
//
//   1. [Stateless API (simple::decompress)] -> lazily-created thread-local Decompressor
//         |
//   2. [Stateful Facade (Decompressor)]     -> walks the frame headers for a
//         |                                    content-size fast path, else streams
//   3. [DecompressionSession]               -> one owned engine context
//
// ====================================================================================

pub mod compressor;
pub mod decompressor;
pub mod simple;

// --- High-Level Stateful API ---
pub use compressor::Compressor;
pub use decompressor::Decompressor;

// --- Stateless API (for FFI and one-off callers) ---
pub use simple::{compress, decompress};

#[cfg(test)]
mod tests;
