// In: src/kernels/mod.rs

//! Pure, stateless wrappers over the native Zstandard engine.
//!
//! Everything in here is a thin, panic-free facade: no session state, no
//! memory accounting, no resource ownership. Stateful concerns live in
//! `session` and `dict`; these kernels are the only other modules that talk
//! to the engine crates directly.

pub mod frame;
pub mod zstd;
