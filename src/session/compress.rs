// In: src/session/compress.rs

//! The compression session: a single-owner state machine around one
//! `ZSTD_CCtx`.
//!
//! The session re-measures its native footprint after every operation that
//! can resize the context's internal tables (parameter changes, dictionary
//! loads, every (de)compression call) and publishes the delta through the
//! accounting bridge. Parameter values are handed to the engine unvalidated;
//! whether a change is legal in the current phase is the engine's call and
//! its diagnostic is surfaced verbatim.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use crate::accounting::{MemoryGauge, MemoryHost};
use crate::binding::ResourceKind;
use crate::dict::CompiledDictionary;
use crate::error::MampatError;
use crate::kernels::zstd::{map_error_code, zstd_result};
use crate::params::{CParam, EndDirective, ResetDirective};
use crate::session::StreamResult;

/// Where a compression session stands in the streaming protocol.
///
/// Advisory bookkeeping only: the engine enforces call ordering itself, this
/// just lets hosts observe progress. `Accumulating` covers any mid-frame
/// state, including a flush or end that still has output pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressPhase {
    /// No frame in flight.
    Idle,
    /// Mid-frame: input accepted, output pending.
    Accumulating,
    /// A flush completed; everything written so far is decodable.
    FlushedBoundary,
    /// An end directive completed; the frame is closed.
    Finalized,
}

/// A reusable compression session.
pub struct CompressionSession {
    ctx: zstd_safe::CCtx<'static>,
    gauge: MemoryGauge,
    applied: BTreeMap<CParam, i32>,
    pledged: Option<u64>,
    phase: CompressPhase,
}

impl CompressionSession {
    /// Creates a session reporting memory into the process-wide counter.
    pub fn new() -> Result<Self, MampatError> {
        Self::build(MemoryGauge::new(ResourceKind::CompressionSession.name()))
    }

    /// Creates a session reporting memory into a host-supplied counter.
    pub fn with_memory_host(host: Arc<dyn MemoryHost>) -> Result<Self, MampatError> {
        Self::build(MemoryGauge::with_host(
            ResourceKind::CompressionSession.name(),
            host,
        ))
    }

    fn build(gauge: MemoryGauge) -> Result<Self, MampatError> {
        let ctx = zstd_safe::CCtx::try_create().ok_or_else(|| {
            MampatError::AllocationFailed("ZSTD_createCCtx returned null".to_string())
        })?;
        let mut session = CompressionSession {
            ctx,
            gauge,
            applied: BTreeMap::new(),
            pledged: None,
            phase: CompressPhase::Idle,
        };
        session.publish_footprint();
        debug!(
            "compression session created, {} native bytes",
            session.native_size()
        );
        Ok(session)
    }

    /// The resource-kind tag this session carries across the host boundary.
    pub fn kind(&self) -> ResourceKind {
        ResourceKind::CompressionSession
    }

    /// Native bytes currently owned by the engine context
    /// (wraps `ZSTD_sizeof_CCtx`).
    pub fn native_size(&self) -> usize {
        self.ctx.sizeof()
    }

    /// Current streaming phase.
    pub fn phase(&self) -> CompressPhase {
        self.phase
    }

    /// The parameters applied so far (id order), as raw values.
    pub fn parameters(&self) -> &BTreeMap<CParam, i32> {
        &self.applied
    }

    /// The pledged total source size for the frame in flight, if any.
    pub fn pledged_source_size(&self) -> Option<u64> {
        self.pledged
    }

    fn publish_footprint(&mut self) {
        self.gauge.publish(self.ctx.sizeof());
    }

    //==============================================================================
    // Configuration
    //==============================================================================

    /// Sets one compression parameter (wraps `ZSTD_CCtx_setParameter`).
    ///
    /// Only [`compress`](Self::compress) and
    /// [`stream_step`](Self::stream_step) respect these; the level/dictionary
    /// one-shot variants ignore them.
    pub fn set_parameter(&mut self, param: CParam, value: i32) -> Result<(), MampatError> {
        let engine_param = param.to_engine(value)?;
        let ret = self.ctx.set_parameter(engine_param);
        self.publish_footprint();
        match ret {
            Ok(_) => {
                self.applied.insert(param, value);
                Ok(())
            }
            Err(code) => Err(MampatError::InvalidParameter(
                zstd_safe::get_error_name(code).to_string(),
            )),
        }
    }

    /// Declares the total source size of the next frame so the header can
    /// record it (wraps `ZSTD_CCtx_setPledgedSrcSize`). The engine rejects the
    /// call once streaming has begun, and later fails the stream if the
    /// pledge is not honored.
    pub fn set_pledged_source_size(&mut self, size: u64) -> Result<(), MampatError> {
        let ret = self.ctx.set_pledged_src_size(Some(size));
        self.publish_footprint();
        ret.map_err(map_error_code)?;
        self.pledged = Some(size);
        Ok(())
    }

    /// Copies dictionary content into session-private state, superseding any
    /// previously loaded dictionary (wraps `ZSTD_CCtx_loadDictionary`).
    pub fn load_dictionary(&mut self, dict: &[u8]) -> Result<(), MampatError> {
        let ret = self.ctx.load_dictionary(dict);
        self.publish_footprint();
        zstd_result(ret).map(|_| ())
    }

    /// Resets the session (wraps `ZSTD_CCtx_reset`). Idempotent on a fresh
    /// session. Local bookkeeping is only updated when the engine accepts the
    /// directive.
    pub fn reset(&mut self, directive: ResetDirective) -> Result<(), MampatError> {
        let ret = self.ctx.reset(directive.to_engine());
        self.publish_footprint();
        zstd_result(ret)?;
        match directive {
            ResetDirective::SessionOnly => {
                self.phase = CompressPhase::Idle;
                self.pledged = None;
            }
            ResetDirective::Parameters => {
                self.applied.clear();
            }
            ResetDirective::SessionAndParameters => {
                self.phase = CompressPhase::Idle;
                self.pledged = None;
                self.applied.clear();
            }
        }
        Ok(())
    }

    //==============================================================================
    // One-shot compression
    //==============================================================================

    /// Compresses `src` into `dst` as one complete frame, honoring the
    /// applied parameters (wraps `ZSTD_compress2`). Returns bytes written.
    pub fn compress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, MampatError> {
        let ret = self.ctx.compress2(dst, src);
        self.publish_footprint();
        zstd_result(ret)
    }

    /// Compresses at an explicit level, ignoring applied parameters
    /// (wraps `ZSTD_compressCCtx`).
    pub fn compress_with_level(
        &mut self,
        dst: &mut [u8],
        src: &[u8],
        level: i32,
    ) -> Result<usize, MampatError> {
        let ret = self.ctx.compress(dst, src, level);
        self.publish_footprint();
        zstd_result(ret)
    }

    /// Compresses with a one-off dictionary loaded from raw bytes
    /// (wraps `ZSTD_compress_usingDict`). For repeated use, prepare a
    /// [`CompiledDictionary`] instead.
    pub fn compress_with_dict_bytes(
        &mut self,
        dst: &mut [u8],
        src: &[u8],
        dict: &[u8],
        level: i32,
    ) -> Result<usize, MampatError> {
        let ret = self.ctx.compress_using_dict(dst, src, dict, level);
        self.publish_footprint();
        zstd_result(ret)
    }

    /// Compresses with a prepared dictionary, whose load-time level applies
    /// (wraps `ZSTD_compress_usingCDict`). The dictionary is only borrowed
    /// for this call; the session keeps no reference.
    pub fn compress_with_dictionary(
        &mut self,
        dst: &mut [u8],
        src: &[u8],
        dict: &CompiledDictionary,
    ) -> Result<usize, MampatError> {
        let ret = self.ctx.compress_using_cdict(dst, src, dict.as_cdict());
        self.publish_footprint();
        zstd_result(ret)
    }

    //==============================================================================
    // Streaming
    //==============================================================================

    /// Advances the stream by one step (wraps `ZSTD_compressStream2`).
    ///
    /// Consumes as much of `src` and produces as much into `dst` as possible
    /// in this call; never reads or writes beyond the declared slices. The
    /// caller loops — re-slicing `src` by `consumed`, draining `dst` by
    /// `produced` — until the source is exhausted and, for
    /// [`EndDirective::End`], `remaining_hint` is zero.
    pub fn stream_step(
        &mut self,
        dst: &mut [u8],
        src: &[u8],
        directive: EndDirective,
    ) -> Result<StreamResult, MampatError> {
        let mut input = zstd_safe::InBuffer::around(src);
        let mut output = zstd_safe::OutBuffer::around(dst);
        let ret = self
            .ctx
            .compress_stream2(&mut output, &mut input, directive.to_native());
        let produced = output.pos();
        let consumed = input.pos;
        self.publish_footprint();
        let remaining_hint = zstd_result(ret)?;
        self.phase = match directive {
            EndDirective::Continue => CompressPhase::Accumulating,
            EndDirective::Flush if remaining_hint == 0 => CompressPhase::FlushedBoundary,
            EndDirective::End if remaining_hint == 0 => CompressPhase::Finalized,
            _ => CompressPhase::Accumulating,
        };
        Ok(StreamResult {
            remaining_hint,
            produced,
            consumed,
        })
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
