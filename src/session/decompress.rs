// In: src/session/decompress.rs

//! The decompression session: a single-owner state machine around one
//! `ZSTD_DCtx`.
//!
//! Same protocol as the compression side — footprint republished after every
//! native call, parameter validation deferred to the engine — with a simpler
//! streaming surface: there is no end directive, the engine detects frame
//! boundaries itself.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use crate::accounting::{MemoryGauge, MemoryHost};
use crate::binding::ResourceKind;
use crate::dict::DecompressDictionary;
use crate::error::MampatError;
use crate::kernels::zstd::zstd_result;
use crate::params::{DParam, ResetDirective};
use crate::session::StreamResult;

/// Where a decompression session stands in the streaming protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressPhase {
    /// No frame in flight; the next input byte starts a new frame.
    Idle,
    /// Mid-frame: more input (or output room) is needed.
    Consuming,
}

/// A reusable decompression session.
pub struct DecompressionSession {
    ctx: zstd_safe::DCtx<'static>,
    gauge: MemoryGauge,
    applied: BTreeMap<DParam, i32>,
    phase: DecompressPhase,
}

impl DecompressionSession {
    /// Creates a session reporting memory into the process-wide counter.
    pub fn new() -> Result<Self, MampatError> {
        Self::build(MemoryGauge::new(ResourceKind::DecompressionSession.name()))
    }

    /// Creates a session reporting memory into a host-supplied counter.
    pub fn with_memory_host(host: Arc<dyn MemoryHost>) -> Result<Self, MampatError> {
        Self::build(MemoryGauge::with_host(
            ResourceKind::DecompressionSession.name(),
            host,
        ))
    }

    fn build(gauge: MemoryGauge) -> Result<Self, MampatError> {
        let ctx = zstd_safe::DCtx::try_create().ok_or_else(|| {
            MampatError::AllocationFailed("ZSTD_createDCtx returned null".to_string())
        })?;
        let mut session = DecompressionSession {
            ctx,
            gauge,
            applied: BTreeMap::new(),
            phase: DecompressPhase::Idle,
        };
        session.publish_footprint();
        debug!(
            "decompression session created, {} native bytes",
            session.native_size()
        );
        Ok(session)
    }

    /// The resource-kind tag this session carries across the host boundary.
    pub fn kind(&self) -> ResourceKind {
        ResourceKind::DecompressionSession
    }

    /// Native bytes currently owned by the engine context
    /// (wraps `ZSTD_sizeof_DCtx`).
    pub fn native_size(&self) -> usize {
        self.ctx.sizeof()
    }

    /// Current streaming phase.
    pub fn phase(&self) -> DecompressPhase {
        self.phase
    }

    /// The parameters applied so far, as raw values.
    pub fn parameters(&self) -> &BTreeMap<DParam, i32> {
        &self.applied
    }

    fn publish_footprint(&mut self) {
        self.gauge.publish(self.ctx.sizeof());
    }

    //==============================================================================
    // Configuration
    //==============================================================================

    /// Sets one decompression parameter (wraps `ZSTD_DCtx_setParameter`).
    pub fn set_parameter(&mut self, param: DParam, value: i32) -> Result<(), MampatError> {
        let ret = self.ctx.set_parameter(param.to_engine(value));
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

    /// Copies dictionary content into session-private state, superseding any
    /// previously loaded dictionary (wraps `ZSTD_DCtx_loadDictionary`).
    pub fn load_dictionary(&mut self, dict: &[u8]) -> Result<(), MampatError> {
        let ret = self.ctx.load_dictionary(dict);
        self.publish_footprint();
        zstd_result(ret).map(|_| ())
    }

    /// Resets the session (wraps `ZSTD_DCtx_reset`). Idempotent on a fresh
    /// session.
    pub fn reset(&mut self, directive: ResetDirective) -> Result<(), MampatError> {
        let ret = self.ctx.reset(directive.to_engine());
        self.publish_footprint();
        zstd_result(ret)?;
        match directive {
            ResetDirective::SessionOnly => self.phase = DecompressPhase::Idle,
            ResetDirective::Parameters => self.applied.clear(),
            ResetDirective::SessionAndParameters => {
                self.phase = DecompressPhase::Idle;
                self.applied.clear();
            }
        }
        Ok(())
    }

    //==============================================================================
    // One-shot decompression
    //==============================================================================

    /// Decompresses `src` (which must end on a frame boundary) into `dst`
    /// (wraps `ZSTD_decompressDCtx`). Returns bytes written.
    pub fn decompress(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, MampatError> {
        let ret = self.ctx.decompress(dst, src);
        self.publish_footprint();
        zstd_result(ret)
    }

    /// Decompresses with a one-off dictionary loaded from raw bytes
    /// (wraps `ZSTD_decompress_usingDict`).
    pub fn decompress_with_dict_bytes(
        &mut self,
        dst: &mut [u8],
        src: &[u8],
        dict: &[u8],
    ) -> Result<usize, MampatError> {
        let ret = self.ctx.decompress_using_dict(dst, src, dict);
        self.publish_footprint();
        zstd_result(ret)
    }

    /// Decompresses with a prepared dictionary (wraps
    /// `ZSTD_decompress_usingDDict`). The dictionary is only borrowed for
    /// this call; the session keeps no reference.
    pub fn decompress_with_dictionary(
        &mut self,
        dst: &mut [u8],
        src: &[u8],
        dict: &DecompressDictionary,
    ) -> Result<usize, MampatError> {
        let ret = self.ctx.decompress_using_ddict(dst, src, dict.as_ddict());
        self.publish_footprint();
        zstd_result(ret)
    }

    //==============================================================================
    // Streaming
    //==============================================================================

    /// Advances the stream by one step (wraps `ZSTD_decompressStream`).
    ///
    /// `remaining_hint` of zero means a frame boundary was reached and fully
    /// flushed. A step that consumes and produces nothing while source
    /// remains means the destination has no room: retry with a larger (or
    /// drained) destination buffer.
    pub fn stream_step(
        &mut self,
        dst: &mut [u8],
        src: &[u8],
    ) -> Result<StreamResult, MampatError> {
        let mut input = zstd_safe::InBuffer::around(src);
        let mut output = zstd_safe::OutBuffer::around(dst);
        let ret = self.ctx.decompress_stream(&mut output, &mut input);
        let produced = output.pos();
        let consumed = input.pos;
        self.publish_footprint();
        let remaining_hint = zstd_result(ret)?;
        self.phase = if remaining_hint == 0 {
            DecompressPhase::Idle
        } else {
            DecompressPhase::Consuming
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::zstd as engine;

    fn compress_one(src: &[u8], level: i32) -> Vec<u8> {
        let mut dst = vec![0u8; engine::compress_bound(src.len())];
        let n = engine::compress(&mut dst, src, level).unwrap();
        dst.truncate(n);
        dst
    }

    #[test]
    fn test_sessions_are_send() {
        fn require_send<T: Send>() {}
        require_send::<DecompressionSession>();
    }

    #[test]
    fn test_one_shot_roundtrip() {
        let src = b"decompression session one-shot roundtrip";
        let frame = compress_one(src, 3);

        let mut session = DecompressionSession::new().unwrap();
        let mut out = vec![0u8; src.len()];
        let n = session.decompress(&mut out, &frame).unwrap();
        assert_eq!(&out[..n], src);
    }

    #[test]
    fn test_one_shot_rejects_undersized_destination() {
        let src = vec![9u8; 4096];
        let frame = compress_one(&src, 3);

        let mut session = DecompressionSession::new().unwrap();
        let mut out = vec![0u8; 16];
        let err = session.decompress(&mut out, &frame).unwrap_err();
        assert!(matches!(err, MampatError::Zstd(_)));
    }

    #[test]
    fn test_streaming_reaches_idle_at_the_frame_boundary() {
        let src: Vec<u8> = (0..32_768u32).map(|i| (i % 251) as u8).collect();
        let frame = compress_one(&src, 3);

        let mut session = DecompressionSession::new().unwrap();
        let mut out = Vec::new();
        let mut rest = &frame[..];
        let mut dst = vec![0u8; 1024];
        loop {
            let step = session.stream_step(&mut dst, rest).unwrap();
            out.extend_from_slice(&dst[..step.produced]);
            rest = &rest[step.consumed..];
            if rest.is_empty() && step.remaining_hint == 0 {
                break;
            }
            assert_eq!(session.phase(), DecompressPhase::Consuming);
        }
        assert_eq!(session.phase(), DecompressPhase::Idle);
        assert_eq!(out, src);
    }

    #[test]
    fn test_zero_progress_signals_a_full_destination() {
        let src = vec![1u8; 65_536];
        let frame = compress_one(&src, 3);

        let mut session = DecompressionSession::new().unwrap();
        // With no output room the engine can absorb headers, but eventually a
        // step makes no progress at all: the caller's cue to supply a larger
        // destination.
        let mut rest = &frame[..];
        loop {
            let step = session.stream_step(&mut [], rest).unwrap();
            assert_eq!(step.produced, 0);
            rest = &rest[step.consumed..];
            if step.consumed == 0 {
                assert!(step.remaining_hint > 0);
                break;
            }
        }
        assert!(!rest.is_empty());

        // Supplying room unsticks the stream.
        let mut out = vec![0u8; src.len()];
        let step = session.stream_step(&mut out, rest).unwrap();
        assert!(step.produced > 0);
    }

    #[test]
    fn test_window_log_max_limits_decoding() {
        let mut session = DecompressionSession::new().unwrap();
        session.set_parameter(DParam::WindowLogMax, 10).unwrap();
        assert_eq!(session.parameters().get(&DParam::WindowLogMax), Some(&10));

        // A frame needing a bigger window than allowed must fail cleanly.
        let src = vec![3u8; 1 << 20];
        let frame = compress_one(&src, 3);
        let mut out = vec![0u8; src.len()];
        let err = session.decompress(&mut out, &frame).unwrap_err();
        assert!(matches!(err, MampatError::Zstd(_)));

        // Lifting the limit restores decoding.
        session.reset(ResetDirective::Parameters).unwrap();
        assert!(session.parameters().is_empty());
        let n = session.decompress(&mut out, &frame).unwrap();
        assert_eq!(&out[..n], &src[..]);
    }

    #[test]
    fn test_garbage_input_surfaces_the_engine_diagnostic() {
        let mut session = DecompressionSession::new().unwrap();
        let mut out = vec![0u8; 64];
        let err = session
            .stream_step(&mut out, &[0xDE, 0xAD, 0xBE, 0xEF, 0x00])
            .unwrap_err();
        match err {
            MampatError::Zstd(msg) => assert!(!msg.is_empty()),
            other => panic!("expected engine error, got {other:?}"),
        }
    }
}
