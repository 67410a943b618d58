// In: src/bridge/tests.rs

//! Integration tests for the whole binding: round-trips, streaming
//! equivalence, dictionaries, and lifetime memory accounting.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use rand::RngCore;

use crate::accounting::MemoryHost;
use crate::bridge::{compress, decompress, Compressor, Decompressor};
use crate::config::{CompressOptions, DecompressOptions};
use crate::dict::{train_dictionary, CompiledDictionary, DecompressDictionary};
use crate::error::MampatError;
use crate::kernels::{frame, zstd as engine};
use crate::params::{CParam, EndDirective, ResetDirective};
use crate::session::{CompressionSession, DecompressionSession};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Test host recording every delta.
#[derive(Default)]
struct CountingHost {
    total: AtomicI64,
}

impl MemoryHost for CountingHost {
    fn adjust(&self, delta_bytes: i64) {
        self.total.fetch_add(delta_bytes, Ordering::SeqCst);
    }
}

/// Structured, redundant sample records: realistic dictionary-training fodder.
fn training_samples() -> Vec<Vec<u8>> {
    (0..2000u32)
        .map(|i| {
            format!(
                "{{\"user\":\"user-{:04}\",\"action\":\"login\",\"ts\":1690{:06},\"agent\":\"mozilla/5.0\"}}",
                i % 311,
                i * 7
            )
            .into_bytes()
        })
        .collect()
}

#[test]
fn test_simple_roundtrip_with_default_options() {
    init_logs();
    let data = b"bytes in, bytes out, no setup";
    let compressed = compress(data, &CompressOptions::default()).unwrap();
    let restored = decompress(&compressed, &DecompressOptions::default()).unwrap();
    assert_eq!(restored, data);
}

#[test]
fn test_scenario_repeating_ab_at_level_3() {
    // 100,000 bytes of repeating "ab", level 3: byte-exact round-trip with a
    // compressed size nowhere near the input size.
    let src: Vec<u8> = b"ab".iter().copied().cycle().take(100_000).collect();

    let mut session = CompressionSession::new().unwrap();
    session.set_parameter(CParam::CompressionLevel, 3).unwrap();
    let mut compressed = vec![0u8; engine::compress_bound(100_000)];
    let n = session.compress(&mut compressed, &src).unwrap();
    assert!(n < 10_000, "repeating input should collapse, got {}", n);
    compressed.truncate(n);

    let mut dsession = DecompressionSession::new().unwrap();
    let mut out = vec![0u8; 100_000];
    let written = dsession.decompress(&mut out, &compressed).unwrap();
    assert_eq!(written, 100_000);
    assert_eq!(out, src);
}

#[test]
fn test_compress_bound_holds_for_random_payloads() {
    let mut rng = rand::rng();
    for len in [0usize, 1, 100, 65_536] {
        let mut src = vec![0u8; len];
        rng.fill_bytes(&mut src);
        let mut dst = vec![0u8; engine::compress_bound(len)];
        // Random bytes are incompressible: the bound must still suffice.
        let n = engine::compress(&mut dst, &src, 3).unwrap();
        assert!(n <= dst.len());
    }
}

#[test]
fn test_streaming_matches_one_shot_across_chunk_boundaries() {
    init_logs();
    let src: Vec<u8> = (0..30_000u32)
        .flat_map(|i| ((i % 1000) as u16).to_le_bytes())
        .collect();

    // Streamed: pledge the total so the header matches the one-shot's, feed
    // awkward chunk sizes, then drain the end directive until done.
    let mut streaming = CompressionSession::new().unwrap();
    streaming.set_parameter(CParam::CompressionLevel, 3).unwrap();
    streaming
        .set_pledged_source_size(src.len() as u64)
        .unwrap();

    let mut streamed = Vec::new();
    let mut dst = vec![0u8; 512];
    let mut rest = &src[..];
    for chunk_len in [1usize, 7, 500, 4096] {
        let (chunk, tail) = rest.split_at(chunk_len);
        rest = tail;
        let mut chunk = chunk;
        while !chunk.is_empty() {
            let step = streaming
                .stream_step(&mut dst, chunk, EndDirective::Continue)
                .unwrap();
            streamed.extend_from_slice(&dst[..step.produced]);
            chunk = &chunk[step.consumed..];
        }
    }
    while !rest.is_empty() {
        let step = streaming
            .stream_step(&mut dst, rest, EndDirective::Continue)
            .unwrap();
        streamed.extend_from_slice(&dst[..step.produced]);
        rest = &rest[step.consumed..];
    }
    loop {
        let step = streaming
            .stream_step(&mut dst, &[], EndDirective::End)
            .unwrap();
        streamed.extend_from_slice(&dst[..step.produced]);
        if step.remaining_hint == 0 {
            break;
        }
    }

    // One-shot over the same source and parameters.
    let mut oneshot = CompressionSession::new().unwrap();
    oneshot.set_parameter(CParam::CompressionLevel, 3).unwrap();
    let mut dst2 = vec![0u8; engine::compress_bound(src.len())];
    let n = oneshot.compress(&mut dst2, &src).unwrap();

    assert_eq!(streamed, &dst2[..n]);
}

#[test]
fn test_trained_dictionary_roundtrip_with_matching_ids() {
    init_logs();
    let samples = training_samples();
    let dict_bytes = train_dictionary(&samples, 16 * 1024).unwrap();

    let cdict = CompiledDictionary::new(&dict_bytes, 3).unwrap();
    let ddict = DecompressDictionary::new(&dict_bytes).unwrap();
    let id = cdict.dictionary_id();
    assert_ne!(id, 0, "trained dictionaries embed an id");
    assert_eq!(ddict.dictionary_id(), id);
    assert_eq!(frame::dict_id_from_dict(&dict_bytes), id);

    let src = &samples[42];
    let mut session = CompressionSession::new().unwrap();
    let mut compressed = vec![0u8; engine::compress_bound(src.len())];
    let n = session
        .compress_with_dictionary(&mut compressed, src, &cdict)
        .unwrap();
    compressed.truncate(n);

    // The frame names the dictionary it needs.
    assert_eq!(frame::dict_id_from_frame(&compressed), id);

    let mut dsession = DecompressionSession::new().unwrap();
    let mut out = vec![0u8; src.len()];
    let written = dsession
        .decompress_with_dictionary(&mut out, &compressed, &ddict)
        .unwrap();
    assert_eq!(&out[..written], &src[..]);

    // Without the dictionary the same frame must fail, not mis-decode.
    let mut plain = DecompressionSession::new().unwrap();
    let mut out2 = vec![0u8; src.len()];
    assert!(matches!(
        plain.decompress(&mut out2, &compressed),
        Err(MampatError::Zstd(_))
    ));
}

#[test]
fn test_session_private_dictionary_copy_roundtrip() {
    let samples = training_samples();
    let dict_bytes = train_dictionary(&samples, 16 * 1024).unwrap();
    let src = &samples[7];

    // Dictionary content copied into session-private state on both sides.
    let mut session = CompressionSession::new().unwrap();
    session.load_dictionary(&dict_bytes).unwrap();
    let mut compressed = vec![0u8; engine::compress_bound(src.len())];
    let n = session.compress(&mut compressed, src).unwrap();
    compressed.truncate(n);

    let mut dsession = DecompressionSession::new().unwrap();
    dsession.load_dictionary(&dict_bytes).unwrap();
    let mut out = vec![0u8; src.len()];
    let written = dsession.decompress(&mut out, &compressed).unwrap();
    assert_eq!(&out[..written], &src[..]);
}

#[test]
fn test_full_reset_restores_fresh_session_behavior() {
    let src = vec![0x5Au8; 16_384];

    let mut session = CompressionSession::new().unwrap();
    session.set_parameter(CParam::CompressionLevel, 19).unwrap();
    session.set_parameter(CParam::ChecksumFlag, 1).unwrap();
    let mut dst = vec![0u8; engine::compress_bound(src.len())];
    let n_configured = session.compress(&mut dst, &src).unwrap();
    let configured = dst[..n_configured].to_vec();

    session.reset(ResetDirective::SessionAndParameters).unwrap();
    assert!(session.parameters().is_empty());
    let n_reset = session.compress(&mut dst, &src).unwrap();
    let after_reset = dst[..n_reset].to_vec();

    let mut fresh = CompressionSession::new().unwrap();
    let mut dst2 = vec![0u8; engine::compress_bound(src.len())];
    let n_fresh = fresh.compress(&mut dst2, &src).unwrap();

    assert_eq!(after_reset, &dst2[..n_fresh]);
    assert_ne!(configured, after_reset); // the checksum alone changes the frame
}

#[test]
fn test_lifetime_accounting_sums_to_zero() {
    init_logs();
    let host = Arc::new(CountingHost::default());
    let data = vec![0xC3u8; 32_768];

    {
        let mut session =
            CompressionSession::with_memory_host(host.clone()).unwrap();
        assert!(host.total.load(Ordering::SeqCst) > 0);

        // Force the context to grow its tables, then actually compress.
        session.set_parameter(CParam::WindowLog, 22).unwrap();
        let mut dst = vec![0u8; engine::compress_bound(data.len())];
        session.compress(&mut dst, &data).unwrap();
        assert!(host.total.load(Ordering::SeqCst) > 0);
    }
    assert_eq!(host.total.load(Ordering::SeqCst), 0);

    {
        let _dict =
            CompiledDictionary::with_memory_host(&data, 3, host.clone()).unwrap();
        assert!(host.total.load(Ordering::SeqCst) > 0);
    }
    assert_eq!(host.total.load(Ordering::SeqCst), 0);

    {
        let mut session =
            DecompressionSession::with_memory_host(host.clone()).unwrap();
        let compressed = compress(&data, &CompressOptions::default()).unwrap();
        let mut out = vec![0u8; data.len()];
        session.decompress(&mut out, &compressed).unwrap();
        assert!(host.total.load(Ordering::SeqCst) > 0);

        let _ddict = DecompressDictionary::with_memory_host(&data, host.clone()).unwrap();
        drop(session);
        assert!(host.total.load(Ordering::SeqCst) > 0); // dictionary still live
    }
    assert_eq!(host.total.load(Ordering::SeqCst), 0);
}

#[test]
fn test_multi_frame_decompression_fast_path() {
    let first = compress(b"first frame|", &CompressOptions::default()).unwrap();
    let second = compress(b"second frame", &CompressOptions::default()).unwrap();
    let joined = [first, second].concat();

    let mut decompressor = Decompressor::new().unwrap();
    let restored = decompressor.decompress(&joined).unwrap();
    assert_eq!(restored, b"first frame|second frame");
}

#[test]
fn test_multi_frame_decompression_streaming_fallback() {
    // Suppress the content-size header so the facade has to stream.
    let options = CompressOptions {
        content_size_flag: Some(false),
        ..Default::default()
    };
    let payload_a = vec![0x11u8; 50_000];
    let payload_b = b"tail frame".to_vec();
    let first = compress(&payload_a, &options).unwrap();
    assert_eq!(frame::frame_content_size(&first).unwrap(), None);
    let second = compress(&payload_b, &options).unwrap();
    let joined = [first, second].concat();

    let mut decompressor = Decompressor::new().unwrap();
    let restored = decompressor.decompress(&joined).unwrap();
    assert_eq!(restored.len(), payload_a.len() + payload_b.len());
    assert_eq!(&restored[..payload_a.len()], &payload_a[..]);
    assert_eq!(&restored[payload_a.len()..], &payload_b[..]);
}

#[test]
fn test_truncated_stream_is_an_error_not_silent_loss() {
    let options = CompressOptions {
        content_size_flag: Some(false),
        ..Default::default()
    };
    let compressed = compress(&vec![0x22u8; 20_000], &options).unwrap();

    let mut decompressor = Decompressor::new().unwrap();
    let err = decompressor
        .decompress(&compressed[..compressed.len() - 4])
        .unwrap_err();
    assert!(matches!(err, MampatError::Zstd(_)));
}

#[test]
fn test_decompressor_empty_input_is_empty_output() {
    let mut decompressor = Decompressor::new().unwrap();
    assert!(decompressor.decompress(&[]).unwrap().is_empty());
}

#[test]
fn test_compressor_facade_reuses_its_session() {
    let mut compressor = Compressor::with_options(&CompressOptions {
        compression_level: Some(5),
        ..Default::default()
    })
    .unwrap();
    assert!(compressor.native_size() > 0);

    for payload in [&b"one"[..], &b"two"[..], &b"three"[..]] {
        let compressed = compressor.compress(payload).unwrap();
        let restored = decompress(&compressed, &DecompressOptions::default()).unwrap();
        assert_eq!(restored, payload);
    }
}

#[test]
fn test_garbage_input_to_decompressor_is_a_parse_error() {
    let mut decompressor = Decompressor::new().unwrap();
    let err = decompressor.decompress(b"definitely not a frame").unwrap_err();
    assert!(matches!(err, MampatError::FrameParse(_)));
}
