// In: src/dict.rs

//! Prepared dictionary artifacts.
//!
//! A dictionary is digested once, eagerly, into an engine-optimized immutable
//! form; construction either yields a fully-built object or nothing at all.
//! After that it is read-only and freely shared: any number of sessions, on
//! any threads, may borrow it for the duration of a single call. Sessions
//! never take ownership of a dictionary, so the caller keeps it alive across
//! the calls that use it.

use std::sync::Arc;

use log::debug;

use crate::accounting::{MemoryGauge, MemoryHost};
use crate::binding::ResourceKind;
use crate::error::MampatError;
use crate::kernels::frame;

//==================================================================================
// I. Compression dictionaries
//==================================================================================

/// A dictionary prepared for compression (wraps `ZSTD_CDict`).
///
/// The compression level is fixed at build time and overrides the session's
/// level whenever the dictionary is used.
pub struct CompiledDictionary {
    cdict: zstd_safe::CDict<'static>,
    dict_id: u32,
    level: i32,
    #[allow(dead_code)] // held for its Drop-side accounting report
    gauge: MemoryGauge,
}

impl std::fmt::Debug for CompiledDictionary {
    // `cdict` and `gauge` wrap FFI handles that are not `Debug`; report the
    // plain metadata and elide the rest.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledDictionary")
            .field("dict_id", &self.dict_id)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl CompiledDictionary {
    /// Builds the dictionary from raw bytes at the given level
    /// (wraps `ZSTD_createCDict`).
    pub fn new(dict: &[u8], level: i32) -> Result<Self, MampatError> {
        Self::build(
            dict,
            level,
            MemoryGauge::new(ResourceKind::CompiledDictionary.name()),
        )
    }

    /// Same, reporting memory into a host-supplied counter.
    pub fn with_memory_host(
        dict: &[u8],
        level: i32,
        host: Arc<dyn MemoryHost>,
    ) -> Result<Self, MampatError> {
        Self::build(
            dict,
            level,
            MemoryGauge::with_host(ResourceKind::CompiledDictionary.name(), host),
        )
    }

    fn build(dict: &[u8], level: i32, mut gauge: MemoryGauge) -> Result<Self, MampatError> {
        let cdict = zstd_safe::CDict::try_create(dict, level).ok_or_else(|| {
            MampatError::AllocationFailed(
                "ZSTD_createCDict returned null (malformed dictionary or out of memory)"
                    .to_string(),
            )
        })?;
        let dict_id = frame::dict_id_from_dict(dict);
        gauge.publish(cdict.sizeof());
        debug!(
            "compiled dictionary built, id {}, level {}, {} native bytes",
            dict_id,
            level,
            cdict.sizeof()
        );
        Ok(CompiledDictionary {
            cdict,
            dict_id,
            level,
            gauge,
        })
    }

    /// The resource-kind tag this dictionary carries across the host boundary.
    pub fn kind(&self) -> ResourceKind {
        ResourceKind::CompiledDictionary
    }

    /// The dictionary's embedded numeric identifier, or 0 for raw-content
    /// dictionaries.
    pub fn dictionary_id(&self) -> u32 {
        self.dict_id
    }

    /// The compression level fixed at build time.
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Native bytes owned by the prepared form (wraps `ZSTD_sizeof_CDict`).
    pub fn native_size(&self) -> usize {
        self.cdict.sizeof()
    }

    pub(crate) fn as_cdict(&self) -> &zstd_safe::CDict<'static> {
        &self.cdict
    }
}

//==================================================================================
// II. Decompression dictionaries
//==================================================================================

/// A dictionary prepared for decompression (wraps `ZSTD_DDict`).
pub struct DecompressDictionary {
    ddict: zstd_safe::DDict<'static>,
    dict_id: u32,
    #[allow(dead_code)] // held for its Drop-side accounting report
    gauge: MemoryGauge,
}

impl DecompressDictionary {
    /// Builds the dictionary from raw bytes (wraps `ZSTD_createDDict`).
    pub fn new(dict: &[u8]) -> Result<Self, MampatError> {
        Self::build(dict, MemoryGauge::new(ResourceKind::DecompressDictionary.name()))
    }

    /// Same, reporting memory into a host-supplied counter.
    pub fn with_memory_host(
        dict: &[u8],
        host: Arc<dyn MemoryHost>,
    ) -> Result<Self, MampatError> {
        Self::build(
            dict,
            MemoryGauge::with_host(ResourceKind::DecompressDictionary.name(), host),
        )
    }

    fn build(dict: &[u8], mut gauge: MemoryGauge) -> Result<Self, MampatError> {
        let ddict = zstd_safe::DDict::try_create(dict).ok_or_else(|| {
            MampatError::AllocationFailed(
                "ZSTD_createDDict returned null (malformed dictionary or out of memory)"
                    .to_string(),
            )
        })?;
        let dict_id = frame::dict_id_from_dict(dict);
        gauge.publish(ddict.sizeof());
        debug!(
            "decompress dictionary built, id {}, {} native bytes",
            dict_id,
            ddict.sizeof()
        );
        Ok(DecompressDictionary {
            ddict,
            dict_id,
            gauge,
        })
    }

    /// The resource-kind tag this dictionary carries across the host boundary.
    pub fn kind(&self) -> ResourceKind {
        ResourceKind::DecompressDictionary
    }

    /// The dictionary's embedded numeric identifier, or 0 for raw-content
    /// dictionaries (wraps `ZSTD_getDictID_fromDDict` semantics).
    pub fn dictionary_id(&self) -> u32 {
        self.dict_id
    }

    /// Native bytes owned by the prepared form (wraps `ZSTD_sizeof_DDict`).
    pub fn native_size(&self) -> usize {
        self.ddict.sizeof()
    }

    pub(crate) fn as_ddict(&self) -> &zstd_safe::DDict<'static> {
        &self.ddict
    }
}

//==================================================================================
// III. Dictionary training
//==================================================================================

/// Trains a dictionary from sample buffers (wraps the ZDICT builder).
///
/// The returned bytes carry the dictionary magic and an embedded id, and feed
/// either dictionary constructor or a session's `load_dictionary`.
pub fn train_dictionary<S: AsRef<[u8]>>(
    samples: &[S],
    max_size: usize,
) -> Result<Vec<u8>, MampatError> {
    zstd::dict::from_samples(samples, max_size).map_err(|e| MampatError::Zstd(e.to_string()))
}

//==================================================================================
// IV. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::zstd as engine;
    use crate::session::{CompressionSession, DecompressionSession};

    #[test]
    fn test_dictionaries_are_shareable() {
        fn require_sync<T: Send + Sync>() {}
        require_sync::<CompiledDictionary>();
        require_sync::<DecompressDictionary>();
    }

    #[test]
    fn test_raw_content_dictionary_roundtrip() {
        // Bytes without the dictionary magic load as raw content and carry
        // no embedded id.
        let content = b"the quick brown fox jumps over the lazy dog; shared prefix material";
        let cdict = CompiledDictionary::new(content, 3).unwrap();
        let ddict = DecompressDictionary::new(content).unwrap();
        assert_eq!(cdict.dictionary_id(), 0);
        assert_eq!(ddict.dictionary_id(), 0);
        assert_eq!(cdict.level(), 3);
        assert!(cdict.native_size() > 0);
        assert!(ddict.native_size() > 0);

        let src = b"the quick brown fox jumps over the lazy dog, again and again";
        let mut frame = vec![0u8; engine::compress_bound(src.len())];
        let mut session = CompressionSession::new().unwrap();
        let n = session
            .compress_with_dictionary(&mut frame, src, &cdict)
            .unwrap();
        frame.truncate(n);

        let mut out = vec![0u8; src.len()];
        let mut dsession = DecompressionSession::new().unwrap();
        let n = dsession
            .decompress_with_dictionary(&mut out, &frame, &ddict)
            .unwrap();
        assert_eq!(&out[..n], src);
    }

    #[test]
    fn test_malformed_magic_dictionary_fails_atomically() {
        // Starts with the dictionary magic but carries garbage entropy
        // tables; the engine build must fail and yield no object.
        let mut bogus = crate::kernels::frame::MAGIC_DICTIONARY.to_le_bytes().to_vec();
        bogus.extend_from_slice(&[0x11; 64]);

        assert!(matches!(
            CompiledDictionary::new(&bogus, 3),
            Err(MampatError::AllocationFailed(_))
        ));
        assert!(matches!(
            DecompressDictionary::new(&bogus),
            Err(MampatError::AllocationFailed(_))
        ));
    }

    #[test]
    fn test_concurrent_borrow_from_two_sessions() {
        let content = vec![0xABu8; 512];
        let cdict = CompiledDictionary::new(&content, 3).unwrap();
        let src = vec![0xABu8; 2048];

        std::thread::scope(|scope| {
            for _ in 0..2 {
                scope.spawn(|| {
                    let mut session = CompressionSession::new().unwrap();
                    let mut dst = vec![0u8; engine::compress_bound(src.len())];
                    session
                        .compress_with_dictionary(&mut dst, &src, &cdict)
                        .unwrap();
                });
            }
        });
    }
}
