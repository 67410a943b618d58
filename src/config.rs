// In: src/config.rs

//! Typed option sets for the high-level bridge.
//!
//! These structs are designed to be created once at the application boundary
//! (e.g. from a host-language options object) and applied to a session in one
//! batch. Every field is optional; `None` leaves the engine default in place.
//! With the `serde` feature they deserialize from the same camelCase names
//! the parameter tables use.

use crate::error::MampatError;
use crate::params::{CParam, DParam, Strategy};
use crate::session::{CompressionSession, DecompressionSession};

//==================================================================================
// I. Compression options
//==================================================================================

/// A batch of compression parameters, applied in table order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct CompressOptions {
    pub compression_level: Option<i32>,

    // Advanced compression options
    pub window_log: Option<u32>,
    pub hash_log: Option<u32>,
    pub chain_log: Option<u32>,
    pub search_log: Option<u32>,
    pub min_match: Option<u32>,
    pub target_length: Option<u32>,
    pub strategy: Option<Strategy>,

    // Long-distance matching options
    pub enable_long_distance_matching: Option<bool>,
    pub ldm_hash_log: Option<u32>,
    pub ldm_min_match: Option<u32>,
    pub ldm_bucket_size_log: Option<u32>,
    pub ldm_hash_rate_log: Option<u32>,

    // Frame parameters
    pub content_size_flag: Option<bool>,
    pub checksum_flag: Option<bool>,
    pub dict_id_flag: Option<bool>,

    // Multi-threading parameters
    pub nb_workers: Option<u32>,
    pub job_size: Option<u32>,
    pub overlap_log: Option<u32>,
}

impl CompressOptions {
    /// Applies every set field to the session. Stops at the first engine
    /// rejection, leaving earlier fields applied (the engine owns validation;
    /// see the parameter tables).
    pub fn apply(&self, session: &mut CompressionSession) -> Result<(), MampatError> {
        if let Some(v) = self.compression_level {
            session.set_parameter(CParam::CompressionLevel, v)?;
        }
        if let Some(v) = self.window_log {
            session.set_parameter(CParam::WindowLog, v as i32)?;
        }
        if let Some(v) = self.hash_log {
            session.set_parameter(CParam::HashLog, v as i32)?;
        }
        if let Some(v) = self.chain_log {
            session.set_parameter(CParam::ChainLog, v as i32)?;
        }
        if let Some(v) = self.search_log {
            session.set_parameter(CParam::SearchLog, v as i32)?;
        }
        if let Some(v) = self.min_match {
            session.set_parameter(CParam::MinMatch, v as i32)?;
        }
        if let Some(v) = self.target_length {
            session.set_parameter(CParam::TargetLength, v as i32)?;
        }
        if let Some(v) = self.strategy {
            session.set_parameter(CParam::Strategy, v.id())?;
        }
        if let Some(v) = self.enable_long_distance_matching {
            session.set_parameter(CParam::EnableLongDistanceMatching, v as i32)?;
        }
        if let Some(v) = self.ldm_hash_log {
            session.set_parameter(CParam::LdmHashLog, v as i32)?;
        }
        if let Some(v) = self.ldm_min_match {
            session.set_parameter(CParam::LdmMinMatch, v as i32)?;
        }
        if let Some(v) = self.ldm_bucket_size_log {
            session.set_parameter(CParam::LdmBucketSizeLog, v as i32)?;
        }
        if let Some(v) = self.ldm_hash_rate_log {
            session.set_parameter(CParam::LdmHashRateLog, v as i32)?;
        }
        if let Some(v) = self.content_size_flag {
            session.set_parameter(CParam::ContentSizeFlag, v as i32)?;
        }
        if let Some(v) = self.checksum_flag {
            session.set_parameter(CParam::ChecksumFlag, v as i32)?;
        }
        if let Some(v) = self.dict_id_flag {
            session.set_parameter(CParam::DictIdFlag, v as i32)?;
        }
        if let Some(v) = self.nb_workers {
            session.set_parameter(CParam::NbWorkers, v as i32)?;
        }
        if let Some(v) = self.job_size {
            session.set_parameter(CParam::JobSize, v as i32)?;
        }
        if let Some(v) = self.overlap_log {
            session.set_parameter(CParam::OverlapLog, v as i32)?;
        }
        Ok(())
    }
}

//==================================================================================
// II. Decompression options
//==================================================================================

/// A batch of decompression parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct DecompressOptions {
    pub window_log_max: Option<u32>,
}

impl DecompressOptions {
    /// Applies every set field to the session.
    pub fn apply(&self, session: &mut DecompressionSession) -> Result<(), MampatError> {
        if let Some(v) = self.window_log_max {
            session.set_parameter(DParam::WindowLogMax, v as i32)?;
        }
        Ok(())
    }
}

//==================================================================================
// III. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_records_only_set_fields() {
        let mut session = CompressionSession::new().unwrap();
        let options = CompressOptions {
            compression_level: Some(7),
            checksum_flag: Some(true),
            strategy: Some(Strategy::Greedy),
            ..Default::default()
        };
        options.apply(&mut session).unwrap();

        let applied = session.parameters();
        assert_eq!(applied.get(&CParam::CompressionLevel), Some(&7));
        assert_eq!(applied.get(&CParam::ChecksumFlag), Some(&1));
        assert_eq!(applied.get(&CParam::Strategy), Some(&Strategy::Greedy.id()));
        assert_eq!(applied.len(), 3);
    }

    #[test]
    fn test_empty_options_apply_cleanly() {
        let mut session = CompressionSession::new().unwrap();
        CompressOptions::default().apply(&mut session).unwrap();
        assert!(session.parameters().is_empty());

        let mut dsession = DecompressionSession::new().unwrap();
        DecompressOptions::default().apply(&mut dsession).unwrap();
        assert!(dsession.parameters().is_empty());
    }

    #[test]
    fn test_engine_rejection_surfaces_from_apply() {
        let mut session = CompressionSession::new().unwrap();
        let options = CompressOptions {
            window_log: Some(5000),
            ..Default::default()
        };
        assert!(matches!(
            options.apply(&mut session),
            Err(MampatError::InvalidParameter(_))
        ));
    }
}
