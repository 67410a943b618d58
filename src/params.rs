// In: src/params.rs

//! The closed parameter universe of the binding: compression parameters,
//! decompression parameters, strategies, reset directives and end directives,
//! each with a stable numeric id and a stable camelCase name matching the
//! native enum member.
//!
//! The numeric ids are the native `ZSTD_cParameter`/`ZSTD_dParameter` values,
//! so a host that persists them stays compatible with the engine. Values are
//! deliberately NOT range-checked here: the engine owns validation (including
//! whether the current session phase allows the change), and its verdict is
//! surfaced verbatim. [`c_param_bounds`]/[`d_param_bounds`] exist for hosts
//! that want to check ahead of time anyway.

use crate::error::MampatError;

//==================================================================================
// I. Compression parameters
//==================================================================================

/// Compression parameters accepted by [`crate::session::CompressionSession::set_parameter`].
///
/// Mirrors the non-experimental members of `ZSTD_cParameter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum CParam {
    CompressionLevel,
    WindowLog,
    HashLog,
    ChainLog,
    SearchLog,
    MinMatch,
    TargetLength,
    Strategy,
    EnableLongDistanceMatching,
    LdmHashLog,
    LdmMinMatch,
    LdmBucketSizeLog,
    LdmHashRateLog,
    ContentSizeFlag,
    ChecksumFlag,
    DictIdFlag,
    NbWorkers,
    JobSize,
    OverlapLog,
}

impl CParam {
    /// Every recognized compression parameter, in id order.
    pub const ALL: [CParam; 19] = [
        CParam::CompressionLevel,
        CParam::WindowLog,
        CParam::HashLog,
        CParam::ChainLog,
        CParam::SearchLog,
        CParam::MinMatch,
        CParam::TargetLength,
        CParam::Strategy,
        CParam::EnableLongDistanceMatching,
        CParam::LdmHashLog,
        CParam::LdmMinMatch,
        CParam::LdmBucketSizeLog,
        CParam::LdmHashRateLog,
        CParam::ContentSizeFlag,
        CParam::ChecksumFlag,
        CParam::DictIdFlag,
        CParam::NbWorkers,
        CParam::JobSize,
        CParam::OverlapLog,
    ];

    /// The native `ZSTD_cParameter` value.
    pub fn id(self) -> i32 {
        match self {
            CParam::CompressionLevel => 100,
            CParam::WindowLog => 101,
            CParam::HashLog => 102,
            CParam::ChainLog => 103,
            CParam::SearchLog => 104,
            CParam::MinMatch => 105,
            CParam::TargetLength => 106,
            CParam::Strategy => 107,
            CParam::EnableLongDistanceMatching => 160,
            CParam::LdmHashLog => 161,
            CParam::LdmMinMatch => 162,
            CParam::LdmBucketSizeLog => 163,
            CParam::LdmHashRateLog => 164,
            CParam::ContentSizeFlag => 200,
            CParam::ChecksumFlag => 201,
            CParam::DictIdFlag => 202,
            CParam::NbWorkers => 400,
            CParam::JobSize => 401,
            CParam::OverlapLog => 402,
        }
    }

    /// Looks a parameter up by its native id.
    pub fn from_id(id: i32) -> Option<CParam> {
        CParam::ALL.iter().copied().find(|p| p.id() == id)
    }

    /// The native enum member name, without the `ZSTD_c_` prefix.
    pub fn name(self) -> &'static str {
        match self {
            CParam::CompressionLevel => "compressionLevel",
            CParam::WindowLog => "windowLog",
            CParam::HashLog => "hashLog",
            CParam::ChainLog => "chainLog",
            CParam::SearchLog => "searchLog",
            CParam::MinMatch => "minMatch",
            CParam::TargetLength => "targetLength",
            CParam::Strategy => "strategy",
            CParam::EnableLongDistanceMatching => "enableLongDistanceMatching",
            CParam::LdmHashLog => "ldmHashLog",
            CParam::LdmMinMatch => "ldmMinMatch",
            CParam::LdmBucketSizeLog => "ldmBucketSizeLog",
            CParam::LdmHashRateLog => "ldmHashRateLog",
            CParam::ContentSizeFlag => "contentSizeFlag",
            CParam::ChecksumFlag => "checksumFlag",
            CParam::DictIdFlag => "dictIDFlag",
            CParam::NbWorkers => "nbWorkers",
            CParam::JobSize => "jobSize",
            CParam::OverlapLog => "overlapLog",
        }
    }

    /// Looks a parameter up by name.
    pub fn from_name(name: &str) -> Option<CParam> {
        CParam::ALL.iter().copied().find(|p| p.name() == name)
    }

    pub(crate) fn to_native(self) -> zstd_sys::ZSTD_cParameter {
        use zstd_sys::ZSTD_cParameter::*;
        match self {
            CParam::CompressionLevel => ZSTD_c_compressionLevel,
            CParam::WindowLog => ZSTD_c_windowLog,
            CParam::HashLog => ZSTD_c_hashLog,
            CParam::ChainLog => ZSTD_c_chainLog,
            CParam::SearchLog => ZSTD_c_searchLog,
            CParam::MinMatch => ZSTD_c_minMatch,
            CParam::TargetLength => ZSTD_c_targetLength,
            CParam::Strategy => ZSTD_c_strategy,
            CParam::EnableLongDistanceMatching => ZSTD_c_enableLongDistanceMatching,
            CParam::LdmHashLog => ZSTD_c_ldmHashLog,
            CParam::LdmMinMatch => ZSTD_c_ldmMinMatch,
            CParam::LdmBucketSizeLog => ZSTD_c_ldmBucketSizeLog,
            CParam::LdmHashRateLog => ZSTD_c_ldmHashRateLog,
            CParam::ContentSizeFlag => ZSTD_c_contentSizeFlag,
            CParam::ChecksumFlag => ZSTD_c_checksumFlag,
            CParam::DictIdFlag => ZSTD_c_dictIDFlag,
            CParam::NbWorkers => ZSTD_c_nbWorkers,
            CParam::JobSize => ZSTD_c_jobSize,
            CParam::OverlapLog => ZSTD_c_overlapLog,
        }
    }

    /// Pairs the parameter with a raw integer value, producing the typed
    /// engine parameter. The value itself is passed through unvalidated; only
    /// the strategy id needs to resolve against the closed [`Strategy`] table.
    pub(crate) fn to_engine(self, value: i32) -> Result<zstd_safe::CParameter, MampatError> {
        use zstd_safe::CParameter as P;
        Ok(match self {
            CParam::CompressionLevel => P::CompressionLevel(value),
            CParam::WindowLog => P::WindowLog(value as u32),
            CParam::HashLog => P::HashLog(value as u32),
            CParam::ChainLog => P::ChainLog(value as u32),
            CParam::SearchLog => P::SearchLog(value as u32),
            CParam::MinMatch => P::MinMatch(value as u32),
            CParam::TargetLength => P::TargetLength(value as u32),
            CParam::Strategy => P::Strategy(
                Strategy::from_id(value)
                    .ok_or_else(|| {
                        MampatError::InvalidParameter(format!("unknown strategy id {}", value))
                    })?
                    .to_native(),
            ),
            CParam::EnableLongDistanceMatching => P::EnableLongDistanceMatching(value != 0),
            CParam::LdmHashLog => P::LdmHashLog(value as u32),
            CParam::LdmMinMatch => P::LdmMinMatch(value as u32),
            CParam::LdmBucketSizeLog => P::LdmBucketSizeLog(value as u32),
            CParam::LdmHashRateLog => P::LdmHashRateLog(value as u32),
            CParam::ContentSizeFlag => P::ContentSizeFlag(value != 0),
            CParam::ChecksumFlag => P::ChecksumFlag(value != 0),
            CParam::DictIdFlag => P::DictIdFlag(value != 0),
            CParam::NbWorkers => P::NbWorkers(value as u32),
            CParam::JobSize => P::JobSize(value as u32),
            CParam::OverlapLog => P::OverlapSizeLog(value as u32),
        })
    }
}

//==================================================================================
// II. Decompression parameters
//==================================================================================

/// Decompression parameters accepted by
/// [`crate::session::DecompressionSession::set_parameter`].
///
/// Mirrors the non-experimental members of `ZSTD_dParameter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum DParam {
    WindowLogMax,
}

impl DParam {
    pub const ALL: [DParam; 1] = [DParam::WindowLogMax];

    /// The native `ZSTD_dParameter` value.
    pub fn id(self) -> i32 {
        match self {
            DParam::WindowLogMax => 100,
        }
    }

    pub fn from_id(id: i32) -> Option<DParam> {
        DParam::ALL.iter().copied().find(|p| p.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            DParam::WindowLogMax => "windowLogMax",
        }
    }

    pub fn from_name(name: &str) -> Option<DParam> {
        DParam::ALL.iter().copied().find(|p| p.name() == name)
    }

    pub(crate) fn to_native(self) -> zstd_sys::ZSTD_dParameter {
        match self {
            DParam::WindowLogMax => zstd_sys::ZSTD_dParameter::ZSTD_d_windowLogMax,
        }
    }

    pub(crate) fn to_engine(self, value: i32) -> zstd_safe::DParameter {
        match self {
            DParam::WindowLogMax => zstd_safe::DParameter::WindowLogMax(value as u32),
        }
    }
}

//==================================================================================
// III. Strategies
//==================================================================================

/// Match-finding strategies, used as values for [`CParam::Strategy`].
///
/// Mirrors `ZSTD_strategy`, ordered from fastest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Strategy {
    Fast,
    Dfast,
    Greedy,
    Lazy,
    Lazy2,
    Btlazy2,
    Btopt,
    Btultra,
    Btultra2,
}

impl Strategy {
    pub const ALL: [Strategy; 9] = [
        Strategy::Fast,
        Strategy::Dfast,
        Strategy::Greedy,
        Strategy::Lazy,
        Strategy::Lazy2,
        Strategy::Btlazy2,
        Strategy::Btopt,
        Strategy::Btultra,
        Strategy::Btultra2,
    ];

    /// The native `ZSTD_strategy` value.
    pub fn id(self) -> i32 {
        match self {
            Strategy::Fast => 1,
            Strategy::Dfast => 2,
            Strategy::Greedy => 3,
            Strategy::Lazy => 4,
            Strategy::Lazy2 => 5,
            Strategy::Btlazy2 => 6,
            Strategy::Btopt => 7,
            Strategy::Btultra => 8,
            Strategy::Btultra2 => 9,
        }
    }

    pub fn from_id(id: i32) -> Option<Strategy> {
        Strategy::ALL.iter().copied().find(|s| s.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Fast => "fast",
            Strategy::Dfast => "dfast",
            Strategy::Greedy => "greedy",
            Strategy::Lazy => "lazy",
            Strategy::Lazy2 => "lazy2",
            Strategy::Btlazy2 => "btlazy2",
            Strategy::Btopt => "btopt",
            Strategy::Btultra => "btultra",
            Strategy::Btultra2 => "btultra2",
        }
    }

    pub fn from_name(name: &str) -> Option<Strategy> {
        Strategy::ALL.iter().copied().find(|s| s.name() == name)
    }

    pub(crate) fn to_native(self) -> zstd_safe::Strategy {
        use zstd_safe::Strategy as S;
        match self {
            Strategy::Fast => S::ZSTD_fast,
            Strategy::Dfast => S::ZSTD_dfast,
            Strategy::Greedy => S::ZSTD_greedy,
            Strategy::Lazy => S::ZSTD_lazy,
            Strategy::Lazy2 => S::ZSTD_lazy2,
            Strategy::Btlazy2 => S::ZSTD_btlazy2,
            Strategy::Btopt => S::ZSTD_btopt,
            Strategy::Btultra => S::ZSTD_btultra,
            Strategy::Btultra2 => S::ZSTD_btultra2,
        }
    }
}

//==================================================================================
// IV. Reset & end directives
//==================================================================================

/// What to reset on a session (mirrors `ZSTD_ResetDirective`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ResetDirective {
    /// Abort any in-flight frame, keep dictionary and parameters.
    SessionOnly,
    /// Restore default parameters and drop any loaded dictionary; only legal
    /// outside a frame.
    Parameters,
    /// Both of the above.
    SessionAndParameters,
}

impl ResetDirective {
    pub const ALL: [ResetDirective; 3] = [
        ResetDirective::SessionOnly,
        ResetDirective::Parameters,
        ResetDirective::SessionAndParameters,
    ];

    pub fn id(self) -> i32 {
        match self {
            ResetDirective::SessionOnly => 1,
            ResetDirective::Parameters => 2,
            ResetDirective::SessionAndParameters => 3,
        }
    }

    pub fn from_id(id: i32) -> Option<ResetDirective> {
        ResetDirective::ALL.iter().copied().find(|d| d.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            ResetDirective::SessionOnly => "sessionOnly",
            ResetDirective::Parameters => "parameters",
            ResetDirective::SessionAndParameters => "sessionAndParameters",
        }
    }

    pub fn from_name(name: &str) -> Option<ResetDirective> {
        ResetDirective::ALL.iter().copied().find(|d| d.name() == name)
    }

    pub(crate) fn to_engine(self) -> zstd_safe::ResetDirective {
        match self {
            ResetDirective::SessionOnly => zstd_safe::ResetDirective::SessionOnly,
            ResetDirective::Parameters => zstd_safe::ResetDirective::Parameters,
            ResetDirective::SessionAndParameters => {
                zstd_safe::ResetDirective::SessionAndParameters
            }
        }
    }
}

/// Whether a streaming compression step should keep accumulating, flush, or
/// end the frame (mirrors `ZSTD_EndDirective`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum EndDirective {
    /// Collect more data; the engine decides when to emit compressed blocks.
    Continue,
    /// Flush all data provided so far into the output.
    Flush,
    /// Flush and close the current frame.
    End,
}

impl EndDirective {
    pub const ALL: [EndDirective; 3] =
        [EndDirective::Continue, EndDirective::Flush, EndDirective::End];

    pub fn id(self) -> i32 {
        match self {
            EndDirective::Continue => 0,
            EndDirective::Flush => 1,
            EndDirective::End => 2,
        }
    }

    pub fn from_id(id: i32) -> Option<EndDirective> {
        EndDirective::ALL.iter().copied().find(|d| d.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            EndDirective::Continue => "continue",
            EndDirective::Flush => "flush",
            EndDirective::End => "end",
        }
    }

    pub fn from_name(name: &str) -> Option<EndDirective> {
        EndDirective::ALL.iter().copied().find(|d| d.name() == name)
    }

    pub(crate) fn to_native(self) -> zstd_sys::ZSTD_EndDirective {
        match self {
            EndDirective::Continue => zstd_sys::ZSTD_EndDirective::ZSTD_e_continue,
            EndDirective::Flush => zstd_sys::ZSTD_EndDirective::ZSTD_e_flush,
            EndDirective::End => zstd_sys::ZSTD_EndDirective::ZSTD_e_end,
        }
    }
}

//==================================================================================
// V. Parameter bounds
//==================================================================================

/// Inclusive lower and upper bounds for one parameter (`ZSTD_bounds`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterBounds {
    pub lower_bound: i32,
    pub upper_bound: i32,
}

/// Queries the engine for a compression parameter's legal range.
/// Wraps `ZSTD_cParam_getBounds`.
pub fn c_param_bounds(param: CParam) -> Result<ParameterBounds, MampatError> {
    // SAFETY: pure query, no memory is touched.
    let bounds = unsafe { zstd_sys::ZSTD_cParam_getBounds(param.to_native()) };
    convert_bounds(bounds)
}

/// Queries the engine for a decompression parameter's legal range.
/// Wraps `ZSTD_dParam_getBounds`.
pub fn d_param_bounds(param: DParam) -> Result<ParameterBounds, MampatError> {
    // SAFETY: pure query, no memory is touched.
    let bounds = unsafe { zstd_sys::ZSTD_dParam_getBounds(param.to_native()) };
    convert_bounds(bounds)
}

fn convert_bounds(bounds: zstd_sys::ZSTD_bounds) -> Result<ParameterBounds, MampatError> {
    // SAFETY: ZSTD_isError only inspects the code value.
    if unsafe { zstd_sys::ZSTD_isError(bounds.error) } != 0 {
        return Err(MampatError::InvalidParameter(
            zstd_safe::get_error_name(bounds.error).to_string(),
        ));
    }
    Ok(ParameterBounds {
        lower_bound: bounds.lowerBound,
        upper_bound: bounds.upperBound,
    })
}

//==================================================================================
// VI. Unit Tests
//==================================================================================
