//! Pack verification error taxonomy
//!
//! Every variant is fatal: a pack with structural corruption cannot be
//! partially trusted, so verification aborts on the first failure and no
//! partial report is ever printed. Commands wrap these in `anyhow` errors
//! at the boundary; nothing is retried or swallowed.

use crate::artifacts::objects::object_id::ObjectId;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    /// The pack ends before the data being read.
    Truncated,
    /// The file does not start with the `PACK` signature.
    BadSignature,
    /// The header names a pack version this tool does not read.
    UnsupportedVersion(u32),
    /// An entry header carries an unknown type code.
    BadEntryType(u8),
    /// An entry size varint is overlong.
    BadEntrySize(u64),
    /// An entry offset falls outside the pack's data region.
    BadOffset(u64),
    /// An ofs-delta displacement is overlong or reaches before the pack start.
    BadBaseDisplacement(u64),
    /// The zlib stream of an entry failed to inflate.
    Inflate(String),
    /// An entry inflated to a different size than its header declares.
    SizeMismatch {
        offset: u64,
        declared: u64,
        inflated: u64,
    },
    /// Entry data stops short of, or runs past, the trailer position.
    TrailingBytes { expected: u64, actual: u64 },
    /// A delta program ended mid-instruction.
    DeltaTruncated,
    /// A delta program names a base size other than the actual base's.
    DeltaBaseSizeMismatch { declared: u64, actual: u64 },
    /// A delta program produced a result of the wrong size.
    DeltaResultSizeMismatch { declared: u64, actual: u64 },
    /// The reserved delta command byte zero was encountered.
    DeltaBadCommand,
    /// A delta copy instruction reads outside its base object.
    DeltaCopyOutOfRange,
    /// A delta chain exceeded the maximum supported depth.
    ChainTooDeep(u32),
    /// The pack trailer does not match the checksum of the pack contents.
    ChecksumMismatch {
        expected: ObjectId,
        actual: ObjectId,
    },
    /// An offset-based delta pointer targets an offset with no known object.
    MissingBaseOffset(u64),
    /// A hash-based delta pointer names an object this pack does not store
    /// as a non-delta entry.
    MissingBaseHash(ObjectId),
    /// A pending hash has no index record. Internal invariant violation,
    /// not a property of user input.
    MissingIndex(ObjectId),
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "truncated pack"),
            Self::BadSignature => write!(f, "bad pack signature"),
            Self::UnsupportedVersion(version) => {
                write!(f, "unsupported pack version {version}")
            }
            Self::BadEntryType(code) => write!(f, "bad pack entry type {code}"),
            Self::BadEntrySize(offset) => {
                write!(f, "bad entry size encoding at offset {offset}")
            }
            Self::BadOffset(offset) => write!(f, "entry offset {offset} out of range"),
            Self::BadBaseDisplacement(offset) => {
                write!(f, "bad delta base displacement at offset {offset}")
            }
            Self::Inflate(message) => write!(f, "unable to inflate pack entry: {message}"),
            Self::SizeMismatch {
                offset,
                declared,
                inflated,
            } => write!(
                f,
                "entry at offset {offset} inflated to {inflated} bytes, header declares {declared}"
            ),
            Self::TrailingBytes { expected, actual } => write!(
                f,
                "pack entries end at offset {actual}, trailer begins at {expected}"
            ),
            Self::DeltaTruncated => write!(f, "delta program truncated"),
            Self::DeltaBaseSizeMismatch { declared, actual } => write!(
                f,
                "delta base is {actual} bytes, program expects {declared}"
            ),
            Self::DeltaResultSizeMismatch { declared, actual } => write!(
                f,
                "delta produced {actual} bytes, program declares {declared}"
            ),
            Self::DeltaBadCommand => write!(f, "delta command byte is zero"),
            Self::DeltaCopyOutOfRange => write!(f, "delta copy exceeds base object"),
            Self::ChainTooDeep(depth) => write!(f, "delta chain deeper than {depth} links"),
            Self::ChecksumMismatch { expected, actual } => write!(
                f,
                "pack checksum mismatch: trailer has {expected}, contents hash to {actual}"
            ),
            Self::MissingBaseOffset(offset) => {
                write!(f, "no object found at delta base offset {offset}")
            }
            Self::MissingBaseHash(oid) => {
                write!(f, "delta base {oid} is not a non-delta object in this pack")
            }
            Self::MissingIndex(oid) => {
                write!(f, "no index record for pending object {oid}")
            }
        }
    }
}

impl std::error::Error for PackError {}
