//! Pack file access
//!
//! `PackFile` loads a pack into memory, validates its header, and exposes
//! the primitives every later stage builds on: entry header parsing,
//! zlib inflation, and trailer checksum verification. The trailing
//! checksum is excluded from the data region so corrupt offsets can never
//! read the trailer as object data.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::pack::entry::{BasePointer, EntryKind};
use crate::artifacts::pack::error::PackError;
use crate::artifacts::pack::{PACK_HEADER_SIZE, PACK_TRAILER_SIZE};
use anyhow::Context;
use byteorder::{NetworkEndian, ReadBytesExt};
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{Cursor, Read};
use std::path::Path;

/// Upper bound on entry header bytes, to stop runaway varints on corrupt data
const MAX_ENTRY_HEADER_BYTES: u64 = 12;

/// Upper bound on ofs-delta displacement bytes (ceil(64 / 7))
const MAX_OFS_BYTES: u64 = 10;

/// Entry header parsed from a pack
///
/// `data_start` is the pack offset where the entry's zlib stream begins;
/// for delta entries it points past the base reference.
#[derive(Debug, Clone)]
pub struct EntryHeader {
    pub kind: EntryKind,
    pub size: u64,
    pub data_start: u64,
}

/// A packfile loaded in memory
#[derive(Debug)]
pub struct PackFile {
    data: Bytes,
    entry_count: u32,
}

impl PackFile {
    /// Read a pack from disk and validate its header
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read(path)
            .context(format!("Unable to read pack file {}", path.display()))?;

        Self::parse(data.into())
            .context(format!("Malformed pack file {}", path.display()))
    }

    /// Validate the signature, version and entry count of an in-memory pack
    pub fn parse(data: Bytes) -> Result<Self, PackError> {
        if (data.len() as u64) < PACK_HEADER_SIZE + PACK_TRAILER_SIZE {
            return Err(PackError::Truncated);
        }

        let mut header = Cursor::new(&data[..PACK_HEADER_SIZE as usize]);

        let mut signature = [0u8; 4];
        header
            .read_exact(&mut signature)
            .map_err(|_| PackError::Truncated)?;
        if &signature != b"PACK" {
            return Err(PackError::BadSignature);
        }

        let version = header
            .read_u32::<NetworkEndian>()
            .map_err(|_| PackError::Truncated)?;
        if version != 2 && version != 3 {
            return Err(PackError::UnsupportedVersion(version));
        }

        let entry_count = header
            .read_u32::<NetworkEndian>()
            .map_err(|_| PackError::Truncated)?;

        Ok(PackFile { data, entry_count })
    }

    /// Number of entries the header declares
    pub fn entry_count(&self) -> u32 {
        self.entry_count
    }

    /// End of the entry data region: where the trailing checksum begins
    pub fn data_end(&self) -> u64 {
        self.data.len() as u64 - PACK_TRAILER_SIZE
    }

    /// Compare the trailing checksum against the pack contents
    pub fn verify_checksum(&self) -> Result<(), PackError> {
        let data_end = self.data_end() as usize;

        let mut hasher = Sha1::new();
        hasher.update(&self.data[..data_end]);
        let actual = ObjectId::from_digest(&hasher.finalize());

        let expected = ObjectId::from_digest(&self.data[data_end..]);

        if actual != expected {
            return Err(PackError::ChecksumMismatch { expected, actual });
        }

        Ok(())
    }

    /// Parse the entry header at `offset`
    pub fn entry_header_at(&self, offset: u64) -> Result<EntryHeader, PackError> {
        if offset < PACK_HEADER_SIZE || offset >= self.data_end() {
            return Err(PackError::BadOffset(offset));
        }

        let mut pos = offset;
        let first = self.byte_at(pos)?;
        pos += 1;

        let type_code = (first >> 4) & 0x07;
        let mut size = (first & 0x0f) as u64;
        let mut shift = 4u32;

        let mut byte = first;
        while byte & 0x80 != 0 {
            if pos - offset >= MAX_ENTRY_HEADER_BYTES || shift > 63 {
                return Err(PackError::BadEntrySize(offset));
            }
            byte = self.byte_at(pos)?;
            pos += 1;
            size |= ((byte & 0x7f) as u64) << shift;
            shift += 7;
        }

        let kind = match type_code {
            6 => {
                let (rel, next) = self.read_base_displacement(offset, pos)?;
                pos = next;
                EntryKind::Delta(BasePointer::Offset(rel))
            }
            7 => {
                let end = pos + (OBJECT_ID_LENGTH / 2) as u64;
                if end > self.data_end() {
                    return Err(PackError::Truncated);
                }
                let mut raw = Cursor::new(&self.data[pos as usize..end as usize]);
                let base = ObjectId::read_h40_from(&mut raw)
                    .map_err(|_| PackError::Truncated)?;
                pos = end;
                EntryKind::Delta(BasePointer::Hash(base))
            }
            code => match ObjectType::from_pack_code(code) {
                Some(object_type) => EntryKind::Plain(object_type),
                None => return Err(PackError::BadEntryType(code)),
            },
        };

        Ok(EntryHeader {
            kind,
            size,
            data_start: pos,
        })
    }

    /// Inflate the zlib stream starting at `data_start`
    ///
    /// Returns the decompressed bytes and the count of compressed bytes
    /// consumed, which locates the next entry in the pack.
    pub fn inflate_at(&self, data_start: u64) -> Result<(Bytes, u64), PackError> {
        if data_start > self.data_end() {
            return Err(PackError::BadOffset(data_start));
        }

        let input = &self.data[data_start as usize..self.data_end() as usize];
        let mut decoder = flate2::read::ZlibDecoder::new(input);
        let mut inflated = Vec::new();
        decoder
            .read_to_end(&mut inflated)
            .map_err(|err| PackError::Inflate(err.to_string()))?;

        Ok((inflated.into(), decoder.total_in()))
    }

    /// Decode an ofs-delta base displacement
    ///
    /// The displacement is a big-endian base-128 number where each
    /// continuation adds one, so shorter encodings never alias longer ones.
    fn read_base_displacement(
        &self,
        entry_offset: u64,
        mut pos: u64,
    ) -> Result<(u64, u64), PackError> {
        let mut byte = self.byte_at(pos)?;
        pos += 1;

        let mut rel = (byte & 0x7f) as u64;
        let mut bytes_read = 1u64;

        while byte & 0x80 != 0 {
            if bytes_read >= MAX_OFS_BYTES {
                return Err(PackError::BadBaseDisplacement(entry_offset));
            }
            byte = self.byte_at(pos)?;
            pos += 1;
            bytes_read += 1;
            rel = ((rel + 1) << 7) | ((byte & 0x7f) as u64);
        }

        // the base must land at or after the pack header
        if rel > entry_offset - PACK_HEADER_SIZE {
            return Err(PackError::BadBaseDisplacement(entry_offset));
        }

        Ok((rel, pos))
    }

    fn byte_at(&self, pos: u64) -> Result<u8, PackError> {
        if pos >= self.data_end() {
            return Err(PackError::Truncated);
        }
        Ok(self.data[pos as usize])
    }
}
