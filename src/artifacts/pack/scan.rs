//! Sequential pack entry enumeration
//!
//! `Entries` walks a pack front to back, yielding exactly the number of
//! entries the header declares. Each step parses one entry header and
//! inflates its zlib stream, both to recover non-delta payloads and to
//! find where the next entry begins, since entries carry no length field.
//! Delta programs are inflated for advancement only; expanding them is the
//! object store's job, so that cost is paid once.
//!
//! The sequence is finite and non-restartable: the first failure poisons
//! the iterator and nothing further is yielded.

use crate::artifacts::pack::PACK_HEADER_SIZE;
use crate::artifacts::pack::entry::{EntryKind, PackEntry};
use crate::artifacts::pack::error::PackError;
use crate::artifacts::pack::file::PackFile;
use bytes::Bytes;

/// One scanned entry: metadata, plus the decoded payload for non-delta
/// entries
#[derive(Debug)]
pub struct ScannedEntry {
    pub entry: PackEntry,
    pub payload: Option<Bytes>,
}

/// Lazy reader over every entry of a pack, in file order
pub struct Entries<'a> {
    pack: &'a PackFile,
    next_offset: u64,
    remaining: u32,
    failed: bool,
}

impl<'a> Entries<'a> {
    pub fn new(pack: &'a PackFile) -> Self {
        Entries {
            pack,
            next_offset: PACK_HEADER_SIZE,
            remaining: pack.entry_count(),
            failed: false,
        }
    }

    /// Pack offset the scan has advanced to
    ///
    /// After a complete scan this must equal the pack's data end; anything
    /// else means the pack carries bytes no entry accounts for.
    pub fn position(&self) -> u64 {
        self.next_offset
    }

    fn read_entry(&mut self) -> Result<ScannedEntry, PackError> {
        let offset = self.next_offset;
        let header = self.pack.entry_header_at(offset)?;

        let (inflated, consumed) = self.pack.inflate_at(header.data_start)?;
        if inflated.len() as u64 != header.size {
            return Err(PackError::SizeMismatch {
                offset,
                declared: header.size,
                inflated: inflated.len() as u64,
            });
        }
        self.next_offset = header.data_start + consumed;

        let payload = match &header.kind {
            EntryKind::Plain(_) => Some(inflated),
            EntryKind::Delta(_) => None,
        };

        Ok(ScannedEntry {
            entry: PackEntry::new(offset, header.size, header.size, header.kind),
            payload,
        })
    }
}

impl Iterator for Entries<'_> {
    type Item = Result<ScannedEntry, PackError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let result = self.read_entry();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.failed { 0 } else { self.remaining as usize };
        (remaining, Some(remaining))
    }
}
