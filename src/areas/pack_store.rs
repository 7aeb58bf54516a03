//! Object store over a single pack
//!
//! The store answers two questions the verification scan keeps asking:
//! what object lives at this byte offset (fully expanded, however deep its
//! delta chain), and what is the canonical hash of this content. It is the
//! only place delta programs are actually applied; the scan itself never
//! touches delta encoding.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::pack::delta::apply_delta;
use crate::artifacts::pack::entry::{BasePointer, EntryKind};
use crate::artifacts::pack::error::PackError;
use crate::artifacts::pack::file::PackFile;
use crate::artifacts::pack::scan::{Entries, ScannedEntry};
use bytes::Bytes;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

/// Deepest delta chain the store will follow, matching git's maximum pack
/// depth; anything deeper is treated as corruption
const MAX_CHAIN_DEPTH: u32 = 4096;

/// A fully expanded object, with the delta pointers traversed to reach it
///
/// `chain` is ordered head-first: the materialized entry's own pointer,
/// then its base's, down to the non-delta base (which contributes none).
#[derive(Debug)]
pub struct MaterializedObject {
    pub kind: ObjectType,
    pub size: u64,
    pub payload: Bytes,
    pub chain: Vec<BasePointer>,
}

// TODO: cache materialized bases so entries sharing a chain prefix do not
// re-expand it
pub struct PackStore {
    pack: PackFile,
    base_offsets: RefCell<Option<HashMap<ObjectId, u64>>>,
}

impl PackStore {
    pub fn new(pack: PackFile) -> Self {
        PackStore {
            pack,
            base_offsets: RefCell::new(None),
        }
    }

    pub fn open(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::new(PackFile::open(path)?))
    }

    pub fn pack(&self) -> &PackFile {
        &self.pack
    }

    /// Canonical content hash of a (kind, payload) pair
    pub fn hash_object(&self, object_type: &ObjectType, payload: &[u8]) -> ObjectId {
        ObjectId::from_content(object_type, payload)
    }

    /// Fully expand the object at `offset`, following its delta chain
    pub fn materialize(&self, offset: u64) -> Result<MaterializedObject, PackError> {
        self.materialize_at_depth(offset, 0)
    }

    fn materialize_at_depth(
        &self,
        offset: u64,
        depth: u32,
    ) -> Result<MaterializedObject, PackError> {
        if depth > MAX_CHAIN_DEPTH {
            return Err(PackError::ChainTooDeep(depth));
        }

        let header = self.pack.entry_header_at(offset)?;
        let (data, _) = self.pack.inflate_at(header.data_start)?;
        if data.len() as u64 != header.size {
            return Err(PackError::SizeMismatch {
                offset,
                declared: header.size,
                inflated: data.len() as u64,
            });
        }

        match header.kind {
            EntryKind::Plain(kind) => Ok(MaterializedObject {
                kind,
                size: header.size,
                payload: data,
                chain: Vec::new(),
            }),
            EntryKind::Delta(pointer) => {
                let base_offset = match &pointer {
                    BasePointer::Offset(rel) => offset - rel,
                    BasePointer::Hash(oid) => self.base_offset_of(oid)?,
                };
                let base = self.materialize_at_depth(base_offset, depth + 1)?;
                let payload = apply_delta(&base.payload, &data)?;

                let mut chain = Vec::with_capacity(base.chain.len() + 1);
                chain.push(pointer);
                chain.extend(base.chain);

                Ok(MaterializedObject {
                    kind: base.kind,
                    size: payload.len() as u64,
                    payload,
                    chain,
                })
            }
        }
    }

    /// Offset of the non-delta entry whose content hashes to `oid`
    ///
    /// The hash-to-offset table is built on first use by one sequential
    /// sweep over the pack. Only non-delta entries are swept: a chain must
    /// terminate at one, and hashing them needs no delta expansion.
    fn base_offset_of(&self, oid: &ObjectId) -> Result<u64, PackError> {
        let mut cache = self.base_offsets.borrow_mut();
        if cache.is_none() {
            *cache = Some(self.sweep_base_offsets()?);
        }

        cache
            .as_ref()
            .and_then(|offsets| offsets.get(oid))
            .copied()
            .ok_or_else(|| PackError::MissingBaseHash(oid.clone()))
    }

    fn sweep_base_offsets(&self) -> Result<HashMap<ObjectId, u64>, PackError> {
        let mut offsets = HashMap::new();
        for scanned in Entries::new(&self.pack) {
            let ScannedEntry { entry, payload } = scanned?;
            if let (EntryKind::Plain(object_type), Some(payload)) = (&entry.kind, payload) {
                offsets.insert(ObjectId::from_content(object_type, &payload), entry.offset);
            }
        }
        Ok(offsets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::pack::fixtures::{PackBuilder, copy_then_insert_delta};

    fn store_for(builder: PackBuilder) -> PackStore {
        PackStore::new(PackFile::parse(builder.build()).unwrap())
    }

    #[test]
    fn materializes_a_plain_entry_with_an_empty_chain() {
        let mut builder = PackBuilder::new();
        let offset = builder.add_plain(&ObjectType::Commit, b"tree 1234\n");
        let store = store_for(builder);

        let object = store.materialize(offset).unwrap();
        assert_eq!(object.kind, ObjectType::Commit);
        assert_eq!(object.size, 10);
        assert_eq!(&object.payload[..], b"tree 1234\n");
        assert!(object.chain.is_empty());
    }

    #[test]
    fn follows_an_ofs_chain_and_orders_pointers_head_first() {
        let mut builder = PackBuilder::new();
        let base_offset = builder.add_plain(&ObjectType::Blob, b"aaaa");
        let first_delta = copy_then_insert_delta(b"aaaa", b"b");
        let first_offset =
            builder.add_ofs_delta(builder.next_offset() - base_offset, &first_delta);
        let second_delta = copy_then_insert_delta(b"aaaab", b"c");
        let second_offset =
            builder.add_ofs_delta(builder.next_offset() - first_offset, &second_delta);
        let store = store_for(builder);

        let object = store.materialize(second_offset).unwrap();
        assert_eq!(object.kind, ObjectType::Blob);
        assert_eq!(&object.payload[..], b"aaaabc");
        assert_eq!(
            object.chain,
            vec![
                BasePointer::Offset(second_offset - first_offset),
                BasePointer::Offset(first_offset - base_offset),
            ]
        );
    }

    #[test]
    fn resolves_a_ref_delta_through_the_hash_sweep() {
        let base_id = ObjectId::from_content(&ObjectType::Tag, b"object 99\n");
        let mut builder = PackBuilder::new();
        builder.add_plain(&ObjectType::Tag, b"object 99\n");
        let delta = copy_then_insert_delta(b"object 99\n", b"tagged");
        let delta_offset = builder.add_ref_delta(&base_id, &delta);
        let store = store_for(builder);

        let object = store.materialize(delta_offset).unwrap();
        assert_eq!(object.kind, ObjectType::Tag);
        assert_eq!(&object.payload[..], b"object 99\ntagged");
        assert_eq!(object.chain, vec![BasePointer::Hash(base_id)]);
    }

    #[test]
    fn a_ref_delta_base_missing_from_the_pack_is_fatal() {
        let absent = ObjectId::from_content(&ObjectType::Blob, b"not here");
        let mut builder = PackBuilder::new();
        builder.add_plain(&ObjectType::Blob, b"present");
        let delta = copy_then_insert_delta(b"not here", b"!");
        let delta_offset = builder.add_ref_delta(&absent, &delta);
        let store = store_for(builder);

        assert_eq!(
            store.materialize(delta_offset).unwrap_err(),
            PackError::MissingBaseHash(absent)
        );
    }

    #[test]
    fn a_delta_against_the_wrong_base_size_is_fatal() {
        let mut builder = PackBuilder::new();
        let base_offset = builder.add_plain(&ObjectType::Blob, b"four");
        // program claims a five-byte base
        let delta = copy_then_insert_delta(b"five!", b"");
        let delta_offset =
            builder.add_ofs_delta(builder.next_offset() - base_offset, &delta);
        let store = store_for(builder);

        assert!(matches!(
            store.materialize(delta_offset).unwrap_err(),
            PackError::DeltaBaseSizeMismatch { .. }
        ));
    }
}
