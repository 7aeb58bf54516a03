//! The verification scan
//!
//! One forward pass over the pack builds three structures: an object
//! index keyed by content hash, an offset index mapping every entry's
//! offset to its resolved hash (ofs-delta parents are named through it),
//! and the pending set of every hash observed, which later drives the
//! report in ascending hash order. All three are owned by the run,
//! written only here, and read-only once the scan returns.
//!
//! Hashing always happens on fully expanded content. A delta entry and a
//! plain entry holding the same bytes produce the same hash, which is what
//! makes object identity hold across packs and across encodings.

use crate::areas::pack_store::PackStore;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::pack::entry::{BasePointer, EntryKind};
use crate::artifacts::pack::error::PackError;
use crate::artifacts::pack::scan::{Entries, ScannedEntry};
use derive_new::new;
use std::collections::{BTreeSet, HashMap};

/// How often the scan reports progress, in entries
const PROGRESS_CADENCE: u32 = 256;

/// Index entry for one verified object, keyed by content hash
#[derive(Debug, Clone, new)]
pub struct IndexRecord {
    /// Resolved kind: for deltas, the kind of the chain's ultimate base
    pub kind: ObjectType,
    /// Size of the fully expanded object
    pub actual_size: u64,
    /// Size the entry header declares for the stored data
    pub stored_size: u64,
    pub offset: u64,
    /// Immediate base pointer and chain length, for delta entries
    pub delta: Option<(BasePointer, u32)>,
}

/// Verified index of a pack: every object's identity and placement
#[derive(Debug, Default)]
pub struct PackIndex {
    objects: HashMap<ObjectId, IndexRecord>,
    offsets: HashMap<u64, ObjectId>,
    pending: BTreeSet<ObjectId>,
}

impl PackIndex {
    /// Record one verified object under its content hash
    ///
    /// Re-inserting a hash is idempotent: identical content reached through
    /// different encodings carries identical resolved data.
    pub(crate) fn insert(&mut self, oid: ObjectId, record: IndexRecord) {
        self.offsets.insert(record.offset, oid.clone());
        self.pending.insert(oid.clone());
        self.objects.insert(oid, record);
    }

    pub fn record(&self, oid: &ObjectId) -> Option<&IndexRecord> {
        self.objects.get(oid)
    }

    /// Hash of the entry at `offset`, if one exists
    pub fn oid_at_offset(&self, offset: u64) -> Option<&ObjectId> {
        self.offsets.get(&offset)
    }

    /// Every observed hash, in ascending order
    pub fn oids(&self) -> impl Iterator<Item = &ObjectId> {
        self.pending.iter()
    }

    /// Number of distinct objects in the pack
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Scan every entry of the store's pack and build the object index
///
/// `progress` receives the remaining-entry count at a fixed cadence; it
/// carries no correctness semantics. The scan is all-or-nothing: on the
/// first failure the partial index is dropped and never reported.
pub fn verify_pack(
    store: &PackStore,
    mut progress: impl FnMut(u32),
) -> Result<PackIndex, PackError> {
    let pack = store.pack();
    let mut index = PackIndex::default();
    let mut remaining = pack.entry_count();

    let mut entries = Entries::new(pack);
    while let Some(scanned) = entries.next() {
        let ScannedEntry { entry, payload } = scanned?;

        match (&entry.kind, payload) {
            (EntryKind::Plain(object_type), Some(payload)) => {
                let oid = store.hash_object(object_type, &payload);
                index.insert(
                    oid,
                    IndexRecord::new(
                        object_type.clone(),
                        entry.actual_size,
                        entry.stored_size,
                        entry.offset,
                        None,
                    ),
                );
            }
            _ => {
                // a delta's identity only exists in its expanded form
                let resolved = store.materialize(entry.offset)?;
                let oid = store.hash_object(&resolved.kind, &resolved.payload);
                let delta = resolved
                    .chain
                    .first()
                    .map(|head| (head.clone(), resolved.chain.len() as u32));
                index.insert(
                    oid,
                    IndexRecord::new(
                        resolved.kind,
                        resolved.size,
                        entry.stored_size,
                        entry.offset,
                        delta,
                    ),
                );
            }
        }

        remaining -= 1;
        if remaining % PROGRESS_CADENCE == 0 {
            progress(remaining);
        }
    }

    if entries.position() != pack.data_end() {
        return Err(PackError::TrailingBytes {
            expected: pack.data_end(),
            actual: entries.position(),
        });
    }

    Ok(index)
}
