use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use derive_new::new;

/// Reference from a delta entry to its immediate base
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BasePointer {
    /// Base named by its content hash (ref delta)
    Hash(ObjectId),
    /// Base located this many bytes before the delta's own offset (ofs delta)
    Offset(u64),
}

/// Type-or-delta marker parsed from an entry header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A complete object of the given kind
    Plain(ObjectType),
    /// A delta against the pointed-at base
    Delta(BasePointer),
}

/// On-disk metadata of one pack entry
///
/// `stored_size` is the size the entry header declares for the stored data
/// (the payload for plain entries, the delta program for delta entries).
/// `actual_size` is the size of the fully expanded object; the enumerator
/// seeds it with `stored_size` and delta resolution supplies the real value.
#[derive(Debug, Clone, new)]
pub struct PackEntry {
    pub offset: u64,
    pub stored_size: u64,
    pub actual_size: u64,
    pub kind: EntryKind,
}
