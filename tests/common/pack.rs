//! Builds packfiles on disk for command tests.

use packcheck::artifacts::objects::object_id::ObjectId;
use packcheck::artifacts::objects::object_type::ObjectType;
use sha1::{Digest, Sha1};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Assembles well-formed (or deliberately corrupt) packs entry by entry.
pub struct PackBuilder {
    body: Vec<u8>,
    count: u32,
    count_override: Option<u32>,
}

impl PackBuilder {
    pub fn new() -> Self {
        PackBuilder {
            body: Vec::new(),
            count: 0,
            count_override: None,
        }
    }

    /// Offset the next entry will occupy.
    pub fn next_offset(&self) -> u64 {
        12 + self.body.len() as u64
    }

    /// Force the header's entry count, regardless of entries added.
    pub fn declare_count(&mut self, count: u32) {
        self.count_override = Some(count);
    }

    pub fn add_plain(&mut self, object_type: &ObjectType, payload: &[u8]) -> u64 {
        let offset = self.next_offset();
        let code = match object_type {
            ObjectType::Commit => 1,
            ObjectType::Tree => 2,
            ObjectType::Blob => 3,
            ObjectType::Tag => 4,
        };
        self.push_entry_header(code, payload.len() as u64);
        self.push_compressed(payload);
        self.count += 1;
        offset
    }

    pub fn add_ofs_delta(&mut self, rel: u64, delta: &[u8]) -> u64 {
        let offset = self.next_offset();
        self.push_entry_header(6, delta.len() as u64);
        let displacement = ofs_varint(rel);
        self.body.extend_from_slice(&displacement);
        self.push_compressed(delta);
        self.count += 1;
        offset
    }

    pub fn add_ref_delta(&mut self, base: &ObjectId, delta: &[u8]) -> u64 {
        let offset = self.next_offset();
        self.push_entry_header(7, delta.len() as u64);
        base.write_h40_to(&mut self.body).unwrap();
        self.push_compressed(delta);
        self.count += 1;
        offset
    }

    /// Splice raw bytes where an entry should be, corrupting the pack.
    pub fn add_raw(&mut self, bytes: &[u8]) -> u64 {
        let offset = self.next_offset();
        self.body.extend_from_slice(bytes);
        self.count += 1;
        offset
    }

    pub fn build(self) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"PACK");
        data.extend_from_slice(&2u32.to_be_bytes());
        data.extend_from_slice(
            &self.count_override.unwrap_or(self.count).to_be_bytes(),
        );
        data.extend_from_slice(&self.body);

        let mut hasher = Sha1::new();
        hasher.update(&data);
        let trailer = hasher.finalize();
        data.extend_from_slice(&trailer);

        data
    }

    fn push_entry_header(&mut self, type_code: u8, size: u64) {
        let mut remaining = size >> 4;
        let mut byte = ((type_code & 0x07) << 4) | (size & 0x0f) as u8;
        while remaining > 0 {
            self.body.push(byte | 0x80);
            byte = (remaining & 0x7f) as u8;
            remaining >>= 7;
        }
        self.body.push(byte);
    }

    fn push_compressed(&mut self, data: &[u8]) {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        let compressed = encoder.finish().unwrap();
        self.body.extend_from_slice(&compressed);
    }
}

/// Big-endian base-128 displacement with the +1-per-continuation rule.
fn ofs_varint(mut value: u64) -> Vec<u8> {
    let mut bytes = vec![(value & 0x7f) as u8];
    value >>= 7;
    while value > 0 {
        value -= 1;
        bytes.push(0x80 | (value & 0x7f) as u8);
        value >>= 7;
    }
    bytes.reverse();
    bytes
}

/// Little-endian base-128 varint used inside delta programs.
pub fn delta_varint(mut value: u64) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
    out
}

/// Delta program copying the whole base, then inserting `suffix`.
pub fn copy_then_insert_delta(base: &[u8], suffix: &[u8]) -> Vec<u8> {
    assert!(!base.is_empty() && base.len() < 0x100);
    assert!(suffix.len() < 0x80);

    let mut delta = delta_varint(base.len() as u64);
    delta.extend_from_slice(&delta_varint((base.len() + suffix.len()) as u64));
    // copy: offset 0 (no offset bytes), one explicit size byte
    delta.push(0x90);
    delta.push(base.len() as u8);
    if !suffix.is_empty() {
        delta.push(suffix.len() as u8);
        delta.extend_from_slice(suffix);
    }
    delta
}

/// Write a pack into `<repo>/.git/objects/pack`, named after its trailer.
///
/// Returns the hash part of the name (usable as the command argument) and
/// the file's path.
pub fn install_pack(repository: &Path, data: &[u8]) -> (String, PathBuf) {
    let pack_dir = repository.join(".git").join("objects").join("pack");
    std::fs::create_dir_all(&pack_dir).expect("Failed to create pack directory");

    let trailer = ObjectId::from_digest(&data[data.len() - 20..]);
    let path = pack_dir.join(format!("pack-{trailer}.pack"));
    std::fs::write(&path, data).expect("Failed to write pack file");

    (trailer.to_string(), path)
}

/// Content hash the report is expected to print for an object.
pub fn expected_id(object_type: &ObjectType, payload: &[u8]) -> ObjectId {
    ObjectId::from_content(object_type, payload)
}
