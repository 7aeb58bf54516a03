//! Git object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character hexadecimal strings representing SHA-1 hashes.
//! They uniquely identify all objects in Git (blobs, trees, commits, tags).
//!
//! ## Format
//!
//! - Hex: 40 hex characters (e.g., "abc123...def")
//! - Binary: 20 raw bytes, as stored in pack entries and trailers
//!
//! The derived `Ord` is the ascending order of the hash's binary
//! representation, since the hex encoding is lowercase and fixed-width.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_type::ObjectType;
use sha1::{Digest, Sha1};
use std::io;

/// Git object identifier (SHA-1 hash)
///
/// A 40-character hexadecimal string that uniquely identifies an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// # Arguments
    ///
    /// * `id` - 40-character hexadecimal string
    ///
    /// # Returns
    ///
    /// Validated ObjectId or error if invalid length/characters
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object ID length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid object ID characters: {}", id));
        }
        Ok(Self(id.to_string()))
    }

    /// Build an object ID from a 20-byte binary digest
    ///
    /// Used for ref-delta base references and pack trailer checksums, which
    /// store hashes in raw binary form.
    pub fn from_digest(digest: &[u8]) -> Self {
        let mut hex40 = String::with_capacity(OBJECT_ID_LENGTH);
        for byte in digest {
            hex40.push_str(&format!("{byte:02x}"));
        }
        Self(hex40)
    }

    /// Hash an object's canonical encoding
    ///
    /// The identity of any object is the SHA-1 of `<type> <size>\0<content>`,
    /// computed over the fully expanded content. Two objects with identical
    /// kind and content share an ID no matter how a pack happens to encode
    /// them.
    pub fn from_content(object_type: &ObjectType, payload: &[u8]) -> Self {
        let header = format!("{} {}\0", object_type.as_str(), payload.len());

        let mut hasher = Sha1::new();
        hasher.update(header.as_bytes());
        hasher.update(payload);

        Self::from_digest(&hasher.finalize())
    }

    /// Read an object ID from binary format (20 bytes)
    ///
    /// Reads 20 bytes and converts to a 40-character hex string.
    ///
    /// # Arguments
    ///
    /// * `reader` - Source of the binary data
    pub fn read_h40_from<R: io::Read + ?Sized>(reader: &mut R) -> anyhow::Result<Self> {
        let mut digest = [0u8; OBJECT_ID_LENGTH / 2];
        reader.read_exact(&mut digest)?;

        Ok(Self::from_digest(&digest))
    }

    /// Write the object ID in binary format (20 bytes)
    ///
    /// Converts the 40-char hex string to 20 bytes and writes to the given writer.
    ///
    /// # Arguments
    ///
    /// * `writer` - Destination for the binary data
    pub fn write_h40_to<W: io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        let hex40 = self.as_ref();

        // Process a nibble at a time
        for i in (0..OBJECT_ID_LENGTH).step_by(2) {
            let byte = u8::from_str_radix(&hex40[i..i + 2], 16)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "Invalid hex digit"))?;
            writer.write_all(&[byte])?;
        }

        Ok(())
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
