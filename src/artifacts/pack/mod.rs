//! Packfile reading and verification
//!
//! A pack is a single append-only file holding many zlib-compressed,
//! optionally delta-encoded objects:
//!
//! - `file`: pack header, entry headers and inflation (`PackFile`)
//! - `entry`: entry metadata and delta base pointers
//! - `delta`: delta program application
//! - `scan`: sequential enumeration of every entry
//! - `verify`: the verification scan building the object index
//! - `report`: hash-ordered report and chain statistics
//! - `error`: the fatal error taxonomy
//!
//! Layout: a 12-byte header (`PACK`, version, entry count), back-to-back
//! entries (variable-length header, then a zlib stream), and a 20-byte
//! SHA-1 trailer over everything before it.

pub mod delta;
pub mod entry;
pub mod error;
pub mod file;
pub mod report;
pub mod scan;
pub mod verify;

/// Byte length of the pack header: signature, version, entry count
pub const PACK_HEADER_SIZE: u64 = 12;

/// Byte length of the SHA-1 trailer sealing a pack
pub const PACK_TRAILER_SIZE: u64 = 20;
