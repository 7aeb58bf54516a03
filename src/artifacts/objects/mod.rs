//! Git object identity
//!
//! Packed objects come in four kinds (blobs, trees, commits and tags),
//! and every object is identified by the SHA-1 hash of its canonical
//! `<type> <size>\0<content>` encoding. This module provides the kind and
//! identifier types; decoding the objects themselves (commit fields, tree
//! entries, ...) is out of scope for a pack verifier.

pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
