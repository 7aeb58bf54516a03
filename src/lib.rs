//! Packfile verification and indexing
//!
//! A pack is a single append-only file holding many compressed, optionally
//! delta-encoded objects, each identified by the SHA-1 of its expanded
//! content. This crate streams every entry of a pack, resolves delta
//! chains against their bases, recomputes every object's canonical hash,
//! and emits a deterministic, hash-sorted integrity report.

pub mod areas;
pub mod artifacts;
pub mod commands;
