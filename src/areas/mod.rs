//! Core repository components
//!
//! This module contains the building blocks a verification run needs:
//!
//! - `pack_store`: object store over a single pack (materialization and
//!   content hashing)
//! - `repository`: repository location, pack resolution and output wiring

pub mod pack_store;
pub mod repository;
