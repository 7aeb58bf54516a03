//! Pack data structures and algorithms
//!
//! This module contains the core types and algorithms:
//!
//! - `objects`: object kinds and SHA-1 identity
//! - `pack`: packfile reading, delta application, verification and
//!   reporting

pub mod objects;
pub mod pack;
