//! Command implementations
//!
//! Only plumbing commands exist here: pack verification is a low-level
//! object-database operation with no porcelain surface.

pub mod plumbing;
