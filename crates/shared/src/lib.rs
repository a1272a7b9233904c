//! Shared utilities and common types for the Asset Tracker backend.
//!
//! This crate provides functionality used across the other crates:
//! - Shared-secret hashing for the reader/admin key headers
//! - Cursor-based pagination for log history
//! - Common validation logic
//! - A read-through TTL cache for lookup results

pub mod cache;
pub mod crypto;
pub mod pagination;
pub mod validation;
