//! Domain layer for the Asset Tracker backend.
//!
//! This crate contains:
//! - Domain models (Location, Tag, Reader, Asset, AssetLocationLog)
//! - Request/response payloads for the HTTP surface
//! - Pure business services (change detection, config resolution)
//!
//! Nothing here performs I/O.

pub mod models;
pub mod services;
