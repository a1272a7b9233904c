//! Persistence layer for the Asset Tracker backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - SQL migrations (run at startup via `sqlx::migrate!`)

pub mod db;
pub mod entities;
pub mod repositories;
