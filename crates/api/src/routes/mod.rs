//! HTTP route handlers.

pub mod assets;
pub mod dashboard;
pub mod health;
pub mod locations;
pub mod reader_config;
pub mod reader_logs;
pub mod readers;
pub mod tags;
