//! SQLite-backed bucket storage.
//!
//! Buckets and their entries live in one database accessed via
//! tokio-rusqlite:
//!
//! - Request identity keyed by SHA-256 of method and URL
//! - Atomic bulk writes
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod buckets;
pub mod connection;
pub mod hash;
pub mod migrations;

pub use crate::Error;

pub use connection::CacheDb;
