//! Core types and shared functionality for lantern.
//!
//! This crate provides:
//! - Request/response types and URL canonicalization
//! - Bucket storage with SQLite backend
//! - The storage and network seams used by the cache agent
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod network;
pub mod request;
pub mod storage;

pub use cache::CacheDb;
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use network::Network;
pub use request::{Request, Response};
pub use storage::CacheStorage;
