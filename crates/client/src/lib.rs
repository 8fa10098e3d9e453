//! Network transport for lantern.
//!
//! This crate provides the reqwest-backed implementation of the
//! [`lantern_core::Network`] seam used by the host.

pub mod fetch;

pub use fetch::{HttpNetwork, NetworkConfig};
