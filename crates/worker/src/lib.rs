//! Offline cache agent for lantern.
//!
//! This crate provides the three lifecycle steps and the state machine that
//! sequences them:
//! - [`provision`]: install, populating the versioned bucket from the manifest
//! - [`reap`]: activate, deleting stale buckets owned by this application
//! - [`intercept`]: fetch, cache-first with network fallback
//! - [`CacheAgent`]: phase tracking and host-facing entry points

pub mod agent;
pub mod intercept;
pub mod provision;
pub mod reap;

#[cfg(test)]
pub(crate) mod testing;

pub use agent::{AgentSettings, CacheAgent, InstallReport, Phase, StartReport};
pub use intercept::{ResponseSource, Served, intercept};
pub use provision::provision;
pub use reap::{ReapFailure, ReapReport, reap, should_keep};
