//! Cache inspection tools.
//!
//! Read-only views of bucket storage. Nothing here writes entries.

pub mod entries;
pub mod keys;

pub use entries::{CacheEntriesOutput, CacheEntriesParams, entries_impl};
pub use keys::{CacheKeysOutput, keys_impl};
