//! MCP tool implementations.
//!
//! Each tool maps one host lifecycle event or inspection query onto the
//! cache agent.
#![allow(unused_imports)]

pub mod cache;
pub mod fetch;
pub mod lifecycle;

#[cfg(test)]
pub(crate) mod testing;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use lantern_core::Error;

pub use cache::{CacheEntriesParams, CacheEntriesOutput, CacheKeysOutput, entries_impl, keys_impl};
pub use fetch::{FetchOutput, FetchParams, fetch_impl};
pub use lifecycle::{StatusOutput, activate_impl, install_impl, status_impl};

/// Serialize a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
