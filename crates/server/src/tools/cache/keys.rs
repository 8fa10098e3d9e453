//! cache_keys tool implementation.
//!
//! Lists every bucket in storage, including ones owned by co-hosted
//! applications.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use lantern_core::{CacheStorage, Network};
use lantern_worker::CacheAgent;

use crate::tools::json_result;

/// Output from the cache_keys tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheKeysOutput {
    /// Bucket names, oldest first.
    pub buckets: Vec<String>,
    /// Name of the active bucket (may not exist before install).
    pub active: String,
}

/// Implementation of the cache_keys tool.
pub async fn keys_impl<S, N>(agent: &CacheAgent<S, N>) -> Result<CallToolResult, McpError>
where
    S: CacheStorage,
    N: Network,
{
    let buckets = agent.storage().keys().await?;
    json_result(&CacheKeysOutput { buckets, active: agent.bucket_name() })
}
