//! cache_entries tool implementation.
//!
//! Lists the request URLs stored in one bucket.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use lantern_core::{CacheStorage, Error, Network};
use lantern_worker::CacheAgent;

use crate::tools::json_result;

/// Parameters for the cache_entries tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheEntriesParams {
    /// Bucket to list. Defaults to the active bucket.
    #[serde(default)]
    pub bucket: Option<String>,
}

/// Output from the cache_entries tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheEntriesOutput {
    pub bucket: String,
    /// Stored request URLs, in insertion order.
    pub urls: Vec<String>,
}

/// Implementation of the cache_entries tool.
pub async fn entries_impl<S, N>(agent: &CacheAgent<S, N>, params: CacheEntriesParams) -> Result<CallToolResult, McpError>
where
    S: CacheStorage,
    N: Network,
{
    let bucket = params.bucket.unwrap_or_else(|| agent.bucket_name());
    let storage = agent.storage();

    if !storage.keys().await?.contains(&bucket) {
        return Err(Error::BucketNotFound(bucket).into());
    }

    let urls = storage
        .requests(&bucket)
        .await?
        .into_iter()
        .map(|request| request.url.to_string())
        .collect();

    json_result(&CacheEntriesOutput { bucket, urls })
}
