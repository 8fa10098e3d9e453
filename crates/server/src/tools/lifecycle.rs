//! install, activate and status tools.
//!
//! These stand in for the host lifecycle events: each call runs the phase to
//! completion before returning.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use lantern_core::{CacheStorage, Network};
use lantern_worker::{CacheAgent, Phase};

use super::json_result;

/// Output from the status tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StatusOutput {
    /// Current lifecycle phase.
    pub phase: Phase,
    /// Name of the active bucket.
    pub bucket: String,
    /// Number of manifest entries provisioned at install.
    pub manifest_entries: usize,
}

/// Implementation of the install tool.
pub async fn install_impl<S, N>(agent: &CacheAgent<S, N>) -> Result<CallToolResult, McpError>
where
    S: CacheStorage,
    N: Network,
{
    let report = agent.install().await?;
    json_result(&report)
}

/// Implementation of the activate tool.
pub async fn activate_impl<S, N>(agent: &CacheAgent<S, N>) -> Result<CallToolResult, McpError>
where
    S: CacheStorage,
    N: Network,
{
    let report = agent.activate().await?;
    json_result(&report)
}

/// Implementation of the status tool.
pub async fn status_impl<S, N>(agent: &CacheAgent<S, N>) -> Result<CallToolResult, McpError>
where
    S: CacheStorage,
    N: Network,
{
    let output = StatusOutput {
        phase: agent.phase().await,
        bucket: agent.bucket_name(),
        manifest_entries: agent.settings().manifest.len(),
    };
    json_result(&output)
}
