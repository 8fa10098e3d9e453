//! fetch tool implementation.
//!
//! Routes a request through the agent exactly as an intercepted page request
//! would be: cache first, then network.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use lantern_core::{CacheStorage, Error, Network, Request};
use lantern_worker::{CacheAgent, ResponseSource, Served};

use super::json_result;

/// Input parameters for the fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FetchParams {
    /// Absolute URL to request.
    pub url: String,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "GET".into()
}

/// Output structure for the fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FetchOutput {
    /// Request URL after canonicalization.
    pub url: String,
    /// URL the response was produced for.
    pub final_url: String,
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    /// Body as UTF-8 (lossy).
    pub body: String,
    /// Whether the response came from a bucket or the live network.
    pub source: ResponseSource,
}

impl FetchOutput {
    fn new(request: &Request, served: Served) -> Self {
        Self {
            url: request.url.to_string(),
            final_url: served.response.url.clone(),
            status: served.response.status,
            status_text: served.response.status_text.clone(),
            body: served.response.body_text(),
            headers: served.response.headers,
            source: served.source,
        }
    }
}

/// Implementation of the fetch tool.
pub async fn fetch_impl<S, N>(agent: &CacheAgent<S, N>, params: FetchParams) -> Result<CallToolResult, McpError>
where
    S: CacheStorage,
    N: Network,
{
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let request = Request::new(&params.method, &params.url)?;
    let served = agent.handle_fetch(&request).await?;

    json_result(&FetchOutput::new(&request, served))
}
