//! MCP server handler implementation.
//!
//! The host side of the agent: lifecycle events and intercepted requests
//! arrive as tool calls and are routed to the shared [`Agent`].
use std::sync::Arc;

use crate::agent::Agent;
use crate::tools::{
    CacheEntriesParams, FetchParams, activate_impl, entries_impl, fetch_impl, install_impl, keys_impl, status_impl,
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for lantern.
#[derive(Clone)]
pub struct LanternServer {
    agent: Arc<Agent>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
#[tool_router]
impl LanternServer {
    /// Create a new server handler around a booted agent.
    pub fn new(agent: Arc<Agent>) -> Self {
        Self { agent, tool_router: Self::tool_router() }
    }

    #[tool(description = "Run the install phase: provision the versioned cache bucket with every manifest asset.")]
    async fn install(&self) -> Result<CallToolResult, McpError> {
        install_impl(self.agent.as_ref()).await
    }

    #[tool(description = "Run the activate phase: delete stale buckets carrying the application prefix.")]
    async fn activate(&self) -> Result<CallToolResult, McpError> {
        activate_impl(self.agent.as_ref()).await
    }

    /// Intercept a request the way a page load would.
    #[tool(description = "Request a URL through the cache agent. Served from cache when stored, otherwise from the network.")]
    async fn fetch(&self, params: Parameters<FetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(self.agent.as_ref(), params.0).await
    }

    #[tool(description = "Report the agent's lifecycle phase and active bucket.")]
    async fn status(&self) -> Result<CallToolResult, McpError> {
        status_impl(self.agent.as_ref()).await
    }

    #[tool(description = "List every cache bucket in storage.")]
    async fn cache_keys(&self) -> Result<CallToolResult, McpError> {
        keys_impl(self.agent.as_ref()).await
    }

    #[tool(description = "List the request URLs stored in a bucket (default: the active bucket).")]
    async fn cache_entries(&self, params: Parameters<CacheEntriesParams>) -> Result<CallToolResult, McpError> {
        entries_impl(self.agent.as_ref(), params.0).await
    }
}

impl ServerHandler for LanternServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "lantern".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
