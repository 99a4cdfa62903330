//! # Thoughtline MCP Server
//!
//! Implements `ServerHandler` with two tools that proxy to the Thoughtline
//! HTTP API: `sequentialthinking` and `thought_graph_status`.

use crate::client::ThoughtlineClient;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// MCP SERVER
// =============================================================================

/// MCP server that bridges to a Thoughtline HTTP API.
#[derive(Clone)]
pub struct ThoughtlineMcp {
    client: ThoughtlineClient,
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

// =============================================================================
// TOOL PARAMETERS
// =============================================================================

/// One reasoning step. Forwarded verbatim as the `POST /thought` body.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtParams {
    #[schemars(description = "Your current thinking step")]
    pub thought: String,
    #[schemars(description = "Current thought number, starting at 1")]
    pub thought_number: u32,
    #[schemars(description = "Estimated total thoughts needed (can be adjusted)")]
    pub total_thoughts: u32,
    #[schemars(description = "Whether another thought step is needed")]
    pub next_thought_needed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Whether this thought revises previous thinking")]
    pub is_revision: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Which thought number is being reconsidered")]
    pub revises_thought: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Thought number this branch forks from")]
    pub branch_from_thought: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Identifier of the current branch")]
    pub branch_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Whether more thoughts are needed beyond the estimate")]
    pub needs_more_thoughts: Option<bool>,
}

// =============================================================================
// TOOL IMPLEMENTATIONS
// =============================================================================

#[tool_router]
impl ThoughtlineMcp {
    pub fn new(client: ThoughtlineClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Dynamic, reflective problem-solving through a sequence of thoughts. \
                       Each thought may revise an earlier one or branch into an alternative \
                       line of reasoning; the resulting lineage graph is visible to observers."
    )]
    async fn sequentialthinking(
        &self,
        params: Parameters<ThoughtParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.client.ingest_thought(&params.0).await {
            Ok(resp) => Ok(thought_result(&resp)),
            Err(e) => Err(McpError::internal_error(format!("{e}"), None)),
        }
    }

    #[tool(description = "Get lineage graph statistics (nodes and edges by kind, branches, observers)")]
    async fn thought_graph_status(&self) -> Result<CallToolResult, McpError> {
        match self.client.status().await {
            Ok(resp) => Ok(CallToolResult::success(vec![Content::text(format_status(
                &resp,
            ))])),
            Err(e) => Err(McpError::internal_error(format!("{e}"), None)),
        }
    }
}

// =============================================================================
// SERVER HANDLER
// =============================================================================

#[tool_handler]
impl ServerHandler for ThoughtlineMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Sequential thinking server. Record each reasoning step with \
                 `sequentialthinking`; revisions and branches are tracked as a graph."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// =============================================================================
// RESPONSE FORMATTING
// =============================================================================

/// Success payload as pretty JSON, or an error result for a rejected record.
fn thought_result(resp: &Value) -> CallToolResult {
    let text = serde_json::to_string_pretty(resp).unwrap_or_else(|_| resp.to_string());
    if resp.get("status").and_then(Value::as_str) == Some("failed") {
        CallToolResult::error(vec![Content::text(text)])
    } else {
        CallToolResult::success(vec![Content::text(text)])
    }
}

/// Render `GET /status` metrics.
fn format_status(resp: &Value) -> String {
    let count = |key: &str| resp.get(key).and_then(Value::as_u64).unwrap_or(0);
    format!(
        "Thought Graph Status:\n  Nodes: {} (main {}, revision {}, branch {})\n  Edges: {} (linear {}, branch {}, revision {})\n  Branches: {}\n  History: {}\n  Observers: {}",
        count("node_count"),
        count("main_nodes"),
        count("revision_nodes"),
        count("branch_nodes"),
        count("edge_count"),
        count("linear_edges"),
        count("branch_edges"),
        count("revision_edges"),
        count("branch_count"),
        count("history_length"),
        count("observer_count"),
    )
}
