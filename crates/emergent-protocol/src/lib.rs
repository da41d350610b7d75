//! MCP wire protocol types (JSON-RPC 2.0).
//!
//! Implements the Model Context Protocol wire format on top of JSON-RPC 2.0.
//! Reference: <https://spec.modelcontextprotocol.io/>
//!
//! # Framing
//!
//! - stdio: one JSON value per line, `\n`-delimited (see `emergent-server`'s
//!   stdio transport).
//! - HTTP: a single message or a JSON array of messages in a POST body (see
//!   `emergent-server`'s HTTP transport, MCP 2025-03-26 Streamable HTTP).
//!
//! Both transports drive the same [`JsonRpcRequest`] / [`JsonRpcResponse`]
//! types and the same dispatcher.

mod jsonrpc;
mod mcp;

pub use jsonrpc::{ErrorCode, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId};
pub use mcp::{
    ClientCapabilities, ClientInfo, ContentBlock, InitializeParams, InitializeResult,
    PromptArgument, PromptDefinition, PromptGetResult, PromptMessage, PromptsCapability,
    PromptsListResult, ResourceContents, ResourceDefinition, ResourceReadResult,
    ResourcesCapability, ResourcesListResult, RootsCapability, ServerCapabilities, ServerInfo,
    ToolCallParams, ToolCallResult, ToolDefinition, ToolsCapability, ToolsListResult,
};

/// JSON-RPC 2.0 version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol version this server advertises and accepts.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Known MCP / JSON-RPC methods the dispatcher recognises.
pub mod methods {
    /// Initialize the connection.
    pub const INITIALIZE: &str = "initialize";
    /// Notification that initialization is complete. No response is sent.
    pub const INITIALIZED: &str = "notifications/initialized";
    /// List available tools.
    pub const TOOLS_LIST: &str = "tools/list";
    /// Invoke a tool.
    pub const TOOLS_CALL: &str = "tools/call";
    /// List available prompts.
    pub const PROMPTS_LIST: &str = "prompts/list";
    /// Fetch a single prompt.
    pub const PROMPTS_GET: &str = "prompts/get";
    /// List available resources.
    pub const RESOURCES_LIST: &str = "resources/list";
    /// Read a single resource.
    pub const RESOURCES_READ: &str = "resources/read";
    /// Keepalive ping.
    pub const PING: &str = "ping";
}
