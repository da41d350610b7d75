//! The JSON-RPC method dispatcher (§4.B, §4.C, §4.D). Both transports
//! decode bytes into a [`JsonRpcRequest`] and hand it to [`Dispatcher::dispatch`];
//! everything past that point is transport-agnostic.

use crate::context::ToolContext;
use crate::registry::Registry;
use emergent_client::{ClientFactory, RequestContext};
use emergent_protocol::{
    methods, ErrorCode, InitializeParams, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, PromptsCapability, PromptsListResult, RequestId, ResourcesCapability,
    ResourcesListResult, ServerCapabilities, ServerInfo, ToolCallParams, ToolCallResult,
    ToolsCapability, ToolsListResult, MCP_PROTOCOL_VERSION,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Built once at startup, shared (read-only) across every dispatch by both
/// transports.
pub struct Dispatcher {
    registry: Arc<Registry>,
    client_factory: ClientFactory,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, client_factory: ClientFactory) -> Self {
        Self {
            registry,
            client_factory,
        }
    }

    /// Dispatches one decoded request, returning the response to write back
    /// (or a silent response, for notifications — callers must check
    /// [`JsonRpcResponse::is_silent`] before writing anything).
    pub async fn dispatch(&self, request: JsonRpcRequest, ctx: &RequestContext) -> JsonRpcResponse {
        let id = request.id.clone();
        let is_notification = id.is_none();

        // §4.D: any method starting with "notifications/" (or otherwise
        // carrying no id) never receives a reply, even if it's unknown.
        if is_notification {
            if request.method != methods::INITIALIZED {
                warn!(method = %request.method, "ignoring unrecognized notification");
            }
            return JsonRpcResponse::silent();
        }

        let result = match request.method.as_str() {
            methods::INITIALIZE => self.handle_initialize(request.params),
            methods::PING => Ok(Value::Object(Default::default())),
            methods::TOOLS_LIST => Ok(self.handle_tools_list()),
            methods::TOOLS_CALL => self.handle_tools_call(request.params, ctx).await,
            methods::PROMPTS_LIST => self.handle_prompts_list(),
            methods::PROMPTS_GET => self.handle_prompts_get(request.params, ctx).await,
            methods::RESOURCES_LIST => self.handle_resources_list(),
            methods::RESOURCES_READ => self.handle_resources_read(request.params, ctx).await,
            other => Err(JsonRpcError::new(
                ErrorCode::MethodNotFound,
                format!("unknown method {other:?}"),
            )),
        };

        match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => JsonRpcResponse::error(id, error),
        }
    }

    fn handle_initialize(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: InitializeParams = match params {
            Some(v) => serde_json::from_value(v)
                .map_err(|e| JsonRpcError::new(ErrorCode::InvalidParams, e.to_string()))?,
            None => {
                return Err(JsonRpcError::new(
                    ErrorCode::InvalidParams,
                    "initialize requires params",
                ))
            }
        };

        info!(
            client = %params.client_info.name,
            client_version = %params.client_info.version,
            protocol_version = %params.protocol_version,
            "client initialized"
        );

        let result = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
                prompts: self
                    .registry
                    .has_prompts()
                    .then(|| PromptsCapability { list_changed: false }),
                resources: self
                    .registry
                    .has_resources()
                    .then(|| ResourcesCapability { list_changed: false }),
                logging: None,
            },
            server_info: ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        serde_json::to_value(result)
            .map_err(|e| JsonRpcError::new(ErrorCode::InternalError, e.to_string()))
    }

    fn handle_tools_list(&self) -> Value {
        let result = ToolsListResult {
            tools: self.registry.tool_definitions(),
        };
        serde_json::to_value(result).unwrap_or(Value::Null)
    }

    async fn handle_tools_call(
        &self,
        params: Option<Value>,
        ctx: &RequestContext,
    ) -> Result<Value, JsonRpcError> {
        let params: ToolCallParams = match params {
            Some(v) => serde_json::from_value(v)
                .map_err(|e| JsonRpcError::new(ErrorCode::InvalidParams, e.to_string()))?,
            None => {
                return Err(JsonRpcError::new(
                    ErrorCode::InvalidParams,
                    "tools/call requires params",
                ))
            }
        };

        let tool = self.registry.tool(&params.name).ok_or_else(|| {
            JsonRpcError::new(ErrorCode::MethodNotFound, format!("unknown tool {:?}", params.name))
        })?;

        let tool_ctx = self.tool_context(ctx)?;
        let call_result: ToolCallResult = tool.execute(&tool_ctx, params.arguments).await;

        serde_json::to_value(call_result)
            .map_err(|e| JsonRpcError::new(ErrorCode::InternalError, e.to_string()))
    }

    fn handle_prompts_list(&self) -> Result<Value, JsonRpcError> {
        let result = PromptsListResult {
            prompts: self.registry.prompt_definitions(),
        };
        serde_json::to_value(result).map_err(|e| JsonRpcError::new(ErrorCode::InternalError, e.to_string()))
    }

    async fn handle_prompts_get(
        &self,
        params: Option<Value>,
        ctx: &RequestContext,
    ) -> Result<Value, JsonRpcError> {
        let params = params.ok_or_else(|| {
            JsonRpcError::new(ErrorCode::InvalidParams, "prompts/get requires params")
        })?;
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| JsonRpcError::new(ErrorCode::InvalidParams, "missing required field `name`"))?;
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        let prompt = self
            .registry
            .prompt(name)
            .ok_or_else(|| JsonRpcError::new(ErrorCode::MethodNotFound, format!("unknown prompt {name:?}")))?;

        let tool_ctx = self.tool_context(ctx)?;
        let result = prompt
            .get(&tool_ctx, arguments)
            .await
            .map_err(|e| JsonRpcError::new(ErrorCode::InternalError, e.to_string()))?;

        serde_json::to_value(result).map_err(|e| JsonRpcError::new(ErrorCode::InternalError, e.to_string()))
    }

    fn handle_resources_list(&self) -> Result<Value, JsonRpcError> {
        let result = ResourcesListResult {
            resources: self.registry.resource_definitions(),
        };
        serde_json::to_value(result).map_err(|e| JsonRpcError::new(ErrorCode::InternalError, e.to_string()))
    }

    async fn handle_resources_read(
        &self,
        params: Option<Value>,
        ctx: &RequestContext,
    ) -> Result<Value, JsonRpcError> {
        let params = params.ok_or_else(|| {
            JsonRpcError::new(ErrorCode::InvalidParams, "resources/read requires params")
        })?;
        let uri = params
            .get("uri")
            .and_then(Value::as_str)
            .ok_or_else(|| JsonRpcError::new(ErrorCode::InvalidParams, "missing required field `uri`"))?;

        let resource = self
            .registry
            .resource(uri)
            .ok_or_else(|| JsonRpcError::new(ErrorCode::MethodNotFound, format!("unknown resource {uri:?}")))?;

        let tool_ctx = self.tool_context(ctx)?;
        let result = resource
            .read(&tool_ctx)
            .await
            .map_err(|e| JsonRpcError::new(ErrorCode::InternalError, e.to_string()))?;

        serde_json::to_value(result).map_err(|e| JsonRpcError::new(ErrorCode::InternalError, e.to_string()))
    }

    fn tool_context(&self, ctx: &RequestContext) -> Result<ToolContext, JsonRpcError> {
        let client = self
            .client_factory
            .client_for(ctx)
            .map_err(|e| JsonRpcError::new(ErrorCode::InternalError, e.to_string()))?;
        Ok(ToolContext::new(client))
    }
}

/// Parses one raw JSON-RPC request, translating a decode failure into the
/// wire-level `ParseError`/`InvalidRequest` codes so the caller always has a
/// response to send even when the request itself was unparseable.
pub fn parse_request(raw: &str) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_str(raw).map_err(|e| {
        JsonRpcResponse::error(None, JsonRpcError::new(ErrorCode::ParseError, e.to_string()))
    })?;

    serde_json::from_value(value).map_err(|e| {
        JsonRpcResponse::error(
            None,
            JsonRpcError::new(ErrorCode::InvalidRequest, e.to_string()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_request_rejects_invalid_json() {
        let err = parse_request("not json").unwrap_err();
        assert!(!err.is_silent());
        assert_eq!(err.error.unwrap().code, ErrorCode::ParseError.as_i32());
    }

    #[test]
    fn parse_request_rejects_missing_method() {
        let err = parse_request(r#"{"jsonrpc":"2.0","id":1}"#).unwrap_err();
        assert_eq!(err.error.unwrap().code, ErrorCode::InvalidRequest.as_i32());
    }

    #[test]
    fn parse_request_accepts_well_formed_request() {
        let req = parse_request(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#).unwrap();
        assert_eq!(req.method, "ping");
        assert_eq!(req.id, Some(RequestId::Number(1)));
    }
}
