//! Tool trait, shared error taxonomy, and the per-category implementations.
//!
//! Generalizes the synchronous `McpTool` trait/dispatch pattern to `async`
//! (tool bodies await backend calls) via `async-trait`, since tools are
//! stored as trait objects (`Box<dyn Tool>`) and native async fns in traits
//! aren't `dyn`-safe.

mod constitution;
mod janitor_tool;
mod patterns;
mod query;
mod sync;
mod tasks;
mod workflow;

pub use constitution::tools as constitution_tools;
pub use janitor_tool::tools as janitor_tools;
pub use patterns::tools as pattern_tools;
pub use query::tools as query_tools;
pub use sync::tools as sync_tools;
pub use tasks::tools as task_tools;
pub use workflow::tools as workflow_tools;

use crate::context::ToolContext;
use async_trait::async_trait;
use emergent_client::ClientError;
use emergent_guard::Outcome;
use emergent_protocol::{ContentBlock, ToolCallResult, ToolDefinition};
use emergent_readiness::ReadinessError;
use serde_json::Value;
use thiserror::Error;

/// The error taxonomy every tool maps into an `isError` [`ToolCallResult`]
/// at the boundary (§7), rather than a JSON-RPC protocol error.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Readiness(#[from] ReadinessError),
    #[error("blocked by guard:\n{0}")]
    GuardBlocked(String),
}

impl ToolError {
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        ToolError::Validation(msg.into())
    }

    /// The next-action phrase every error result carries (§7).
    pub fn remedy(&self) -> String {
        match self {
            ToolError::Validation(_) => {
                "check the tool's input schema and retry with corrected arguments.".to_string()
            }
            ToolError::Client(e) => e.remedy(),
            ToolError::Readiness(e) => e.remedy(),
            ToolError::GuardBlocked(_) => {
                "address the listed guard failures, or pass force=true to override any SOFT_BLOCK entries, then retry.".to_string()
            }
        }
    }
}

/// A tool's outcome, always convertible to a [`ToolCallResult`]. Domain
/// errors never become JSON-RPC errors (§7) — they become `isError` text.
pub type ToolOutcome = Result<Value, ToolError>;

/// Folds a [`ToolOutcome`] into the wire-level [`ToolCallResult`], attaching
/// any guard advisory lines to a successful payload's `advisories` field.
pub fn finish(outcome: ToolOutcome, advisories: Option<&Outcome>) -> ToolCallResult {
    match outcome {
        Ok(mut payload) => {
            if let Some(advisory) = advisories.and_then(|o| o.advisory_message.as_deref()) {
                if let Value::Object(ref mut map) = payload {
                    map.insert(
                        "advisories".to_string(),
                        Value::String(advisory.to_string()),
                    );
                }
            }
            ToolCallResult {
                content: vec![ContentBlock::text(payload.to_string())],
                is_error: false,
            }
        }
        Err(e) => ToolCallResult {
            content: vec![ContentBlock::text(format!(
                "{e}\n\nRemedy: {}",
                e.remedy()
            ))],
            is_error: true,
        },
    }
}

/// A blocking guard outcome folded directly into an error result, without a
/// `ToolError` round-trip — used by the tools that run a guard set before
/// doing anything else.
pub fn blocked_result(outcome: &Outcome) -> ToolCallResult {
    let message = outcome
        .block_message
        .clone()
        .unwrap_or_else(|| "blocked".to_string());
    finish(Err(ToolError::GuardBlocked(message)), None)
}

/// One MCP tool. Implementations live under `tools/{workflow,query,...}.rs`,
/// grouped the way the spec's tool categories are grouped.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> Value;

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Reads a required string field out of a tool's JSON arguments.
pub fn require_str<'a>(args: &'a Value, field: &str) -> Result<&'a str, ToolError> {
    args.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::invalid_args(format!("missing or empty required field `{field}`")))
}

/// Reads an optional string field.
pub fn optional_str<'a>(args: &'a Value, field: &str) -> Option<&'a str> {
    args.get(field).and_then(Value::as_str)
}

/// Reads an optional boolean field, defaulting to `false`.
pub fn optional_bool(args: &Value, field: &str) -> bool {
    args.get(field).and_then(Value::as_bool).unwrap_or(false)
}

/// Reads an optional u32 field with a default.
pub fn optional_u32(args: &Value, field: &str, default: u32) -> u32 {
    args.get(field)
        .and_then(Value::as_u64)
        .map(|n| n as u32)
        .unwrap_or(default)
}
