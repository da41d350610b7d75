//! Pattern tools (§6.2, 3 of ~30): reusable architectural/design patterns
//! recorded once and linked onto the Changes that use them.

use super::{optional_str, optional_u32, require_str, Tool, ToolError, ToolOutcome};
use crate::context::ToolContext;
use async_trait::async_trait;
use emergent_model::{is_kebab_case, EntityType, FromProps, Pattern, ToProps};
use emergent_protocol::ToolCallResult;
use serde_json::{json, Map, Value};

pub fn tools() -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(PatternCreateTool),
        Box::new(PatternListTool),
        Box::new(PatternApplyTool),
    ]
}

struct PatternCreateTool;

#[async_trait]
impl Tool for PatternCreateTool {
    fn name(&self) -> &'static str {
        "pattern_create"
    }

    fn description(&self) -> &'static str {
        "Records a reusable Pattern."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "description": {"type": "string"},
                "category": {"type": "string"}
            },
            "required": ["name", "description", "category"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl PatternCreateTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let name = require_str(&args, "name")?;
        if !is_kebab_case(name) {
            return Err(ToolError::invalid_args(format!(
                "{name:?} is not kebab-case"
            )));
        }
        let pattern = Pattern {
            name: name.to_string(),
            description: require_str(&args, "description")?.to_string(),
            category: require_str(&args, "category")?.to_string(),
        };
        let obj = ctx
            .client()
            .create_object(EntityType::Pattern, Some(name), pattern.to_props(), vec![])
            .await?;
        Ok(json!(obj))
    }
}

struct PatternListTool;

#[async_trait]
impl Tool for PatternListTool {
    fn name(&self) -> &'static str {
        "pattern_list"
    }

    fn description(&self) -> &'static str {
        "Lists recorded Patterns, optionally filtered by category."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "category": {"type": "string"},
                "limit": {"type": "integer", "default": 50}
            }
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl PatternListTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let limit = optional_u32(&args, "limit", 50);
        let category = optional_str(&args, "category");
        let patterns = ctx.client().list_objects(EntityType::Pattern, None, limit).await?;
        let filtered: Vec<Value> = patterns
            .into_iter()
            .filter(|p| {
                category
                    .map(|c| p.properties.get("category").and_then(Value::as_str) == Some(c))
                    .unwrap_or(true)
            })
            .map(|p| json!(p))
            .collect();
        Ok(json!({ "patterns": filtered }))
    }
}

struct PatternApplyTool;

#[async_trait]
impl Tool for PatternApplyTool {
    fn name(&self) -> &'static str {
        "pattern_apply"
    }

    fn description(&self) -> &'static str {
        "Links a Pattern onto a Change, recording that it governs the Change's implementation \
         (`uses_pattern`, §3.3)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "change_id": {"type": "string"},
                "pattern_id": {"type": "string"}
            },
            "required": ["change_id", "pattern_id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl PatternApplyTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let change_id = require_str(&args, "change_id")?;
        let pattern_id = require_str(&args, "pattern_id")?;
        let edge = ctx
            .client()
            .create_relationship("uses_pattern", change_id, pattern_id, Map::new())
            .await?;
        Ok(json!(edge))
    }
}
