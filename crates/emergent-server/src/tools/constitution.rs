//! Constitution tools (§6.2, 2 of ~30). A Constitution is project-scoped —
//! there is at most one per project, with no `change_id` (see
//! `emergent_model::Constitution`'s doc comment and DESIGN.md).

use super::{require_str, Tool, ToolError, ToolOutcome};
use crate::context::ToolContext;
use async_trait::async_trait;
use emergent_model::{is_kebab_case, Constitution, EntityType, FromProps, ToProps};
use emergent_protocol::ToolCallResult;
use serde_json::{json, Value};

pub fn tools() -> Vec<Box<dyn Tool>> {
    vec![Box::new(ConstitutionCreateTool), Box::new(ConstitutionGetTool)]
}

struct ConstitutionCreateTool;

#[async_trait]
impl Tool for ConstitutionCreateTool {
    fn name(&self) -> &'static str {
        "constitution_create"
    }

    fn description(&self) -> &'static str {
        "Creates or replaces the project's Constitution. There is exactly one per project."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "content": {"type": "string"}
            },
            "required": ["name", "content"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl ConstitutionCreateTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let name = require_str(&args, "name")?;
        if !is_kebab_case(name) {
            return Err(ToolError::invalid_args(format!(
                "{name:?} is not kebab-case"
            )));
        }
        let content = require_str(&args, "content")?;
        let constitution = Constitution {
            name: name.to_string(),
            content: content.to_string(),
        };
        // upsert_object, keyed on the fixed singleton key, so a second call
        // replaces the existing Constitution instead of creating a rival.
        let obj = ctx
            .client()
            .upsert_object(EntityType::Constitution, "constitution", constitution.to_props())
            .await?;
        Ok(json!(obj))
    }
}

struct ConstitutionGetTool;

#[async_trait]
impl Tool for ConstitutionGetTool {
    fn name(&self) -> &'static str {
        "constitution_get"
    }

    fn description(&self) -> &'static str {
        "Fetches the project's Constitution, if one has been recorded."
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl ConstitutionGetTool {
    async fn run(&self, ctx: &ToolContext, _args: Value) -> ToolOutcome {
        let found = ctx
            .client()
            .find_by_type_and_key(EntityType::Constitution, "constitution")
            .await?;
        match found {
            Some(obj) => Ok(json!(obj)),
            None => Err(ToolError::invalid_args(
                "no Constitution has been recorded for this project yet",
            )),
        }
    }
}
