//! Janitor tool (§6.2, 1 of ~30): `janitor_run`, the on-demand trigger for
//! the same sweep the background scheduler runs periodically in stdio mode
//! (`crate::janitor`, `crate::scheduler`).

use super::{optional_u32, Tool, ToolOutcome};
use crate::context::ToolContext;
use crate::janitor;
use async_trait::async_trait;
use emergent_config::JanitorConfig;
use emergent_protocol::ToolCallResult;
use serde_json::{json, Value};

pub fn tools() -> Vec<Box<dyn Tool>> {
    vec![Box::new(JanitorRunTool)]
}

struct JanitorRunTool;

#[async_trait]
impl Tool for JanitorRunTool {
    fn name(&self) -> &'static str {
        "janitor_run"
    }

    fn description(&self) -> &'static str {
        "Runs the janitor's invariant sweep immediately, rather than waiting for its scheduled \
         interval. Reports MaintenanceIssues found and, optionally, creates a maintenance \
         Proposal and per-category Improvements."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "create_proposal": {"type": "boolean", "default": true},
                "create_improvements": {"type": "boolean", "default": true},
                "stale_change_days": {"type": "integer", "default": 90}
            }
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl JanitorRunTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let create_proposal = args
            .get("create_proposal")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        let create_improvements = args
            .get("create_improvements")
            .and_then(Value::as_bool)
            .unwrap_or(true);

        let config = JanitorConfig {
            enabled: true,
            create_proposal,
            create_improvements,
            stale_change_days: optional_u32(&args, "stale_change_days", 90) as u64,
            ..Default::default()
        };

        let report = janitor::run(ctx.client(), &config).await?;
        Ok(json!(report))
    }
}
