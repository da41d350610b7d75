//! Task management tools (§6.2, 5 of ~30): listing and mutating `Task`
//! objects and the coordination edges around them (`proposed_by`,
//! `blocks`/`blocked_by`, `assigned_to`). Tasks themselves are created via
//! `spec_artifact(kind="task", ...)` — these tools manage the ones that
//! already exist.

use super::{optional_str, require_str, Tool, ToolError, ToolOutcome};
use crate::context::ToolContext;
use async_trait::async_trait;
use emergent_client::EdgeDirection;
use emergent_model::{EntityType, TaskStatus};
use emergent_protocol::ToolCallResult;
use serde_json::{json, Map, Value};

pub fn tools() -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(TaskListTool),
        Box::new(TaskUpdateStatusTool),
        Box::new(TaskAssignTool),
        Box::new(TaskLinkBlocksTool),
        Box::new(TaskNextTool),
    ]
}

struct TaskListTool;

#[async_trait]
impl Tool for TaskListTool {
    fn name(&self) -> &'static str {
        "task_list"
    }

    fn description(&self) -> &'static str {
        "Lists the Tasks under a Change."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "change_id": {"type": "string"},
                "status": {"type": "string", "enum": ["pending", "in_progress", "completed", "blocked"]}
            },
            "required": ["change_id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl TaskListTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let change_id = require_str(&args, "change_id")?;
        let status_filter = optional_str(&args, "status");

        let relationship_types = vec!["has_task".to_string()];
        let (nodes, _edges) = ctx
            .client()
            .expand(
                std::slice::from_ref(&change_id.to_string()),
                EdgeDirection::Out,
                1,
                1_000,
                1_000,
                Some(&relationship_types),
            )
            .await?;

        let tasks: Vec<Value> = nodes
            .into_iter()
            .filter(|o| o.object_type == EntityType::Task.as_str())
            .filter(|o| {
                status_filter
                    .map(|s| o.properties.get("status").and_then(Value::as_str) == Some(s))
                    .unwrap_or(true)
            })
            .map(|o| json!(o))
            .collect();

        Ok(json!({ "tasks": tasks }))
    }
}

struct TaskUpdateStatusTool;

#[async_trait]
impl Tool for TaskUpdateStatusTool {
    fn name(&self) -> &'static str {
        "task_update_status"
    }

    fn description(&self) -> &'static str {
        "Updates a Task's status (pending/in_progress/completed/blocked)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": {"type": "string"},
                "status": {"type": "string", "enum": ["pending", "in_progress", "completed", "blocked"]},
                "verification": {"type": "string"}
            },
            "required": ["id", "status"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl TaskUpdateStatusTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let id = require_str(&args, "id")?;
        let status_raw = require_str(&args, "status")?;
        let status = TaskStatus::parse(status_raw)
            .ok_or_else(|| ToolError::invalid_args(format!("unknown task status {status_raw:?}")))?;

        let mut props = Map::new();
        props.insert("status".into(), status.as_str().into());
        if let Some(verification) = optional_str(&args, "verification") {
            props.insert("verification".into(), verification.into());
        }

        let obj = ctx.client().update_object(id, props).await?;
        Ok(json!(obj))
    }
}

struct TaskAssignTool;

#[async_trait]
impl Tool for TaskAssignTool {
    fn name(&self) -> &'static str {
        "task_assign"
    }

    fn description(&self) -> &'static str {
        "Links a Task to the Actor or Agent responsible for it (`assigned_to`)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "task_id": {"type": "string"},
                "assignee_id": {"type": "string"}
            },
            "required": ["task_id", "assignee_id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl TaskAssignTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let task_id = require_str(&args, "task_id")?;
        let assignee_id = require_str(&args, "assignee_id")?;
        let edge = ctx
            .client()
            .create_relationship("assigned_to", task_id, assignee_id, Map::new())
            .await?;
        Ok(json!(edge))
    }
}

struct TaskLinkBlocksTool;

#[async_trait]
impl Tool for TaskLinkBlocksTool {
    fn name(&self) -> &'static str {
        "task_link_blocks"
    }

    fn description(&self) -> &'static str {
        "Records that one Task blocks another (`blocks`/`blocked_by`, §3.3)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "blocking_task_id": {"type": "string"},
                "blocked_task_id": {"type": "string"}
            },
            "required": ["blocking_task_id", "blocked_task_id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl TaskLinkBlocksTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let blocking = require_str(&args, "blocking_task_id")?;
        let blocked = require_str(&args, "blocked_task_id")?;
        let edge = ctx
            .client()
            .create_relationship("blocks", blocking, blocked, Map::new())
            .await?;
        Ok(json!(edge))
    }
}

struct TaskNextTool;

#[async_trait]
impl Tool for TaskNextTool {
    fn name(&self) -> &'static str {
        "task_next"
    }

    fn description(&self) -> &'static str {
        "Returns the first pending Task under a Change with no unresolved `blocked_by` edge, \
         in number order."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"change_id": {"type": "string"}},
            "required": ["change_id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl TaskNextTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let change_id = require_str(&args, "change_id")?;
        let relationship_types = vec!["has_task".to_string()];
        let (nodes, _edges) = ctx
            .client()
            .expand(
                std::slice::from_ref(&change_id.to_string()),
                EdgeDirection::Out,
                1,
                1_000,
                1_000,
                Some(&relationship_types),
            )
            .await?;

        let mut pending: Vec<_> = nodes
            .into_iter()
            .filter(|o| o.object_type == EntityType::Task.as_str())
            .filter(|o| {
                o.properties.get("status").and_then(Value::as_str) == Some("pending")
            })
            .collect();
        pending.sort_by(|a, b| {
            let an = a.properties.get("number").and_then(Value::as_str).unwrap_or("");
            let bn = b.properties.get("number").and_then(Value::as_str).unwrap_or("");
            an.cmp(bn)
        });

        // `blocked_by` is checked per-candidate rather than in the expand's
        // relationship filter since blockers may live outside the Change.
        for task in pending {
            let blockers = ctx
                .client()
                .list_relationships(&task.id, Some("blocked_by"))
                .await?;
            if blockers.is_empty() {
                return Ok(json!(task));
            }
        }

        Ok(json!({ "task": Value::Null, "message": "no unblocked pending task" }))
    }
}
