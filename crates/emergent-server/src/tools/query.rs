//! Query tools (§6.2, 11 of ~30): thin, guard-free wrappers over the
//! backend client's generic object/relationship/graph operations. These are
//! the read (and low-level write) surface every other tool category is
//! built on top of.

use super::{optional_bool, optional_str, optional_u32, require_str, Tool, ToolError, ToolOutcome};
use crate::context::ToolContext;
use async_trait::async_trait;
use emergent_client::EdgeDirection;
use emergent_model::EntityType;
use emergent_protocol::ToolCallResult;
use serde_json::{json, Map, Value};

pub fn tools() -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(ObjectGetTool),
        Box::new(ObjectListTool),
        Box::new(ObjectCountTool),
        Box::new(ObjectCreateTool),
        Box::new(ObjectUpdateTool),
        Box::new(ObjectDeleteTool),
        Box::new(ObjectSearchTool),
        Box::new(RelationshipCreateTool),
        Box::new(RelationshipListTool),
        Box::new(EdgesGetTool),
        Box::new(GraphExpandTool),
    ]
}

fn parse_entity_type(s: &str) -> Result<EntityType, ToolError> {
    EntityType::parse(s).ok_or_else(|| ToolError::invalid_args(format!("unknown entity type {s:?}")))
}

fn parse_direction(s: Option<&str>) -> EdgeDirection {
    match s {
        Some("in") => EdgeDirection::In,
        Some("both") => EdgeDirection::Both,
        _ => EdgeDirection::Out,
    }
}

struct ObjectGetTool;

#[async_trait]
impl Tool for ObjectGetTool {
    fn name(&self) -> &'static str {
        "object_get"
    }

    fn description(&self) -> &'static str {
        "Fetches one object by id (version id or canonical id)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"id": {"type": "string"}},
            "required": ["id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl ObjectGetTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let id = require_str(&args, "id")?;
        let obj = ctx.client().get_object(id).await?;
        Ok(json!(obj))
    }
}

struct ObjectListTool;

#[async_trait]
impl Tool for ObjectListTool {
    fn name(&self) -> &'static str {
        "object_list"
    }

    fn description(&self) -> &'static str {
        "Lists objects of a given entity type, optionally filtered by key."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "type": {"type": "string"},
                "key": {"type": "string"},
                "limit": {"type": "integer", "default": 50}
            },
            "required": ["type"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl ObjectListTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let object_type = parse_entity_type(require_str(&args, "type")?)?;
        let key = optional_str(&args, "key");
        let limit = optional_u32(&args, "limit", 50);
        let objects = ctx.client().list_objects(object_type, key, limit).await?;
        Ok(json!({ "objects": objects }))
    }
}

struct ObjectCountTool;

#[async_trait]
impl Tool for ObjectCountTool {
    fn name(&self) -> &'static str {
        "object_count"
    }

    fn description(&self) -> &'static str {
        "Counts objects of a given entity type."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"type": {"type": "string"}},
            "required": ["type"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl ObjectCountTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let object_type = parse_entity_type(require_str(&args, "type")?)?;
        let count = ctx.client().count_objects(object_type).await?;
        Ok(json!({ "type": object_type.as_str(), "count": count }))
    }
}

/// Generic object creation, for entity types not covered by a dedicated
/// workflow/task/pattern tool (App, DataModel, Context, UiComponent, Actor,
/// TestCase, ApiContract, and similar non-workflow entities, per §3.2).
struct ObjectCreateTool;

#[async_trait]
impl Tool for ObjectCreateTool {
    fn name(&self) -> &'static str {
        "object_create"
    }

    fn description(&self) -> &'static str {
        "Creates an object of any non-workflow entity type with caller-supplied properties."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "type": {"type": "string"},
                "key": {"type": "string"},
                "properties": {"type": "object"},
                "labels": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["type", "properties"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl ObjectCreateTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let object_type = parse_entity_type(require_str(&args, "type")?)?;
        let key = optional_str(&args, "key");
        let properties = args
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let labels = args
            .get("labels")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default();

        let obj = ctx
            .client()
            .create_object(object_type, key, properties, labels)
            .await?;
        Ok(json!(obj))
    }
}

struct ObjectUpdateTool;

#[async_trait]
impl Tool for ObjectUpdateTool {
    fn name(&self) -> &'static str {
        "object_update"
    }

    fn description(&self) -> &'static str {
        "Patches an object's properties."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": {"type": "string"},
                "properties": {"type": "object"}
            },
            "required": ["id", "properties"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl ObjectUpdateTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let id = require_str(&args, "id")?;
        let properties: Map<String, Value> = args
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| ToolError::invalid_args("missing required field `properties`"))?;
        let obj = ctx.client().update_object(id, properties).await?;
        Ok(json!(obj))
    }
}

struct ObjectDeleteTool;

#[async_trait]
impl Tool for ObjectDeleteTool {
    fn name(&self) -> &'static str {
        "object_delete"
    }

    fn description(&self) -> &'static str {
        "Soft-deletes an object."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"id": {"type": "string"}},
            "required": ["id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl ObjectDeleteTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let id = require_str(&args, "id")?;
        ctx.client().soft_delete_object(id).await?;
        Ok(json!({ "id": id, "deleted": true }))
    }
}

struct ObjectSearchTool;

#[async_trait]
impl Tool for ObjectSearchTool {
    fn name(&self) -> &'static str {
        "object_search"
    }

    fn description(&self) -> &'static str {
        "Full-text searches objects across all entity types."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "limit": {"type": "integer", "default": 20}
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl ObjectSearchTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let query = require_str(&args, "query")?;
        let limit = optional_u32(&args, "limit", 20);
        let objects = ctx.client().search(query, limit).await?;
        Ok(json!({ "objects": objects }))
    }
}

struct RelationshipCreateTool;

#[async_trait]
impl Tool for RelationshipCreateTool {
    fn name(&self) -> &'static str {
        "relationship_create"
    }

    fn description(&self) -> &'static str {
        "Creates a relationship between two objects."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "type": {"type": "string"},
                "src_id": {"type": "string"},
                "dst_id": {"type": "string"},
                "properties": {"type": "object"}
            },
            "required": ["type", "src_id", "dst_id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl RelationshipCreateTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let relationship_type = require_str(&args, "type")?;
        let src_id = require_str(&args, "src_id")?;
        let dst_id = require_str(&args, "dst_id")?;
        let properties = args
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let edge = ctx
            .client()
            .create_relationship(relationship_type, src_id, dst_id, properties)
            .await?;
        Ok(json!(edge))
    }
}

struct RelationshipListTool;

#[async_trait]
impl Tool for RelationshipListTool {
    fn name(&self) -> &'static str {
        "relationship_list"
    }

    fn description(&self) -> &'static str {
        "Lists relationships originating at an object, optionally filtered by type."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "src_id": {"type": "string"},
                "type": {"type": "string"}
            },
            "required": ["src_id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl RelationshipListTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let src_id = require_str(&args, "src_id")?;
        let relationship_type = optional_str(&args, "type");
        let edges = ctx.client().list_relationships(src_id, relationship_type).await?;
        Ok(json!({ "relationships": edges }))
    }
}

struct EdgesGetTool;

#[async_trait]
impl Tool for EdgesGetTool {
    fn name(&self) -> &'static str {
        "edges_get"
    }

    fn description(&self) -> &'static str {
        "Fetches a node's edges with a direction filter (out/in/both)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": {"type": "string"},
                "direction": {"type": "string", "enum": ["out", "in", "both"], "default": "out"},
                "type": {"type": "string"}
            },
            "required": ["id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl EdgesGetTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let id = require_str(&args, "id")?;
        let direction = parse_direction(optional_str(&args, "direction"));
        let relationship_type = optional_str(&args, "type");
        let edges = ctx.client().get_edges(id, direction, relationship_type).await?;
        Ok(json!({ "edges": edges }))
    }
}

struct GraphExpandTool;

#[async_trait]
impl Tool for GraphExpandTool {
    fn name(&self) -> &'static str {
        "graph_expand"
    }

    fn description(&self) -> &'static str {
        "Multi-hop graph expansion from one or more root ids, bounded by depth/node/edge limits."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "root_ids": {"type": "array", "items": {"type": "string"}},
                "direction": {"type": "string", "enum": ["out", "in", "both"], "default": "out"},
                "max_depth": {"type": "integer", "default": 2},
                "max_nodes": {"type": "integer", "default": 500},
                "max_edges": {"type": "integer", "default": 500},
                "relationship_types": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["root_ids"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl GraphExpandTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let root_ids: Vec<String> = args
            .get("root_ids")
            .and_then(Value::as_array)
            .ok_or_else(|| ToolError::invalid_args("missing required field `root_ids`"))?
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        if root_ids.is_empty() {
            return Err(ToolError::invalid_args("`root_ids` must contain at least one id"));
        }
        let direction = parse_direction(optional_str(&args, "direction"));
        let max_depth = optional_u32(&args, "max_depth", 2);
        let max_nodes = optional_u32(&args, "max_nodes", 500);
        let max_edges = optional_u32(&args, "max_edges", 500);
        let relationship_types: Option<Vec<String>> = args.get("relationship_types").and_then(Value::as_array).map(|arr| {
            arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect()
        });

        let (nodes, edges) = ctx
            .client()
            .expand(
                &root_ids,
                direction,
                max_depth,
                max_nodes,
                max_edges,
                relationship_types.as_deref(),
            )
            .await?;

        Ok(json!({ "nodes": nodes, "edges": edges }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_direction_defaults_to_out() {
        assert!(matches!(parse_direction(None), EdgeDirection::Out));
        assert!(matches!(parse_direction(Some("in")), EdgeDirection::In));
        assert!(matches!(parse_direction(Some("both")), EdgeDirection::Both));
    }

    #[test]
    fn parse_entity_type_rejects_unknown() {
        assert!(parse_entity_type("NotAType").is_err());
        assert!(parse_entity_type("Change").is_ok());
    }
}
