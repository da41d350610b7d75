//! Sync tools (§6.2, 3 of ~30). The codebase-sync extractor itself is out
//! of scope (§1 Non-goals) — these tools only manage the single `GraphSync`
//! bookkeeping record it would write to, and the `change_creates` /
//! `change_modifies` / `change_references` edges linking a Change to the
//! code entities it touches.

use super::{require_str, Tool, ToolError, ToolOutcome};
use crate::context::ToolContext;
use async_trait::async_trait;
use emergent_client::EdgeDirection;
use emergent_model::{EntityType, FromProps, GraphSync, ToProps};
use emergent_protocol::ToolCallResult;
use serde_json::{json, Map, Value};

const SYNC_KEY: &str = "graph-sync";

/// The three change-tracking relationship types (§3.3), in the priority
/// order §8.6 reasons about: whichever classification applies is emitted,
/// never a caller-chosen one.
const CHANGE_TRACKING_TYPES: [&str; 3] = ["change_creates", "change_modifies", "change_references"];

pub fn tools() -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(SyncGetStatusTool),
        Box::new(SyncRecordCommitTool),
        Box::new(SyncLinkEntityTool),
    ]
}

struct SyncGetStatusTool;

#[async_trait]
impl Tool for SyncGetStatusTool {
    fn name(&self) -> &'static str {
        "sync_get_status"
    }

    fn description(&self) -> &'static str {
        "Reports the last commit the codebase sync ran against, and when."
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl SyncGetStatusTool {
    async fn run(&self, ctx: &ToolContext, _args: Value) -> ToolOutcome {
        let found = ctx
            .client()
            .find_by_type_and_key(EntityType::GraphSync, SYNC_KEY)
            .await?;
        match found {
            Some(obj) => {
                let sync = GraphSync::from_props(&obj)
                    .map_err(|e| ToolError::invalid_args(e.to_string()))?;
                Ok(json!({
                    "last_sync_commit": sync.last_sync_commit,
                    "last_sync_at": sync.last_sync_at.to_rfc3339(),
                }))
            }
            None => Ok(json!({ "last_sync_commit": Value::Null, "last_sync_at": Value::Null })),
        }
    }
}

struct SyncRecordCommitTool;

#[async_trait]
impl Tool for SyncRecordCommitTool {
    fn name(&self) -> &'static str {
        "sync_record_commit"
    }

    fn description(&self) -> &'static str {
        "Records that the codebase sync ran against a given commit, at the given timestamp."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "commit": {"type": "string"},
                "synced_at": {"type": "string", "description": "RFC3339 timestamp"}
            },
            "required": ["commit", "synced_at"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl SyncRecordCommitTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let commit = require_str(&args, "commit")?;
        let synced_at_raw = require_str(&args, "synced_at")?;
        let synced_at = chrono::DateTime::parse_from_rfc3339(synced_at_raw)
            .map_err(|e| ToolError::invalid_args(format!("synced_at: {e}")))?
            .with_timezone(&chrono::Utc);

        let sync = GraphSync {
            last_sync_commit: commit.to_string(),
            last_sync_at: synced_at,
        };
        let obj = ctx
            .client()
            .upsert_object(EntityType::GraphSync, SYNC_KEY, sync.to_props())
            .await?;
        Ok(json!(obj))
    }
}

struct SyncLinkEntityTool;

#[async_trait]
impl Tool for SyncLinkEntityTool {
    fn name(&self) -> &'static str {
        "sync_link_entity"
    }

    fn description(&self) -> &'static str {
        "Links a Change to an App/DataModel/Action/etc. it touches, classifying the link as \
         `change_creates`/`change_modifies`/`change_references` (§3.3) from the entity's prior \
         state rather than a caller-supplied guess (§8.6): no prior link to this entity means \
         `creates`; a prior link whose recorded properties differ from the entity's current \
         properties means `modifies`; a prior link with identical properties means `references`."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "change_id": {"type": "string"},
                "entity_id": {"type": "string"}
            },
            "required": ["change_id", "entity_id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl SyncLinkEntityTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let change_id = require_str(&args, "change_id")?;
        let entity_id = require_str(&args, "entity_id")?;

        let entity = ctx.client().get_object(entity_id).await?;

        // Edge-based existence check (§4.C): a prior change-tracking edge
        // may have been recorded against either of the entity's ID
        // variants, so both must be queried across all three relationship
        // types before concluding no prior link exists.
        let mut prior_snapshots: Vec<Map<String, Value>> = Vec::new();
        for node_id in entity.ids() {
            for relationship_type in CHANGE_TRACKING_TYPES {
                let edges = ctx
                    .client()
                    .get_edges(node_id, EdgeDirection::In, Some(relationship_type))
                    .await?;
                for edge in edges {
                    if let Some(snapshot) = edge
                        .properties
                        .get("properties_snapshot")
                        .and_then(Value::as_object)
                    {
                        prior_snapshots.push(snapshot.clone());
                    }
                }
            }
        }

        let relationship_type = if prior_snapshots.is_empty() {
            "change_creates"
        } else if prior_snapshots.iter().any(|snapshot| *snapshot == entity.properties) {
            "change_references"
        } else {
            "change_modifies"
        };

        // Stamp the current properties onto the new edge so the next
        // `sync_link_entity` call for this entity has a prior state to
        // compare against.
        let mut edge_properties = Map::new();
        edge_properties.insert(
            "properties_snapshot".to_string(),
            Value::Object(entity.properties.clone()),
        );

        let edge = ctx
            .client()
            .create_relationship(relationship_type, change_id, &entity.id, edge_properties)
            .await?;

        Ok(json!({
            "relationship_type": relationship_type,
            "edge": edge,
        }))
    }
}
