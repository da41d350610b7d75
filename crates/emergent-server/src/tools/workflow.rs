//! Workflow tools (§6.2, 7 of ~30): `spec_new`, `spec_artifact`,
//! `spec_mark_ready`, `spec_status`, `spec_archive`, `spec_suggest_patterns`,
//! `spec_list_changes`. These are the only tools that run guard sets and
//! the readiness machine — the core's central coordination surface.

use super::{optional_bool, optional_str, optional_u32, require_str, Tool, ToolError, ToolOutcome};
use crate::context::ToolContext;
use crate::guard_state::{populate_change_state, populate_project_state};
use async_trait::async_trait;
use emergent_client::EdgeDirection;
use emergent_guard::{artifact_guards, pre_change_guards, ArtifactAddKind};
use emergent_model::{
    is_kebab_case, ChangeStatus, Design, EntityType, Object, Proposal, Requirement,
    RequirementStrength, Scenario, Spec, Task, ToProps,
};
use emergent_protocol::ToolCallResult;
use emergent_readiness::{mark_ready, revert_if_ready, MarkReadyOutcome};
use serde_json::{json, Map, Value};

pub fn tools() -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(SpecNewTool),
        Box::new(SpecArtifactTool),
        Box::new(SpecMarkReadyTool),
        Box::new(SpecStatusTool),
        Box::new(SpecArchiveTool),
        Box::new(SpecSuggestPatternsTool),
        Box::new(SpecListChangesTool),
    ]
}

struct SpecNewTool;

#[async_trait]
impl Tool for SpecNewTool {
    fn name(&self) -> &'static str {
        "spec_new"
    }

    fn description(&self) -> &'static str {
        "Creates a new Change under the Pre-Change guard set (§4.E)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string", "description": "kebab-case Change name"},
                "description": {"type": "string"},
                "force": {"type": "boolean", "default": false}
            },
            "required": ["name"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl SpecNewTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let name = require_str(&args, "name")?;
        if !is_kebab_case(name) {
            return Err(ToolError::invalid_args(format!(
                "{name:?} is not kebab-case"
            )));
        }

        let mut guard_ctx = populate_project_state(ctx.client(), Some(name.to_string())).await?;
        guard_ctx.force = optional_bool(&args, "force");
        let outcome = emergent_guard::run(&pre_change_guards(), &guard_ctx);
        if outcome.blocked {
            return Err(ToolError::GuardBlocked(
                outcome.block_message.unwrap_or_default(),
            ));
        }

        let change = emergent_model::Change {
            name: name.to_string(),
            description: optional_str(&args, "description").map(str::to_string),
            status: ChangeStatus::Active,
        };
        let obj = ctx
            .client()
            .create_object(EntityType::Change, Some(name), change.to_props(), vec![])
            .await?;

        let mut payload = json!({
            "id": obj.id,
            "canonical_id": obj.canonical_id,
            "name": name,
            "stage": "propose",
        });
        if let Some(advisory) = outcome.advisory_message {
            payload["advisories"] = Value::String(advisory);
        }
        Ok(payload)
    }
}

/// The artifact kinds `spec_artifact` accepts, and what each needs from its
/// arguments to build a DTO + parent edge.
enum ArtifactKind {
    Proposal,
    Spec,
    Requirement,
    Scenario,
    Design,
    Task,
}

impl ArtifactKind {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "proposal" => Some(Self::Proposal),
            "spec" => Some(Self::Spec),
            "requirement" => Some(Self::Requirement),
            "scenario" => Some(Self::Scenario),
            "design" => Some(Self::Design),
            "task" => Some(Self::Task),
            _ => None,
        }
    }

    fn guard_kind(&self) -> ArtifactAddKind {
        match self {
            ArtifactKind::Proposal => ArtifactAddKind::Proposal,
            ArtifactKind::Spec => ArtifactAddKind::Spec,
            ArtifactKind::Design => ArtifactAddKind::Design,
            ArtifactKind::Task => ArtifactAddKind::Task,
            ArtifactKind::Requirement | ArtifactKind::Scenario => ArtifactAddKind::Other,
        }
    }

    fn entity_type(&self) -> EntityType {
        match self {
            ArtifactKind::Proposal => EntityType::Proposal,
            ArtifactKind::Spec => EntityType::Spec,
            ArtifactKind::Requirement => EntityType::Requirement,
            ArtifactKind::Scenario => EntityType::Scenario,
            ArtifactKind::Design => EntityType::Design,
            ArtifactKind::Task => EntityType::Task,
        }
    }

    /// The structural relationship type linking the parent to this kind.
    fn relationship(&self) -> &'static str {
        match self {
            ArtifactKind::Proposal => "has_proposal",
            ArtifactKind::Spec => "has_spec",
            ArtifactKind::Requirement => "has_requirement",
            ArtifactKind::Scenario => "has_scenario",
            ArtifactKind::Design => "has_design",
            ArtifactKind::Task => "has_task",
        }
    }

    /// Which argument names the parent ID for this kind: a Proposal/Spec/
    /// Design/Task parents directly under a Change; a Requirement parents
    /// under a Spec; a Scenario parents under a Requirement.
    fn parent_field(&self) -> &'static str {
        match self {
            ArtifactKind::Requirement => "spec_id",
            ArtifactKind::Scenario => "requirement_id",
            _ => "change_id",
        }
    }
}

struct SpecArtifactTool;

#[async_trait]
impl Tool for SpecArtifactTool {
    fn name(&self) -> &'static str {
        "spec_artifact"
    }

    fn description(&self) -> &'static str {
        "Creates a workflow artifact (proposal/spec/requirement/scenario/design/task) \
         under a Change, enforced by the Artifact guard set (§4.E) and the readiness \
         machine's downward-invalidation rule (§4.F)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "kind": {"type": "string", "enum": ["proposal", "spec", "requirement", "scenario", "design", "task"]},
                "change_id": {"type": "string"},
                "spec_id": {"type": "string"},
                "requirement_id": {"type": "string"},
                "name": {"type": "string"},
                "intent": {"type": "string"},
                "rationale": {"type": "string"},
                "summary": {"type": "string"},
                "strength": {"type": "string", "enum": ["MUST", "SHOULD", "MAY"]},
                "description": {"type": "string"},
                "given": {"type": "string"},
                "when": {"type": "string"},
                "then": {"type": "string"},
                "approach": {"type": "string"},
                "alternatives_considered": {"type": "string"},
                "number": {"type": "string"},
                "complexity_points": {"type": "integer"},
                "force": {"type": "boolean", "default": false}
            },
            "required": ["kind"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl SpecArtifactTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let kind_raw = require_str(&args, "kind")?;
        let kind = ArtifactKind::parse(kind_raw)
            .ok_or_else(|| ToolError::invalid_args(format!("unknown artifact kind {kind_raw:?}")))?;

        let parent_field = kind.parent_field();
        let parent_id = require_str(&args, parent_field)?.to_string();
        let force = optional_bool(&args, "force");

        // §3.4: "archived changes reject new artifacts." Resolve the owning
        // Change regardless of how many levels up the parent argument sits
        // and refuse before anything is written.
        let owning_change = self.owning_change(ctx, &kind, &parent_id).await?;
        if owning_change.status() == Some("archived") {
            return Err(ToolError::GuardBlocked(format!(
                "Change {:?} is archived and rejects new artifacts. Start a new Change instead.",
                owning_change.name().unwrap_or(&parent_id)
            )));
        }

        // The artifact_guards set gates Spec/Design/Task directly against
        // their owning Change's state; a Requirement/Scenario's proposal
        // prerequisite was already enforced transitively when its ancestor
        // Spec was created, so no guard evaluation (and no expand()) is
        // needed for those two kinds.
        let outcome = if parent_field == "change_id" {
            let guard_ctx =
                populate_change_state(ctx.client(), &parent_id, kind.guard_kind(), force).await?;
            let outcome = emergent_guard::run(&artifact_guards(), &guard_ctx);
            if outcome.blocked {
                return Err(ToolError::GuardBlocked(
                    outcome.block_message.unwrap_or_default(),
                ));
            }
            outcome
        } else {
            emergent_guard::Outcome::default()
        };

        let (props, entity_type) = self.build_props(&kind, &args)?;
        let obj = ctx
            .client()
            .create_object(entity_type, None, props, vec![])
            .await?;

        ctx.client()
            .create_relationship(kind.relationship(), &parent_id, &obj.id, Map::new())
            .await?;

        let mut parent_reverted = false;
        match kind {
            ArtifactKind::Requirement | ArtifactKind::Scenario => {
                parent_reverted = revert_if_ready(ctx.client(), &parent_id).await?;
            }
            _ => {}
        }

        let mut payload = json!({
            "id": obj.id,
            "canonical_id": obj.canonical_id,
            "type": entity_type.as_str(),
            "status": "draft",
            "parent_reverted": parent_reverted,
        });
        if let Some(advisory) = outcome.advisory_message {
            payload["advisories"] = Value::String(advisory);
        }
        Ok(payload)
    }

    /// Resolves the Change that ultimately owns `parent_id`. A Proposal/
    /// Spec/Design/Task parents directly under a Change; a Requirement's
    /// `spec_id` is one `has_spec` hop below it; a Scenario's
    /// `requirement_id` is two hops below (via its Spec).
    async fn owning_change(
        &self,
        ctx: &ToolContext,
        kind: &ArtifactKind,
        parent_id: &str,
    ) -> Result<Object, ToolError> {
        if kind.parent_field() == "change_id" {
            return Ok(ctx.client().get_object(parent_id).await?);
        }

        let depth = match kind {
            ArtifactKind::Scenario => 2,
            _ => 1,
        };
        let (nodes, _edges) = ctx
            .client()
            .expand(
                std::slice::from_ref(&parent_id.to_string()),
                EdgeDirection::In,
                depth,
                100,
                100,
                None,
            )
            .await?;

        nodes
            .into_iter()
            .find(|n| n.object_type == EntityType::Change.as_str())
            .ok_or_else(|| {
                ToolError::invalid_args(format!(
                    "could not resolve the owning Change for {parent_id:?}"
                ))
            })
    }

    fn build_props(
        &self,
        kind: &ArtifactKind,
        args: &Value,
    ) -> Result<(Map<String, Value>, EntityType), ToolError> {
        let props = match kind {
            ArtifactKind::Proposal => Proposal {
                intent: require_str(args, "intent")?.to_string(),
                rationale: optional_str(args, "rationale").map(str::to_string),
                status: Default::default(),
            }
            .to_props(),
            ArtifactKind::Spec => Spec {
                name: require_str(args, "name")?.to_string(),
                summary: optional_str(args, "summary").map(str::to_string),
                status: Default::default(),
            }
            .to_props(),
            ArtifactKind::Requirement => {
                let strength_raw = require_str(args, "strength")?;
                let strength = RequirementStrength::parse(strength_raw).ok_or_else(|| {
                    ToolError::invalid_args(format!("unknown strength {strength_raw:?}"))
                })?;
                Requirement {
                    name: require_str(args, "name")?.to_string(),
                    strength,
                    description: optional_str(args, "description").map(str::to_string),
                    status: Default::default(),
                }
                .to_props()
            }
            ArtifactKind::Scenario => Scenario {
                name: require_str(args, "name")?.to_string(),
                given: require_str(args, "given")?.to_string(),
                when: require_str(args, "when")?.to_string(),
                then: require_str(args, "then")?.to_string(),
                status: Default::default(),
            }
            .to_props(),
            ArtifactKind::Design => Design {
                approach: require_str(args, "approach")?.to_string(),
                alternatives_considered: optional_str(args, "alternatives_considered")
                    .map(str::to_string),
                status: Default::default(),
            }
            .to_props(),
            ArtifactKind::Task => Task {
                number: require_str(args, "number")?.to_string(),
                description: require_str(args, "description")?.to_string(),
                status: Default::default(),
                complexity_points: args.get("complexity_points").and_then(Value::as_i64),
                verification: None,
            }
            .to_props(),
        };
        Ok((props, kind.entity_type()))
    }
}

struct SpecMarkReadyTool;

#[async_trait]
impl Tool for SpecMarkReadyTool {
    fn name(&self) -> &'static str {
        "spec_mark_ready"
    }

    fn description(&self) -> &'static str {
        "Marks a workflow artifact ready, refusing if any workflow child is still draft (§4.F)."
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

impl SpecMarkReadyTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let id = require_str(&args, "id")?;
        let outcome = mark_ready(ctx.client(), id).await?;
        let payload = match outcome {
            MarkReadyOutcome::AlreadyReady { id } => json!({
                "id": id,
                "status": "ready",
                "message": "already ready",
            }),
            MarkReadyOutcome::MarkedReady { id } => json!({
                "id": id,
                "status": "ready",
            }),
            MarkReadyOutcome::Blocked { id, blockers } => json!({
                "id": id,
                "status": "draft",
                "blockers": blockers,
                "remedy": "mark every listed blocker ready first using spec_mark_ready, then retry.",
            }),
        };
        Ok(payload)
    }
}

struct SpecStatusTool;

#[async_trait]
impl Tool for SpecStatusTool {
    fn name(&self) -> &'static str {
        "spec_status"
    }

    fn description(&self) -> &'static str {
        "Reports a Change's workflow stage: propose -> specify -> design -> implement -> complete."
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

impl SpecStatusTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let change_id = require_str(&args, "change_id")?;
        let change = ctx.client().get_object(change_id).await?;
        let guard_ctx =
            populate_change_state(ctx.client(), change_id, ArtifactAddKind::Other, false).await?;

        let stage = if !guard_ctx.change_has_ready_proposal {
            "propose"
        } else if guard_ctx.change_spec_count == 0 || !guard_ctx.change_all_specs_ready {
            "specify"
        } else if !guard_ctx.change_has_ready_design {
            "design"
        } else if guard_ctx.change_task_count == 0
            || guard_ctx.change_tasks_completed < guard_ctx.change_task_count
        {
            "implement"
        } else {
            "complete"
        };

        Ok(json!({
            "change_id": change.id,
            "name": change.name(),
            "stage": stage,
            "has_ready_proposal": guard_ctx.change_has_ready_proposal,
            "spec_count": guard_ctx.change_spec_count,
            "all_specs_ready": guard_ctx.change_all_specs_ready,
            "has_ready_design": guard_ctx.change_has_ready_design,
            "task_count": guard_ctx.change_task_count,
            "tasks_completed": guard_ctx.change_tasks_completed,
        }))
    }
}

struct SpecArchiveTool;

#[async_trait]
impl Tool for SpecArchiveTool {
    fn name(&self) -> &'static str {
        "spec_archive"
    }

    fn description(&self) -> &'static str {
        "Archives a Change terminally, under the Archive guard set (§4.E); rejects new \
         artifacts on archived Changes."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "change_id": {"type": "string"},
                "force": {"type": "boolean", "default": false}
            },
            "required": ["change_id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl SpecArchiveTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let change_id = require_str(&args, "change_id")?;
        let force = optional_bool(&args, "force");

        let guard_ctx =
            populate_change_state(ctx.client(), change_id, ArtifactAddKind::Other, force).await?;
        let outcome = emergent_guard::run(&emergent_guard::archive_guards(), &guard_ctx);
        if outcome.blocked {
            return Err(ToolError::GuardBlocked(
                outcome.block_message.unwrap_or_default(),
            ));
        }

        let mut props = Map::new();
        props.insert("status".into(), ChangeStatus::Archived.as_str().into());
        ctx.client().update_object(change_id, props).await?;

        let mut payload = json!({"change_id": change_id, "status": "archived"});
        if let Some(advisory) = outcome.advisory_message {
            payload["advisories"] = Value::String(advisory);
        }
        Ok(payload)
    }
}

struct SpecSuggestPatternsTool;

#[async_trait]
impl Tool for SpecSuggestPatternsTool {
    fn name(&self) -> &'static str {
        "spec_suggest_patterns"
    }

    fn description(&self) -> &'static str {
        "Suggests Patterns relevant to a Change by full-text search over the project's recorded Patterns."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "limit": {"type": "integer", "default": 10}
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl SpecSuggestPatternsTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let query = require_str(&args, "query")?;
        let limit = optional_u32(&args, "limit", 10);
        let results = ctx.client().search(query, limit).await?;
        let patterns: Vec<&emergent_model::Object> = results
            .iter()
            .filter(|o| o.object_type == EntityType::Pattern.as_str())
            .collect();
        Ok(json!({
            "query": query,
            "patterns": patterns.iter().map(|p| json!({
                "id": p.id,
                "name": p.name(),
            })).collect::<Vec<_>>(),
        }))
    }
}

struct SpecListChangesTool;

#[async_trait]
impl Tool for SpecListChangesTool {
    fn name(&self) -> &'static str {
        "spec_list_changes"
    }

    fn description(&self) -> &'static str {
        "Lists Changes, optionally filtered by status."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "status": {"type": "string", "enum": ["active", "archived"]},
                "limit": {"type": "integer", "default": 50}
            }
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolCallResult {
        super::finish(self.run(ctx, args).await, None)
    }
}

impl SpecListChangesTool {
    async fn run(&self, ctx: &ToolContext, args: Value) -> ToolOutcome {
        let limit = optional_u32(&args, "limit", 50);
        let status_filter = optional_str(&args, "status");
        let changes = ctx.client().list_objects(EntityType::Change, None, limit).await?;

        let filtered: Vec<Value> = changes
            .iter()
            .filter(|c| status_filter.map(|s| c.status() == Some(s)).unwrap_or(true))
            .map(|c| {
                json!({
                    "id": c.id,
                    "name": c.name(),
                    "status": c.status().unwrap_or("active"),
                })
            })
            .collect();

        Ok(json!({ "changes": filtered }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_kind_parses_all_values() {
        for s in ["proposal", "spec", "requirement", "scenario", "design", "task"] {
            assert!(ArtifactKind::parse(s).is_some());
        }
        assert!(ArtifactKind::parse("bogus").is_none());
    }

    #[test]
    fn requirement_parents_under_spec_id() {
        assert_eq!(ArtifactKind::Requirement.parent_field(), "spec_id");
        assert_eq!(ArtifactKind::Scenario.parent_field(), "requirement_id");
        assert_eq!(ArtifactKind::Task.parent_field(), "change_id");
    }

    #[test]
    fn relationship_names_match_structural_types() {
        assert_eq!(ArtifactKind::Spec.relationship(), "has_spec");
        assert_eq!(ArtifactKind::Scenario.relationship(), "has_scenario");
    }
}
