//! Typed DTOs for every entity type.

use crate::props::{insert_opt, optional_i64, optional_str, require_str};
use crate::{EntityType, FromProps, ModelError, Object, ToProps};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Draft/ready readiness status carried by every workflow artifact.
/// Defaults to `Draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessStatus {
    #[default]
    Draft,
    Ready,
}

impl ReadinessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadinessStatus::Draft => "draft",
            ReadinessStatus::Ready => "ready",
        }
    }

    /// Missing/empty `status` is treated as `draft`.
    pub fn from_object(obj: &Object) -> Self {
        match obj.status() {
            Some("ready") => ReadinessStatus::Ready,
            _ => ReadinessStatus::Draft,
        }
    }
}

/// A Change's lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    #[default]
    Active,
    Archived,
}

impl ChangeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeStatus::Active => "active",
            ChangeStatus::Archived => "archived",
        }
    }
}

/// A Task's lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Blocked,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            "blocked" => Some(TaskStatus::Blocked),
            _ => None,
        }
    }
}

/// Change — the top-level container for one unit of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Change {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ChangeStatus,
}

impl ToProps for Change {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), self.name.clone().into());
        insert_opt(&mut map, "description", self.description.clone());
        map.insert("status".into(), self.status.as_str().into());
        map
    }
}

impl FromProps for Change {
    fn entity_type() -> EntityType {
        EntityType::Change
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(Change {
            name: require_str(obj, "name")?,
            description: optional_str(obj, "description"),
            status: match obj.status() {
                Some("archived") => ChangeStatus::Archived,
                _ => ChangeStatus::Active,
            },
        })
    }
}

/// Proposal — 1:1 under Change. No readiness children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub intent: String,
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default)]
    pub status: ReadinessStatus,
}

impl ToProps for Proposal {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("intent".into(), self.intent.clone().into());
        insert_opt(&mut map, "rationale", self.rationale.clone());
        map.insert("status".into(), self.status.as_str().into());
        map
    }
}

impl FromProps for Proposal {
    fn entity_type() -> EntityType {
        EntityType::Proposal
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(Proposal {
            intent: require_str(obj, "intent")?,
            rationale: optional_str(obj, "rationale"),
            status: ReadinessStatus::from_object(obj),
        })
    }
}

/// Spec — 1:N under Change. Ready requires every Requirement ready.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spec {
    pub name: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub status: ReadinessStatus,
}

impl ToProps for Spec {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), self.name.clone().into());
        insert_opt(&mut map, "summary", self.summary.clone());
        map.insert("status".into(), self.status.as_str().into());
        map
    }
}

impl FromProps for Spec {
    fn entity_type() -> EntityType {
        EntityType::Spec
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(Spec {
            name: require_str(obj, "name")?,
            summary: optional_str(obj, "summary"),
            status: ReadinessStatus::from_object(obj),
        })
    }
}

/// Requirement strength, e.g. RFC 2119-style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequirementStrength {
    Must,
    Should,
    May,
}

impl RequirementStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementStrength::Must => "MUST",
            RequirementStrength::Should => "SHOULD",
            RequirementStrength::May => "MAY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MUST" => Some(RequirementStrength::Must),
            "SHOULD" => Some(RequirementStrength::Should),
            "MAY" => Some(RequirementStrength::May),
            _ => None,
        }
    }
}

/// Requirement — 1:N under Spec. Ready requires every Scenario ready.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    pub strength: RequirementStrength,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ReadinessStatus,
}

impl ToProps for Requirement {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), self.name.clone().into());
        map.insert("strength".into(), self.strength.as_str().into());
        insert_opt(&mut map, "description", self.description.clone());
        map.insert("status".into(), self.status.as_str().into());
        map
    }
}

impl FromProps for Requirement {
    fn entity_type() -> EntityType {
        EntityType::Requirement
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        let strength_raw = require_str(obj, "strength")?;
        let strength = RequirementStrength::parse(&strength_raw).ok_or_else(|| ModelError::BadField {
            field: "strength",
            reason: format!("unknown strength {strength_raw:?}"),
        })?;
        Ok(Requirement {
            name: require_str(obj, "name")?,
            strength,
            description: optional_str(obj, "description"),
            status: ReadinessStatus::from_object(obj),
        })
    }
}

/// Scenario — 1:N under Requirement. No readiness children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub given: String,
    pub when: String,
    pub then: String,
    #[serde(default)]
    pub status: ReadinessStatus,
}

impl ToProps for Scenario {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), self.name.clone().into());
        map.insert("given".into(), self.given.clone().into());
        map.insert("when".into(), self.when.clone().into());
        map.insert("then".into(), self.then.clone().into());
        map.insert("status".into(), self.status.as_str().into());
        map
    }
}

impl FromProps for Scenario {
    fn entity_type() -> EntityType {
        EntityType::Scenario
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(Scenario {
            name: require_str(obj, "name")?,
            given: require_str(obj, "given")?,
            when: require_str(obj, "when")?,
            then: require_str(obj, "then")?,
            status: ReadinessStatus::from_object(obj),
        })
    }
}

/// ScenarioStep — 1:N under Scenario. No readiness state of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioStep {
    pub ordinal: i64,
    pub text: String,
}

impl ToProps for ScenarioStep {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("ordinal".into(), self.ordinal.into());
        map.insert("text".into(), self.text.clone().into());
        map
    }
}

impl FromProps for ScenarioStep {
    fn entity_type() -> EntityType {
        EntityType::ScenarioStep
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(ScenarioStep {
            ordinal: optional_i64(obj, "ordinal").unwrap_or(0),
            text: require_str(obj, "text")?,
        })
    }
}

/// Design — 1:1 under Change. No readiness children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    pub approach: String,
    #[serde(default)]
    pub alternatives_considered: Option<String>,
    #[serde(default)]
    pub status: ReadinessStatus,
}

impl ToProps for Design {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("approach".into(), self.approach.clone().into());
        insert_opt(
            &mut map,
            "alternatives_considered",
            self.alternatives_considered.clone(),
        );
        map.insert("status".into(), self.status.as_str().into());
        map
    }
}

impl FromProps for Design {
    fn entity_type() -> EntityType {
        EntityType::Design
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(Design {
            approach: require_str(obj, "approach")?,
            alternatives_considered: optional_str(obj, "alternatives_considered"),
            status: ReadinessStatus::from_object(obj),
        })
    }
}

/// Task — 1:N under Change. Complexity is a dimensionless 1-10
/// integer, never hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub number: String,
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub complexity_points: Option<i64>,
    #[serde(default)]
    pub verification: Option<String>,
}

impl ToProps for Task {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("number".into(), self.number.clone().into());
        map.insert("description".into(), self.description.clone().into());
        map.insert("status".into(), self.status.as_str().into());
        insert_opt(&mut map, "complexity_points", self.complexity_points);
        insert_opt(&mut map, "verification", self.verification.clone());
        map
    }
}

impl FromProps for Task {
    fn entity_type() -> EntityType {
        EntityType::Task
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        let status_raw = optional_str(obj, "status");
        let status = status_raw
            .as_deref()
            .and_then(TaskStatus::parse)
            .unwrap_or_default();
        Ok(Task {
            number: require_str(obj, "number")?,
            description: require_str(obj, "description")?,
            status,
            complexity_points: optional_i64(obj, "complexity_points"),
            verification: optional_str(obj, "verification"),
        })
    }
}

/// App — project topology root, keyed by kebab-case `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ToProps for App {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), self.name.clone().into());
        insert_opt(&mut map, "description", self.description.clone());
        map
    }
}

impl FromProps for App {
    fn entity_type() -> EntityType {
        EntityType::App
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(App {
            name: require_str(obj, "name")?,
            description: optional_str(obj, "description"),
        })
    }
}

/// DataModel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataModel {
    pub name: String,
    #[serde(default)]
    pub schema_ref: Option<String>,
}

impl ToProps for DataModel {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), self.name.clone().into());
        insert_opt(&mut map, "schema_ref", self.schema_ref.clone());
        map
    }
}

impl FromProps for DataModel {
    fn entity_type() -> EntityType {
        EntityType::DataModel
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(DataModel {
            name: require_str(obj, "name")?,
            schema_ref: optional_str(obj, "schema_ref"),
        })
    }
}

/// Context — project-scoped background notes surfaced by the
/// `context_discovery` guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    #[serde(default)]
    pub summary: Option<String>,
}

impl ToProps for Context {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), self.name.clone().into());
        insert_opt(&mut map, "summary", self.summary.clone());
        map
    }
}

impl FromProps for Context {
    fn entity_type() -> EntityType {
        EntityType::Context
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(Context {
            name: require_str(obj, "name")?,
            summary: optional_str(obj, "summary"),
        })
    }
}

/// UIComponent — surfaced by the `component_discovery` guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiComponent {
    pub name: String,
    #[serde(default)]
    pub kind: Option<String>,
}

impl ToProps for UiComponent {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), self.name.clone().into());
        insert_opt(&mut map, "kind", self.kind.clone());
        map
    }
}

impl FromProps for UiComponent {
    fn entity_type() -> EntityType {
        EntityType::UiComponent
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(UiComponent {
            name: require_str(obj, "name")?,
            kind: optional_str(obj, "kind"),
        })
    }
}

/// Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ToProps for Action {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), self.name.clone().into());
        insert_opt(&mut map, "description", self.description.clone());
        map
    }
}

impl FromProps for Action {
    fn entity_type() -> EntityType {
        EntityType::Action
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(Action {
            name: require_str(obj, "name")?,
            description: optional_str(obj, "description"),
        })
    }
}

/// Pattern — governs via `uses_pattern`/`requires_pattern`/
/// `forbids_pattern`/`extends_pattern`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl ToProps for Pattern {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), self.name.clone().into());
        insert_opt(&mut map, "description", self.description.clone());
        insert_opt(&mut map, "category", self.category.clone());
        map
    }
}

impl FromProps for Pattern {
    fn entity_type() -> EntityType {
        EntityType::Pattern
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(Pattern {
            name: require_str(obj, "name")?,
            description: optional_str(obj, "description"),
            category: optional_str(obj, "category"),
        })
    }
}

/// Constitution — project-scoped, no `change_id`. See DESIGN.md for why
/// this is scoped to the project rather than to a Change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constitution {
    pub name: String,
    pub content: String,
}

impl ToProps for Constitution {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), self.name.clone().into());
        map.insert("content".into(), self.content.clone().into());
        map
    }
}

impl FromProps for Constitution {
    fn entity_type() -> EntityType {
        EntityType::Constitution
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(Constitution {
            name: require_str(obj, "name")?,
            content: require_str(obj, "content")?,
        })
    }
}

/// Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl ToProps for Actor {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), self.name.clone().into());
        insert_opt(&mut map, "role", self.role.clone());
        map
    }
}

impl FromProps for Actor {
    fn entity_type() -> EntityType {
        EntityType::Actor
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(Actor {
            name: require_str(obj, "name")?,
            role: optional_str(obj, "role"),
        })
    }
}

/// Agent — the canonical type; the janitor upserts itself as an
/// Agent named `janitor` with `agent_type = "maintenance"`. Legacy
/// `CodingAgent` rows are soft-migrated on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub agent_type: String,
}

impl ToProps for Agent {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), self.name.clone().into());
        map.insert("agent_type".into(), self.agent_type.clone().into());
        map
    }
}

impl FromProps for Agent {
    fn entity_type() -> EntityType {
        EntityType::Agent
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(Agent {
            name: require_str(obj, "name")?,
            agent_type: optional_str(obj, "agent_type").unwrap_or_else(|| "generic".to_string()),
        })
    }
}

/// TestCase — linked via `tests`/`tested_by`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl ToProps for TestCase {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), self.name.clone().into());
        insert_opt(&mut map, "status", self.status.clone());
        map
    }
}

impl FromProps for TestCase {
    fn entity_type() -> EntityType {
        EntityType::TestCase
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(TestCase {
            name: require_str(obj, "name")?,
            status: optional_str(obj, "status"),
        })
    }
}

/// APIContract — linked via `exposes_api`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiContract {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl ToProps for ApiContract {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), self.name.clone().into());
        insert_opt(&mut map, "version", self.version.clone());
        map
    }
}

impl FromProps for ApiContract {
    fn entity_type() -> EntityType {
        EntityType::ApiContract
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(ApiContract {
            name: require_str(obj, "name")?,
            version: optional_str(obj, "version"),
        })
    }
}

/// GraphSync — last-sync bookkeeping for the out-of-scope
/// codebase-sync collaborator. The core persists/reads it only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSync {
    pub last_sync_commit: String,
    pub last_sync_at: chrono::DateTime<chrono::Utc>,
}

impl ToProps for GraphSync {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("last_sync_commit".into(), self.last_sync_commit.clone().into());
        map.insert(
            "last_sync_at".into(),
            self.last_sync_at.to_rfc3339().into(),
        );
        map
    }
}

impl FromProps for GraphSync {
    fn entity_type() -> EntityType {
        EntityType::GraphSync
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        let last_sync_at_raw = require_str(obj, "last_sync_at")?;
        let last_sync_at = chrono::DateTime::parse_from_rfc3339(&last_sync_at_raw)
            .map_err(|e| ModelError::BadField {
                field: "last_sync_at",
                reason: e.to_string(),
            })?
            .with_timezone(&chrono::Utc);
        Ok(GraphSync {
            last_sync_commit: require_str(obj, "last_sync_commit")?,
            last_sync_at,
        })
    }
}

/// Janitor issue severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Critical,
    Warning,
    Suggestion,
}

impl IssueSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSeverity::Critical => "critical",
            IssueSeverity::Warning => "warning",
            IssueSeverity::Suggestion => "suggestion",
        }
    }
}

/// MaintenanceIssue — the persisted form of a janitor `Issue`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceIssue {
    pub issue_type: String,
    pub severity: IssueSeverity,
    pub entity_type: String,
    pub entity_id: String,
    pub description: String,
    #[serde(default)]
    pub suggestion: Option<String>,
}

impl ToProps for MaintenanceIssue {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("issue_type".into(), self.issue_type.clone().into());
        map.insert("severity".into(), self.severity.as_str().into());
        map.insert("entity_type".into(), self.entity_type.clone().into());
        map.insert("entity_id".into(), self.entity_id.clone().into());
        map.insert("description".into(), self.description.clone().into());
        insert_opt(&mut map, "suggestion", self.suggestion.clone());
        map
    }
}

impl FromProps for MaintenanceIssue {
    fn entity_type() -> EntityType {
        EntityType::MaintenanceIssue
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        let severity_raw = require_str(obj, "severity")?;
        let severity = match severity_raw.as_str() {
            "critical" => IssueSeverity::Critical,
            "warning" => IssueSeverity::Warning,
            "suggestion" => IssueSeverity::Suggestion,
            other => {
                return Err(ModelError::BadField {
                    field: "severity",
                    reason: format!("unknown severity {other:?}"),
                })
            }
        };
        Ok(MaintenanceIssue {
            issue_type: require_str(obj, "issue_type")?,
            severity,
            entity_type: require_str(obj, "entity_type")?,
            entity_id: require_str(obj, "entity_id")?,
            description: require_str(obj, "description")?,
            suggestion: optional_str(obj, "suggestion"),
        })
    }
}

/// Improvement — maintenance-Proposal-adjacent entity the
/// janitor creates per issue category, linked `proposed_by` the janitor
/// Agent, with `has_subtask` Tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Improvement {
    pub title: String,
    pub category: String,
    pub complexity_points: i64,
}

impl ToProps for Improvement {
    fn to_props(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("title".into(), self.title.clone().into());
        map.insert("category".into(), self.category.clone().into());
        map.insert("complexity_points".into(), self.complexity_points.into());
        map
    }
}

impl FromProps for Improvement {
    fn entity_type() -> EntityType {
        EntityType::Improvement
    }

    fn from_props(obj: &Object) -> Result<Self, ModelError> {
        Ok(Improvement {
            title: require_str(obj, "title")?,
            category: require_str(obj, "category")?,
            complexity_points: optional_i64(obj, "complexity_points").unwrap_or(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(ty: &str, props: Map<String, Value>) -> Object {
        Object {
            id: "v1".into(),
            canonical_id: "c1".into(),
            object_type: ty.into(),
            key: None,
            properties: props,
            labels: vec![],
        }
    }

    #[test]
    fn spec_round_trips() {
        let spec = Spec {
            name: "auth-spec".into(),
            summary: Some("auth".into()),
            status: ReadinessStatus::Draft,
        };
        let props = spec.to_props();
        let o = obj("Spec", props);
        let back = Spec::from_props(&o).unwrap();
        assert_eq!(back.name, "auth-spec");
        assert_eq!(back.status, ReadinessStatus::Draft);
    }

    #[test]
    fn missing_status_defaults_to_draft() {
        let mut props = Map::new();
        props.insert("name".into(), "x".into());
        let o = obj("Proposal", props);
        let p = Proposal::from_props(&o).unwrap();
        assert_eq!(p.status, ReadinessStatus::Draft);
    }

    #[test]
    fn from_props_rejects_wrong_type() {
        let mut props = Map::new();
        props.insert("name".into(), "x".into());
        props.insert("summary".into(), "y".into());
        let o = obj("Requirement", props);
        let err = crate::from_props::<Spec>(&o).unwrap_err();
        assert!(matches!(err, ModelError::WrongType { .. }));
    }

    #[test]
    fn task_status_defaults_and_parses() {
        assert_eq!(TaskStatus::parse("blocked"), Some(TaskStatus::Blocked));
        assert_eq!(TaskStatus::parse("bogus"), None);
    }
}
