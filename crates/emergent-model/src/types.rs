//! Entity and relationship type constants.

use std::fmt;

/// The 18 entity types the core recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Change,
    Proposal,
    Spec,
    Requirement,
    Scenario,
    ScenarioStep,
    Design,
    Task,
    App,
    DataModel,
    Context,
    UiComponent,
    Action,
    Pattern,
    Constitution,
    Actor,
    Agent,
    TestCase,
    ApiContract,
    GraphSync,
    MaintenanceIssue,
    Improvement,
}

impl EntityType {
    pub const ALL: &'static [EntityType] = &[
        EntityType::Change,
        EntityType::Proposal,
        EntityType::Spec,
        EntityType::Requirement,
        EntityType::Scenario,
        EntityType::ScenarioStep,
        EntityType::Design,
        EntityType::Task,
        EntityType::App,
        EntityType::DataModel,
        EntityType::Context,
        EntityType::UiComponent,
        EntityType::Action,
        EntityType::Pattern,
        EntityType::Constitution,
        EntityType::Actor,
        EntityType::Agent,
        EntityType::TestCase,
        EntityType::ApiContract,
        EntityType::GraphSync,
        EntityType::MaintenanceIssue,
        EntityType::Improvement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Change => "Change",
            EntityType::Proposal => "Proposal",
            EntityType::Spec => "Spec",
            EntityType::Requirement => "Requirement",
            EntityType::Scenario => "Scenario",
            EntityType::ScenarioStep => "ScenarioStep",
            EntityType::Design => "Design",
            EntityType::Task => "Task",
            EntityType::App => "App",
            EntityType::DataModel => "DataModel",
            EntityType::Context => "Context",
            EntityType::UiComponent => "UIComponent",
            EntityType::Action => "Action",
            EntityType::Pattern => "Pattern",
            EntityType::Constitution => "Constitution",
            EntityType::Actor => "Actor",
            EntityType::Agent => "Agent",
            EntityType::TestCase => "TestCase",
            EntityType::ApiContract => "APIContract",
            EntityType::GraphSync => "GraphSync",
            EntityType::MaintenanceIssue => "MaintenanceIssue",
            EntityType::Improvement => "Improvement",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    /// Workflow artifacts participate in readiness. Returns the
    /// readiness-children kind so the readiness machine knows what to
    /// expand for, or `None` if this type carries no readiness state.
    pub fn workflow_kind(&self) -> Option<WorkflowArtifactKind> {
        match self {
            EntityType::Proposal => Some(WorkflowArtifactKind::Proposal),
            EntityType::Spec => Some(WorkflowArtifactKind::Spec),
            EntityType::Requirement => Some(WorkflowArtifactKind::Requirement),
            EntityType::Scenario => Some(WorkflowArtifactKind::Scenario),
            EntityType::Design => Some(WorkflowArtifactKind::Design),
            _ => None,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The workflow-artifact subset of [`EntityType`], with their
/// readiness-cascading behavior attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowArtifactKind {
    /// No readiness children — can be marked ready unconditionally.
    Proposal,
    /// Ready requires every Requirement ready (transitively, every Scenario).
    Spec,
    /// Ready requires every Scenario ready.
    Requirement,
    /// No readiness children.
    Scenario,
    /// No readiness children.
    Design,
}

impl WorkflowArtifactKind {
    /// Bounded expansion depth used by the readiness machine's mark-ready
    /// check: 2 for Spec (Spec -> Requirement -> Scenario),
    /// 1 for Requirement (Requirement -> Scenario), 0 otherwise (no
    /// readiness children to expand for).
    pub fn expansion_depth(&self) -> u32 {
        match self {
            WorkflowArtifactKind::Spec => 2,
            WorkflowArtifactKind::Requirement => 1,
            _ => 0,
        }
    }

    /// The `has_*` relationship types relevant to this artifact's readiness
    /// children, used to filter the bounded expansion.
    pub fn child_relationship_types(&self) -> &'static [RelationshipType] {
        match self {
            WorkflowArtifactKind::Spec => {
                &[RelationshipType::HasRequirement, RelationshipType::HasScenario]
            }
            WorkflowArtifactKind::Requirement => &[RelationshipType::HasScenario],
            _ => &[],
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            WorkflowArtifactKind::Proposal => EntityType::Proposal,
            WorkflowArtifactKind::Spec => EntityType::Spec,
            WorkflowArtifactKind::Requirement => EntityType::Requirement,
            WorkflowArtifactKind::Scenario => EntityType::Scenario,
            WorkflowArtifactKind::Design => EntityType::Design,
        }
    }
}

/// The ~40 named relationship types, grouped by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    // Structural
    HasProposal,
    HasSpec,
    HasRequirement,
    HasScenario,
    HasStep,
    HasDesign,
    HasTask,
    HasSubtask,
    // Pattern / governance
    UsesPattern,
    RequiresPattern,
    ForbidsPattern,
    GovernedBy,
    InheritsFrom,
    ExtendsPattern,
    // Task coordination
    Blocks,
    BlockedBy,
    Implements,
    AssignedTo,
    // App topology
    BelongsToApp,
    ScopedToApp,
    DependsOnApp,
    ProvidesModel,
    ConsumesModel,
    ExposesApi,
    // Change tracking
    ChangeCreates,
    ChangeModifies,
    ChangeReferences,
    // Testing
    Tests,
    TestedBy,
    // Maintenance
    ProposedBy,
    AffectsEntity,
}

impl RelationshipType {
    pub const ALL: &'static [RelationshipType] = &[
        RelationshipType::HasProposal,
        RelationshipType::HasSpec,
        RelationshipType::HasRequirement,
        RelationshipType::HasScenario,
        RelationshipType::HasStep,
        RelationshipType::HasDesign,
        RelationshipType::HasTask,
        RelationshipType::HasSubtask,
        RelationshipType::UsesPattern,
        RelationshipType::RequiresPattern,
        RelationshipType::ForbidsPattern,
        RelationshipType::GovernedBy,
        RelationshipType::InheritsFrom,
        RelationshipType::ExtendsPattern,
        RelationshipType::Blocks,
        RelationshipType::BlockedBy,
        RelationshipType::Implements,
        RelationshipType::AssignedTo,
        RelationshipType::BelongsToApp,
        RelationshipType::ScopedToApp,
        RelationshipType::DependsOnApp,
        RelationshipType::ProvidesModel,
        RelationshipType::ConsumesModel,
        RelationshipType::ExposesApi,
        RelationshipType::ChangeCreates,
        RelationshipType::ChangeModifies,
        RelationshipType::ChangeReferences,
        RelationshipType::Tests,
        RelationshipType::TestedBy,
        RelationshipType::ProposedBy,
        RelationshipType::AffectsEntity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::HasProposal => "has_proposal",
            RelationshipType::HasSpec => "has_spec",
            RelationshipType::HasRequirement => "has_requirement",
            RelationshipType::HasScenario => "has_scenario",
            RelationshipType::HasStep => "has_step",
            RelationshipType::HasDesign => "has_design",
            RelationshipType::HasTask => "has_task",
            RelationshipType::HasSubtask => "has_subtask",
            RelationshipType::UsesPattern => "uses_pattern",
            RelationshipType::RequiresPattern => "requires_pattern",
            RelationshipType::ForbidsPattern => "forbids_pattern",
            RelationshipType::GovernedBy => "governed_by",
            RelationshipType::InheritsFrom => "inherits_from",
            RelationshipType::ExtendsPattern => "extends_pattern",
            RelationshipType::Blocks => "blocks",
            RelationshipType::BlockedBy => "blocked_by",
            RelationshipType::Implements => "implements",
            RelationshipType::AssignedTo => "assigned_to",
            RelationshipType::BelongsToApp => "belongs_to_app",
            RelationshipType::ScopedToApp => "scoped_to_app",
            RelationshipType::DependsOnApp => "depends_on_app",
            RelationshipType::ProvidesModel => "provides_model",
            RelationshipType::ConsumesModel => "consumes_model",
            RelationshipType::ExposesApi => "exposes_api",
            RelationshipType::ChangeCreates => "change_creates",
            RelationshipType::ChangeModifies => "change_modifies",
            RelationshipType::ChangeReferences => "change_references",
            RelationshipType::Tests => "tests",
            RelationshipType::TestedBy => "tested_by",
            RelationshipType::ProposedBy => "proposed_by",
            RelationshipType::AffectsEntity => "affects_entity",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    /// The inverse relationship, for the relationship types that carry one
    ///. Returns `None` for relationship
    /// types with no declared inverse.
    pub fn inverse(&self) -> Option<RelationshipType> {
        match self {
            RelationshipType::Blocks => Some(RelationshipType::BlockedBy),
            RelationshipType::BlockedBy => Some(RelationshipType::Blocks),
            RelationshipType::Tests => Some(RelationshipType::TestedBy),
            RelationshipType::TestedBy => Some(RelationshipType::Tests),
            _ => None,
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_type_round_trips_through_str() {
        for t in EntityType::ALL {
            assert_eq!(EntityType::parse(t.as_str()), Some(*t));
        }
    }

    #[test]
    fn relationship_type_round_trips_through_str() {
        for t in RelationshipType::ALL {
            assert_eq!(RelationshipType::parse(t.as_str()), Some(*t));
        }
    }

    #[test]
    fn inverse_pairing_is_symmetric() {
        for t in RelationshipType::ALL {
            if let Some(inv) = t.inverse() {
                assert_eq!(inv.inverse(), Some(*t));
            }
        }
    }

    #[test]
    fn workflow_kinds_match_spec_list() {
        assert_eq!(
            EntityType::Proposal.workflow_kind(),
            Some(WorkflowArtifactKind::Proposal)
        );
        assert_eq!(EntityType::Task.workflow_kind(), None);
        assert_eq!(EntityType::Change.workflow_kind(), None);
    }

    #[test]
    fn spec_expansion_depth_is_two() {
        assert_eq!(WorkflowArtifactKind::Spec.expansion_depth(), 2);
        assert_eq!(WorkflowArtifactKind::Requirement.expansion_depth(), 1);
        assert_eq!(WorkflowArtifactKind::Scenario.expansion_depth(), 0);
    }
}
