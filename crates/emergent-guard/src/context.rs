//! The precomputed state a guard set evaluates against.
//!
//! A `GuardContext` is built once per dispatch by the caller — project-level
//! counts for pre-change guards, change-level readiness and artifact counts
//! for artifact/archive guards — so that every guard in a set sees the same
//! snapshot and the whole run is deterministic.

/// Which child kind is about to be attached to a Change, for the artifact
/// guard set. Guards that don't apply to this kind simply pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactAddKind {
    Proposal,
    Spec,
    Design,
    Task,
    Other,
}

impl Default for ArtifactAddKind {
    fn default() -> Self {
        ArtifactAddKind::Other
    }
}

/// Precomputed context a guard set is evaluated over. Fields are grouped by
/// which guard set consumes them; a given dispatch only needs to populate
/// the subset its guard set reads.
#[derive(Debug, Clone, Default)]
pub struct GuardContext {
    /// Caller requested an override of SOFT_BLOCK guards.
    pub force: bool,

    // -- Pre-Change guard set (spec_new) --
    /// Proposed kebab-case name for the new Change/Spec.
    pub new_entity_name: Option<String>,
    pub project_has_constitution: bool,
    pub project_pattern_count: u32,
    pub project_context_count: u32,
    pub project_ui_component_count: u32,

    // -- Artifact guard set (on every artifact add) --
    pub target_kind: ArtifactAddKind,
    pub change_has_ready_proposal: bool,
    pub change_spec_count: u32,
    pub change_all_specs_ready: bool,
    pub change_has_ready_design: bool,

    // -- Archive guard set (spec_archive) --
    pub change_proposal_count: u32,
    pub change_design_count: u32,
    pub change_task_count: u32,
    pub change_tasks_completed: u32,
}
