//! The three named guard sets: Pre-Change, Artifact, Archive.

use crate::context::ArtifactAddKind;
use crate::{Guard, GuardCheck, GuardContext, Severity};
use emergent_model::is_kebab_case;

/// Guards run when creating a new Change (and its Spec) — `spec_new`.
pub fn pre_change_guards() -> Vec<Guard> {
    vec![
        Guard {
            id: "kebab_case_name",
            description: "new entity names must be kebab-case",
            severity: Severity::HardBlock,
            check: |ctx: &GuardContext| match &ctx.new_entity_name {
                Some(name) if is_kebab_case(name) => GuardCheck::pass(),
                Some(name) => GuardCheck::fail(
                    format!("{name:?} is not kebab-case"),
                    "rename using lowercase words separated by hyphens",
                ),
                None => GuardCheck::fail(
                    "no name was supplied",
                    "supply a kebab-case name for the new entity",
                ),
            },
        },
        Guard {
            id: "constitution_required",
            description: "a project must have a Constitution before starting work",
            severity: Severity::HardBlock,
            check: |ctx: &GuardContext| {
                if ctx.project_has_constitution {
                    GuardCheck::pass()
                } else {
                    GuardCheck::fail(
                        "this project has no Constitution",
                        "create a Constitution before starting a Change",
                    )
                }
            },
        },
        Guard {
            id: "patterns_seeded",
            description: "a project should have at least one Pattern recorded",
            severity: Severity::SoftBlock,
            check: |ctx: &GuardContext| {
                if ctx.project_pattern_count > 0 {
                    GuardCheck::pass()
                } else {
                    GuardCheck::fail(
                        "no Patterns are recorded for this project",
                        "record at least one Pattern, or retry with force=true",
                    )
                }
            },
        },
        Guard {
            id: "context_discovery",
            description: "a project should have discovered Context entities",
            severity: Severity::Suggestion,
            check: |ctx: &GuardContext| {
                if ctx.project_context_count > 0 {
                    GuardCheck::pass()
                } else {
                    GuardCheck::fail(
                        "no Context entities are recorded for this project",
                        "run context discovery before starting the Change",
                    )
                }
            },
        },
        Guard {
            id: "component_discovery",
            description: "a project should have discovered UiComponent entities",
            severity: Severity::Suggestion,
            check: |ctx: &GuardContext| {
                if ctx.project_ui_component_count > 0 {
                    GuardCheck::pass()
                } else {
                    GuardCheck::fail(
                        "no UiComponent entities are recorded for this project",
                        "run component discovery before starting the Change",
                    )
                }
            },
        },
    ]
}

/// Guards run whenever an artifact is attached to a Change.
pub fn artifact_guards() -> Vec<Guard> {
    vec![
        Guard {
            id: "proposal_before_spec",
            description: "a Spec/Requirement/Scenario needs a ready Proposal first",
            severity: Severity::HardBlock,
            check: |ctx: &GuardContext| {
                if ctx.target_kind != ArtifactAddKind::Spec {
                    return GuardCheck::pass();
                }
                if ctx.change_has_ready_proposal {
                    GuardCheck::pass()
                } else {
                    GuardCheck::fail(
                        "this Change has no ready Proposal",
                        "mark the Proposal ready before adding a Spec",
                    )
                }
            },
        },
        Guard {
            id: "spec_before_design",
            description: "a Design needs a ready Proposal and all Specs ready first",
            severity: Severity::HardBlock,
            check: |ctx: &GuardContext| {
                if ctx.target_kind != ArtifactAddKind::Design {
                    return GuardCheck::pass();
                }
                if !ctx.change_has_ready_proposal {
                    return GuardCheck::fail(
                        "this Change has no ready Proposal",
                        "mark the Proposal ready before adding a Design",
                    );
                }
                if ctx.change_spec_count == 0 {
                    return GuardCheck::fail(
                        "this Change has no Specs",
                        "add at least one Spec before adding a Design",
                    );
                }
                if !ctx.change_all_specs_ready {
                    return GuardCheck::fail(
                        "not every Spec on this Change is ready",
                        "mark all Specs ready before adding a Design",
                    );
                }
                GuardCheck::pass()
            },
        },
        Guard {
            id: "design_before_tasks",
            description: "a Task needs a ready Design first",
            severity: Severity::HardBlock,
            check: |ctx: &GuardContext| {
                if ctx.target_kind != ArtifactAddKind::Task {
                    return GuardCheck::pass();
                }
                if ctx.change_has_ready_design {
                    GuardCheck::pass()
                } else {
                    GuardCheck::fail(
                        "this Change has no ready Design",
                        "mark the Design ready before adding a Task",
                    )
                }
            },
        },
    ]
}

/// Guards run when archiving a Change — `spec_archive`.
pub fn archive_guards() -> Vec<Guard> {
    vec![
        Guard {
            id: "artifact_completeness",
            description: "a Change should have a Proposal and a Design before archiving",
            severity: Severity::SoftBlock,
            check: |ctx: &GuardContext| {
                if ctx.change_proposal_count > 0 && ctx.change_design_count > 0 {
                    GuardCheck::pass()
                } else {
                    GuardCheck::fail(
                        "this Change is missing a Proposal or a Design",
                        "add the missing artifacts, or retry with force=true",
                    )
                }
            },
        },
        Guard {
            id: "task_completion",
            description: "all of a Change's Tasks should be complete before archiving",
            severity: Severity::SoftBlock,
            check: |ctx: &GuardContext| {
                if ctx.change_task_count == 0 || ctx.change_tasks_completed == ctx.change_task_count
                {
                    GuardCheck::pass()
                } else {
                    GuardCheck::fail(
                        format!(
                            "{}/{} Tasks are complete",
                            ctx.change_tasks_completed, ctx.change_task_count
                        ),
                        "finish the remaining Tasks, or retry with force=true",
                    )
                }
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run;

    #[test]
    fn pre_change_blocks_without_constitution() {
        let ctx = GuardContext {
            new_entity_name: Some("add-login".to_string()),
            project_has_constitution: false,
            ..Default::default()
        };
        let outcome = run(&pre_change_guards(), &ctx);
        assert!(outcome.blocked);
    }

    #[test]
    fn pre_change_passes_with_minimal_valid_context() {
        let ctx = GuardContext {
            new_entity_name: Some("add-login".to_string()),
            project_has_constitution: true,
            project_pattern_count: 1,
            project_context_count: 1,
            project_ui_component_count: 1,
            ..Default::default()
        };
        let outcome = run(&pre_change_guards(), &ctx);
        assert!(!outcome.blocked);
        assert!(outcome.advisory_message.is_none());
    }

    #[test]
    fn rejects_non_kebab_case_name() {
        let ctx = GuardContext {
            new_entity_name: Some("AddLogin".to_string()),
            project_has_constitution: true,
            ..Default::default()
        };
        let outcome = run(&pre_change_guards(), &ctx);
        assert!(outcome.blocked);
        assert!(outcome.block_message.unwrap().contains("kebab_case_name"));
    }

    #[test]
    fn design_requires_all_specs_ready() {
        let ctx = GuardContext {
            target_kind: ArtifactAddKind::Design,
            change_has_ready_proposal: true,
            change_spec_count: 2,
            change_all_specs_ready: false,
            ..Default::default()
        };
        let outcome = run(&artifact_guards(), &ctx);
        assert!(outcome.blocked);
        assert!(outcome
            .block_message
            .unwrap()
            .contains("spec_before_design"));
    }

    #[test]
    fn task_requires_ready_design() {
        let ready = GuardContext {
            target_kind: ArtifactAddKind::Task,
            change_has_ready_design: true,
            ..Default::default()
        };
        assert!(!run(&artifact_guards(), &ready).blocked);

        let not_ready = GuardContext {
            target_kind: ArtifactAddKind::Task,
            change_has_ready_design: false,
            ..Default::default()
        };
        assert!(run(&artifact_guards(), &not_ready).blocked);
    }

    #[test]
    fn archive_soft_blocks_on_incomplete_tasks_but_force_overrides() {
        let ctx = GuardContext {
            change_proposal_count: 1,
            change_design_count: 1,
            change_task_count: 3,
            change_tasks_completed: 1,
            ..Default::default()
        };
        let outcome = run(&archive_guards(), &ctx);
        assert!(outcome.blocked);

        let forced = GuardContext {
            force: true,
            ..ctx
        };
        let outcome = run(&archive_guards(), &forced);
        assert!(!outcome.blocked);
    }
}
