//! Builds a [`GuardContext`] by querying the backend once per dispatch
//! (§4.E: "populated once per dispatch... Guards are pure functions over
//! this context — no guard issues its own queries").

use emergent_client::{BackendClient, ClientError, EdgeDirection, ObjectIndex};
use emergent_guard::{ArtifactAddKind, GuardContext};
use emergent_model::EntityType;

/// Populates the Pre-Change guard set's fields (`spec_new`).
pub async fn populate_project_state(
    client: &BackendClient,
    new_entity_name: Option<String>,
) -> Result<GuardContext, ClientError> {
    let project_has_constitution = client.count_objects(EntityType::Constitution).await? > 0;
    let project_pattern_count = client.count_objects(EntityType::Pattern).await? as u32;
    let project_context_count = client.count_objects(EntityType::Context).await? as u32;
    let project_ui_component_count = client.count_objects(EntityType::UiComponent).await? as u32;

    Ok(GuardContext {
        new_entity_name,
        project_has_constitution,
        project_pattern_count,
        project_context_count,
        project_ui_component_count,
        ..Default::default()
    })
}

/// Populates the Artifact/Archive guard sets' fields for one Change, via a
/// single depth-1 expansion over its direct structural children.
pub async fn populate_change_state(
    client: &BackendClient,
    change_id: &str,
    target_kind: ArtifactAddKind,
    force: bool,
) -> Result<GuardContext, ClientError> {
    let relationship_types = vec![
        "has_proposal".to_string(),
        "has_spec".to_string(),
        "has_design".to_string(),
        "has_task".to_string(),
    ];

    let (nodes, _edges) = client
        .expand(
            std::slice::from_ref(&change_id.to_string()),
            EdgeDirection::Out,
            1,
            10_000,
            10_000,
            Some(&relationship_types),
        )
        .await?;

    let index = ObjectIndex::from_objects(nodes);

    let mut change_proposal_count = 0u32;
    let mut change_has_ready_proposal = false;
    let mut change_spec_count = 0u32;
    let mut change_all_specs_ready = true;
    let mut change_design_count = 0u32;
    let mut change_has_ready_design = false;
    let mut change_task_count = 0u32;
    let mut change_tasks_completed = 0u32;

    for obj in index.distinct() {
        match obj.object_type.as_str() {
            "Proposal" => {
                change_proposal_count += 1;
                if obj.status() == Some("ready") {
                    change_has_ready_proposal = true;
                }
            }
            "Spec" => {
                change_spec_count += 1;
                if obj.status() != Some("ready") {
                    change_all_specs_ready = false;
                }
            }
            "Design" => {
                change_design_count += 1;
                if obj.status() == Some("ready") {
                    change_has_ready_design = true;
                }
            }
            "Task" => {
                change_task_count += 1;
                if obj.properties.get("status").and_then(|v| v.as_str()) == Some("completed") {
                    change_tasks_completed += 1;
                }
            }
            _ => {}
        }
    }

    Ok(GuardContext {
        force,
        target_kind,
        change_has_ready_proposal,
        change_spec_count,
        change_all_specs_ready,
        change_has_ready_design,
        change_proposal_count,
        change_design_count,
        change_task_count,
        change_tasks_completed,
        ..Default::default()
    })
}
