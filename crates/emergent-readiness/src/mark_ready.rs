//! The mark-ready algorithm (§4.F), five steps, implemented as a single
//! bounded graph expansion rather than a client-side recursive walk — the
//! graph admits no cycles by construction (a tree under a Change), so a
//! depth-bounded expansion (depth 2 for Spec, depth 1 for Requirement)
//! already gives an iterative, non-recursive answer (§9).

use crate::blocker::Blocker;
use crate::error::ReadinessError;
use emergent_client::{BackendClient, EdgeDirection, ObjectIndex};
use emergent_model::{EntityType, Object};
use serde_json::Map;
use tracing::info;

/// The result of one `mark_ready` attempt.
#[derive(Debug, Clone)]
pub enum MarkReadyOutcome {
    /// The artifact was already `ready`; no mutation occurred.
    AlreadyReady { id: String },
    /// Some workflow children are still `draft`; no mutation occurred.
    Blocked { id: String, blockers: Vec<Blocker> },
    /// The artifact's status was set to `ready`.
    MarkedReady { id: String },
}

impl MarkReadyOutcome {
    /// The remedy phrase every blocking result must carry (§7).
    pub fn remedy(&self) -> Option<String> {
        match self {
            MarkReadyOutcome::Blocked { .. } => Some(
                "mark every listed blocker ready first using spec_mark_ready, then retry."
                    .to_string(),
            ),
            _ => None,
        }
    }
}

/// The descendant workflow-artifact types this artifact's readiness
/// depends on, given its bounded expansion.
fn relevant_descendant_types(entity_type: EntityType) -> &'static [EntityType] {
    match entity_type {
        EntityType::Spec => &[EntityType::Requirement, EntityType::Scenario],
        EntityType::Requirement => &[EntityType::Scenario],
        _ => &[],
    }
}

/// Runs the mark-ready algorithm against `id`.
pub async fn mark_ready(
    client: &BackendClient,
    id: &str,
) -> Result<MarkReadyOutcome, ReadinessError> {
    // Step 1: fetch, reject non-workflow-artifact types.
    let obj = client.get_object(id).await?;
    let entity_type = EntityType::parse(&obj.object_type)
        .ok_or_else(|| ReadinessError::NotWorkflowArtifact(obj.object_type.clone()))?;
    let kind = entity_type
        .workflow_kind()
        .ok_or_else(|| ReadinessError::NotWorkflowArtifact(obj.object_type.clone()))?;

    // Step 2: idempotent no-op if already ready.
    if obj.status() == Some("ready") {
        return Ok(MarkReadyOutcome::AlreadyReady {
            id: obj.id.clone(),
        });
    }

    let depth = kind.expansion_depth();
    if depth > 0 {
        let relationship_types: Vec<String> = kind
            .child_relationship_types()
            .iter()
            .map(|t| t.as_str().to_string())
            .collect();

        // Step 3: one bounded expansion, reconciled via the ID Reconciler.
        let (nodes, _edges) = client
            .expand(
                std::slice::from_ref(&obj.id.clone()),
                EdgeDirection::Out,
                depth,
                10_000,
                10_000,
                Some(&relationship_types),
            )
            .await?;

        let index = ObjectIndex::from_objects(nodes);
        let descendant_types = relevant_descendant_types(entity_type);

        let unready: Vec<Blocker> = index
            .distinct()
            .into_iter()
            .filter(|node| node.id != obj.id && node.canonical_id != obj.canonical_id)
            .filter(|node| {
                EntityType::parse(&node.object_type)
                    .map(|t| descendant_types.contains(&t))
                    .unwrap_or(false)
            })
            .filter(|node| node.status() != Some("ready"))
            .map(Blocker::from_object)
            .collect();

        // Step 4: refuse without modification if anything is still draft.
        if !unready.is_empty() {
            return Ok(MarkReadyOutcome::Blocked {
                id: obj.id.clone(),
                blockers: unready,
            });
        }
    }

    // Step 5: mark ready.
    let mut props = Map::new();
    props.insert("status".into(), "ready".into());
    client.update_object(&obj.id, props).await?;

    info!(id = obj.id.as_str(), object_type = %entity_type, "marked ready");

    Ok(MarkReadyOutcome::MarkedReady { id: obj.id })
}

/// Treat missing/empty `status` as `draft`, the convention used throughout
/// the readiness machine.
pub fn is_ready(obj: &Object) -> bool {
    obj.status() == Some("ready")
}
