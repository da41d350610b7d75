//! Downward invalidation (§4.F): adding a child to a `ready` parent reverts
//! the parent to `draft`. Single-level only — the grandparent is not
//! automatically reverted; the next mark-ready attempt on it will simply
//! fail because its own child is now draft.

use crate::error::ReadinessError;
use crate::mark_ready::is_ready;
use emergent_client::BackendClient;
use serde_json::Map;
use tracing::info;

/// If `parent_id` is currently `ready`, reverts it to `draft` and returns
/// `true`. A no-op (returns `false`) if it was already `draft` or carries no
/// readiness state.
pub async fn revert_if_ready(
    client: &BackendClient,
    parent_id: &str,
) -> Result<bool, ReadinessError> {
    let parent = client.get_object(parent_id).await?;
    if !is_ready(&parent) {
        return Ok(false);
    }

    let mut props = Map::new();
    props.insert("status".into(), "draft".into());
    client.update_object(parent_id, props).await?;

    info!(
        id = parent_id,
        object_type = parent.object_type.as_str(),
        "reverted to draft after a new child was added"
    );

    Ok(true)
}
