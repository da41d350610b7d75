//! Artifact model: entity/relationship type constants, typed DTOs, and
//! the property-map marshalling layer that bridges them to the backend's
//! generic object representation.

mod dto;
mod error;
mod naming;
mod props;
mod types;

pub use dto::*;
pub use error::ModelError;
pub use naming::is_kebab_case;
pub use props::{from_props, to_props, FromProps, ToProps};
pub use types::{EntityType, RelationshipType, WorkflowArtifactKind};

use serde_json::{Map, Value};

/// A generic object as returned by the graph backend.
///
/// Every persisted entity carries both a version ID and a canonical ID
///. Relationship endpoints may reference either variant, which is
/// why the ID Reconciler (`emergent-client::reconcile`) treats them as
/// interchangeable handles to the same logical entity.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Object {
    pub id: String,
    pub canonical_id: String,
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Object {
    /// Both ID variants for this object, for dual-indexing.
    pub fn ids(&self) -> [&str; 2] {
        [self.id.as_str(), self.canonical_id.as_str()]
    }

    /// Read a string property, treating an absent/empty `status` the same
    /// way the readiness machine does: missing means draft.
    pub fn status(&self) -> Option<&str> {
        self.properties.get("status").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(Value::as_str)
    }
}

/// A graph relationship (edge) as returned by the backend. Endpoints may be
/// recorded under either ID variant — callers MUST NOT rely on plain
/// equality against `src_id`/`dst_id` without first canonicalizing via the
/// ID Reconciler.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Edge {
    pub id: String,
    #[serde(rename = "type")]
    pub relationship_type: String,
    pub src_id: String,
    pub dst_id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}
