//! The blocker list surfaced when a mark-ready attempt is refused.

use emergent_model::Object;

/// One unready child blocking a mark-ready attempt, in the shape §4.F
/// requires: `{id, type, name, status}`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Blocker {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub name: String,
    pub status: String,
}

impl Blocker {
    pub fn from_object(obj: &Object) -> Self {
        Self {
            id: obj.id.clone(),
            entity_type: obj.object_type.clone(),
            name: obj.name().unwrap_or("(unnamed)").to_string(),
            status: obj.status().unwrap_or("draft").to_string(),
        }
    }
}
