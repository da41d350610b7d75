//! Wire-level request/response shapes for the graph backend REST API
//! (§6.3). These are internal to `emergent-client`; callers only ever see
//! [`emergent_model::Object`] / [`emergent_model::Edge`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Serialize)]
pub(crate) struct CreateObjectBody<'a> {
    #[serde(rename = "type")]
    pub object_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<&'a str>,
    pub properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateObjectBody {
    pub properties: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchGetBody<'a> {
    pub ids: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(crate) struct BatchGetResult {
    pub objects: Vec<emergent_model::Object>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpsertObjectBody<'a> {
    #[serde(rename = "type")]
    pub object_type: &'a str,
    pub key: &'a str,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListObjectsResult {
    pub objects: Vec<emergent_model::Object>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountResult {
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRelationshipBody<'a> {
    #[serde(rename = "type")]
    pub relationship_type: &'a str,
    pub src_id: &'a str,
    pub dst_id: &'a str,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListRelationshipsResult {
    pub relationships: Vec<emergent_model::Edge>,
}

/// Direction filter for `get_edges`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    In,
    Out,
    Both,
}

impl EdgeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeDirection::In => "in",
            EdgeDirection::Out => "out",
            EdgeDirection::Both => "both",
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ExpandBody<'a> {
    pub root_ids: &'a [String],
    pub direction: &'static str,
    pub max_depth: u32,
    pub max_nodes: u32,
    pub max_edges: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_types: Option<&'a [String]>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExpandResult {
    pub nodes: Vec<emergent_model::Object>,
    pub edges: Vec<emergent_model::Edge>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResult {
    pub objects: Vec<emergent_model::Object>,
}
