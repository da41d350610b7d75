//! The ID Reconciler: dual-indexed resolution of version vs. canonical IDs.
//!
//! Every persisted entity carries both a version ID and a canonical ID, and
//! relationship endpoints may reference either variant (§3.1). All maps
//! built over nodes or edges here are dual-indexed under both, so lookups
//! are correct regardless of which variant a caller or the backend happens
//! to use.

use emergent_model::{Edge, Object};
use std::collections::HashMap;

/// Maps both ID variants of every entry to the entry itself.
///
/// Built from a slice of [`Object`]s (or graph-expansion nodes with the same
/// shape). Satisfies the ID-duality invariant: `index.get(v.id) ==
/// index.get(v.canonical_id)` for every indexed object `v`.
#[derive(Debug, Clone, Default)]
pub struct ObjectIndex {
    by_id: HashMap<String, Object>,
}

impl ObjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_objects(objects: impl IntoIterator<Item = Object>) -> Self {
        let mut index = Self::new();
        for obj in objects {
            index.insert(obj);
        }
        index
    }

    pub fn insert(&mut self, obj: Object) {
        self.by_id.insert(obj.id.clone(), obj.clone());
        self.by_id.insert(obj.canonical_id.clone(), obj);
    }

    /// Look up by either ID variant.
    pub fn get(&self, id: &str) -> Option<&Object> {
        self.by_id.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Iterate distinct logical entities, deduplicated by canonical ID so a
    /// node indexed under both its variants is yielded once. Callers
    /// iterating expansion results MUST dedup this way to avoid processing
    /// multiple versions of the same logical entity.
    pub fn distinct(&self) -> Vec<&Object> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for obj in self.by_id.values() {
            if seen.insert(obj.canonical_id.as_str()) {
                out.push(obj);
            }
        }
        out
    }

    pub fn len_distinct(&self) -> usize {
        self.distinct().len()
    }
}

/// A small set containing both ID variants of one entity, used for
/// self-skip during graph walks and for edge-endpoint membership tests.
#[derive(Debug, Clone, Default)]
pub struct IdSet {
    ids: std::collections::HashSet<String>,
}

impl IdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set covering both ID variants of `obj`.
    pub fn of(obj: &Object) -> Self {
        let mut set = Self::new();
        set.ids.insert(obj.id.clone());
        set.ids.insert(obj.canonical_id.clone());
        set
    }

    /// Build a set covering both ID variants of every object in `objects`
    /// (used by the edge-based existence check of §4.C, which resolves a
    /// batch of destination objects and tests membership against them).
    pub fn of_all<'a>(objects: impl IntoIterator<Item = &'a Object>) -> Self {
        let mut set = Self::new();
        for obj in objects {
            set.ids.insert(obj.id.clone());
            set.ids.insert(obj.canonical_id.clone());
        }
        set
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn insert(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }
}

/// Rewrites every edge's `src_id`/`dst_id` to the corresponding node's
/// primary `id` when resolvable against `index`, so downstream map lookups
/// against the rewritten edges are consistent. Edges whose endpoint is not
/// present in `index` are left unchanged.
pub fn canonicalize_edge_ids(edges: &mut [Edge], index: &ObjectIndex) {
    for edge in edges.iter_mut() {
        if let Some(src) = index.get(&edge.src_id) {
            edge.src_id = src.id.clone();
        }
        if let Some(dst) = index.get(&edge.dst_id) {
            edge.dst_id = dst.id.clone();
        }
    }
}

/// Picks the canonical representative among duplicate `FindByTypeAndKey`
/// matches: the lexicographically-smallest canonical ID, deterministically.
/// Returns `None` for an empty slice. Callers should log a warning when
/// `candidates.len() > 1` — legacy data predates the dedup-on-write path.
pub fn pick_canonical<'a>(candidates: &'a [Object]) -> Option<&'a Object> {
    candidates.iter().min_by(|a, b| a.canonical_id.cmp(&b.canonical_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn obj(id: &str, canonical: &str) -> Object {
        Object {
            id: id.to_string(),
            canonical_id: canonical.to_string(),
            object_type: "Spec".to_string(),
            key: None,
            properties: Map::new(),
            labels: vec![],
        }
    }

    #[test]
    fn index_resolves_either_id_variant() {
        let index = ObjectIndex::from_objects([obj("v1", "c1")]);
        assert_eq!(index.get("v1").unwrap().canonical_id, "c1");
        assert_eq!(index.get("c1").unwrap().id, "v1");
    }

    #[test]
    fn distinct_dedups_by_canonical_id() {
        let index = ObjectIndex::from_objects([obj("v1", "c1"), obj("v2", "c1"), obj("v3", "c2")]);
        assert_eq!(index.len_distinct(), 2);
    }

    #[test]
    fn id_set_contains_both_variants() {
        let set = IdSet::of(&obj("v1", "c1"));
        assert!(set.contains("v1"));
        assert!(set.contains("c1"));
        assert!(!set.contains("v2"));
    }

    #[test]
    fn canonicalize_rewrites_endpoints_to_primary_id() {
        let index = ObjectIndex::from_objects([obj("v1", "c1"), obj("v2", "c2")]);
        let mut edges = vec![Edge {
            id: "e1".into(),
            relationship_type: "has_spec".into(),
            src_id: "c1".into(),
            dst_id: "v2".into(),
            properties: Map::new(),
        }];
        canonicalize_edge_ids(&mut edges, &index);
        assert_eq!(edges[0].src_id, "v1");
        assert_eq!(edges[0].dst_id, "v2");
    }

    #[test]
    fn canonicalize_leaves_unresolvable_endpoints_unchanged() {
        let index = ObjectIndex::new();
        let mut edges = vec![Edge {
            id: "e1".into(),
            relationship_type: "has_spec".into(),
            src_id: "unknown".into(),
            dst_id: "also-unknown".into(),
            properties: Map::new(),
        }];
        canonicalize_edge_ids(&mut edges, &index);
        assert_eq!(edges[0].src_id, "unknown");
    }

    #[test]
    fn pick_canonical_is_deterministic_smallest() {
        let candidates = vec![obj("v1", "c2"), obj("v2", "c1"), obj("v3", "c3")];
        let picked = pick_canonical(&candidates).unwrap();
        assert_eq!(picked.canonical_id, "c1");
    }

    #[test]
    fn pick_canonical_empty_is_none() {
        assert!(pick_canonical(&[]).is_none());
    }
}
