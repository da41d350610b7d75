//! `toProps` / `fromProps` — the round-trip between typed DTOs and the
//! backend's generic property map.
//!
//! `toProps` skips zero-value optional fields so that partial updates do
//! not clobber existing data with nulls; its inverse `fromProps` reconstructs
//! a DTO from a returned [`Object`], tolerating the legacy-entity soft
//! migration for renamed entity types.

use crate::{EntityType, ModelError, Object};
use serde_json::{Map, Value};

/// Implemented by every DTO that can be written to the backend.
pub trait ToProps {
    fn to_props(&self) -> Map<String, Value>;
}

/// Implemented by every DTO that can be reconstructed from a backend object.
pub trait FromProps: Sized {
    /// The entity type this DTO represents, used to validate `obj.object_type`.
    fn entity_type() -> EntityType;

    fn from_props(obj: &Object) -> Result<Self, ModelError>;
}

/// Convenience wrapper used by the backend client: validates the object's
/// type before delegating to `T::from_props`.
pub fn from_props<T: FromProps>(obj: &Object) -> Result<T, ModelError> {
    let expected = T::entity_type();
    if obj.object_type != expected.as_str() {
        return Err(ModelError::WrongType {
            expected: expected.as_str(),
            actual: obj.object_type.clone(),
        });
    }
    T::from_props(obj)
}

/// Convenience wrapper for callers that just want the property map.
pub fn to_props<T: ToProps>(dto: &T) -> Map<String, Value> {
    dto.to_props()
}

/// Insert `key -> value` into `map`, skipping `None` so partial updates
/// never clobber existing fields with nulls.
pub fn insert_opt(map: &mut Map<String, Value>, key: &str, value: Option<impl Into<Value>>) {
    if let Some(v) = value {
        map.insert(key.to_string(), v.into());
    }
}

/// Insert a non-empty `Vec` as a JSON array; empty vecs are treated as the
/// "zero value" and skipped, same rule as scalar `Option`s.
pub fn insert_vec(map: &mut Map<String, Value>, key: &str, values: &[String]) {
    if !values.is_empty() {
        map.insert(
            key.to_string(),
            Value::Array(values.iter().cloned().map(Value::String).collect()),
        );
    }
}

/// Read a required string property.
pub fn require_str(obj: &Object, field: &'static str) -> Result<String, ModelError> {
    obj.properties
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ModelError::MissingField(field))
}

/// Read an optional string property.
pub fn optional_str(obj: &Object, field: &str) -> Option<String> {
    obj.properties.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Read an optional i64 property.
pub fn optional_i64(obj: &Object, field: &str) -> Option<i64> {
    obj.properties.get(field).and_then(Value::as_i64)
}

/// Read a string array property, defaulting to empty.
pub fn string_array(obj: &Object, field: &str) -> Vec<String> {
    obj.properties
        .get(field)
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_opt_skips_none() {
        let mut map = Map::new();
        insert_opt(&mut map, "intent", Option::<String>::None);
        assert!(map.is_empty());
        insert_opt(&mut map, "intent", Some("do the thing".to_string()));
        assert_eq!(map.get("intent").unwrap().as_str(), Some("do the thing"));
    }

    #[test]
    fn insert_vec_skips_empty() {
        let mut map = Map::new();
        insert_vec(&mut map, "tags", &[]);
        assert!(map.is_empty());
        insert_vec(&mut map, "tags", &["a".to_string(), "b".to_string()]);
        assert!(map.contains_key("tags"));
    }
}
