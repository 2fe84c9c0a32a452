//! Flattened entity records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wire shape of one entity inside a response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct EntityRecord {
    pub id: i64,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: Map<String, Value>,
}

/// A flattened record representing one remote entity.
///
/// Merges identity, attributes, and relationships into one flat mapping
/// that always contains `id` and `type`. Relationships are merged after
/// attributes, so on a key collision the relationship value wins; this
/// precedence is fixed.
///
/// Entities are transient: every operation returns fresh records, and no
/// identity tracking or caching happens on the client side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Entity(Map<String, Value>);

impl Entity {
    pub(crate) fn from_record(record: EntityRecord) -> Self {
        let mut fields = Map::new();
        fields.insert("id".to_string(), Value::from(record.id));
        fields.insert("type".to_string(), Value::String(record.entity_type));
        for (key, value) in record.attributes {
            fields.insert(key, value);
        }
        // Relationships merged last: on a collision the relationship wins.
        for (key, value) in record.relationships {
            fields.insert(key, normalize_relationship(value));
        }
        Self(fields)
    }

    /// Returns the entity id.
    pub fn id(&self) -> i64 {
        self.0.get("id").and_then(Value::as_i64).unwrap_or_default()
    }

    /// Returns the entity type name (e.g. `"Shot"`).
    pub fn entity_type(&self) -> &str {
        self.0
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Returns a field value, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns a field value as a string, if present and a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Returns a field value as an integer, if present and an integer.
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.0.get(field).and_then(Value::as_i64)
    }

    /// True if the entity carries the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Number of fields, including `id` and `type`.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all fields.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns the underlying flat mapping.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Normalize a relationship value.
///
/// The service returns relationship values either as the linked object (or
/// list) directly, or wrapped one level under a `data` key. Unwrap the
/// wrapper here so callers always see one shape.
fn normalize_relationship(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(attributes: Value, relationships: Value) -> EntityRecord {
        serde_json::from_value(json!({
            "id": 42,
            "type": "Shot",
            "attributes": attributes,
            "relationships": relationships,
        }))
        .unwrap()
    }

    #[test]
    fn flatten_merges_identity_attributes_and_relationships() {
        let entity = Entity::from_record(record(
            json!({"code": "sh010", "description": "opening shot"}),
            json!({"project": {"type": "Project", "id": 7}}),
        ));

        assert_eq!(entity.id(), 42);
        assert_eq!(entity.entity_type(), "Shot");
        assert_eq!(entity.get_str("code"), Some("sh010"));
        assert_eq!(
            entity.get("project"),
            Some(&json!({"type": "Project", "id": 7}))
        );
        assert_eq!(entity.len(), 5);
    }

    #[test]
    fn relationship_wins_on_key_collision() {
        let entity = Entity::from_record(record(json!({"a": 1}), json!({"a": 2})));
        assert_eq!(entity.get("a"), Some(&json!(2)));
    }

    #[test]
    fn data_wrapped_relationship_is_unwrapped() {
        let entity = Entity::from_record(record(
            json!({}),
            json!({"entity": {"data": {"type": "Shot", "id": 12}}}),
        ));
        assert_eq!(
            entity.get("entity"),
            Some(&json!({"type": "Shot", "id": 12}))
        );
    }

    #[test]
    fn bare_relationship_passes_through() {
        let entity = Entity::from_record(record(
            json!({}),
            json!({"entity": {"type": "Shot", "id": 12}}),
        ));
        assert_eq!(
            entity.get("entity"),
            Some(&json!({"type": "Shot", "id": 12}))
        );
    }

    #[test]
    fn data_wrapped_list_relationship_is_unwrapped() {
        let entity = Entity::from_record(record(
            json!({}),
            json!({"assignees": {"data": [{"type": "HumanUser", "id": 3}]}}),
        ));
        assert_eq!(
            entity.get("assignees"),
            Some(&json!([{"type": "HumanUser", "id": 3}]))
        );
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let record: EntityRecord =
            serde_json::from_value(json!({"id": 1, "type": "Shot"})).unwrap();
        let entity = Entity::from_record(record);
        assert_eq!(entity.len(), 2);
        assert!(entity.contains("id"));
        assert!(entity.contains("type"));
    }

    #[test]
    fn entity_serializes_as_flat_map() {
        let entity = Entity::from_record(record(json!({"code": "sh010"}), json!({})));
        assert_eq!(
            serde_json::to_value(&entity).unwrap(),
            json!({"id": 42, "type": "Shot", "code": "sh010"})
        );
    }
}
