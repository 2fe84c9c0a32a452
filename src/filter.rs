//! Typed search filter expressions.
//!
//! Filters serialize to the service's wire format: a condition becomes the
//! triple `[field, operator, value]`, and compound groups become
//! `{"logical_operator": ..., "conditions": [...]}`.

use serde::{Serialize, Serializer};
use serde_json::{Value, json};

/// Comparison operators accepted by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Is,
    IsNot,
    LessThan,
    GreaterThan,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    In,
    NotIn,
}

impl FilterOp {
    /// Wire spelling of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Is => "is",
            FilterOp::IsNot => "is_not",
            FilterOp::LessThan => "less_than",
            FilterOp::GreaterThan => "greater_than",
            FilterOp::Contains => "contains",
            FilterOp::NotContains => "not_contains",
            FilterOp::StartsWith => "starts_with",
            FilterOp::EndsWith => "ends_with",
            FilterOp::In => "in",
            FilterOp::NotIn => "not_in",
        }
    }
}

/// A search filter expression.
///
/// # Example
///
/// ```
/// use flowtrack::{EntityRef, Filter};
///
/// let filter = Filter::all([
///     Filter::is("entity", EntityRef::new("Shot", 12)),
///     Filter::is("sg_status_list", "ip"),
/// ]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// A single `[field, operator, value]` condition.
    Condition {
        field: String,
        op: FilterOp,
        value: Value,
    },
    /// All conditions must match (`logical_operator: and`).
    All(Vec<Filter>),
    /// Any condition may match (`logical_operator: or`).
    Any(Vec<Filter>),
}

impl Filter {
    /// A condition with an explicit operator.
    pub fn condition(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Filter::Condition {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Equality condition.
    pub fn is(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::condition(field, FilterOp::Is, value)
    }

    /// Inequality condition.
    pub fn is_not(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::condition(field, FilterOp::IsNot, value)
    }

    /// Substring condition.
    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::condition(field, FilterOp::Contains, value)
    }

    /// Membership condition over a list of values.
    pub fn in_list<V>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::condition(field, FilterOp::In, Value::Array(values))
    }

    /// Conjunction of filters.
    pub fn all(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::All(filters.into_iter().collect())
    }

    /// Disjunction of filters.
    pub fn any(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Any(filters.into_iter().collect())
    }
}

#[derive(Serialize)]
struct Group<'a> {
    logical_operator: &'static str,
    conditions: &'a [Filter],
}

impl Serialize for Filter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Filter::Condition { field, op, value } => {
                (field, op.as_str(), value).serialize(serializer)
            }
            Filter::All(conditions) => Group {
                logical_operator: "and",
                conditions,
            }
            .serialize(serializer),
            Filter::Any(conditions) => Group {
                logical_operator: "or",
                conditions,
            }
            .serialize(serializer),
        }
    }
}

/// A `{type, id}` reference to another entity.
///
/// Used both as a filter value (e.g. `project is {Project, 7}`) and as a
/// relationship link when creating entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRef {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub id: i64,
}

impl EntityRef {
    /// Create a new entity reference.
    pub fn new(entity_type: impl Into<String>, id: i64) -> Self {
        Self {
            entity_type: entity_type.into(),
            id,
        }
    }
}

impl From<EntityRef> for Value {
    fn from(entity_ref: EntityRef) -> Self {
        json!({"type": entity_ref.entity_type, "id": entity_ref.id})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_serializes_as_triple() {
        let filter = Filter::is("login", "alice");
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!(["login", "is", "alice"])
        );
    }

    #[test]
    fn entity_ref_condition() {
        let filter = Filter::is("project", EntityRef::new("Project", 7));
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!(["project", "is", {"type": "Project", "id": 7}])
        );
    }

    #[test]
    fn in_list_serializes_value_array() {
        let filter = Filter::in_list("id", [12i64, 15]);
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!(["id", "in", [12, 15]])
        );
    }

    #[test]
    fn compound_group_serializes_with_logical_operator() {
        let filter = Filter::any([
            Filter::is("sg_status_list", "ip"),
            Filter::is("sg_status_list", "fin"),
        ]);
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "logical_operator": "or",
                "conditions": [
                    ["sg_status_list", "is", "ip"],
                    ["sg_status_list", "is", "fin"],
                ],
            })
        );
    }

    #[test]
    fn nested_groups() {
        let filter = Filter::all([
            Filter::is("entity", EntityRef::new("Shot", 12)),
            Filter::any([Filter::is("a", 1), Filter::is_not("b", 2)]),
        ]);
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "logical_operator": "and",
                "conditions": [
                    ["entity", "is", {"type": "Shot", "id": 12}],
                    {
                        "logical_operator": "or",
                        "conditions": [["a", "is", 1], ["b", "is_not", 2]],
                    },
                ],
            })
        );
    }

    #[test]
    fn operator_wire_spellings() {
        assert_eq!(FilterOp::Is.as_str(), "is");
        assert_eq!(FilterOp::NotIn.as_str(), "not_in");
        assert_eq!(FilterOp::StartsWith.as_str(), "starts_with");
    }
}
