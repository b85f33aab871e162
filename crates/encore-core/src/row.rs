use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One record fetched from the row store: a mapping from field name to a
/// scalar or a nested mapping (joined relations such as `analytics` or
/// `newsletter`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a row from a JSON value. Anything other than an object is not a
    /// row and yields `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Shallow merge: every field in `updates` overwrites the same field here.
    pub fn merge(&mut self, updates: &Row) {
        for (k, v) in &updates.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// The row identifier, whether stored as a string or a number.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn bool_field(&self, field: &str) -> Option<bool> {
        self.0.get(field).and_then(Value::as_bool)
    }

    /// Numeric value of `field`. Non-numeric values count as missing.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(Value::as_f64)
    }

    /// Numeric value of `field`, with missing or non-numeric values read as 0.
    pub fn number_or_zero(&self, field: &str) -> f64 {
        self.number(field).unwrap_or(0.0)
    }

    /// A nested mapping, e.g. the joined `analytics` record of an issue.
    /// Joins that come back as a one-element array are unwrapped.
    pub fn nested(&self, field: &str) -> Option<&Map<String, Value>> {
        match self.0.get(field)? {
            Value::Object(map) => Some(map),
            Value::Array(items) => items.first().and_then(Value::as_object),
            _ => None,
        }
    }

    /// `row.outer.inner` as a number, 0 when any level is missing.
    pub fn nested_number_or_zero(&self, outer: &str, inner: &str) -> f64 {
        self.nested(outer)
            .and_then(|m| m.get(inner))
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    /// Parse `field` as a UTC timestamp. Accepts RFC 3339 and plain
    /// `YYYY-MM-DD` dates (read as midnight UTC).
    pub fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        parse_timestamp(self.str_field(field)?)
    }
}

impl From<Map<String, Value>> for Row {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Parse a JSON array into rows, skipping anything that is not an object.
pub fn rows_from_value(value: Value) -> Vec<Row> {
    match value {
        Value::Array(items) => items.into_iter().filter_map(Row::from_value).collect(),
        other => Row::from_value(other).into_iter().collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_number_defaults_to_zero() {
        let row = Row::from_value(json!({ "analytics": { "opens": 12 } })).unwrap();
        assert_eq!(row.nested_number_or_zero("analytics", "opens"), 12.0);
        assert_eq!(row.nested_number_or_zero("analytics", "clicks"), 0.0);
        assert_eq!(row.nested_number_or_zero("missing", "opens"), 0.0);
    }

    #[test]
    fn nested_unwraps_single_element_join() {
        let row = Row::from_value(json!({ "analytics": [{ "opens": 5 }] })).unwrap();
        assert_eq!(row.nested_number_or_zero("analytics", "opens"), 5.0);
    }

    #[test]
    fn non_numeric_counts_as_missing() {
        let row = Row::new().with("growth_rate", "fast");
        assert_eq!(row.number("growth_rate"), None);
        assert_eq!(row.number_or_zero("growth_rate"), 0.0);
    }

    #[test]
    fn id_accepts_string_or_number() {
        assert_eq!(Row::new().with("id", "abc").id().as_deref(), Some("abc"));
        assert_eq!(Row::new().with("id", 7).id().as_deref(), Some("7"));
        assert_eq!(Row::new().id(), None);
    }

    #[test]
    fn timestamp_parses_rfc3339_and_dates() {
        let row = Row::new()
            .with("sent_at", "2025-07-30T06:00:00Z")
            .with("discovery_date", "2025-07-01")
            .with("bad", "yesterday");
        assert!(row.timestamp("sent_at").is_some());
        assert!(row.timestamp("discovery_date").is_some());
        assert!(row.timestamp("bad").is_none());
    }

    #[test]
    fn merge_overwrites_fields() {
        let mut row = Row::new().with("id", "n1").with("is_active", false);
        row.merge(&Row::new().with("is_active", true));
        assert_eq!(row.bool_field("is_active"), Some(true));
        assert_eq!(row.id().as_deref(), Some("n1"));
    }

    #[test]
    fn rows_from_value_skips_scalars() {
        let rows = rows_from_value(json!([{ "id": 1 }, 3, { "id": 2 }]));
        assert_eq!(rows.len(), 2);
    }
}
