//! Row-store interface and an in-memory implementation.
//!
//! The hosted backend exposes named collections with equality / range
//! filters and a single ordering. [`RowStore`] is the narrow slice of that
//! API the dashboard uses; [`MemoryRowStore`] implements it over a seed file
//! for local runs and tests.

use crate::error::{EncoreError, Result};
use crate::row::{parse_timestamp, rows_from_value, Row};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::RwLock;

pub const NEWSLETTERS: &str = "newsletters";
pub const ISSUES: &str = "newsletter_issues";
pub const ANALYTICS: &str = "newsletter_analytics";
pub const SUBSCRIBERS: &str = "subscribers";
pub const ARTISTS: &str = "artists";
pub const PROFILES: &str = "user_profiles";
pub const SUBSCRIPTIONS: &str = "user_subscriptions";

pub const COLLECTIONS: &[&str] = &[
    NEWSLETTERS,
    ISSUES,
    ANALYTICS,
    SUBSCRIBERS,
    ARTISTS,
    PROFILES,
    SUBSCRIPTIONS,
];

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Eq,
    Gte,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn matches(&self, row: &Row) -> bool {
        let Some(actual) = row.get(&self.field) else {
            return false;
        };
        match self.op {
            FilterOp::Eq => actual == &self.value,
            FilterOp::Gte => compare_values(actual, &self.value) != Ordering::Less,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub field: String,
    pub ascending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub collection: String,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub order: Option<Order>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Query {
    pub fn from(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op: FilterOp::Eq,
            value: value.into(),
        });
        self
    }

    pub fn gte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op: FilterOp::Gte,
            value: value.into(),
        });
        self
    }

    pub fn order(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            field: field.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Apply filters, ordering and limit to an in-memory collection.
    /// Ordering is stable; rows missing the order field sort first
    /// ascending and last descending.
    pub fn run(&self, rows: &[Row]) -> Vec<Row> {
        let mut out: Vec<Row> = rows
            .iter()
            .filter(|r| self.filters.iter().all(|f| f.matches(r)))
            .cloned()
            .collect();
        if let Some(order) = &self.order {
            out.sort_by(|a, b| {
                let ord = compare_opt(a.get(&order.field), b.get(&order.field));
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }
        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}

fn compare_opt(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_values(a, b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Numbers compare numerically, timestamp strings chronologically, other
/// strings lexically. Mixed kinds order null < bool < number < string.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => match (parse_timestamp(x), parse_timestamp(y)) {
            (Some(tx), Some(ty)) => tx.cmp(&ty),
            _ => x.cmp(y),
        },
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

// ---------------------------------------------------------------------------
// RowStore
// ---------------------------------------------------------------------------

pub trait RowStore: Send + Sync {
    fn query(&self, query: &Query) -> Result<Vec<Row>>;

    /// Insert `row`, returning it as stored (with any generated fields).
    fn insert(&self, collection: &str, row: Row) -> Result<Row>;

    /// Merge `changes` into the row with `id`, returning the updated row.
    fn update(&self, collection: &str, id: &str, changes: &Row) -> Result<Row>;

    fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// First row matching `query`, if any.
    fn find_one(&self, query: &Query) -> Result<Option<Row>> {
        let q = query.clone().limit(1);
        Ok(self.query(&q)?.into_iter().next())
    }
}

// ---------------------------------------------------------------------------
// MemoryRowStore
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct MemoryRowStore {
    collections: RwLock<BTreeMap<String, Vec<Row>>>,
}

impl Default for MemoryRowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRowStore {
    /// Empty store with every standard collection present.
    pub fn new() -> Self {
        let collections = COLLECTIONS
            .iter()
            .map(|c| (c.to_string(), Vec::new()))
            .collect();
        Self {
            collections: RwLock::new(collections),
        }
    }

    /// Build from a mapping of collection name to an array of rows. Unknown
    /// collection names are added alongside the standard ones.
    pub fn from_seed(seed: Value) -> Result<Self> {
        let store = Self::new();
        let Value::Object(map) = seed else {
            return Err(EncoreError::Store(
                "seed must be a mapping of collection name to rows".to_string(),
            ));
        };
        {
            let mut collections = store.write()?;
            for (name, rows) in map {
                collections.insert(name, rows_from_value(rows));
            }
        }
        Ok(store)
    }

    /// Load a YAML or JSON seed file.
    pub fn load_seed(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let seed: Value = serde_yaml::from_str(&data)?;
        let store = Self::from_seed(seed)?;
        tracing::debug!(path = %path.display(), "loaded row store seed");
        Ok(store)
    }

    pub fn len(&self, collection: &str) -> usize {
        self.read()
            .map(|c| c.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<String, Vec<Row>>>> {
        self.collections
            .read()
            .map_err(|_| EncoreError::Store("row store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<String, Vec<Row>>>> {
        self.collections
            .write()
            .map_err(|_| EncoreError::Store("row store lock poisoned".to_string()))
    }
}

impl RowStore for MemoryRowStore {
    fn query(&self, query: &Query) -> Result<Vec<Row>> {
        let collections = self.read()?;
        let rows = collections
            .get(&query.collection)
            .ok_or_else(|| EncoreError::CollectionNotFound(query.collection.clone()))?;
        Ok(query.run(rows))
    }

    fn insert(&self, collection: &str, mut row: Row) -> Result<Row> {
        let mut collections = self.write()?;
        let rows = collections
            .get_mut(collection)
            .ok_or_else(|| EncoreError::CollectionNotFound(collection.to_string()))?;

        let id = match row.id() {
            Some(id) => id,
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                row.set("id", id.clone());
                id
            }
        };
        if rows.iter().any(|r| r.id().as_deref() == Some(id.as_str())) {
            return Err(EncoreError::RowExists {
                collection: collection.to_string(),
                id,
            });
        }
        if row.get("created_at").is_none() {
            row.set("created_at", Utc::now().to_rfc3339());
        }
        rows.push(row.clone());
        Ok(row)
    }

    fn update(&self, collection: &str, id: &str, changes: &Row) -> Result<Row> {
        let mut collections = self.write()?;
        let rows = collections
            .get_mut(collection)
            .ok_or_else(|| EncoreError::CollectionNotFound(collection.to_string()))?;
        let row = rows
            .iter_mut()
            .find(|r| r.id().as_deref() == Some(id))
            .ok_or_else(|| EncoreError::RowNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        let mut changes = changes.clone();
        changes.remove("id");
        row.merge(&changes);
        Ok(row.clone())
    }

    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let mut collections = self.write()?;
        let rows = collections
            .get_mut(collection)
            .ok_or_else(|| EncoreError::CollectionNotFound(collection.to_string()))?;
        let before = rows.len();
        rows.retain(|r| r.id().as_deref() != Some(id));
        if rows.len() == before {
            return Err(EncoreError::RowNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn seeded() -> MemoryRowStore {
        MemoryRowStore::from_seed(json!({
            "newsletters": [
                { "id": "voltage", "name": "VOLTAGE", "is_active": true },
                { "id": "pulse", "name": "PULSE", "is_active": false },
                { "id": "storyteller", "name": "STORYTELLER", "is_active": true }
            ],
            "newsletter_issues": [
                { "id": "i1", "status": "sent", "sent_at": "2025-07-01T06:00:00Z" },
                { "id": "i2", "status": "draft" },
                { "id": "i3", "status": "sent", "sent_at": "2025-07-29T06:00:00Z" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn query_orders_by_name() {
        let store = seeded();
        let rows = store
            .query(&Query::from(NEWSLETTERS).order("name", true))
            .unwrap();
        let names: Vec<_> = rows.iter().filter_map(|r| r.str_field("name")).collect();
        assert_eq!(names, vec!["PULSE", "STORYTELLER", "VOLTAGE"]);
    }

    #[test]
    fn query_filters_eq_and_gte() {
        let store = seeded();
        let rows = store
            .query(
                &Query::from(ISSUES)
                    .eq("status", "sent")
                    .gte("sent_at", "2025-07-15T00:00:00Z")
                    .order("sent_at", false),
            )
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id().as_deref(), Some("i3"));
    }

    #[test]
    fn unknown_collection_is_an_error() {
        let store = MemoryRowStore::new();
        let err = store.query(&Query::from("playlists")).unwrap_err();
        assert!(matches!(err, EncoreError::CollectionNotFound(_)));
    }

    #[test]
    fn insert_generates_id_and_created_at() {
        let store = MemoryRowStore::new();
        let row = store
            .insert(SUBSCRIBERS, Row::new().with("email", "fan@example.com"))
            .unwrap();
        assert!(row.id().is_some());
        assert!(row.timestamp("created_at").is_some());
        assert_eq!(store.len(SUBSCRIBERS), 1);
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let store = seeded();
        let err = store
            .insert(NEWSLETTERS, Row::new().with("id", "pulse"))
            .unwrap_err();
        assert!(matches!(err, EncoreError::RowExists { .. }));
    }

    #[test]
    fn update_merges_without_changing_id() {
        let store = seeded();
        let row = store
            .update(
                NEWSLETTERS,
                "pulse",
                &Row::new().with("is_active", true).with("id", "hijack"),
            )
            .unwrap();
        assert_eq!(row.id().as_deref(), Some("pulse"));
        assert_eq!(row.bool_field("is_active"), Some(true));
    }

    #[test]
    fn delete_missing_row_is_not_found() {
        let store = seeded();
        store.delete(NEWSLETTERS, "pulse").unwrap();
        let err = store.delete(NEWSLETTERS, "pulse").unwrap_err();
        assert!(matches!(err, EncoreError::RowNotFound { .. }));
    }

    #[test]
    fn find_one_returns_first_match() {
        let store = seeded();
        let row = store
            .find_one(&Query::from(NEWSLETTERS).eq("is_active", true))
            .unwrap()
            .unwrap();
        assert_eq!(row.id().as_deref(), Some("voltage"));
    }

    #[test]
    fn load_seed_keeps_extra_collections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seed.yaml");
        std::fs::write(
            &path,
            "newsletters:\n  - id: pulse\n    name: PULSE\nsubscription_plans:\n  - id: premium\n    price: 9\n",
        )
        .unwrap();
        let loaded = MemoryRowStore::load_seed(&path).unwrap();
        assert_eq!(loaded.len(NEWSLETTERS), 1);
        assert_eq!(loaded.len(ISSUES), 0);
        assert_eq!(loaded.len("subscription_plans"), 1);
    }

    #[test]
    fn seed_must_be_mapping() {
        assert!(MemoryRowStore::from_seed(json!([1, 2])).is_err());
    }
}
