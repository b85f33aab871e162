//! Narrowing and ordering of fetched row collections.

use crate::row::Row;
use crate::types::SortKey;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// The literal every dashboard dropdown uses for "no restriction".
pub const ALL: &str = "all";

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// A single dropdown choice. `All` (or an unset value) passes every row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Selector {
    #[default]
    All,
    Only(String),
}

impl Selector {
    pub fn only(value: impl Into<String>) -> Self {
        Selector::from(Some(value.into()))
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }

    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(wanted) => value == Some(wanted.as_str()),
        }
    }
}

impl From<Option<String>> for Selector {
    fn from(value: Option<String>) -> Self {
        match value {
            None => Selector::All,
            Some(v) if v.is_empty() || v == ALL => Selector::All,
            Some(v) => Selector::Only(v),
        }
    }
}

impl From<Selector> for Option<String> {
    fn from(selector: Selector) -> Self {
        match selector {
            Selector::All => None,
            Selector::Only(v) => Some(v),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub genre: Selector,
    #[serde(default)]
    pub status: Selector,
    /// Matches the row's `newsletter_id`.
    #[serde(default)]
    pub newsletter: Selector,
    /// Keep rows whose `time_field` is no older than this many days.
    #[serde(default)]
    pub window_days: Option<u32>,
    #[serde(default = "default_time_field")]
    pub time_field: String,
    /// Sort key name. Unknown names keep the original order.
    #[serde(default)]
    pub sort: Option<String>,
}

fn default_time_field() -> String {
    "sent_at".to_string()
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            genre: Selector::All,
            status: Selector::All,
            newsletter: Selector::All,
            window_days: None,
            time_field: default_time_field(),
            sort: None,
        }
    }
}

impl FilterCriteria {
    pub fn is_unrestricted(&self) -> bool {
        self.genre.is_all()
            && self.status.is_all()
            && self.newsletter.is_all()
            && self.window_days.is_none()
    }

    pub fn matches(&self, row: &Row, now: DateTime<Utc>) -> bool {
        if !self.genre.matches(row.str_field("genre")) {
            return false;
        }
        if !self.status.matches(row.str_field("status")) {
            return false;
        }
        if !self.newsletter.matches(row.str_field("newsletter_id")) {
            return false;
        }
        if let Some(days) = self.window_days {
            let cutoff = window_start(now, days).unwrap_or(DateTime::<Utc>::MIN_UTC);
            match row.timestamp(&self.time_field) {
                Some(ts) if ts >= cutoff => {}
                _ => return false,
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Earliest instant inside a window of `days` ending at `now`, or `None`
/// when the window reaches past the representable range (no lower bound).
pub fn window_start(now: DateTime<Utc>, days: u32) -> Option<DateTime<Utc>> {
    Duration::try_days(i64::from(days)).and_then(|d| now.checked_sub_signed(d))
}

/// Rows matching every restricted criterion, in their original order.
pub fn filter(rows: &[Row], criteria: &FilterCriteria, now: DateTime<Utc>) -> Vec<Row> {
    rows.iter()
        .filter(|r| criteria.matches(r, now))
        .cloned()
        .collect()
}

/// Stable descending sort by `key`. Unknown keys return the rows unchanged.
pub fn sort(rows: &[Row], key: &str) -> Vec<Row> {
    let mut sorted = rows.to_vec();
    if let Some(key) = SortKey::parse(key) {
        sort_by_key(&mut sorted, key);
    }
    sorted
}

pub fn sort_by_key(rows: &mut [Row], key: SortKey) {
    let field = key.field();
    match key {
        SortKey::Recent => rows.sort_by(|a, b| b.timestamp(field).cmp(&a.timestamp(field))),
        SortKey::Confidence | SortKey::Growth | SortKey::Listeners => rows.sort_by(|a, b| {
            b.number_or_zero(field)
                .partial_cmp(&a.number_or_zero(field))
                .unwrap_or(Ordering::Equal)
        }),
    }
}

/// Filter then sort, the way every list view presents its rows.
pub fn apply(rows: &[Row], criteria: &FilterCriteria, now: DateTime<Utc>) -> Vec<Row> {
    let mut out = filter(rows, criteria, now);
    if let Some(key) = criteria.sort.as_deref().and_then(SortKey::parse) {
        sort_by_key(&mut out, key);
    }
    out
}

/// Distinct values of a string field, for populating dropdowns.
pub fn distinct(rows: &[Row], field: &str) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.str_field(field))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap()
    }

    fn artist(id: &str, genre: &str, status: &str, confidence: f64) -> Row {
        Row::new()
            .with("id", id)
            .with("genre", genre)
            .with("status", status)
            .with("ai_confidence", confidence)
    }

    fn roster() -> Vec<Row> {
        vec![
            artist("a1", "Folk", "tracked", 88.0),
            artist("a2", "Electronic", "featured", 92.0),
            artist("a3", "Folk", "featured", 75.0),
            artist("a4", "Hip-Hop", "archived", 92.0),
        ]
    }

    fn ids(rows: &[Row]) -> Vec<String> {
        rows.iter().filter_map(Row::id).collect()
    }

    #[test]
    fn unrestricted_criteria_return_input_unchanged() {
        let rows = roster();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_unrestricted());
        assert_eq!(filter(&rows, &criteria, now()), rows);
    }

    #[test]
    fn genre_and_status_must_both_match() {
        let criteria = FilterCriteria {
            genre: Selector::only("Folk"),
            status: Selector::only("featured"),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&roster(), &criteria, now())), vec!["a3"]);
    }

    #[test]
    fn filter_is_idempotent() {
        let criteria = FilterCriteria {
            genre: Selector::only("Folk"),
            ..Default::default()
        };
        let once = filter(&roster(), &criteria, now());
        let twice = filter(&once, &criteria, now());
        assert_eq!(once, twice);
    }

    #[test]
    fn all_literal_deserializes_to_all() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"genre":"all","status":"sent"}"#).unwrap();
        assert!(criteria.genre.is_all());
        assert_eq!(criteria.status, Selector::only("sent"));
        assert_eq!(criteria.time_field, "sent_at");
    }

    #[test]
    fn time_window_keeps_recent_rows() {
        let rows = vec![
            Row::new().with("id", "old").with("sent_at", "2025-06-01T00:00:00Z"),
            Row::new().with("id", "new").with("sent_at", "2025-07-25T00:00:00Z"),
            Row::new().with("id", "undated"),
        ];
        let criteria = FilterCriteria {
            window_days: Some(30),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&rows, &criteria, now())), vec!["new"]);
    }

    #[test]
    fn oversized_window_has_no_lower_bound() {
        let rows = vec![
            Row::new().with("id", "ancient").with("sent_at", "1970-01-01T00:00:00Z"),
            Row::new().with("id", "undated"),
        ];
        let criteria = FilterCriteria {
            window_days: Some(u32::MAX),
            ..Default::default()
        };
        assert_eq!(window_start(now(), u32::MAX), None);
        assert_eq!(ids(&filter(&rows, &criteria, now())), vec!["ancient"]);
    }

    #[test]
    fn newsletter_selector_matches_newsletter_id() {
        let rows = vec![
            Row::new().with("id", "i1").with("newsletter_id", "pulse"),
            Row::new().with("id", "i2").with("newsletter_id", "voltage"),
        ];
        let criteria = FilterCriteria {
            newsletter: Selector::only("voltage"),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&rows, &criteria, now())), vec!["i2"]);
    }

    #[test]
    fn sort_by_confidence_is_stable() {
        let sorted = sort(&roster(), "confidence");
        // a2 and a4 tie at 92 and keep their original relative order.
        assert_eq!(ids(&sorted), vec!["a2", "a4", "a1", "a3"]);
    }

    #[test]
    fn sort_treats_missing_numbers_as_zero() {
        let rows = vec![
            Row::new().with("id", "none"),
            Row::new().with("id", "some").with("growth_rate", 12.5),
        ];
        assert_eq!(ids(&sort(&rows, "growth")), vec!["some", "none"]);
    }

    #[test]
    fn sort_recent_orders_newest_first() {
        let rows = vec![
            Row::new().with("id", "jan").with("discovery_date", "2025-01-10"),
            Row::new().with("id", "jul").with("discovery_date", "2025-07-10"),
            Row::new().with("id", "mar").with("discovery_date", "2025-03-10"),
        ];
        assert_eq!(ids(&sort(&rows, "recent")), vec!["jul", "mar", "jan"]);
    }

    #[test]
    fn unknown_sort_key_is_noop() {
        let rows = roster();
        assert_eq!(sort(&rows, "alphabetical"), rows);
    }

    #[test]
    fn apply_filters_then_sorts() {
        let criteria = FilterCriteria {
            genre: Selector::only("Folk"),
            sort: Some("confidence".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&roster(), &criteria, now())), vec!["a1", "a3"]);
    }

    #[test]
    fn distinct_genres_sorted() {
        assert_eq!(
            distinct(&roster(), "genre"),
            vec!["Electronic", "Folk", "Hip-Hop"]
        );
    }
}
