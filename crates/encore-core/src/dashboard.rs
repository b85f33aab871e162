//! Dashboard views over the row store.
//!
//! Each view fetches, joins and reduces rows for one dashboard section.
//! A failed fetch never blanks a view: the last successfully loaded data is
//! returned alongside the error message.

use crate::error::{EncoreError, Result};
use crate::filter::{self, FilterCriteria};
use crate::metrics::{self, ArtistStats, IssueCounts, MetricSummary, SubscriberStats};
use crate::row::Row;
use crate::store::{Query, RowStore, ANALYTICS, ARTISTS, ISSUES, NEWSLETTERS, SUBSCRIBERS};
use crate::types::{IssueStatus, SortKey, SubscriberStatus};
use crate::validation::{self, FieldErrors, NewsletterForm};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// Loaded / LastGood
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Loaded<T> {
    pub data: T,
    /// Set when the latest refresh failed; `data` is then the previous result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Loaded<T> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Last successful result of a view, tagged with the arguments (`K`) that
/// produced it. A failed refresh only falls back to data loaded for the
/// same arguments.
#[derive(Debug, Default)]
struct LastGood<T, K = ()> {
    slot: Mutex<Option<(K, T)>>,
}

impl<T: Clone + Default> LastGood<T> {
    fn refresh(&self, view: &str, fetch: impl FnOnce() -> Result<T>) -> Loaded<T> {
        self.refresh_for(view, &(), fetch)
    }
}

impl<T: Clone + Default, K: Clone + PartialEq> LastGood<T, K> {
    fn refresh_for(&self, view: &str, key: &K, fetch: impl FnOnce() -> Result<T>) -> Loaded<T> {
        let mut slot = self.slot.lock().unwrap_or_else(|p| p.into_inner());
        match fetch() {
            Ok(value) => {
                *slot = Some((key.clone(), value.clone()));
                Loaded {
                    data: value,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(view, "refresh failed, keeping previous data: {e}");
                let data = match slot.as_ref() {
                    Some((k, value)) if k == key => value.clone(),
                    _ => T::default(),
                };
                Loaded {
                    data,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Apply a local change to every cached value, whatever arguments loaded it.
    fn update(&self, f: impl FnOnce(&mut T)) {
        let mut slot = self.slot.lock().unwrap_or_else(|p| p.into_inner());
        if let Some((_, value)) = slot.as_mut() {
            f(value);
        }
    }
}

// ---------------------------------------------------------------------------
// View payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct IssuesView {
    pub issues: Vec<Row>,
    pub newsletters: Vec<Row>,
    /// Counts over every issue, not just the filtered ones.
    pub counts: IssueCounts,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SubscribersView {
    pub subscribers: Vec<Row>,
    pub stats: SubscriberStats,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalyticsView {
    pub window_days: u32,
    pub newsletters: Vec<Row>,
    pub issues: Vec<Row>,
    pub metrics: MetricSummary,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ArtistsView {
    pub artists: Vec<Row>,
    pub genres: Vec<String>,
    /// Over the whole roster, not just the filtered artists.
    pub stats: ArtistStats,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AutomationView {
    pub newsletters: Vec<Row>,
    pub active: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminOverview {
    pub newsletters: usize,
    pub active_newsletters: usize,
    pub subscribers: usize,
    pub active_subscribers: usize,
    pub issues: usize,
    pub sent_issues: usize,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub struct Dashboard {
    store: Arc<dyn RowStore>,
    newsletters: LastGood<Vec<Row>>,
    issues: LastGood<IssuesView, FilterCriteria>,
    subscribers: LastGood<SubscribersView>,
    analytics: LastGood<AnalyticsView, u32>,
    artists: LastGood<ArtistsView, FilterCriteria>,
    overview: LastGood<AdminOverview>,
}

impl Dashboard {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            store,
            newsletters: LastGood::default(),
            issues: LastGood::default(),
            subscribers: LastGood::default(),
            analytics: LastGood::default(),
            artists: LastGood::default(),
            overview: LastGood::default(),
        }
    }

    pub fn store(&self) -> &Arc<dyn RowStore> {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Newsletters
    // -----------------------------------------------------------------------

    pub fn newsletters(&self) -> Loaded<Vec<Row>> {
        self.newsletters
            .refresh("newsletters", || self.fetch_newsletters())
    }

    fn fetch_newsletters(&self) -> Result<Vec<Row>> {
        self.store.query(&Query::from(NEWSLETTERS).order("name", true))
    }

    pub fn create_newsletter(&self, form: &NewsletterForm) -> Result<Row> {
        let clean = form.sanitized();
        clean.validate().into_result()?;
        let mut row = Row::new()
            .with("name", clean.name)
            .with("slug", clean.slug)
            .with("is_active", clean.is_active);
        for (field, value) in [
            ("genre", clean.genre),
            ("emoji", clean.emoji),
            ("schedule_day", clean.schedule_day),
            ("schedule_time", clean.schedule_time),
        ] {
            if let Some(v) = value {
                row.set(field, v);
            }
        }
        let created = self.store.insert(NEWSLETTERS, row)?;
        tracing::info!(id = ?created.id(), "newsletter created");
        self.newsletters.update(|list| list.push(created.clone()));
        Ok(created)
    }

    pub fn update_newsletter(&self, id: &str, changes: &Row) -> Result<Row> {
        let updated = self.store.update(NEWSLETTERS, id, changes)?;
        self.newsletters.update(|list| replace_by_id(list, id, &updated));
        Ok(updated)
    }

    pub fn delete_newsletter(&self, id: &str) -> Result<()> {
        self.store.delete(NEWSLETTERS, id)?;
        self.newsletters
            .update(|list| list.retain(|n| n.id().as_deref() != Some(id)));
        tracing::info!(id, "newsletter deleted");
        Ok(())
    }

    pub fn automation(&self) -> Loaded<AutomationView> {
        let loaded = self.newsletters();
        Loaded {
            data: AutomationView {
                active: metrics::active_count(&loaded.data),
                newsletters: loaded.data,
            },
            error: loaded.error,
        }
    }

    /// Flip `is_active` on a newsletter, returning the stored row.
    pub fn toggle_automation(&self, id: &str) -> Result<Row> {
        let current = self
            .store
            .find_one(&Query::from(NEWSLETTERS).eq("id", id))?
            .ok_or_else(|| EncoreError::RowNotFound {
                collection: NEWSLETTERS.to_string(),
                id: id.to_string(),
            })?;
        let active = current.bool_field("is_active").unwrap_or(false);
        let updated = self.update_newsletter(id, &Row::new().with("is_active", !active))?;
        tracing::info!(id, active = !active, "automation toggled");
        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Issues
    // -----------------------------------------------------------------------

    /// Issues newest first, joined with their newsletter, narrowed by the
    /// newsletter and status selectors in `criteria`.
    pub fn issues(&self, criteria: &FilterCriteria, now: DateTime<Utc>) -> Loaded<IssuesView> {
        self.issues.refresh_for("issues", criteria, || {
            let newsletters = self.fetch_newsletters()?;
            let all = self
                .store
                .query(&Query::from(ISSUES).order("created_at", false))?;
            let all = join_newsletter(all, &newsletters);
            Ok(IssuesView {
                counts: metrics::issue_counts(&all),
                issues: filter::filter(&all, criteria, now),
                newsletters,
            })
        })
    }

    // -----------------------------------------------------------------------
    // Subscribers
    // -----------------------------------------------------------------------

    pub fn subscribers(&self) -> Loaded<SubscribersView> {
        self.subscribers.refresh("subscribers", || {
            let rows = self
                .store
                .query(&Query::from(SUBSCRIBERS).order("created_at", false))?;
            Ok(SubscribersView {
                stats: metrics::subscriber_stats(&rows),
                subscribers: rows,
            })
        })
    }

    pub fn create_subscriber(&self, email: &str) -> Result<Row> {
        let email = validation::sanitize_input(email);
        let mut errors = FieldErrors::new();
        errors.check("email", validation::validate_email(&email));
        errors.into_result()?;

        let created = self.store.insert(
            SUBSCRIBERS,
            Row::new()
                .with("email", email)
                .with("status", SubscriberStatus::Active.as_str()),
        )?;
        self.subscribers.update(|view| {
            view.subscribers.insert(0, created.clone());
            view.stats = metrics::subscriber_stats(&view.subscribers);
        });
        Ok(created)
    }

    pub fn update_subscriber_status(&self, id: &str, status: SubscriberStatus) -> Result<Row> {
        let updated = self.store.update(
            SUBSCRIBERS,
            id,
            &Row::new().with("status", status.as_str()),
        )?;
        self.subscribers.update(|view| {
            replace_by_id(&mut view.subscribers, id, &updated);
            view.stats = metrics::subscriber_stats(&view.subscribers);
        });
        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Analytics
    // -----------------------------------------------------------------------

    /// Sent issues from the last `window_days`, newest first, with their
    /// engagement record attached and reduced to a metric summary.
    pub fn analytics(&self, window_days: u32, now: DateTime<Utc>) -> Loaded<AnalyticsView> {
        self.analytics.refresh_for("analytics", &window_days, || {
            let newsletters = self.fetch_newsletters()?;
            let mut query = Query::from(ISSUES)
                .eq("status", IssueStatus::Sent.as_str())
                .order("sent_at", false);
            if let Some(cutoff) = filter::window_start(now, window_days) {
                query = query.gte("sent_at", cutoff.to_rfc3339());
            }
            let issues = self.store.query(&query)?;
            let engagement = self.store.query(&Query::from(ANALYTICS))?;
            let issues = join_analytics(join_newsletter(issues, &newsletters), &engagement);
            Ok(AnalyticsView {
                window_days,
                metrics: metrics::summarize(&issues),
                newsletters,
                issues,
            })
        })
    }

    // -----------------------------------------------------------------------
    // Artists
    // -----------------------------------------------------------------------

    /// Artist roster narrowed by genre and status and ordered by the
    /// criteria's sort key (confidence when unset).
    pub fn artists(&self, criteria: &FilterCriteria, now: DateTime<Utc>) -> Loaded<ArtistsView> {
        self.artists.refresh_for("artists", criteria, || {
            let roster = self.store.query(
                &Query::from(ARTISTS).order(SortKey::Confidence.field(), false),
            )?;
            let mut criteria = criteria.clone();
            if criteria.sort.is_none() {
                criteria.sort = Some(SortKey::Confidence.as_str().to_string());
            }
            Ok(ArtistsView {
                artists: filter::apply(&roster, &criteria, now),
                genres: filter::distinct(&roster, "genre"),
                stats: metrics::artist_stats(&roster),
            })
        })
    }

    // -----------------------------------------------------------------------
    // Admin
    // -----------------------------------------------------------------------

    pub fn overview(&self) -> Loaded<AdminOverview> {
        self.overview.refresh("overview", || {
            let newsletters = self.store.query(&Query::from(NEWSLETTERS))?;
            let subscribers = self.store.query(&Query::from(SUBSCRIBERS))?;
            let issues = self.store.query(&Query::from(ISSUES))?;
            Ok(AdminOverview {
                newsletters: newsletters.len(),
                active_newsletters: metrics::active_count(&newsletters),
                subscribers: subscribers.len(),
                active_subscribers: metrics::count_status(
                    &subscribers,
                    SubscriberStatus::Active.as_str(),
                ),
                issues: issues.len(),
                sent_issues: metrics::count_status(&issues, IssueStatus::Sent.as_str()),
            })
        })
    }
}

// ---------------------------------------------------------------------------
// Joins
// ---------------------------------------------------------------------------

fn replace_by_id(rows: &mut [Row], id: &str, updated: &Row) {
    if let Some(slot) = rows.iter_mut().find(|r| r.id().as_deref() == Some(id)) {
        *slot = updated.clone();
    }
}

/// Attach `{name, emoji, color}` of each issue's newsletter as `newsletter`.
pub fn join_newsletter(issues: Vec<Row>, newsletters: &[Row]) -> Vec<Row> {
    let by_id: HashMap<String, &Row> = newsletters
        .iter()
        .filter_map(|n| n.id().map(|id| (id, n)))
        .collect();
    issues
        .into_iter()
        .map(|mut issue| {
            let parent = issue
                .str_field("newsletter_id")
                .and_then(|id| by_id.get(id).copied());
            if let Some(parent) = parent {
                let mut summary = Map::new();
                for field in ["name", "emoji", "color"] {
                    if let Some(v) = parent.get(field) {
                        summary.insert(field.to_string(), v.clone());
                    }
                }
                issue.set("newsletter", Value::Object(summary));
            }
            issue
        })
        .collect()
}

/// Attach each issue's engagement record as `analytics` unless the row
/// already carries one.
pub fn join_analytics(issues: Vec<Row>, engagement: &[Row]) -> Vec<Row> {
    let by_issue: HashMap<&str, &Row> = engagement
        .iter()
        .filter_map(|a| a.str_field("issue_id").map(|id| (id, a)))
        .collect();
    issues
        .into_iter()
        .map(|mut issue| {
            if issue.nested(metrics::ANALYTICS_FIELD).is_none() {
                let record = issue.id().and_then(|id| by_issue.get(id.as_str()).copied());
                if let Some(record) = record {
                    let mut counts = Map::new();
                    for field in ["opens", "clicks", "shares", "unsubscribes"] {
                        if let Some(v) = record.get(field) {
                            counts.insert(field.to_string(), v.clone());
                        }
                    }
                    issue.set(metrics::ANALYTICS_FIELD, Value::Object(counts));
                }
            }
            issue
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Selector;
    use crate::store::MemoryRowStore;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap()
    }

    fn seed() -> Value {
        json!({
            "newsletters": [
                { "id": "storyteller", "name": "STORYTELLER", "emoji": "🎸", "is_active": true },
                { "id": "pulse", "name": "PULSE", "emoji": "🎤", "is_active": false }
            ],
            "newsletter_issues": [
                { "id": "i1", "newsletter_id": "storyteller", "status": "sent",
                  "sent_at": "2025-07-30T18:00:00Z", "created_at": "2025-07-29T00:00:00Z" },
                { "id": "i2", "newsletter_id": "pulse", "status": "sent",
                  "sent_at": "2025-07-20T06:00:00Z", "created_at": "2025-07-19T00:00:00Z",
                  "analytics": { "opens": 200, "clicks": 50 } },
                { "id": "i3", "newsletter_id": "pulse", "status": "sent",
                  "sent_at": "2025-05-01T06:00:00Z", "created_at": "2025-04-30T00:00:00Z" },
                { "id": "i4", "newsletter_id": "storyteller", "status": "draft",
                  "created_at": "2025-07-31T00:00:00Z" }
            ],
            "newsletter_analytics": [
                { "issue_id": "i1", "opens": 100, "clicks": 30, "shares": 5 },
                { "issue_id": "i3", "opens": 999, "clicks": 999 }
            ],
            "subscribers": [
                { "id": "s1", "email": "a@x.io", "status": "active", "created_at": "2025-07-01T00:00:00Z" },
                { "id": "s2", "email": "b@x.io", "status": "bounced", "created_at": "2025-07-02T00:00:00Z" }
            ],
            "artists": [
                { "id": "a1", "name": "River Collins", "genre": "Folk", "status": "tracked", "ai_confidence": 88 },
                { "id": "a2", "name": "Maya Stern", "genre": "Folk", "status": "featured", "ai_confidence": 92 },
                { "id": "a3", "name": "Crystal Synth", "genre": "Electronic", "status": "tracked", "ai_confidence": 81, "growth_rate": 40 }
            ]
        })
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(Arc::new(MemoryRowStore::from_seed(seed()).unwrap()))
    }

    /// Delegates to an inner store until `fail` is set.
    struct Flaky {
        inner: MemoryRowStore,
        fail: AtomicBool,
    }

    impl RowStore for Flaky {
        fn query(&self, query: &Query) -> Result<Vec<Row>> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(EncoreError::Store("connection reset".to_string()));
            }
            self.inner.query(query)
        }
        fn insert(&self, collection: &str, row: Row) -> Result<Row> {
            self.inner.insert(collection, row)
        }
        fn update(&self, collection: &str, id: &str, changes: &Row) -> Result<Row> {
            self.inner.update(collection, id, changes)
        }
        fn delete(&self, collection: &str, id: &str) -> Result<()> {
            self.inner.delete(collection, id)
        }
    }

    #[test]
    fn analytics_window_joins_engagement() {
        let view = dashboard().analytics(30, now());
        assert!(view.is_ok());
        let ids: Vec<_> = view.data.issues.iter().filter_map(Row::id).collect();
        assert_eq!(ids, vec!["i1", "i2"]);
        assert_eq!(view.data.metrics.total_opens, 300);
        assert_eq!(view.data.metrics.total_clicks, 80);
        assert_eq!(view.data.metrics.rounded().click_through_rate, 26.7);
        assert_eq!(
            view.data.issues[0].nested("newsletter").unwrap()["name"],
            json!("STORYTELLER")
        );
    }

    #[test]
    fn analytics_oversized_window_covers_every_sent_issue() {
        let view = dashboard().analytics(u32::MAX, now());
        assert!(view.is_ok());
        let ids: Vec<_> = view.data.issues.iter().filter_map(Row::id).collect();
        assert_eq!(ids, vec!["i1", "i2", "i3"]);
        assert_eq!(view.data.window_days, u32::MAX);
    }

    #[test]
    fn issues_filter_keeps_total_counts() {
        let criteria = FilterCriteria {
            newsletter: Selector::only("pulse"),
            ..Default::default()
        };
        let view = dashboard().issues(&criteria, now());
        let ids: Vec<_> = view.data.issues.iter().filter_map(Row::id).collect();
        assert_eq!(ids, vec!["i2", "i3"]);
        assert_eq!(view.data.counts.total, 4);
        assert_eq!(view.data.counts.draft, 1);
    }

    #[test]
    fn artists_default_to_confidence_order() {
        let view = dashboard().artists(&FilterCriteria::default(), now());
        let ids: Vec<_> = view.data.artists.iter().filter_map(Row::id).collect();
        assert_eq!(ids, vec!["a2", "a1", "a3"]);
        assert_eq!(view.data.genres, vec!["Electronic", "Folk"]);
        assert_eq!(view.data.stats.featured, 1);
    }

    #[test]
    fn artists_growth_sort_with_genre_filter() {
        let criteria = FilterCriteria {
            status: Selector::only("tracked"),
            sort: Some("growth".to_string()),
            ..Default::default()
        };
        let view = dashboard().artists(&criteria, now());
        let ids: Vec<_> = view.data.artists.iter().filter_map(Row::id).collect();
        assert_eq!(ids, vec!["a3", "a1"]);
        assert_eq!(view.data.stats.total, 3);
    }

    #[test]
    fn create_subscriber_validates_and_prepends() {
        let dash = dashboard();
        dash.subscribers();
        let err = dash.create_subscriber("not-an-email").unwrap_err();
        assert!(matches!(err, EncoreError::Validation(_)));

        let created = dash.create_subscriber(" fan@example.com ").unwrap();
        assert_eq!(created.str_field("status"), Some("active"));
        assert_eq!(created.str_field("email"), Some("fan@example.com"));

        let view = dash.subscribers();
        assert_eq!(view.data.stats.total, 3);
        assert_eq!(view.data.stats.active, 2);
    }

    #[test]
    fn subscriber_status_update() {
        let dash = dashboard();
        let row = dash
            .update_subscriber_status("s2", SubscriberStatus::Unsubscribed)
            .unwrap();
        assert_eq!(row.str_field("status"), Some("unsubscribed"));
        assert_eq!(dash.subscribers().data.stats.unsubscribed, 1);
    }

    #[test]
    fn toggle_automation_flips_flag() {
        let dash = dashboard();
        assert_eq!(dash.automation().data.active, 1);
        let row = dash.toggle_automation("pulse").unwrap();
        assert_eq!(row.bool_field("is_active"), Some(true));
        assert_eq!(dash.automation().data.active, 2);
        assert!(matches!(
            dash.toggle_automation("missing").unwrap_err(),
            EncoreError::RowNotFound { .. }
        ));
    }

    #[test]
    fn newsletter_crud() {
        let dash = dashboard();
        let form = NewsletterForm {
            name: "Resonance".to_string(),
            slug: "resonance".to_string(),
            emoji: Some("✨".to_string()),
            ..Default::default()
        };
        let created = dash.create_newsletter(&form).unwrap();
        let id = created.id().unwrap();
        let names: Vec<_> = dash
            .newsletters()
            .data
            .iter()
            .filter_map(|n| n.str_field("name").map(str::to_string))
            .collect();
        assert_eq!(names, vec!["PULSE", "Resonance", "STORYTELLER"]);

        dash.update_newsletter(&id, &Row::new().with("name", "RESONANCE"))
            .unwrap();
        dash.delete_newsletter(&id).unwrap();
        assert_eq!(dash.newsletters().data.len(), 2);

        let bad = NewsletterForm {
            name: "x".to_string(),
            slug: "Bad Slug".to_string(),
            ..Default::default()
        };
        match dash.create_newsletter(&bad).unwrap_err() {
            EncoreError::Validation(fields) => assert_eq!(fields.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn newsletter_name_is_checked_after_sanitizing() {
        let dash = dashboard();
        let form = NewsletterForm {
            name: "  <a>  ".to_string(),
            slug: "ok".to_string(),
            ..Default::default()
        };
        match dash.create_newsletter(&form).unwrap_err() {
            EncoreError::Validation(fields) => assert_eq!(fields.len(), 1),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(dash.newsletters().data.len(), 2);
    }

    #[test]
    fn overview_counts() {
        let overview = dashboard().overview().data;
        assert_eq!(
            overview,
            AdminOverview {
                newsletters: 2,
                active_newsletters: 1,
                subscribers: 2,
                active_subscribers: 1,
                issues: 4,
                sent_issues: 3,
            }
        );
    }

    #[test]
    fn failed_refresh_keeps_last_good_data() {
        let flaky = Arc::new(Flaky {
            inner: MemoryRowStore::from_seed(seed()).unwrap(),
            fail: AtomicBool::new(false),
        });
        let dash = Dashboard::new(flaky.clone());

        let first = dash.subscribers();
        assert!(first.is_ok());
        assert_eq!(first.data.stats.total, 2);

        flaky.fail.store(true, Ordering::SeqCst);
        let second = dash.subscribers();
        assert_eq!(second.error.as_deref(), Some("row store error: connection reset"));
        assert_eq!(second.data.stats.total, 2);
    }

    #[test]
    fn failed_refresh_only_reuses_data_for_same_arguments() {
        let flaky = Arc::new(Flaky {
            inner: MemoryRowStore::from_seed(seed()).unwrap(),
            fail: AtomicBool::new(false),
        });
        let dash = Dashboard::new(flaky.clone());
        assert_eq!(dash.analytics(30, now()).data.issues.len(), 2);
        let folk = FilterCriteria {
            genre: Selector::only("Folk"),
            ..Default::default()
        };
        assert_eq!(dash.artists(&folk, now()).data.artists.len(), 2);

        flaky.fail.store(true, Ordering::SeqCst);

        let same = dash.analytics(30, now());
        assert!(!same.is_ok());
        assert_eq!(same.data.issues.len(), 2);

        let other = dash.analytics(7, now());
        assert!(!other.is_ok());
        assert!(other.data.issues.is_empty());

        let all = dash.artists(&FilterCriteria::default(), now());
        assert!(!all.is_ok());
        assert!(all.data.artists.is_empty());
        assert_eq!(dash.artists(&folk, now()).data.artists.len(), 2);
    }

    #[test]
    fn failure_before_any_load_is_empty_but_flagged() {
        let flaky = Arc::new(Flaky {
            inner: MemoryRowStore::new(),
            fail: AtomicBool::new(true),
        });
        let dash = Dashboard::new(flaky);
        let view = dash.overview();
        assert!(!view.is_ok());
        assert_eq!(view.data, AdminOverview::default());
    }
}
