//! Summary statistics over fetched row collections.
//!
//! Every function here is a pure reduction of its input: no caching and no
//! hidden state, so callers recompute whenever the collection or the active
//! filter changes. Empty input never fails; all figures fall back to 0.

use crate::row::Row;
use crate::types::{ArtistStatus, IssueStatus, SubscriberStatus};
use serde::{Deserialize, Serialize};

/// Name of the nested per-issue engagement record.
pub const ANALYTICS_FIELD: &str = "analytics";

// ---------------------------------------------------------------------------
// MetricSummary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub total_opens: u64,
    pub total_clicks: u64,
    pub total_shares: u64,
    pub total_unsubscribes: u64,
    /// `total_opens / issue_count / 100`. Not a true rate of sends; kept in
    /// the form the dashboard has always displayed.
    pub average_open_rate: f64,
    pub click_through_rate: f64,
    pub share_rate: f64,
    pub issue_count: usize,
}

impl MetricSummary {
    /// Copy with every rate rounded to one decimal place for display.
    pub fn rounded(&self) -> MetricSummary {
        MetricSummary {
            average_open_rate: round1(self.average_open_rate),
            click_through_rate: round1(self.click_through_rate),
            share_rate: round1(self.share_rate),
            ..self.clone()
        }
    }
}

pub fn total_opens(rows: &[Row]) -> u64 {
    sum_analytics(rows, "opens")
}

pub fn total_clicks(rows: &[Row]) -> u64 {
    sum_analytics(rows, "clicks")
}

pub fn total_shares(rows: &[Row]) -> u64 {
    sum_analytics(rows, "shares")
}

pub fn total_unsubscribes(rows: &[Row]) -> u64 {
    sum_analytics(rows, "unsubscribes")
}

pub fn average_open_rate(rows: &[Row]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    total_opens(rows) as f64 / rows.len() as f64 / 100.0
}

pub fn click_through_rate(rows: &[Row]) -> f64 {
    percent_of(total_clicks(rows), total_opens(rows))
}

pub fn share_rate(rows: &[Row]) -> f64 {
    percent_of(total_shares(rows), total_opens(rows))
}

pub fn summarize(rows: &[Row]) -> MetricSummary {
    let total_opens = total_opens(rows);
    let total_clicks = total_clicks(rows);
    let total_shares = total_shares(rows);
    MetricSummary {
        total_opens,
        total_clicks,
        total_shares,
        total_unsubscribes: total_unsubscribes(rows),
        average_open_rate: average_open_rate(rows),
        click_through_rate: percent_of(total_clicks, total_opens),
        share_rate: percent_of(total_shares, total_opens),
        issue_count: rows.len(),
    }
}

fn sum_analytics(rows: &[Row], field: &str) -> u64 {
    rows.iter()
        .map(|r| r.nested_number_or_zero(ANALYTICS_FIELD, field).max(0.0) as u64)
        .sum()
}

fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Status counts
// ---------------------------------------------------------------------------

/// Number of rows whose `status` field equals `status`.
pub fn count_status(rows: &[Row], status: &str) -> usize {
    rows.iter()
        .filter(|r| r.str_field("status") == Some(status))
        .count()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberStats {
    pub total: usize,
    pub active: usize,
    pub unsubscribed: usize,
    pub bounced: usize,
}

pub fn subscriber_stats(rows: &[Row]) -> SubscriberStats {
    SubscriberStats {
        total: rows.len(),
        active: count_status(rows, SubscriberStatus::Active.as_str()),
        unsubscribed: count_status(rows, SubscriberStatus::Unsubscribed.as_str()),
        bounced: count_status(rows, SubscriberStatus::Bounced.as_str()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCounts {
    pub total: usize,
    pub sent: usize,
    pub scheduled: usize,
    pub draft: usize,
}

pub fn issue_counts(rows: &[Row]) -> IssueCounts {
    IssueCounts {
        total: rows.len(),
        sent: count_status(rows, IssueStatus::Sent.as_str()),
        scheduled: count_status(rows, IssueStatus::Scheduled.as_str()),
        draft: count_status(rows, IssueStatus::Draft.as_str()),
    }
}

/// Newsletters with automation switched on (`is_active = true`).
pub fn active_count(rows: &[Row]) -> usize {
    rows.iter()
        .filter(|r| r.bool_field("is_active").unwrap_or(false))
        .count()
}

// ---------------------------------------------------------------------------
// Artist statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtistStats {
    pub total: usize,
    pub featured: usize,
    pub tracked: usize,
    /// Mean `ai_confidence`, one decimal place.
    pub average_confidence: f64,
}

pub fn artist_stats(rows: &[Row]) -> ArtistStats {
    let average_confidence = if rows.is_empty() {
        0.0
    } else {
        let sum: f64 = rows.iter().map(|r| r.number_or_zero("ai_confidence")).sum();
        round1(sum / rows.len() as f64)
    };
    ArtistStats {
        total: rows.len(),
        featured: count_status(rows, ArtistStatus::Featured.as_str()),
        tracked: count_status(rows, ArtistStatus::Tracked.as_str()),
        average_confidence,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    /// Ready to feature.
    High,
    Strong,
    /// Worth monitoring.
    Promising,
    Watch,
}

impl ConfidenceBand {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceBand::High => "high",
            ConfidenceBand::Strong => "strong",
            ConfidenceBand::Promising => "promising",
            ConfidenceBand::Watch => "watch",
        }
    }
}

pub fn confidence_band(confidence: f64) -> ConfidenceBand {
    if confidence >= 90.0 {
        ConfidenceBand::High
    } else if confidence >= 80.0 {
        ConfidenceBand::Strong
    } else if confidence >= 70.0 {
        ConfidenceBand::Promising
    } else {
        ConfidenceBand::Watch
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue(opens: u64, clicks: u64) -> Row {
        Row::from_value(json!({ "analytics": { "opens": opens, "clicks": clicks } })).unwrap()
    }

    #[test]
    fn empty_collection_is_all_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary, MetricSummary::default());
    }

    #[test]
    fn totals_and_click_through() {
        let rows = vec![issue(100, 30), issue(0, 0), issue(200, 50)];
        let summary = summarize(&rows);
        assert_eq!(summary.total_opens, 300);
        assert_eq!(summary.total_clicks, 80);
        assert_eq!(summary.issue_count, 3);
        assert!((summary.click_through_rate - 26.666).abs() < 0.01);
        assert_eq!(summary.rounded().click_through_rate, 26.7);
    }

    #[test]
    fn missing_analytics_count_as_zero() {
        let rows = vec![Row::new().with("id", "i1"), issue(40, 4)];
        assert_eq!(total_opens(&rows), 40);
        assert_eq!(total_shares(&rows), 0);
        assert_eq!(total_unsubscribes(&rows), 0);
    }

    #[test]
    fn click_through_is_zero_without_opens() {
        let rows = vec![issue(0, 25), issue(0, 10)];
        assert_eq!(click_through_rate(&rows), 0.0);
        assert_eq!(share_rate(&rows), 0.0);
    }

    #[test]
    fn average_open_rate_keeps_dashboard_formula() {
        let rows = vec![issue(1000, 0), issue(3000, 0)];
        // 4000 / 2 / 100
        assert_eq!(average_open_rate(&rows), 20.0);
    }

    #[test]
    fn share_rate_is_percent_of_opens() {
        let rows = vec![
            Row::from_value(json!({ "analytics": { "opens": 200, "shares": 10 } })).unwrap(),
        ];
        assert_eq!(share_rate(&rows), 5.0);
    }

    #[test]
    fn subscriber_stats_by_status() {
        let rows = vec![
            Row::new().with("status", "active"),
            Row::new().with("status", "active"),
            Row::new().with("status", "bounced"),
            Row::new().with("status", "unsubscribed"),
            Row::new(),
        ];
        let stats = subscriber_stats(&rows);
        assert_eq!(
            stats,
            SubscriberStats {
                total: 5,
                active: 2,
                unsubscribed: 1,
                bounced: 1
            }
        );
    }

    #[test]
    fn issue_counts_by_status() {
        let rows = vec![
            Row::new().with("status", "sent"),
            Row::new().with("status", "draft"),
            Row::new().with("status", "scheduled"),
            Row::new().with("status", "sent"),
        ];
        let counts = issue_counts(&rows);
        assert_eq!(counts.sent, 2);
        assert_eq!(counts.draft, 1);
        assert_eq!(counts.scheduled, 1);
        assert_eq!(counts.total, 4);
    }

    #[test]
    fn artist_stats_average_confidence() {
        let rows = vec![
            Row::new().with("status", "featured").with("ai_confidence", 94),
            Row::new().with("status", "tracked").with("ai_confidence", 88),
            Row::new().with("status", "tracked"),
        ];
        let stats = artist_stats(&rows);
        assert_eq!(stats.featured, 1);
        assert_eq!(stats.tracked, 2);
        assert_eq!(stats.average_confidence, 60.7);
    }

    #[test]
    fn confidence_bands() {
        assert_eq!(confidence_band(94.0), ConfidenceBand::High);
        assert_eq!(confidence_band(80.0), ConfidenceBand::Strong);
        assert_eq!(confidence_band(75.5), ConfidenceBand::Promising);
        assert_eq!(confidence_band(12.0), ConfidenceBand::Watch);
    }

    #[test]
    fn active_count_ignores_missing_flag() {
        let rows = vec![
            Row::new().with("is_active", true),
            Row::new().with("is_active", false),
            Row::new(),
        ];
        assert_eq!(active_count(&rows), 1);
    }
}
