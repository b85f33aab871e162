use crate::cmd::{loaded, open_dashboard};
use crate::output::{print_json, print_summary, print_table};
use std::path::Path;

pub fn run(root: &Path, days: Option<u32>, json: bool) -> anyhow::Result<()> {
    let (config, dashboard) = open_dashboard(root)?;
    let days = days.unwrap_or(config.analytics.default_window_days);
    let view = loaded(dashboard.analytics(days, chrono::Utc::now()))?;
    let metrics = view.metrics.rounded();

    if json {
        return print_json(&serde_json::json!({
            "window_days": days,
            "issues": view.issues.len(),
            "metrics": metrics,
        }));
    }

    if view.issues.is_empty() {
        println!("No issues sent in the last {days} days.");
        return Ok(());
    }

    let rows = view
        .issues
        .iter()
        .map(|issue| {
            let newsletter = issue
                .nested("newsletter")
                .and_then(|n| n.get("name"))
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string();
            vec![
                issue.str_field("sent_at").unwrap_or("-").to_string(),
                newsletter,
                issue.str_field("title").unwrap_or("-").to_string(),
                issue.nested_number_or_zero("analytics", "opens").to_string(),
                issue.nested_number_or_zero("analytics", "clicks").to_string(),
            ]
        })
        .collect();
    print_table(&["SENT", "NEWSLETTER", "TITLE", "OPENS", "CLICKS"], rows);
    println!();
    print_summary(&[
        ("Window", format!("{days} days")),
        ("Opens", metrics.total_opens.to_string()),
        ("Clicks", metrics.total_clicks.to_string()),
        ("Shares", metrics.total_shares.to_string()),
        ("Unsubscribes", metrics.total_unsubscribes.to_string()),
        ("Avg open rate", format!("{}%", metrics.average_open_rate)),
        ("Click-through", format!("{}%", metrics.click_through_rate)),
        ("Share rate", format!("{}%", metrics.share_rate)),
    ]);
    Ok(())
}
