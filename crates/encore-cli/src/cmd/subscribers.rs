use crate::cmd::{loaded, open_dashboard};
use crate::output::{print_json, print_summary, print_table};
use encore_core::filter::Selector;
use encore_core::types::SubscriberStatus;
use std::path::Path;

pub fn run(root: &Path, status: Option<String>, json: bool) -> anyhow::Result<()> {
    let selector = Selector::from(status);
    if let Selector::Only(s) = &selector {
        s.parse::<SubscriberStatus>()?;
    }
    let (_, dashboard) = open_dashboard(root)?;
    let view = loaded(dashboard.subscribers())?;
    let shown: Vec<_> = view
        .subscribers
        .iter()
        .filter(|s| selector.matches(s.str_field("status")))
        .collect();

    if json {
        return print_json(&serde_json::json!({
            "subscribers": shown,
            "stats": view.stats,
        }));
    }

    let rows = shown
        .iter()
        .map(|s| {
            vec![
                s.str_field("email").unwrap_or("-").to_string(),
                s.str_field("status").unwrap_or("-").to_string(),
                s.str_field("created_at").unwrap_or("-").to_string(),
            ]
        })
        .collect();
    print_table(&["EMAIL", "STATUS", "JOINED"], rows);
    println!();
    print_summary(&[
        ("Total", view.stats.total.to_string()),
        ("Active", view.stats.active.to_string()),
        ("Unsubscribed", view.stats.unsubscribed.to_string()),
        ("Bounced", view.stats.bounced.to_string()),
    ]);
    Ok(())
}
