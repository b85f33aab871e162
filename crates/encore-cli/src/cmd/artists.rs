use crate::cmd::{loaded, open_dashboard};
use crate::output::{print_json, print_summary, print_table};
use encore_core::filter::{FilterCriteria, Selector};
use encore_core::metrics::confidence_band;
use encore_core::types::SortKey;
use std::path::Path;

pub fn run(
    root: &Path,
    genre: Option<String>,
    status: Option<String>,
    sort: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    // Dashboard dropdowns ignore unknown keys; on the command line a typo is
    // more likely, so reject it.
    if let Some(key) = &sort {
        key.parse::<SortKey>()?;
    }
    let criteria = FilterCriteria {
        genre: Selector::from(genre),
        status: Selector::from(status),
        sort,
        ..Default::default()
    };
    let (_, dashboard) = open_dashboard(root)?;
    let view = loaded(dashboard.artists(&criteria, chrono::Utc::now()))?;

    if json {
        return print_json(&view);
    }

    let rows = view
        .artists
        .iter()
        .map(|a| {
            let confidence = a.number_or_zero("ai_confidence");
            vec![
                a.str_field("name").unwrap_or("-").to_string(),
                a.str_field("genre").unwrap_or("-").to_string(),
                a.str_field("status").unwrap_or("-").to_string(),
                format!("{confidence:.0}"),
                confidence_band(confidence).as_str().to_string(),
                format!("{:.0}", a.number_or_zero("monthly_listeners")),
                format!("{:+.0}%", a.number_or_zero("growth_rate")),
            ]
        })
        .collect();
    print_table(
        &["ARTIST", "GENRE", "STATUS", "CONFIDENCE", "BAND", "LISTENERS", "GROWTH"],
        rows,
    );
    println!();
    print_summary(&[
        ("Tracked", view.stats.total.to_string()),
        ("Featured", view.stats.featured.to_string()),
        ("Avg confidence", format!("{:.1}", view.stats.average_confidence)),
    ]);
    Ok(())
}
