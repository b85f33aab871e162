use crate::output::{print_json, print_summary, print_table};
use encore_core::catalog::{dashboard_stats, GENRES};

pub fn run(json: bool) -> anyhow::Result<()> {
    let stats = dashboard_stats(&GENRES);
    if json {
        return print_json(&serde_json::json!({
            "genres": &GENRES[..],
            "stats": stats,
        }));
    }

    let rows = GENRES
        .iter()
        .map(|g| {
            vec![
                format!("{} {}", g.emoji, g.name),
                g.label.to_string(),
                format!("{} {}", g.day, g.time),
                g.subscribers.to_string(),
                format!("{:.1}%", g.engagement),
                format!("+{:.1}%", g.growth),
                if g.demo_available { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    print_table(
        &["NEWSLETTER", "GENRE", "SCHEDULE", "SUBSCRIBERS", "ENGAGEMENT", "GROWTH", "DEMO"],
        rows,
    );
    println!();
    print_summary(&[
        ("Total subscribers", stats.total_subscribers.to_string()),
        ("Weekly growth", format!("{:.1}%", stats.weekly_growth)),
        ("Avg engagement", format!("{:.1}%", stats.average_engagement)),
        ("Revenue", format!("${}", stats.total_revenue)),
        ("AI confidence", format!("{:.1}%", stats.ai_confidence)),
    ]);
    Ok(())
}
