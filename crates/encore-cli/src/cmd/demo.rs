use crate::output::print_json;
use anyhow::Context;
use encore_core::catalog::{storyteller_issue, SampleIssue};
use encore_core::config::Config;
use encore_core::demo::{DemoSequencer, DemoSnapshot, RunOutcome};
use encore_core::types::DemoPhase;
use std::path::Path;

pub fn run(root: &Path, speed: Option<f64>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let speed = speed.unwrap_or(config.demo.speed);
    if !(speed.is_finite() && speed > 0.0) {
        anyhow::bail!("speed must be > 0 (got {speed})");
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let demo = DemoSequencer::storyteller_scaled(speed);
        let mut rx = demo.subscribe();
        let handle = demo
            .start()
            .context("demo sequencer is not idle")?;

        let printer = tokio::spawn(async move {
            let mut seen = Vec::new();
            while rx.changed().await.is_ok() {
                let snapshot = rx.borrow_and_update().clone();
                if !json {
                    print_step(&snapshot);
                }
                let done = snapshot.phase == DemoPhase::Complete;
                seen.push(snapshot);
                if done {
                    break;
                }
            }
            seen
        });

        let outcome = tokio::select! {
            res = handle => res.context("demo task failed")?,
            _ = tokio::signal::ctrl_c() => {
                demo.reset();
                RunOutcome::Cancelled
            }
        };

        if outcome == RunOutcome::Cancelled {
            printer.abort();
            anyhow::bail!("demo cancelled");
        }

        let snapshots = printer.await.context("progress printer failed")?;
        let issue = storyteller_issue();
        if json {
            print_json(&serde_json::json!({
                "snapshots": snapshots,
                "issue": issue,
            }))
        } else {
            print_issue(&issue);
            Ok(())
        }
    })
}

fn print_step(snapshot: &DemoSnapshot) {
    match (snapshot.phase, snapshot.step) {
        (DemoPhase::Running, Some(step)) => println!(
            "[{:>3.0}%] {}/{} {}: {}",
            snapshot.progress, step, snapshot.total_steps, snapshot.title, snapshot.description
        ),
        (DemoPhase::Complete, _) => println!("[100%] complete"),
        _ => {}
    }
}

fn print_issue(issue: &SampleIssue) {
    println!();
    println!("{} ({}, {})", issue.title, issue.issue, issue.date);
    println!("{}", issue.subtitle);
    println!(
        "Featured: {}, \"{}\" ({} monthly listeners, +{}%)",
        issue.featured_artist.name,
        issue.featured_artist.key_track,
        issue.featured_artist.monthly_listeners,
        issue.featured_artist.streaming_growth
    );
    for d in issue.radar_discoveries {
        println!("Radar: {} ({}) {}% confidence", d.name, d.location, d.confidence);
    }
    println!(
        "Reach {} · {} sources · {}",
        issue.metrics.estimated_reach, issue.metrics.sources_analyzed, issue.metrics.processing_time
    );
}
