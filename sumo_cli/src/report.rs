//! Text and JSON rendering for tick reports and bout summaries.

use serde_json::{Value, json};
use sumo_core::{Behavior, RunSummary, TickReport};

/// One JSON object per tick. `t_ms` is the trace timestamp when replaying.
pub fn tick_json(report: &TickReport, t_ms: Option<u64>) -> Value {
    json!({
        "t_ms": t_ms,
        "at_ms": report.at_ms,
        "behavior": report.behavior.as_str(),
        "left": report.command.left,
        "right": report.command.right,
        "hold_ms": report.hold_ms,
        "tier": report.tier.as_str(),
        "contact_made": report.contact_made,
        "in_contact": report.in_contact,
        "filtered_x": report.reading.filtered_x,
        "filtered_y": report.reading.filtered_y,
        "magnitude_sq": report.reading.magnitude_sq,
    })
}

pub fn tick_line(report: &TickReport) -> String {
    let contact = if report.contact_made { "  CONTACT" } else { "" };
    format!(
        "{:>7} ms  {:<8} ({:>4}, {:>4})  tier={}{contact}",
        report.at_ms,
        report.behavior.as_str(),
        report.command.left,
        report.command.right,
        report.tier.as_str(),
    )
}

/// Final JSONL record. `abort_reason` is null for a clean finish.
pub fn summary_json(summary: &RunSummary, abort_reason: Option<&str>) -> Value {
    let behaviors: serde_json::Map<String, Value> = Behavior::ALL
        .iter()
        .map(|b| (b.as_str().to_string(), json!(summary.ticks_in(*b))))
        .collect();
    json!({
        "timestamp": unix_secs(),
        "ticks": summary.ticks,
        "contacts": summary.contacts,
        "elapsed_ms": summary.elapsed_ms,
        "behavior_ticks": behaviors,
        "abort_reason": abort_reason,
    })
}

pub fn print_summary(label: &str, summary: &RunSummary) {
    println!(
        "{label} complete: {} ticks, {} contacts, {} ms",
        summary.ticks, summary.contacts, summary.elapsed_ms
    );
    for b in Behavior::ALL {
        println!("  {:<8} {}", b.as_str(), summary.ticks_in(b));
    }
}

fn unix_secs() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
