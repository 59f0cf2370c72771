//! Insights command implementation

use anyhow::{Context, Result};
use runway_core::{
    build_insight_context, compute_metrics, EngineConfig, InsightEngine, Severity, Snapshot,
};

use super::print_json;

pub fn cmd_insights(snapshot: &Snapshot, config: &EngineConfig, json: bool) -> Result<()> {
    let metrics = compute_metrics(snapshot).context("Failed to compute metrics")?;
    let ctx = build_insight_context(&metrics, snapshot, config);
    let alerts = InsightEngine::new().evaluate_all(&ctx);

    if json {
        return print_json(&alerts);
    }

    if alerts.is_empty() {
        println!("✅ All systems healthy. No alerts right now.");
        return Ok(());
    }

    println!();
    println!("💡 Smart Insights ({})", alerts.len());
    println!("   ─────────────────────────────────────────────────────────────");

    for alert in &alerts {
        let icon = match alert.severity {
            Severity::Error => "🚨",
            Severity::Warning => "⚠️ ",
            Severity::Info => "ℹ️ ",
            Severity::Success => "🚀",
        };
        println!("   {} {}", icon, alert.title);
        println!("      {}", alert.message);
    }

    Ok(())
}
