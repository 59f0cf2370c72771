//! Metrics command implementation

use anyhow::{Context, Result};
use runway_core::money::format_money;
use runway_core::{compute_metrics, EngineConfig, Runway, Snapshot};

use super::print_json;

pub fn cmd_metrics(snapshot: &Snapshot, config: &EngineConfig, json: bool) -> Result<()> {
    let metrics = compute_metrics(snapshot).context("Failed to compute metrics")?;

    if json {
        return print_json(&metrics);
    }

    let money = |amount| format_money(amount, &config.currency);

    println!();
    println!("📊 Financial Overview ({})", snapshot.as_of.format("%B %Y"));
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Company balance:      {:>20}", money(metrics.company_balance));
    println!("   MRR:                  {:>20}", money(metrics.mrr));
    println!("   Annual MRR impact:    {:>20}", money(metrics.annual_mrr_impact));
    println!("   Expenses this month:  {:>20}", money(metrics.monthly_expenses));
    println!("   Revenue per month:    {:>20}", money(metrics.monthly_revenue()));

    if metrics.monthly_cash_burn > 0 {
        println!("   🔥 Monthly cash burn: {:>20}", money(metrics.monthly_cash_burn));
    } else {
        println!(
            "   💰 Monthly surplus:   {:>20}",
            money(-metrics.monthly_cash_burn)
        );
    }

    match metrics.runway {
        Runway::Finite(months) => println!("   ⏳ Runway:            {:>13.1} months", months),
        Runway::Infinite => println!("   ♾️  Runway:            {:>20}", "unlimited"),
    }

    if let Some(daily) = metrics.daily_burn {
        println!(
            "   Daily burn:           {:>20}  ({} days)",
            money(daily),
            snapshot.period_days
        );
    }
    if let Some(projected) = metrics.projected_monthly_expenses {
        println!("   Projected per month:  {:>20}", money(projected));
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total expenses:       {:>20}", money(metrics.total_expenses));
    println!("   Total revenue:        {:>20}", money(metrics.total_revenue));

    Ok(())
}
