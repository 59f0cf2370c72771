//! Founder and project command implementations

use anyhow::{Context, Result};
use runway_core::distribution::undistributed_projects;
use runway_core::money::{format_money, to_minor_units};
use runway_core::{founder_balances, Cents, EngineConfig, Snapshot};
use serde::Serialize;

use super::{print_json, truncate};

/// Net profit of completed projects not yet paid out
fn undistributed_profit(snapshot: &Snapshot) -> Cents {
    undistributed_projects(&snapshot.projects, &snapshot.distributions)
        .iter()
        .map(|p| p.net_profit())
        .sum()
}

pub fn cmd_founders(
    snapshot: &Snapshot,
    config: &EngineConfig,
    profit: Option<f64>,
    json: bool,
) -> Result<()> {
    let company_profit = match profit {
        Some(amount) => to_minor_units(amount).context("Invalid --profit amount")?,
        None => undistributed_profit(snapshot),
    };

    let summary = founder_balances(
        &snapshot.founders,
        &snapshot.distributions,
        company_profit,
        config.company_retention,
    )
    .context("Failed to compute founder balances")?;

    if json {
        return print_json(&summary);
    }

    if summary.balances.is_empty() {
        println!("No active founders in the snapshot.");
        return Ok(());
    }

    let money = |amount| format_money(amount, &config.currency);

    println!();
    println!("👥 Founder Balances");
    println!(
        "   Profit {} │ retention {} ({}) │ distributable {}",
        money(summary.company_profit),
        config.company_retention,
        money(summary.company_retention),
        money(summary.distributable)
    );
    println!("   ─────────────────────────────────────────────────────────────");

    for b in &summary.balances {
        println!(
            "   {:18} {:>7} │ share {:>14} │ paid {:>14} │ withdrawable {:>14}",
            truncate(&b.name, 18),
            b.share_percent.to_string(),
            money(b.gross_share),
            money(b.already_distributed),
            money(b.withdrawable)
        );
        println!(
            "   {:26} │ contributed {:>14} │ net position {:>14}",
            "",
            money(b.contributed),
            money(b.net_position)
        );
        if b.is_out_of_sync() {
            println!(
                "   {:26} │ ⚠️  confirmed records show {} paid",
                "",
                money(b.recorded_distributions)
            );
        }
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total withdrawable: {}", money(summary.total_withdrawable));
    println!("   Paid out to date:   {}", money(summary.total_distributed));

    Ok(())
}

#[derive(Serialize)]
struct ProjectRow<'a> {
    id: &'a str,
    name: &'a str,
    client_name: Option<&'a str>,
    contract_value: Cents,
    net_profit: Cents,
    profit_margin: Option<f64>,
}

pub fn cmd_projects(snapshot: &Snapshot, config: &EngineConfig, json: bool) -> Result<()> {
    let projects = undistributed_projects(&snapshot.projects, &snapshot.distributions);

    if json {
        let rows: Vec<ProjectRow> = projects
            .iter()
            .map(|p| ProjectRow {
                id: &p.id,
                name: &p.name,
                client_name: p.client_name.as_deref(),
                contract_value: p.contract_value,
                net_profit: p.net_profit(),
                profit_margin: p.profit_margin(),
            })
            .collect();
        return print_json(&rows);
    }

    if projects.is_empty() {
        println!("No completed projects waiting for distribution.");
        return Ok(());
    }

    let money = |amount| format_money(amount, &config.currency);

    println!();
    println!("🏁 Completed Projects (undistributed)");
    println!("   ─────────────────────────────────────────────────────────────");
    for p in &projects {
        let margin = p
            .profit_margin()
            .map(|m| format!("{:.0}%", m))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   {:10} {:22} │ profit {:>14} │ margin {:>5}",
            truncate(&p.id, 10),
            truncate(&p.name, 22),
            money(p.net_profit()),
            margin
        );
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total profit: {}", money(undistributed_profit(snapshot)));
    println!();
    println!("Distribute with:");
    println!(
        "  runway distribute --projects {}",
        projects.iter().map(|p| p.id.as_str()).collect::<Vec<_>>().join(",")
    );

    Ok(())
}
