//! Distribution command implementation
//!
//! Without `--confirm` this only prints the preview. With it, the distribution record
//! and updated founder totals are written back to the snapshot file.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use runway_core::distribution::ProfitSource;
use runway_core::money::format_money;
use runway_core::{
    calculate_distribution, confirm_distribution, DistributionPreview, DistributionRequest,
    EngineConfig, Percent, Snapshot,
};

use super::{print_json, save_snapshot, truncate};

#[allow(clippy::too_many_arguments)]
pub fn cmd_distribute(
    data_path: &Path,
    mut snapshot: Snapshot,
    config: &EngineConfig,
    source: ProfitSource,
    retention: Option<f64>,
    period: Option<&str>,
    notes: Option<&str>,
    confirm: bool,
    json: bool,
) -> Result<()> {
    let retention = match retention {
        Some(r) => Percent::new(r).context("Invalid --retention")?,
        None => config.company_retention,
    };
    let period = period
        .map(str::to_string)
        .unwrap_or_else(|| snapshot.as_of.format("%Y-%m").to_string());

    let request = DistributionRequest {
        source,
        retention,
        period,
        notes: notes.unwrap_or_default().to_string(),
    };

    let Some(preview) = calculate_distribution(&request, &snapshot.projects, &snapshot.founders)
        .context("Failed to calculate distribution")?
    else {
        println!("No active founders in the snapshot; nothing to distribute.");
        return Ok(());
    };

    if !confirm {
        if json {
            return print_json(&preview);
        }
        print_preview(&preview, config);
        println!();
        println!("Preview only. Re-run with --confirm to record this distribution.");
        return Ok(());
    }

    let id = format!("dist-{}-{}", preview.period, &preview.fingerprint[..8]);
    let record = confirm_distribution(
        &preview,
        &mut snapshot.founders,
        &snapshot.distributions,
        id,
        Utc::now(),
    )
    .context("Failed to confirm distribution")?;

    snapshot.distributions.push(record.clone());
    save_snapshot(data_path, &snapshot)?;

    if json {
        return print_json(&record);
    }

    print_preview(&preview, config);
    println!();
    println!(
        "✅ Distribution {} recorded in {}",
        record.id,
        data_path.display()
    );

    Ok(())
}

fn print_preview(preview: &DistributionPreview, config: &EngineConfig) {
    let money = |amount| format_money(amount, &config.currency);

    println!();
    println!("💰 Profit Distribution ({})", preview.period);
    if !preview.source.project_ids().is_empty() {
        println!("   Projects: {}", preview.source.project_ids().join(", "));
    }
    if !preview.notes.is_empty() {
        println!("   Notes: {}", preview.notes);
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total profit:        {:>18}", money(preview.total_profit));
    println!(
        "   Company retention:   {:>18}  ({})",
        money(preview.company_retention),
        preview.retention_percent
    );
    println!("   Distributable:       {:>18}", money(preview.distributable));
    println!("   ─────────────────────────────────────────────────────────────");

    for share in &preview.founder_distributions {
        println!(
            "   {:18} {:>7} │ gross {:>14} │ withdrawable {:>14}",
            truncate(&share.founder_name, 18),
            share.share_percent.to_string(),
            money(share.gross_amount),
            money(share.withdrawable)
        );
    }

    if preview.unallocated != 0 {
        println!("   Unallocated remainder: {}", money(preview.unallocated));
    }
    if preview.total_profit <= 0 {
        println!("   ⚠️  Profit is not positive; there is nothing to pay out.");
    }
}
