//! Report command implementations (categories, budgets, projection, billing schedule)

use anyhow::{Context, Result};
use runway_core::aggregate::summarize;
use runway_core::money::format_money;
use runway_core::projection::{billing_schedule, first_critical_month, project_cash_flow};
use runway_core::revenue::monthly_equivalent;
use runway_core::{
    compute_metrics, BudgetStatus, CashFlowStatus, Cents, EngineConfig, ProjectionPoint, Scenario,
    Snapshot,
};
use serde::Serialize;

use super::{print_json, truncate};

pub fn cmd_categories(
    snapshot: &Snapshot,
    config: &EngineConfig,
    top: Option<usize>,
    largest: Option<usize>,
    json: bool,
) -> Result<()> {
    let top = top.unwrap_or(config.top_categories);
    let largest = largest.unwrap_or(config.largest_expenses);
    let summary = summarize(&snapshot.expenses, Some(top), largest)
        .context("Failed to summarize expenses")?;

    if json {
        return print_json(&summary);
    }

    if summary.categories.is_empty() {
        println!("No expenses recorded as of {}", snapshot.as_of);
        return Ok(());
    }

    let money = |amount| format_money(amount, &config.currency);

    println!();
    println!("📂 Spending by Category");
    println!("   ─────────────────────────────────────────────────────────────");
    for cat in &summary.categories {
        let bar_len = (cat.percentage / 5.0).round() as usize;
        println!(
            "   {:20} │ {:>16} │ {:>5.1}% {}",
            truncate(&cat.category.label(), 20),
            money(cat.total),
            cat.percentage,
            "█".repeat(bar_len)
        );
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:20} │ {:>16}", "Total", money(summary.total));

    if !summary.largest.is_empty() {
        println!();
        println!("💸 Largest Expenses");
        println!("   ─────────────────────────────────────────────────────────────");
        for expense in &summary.largest {
            let label = if expense.description.is_empty() {
                expense.category().label()
            } else {
                expense.description.clone()
            };
            println!(
                "   {} │ {:28} │ {:>16}",
                expense.date,
                truncate(&label, 28),
                money(expense.amount)
            );
        }
    }

    Ok(())
}

pub fn cmd_budgets(snapshot: &Snapshot, config: &EngineConfig, json: bool) -> Result<()> {
    let metrics = compute_metrics(snapshot).context("Failed to compute metrics")?;
    let usage = &metrics.budget_usage;

    if json {
        return print_json(usage);
    }

    if usage.is_empty() {
        println!("No category budgets in the snapshot.");
        return Ok(());
    }

    let money = |amount| format_money(amount, &config.currency);

    println!();
    println!("🎯 Budgets ({})", snapshot.as_of.format("%B %Y"));
    println!("   ─────────────────────────────────────────────────────────────");
    for u in usage {
        let icon = match u.status {
            BudgetStatus::OnTrack => "✅",
            BudgetStatus::NearLimit => "⚠️ ",
            BudgetStatus::OverBudget => "🚨",
        };
        println!(
            "   {} {:20} │ {:>14} / {:>14} │ {:>6.1}% (alert at {})",
            icon,
            truncate(&u.category.label(), 20),
            money(u.spent),
            money(u.allocated),
            u.percent_used,
            u.alert_threshold
        );
    }

    Ok(())
}

#[derive(Serialize)]
struct ProjectionReport<'a> {
    scenario: Scenario,
    account: Option<&'a str>,
    starting_balance: Cents,
    monthly_revenue: Cents,
    monthly_expenses: Cents,
    points: &'a [ProjectionPoint],
}

pub fn cmd_project(
    snapshot: &Snapshot,
    config: &EngineConfig,
    months: Option<u32>,
    scenario: &str,
    account: Option<&str>,
    json: bool,
) -> Result<()> {
    let months = months.unwrap_or(config.projection_months);
    let scenario: Scenario = scenario.parse().context("Invalid --scenario")?;
    let starting_balance = snapshot.starting_balance(account).context("Invalid --account")?;

    let metrics = compute_metrics(snapshot).context("Failed to compute metrics")?;
    let (monthly_revenue, monthly_expenses) = scenario
        .apply(metrics.monthly_revenue(), metrics.monthly_expenses)
        .context("Failed to apply scenario")?;

    let points = project_cash_flow(starting_balance, monthly_expenses, monthly_revenue, months)
        .context("Failed to project cash flow")?;

    if json {
        return print_json(&ProjectionReport {
            scenario,
            account,
            starting_balance,
            monthly_revenue,
            monthly_expenses,
            points: &points,
        });
    }

    let money = |amount| format_money(amount, &config.currency);

    println!();
    println!("📈 Cash Flow Projection ({} months, {})", months, scenario);
    if let Some(account) = account {
        println!("   Account: {}", account);
    }
    println!(
        "   Starting balance {} │ revenue {}/mo │ expenses {}/mo",
        money(starting_balance),
        money(monthly_revenue),
        money(monthly_expenses)
    );
    println!("   ─────────────────────────────────────────────────────────────");
    for point in &points {
        let icon = match point.status {
            CashFlowStatus::Healthy => "✅",
            CashFlowStatus::Critical => "🚨",
        };
        println!(
            "   {} Month {:>3} │ net {:>16} │ balance {:>16}",
            icon,
            point.month_index,
            money(point.net_cash_flow),
            money(point.cumulative_balance)
        );
    }

    if let Some(month) = first_critical_month(&points) {
        println!();
        println!("   ⚠️  Cash runs out in month {}", month);
    }

    Ok(())
}

pub fn cmd_schedule(
    snapshot: &Snapshot,
    config: &EngineConfig,
    months: u32,
    json: bool,
) -> Result<()> {
    let schedule = billing_schedule(&snapshot.subscriptions, snapshot.as_of, months)
        .context("Failed to build billing schedule")?;

    if json {
        return print_json(&schedule);
    }

    let money = |amount| format_money(amount, &config.currency);

    println!();
    println!("📅 Billing Schedule");
    println!("   ─────────────────────────────────────────────────────────────");
    for month in &schedule {
        println!("   {} │ {:>16}", month.label(), money(month.total));
        for payment in &month.payments {
            println!(
                "      {} │ {:24} │ {:>16}",
                payment.date,
                truncate(&payment.name, 24),
                money(payment.amount)
            );
        }
    }

    let active: Vec<_> = snapshot.subscriptions.iter().filter(|s| s.active).collect();
    if !active.is_empty() {
        println!();
        println!("🔁 Monthly Equivalent");
        println!("   ─────────────────────────────────────────────────────────────");
        for sub in active {
            let monthly = monthly_equivalent(sub)
                .with_context(|| format!("Invalid subscription {}", sub.id))?;
            println!(
                "   {:24} │ {:>10} │ {:>16}/mo",
                truncate(&sub.name, 24),
                sub.billing_cycle,
                money(monthly)
            );
        }
    }

    Ok(())
}
