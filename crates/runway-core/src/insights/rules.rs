//! Built-in insight rules
//!
//! Each rule reads the shared [`InsightContext`] and fires at most one alert. Rules
//! never look at each other's output.

use chrono::Days;
use serde_json::json;

use crate::aggregate::{percentage_of, BudgetStatus};
use crate::money::format_money;

use super::engine::{InsightContext, InsightRule};
use super::types::{Alert, AlertKind, Severity};

/// Company balance below the low-cash threshold
pub struct LowCashRule;

impl InsightRule for LowCashRule {
    fn id(&self) -> AlertKind {
        AlertKind::LowCash
    }

    fn name(&self) -> &'static str {
        "Low Cash Balance"
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Alert> {
        let threshold = ctx.thresholds.low_cash_threshold;
        if ctx.balance >= threshold {
            return None;
        }

        Some(
            Alert::new(
                self.id(),
                Severity::Error,
                self.name(),
                format!(
                    "Company balance is only {}. Consider adding funds soon.",
                    format_money(ctx.balance, ctx.currency)
                ),
            )
            .with_data(json!({
                "balance": ctx.balance,
                "threshold": threshold,
            })),
        )
    }
}

/// Finite runway shorter than the warning horizon
pub struct LowRunwayRule;

impl InsightRule for LowRunwayRule {
    fn id(&self) -> AlertKind {
        AlertKind::LowRunway
    }

    fn name(&self) -> &'static str {
        "Limited Runway"
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Alert> {
        let limit = ctx.thresholds.runway_warning_months;
        if !ctx.runway.is_shorter_than(limit) {
            return None;
        }
        let months = ctx.runway.months()?;

        Some(
            Alert::new(
                self.id(),
                Severity::Warning,
                self.name(),
                format!(
                    "At current spending, you have ~{:.1} month(s) of runway. \
                     Plan ahead for sustainability.",
                    months
                ),
            )
            .with_data(json!({
                "runway_months": months,
                "warning_months": limit,
            })),
        )
    }
}

/// Monthly spend above a share of total revenue
pub struct HighBurnRule;

impl InsightRule for HighBurnRule {
    fn id(&self) -> AlertKind {
        AlertKind::HighBurn
    }

    fn name(&self) -> &'static str {
        "High Burn Rate"
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Alert> {
        if ctx.total_revenue <= 0 {
            return None;
        }
        let burn = ctx.gross_monthly_burn();
        // Compared at whole-percent precision, as displayed
        let burn_percent = percentage_of(burn, ctx.total_revenue).round();
        if burn_percent <= ctx.thresholds.burn_rate_warning_percent {
            return None;
        }

        Some(
            Alert::new(
                self.id(),
                Severity::Warning,
                self.name(),
                format!(
                    "You're spending {:.0}% of revenue. Consider optimizing expenses.",
                    burn_percent
                ),
            )
            .with_data(json!({
                "monthly_burn": burn,
                "total_revenue": ctx.total_revenue,
                "burn_percent": burn_percent,
            })),
        )
    }
}

/// Active subscriptions billing within the next few days
pub struct UpcomingBillsRule;

impl InsightRule for UpcomingBillsRule {
    fn id(&self) -> AlertKind {
        AlertKind::UpcomingBills
    }

    fn name(&self) -> &'static str {
        "Upcoming Bills"
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Alert> {
        let days = ctx.thresholds.upcoming_bill_days;
        let horizon = ctx.as_of.checked_add_days(Days::new(u64::from(days)))?;

        let mut upcoming: Vec<_> = ctx
            .subscriptions
            .iter()
            .filter(|s| s.active)
            .filter_map(|s| s.next_billing_date.map(|d| (s, d)))
            .filter(|(_, d)| *d > ctx.as_of && *d <= horizon)
            .collect();
        if upcoming.is_empty() {
            return None;
        }
        upcoming.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.id.cmp(&b.0.id)));

        let total: i64 = upcoming.iter().map(|(s, _)| s.amount).sum();
        let bills: Vec<_> = upcoming
            .iter()
            .map(|(s, d)| {
                json!({
                    "subscription_id": s.id,
                    "name": s.name,
                    "amount": s.amount,
                    "date": d.to_string(),
                })
            })
            .collect();

        Some(
            Alert::new(
                self.id(),
                Severity::Info,
                self.name(),
                format!(
                    "{} subscription(s) billing in the next {} days ({}).",
                    upcoming.len(),
                    days,
                    format_money(total, ctx.currency)
                ),
            )
            .with_data(json!({
                "count": upcoming.len(),
                "total": total,
                "bills": bills,
            })),
        )
    }
}

/// Overall profit margin above the strong-margin level
pub struct StrongMarginsRule;

impl InsightRule for StrongMarginsRule {
    fn id(&self) -> AlertKind {
        AlertKind::StrongMargins
    }

    fn name(&self) -> &'static str {
        "Strong Profit Margin"
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Alert> {
        if ctx.total_revenue <= 0 || ctx.total_expenses <= 0 {
            return None;
        }
        let margin = percentage_of(ctx.total_revenue - ctx.total_expenses, ctx.total_revenue);
        if margin <= ctx.thresholds.strong_margin_percent {
            return None;
        }

        Some(
            Alert::new(
                self.id(),
                Severity::Success,
                self.name(),
                format!(
                    "Excellent! Your profit margin is {:.0}%. You're in a strong position.",
                    margin
                ),
            )
            .with_data(json!({ "profit_margin": margin })),
        )
    }
}

/// Largest category dominating monthly spend
pub struct HighCategoryRule;

impl InsightRule for HighCategoryRule {
    fn id(&self) -> AlertKind {
        AlertKind::HighCategory
    }

    fn name(&self) -> &'static str {
        "High Category Spending"
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Alert> {
        let top = ctx.categories.first()?;
        let burn = ctx.gross_monthly_burn();
        if burn <= 0 {
            return None;
        }
        let share = percentage_of(top.total, burn);
        if share <= ctx.thresholds.category_concentration_percent {
            return None;
        }

        Some(
            Alert::new(
                self.id(),
                Severity::Info,
                self.name(),
                format!(
                    "{} is your biggest expense ({}). Monitor for optimization.",
                    top.category.label(),
                    format_money(top.total, ctx.currency)
                ),
            )
            .with_data(json!({
                "category": top.category.as_str(),
                "total": top.total,
                "share_of_monthly_burn": share,
            })),
        )
    }
}

/// Budgeted categories at or past their alert threshold this month
pub struct OverBudgetRule;

impl InsightRule for OverBudgetRule {
    fn id(&self) -> AlertKind {
        AlertKind::OverBudget
    }

    fn name(&self) -> &'static str {
        "Budget Alert"
    }

    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Alert> {
        let flagged: Vec<_> = ctx.budgets.iter().filter(|u| u.status.is_flagged()).collect();
        let worst = flagged.first()?;
        let over = flagged
            .iter()
            .filter(|u| u.status == BudgetStatus::OverBudget)
            .count();
        let severity = if over > 0 {
            Severity::Warning
        } else {
            Severity::Info
        };

        let categories: Vec<_> = flagged
            .iter()
            .map(|u| {
                json!({
                    "category": u.category.as_str(),
                    "allocated": u.allocated,
                    "spent": u.spent,
                    "percent_used": u.percent_used,
                    "status": u.status.as_str(),
                })
            })
            .collect();

        Some(
            Alert::new(
                self.id(),
                severity,
                self.name(),
                format!(
                    "{} of {} budgeted categories need attention ({} over budget). \
                     {} has used {} of {}.",
                    flagged.len(),
                    ctx.budgets.len(),
                    over,
                    worst.category.label(),
                    format_money(worst.spent, ctx.currency),
                    format_money(worst.allocated, ctx.currency)
                ),
            )
            .with_data(json!({
                "over_budget": over,
                "flagged": flagged.len(),
                "categories": categories,
            })),
        )
    }
}
