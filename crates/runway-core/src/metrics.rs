//! Dashboard KPI bundle
//!
//! Runs the aggregator, MRR normalizer and burn calculator over one snapshot.

use chrono::Datelike;
use serde::Serialize;

use crate::aggregate::{
    breakdown_by_category, budget_usage, expenses_in_month, total_amount, BudgetUsage,
    CategoryTotal,
};
use crate::burn::{
    average_daily_burn, cash_burn, monthly_revenue_equivalent, projected_monthly_expenses,
    runway_months, Runway,
};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::insights::InsightContext;
use crate::models::Cents;
use crate::revenue::recurring_revenue;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Serialize)]
pub struct FinancialMetrics {
    pub company_balance: Cents,
    pub mrr: Cents,
    pub annual_mrr_impact: Cents,
    /// Expenses dated in the snapshot's `as_of` month
    pub monthly_expenses: Cents,
    /// Monthly expenses minus monthly revenue equivalent
    pub monthly_cash_burn: Cents,
    pub runway: Runway,
    pub daily_burn: Option<Cents>,
    pub projected_monthly_expenses: Option<Cents>,
    /// Full category breakdown over all expenses, largest first
    pub expense_by_category: Vec<CategoryTotal>,
    /// This month's spending against each category budget, most used first
    pub budget_usage: Vec<BudgetUsage>,
    pub total_expenses: Cents,
    pub total_revenue: Cents,
}

impl FinancialMetrics {
    /// Monthly revenue equivalent of the trailing revenue figure
    pub fn monthly_revenue(&self) -> Cents {
        monthly_revenue_equivalent(self.total_revenue)
    }
}

/// KPIs for the snapshot, with "this month" taken from its `as_of` date
pub fn compute_metrics(snapshot: &Snapshot) -> Result<FinancialMetrics> {
    let company_balance = snapshot.company_balance();
    let revenue = recurring_revenue(&snapshot.subscriptions)?;

    let total_expenses = total_amount(&snapshot.expenses)?;
    let this_month = expenses_in_month(
        &snapshot.expenses,
        snapshot.as_of.year(),
        snapshot.as_of.month(),
    );
    let monthly_expenses = total_amount(&this_month)?;

    let monthly_cash_burn = cash_burn(
        monthly_expenses,
        monthly_revenue_equivalent(snapshot.total_revenue),
    );
    let runway = runway_months(company_balance, monthly_cash_burn);
    let daily_burn = average_daily_burn(total_expenses, snapshot.period_days);

    let metrics = FinancialMetrics {
        company_balance,
        mrr: revenue.mrr,
        annual_mrr_impact: revenue.annual_mrr_impact,
        monthly_expenses,
        monthly_cash_burn,
        runway,
        daily_burn,
        projected_monthly_expenses: projected_monthly_expenses(daily_burn),
        expense_by_category: breakdown_by_category(&snapshot.expenses, None)?,
        budget_usage: budget_usage(&this_month, &snapshot.budgets)?,
        total_expenses,
        total_revenue: snapshot.total_revenue,
    };

    tracing::debug!(
        balance = metrics.company_balance,
        mrr = metrics.mrr,
        burn = metrics.monthly_cash_burn,
        runway = %metrics.runway,
        "Metrics computed"
    );

    Ok(metrics)
}

/// Insight inputs derived from computed metrics
pub fn build_insight_context<'a>(
    metrics: &'a FinancialMetrics,
    snapshot: &'a Snapshot,
    config: &'a EngineConfig,
) -> InsightContext<'a> {
    InsightContext {
        balance: metrics.company_balance,
        monthly_expenses: metrics.monthly_expenses,
        total_revenue: metrics.total_revenue,
        total_expenses: metrics.total_expenses,
        runway: metrics.runway,
        subscriptions: &snapshot.subscriptions,
        categories: &metrics.expense_by_category,
        budgets: &metrics.budget_usage,
        as_of: snapshot.as_of,
        currency: &config.currency,
        thresholds: &config.insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::BudgetStatus;
    use crate::test_utils::{date, sample_snapshot};

    #[test]
    fn test_sample_metrics() {
        let snapshot = sample_snapshot();
        let metrics = compute_metrics(&snapshot).unwrap();

        assert_eq!(metrics.company_balance, 600_000);
        // 12,000 annual + 3,000 monthly = (12,000 + 36,000) / 12
        assert_eq!(metrics.mrr, 4_000);
        assert_eq!(metrics.annual_mrr_impact, 48_000);
        assert_eq!(metrics.monthly_expenses, 200_000);
        assert_eq!(metrics.monthly_revenue(), 50_000);
        assert_eq!(metrics.monthly_cash_burn, 150_000);
        assert_eq!(metrics.runway, Runway::Finite(4.0));
        assert_eq!(metrics.total_expenses, 320_000);
        assert_eq!(metrics.daily_burn, Some(876));
        assert_eq!(metrics.projected_monthly_expenses, Some(26_280));
        assert_eq!(metrics.expense_by_category[0].total, 240_000);

        // Budgets only see June spending: salary 120,000 of 250,000, rent 50,000 of 40,000
        let rows: Vec<(&str, Cents)> = metrics
            .budget_usage
            .iter()
            .map(|u| (u.category.as_str(), u.spent))
            .collect();
        assert_eq!(rows, vec![("rent", 50_000), ("salary", 120_000)]);
        assert_eq!(metrics.budget_usage[0].status, BudgetStatus::OverBudget);
    }

    #[test]
    fn test_insight_context_carries_budgets() {
        let snapshot = sample_snapshot();
        let config = EngineConfig::default();
        let metrics = compute_metrics(&snapshot).unwrap();
        let ctx = build_insight_context(&metrics, &snapshot, &config);
        assert_eq!(ctx.budgets.len(), 2);
        assert_eq!(ctx.currency, "PKR");
    }

    #[test]
    fn test_empty_snapshot_metrics() {
        let mut snapshot = Snapshot::empty(date("2024-01-01"));
        snapshot.period_days = 0;
        let metrics = compute_metrics(&snapshot).unwrap();

        assert_eq!(metrics.company_balance, 0);
        assert_eq!(metrics.mrr, 0);
        assert_eq!(metrics.monthly_cash_burn, 0);
        assert!(metrics.runway.is_infinite());
        assert_eq!(metrics.daily_burn, None);
        assert!(metrics.expense_by_category.is_empty());
        assert!(metrics.budget_usage.is_empty());
    }

    #[test]
    fn test_invalid_subscription_cycle_fails() {
        let mut snapshot = sample_snapshot();
        snapshot.subscriptions[0].billing_cycle = "weekly".to_string();
        let err = compute_metrics(&snapshot).unwrap_err();
        assert!(err.is_validation());
    }
}
