//! Insight Engine - evaluates registered rules and ranks their alerts

use chrono::NaiveDate;

use crate::aggregate::{BudgetUsage, CategoryTotal};
use crate::burn::Runway;
use crate::config::InsightThresholds;
use crate::models::{Cents, Subscription};

use super::rules::{
    HighBurnRule, HighCategoryRule, LowCashRule, LowRunwayRule, OverBudgetRule,
    StrongMarginsRule, UpcomingBillsRule,
};
use super::types::{Alert, AlertKind};

/// Inputs shared by every rule
#[derive(Debug, Clone)]
pub struct InsightContext<'a> {
    pub balance: Cents,
    /// Expenses recorded in the current month
    pub monthly_expenses: Cents,
    pub total_revenue: Cents,
    /// Expenses over the whole snapshot period
    pub total_expenses: Cents,
    pub runway: Runway,
    pub subscriptions: &'a [Subscription],
    /// Category breakdown, largest first
    pub categories: &'a [CategoryTotal],
    /// This month's spending per budgeted category, most used first
    pub budgets: &'a [BudgetUsage],
    pub as_of: NaiveDate,
    pub currency: &'a str,
    pub thresholds: &'a InsightThresholds,
}

impl InsightContext<'_> {
    /// Monthly spend used by burn-style rules: this month's expenses, or the period
    /// total when nothing was recorded this month
    pub fn gross_monthly_burn(&self) -> Cents {
        if self.monthly_expenses > 0 {
            self.monthly_expenses
        } else {
            self.total_expenses
        }
    }
}

/// A single insight rule
pub trait InsightRule: Send + Sync {
    /// Identifier of the alerts this rule produces
    fn id(&self) -> AlertKind;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Evaluate the rule; `None` when it does not fire
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Alert>;
}

/// Runs every registered rule over a context
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules
    pub fn new() -> Self {
        let mut engine = Self { rules: vec![] };

        engine.register(Box::new(LowCashRule));
        engine.register(Box::new(LowRunwayRule));
        engine.register(Box::new(HighBurnRule));
        engine.register(Box::new(UpcomingBillsRule));
        engine.register(Box::new(StrongMarginsRule));
        engine.register(Box::new(HighCategoryRule));
        engine.register(Box::new(OverBudgetRule));

        engine
    }

    /// An engine with no rules
    pub fn empty() -> Self {
        Self { rules: vec![] }
    }

    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    /// Evaluate all rules, most severe first
    ///
    /// Every rule runs; ties keep registration order.
    pub fn evaluate_all(&self, ctx: &InsightContext<'_>) -> Vec<Alert> {
        let mut alerts = vec![];

        for rule in &self.rules {
            match rule.evaluate(ctx) {
                Some(alert) => {
                    tracing::debug!(
                        rule = rule.id().as_str(),
                        severity = alert.severity.as_str(),
                        "Insight rule fired"
                    );
                    alerts.push(alert);
                }
                None => tracing::trace!(rule = rule.id().as_str(), "Insight rule quiet"),
            }
        }

        alerts.sort_by(|a, b| b.severity.priority().cmp(&a.severity.priority()));

        alerts
    }

    /// Registered rule ids in evaluation order
    pub fn rule_ids(&self) -> Vec<AlertKind> {
        self.rules.iter().map(|r| r.id()).collect()
    }
}
