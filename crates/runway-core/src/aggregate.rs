//! Money & category aggregation
//!
//! Sums raw expense records into totals, per-category breakdowns and "largest single
//! expense" lists, measures spending against category budgets, and folds confirmed
//! distributions back into per-founder totals.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use serde::Serialize;

use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::models::{CategoryBudget, Cents, Expense, ExpenseCategory, Percent};
use crate::money::checked_sum;

/// Spending in one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub total: Cents,
    pub count: usize,
    /// Share of the grand total (0 when the grand total is 0)
    pub percentage: f64,
}

/// Full expense summary for reporting
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseSummary {
    pub total: Cents,
    pub categories: Vec<CategoryTotal>,
    pub largest: Vec<Expense>,
}

fn check_amounts(expenses: &[Expense]) -> Result<()> {
    if let Some(bad) = expenses.iter().find(|e| e.amount < 0) {
        return Err(Error::validation(format!(
            "expense {} has negative amount {}",
            bad.id, bad.amount
        )));
    }
    Ok(())
}

/// `part / whole * 100`, with a zero whole giving 0
pub fn percentage_of(part: Cents, whole: Cents) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Sum of all expense amounts
pub fn total_amount(expenses: &[Expense]) -> Result<Cents> {
    check_amounts(expenses)?;
    checked_sum(expenses.iter().map(|e| e.amount))
}

/// Group expenses by normalized category, largest first
///
/// Percentages are relative to the grand total of all expenses, so truncating with
/// `top_n` does not rescale the remaining rows.
pub fn breakdown_by_category(
    expenses: &[Expense],
    top_n: Option<usize>,
) -> Result<Vec<CategoryTotal>> {
    let grand_total = total_amount(expenses)?;

    let mut grouped: HashMap<ExpenseCategory, (Cents, usize)> = HashMap::new();
    for expense in expenses {
        let entry = grouped.entry(expense.category()).or_insert((0, 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    let mut categories: Vec<CategoryTotal> = grouped
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category,
            total,
            count,
            percentage: percentage_of(total, grand_total),
        })
        .collect();

    // Ties broken by name so output never depends on hash order
    categories.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });

    if let Some(n) = top_n {
        categories.truncate(n);
    }

    tracing::debug!(
        expenses = expenses.len(),
        categories = categories.len(),
        total = grand_total,
        "Expense breakdown computed"
    );

    Ok(categories)
}

/// The `k` largest individual expenses (ties: most recent first, then id)
pub fn largest_expenses(expenses: &[Expense], k: usize) -> Vec<Expense> {
    let mut sorted: Vec<&Expense> = expenses.iter().collect();
    sorted.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| b.date.cmp(&a.date))
            .then_with(|| a.id.cmp(&b.id))
    });
    sorted.into_iter().take(k).cloned().collect()
}

/// Total, category breakdown and largest expenses in one pass over the inputs
pub fn summarize(
    expenses: &[Expense],
    top_n: Option<usize>,
    top_k: usize,
) -> Result<ExpenseSummary> {
    Ok(ExpenseSummary {
        total: total_amount(expenses)?,
        categories: breakdown_by_category(expenses, top_n)?,
        largest: largest_expenses(expenses, top_k),
    })
}

/// Expenses dated within the given calendar month
pub fn expenses_in_month(expenses: &[Expense], year: i32, month: u32) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|e| e.date.year() == year && e.date.month() == month)
        .cloned()
        .collect()
}

/// Where a category stands against its budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    /// At or above the alert threshold
    NearLimit,
    /// At or above 100% of the allocation
    OverBudget,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "on_track",
            Self::NearLimit => "near_limit",
            Self::OverBudget => "over_budget",
        }
    }

    pub fn is_flagged(&self) -> bool {
        !matches!(self, Self::OnTrack)
    }
}

/// Spending in one budgeted category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetUsage {
    pub category: ExpenseCategory,
    pub allocated: Cents,
    pub spent: Cents,
    /// `spent / allocated * 100`; 0 for a zero allocation
    pub percent_used: f64,
    pub alert_threshold: Percent,
    pub status: BudgetStatus,
}

/// Spending against each category budget, most used first
///
/// Expenses are matched on normalized category, so callers pass the expenses of the
/// budget period. Spending against a zero allocation counts as over budget.
pub fn budget_usage(expenses: &[Expense], budgets: &[CategoryBudget]) -> Result<Vec<BudgetUsage>> {
    check_amounts(expenses)?;

    let mut spent_by_category: HashMap<ExpenseCategory, Cents> = HashMap::new();
    for expense in expenses {
        let spent = spent_by_category.entry(expense.category()).or_insert(0);
        *spent = checked_sum([*spent, expense.amount])?;
    }

    let mut usage = Vec::with_capacity(budgets.len());
    for budget in budgets {
        let category = budget.category();
        if budget.allocated < 0 {
            return Err(Error::validation(format!(
                "budget for {} has negative allocation {}",
                category, budget.allocated
            )));
        }
        let alert_threshold = Percent::new(budget.alert_threshold).map_err(|e| match e {
            Error::Validation(msg) => {
                Error::Validation(format!("budget for {}: {}", category, msg))
            }
            other => other,
        })?;

        let spent = spent_by_category.get(&category).copied().unwrap_or(0);
        let percent_used = percentage_of(spent, budget.allocated);
        let status = if percent_used >= 100.0 || (budget.allocated == 0 && spent > 0) {
            BudgetStatus::OverBudget
        } else if percent_used >= alert_threshold.as_f64() && spent > 0 {
            BudgetStatus::NearLimit
        } else {
            BudgetStatus::OnTrack
        };

        usage.push(BudgetUsage {
            category,
            allocated: budget.allocated,
            spent,
            percent_used,
            alert_threshold,
            status,
        });
    }

    usage.sort_by(|a, b| {
        b.percent_used
            .total_cmp(&a.percent_used)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });

    tracing::debug!(
        budgets = usage.len(),
        flagged = usage.iter().filter(|u| u.status.is_flagged()).count(),
        "Budget usage computed"
    );

    Ok(usage)
}

/// Total paid to founders across confirmed distributions
pub fn total_distributed(distributions: &[Distribution]) -> Result<Cents> {
    checked_sum(
        distributions
            .iter()
            .flat_map(|d| d.items.iter())
            .map(|item| item.net_amount),
    )
}

/// Net amounts paid per founder across confirmed distributions
pub fn distributed_by_founder(distributions: &[Distribution]) -> Result<BTreeMap<String, Cents>> {
    let mut totals = BTreeMap::new();
    for item in distributions.iter().flat_map(|d| d.items.iter()) {
        let total = totals.entry(item.founder_id.clone()).or_insert(0);
        *total = checked_sum([*total, item.net_amount])?;
    }
    Ok(totals)
}
