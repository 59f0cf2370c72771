//! Snapshot of all engine inputs
//!
//! A [`Snapshot`] is the caller-owned bundle every computation runs over. It is stored
//! as a single JSON document; the CLI reads it, runs operations, and (for distribution
//! confirmation only) writes it back.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::models::{
    Account, CategoryBudget, Cents, Expense, Founder, ProjectFinancials, Subscription,
};

fn default_period_days() -> u32 {
    365
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Date the snapshot describes; "this month" and "upcoming" are relative to it
    pub as_of: NaiveDate,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
    #[serde(default)]
    pub founders: Vec<Founder>,
    #[serde(default)]
    pub projects: Vec<ProjectFinancials>,
    #[serde(default)]
    pub distributions: Vec<Distribution>,
    /// Monthly allowance per expense category
    #[serde(default)]
    pub budgets: Vec<CategoryBudget>,
    /// Trailing revenue figure (treated as a yearly total)
    #[serde(default)]
    pub total_revenue: Cents,
    /// Days covered by `expenses`, used for the daily burn average
    #[serde(default = "default_period_days")]
    pub period_days: u32,
}

impl Snapshot {
    /// An empty snapshot for the given date
    pub fn empty(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            accounts: Vec::new(),
            expenses: Vec::new(),
            subscriptions: Vec::new(),
            founders: Vec::new(),
            projects: Vec::new(),
            distributions: Vec::new(),
            budgets: Vec::new(),
            total_revenue: 0,
            period_days: default_period_days(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(content)?;
        tracing::debug!(
            accounts = snapshot.accounts.len(),
            expenses = snapshot.expenses.len(),
            subscriptions = snapshot.subscriptions.len(),
            founders = snapshot.founders.len(),
            projects = snapshot.projects.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sum of all account balances, saturating at the `i64` bounds
    pub fn company_balance(&self) -> Cents {
        self.accounts
            .iter()
            .fold(0, |acc: Cents, a| acc.saturating_add(a.balance))
    }

    /// Balance of one account, or of the whole company when `account` is `None`
    pub fn starting_balance(&self, account: Option<&str>) -> Result<Cents> {
        match account {
            None => Ok(self.company_balance()),
            Some(id) => self
                .accounts
                .iter()
                .find(|a| a.id == id)
                .map(|a| a.balance)
                .ok_or_else(|| Error::NotFound(format!("account {}", id))),
        }
    }
}
