//! Test fixtures for runway-core
//!
//! Small record builders shared by unit tests here and by the CLI tests (via the
//! `test-utils` feature). Panics on malformed literal input are intentional.

use chrono::{DateTime, NaiveDate, Utc};

use crate::distribution::{Distribution, DistributionItem, DistributionSource};
use crate::models::{
    Account, CategoryBudget, Cents, Expense, Founder, FounderStatus, ProjectFinancials,
    ProjectStatus, RecognitionPoint, Subscription,
};
use crate::snapshot::Snapshot;

/// Parse a `YYYY-MM-DD` literal
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid YYYY-MM-DD date literal")
}

pub fn account(id: &str, balance: Cents) -> Account {
    Account {
        id: id.to_string(),
        name: format!("{} account", id),
        balance,
    }
}

pub fn expense(id: &str, category: &str, amount: Cents, on: &str) -> Expense {
    Expense {
        id: id.to_string(),
        category: category.to_string(),
        description: format!("{} expense", category),
        amount,
        date: date(on),
        vendor: None,
    }
}

pub fn subscription(
    id: &str,
    amount: Cents,
    billing_cycle: &str,
    next_billing_date: Option<&str>,
) -> Subscription {
    Subscription {
        id: id.to_string(),
        name: id.to_uppercase(),
        amount,
        billing_cycle: billing_cycle.to_string(),
        next_billing_date: next_billing_date.map(date),
        active: true,
    }
}

pub fn budget(category: &str, allocated: Cents, alert_threshold: f64) -> CategoryBudget {
    CategoryBudget {
        category: category.to_string(),
        allocated,
        alert_threshold,
    }
}

/// An active founder with no contributions or payouts yet
pub fn founder(id: &str, share: f64) -> Founder {
    Founder {
        id: id.to_string(),
        name: format!("Founder {}", id.to_uppercase()),
        email: None,
        profit_share_percentage: share,
        status: FounderStatus::Active,
        total_contributions: 0,
        total_distributions: 0,
    }
}

/// A project fully paid at `received`, so profit is `received - direct_costs`
pub fn project(
    id: &str,
    status: ProjectStatus,
    received: Cents,
    direct_costs: Cents,
) -> ProjectFinancials {
    ProjectFinancials {
        id: id.to_string(),
        name: format!("Project {}", id),
        client_name: None,
        status,
        contract_value: received,
        amount_received: received,
        amount_pending: 0,
        direct_costs,
        recognition: RecognitionPoint::Received,
    }
}

/// A confirmed manual distribution paying the given founder amounts
pub fn distribution_record(id: &str, items: &[(&str, Cents)]) -> Distribution {
    let paid: Cents = items.iter().map(|(_, amount)| amount).sum();
    Distribution {
        id: id.to_string(),
        fingerprint: format!("fp-{}", id),
        source: DistributionSource::Manual { amount: paid },
        total_profit: paid,
        company_retention: 0,
        items: items
            .iter()
            .map(|(founder_id, net_amount)| DistributionItem {
                founder_id: founder_id.to_string(),
                net_amount: *net_amount,
            })
            .collect(),
        period: "2024-01".to_string(),
        notes: String::new(),
        confirmed_at: DateTime::<Utc>::from_timestamp(1_704_067_200, 0).unwrap_or_default(),
    }
}

/// A small but complete company snapshot as of 2024-06-15
///
/// Balance 600,000; June expenses 200,000; trailing revenue 600,000 (50,000 / month);
/// three founders at 50/30/20; one completed project worth 100,000 profit; June rent
/// over its 40,000 budget.
pub fn sample_snapshot() -> Snapshot {
    Snapshot {
        as_of: date("2024-06-15"),
        accounts: vec![account("bank", 450_000), account("wallet", 150_000)],
        expenses: vec![
            expense("e1", "Salary", 120_000, "2024-06-01"),
            expense("e2", "Rent", 50_000, "2024-06-03"),
            expense("e3", "cloud hosting", 30_000, "2024-06-10"),
            expense("e4", "Salary", 120_000, "2024-05-01"),
        ],
        subscriptions: vec![
            subscription("hosting", 12_000, "annual", Some("2024-06-20")),
            subscription("crm", 3_000, "monthly", Some("2024-07-01")),
        ],
        founders: vec![founder("a", 50.0), founder("b", 30.0), founder("c", 20.0)],
        projects: vec![
            project("p1", ProjectStatus::Completed, 150_000, 50_000),
            project("p2", ProjectStatus::Active, 80_000, 10_000),
        ],
        distributions: Vec::new(),
        budgets: vec![budget("Salary", 250_000, 80.0), budget("rent", 40_000, 90.0)],
        total_revenue: 600_000,
        period_days: 365,
    }
}
