//! Runway Core Library
//!
//! Financial analytics and profit distribution for a small company dashboard:
//! - Expense aggregation by normalized category, with category budgets
//! - MRR normalization across billing cycles
//! - Burn rate and runway
//! - Scenario cash-flow projection and subscription billing schedule
//! - Founder profit distribution with confirmation and balances
//! - Rule-based insight alerts
//! - TOML engine configuration
//!
//! Every computation is a pure function over a caller-owned [`Snapshot`]; the only
//! mutation is [`distribution::confirm_distribution`], applied to founder records the
//! caller passes in.

pub mod aggregate;
pub mod burn;
pub mod config;
pub mod distribution;
pub mod error;
pub mod insights;
pub mod metrics;
pub mod models;
pub mod money;
pub mod projection;
pub mod revenue;
pub mod snapshot;

/// Record fixtures for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{BudgetStatus, BudgetUsage, CategoryTotal, ExpenseSummary};
pub use burn::Runway;
pub use config::{EngineConfig, InsightThresholds};
pub use distribution::{
    calculate_distribution, confirm_distribution, founder_balances, Distribution,
    DistributionPreview, DistributionRequest, FounderBalance, FounderBalanceSummary,
    FounderShare, ProfitSource,
};
pub use error::{Error, Result};
pub use insights::{Alert, AlertKind, InsightContext, InsightEngine, InsightRule, Severity};
pub use metrics::{build_insight_context, compute_metrics, FinancialMetrics};
pub use models::{
    Account, BillingCycle, CategoryBudget, Cents, Expense, ExpenseCategory, Founder,
    FounderStatus, Percent, ProjectFinancials, ProjectStatus, RecognitionPoint, Subscription,
};
pub use projection::{CashFlowStatus, ProjectionPoint, Scenario, ScheduledMonth, ScheduledPayment};
pub use revenue::RecurringRevenue;
pub use snapshot::Snapshot;
