//! Insight Engine - Smart Financial Alerts
//!
//! A pluggable rule evaluator that turns the current financial picture into a short,
//! ranked list of alerts. Instead of waiting for someone to notice the runway
//! shrinking, it surfaces what's concerning, upcoming or going well.
//!
//! ## Built-in Rules
//!
//! - **Low Cash** - balance below the configured floor (error)
//! - **Low Runway** - finite runway under the warning horizon (warning)
//! - **High Burn** - monthly spend above a share of revenue (warning)
//! - **Upcoming Bills** - subscriptions billing within a few days (info)
//! - **Strong Margins** - profit margin above target (success)
//! - **High Category** - one category dominating monthly spend (info)
//! - **Over Budget** - budgeted categories at or past their alert threshold (warning/info)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use runway_core::insights::InsightEngine;
//! use runway_core::metrics::{build_insight_context, compute_metrics};
//!
//! let metrics = compute_metrics(&snapshot)?;
//! let ctx = build_insight_context(&metrics, &snapshot, &config);
//! let alerts = InsightEngine::new().evaluate_all(&ctx);
//! ```

pub mod engine;
pub mod rules;
pub mod types;

pub use engine::{InsightContext, InsightEngine, InsightRule};
pub use rules::{
    HighBurnRule, HighCategoryRule, LowCashRule, LowRunwayRule, OverBudgetRule,
    StrongMarginsRule, UpcomingBillsRule,
};
pub use types::{Alert, AlertKind, Severity};
