//! Burn & runway calculations
//!
//! Every division here guards its zero denominator and returns a typed value
//! ([`Runway::Infinite`], `None`) instead of leaking NaN or infinity to callers.

use std::fmt;

use serde::Serialize;

use crate::models::Cents;

/// Days used for the calendar-independent monthly estimate
pub const DAYS_PER_MONTH_ESTIMATE: i64 = 30;

/// How long the current balance lasts at the current burn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "months", rename_all = "snake_case")]
pub enum Runway {
    /// Months until the balance reaches zero
    Finite(f64),
    /// Break-even or profitable: the balance never runs out
    Infinite,
}

impl Runway {
    pub fn is_infinite(&self) -> bool {
        matches!(self, Runway::Infinite)
    }

    pub fn months(&self) -> Option<f64> {
        match self {
            Runway::Finite(m) => Some(*m),
            Runway::Infinite => None,
        }
    }

    /// True only for a finite runway shorter than `months`
    pub fn is_shorter_than(&self, months: f64) -> bool {
        self.months().is_some_and(|m| m < months)
    }
}

impl fmt::Display for Runway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Runway::Finite(m) => write!(f, "{:.1}", m),
            Runway::Infinite => write!(f, "∞"),
        }
    }
}

/// Monthly equivalent of a trailing-year revenue figure
pub fn monthly_revenue_equivalent(total_revenue: Cents) -> Cents {
    total_revenue.div_euclid(12)
}

/// Net monthly cash burn; positive means burning, zero or negative means profitable
pub fn cash_burn(monthly_expenses: Cents, monthly_revenue: Cents) -> Cents {
    monthly_expenses - monthly_revenue
}

/// Months of runway for `balance` at a signed monthly `burn`
///
/// A negative balance with positive burn has no runway left and reports zero months.
pub fn runway_months(balance: Cents, burn: Cents) -> Runway {
    if burn <= 0 {
        return Runway::Infinite;
    }
    let months = balance as f64 / burn as f64;
    Runway::Finite(months.max(0.0))
}

/// Average spend per day over `elapsed_days`; `None` when no days elapsed
pub fn average_daily_burn(total_expenses: Cents, elapsed_days: u32) -> Option<Cents> {
    if elapsed_days == 0 {
        return None;
    }
    Some(total_expenses.div_euclid(i64::from(elapsed_days)))
}

/// Daily burn scaled to a 30-day month
pub fn projected_monthly_expenses(daily_burn: Option<Cents>) -> Option<Cents> {
    daily_burn.map(|d| d * DAYS_PER_MONTH_ESTIMATE)
}
