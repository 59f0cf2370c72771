//! Cash-flow projection and subscription billing schedule
//!
//! The projection is a deliberately naive linear simulation (constant revenue and
//! expenses, no seasonality) meant as a directional early-warning signal. A
//! [`Scenario`] scales both sides before projecting.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{BillingCycle, Cents, Subscription};
use crate::money::out_of_range;

/// Upper bound on the projection horizon
pub const MAX_PROJECTION_MONTHS: u32 = 120;

/// Default projection horizon
pub const DEFAULT_PROJECTION_MONTHS: u32 = 12;

/// Forecast assumption applied to monthly revenue and expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Revenue at 70%, expenses at 120%
    Conservative,
    /// Figures as recorded
    #[default]
    Moderate,
    /// Revenue at 130%, expenses at 80%
    Optimistic,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Moderate => "moderate",
            Self::Optimistic => "optimistic",
        }
    }

    /// Revenue and expense multipliers, in percent
    pub fn multipliers(&self) -> (i64, i64) {
        match self {
            Self::Conservative => (70, 120),
            Self::Moderate => (100, 100),
            Self::Optimistic => (130, 80),
        }
    }

    /// Scaled `(monthly_revenue, monthly_expenses)`, each floored to a minor unit
    pub fn apply(
        &self,
        monthly_revenue: Cents,
        monthly_expenses: Cents,
    ) -> Result<(Cents, Cents)> {
        let (revenue_pct, expense_pct) = self.multipliers();
        Ok((
            scale(monthly_revenue, revenue_pct)?,
            scale(monthly_expenses, expense_pct)?,
        ))
    }
}

fn scale(amount: Cents, percent: i64) -> Result<Cents> {
    let scaled = (i128::from(amount) * i128::from(percent)).div_euclid(100);
    Cents::try_from(scaled).map_err(|_| out_of_range())
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "conservative" => Ok(Self::Conservative),
            "moderate" => Ok(Self::Moderate),
            "optimistic" => Ok(Self::Optimistic),
            _ => Err(Error::validation(format!(
                "unknown scenario {:?} (expected conservative, moderate or optimistic)",
                s
            ))),
        }
    }
}

/// Health of a projected month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowStatus {
    /// Cumulative balance above zero
    Healthy,
    /// Cumulative balance at or below zero
    Critical,
}

impl CashFlowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Critical => "critical",
        }
    }
}

/// One month of a cash-flow projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionPoint {
    /// 1-based month offset from now
    pub month_index: u32,
    pub revenue: Cents,
    pub expenses: Cents,
    pub net_cash_flow: Cents,
    pub cumulative_balance: Cents,
    pub status: CashFlowStatus,
}

fn check_horizon(months: u32) -> Result<()> {
    if months > MAX_PROJECTION_MONTHS {
        return Err(Error::validation(format!(
            "projection horizon of {} months exceeds the maximum of {}",
            months, MAX_PROJECTION_MONTHS
        )));
    }
    Ok(())
}

/// Project month-by-month balances from constant monthly revenue and expenses
pub fn project_cash_flow(
    current_balance: Cents,
    monthly_expenses: Cents,
    monthly_revenue: Cents,
    months: u32,
) -> Result<Vec<ProjectionPoint>> {
    check_horizon(months)?;

    let net_cash_flow = monthly_revenue
        .checked_sub(monthly_expenses)
        .ok_or_else(out_of_range)?;
    let mut balance = current_balance;
    let mut points = Vec::with_capacity(months as usize);

    for month_index in 1..=months {
        balance = balance.checked_add(net_cash_flow).ok_or_else(out_of_range)?;
        points.push(ProjectionPoint {
            month_index,
            revenue: monthly_revenue,
            expenses: monthly_expenses,
            net_cash_flow,
            cumulative_balance: balance,
            status: if balance > 0 {
                CashFlowStatus::Healthy
            } else {
                CashFlowStatus::Critical
            },
        });
    }

    tracing::debug!(
        months,
        net_cash_flow,
        final_balance = balance,
        "Cash flow projected"
    );

    Ok(points)
}

/// First projected month whose balance is critical
pub fn first_critical_month(points: &[ProjectionPoint]) -> Option<u32> {
    points
        .iter()
        .find(|p| p.status == CashFlowStatus::Critical)
        .map(|p| p.month_index)
}

/// A subscription charge falling in a scheduled month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledPayment {
    pub subscription_id: String,
    pub name: String,
    pub amount: Cents,
    pub date: NaiveDate,
}

/// All subscription charges in one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledMonth {
    pub year: i32,
    pub month: u32,
    pub payments: Vec<ScheduledPayment>,
    pub total: Cents,
}

impl ScheduledMonth {
    /// `YYYY-MM` label
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Charges of active subscriptions for `months` calendar months starting at `start`'s month
///
/// Each subscription's billing date is advanced by its cycle from `next_billing_date`.
/// Subscriptions without a billing date are skipped; one-time charges appear once.
pub fn billing_schedule(
    subscriptions: &[Subscription],
    start: NaiveDate,
    months: u32,
) -> Result<Vec<ScheduledMonth>> {
    check_horizon(months)?;

    let window_start = first_of_month(start);
    let mut schedule: Vec<ScheduledMonth> = (0..months)
        .filter_map(|offset| window_start.checked_add_months(Months::new(offset)))
        .map(|d| ScheduledMonth {
            year: d.year(),
            month: d.month(),
            payments: Vec::new(),
            total: 0,
        })
        .collect();

    let Some(window_end) = window_start.checked_add_months(Months::new(months)) else {
        return Ok(schedule);
    };

    for sub in subscriptions.iter().filter(|s| s.active) {
        let cycle = sub.cycle()?;
        let amount = sub.checked_amount()?;
        let Some(first_charge) = sub.next_billing_date else {
            continue;
        };

        let mut charge = first_charge;
        while charge < window_end {
            if charge >= window_start {
                let offset = (charge.year() - window_start.year()) * 12
                    + charge.month() as i32
                    - window_start.month() as i32;
                if let Some(slot) = schedule.get_mut(offset as usize) {
                    slot.payments.push(ScheduledPayment {
                        subscription_id: sub.id.clone(),
                        name: sub.name.clone(),
                        amount,
                        date: charge,
                    });
                    slot.total = slot.total.checked_add(amount).ok_or_else(out_of_range)?;
                }
            }

            let next = match cycle {
                BillingCycle::OneTime => None,
                recurring => recurring
                    .interval_months()
                    .and_then(|n| charge.checked_add_months(Months::new(n))),
            };
            match next {
                Some(date) => charge = date,
                None => break,
            }
        }
    }

    for slot in &mut schedule {
        slot.payments.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.subscription_id.cmp(&b.subscription_id))
        });
    }

    Ok(schedule)
}
