//! Recurring-revenue normalization
//!
//! Converts subscriptions with heterogeneous billing cycles into one monthly-equivalent
//! figure (MRR). Amounts are accumulated on a yearly basis and divided once, so the
//! result is independent of how many quarterly/annual plans are in the mix.

use serde::Serialize;

use crate::error::Result;
use crate::models::{Cents, Subscription};
use crate::money::{checked_sum, out_of_range};

/// Months per year
const MONTHS_PER_YEAR: i64 = 12;

/// MRR and its annualized impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecurringRevenue {
    pub mrr: Cents,
    pub annual_mrr_impact: Cents,
    /// Active subscriptions that contributed
    pub active_subscriptions: usize,
}

/// Yearly total charged by one subscription
fn annualized(subscription: &Subscription) -> Result<Cents> {
    let cycle = subscription.cycle()?;
    subscription
        .checked_amount()?
        .checked_mul(cycle.charges_per_year())
        .ok_or_else(out_of_range)
}

/// Monthly-equivalent amount of a single subscription (floored)
///
/// One-time subscriptions are not recurring and contribute 0.
pub fn monthly_equivalent(subscription: &Subscription) -> Result<Cents> {
    Ok(annualized(subscription)?.div_euclid(MONTHS_PER_YEAR))
}

/// Monthly Recurring Revenue over the active subscriptions
///
/// Inactive subscriptions are skipped before their cycle is parsed. An unsupported
/// cycle or a negative amount on an active subscription is a validation error.
pub fn monthly_recurring_revenue(subscriptions: &[Subscription]) -> Result<Cents> {
    let yearly = subscriptions
        .iter()
        .filter(|s| s.active)
        .map(annualized)
        .collect::<Result<Vec<_>>>()?;
    Ok(checked_sum(yearly)?.div_euclid(MONTHS_PER_YEAR))
}

pub fn annual_mrr_impact(mrr: Cents) -> Cents {
    mrr * MONTHS_PER_YEAR
}

/// MRR, annual impact and contributing subscription count
pub fn recurring_revenue(subscriptions: &[Subscription]) -> Result<RecurringRevenue> {
    let mrr = monthly_recurring_revenue(subscriptions)?;
    let active_subscriptions = subscriptions.iter().filter(|s| s.active).count();

    tracing::debug!(mrr, active_subscriptions, "Recurring revenue normalized");

    Ok(RecurringRevenue {
        mrr,
        annual_mrr_impact: annual_mrr_impact(mrr),
        active_subscriptions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::subscription;

    #[test]
    fn test_mixed_cycles() {
        let subs = vec![
            subscription("s1", 12_000, "annual", None),
            subscription("s2", 3_000, "monthly", None),
        ];
        let revenue = recurring_revenue(&subs).unwrap();
        assert_eq!(revenue.mrr, 4_000);
        assert_eq!(revenue.annual_mrr_impact, 48_000);
        assert_eq!(revenue.active_subscriptions, 2);
    }

    #[test]
    fn test_quarterly_is_divided_by_three() {
        let subs = vec![subscription("q", 9_000, "quarterly", None)];
        assert_eq!(monthly_recurring_revenue(&subs).unwrap(), 3_000);
    }

    #[test]
    fn test_no_drift_across_many_plans() {
        // Three annual plans of 100 each: 300 / 12 = 25, not 3 * floor(100 / 12) = 24
        let subs = vec![
            subscription("a", 100, "annual", None),
            subscription("b", 100, "annual", None),
            subscription("c", 100, "annual", None),
        ];
        assert_eq!(monthly_recurring_revenue(&subs).unwrap(), 25);
    }

    #[test]
    fn test_inactive_excluded() {
        let mut inactive = subscription("s1", 5_000, "monthly", None);
        inactive.active = false;
        let subs = vec![inactive, subscription("s2", 1_000, "monthly", None)];
        assert_eq!(monthly_recurring_revenue(&subs).unwrap(), 1_000);
    }

    #[test]
    fn test_inactive_with_unknown_cycle_is_ignored() {
        let mut inactive = subscription("s1", 5_000, "fortnightly", None);
        inactive.active = false;
        assert_eq!(monthly_recurring_revenue(&[inactive]).unwrap(), 0);
    }

    #[test]
    fn test_unknown_cycle_fails() {
        let subs = vec![subscription("s1", 5_000, "biweekly", None)];
        let err = monthly_recurring_revenue(&subs).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("s1"));
    }

    #[test]
    fn test_one_time_contributes_nothing() {
        let sub = subscription("once", 50_000, "one_time", None);
        assert_eq!(monthly_equivalent(&sub).unwrap(), 0);
        assert_eq!(monthly_recurring_revenue(&[sub]).unwrap(), 0);
    }

    #[test]
    fn test_negative_amount_fails() {
        let subs = vec![subscription("neg", -12_000, "monthly", None)];
        let err = monthly_recurring_revenue(&subs).unwrap_err();
        assert!(err.is_validation());
        assert!(monthly_equivalent(&subs[0]).is_err());
    }

    #[test]
    fn test_overflow_is_error_not_panic() {
        let huge = vec![subscription("huge", i64::MAX / 6, "monthly", None)];
        assert!(monthly_recurring_revenue(&huge).unwrap_err().is_validation());

        let many = vec![
            subscription("a", i64::MAX - 1, "annual", None),
            subscription("b", i64::MAX - 1, "annual", None),
        ];
        assert!(monthly_recurring_revenue(&many).unwrap_err().is_validation());
    }

    #[test]
    fn test_empty_is_zero() {
        let revenue = recurring_revenue(&[]).unwrap();
        assert_eq!(revenue.mrr, 0);
        assert_eq!(revenue.annual_mrr_impact, 0);
    }
}
