//! Minor-unit conversion and display helpers

use crate::error::{Error, Result};
use crate::models::Cents;

/// Minor units per major unit
pub const MINOR_PER_MAJOR: i64 = 100;

/// Convert a major-unit amount (as typed into a form) to minor units
///
/// Rounds to the nearest minor unit so `19.99` becomes `1999`, not `1998`.
pub fn to_minor_units(major: f64) -> Result<Cents> {
    if !major.is_finite() {
        return Err(Error::validation(format!(
            "amount must be a finite number, got {}",
            major
        )));
    }
    let minor = (major * MINOR_PER_MAJOR as f64).round();
    if minor.abs() > i64::MAX as f64 {
        return Err(Error::validation(format!("amount out of range: {}", major)));
    }
    Ok(minor as Cents)
}

/// Error for arithmetic that leaves the minor-unit range
pub fn out_of_range() -> Error {
    Error::validation("amount out of range")
}

/// Overflow-checked sum of amounts
pub fn checked_sum<I>(amounts: I) -> Result<Cents>
where
    I: IntoIterator<Item = Cents>,
{
    amounts
        .into_iter()
        .try_fold(0, |acc: Cents, amount| acc.checked_add(amount).ok_or_else(out_of_range))
}

/// Format minor units for display, e.g. `Rs. 1,234.50` or `USD -12.00`
pub fn format_money(amount: Cents, currency: &str) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    let major = abs / MINOR_PER_MAJOR as u64;
    let minor = abs % MINOR_PER_MAJOR as u64;

    let digits = major.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let prefix = match currency {
        "PKR" => "Rs.",
        other => other,
    };
    format!("{} {}{}.{:02}", prefix, sign, grouped, minor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(500.0).unwrap(), 50_000);
        assert_eq!(to_minor_units(19.99).unwrap(), 1999);
        assert_eq!(to_minor_units(0.1).unwrap(), 10);
        assert_eq!(to_minor_units(-2.5).unwrap(), -250);
        assert!(to_minor_units(f64::INFINITY).unwrap_err().is_validation());
    }

    #[test]
    fn test_checked_sum() {
        assert_eq!(checked_sum([1, 2, 3]).unwrap(), 6);
        assert_eq!(checked_sum(std::iter::empty()).unwrap(), 0);
        let err = checked_sum([i64::MAX, 1]).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(123_456_789, "USD"), "USD 1,234,567.89");
        assert_eq!(format_money(50_000, "PKR"), "Rs. 500.00");
        assert_eq!(format_money(-1_200, "EUR"), "EUR -12.00");
        assert_eq!(format_money(5, "USD"), "USD 0.05");
    }
}
