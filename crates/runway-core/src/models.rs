//! Domain models for Runway
//!
//! All monetary amounts are integer minor units ([`Cents`]). Records in this module are
//! read-only inputs owned by the caller; the engine never mutates them except through
//! the distribution confirmation step.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};

/// Amount in the smallest currency unit (e.g. cents or paisa)
pub type Cents = i64;

/// Basis points in 100%
const FULL_BASIS_POINTS: i64 = 10_000;

/// A validated percentage in the 0–100 range, stored as basis points
///
/// Resolution is 0.01%; finer values are rejected rather than rounded. Integral percentages behave exactly like the plain `x * p / 100` integer formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Percent(u16);

impl Percent {
    pub const ZERO: Percent = Percent(0);
    pub const HUNDRED: Percent = Percent(10_000);

    /// Validate a percentage value (0–100, finite)
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::validation(format!(
                "percentage must be a finite number, got {}",
                value
            )));
        }
        if !(0.0..=100.0).contains(&value) {
            return Err(Error::validation(format!(
                "percentage must be between 0 and 100, got {}",
                value
            )));
        }
        let scaled = value * 100.0;
        let basis_points = scaled.round();
        if (scaled - basis_points).abs() > 1e-6 {
            return Err(Error::validation(format!(
                "percentage supports at most 2 decimal places, got {}",
                value
            )));
        }
        Ok(Percent(basis_points as u16))
    }

    /// Build from an integral percentage (panics are impossible: clamps to 100)
    pub const fn whole(value: u8) -> Self {
        let value = if value > 100 { 100 } else { value };
        Percent(value as u16 * 100)
    }

    pub fn basis_points(&self) -> u16 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// `floor(amount * self / 100)`, computed in 128-bit integers
    pub fn floor_share(&self, amount: Cents) -> Cents {
        let product = i128::from(amount) * i128::from(self.0);
        product.div_euclid(i128::from(FULL_BASIS_POINTS)) as Cents
    }
}

impl TryFrom<f64> for Percent {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Percent::new(value)
    }
}

impl From<Percent> for f64 {
    fn from(p: Percent) -> f64 {
        p.as_f64()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{:.2}%", self.as_f64())
        }
    }
}

/// A bank or wallet ledger snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub balance: Cents,
}

/// A recorded company expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    /// Free-form tag as entered; see [`ExpenseCategory::parse`]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub amount: Cents,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
}

impl Expense {
    /// Normalized category of this expense
    pub fn category(&self) -> ExpenseCategory {
        ExpenseCategory::parse(&self.category)
    }
}

/// Expense categories known to the dashboard, with a fallback for free-form tags
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExpenseCategory {
    Salary,
    Marketing,
    Operations,
    Technology,
    Infrastructure,
    Legal,
    Accounting,
    Utilities,
    Rent,
    Travel,
    Meals,
    Entertainment,
    OfficeSupplies,
    Equipment,
    Domain,
    /// Any other tag, holding its normalized label
    Other(String),
}

impl ExpenseCategory {
    /// Lower-case, trim and collapse separators (whitespace, `-`, `_`) into single `_`
    pub fn normalize(raw: &str) -> String {
        raw.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Map a raw tag onto a category; never fails
    pub fn parse(raw: &str) -> Self {
        let normalized = Self::normalize(raw);
        match normalized.as_str() {
            "salary" => Self::Salary,
            "marketing" => Self::Marketing,
            "operations" => Self::Operations,
            "technology" => Self::Technology,
            "infrastructure" => Self::Infrastructure,
            "legal" => Self::Legal,
            "accounting" => Self::Accounting,
            "utilities" => Self::Utilities,
            "rent" => Self::Rent,
            "travel" => Self::Travel,
            "meals" => Self::Meals,
            "entertainment" => Self::Entertainment,
            "office_supplies" => Self::OfficeSupplies,
            "equipment" => Self::Equipment,
            "domain" => Self::Domain,
            "" => Self::Other("other".to_string()),
            _ => Self::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Salary => "salary",
            Self::Marketing => "marketing",
            Self::Operations => "operations",
            Self::Technology => "technology",
            Self::Infrastructure => "infrastructure",
            Self::Legal => "legal",
            Self::Accounting => "accounting",
            Self::Utilities => "utilities",
            Self::Rent => "rent",
            Self::Travel => "travel",
            Self::Meals => "meals",
            Self::Entertainment => "entertainment",
            Self::OfficeSupplies => "office_supplies",
            Self::Equipment => "equipment",
            Self::Domain => "domain",
            Self::Other(label) => label,
        }
    }

    /// Human-readable label ("office_supplies" -> "office supplies")
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ExpenseCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Subscription billing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Monthly,
    Quarterly,
    Annual,
    /// Billed once; not recurring revenue
    OneTime,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annual => "annual",
            Self::OneTime => "one_time",
        }
    }

    /// Months between charges, `None` for one-time billing
    pub fn interval_months(&self) -> Option<u32> {
        match self {
            Self::Monthly => Some(1),
            Self::Quarterly => Some(3),
            Self::Annual => Some(12),
            Self::OneTime => None,
        }
    }

    /// Charges per year
    pub fn charges_per_year(&self) -> i64 {
        match self {
            Self::Monthly => 12,
            Self::Quarterly => 4,
            Self::Annual => 1,
            Self::OneTime => 0,
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "annual" | "yearly" => Ok(Self::Annual),
            "one_time" | "one-time" => Ok(Self::OneTime),
            _ => Err(Error::validation(format!(
                "unsupported billing cycle: {:?}",
                s
            ))),
        }
    }
}

/// A recurring subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub amount: Cents,
    /// Billing cycle as entered; validated by [`Subscription::cycle`]
    pub billing_cycle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_billing_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Subscription {
    /// Charge amount, rejected when negative
    pub fn checked_amount(&self) -> Result<Cents> {
        if self.amount < 0 {
            return Err(Error::validation(format!(
                "subscription {} has negative amount {}",
                self.id, self.amount
            )));
        }
        Ok(self.amount)
    }

    pub fn cycle(&self) -> Result<BillingCycle> {
        self.billing_cycle.parse().map_err(|e| match e {
            Error::Validation(msg) => {
                Error::Validation(format!("subscription {}: {}", self.id, msg))
            }
            other => other,
        })
    }
}

fn default_alert_threshold() -> f64 {
    80.0
}

/// Monthly spending allowance for one expense category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBudget {
    /// Free-form tag, normalized like [`Expense::category`]
    pub category: String,
    pub allocated: Cents,
    /// Usage percentage at which the category is flagged
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: f64,
}

impl CategoryBudget {
    pub fn category(&self) -> ExpenseCategory {
        ExpenseCategory::parse(&self.category)
    }
}

/// Founder participation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FounderStatus {
    Active,
    Inactive,
}

impl FounderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// A company founder with a profit share and running cash totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Founder {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Share of distributable profit, 0–100
    pub profit_share_percentage: f64,
    pub status: FounderStatus,
    /// Cumulative cash put into the company
    #[serde(default)]
    pub total_contributions: Cents,
    /// Cumulative cash paid out; only changed by distribution confirmation
    #[serde(default)]
    pub total_distributions: Cents,
}

impl Founder {
    pub fn is_active(&self) -> bool {
        self.status == FounderStatus::Active
    }

    /// Validated profit share
    pub fn share(&self) -> Result<Percent> {
        Percent::new(self.profit_share_percentage).map_err(|e| match e {
            Error::Validation(msg) => Error::Validation(format!("founder {}: {}", self.id, msg)),
            other => other,
        })
    }
}

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Active => "active",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// When project profit is recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionPoint {
    /// Profit = amount received - direct costs
    #[default]
    Received,
    /// Profit = contract value - direct costs
    Contract,
}

/// Financial summary of a client project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFinancials {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    pub status: ProjectStatus,
    pub contract_value: Cents,
    #[serde(default)]
    pub amount_received: Cents,
    #[serde(default)]
    pub amount_pending: Cents,
    #[serde(default)]
    pub direct_costs: Cents,
    #[serde(default)]
    pub recognition: RecognitionPoint,
}

impl ProjectFinancials {
    pub fn is_completed(&self) -> bool {
        self.status == ProjectStatus::Completed
    }

    pub fn net_profit(&self) -> Cents {
        match self.recognition {
            RecognitionPoint::Received => self.amount_received.saturating_sub(self.direct_costs),
            RecognitionPoint::Contract => self.contract_value.saturating_sub(self.direct_costs),
        }
    }

    /// Net profit as a percentage of contract value; `None` for a zero contract
    pub fn profit_margin(&self) -> Option<f64> {
        if self.contract_value == 0 {
            return None;
        }
        Some(self.net_profit() as f64 / self.contract_value as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_validation() {
        assert!(Percent::new(-1.0).unwrap_err().is_validation());
        assert!(Percent::new(100.5).is_err());
        assert!(Percent::new(f64::NAN).is_err());
        assert_eq!(Percent::new(20.0).unwrap().basis_points(), 2000);
        assert_eq!(Percent::new(33.33).unwrap().basis_points(), 3333);
        assert_eq!(Percent::whole(20), Percent::new(20.0).unwrap());
        assert_eq!(Percent::new(33.34).unwrap().basis_points(), 3334);
    }

    #[test]
    fn test_percent_rejects_sub_basis_point_values() {
        let err = Percent::new(12.345).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("2 decimal places"));
        assert!(Percent::new(0.001).is_err());
        assert_eq!(Percent::new(12.34).unwrap().floor_share(1_000_000), 123_400);
    }

    #[test]
    fn test_subscription_negative_amount_rejected() {
        let sub: Subscription = serde_json::from_str(
            r#"{"id":"neg","amount":-12000,"billing_cycle":"monthly"}"#,
        )
        .unwrap();
        let err = sub.checked_amount().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("neg"));
    }

    #[test]
    fn test_percent_floor_share() {
        let p = Percent::whole(20);
        assert_eq!(p.floor_share(100_000), 20_000);
        assert_eq!(p.floor_share(99), 19);
        assert_eq!(Percent::new(33.33).unwrap().floor_share(100), 33);
        assert_eq!(Percent::ZERO.floor_share(12345), 0);
        assert_eq!(Percent::HUNDRED.floor_share(12345), 12345);
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(Percent::whole(20).to_string(), "20%");
        assert_eq!(Percent::new(12.5).unwrap().to_string(), "12.50%");
    }

    #[test]
    fn test_category_normalization_merges_variants() {
        assert_eq!(
            ExpenseCategory::parse("Cloud Hosting"),
            ExpenseCategory::parse("  cloud   hosting ")
        );
        assert_eq!(
            ExpenseCategory::parse("Cloud Hosting"),
            ExpenseCategory::Other("cloud_hosting".to_string())
        );
        assert_eq!(
            ExpenseCategory::parse("Office Supplies"),
            ExpenseCategory::OfficeSupplies
        );
        assert_eq!(ExpenseCategory::parse("RENT"), ExpenseCategory::Rent);
        assert_eq!(
            ExpenseCategory::parse("   "),
            ExpenseCategory::Other("other".to_string())
        );
        assert_eq!(ExpenseCategory::OfficeSupplies.label(), "office supplies");
    }

    #[test]
    fn test_billing_cycle_parsing() {
        assert_eq!(
            "Monthly".parse::<BillingCycle>().unwrap(),
            BillingCycle::Monthly
        );
        assert_eq!(
            "yearly".parse::<BillingCycle>().unwrap(),
            BillingCycle::Annual
        );
        assert_eq!(
            "one_time".parse::<BillingCycle>().unwrap(),
            BillingCycle::OneTime
        );
        let err = "biweekly".parse::<BillingCycle>().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_project_profit_and_margin() {
        let mut project = ProjectFinancials {
            id: "p1".to_string(),
            name: "Site".to_string(),
            client_name: None,
            status: ProjectStatus::Completed,
            contract_value: 200_000,
            amount_received: 150_000,
            amount_pending: 50_000,
            direct_costs: 50_000,
            recognition: RecognitionPoint::Received,
        };
        assert_eq!(project.net_profit(), 100_000);
        assert_eq!(project.profit_margin(), Some(50.0));

        project.recognition = RecognitionPoint::Contract;
        assert_eq!(project.net_profit(), 150_000);

        project.contract_value = 0;
        assert_eq!(project.profit_margin(), None);
    }

    #[test]
    fn test_founder_deserializes_with_defaults() {
        let founder: Founder = serde_json::from_str(
            r#"{"id":"f1","name":"Ana","profit_share_percentage":50,"status":"active"}"#,
        )
        .unwrap();
        assert!(founder.is_active());
        assert_eq!(founder.total_distributions, 0);
        assert_eq!(founder.share().unwrap(), Percent::whole(50));
    }
}
