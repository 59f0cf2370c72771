//! Core types for the Insight Engine

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// The rule that produced an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertKind {
    LowCash,
    LowRunway,
    HighBurn,
    UpcomingBills,
    StrongMargins,
    HighCategory,
    OverBudget,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::LowCash => "low-cash",
            AlertKind::LowRunway => "low-runway",
            AlertKind::HighBurn => "high-burn",
            AlertKind::UpcomingBills => "upcoming-bills",
            AlertKind::StrongMargins => "strong-margins",
            AlertKind::HighCategory => "high-category",
            AlertKind::OverBudget => "over-budget",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AlertKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low-cash" => Ok(AlertKind::LowCash),
            "low-runway" => Ok(AlertKind::LowRunway),
            "high-burn" => Ok(AlertKind::HighBurn),
            "upcoming-bills" => Ok(AlertKind::UpcomingBills),
            "strong-margins" => Ok(AlertKind::StrongMargins),
            "high-category" => Ok(AlertKind::HighCategory),
            "over-budget" => Ok(AlertKind::OverBudget),
            _ => Err(format!("Unknown alert kind: {}", s)),
        }
    }
}

/// Severity level of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Requires immediate attention
    Error,
    /// Should be addressed soon
    Warning,
    /// Informational
    Info,
    /// Good news
    Success,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Success => "success",
        }
    }

    /// Numeric priority for sorting (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            Severity::Success => 1,
            Severity::Info => 2,
            Severity::Warning => 3,
            Severity::Error => 4,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            "success" => Ok(Severity::Success),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// An alert produced by an insight rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    /// Rule that fired; unique within one evaluation
    pub key: AlertKind,
    pub severity: Severity,
    /// Short title (e.g., "Low Cash Balance")
    pub title: String,
    /// One-line explanation with the figures that triggered it
    pub message: String,
    /// Rule-specific structured data
    pub data: serde_json::Value,
}

impl Alert {
    pub fn new(
        key: AlertKind,
        severity: Severity,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            key,
            severity,
            title: title.into(),
            message: message.into(),
            data: serde_json::Value::Null,
        }
    }

    /// Add structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}
