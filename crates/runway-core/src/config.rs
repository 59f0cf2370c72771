//! Engine configuration
//!
//! Loads `engine.toml` with a two-layer lookup:
//! 1. An explicit override path, or `<data_local_dir>/runway/config/engine.toml`
//! 2. The default config embedded in the binary
//!
//! Missing keys fall back to the built-in defaults, so a user file only needs the
//! values it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Cents, Percent};
use crate::projection::{DEFAULT_PROJECTION_MONTHS, MAX_PROJECTION_MONTHS};

/// Default config embedded at compile time
const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

/// Thresholds used by the insight rules
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightThresholds {
    /// Balance below this is an error
    pub low_cash_threshold: Cents,
    pub runway_warning_months: f64,
    /// Monthly burn as a percentage of total revenue
    pub burn_rate_warning_percent: f64,
    pub upcoming_bill_days: u32,
    pub strong_margin_percent: f64,
    /// Top category as a percentage of monthly burn
    pub category_concentration_percent: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            low_cash_threshold: 500_000,
            runway_warning_months: 3.0,
            burn_rate_warning_percent: 50.0,
            upcoming_bill_days: 7,
            strong_margin_percent: 40.0,
            category_concentration_percent: 40.0,
        }
    }
}

/// Resolved engine configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineConfig {
    pub currency: String,
    pub company_retention: Percent,
    pub projection_months: u32,
    pub top_categories: usize,
    pub largest_expenses: usize,
    pub insights: InsightThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency: "PKR".to_string(),
            company_retention: Percent::whole(20),
            projection_months: DEFAULT_PROJECTION_MONTHS,
            top_categories: 5,
            largest_expenses: 5,
            insights: InsightThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Load from the override path or the default location, falling back to the
    /// embedded config
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        load_config(override_path)
    }

    /// Parse TOML content over the built-in defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// The embedded default config
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("runway").join("config").join("engine.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config {}: {}", path.display(), e))
    })
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<EngineConfig> {
    let content = match override_path {
        // An explicit path must exist; a silent fallback would hide typos
        Some(path) => read_config(path)?,
        None => match default_config_path() {
            Some(default_path) if default_path.exists() => {
                tracing::debug!(path = %default_path.display(), "Using user engine config");
                read_config(&default_path)?
            }
            _ => DEFAULT_CONFIG.to_string(),
        },
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    currency: Option<String>,
    distribution: Option<RawDistribution>,
    projection: Option<RawProjection>,
    reports: Option<RawReports>,
    insights: Option<RawInsights>,
}

#[derive(Debug, Deserialize)]
struct RawDistribution {
    company_retention_percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawProjection {
    months: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawReports {
    top_categories: Option<usize>,
    largest_expenses: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawInsights {
    low_cash_threshold: Option<Cents>,
    runway_warning_months: Option<f64>,
    burn_rate_warning_percent: Option<f64>,
    upcoming_bill_days: Option<u32>,
    strong_margin_percent: Option<f64>,
    category_concentration_percent: Option<f64>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<EngineConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = EngineConfig::default();

    if let Some(currency) = raw.currency {
        config.currency = currency;
    }

    if let Some(distribution) = raw.distribution {
        if let Some(retention) = distribution.company_retention_percent {
            config.company_retention = Percent::new(retention).map_err(|e| {
                Error::Config(format!("distribution.company_retention_percent: {}", e))
            })?;
        }
    }

    if let Some(projection) = raw.projection {
        if let Some(months) = projection.months {
            if months > MAX_PROJECTION_MONTHS {
                return Err(Error::Config(format!(
                    "projection.months must be at most {}, got {}",
                    MAX_PROJECTION_MONTHS, months
                )));
            }
            config.projection_months = months;
        }
    }

    if let Some(reports) = raw.reports {
        if let Some(n) = reports.top_categories {
            config.top_categories = n;
        }
        if let Some(k) = reports.largest_expenses {
            config.largest_expenses = k;
        }
    }

    if let Some(insights) = raw.insights {
        let t = &mut config.insights;
        if let Some(v) = insights.low_cash_threshold {
            t.low_cash_threshold = v;
        }
        if let Some(v) = insights.runway_warning_months {
            t.runway_warning_months = v;
        }
        if let Some(v) = insights.burn_rate_warning_percent {
            t.burn_rate_warning_percent = v;
        }
        if let Some(v) = insights.upcoming_bill_days {
            t.upcoming_bill_days = v;
        }
        if let Some(v) = insights.strong_margin_percent {
            t.strong_margin_percent = v;
        }
        if let Some(v) = insights.category_concentration_percent {
            t.category_concentration_percent = v;
        }
    }

    Ok(config)
}
