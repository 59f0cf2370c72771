//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config, snapshot load/save, JSON output)
//! - `distribute` - Profit distribution preview and confirmation
//! - `founders` - Founder balances and undistributed projects
//! - `insights` - Smart alerts
//! - `metrics` - KPI overview
//! - `reports` - Category, projection and billing schedule reports

pub mod core;
pub mod distribute;
pub mod founders;
pub mod insights;
pub mod metrics;
pub mod reports;

// Re-export command functions for main.rs
pub use core::*;
pub use distribute::*;
pub use founders::*;
pub use insights::*;
pub use metrics::*;
pub use reports::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
