//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Runway - Know your burn, runway and founder payouts
#[derive(Parser)]
#[command(name = "runway")]
#[command(about = "Financial analytics and profit distribution for small companies", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Snapshot file (JSON) with accounts, expenses, subscriptions, founders and projects
    #[arg(long, default_value = "runway.json", global = true)]
    pub data: PathBuf,

    /// Engine config (TOML); defaults to the user config dir, then built-in defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show balance, MRR, burn and runway
    Metrics,

    /// Show spending by category and the largest expenses
    Categories {
        /// Number of categories to show
        #[arg(long)]
        top: Option<usize>,

        /// Number of largest expenses to show
        #[arg(long)]
        largest: Option<usize>,
    },

    /// Project the cash balance month by month
    Project {
        /// Projection horizon in months (max 120)
        #[arg(short, long)]
        months: Option<u32>,

        /// Forecast scenario: conservative, moderate, optimistic
        #[arg(short, long, default_value = "moderate")]
        scenario: String,

        /// Start from one account's balance instead of the company total
        #[arg(short, long)]
        account: Option<String>,
    },

    /// Show upcoming subscription charges by month
    Schedule {
        /// Number of calendar months to show
        #[arg(short, long, default_value = "3")]
        months: u32,
    },

    /// Show this month's spending against category budgets
    Budgets,

    /// Show smart financial alerts
    Insights,

    /// Show founder balances and withdrawable amounts
    Founders {
        /// Company profit in major units (defaults to undistributed project profit)
        #[arg(long)]
        profit: Option<f64>,
    },

    /// Preview (and optionally confirm) a profit distribution
    Distribute {
        /// Completed project IDs to distribute (comma-separated)
        #[arg(
            long,
            value_delimiter = ',',
            conflicts_with = "amount",
            required_unless_present = "amount"
        )]
        projects: Vec<String>,

        /// Manual profit amount in major units
        #[arg(long)]
        amount: Option<f64>,

        /// Company retention percent (defaults to config)
        #[arg(long)]
        retention: Option<f64>,

        /// Period tag, YYYY-MM (defaults to the snapshot month)
        #[arg(long)]
        period: Option<String>,

        /// Notes stored with the distribution
        #[arg(long)]
        notes: Option<String>,

        /// Record the distribution and update founder totals in the snapshot file
        #[arg(long)]
        confirm: bool,
    },

    /// List completed projects with undistributed profit
    Projects,
}
