//! Runway CLI - Burn, runway and founder payouts from a snapshot file
//!
//! Usage:
//!   runway metrics                          Balance, MRR, burn and runway
//!   runway project --scenario conservative  Cash-flow projection
//!   runway insights                         Smart alerts
//!   runway distribute --projects p1,p2      Preview a profit distribution
//!   runway distribute --amount 5000 --confirm

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use runway_core::distribution::ProfitSource;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;
    let snapshot = commands::open_snapshot(&cli.data)?;

    match cli.command {
        Commands::Metrics => commands::cmd_metrics(&snapshot, &config, cli.json),
        Commands::Categories { top, largest } => {
            commands::cmd_categories(&snapshot, &config, top, largest, cli.json)
        }
        Commands::Project {
            months,
            scenario,
            account,
        } => commands::cmd_project(
            &snapshot,
            &config,
            months,
            &scenario,
            account.as_deref(),
            cli.json,
        ),
        Commands::Schedule { months } => {
            commands::cmd_schedule(&snapshot, &config, months, cli.json)
        }
        Commands::Budgets => commands::cmd_budgets(&snapshot, &config, cli.json),
        Commands::Insights => commands::cmd_insights(&snapshot, &config, cli.json),
        Commands::Founders { profit } => {
            commands::cmd_founders(&snapshot, &config, profit, cli.json)
        }
        Commands::Distribute {
            projects,
            amount,
            retention,
            period,
            notes,
            confirm,
        } => {
            let source = match amount {
                Some(amount) => ProfitSource::Manual(amount),
                None => ProfitSource::Projects(projects),
            };
            commands::cmd_distribute(
                &cli.data,
                snapshot,
                &config,
                source,
                retention,
                period.as_deref(),
                notes.as_deref(),
                confirm,
                cli.json,
            )
        }
        Commands::Projects => commands::cmd_projects(&snapshot, &config, cli.json),
    }
}
