//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::PathBuf;

use runway_core::distribution::ProfitSource;
use runway_core::test_utils::sample_snapshot;
use runway_core::{EngineConfig, Snapshot};
use tempfile::TempDir;

use crate::commands::{self, truncate};

/// Write the sample snapshot into a temp dir, returning the dir guard and file path
fn setup_snapshot_file() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("runway.json");
    std::fs::write(&path, sample_snapshot().to_json().unwrap()).unwrap();
    (dir, path)
}

fn config() -> EngineConfig {
    EngineConfig::default()
}

// ========== Snapshot & Config Tests ==========

#[test]
fn test_open_snapshot() {
    let (_dir, path) = setup_snapshot_file();
    let snapshot = commands::open_snapshot(&path).unwrap();
    assert_eq!(snapshot.company_balance(), 600_000);
}

#[test]
fn test_open_missing_snapshot_fails() {
    let dir = TempDir::new().unwrap();
    let err = commands::open_snapshot(&dir.path().join("missing.json")).unwrap_err();
    assert!(err.to_string().contains("--data"));
}

#[test]
fn test_save_snapshot_replaces_file() {
    let (_dir, path) = setup_snapshot_file();
    let mut snapshot = commands::open_snapshot(&path).unwrap();
    snapshot.total_revenue = 1;
    commands::save_snapshot(&path, &snapshot).unwrap();

    let reloaded = Snapshot::load(&path).unwrap();
    assert_eq!(reloaded.total_revenue, 1);
}

#[test]
fn test_load_config_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("engine.toml");
    std::fs::write(&path, "currency = \"USD\"").unwrap();
    let config = commands::load_config(Some(&path)).unwrap();
    assert_eq!(config.currency, "USD");
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_metrics() {
    let snapshot = sample_snapshot();
    assert!(commands::cmd_metrics(&snapshot, &config(), false).is_ok());
    assert!(commands::cmd_metrics(&snapshot, &config(), true).is_ok());
}

#[test]
fn test_cmd_metrics_rejects_bad_cycle() {
    let mut snapshot = sample_snapshot();
    snapshot.subscriptions[0].billing_cycle = "fortnightly".to_string();
    assert!(commands::cmd_metrics(&snapshot, &config(), false).is_err());
}

#[test]
fn test_cmd_categories() {
    let snapshot = sample_snapshot();
    assert!(commands::cmd_categories(&snapshot, &config(), Some(2), Some(1), false).is_ok());
    assert!(commands::cmd_categories(&snapshot, &config(), None, None, true).is_ok());

    let empty = Snapshot::empty(snapshot.as_of);
    assert!(commands::cmd_categories(&empty, &config(), None, None, false).is_ok());
}

#[test]
fn test_cmd_project() {
    let snapshot = sample_snapshot();
    assert!(commands::cmd_project(&snapshot, &config(), Some(6), "moderate", None, false).is_ok());
    assert!(
        commands::cmd_project(&snapshot, &config(), Some(500), "moderate", None, false).is_err()
    );
}

#[test]
fn test_cmd_project_scenario_and_account() {
    let snapshot = sample_snapshot();
    for scenario in ["conservative", "Optimistic"] {
        assert!(commands::cmd_project(&snapshot, &config(), None, scenario, None, true).is_ok());
    }
    assert!(
        commands::cmd_project(&snapshot, &config(), None, "moderate", Some("wallet"), false)
            .is_ok()
    );

    let bad_scenario = commands::cmd_project(&snapshot, &config(), None, "rosy", None, false);
    assert!(bad_scenario.is_err());
    let bad_account =
        commands::cmd_project(&snapshot, &config(), None, "moderate", Some("nope"), false);
    assert!(bad_account.unwrap_err().to_string().contains("--account"));
}

#[test]
fn test_cmd_budgets() {
    let snapshot = sample_snapshot();
    assert!(commands::cmd_budgets(&snapshot, &config(), false).is_ok());
    assert!(commands::cmd_budgets(&snapshot, &config(), true).is_ok());

    let empty = Snapshot::empty(snapshot.as_of);
    assert!(commands::cmd_budgets(&empty, &config(), false).is_ok());

    let mut negative = sample_snapshot();
    negative.budgets[0].allocated = -1;
    assert!(commands::cmd_budgets(&negative, &config(), false).is_err());
}

#[test]
fn test_cmd_schedule() {
    let snapshot = sample_snapshot();
    assert!(commands::cmd_schedule(&snapshot, &config(), 3, false).is_ok());
    assert!(commands::cmd_schedule(&snapshot, &config(), 3, true).is_ok());

    let mut negative = sample_snapshot();
    negative.subscriptions[1].amount = -3_000;
    assert!(commands::cmd_schedule(&negative, &config(), 3, false).is_err());
}

#[test]
fn test_cmd_insights() {
    let snapshot = sample_snapshot();
    assert!(commands::cmd_insights(&snapshot, &config(), false).is_ok());

    let empty = Snapshot::empty(snapshot.as_of);
    let mut quiet = config();
    quiet.insights.low_cash_threshold = 0;
    assert!(commands::cmd_insights(&empty, &quiet, false).is_ok());
}

#[test]
fn test_cmd_founders_and_projects() {
    let snapshot = sample_snapshot();
    assert!(commands::cmd_founders(&snapshot, &config(), None, false).is_ok());
    assert!(commands::cmd_founders(&snapshot, &config(), Some(2_500.0), true).is_ok());
    assert!(commands::cmd_founders(&snapshot, &config(), Some(f64::NAN), false).is_err());
    assert!(commands::cmd_projects(&snapshot, &config(), false).is_ok());

    // Running totals that disagree with the records are reported, not rejected
    let mut drifted = sample_snapshot();
    drifted.founders[0].total_distributions = 1_000;
    assert!(commands::cmd_founders(&drifted, &config(), None, false).is_ok());
}

// ========== Distribution Command Tests ==========

#[test]
fn test_cmd_distribute_preview_leaves_file_untouched() {
    let (_dir, path) = setup_snapshot_file();
    let before = std::fs::read_to_string(&path).unwrap();

    let snapshot = commands::open_snapshot(&path).unwrap();
    commands::cmd_distribute(
        &path,
        snapshot,
        &config(),
        ProfitSource::Projects(vec!["p1".to_string()]),
        None,
        None,
        None,
        false,
        false,
    )
    .unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_cmd_distribute_confirm_updates_snapshot() {
    let (_dir, path) = setup_snapshot_file();

    let snapshot = commands::open_snapshot(&path).unwrap();
    commands::cmd_distribute(
        &path,
        snapshot,
        &config(),
        ProfitSource::Projects(vec!["p1".to_string()]),
        Some(20.0),
        Some("2024-06"),
        Some("June payout"),
        true,
        false,
    )
    .unwrap();

    let saved = Snapshot::load(&path).unwrap();
    assert_eq!(saved.distributions.len(), 1);
    assert_eq!(saved.distributions[0].notes, "June payout");
    assert!(saved.distributions[0].id.starts_with("dist-2024-06-"));
    // p1 profit 100,000: 80,000 distributable at 50/30/20
    assert_eq!(saved.founders[0].total_distributions, 40_000);
    assert_eq!(saved.founders[1].total_distributions, 24_000);
    assert_eq!(saved.founders[2].total_distributions, 16_000);

    // A second confirmation of the same project is refused and changes nothing
    let result = commands::cmd_distribute(
        &path,
        saved,
        &config(),
        ProfitSource::Projects(vec!["p1".to_string()]),
        None,
        Some("2024-07"),
        None,
        true,
        false,
    );
    assert!(result.is_err());
    assert_eq!(Snapshot::load(&path).unwrap().distributions.len(), 1);
}

#[test]
fn test_cmd_distribute_invalid_inputs() {
    let (_dir, path) = setup_snapshot_file();
    let snapshot = commands::open_snapshot(&path).unwrap();

    let bad_retention = commands::cmd_distribute(
        &path,
        snapshot.clone(),
        &config(),
        ProfitSource::Manual(100.0),
        Some(120.0),
        None,
        None,
        false,
        false,
    );
    assert!(bad_retention.is_err());

    let unfinished = commands::cmd_distribute(
        &path,
        snapshot.clone(),
        &config(),
        ProfitSource::Projects(vec!["p2".to_string()]),
        None,
        None,
        None,
        false,
        false,
    );
    assert!(unfinished.is_err());

    let bad_period = commands::cmd_distribute(
        &path,
        snapshot,
        &config(),
        ProfitSource::Manual(100.0),
        None,
        Some("2024/06"),
        None,
        false,
        false,
    );
    assert!(bad_period.is_err());
}

#[test]
fn test_cmd_distribute_without_founders() {
    let (_dir, path) = setup_snapshot_file();
    let mut snapshot = commands::open_snapshot(&path).unwrap();
    snapshot.founders.clear();

    let result = commands::cmd_distribute(
        &path,
        snapshot,
        &config(),
        ProfitSource::Manual(100.0),
        None,
        None,
        None,
        true,
        false,
    );
    assert!(result.is_ok());
    assert!(Snapshot::load(&path).unwrap().distributions.is_empty());
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a much longer name", 10), "a much ...");
    assert_eq!(truncate("Ñandú Ñandú Ñandú", 8), "Ñandú...");
}
