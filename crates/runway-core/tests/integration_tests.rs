//! Integration tests for runway-core
//!
//! These tests exercise the full snapshot → metrics → insights → distribution workflow.

use chrono::{TimeZone, Utc};
use runway_core::{
    build_insight_context, calculate_distribution, compute_metrics, confirm_distribution,
    distribution::undistributed_projects,
    founder_balances,
    projection::{billing_schedule, first_critical_month, project_cash_flow},
    AlertKind, BudgetStatus, CategoryBudget, DistributionRequest, EngineConfig, InsightEngine,
    Percent, Runway, Scenario, Severity, Snapshot,
};

/// A company in June 2024:
/// - Balance 400,000 across two accounts
/// - June spend 200,000 (salary, rent, two spellings of cloud hosting), plus May salary
/// - Trailing revenue 600,000 (50,000 per month)
/// - Three founders at 50/30/20 and one completed project with 100,000 profit
fn snapshot_json() -> &'static str {
    r#"{
  "as_of": "2024-06-15",
  "accounts": [
    {"id": "hbl", "name": "HBL Current", "balance": 250000},
    {"id": "jazz", "name": "JazzCash", "balance": 150000}
  ],
  "expenses": [
    {"id": "e1", "category": "Salary", "amount": 120000, "date": "2024-06-01"},
    {"id": "e2", "category": "rent", "amount": 50000, "date": "2024-06-03", "vendor": "Landlord"},
    {"id": "e3", "category": "Cloud-Hosting", "amount": 20000, "date": "2024-06-10"},
    {"id": "e4", "category": "cloud hosting", "amount": 10000, "date": "2024-06-12"},
    {"id": "e5", "category": "Salary", "amount": 120000, "date": "2024-05-01"}
  ],
  "subscriptions": [
    {"id": "aws", "name": "AWS", "amount": 12000, "billing_cycle": "Yearly", "next_billing_date": "2024-06-20"},
    {"id": "figma", "name": "Figma", "amount": 3000, "billing_cycle": "monthly", "next_billing_date": "2024-07-01"},
    {"id": "old", "name": "Legacy", "amount": 9999, "billing_cycle": "weird", "active": false}
  ],
  "founders": [
    {"id": "f1", "name": "Ayesha", "profit_share_percentage": 50, "status": "active", "total_contributions": 100000},
    {"id": "f2", "name": "Bilal", "profit_share_percentage": 30, "status": "active"},
    {"id": "f3", "name": "Sara", "profit_share_percentage": 20, "status": "active"}
  ],
  "projects": [
    {"id": "p1", "name": "Storefront", "status": "completed", "contract_value": 200000,
     "amount_received": 150000, "amount_pending": 50000, "direct_costs": 50000},
    {"id": "p2", "name": "Mobile app", "status": "active", "contract_value": 300000}
  ],
  "total_revenue": 600000
}"#
}

fn load() -> Snapshot {
    Snapshot::from_json(snapshot_json()).expect("Failed to parse snapshot")
}

// =============================================================================
// Metrics & Insights
// =============================================================================

#[test]
fn test_metrics_workflow() {
    let snapshot = load();
    let metrics = compute_metrics(&snapshot).expect("Failed to compute metrics");

    assert_eq!(metrics.company_balance, 400_000);
    assert_eq!(metrics.mrr, 4_000);
    assert_eq!(metrics.monthly_expenses, 200_000);
    assert_eq!(metrics.monthly_cash_burn, 150_000);
    assert_eq!(metrics.total_expenses, 320_000);

    let Runway::Finite(months) = metrics.runway else {
        panic!("expected finite runway");
    };
    assert!((months - 400_000.0 / 150_000.0).abs() < 1e-9);

    // Both spellings of cloud hosting land in one bucket
    let hosting = metrics
        .expense_by_category
        .iter()
        .find(|c| c.category.as_str() == "cloud_hosting")
        .expect("cloud hosting category");
    assert_eq!(hosting.total, 30_000);
    assert_eq!(hosting.count, 2);
}

#[test]
fn test_insights_workflow() {
    let snapshot = load();
    let config = EngineConfig::default();
    let metrics = compute_metrics(&snapshot).unwrap();
    let ctx = build_insight_context(&metrics, &snapshot, &config);

    let alerts = InsightEngine::new().evaluate_all(&ctx);
    let keys: Vec<AlertKind> = alerts.iter().map(|a| a.key).collect();

    assert_eq!(
        keys,
        vec![
            AlertKind::LowCash,
            AlertKind::LowRunway,
            AlertKind::UpcomingBills,
            AlertKind::HighCategory,
            AlertKind::StrongMargins,
        ]
    );
    assert_eq!(alerts[0].severity, Severity::Error);
    assert_eq!(alerts.last().unwrap().severity, Severity::Success);
    // 200,000 / 600,000 is under the burn warning level
    assert!(!keys.contains(&AlertKind::HighBurn));
}

#[test]
fn test_insight_thresholds_from_config() {
    let snapshot = load();
    let config = EngineConfig::from_toml(
        "[insights]\nlow_cash_threshold = 100\nburn_rate_warning_percent = 30",
    )
    .unwrap();
    let metrics = compute_metrics(&snapshot).unwrap();
    let ctx = build_insight_context(&metrics, &snapshot, &config);
    let alerts = InsightEngine::new().evaluate_all(&ctx);

    assert!(alerts.iter().all(|a| a.key != AlertKind::LowCash));
    assert!(alerts.iter().any(|a| a.key == AlertKind::HighBurn));
}

#[test]
fn test_budget_alert_workflow() {
    let mut snapshot = load();
    snapshot.budgets = vec![
        CategoryBudget {
            category: "Cloud Hosting".to_string(),
            allocated: 25_000,
            alert_threshold: 80.0,
        },
        CategoryBudget {
            category: "salary".to_string(),
            allocated: 200_000,
            alert_threshold: 80.0,
        },
    ];
    let config = EngineConfig::default();
    let metrics = compute_metrics(&snapshot).unwrap();

    // June only: both hosting spellings count against the one budget
    let hosting = &metrics.budget_usage[0];
    assert_eq!(hosting.spent, 30_000);
    assert_eq!(hosting.status, BudgetStatus::OverBudget);
    assert_eq!(metrics.budget_usage[1].status, BudgetStatus::OnTrack);

    let ctx = build_insight_context(&metrics, &snapshot, &config);
    let alerts = InsightEngine::new().evaluate_all(&ctx);
    let budget_alert = alerts
        .iter()
        .find(|a| a.key == AlertKind::OverBudget)
        .expect("budget alert");
    assert_eq!(budget_alert.severity, Severity::Warning);
}

// =============================================================================
// Projection
// =============================================================================

#[test]
fn test_projection_workflow() {
    let snapshot = load();
    let config = EngineConfig::default();
    let metrics = compute_metrics(&snapshot).unwrap();

    let points = project_cash_flow(
        metrics.company_balance,
        metrics.monthly_expenses,
        metrics.monthly_revenue(),
        config.projection_months,
    )
    .unwrap();
    assert_eq!(points.len(), 12);
    assert_eq!(points[1].cumulative_balance, 100_000);
    assert_eq!(first_critical_month(&points), Some(3));

    // Conservative: revenue 35,000 and expenses 240,000 per month from one account
    let start = snapshot.starting_balance(Some("jazz")).unwrap();
    let (revenue, expenses) = Scenario::Conservative
        .apply(metrics.monthly_revenue(), metrics.monthly_expenses)
        .unwrap();
    let conservative = project_cash_flow(start, expenses, revenue, 12).unwrap();
    assert_eq!(conservative[0].cumulative_balance, 150_000 - 205_000);
    assert_eq!(first_critical_month(&conservative), Some(1));

    let schedule = billing_schedule(&snapshot.subscriptions, snapshot.as_of, 3).unwrap();
    let totals: Vec<i64> = schedule.iter().map(|m| m.total).collect();
    assert_eq!(totals, vec![12_000, 3_000, 3_000]);
}

// =============================================================================
// Distribution
// =============================================================================

#[test]
fn test_distribution_workflow() {
    let mut snapshot = load();
    let request =
        DistributionRequest::from_projects(["p1"], "2024-06").with_notes("Storefront payout");

    let preview = calculate_distribution(&request, &snapshot.projects, &snapshot.founders)
        .unwrap()
        .expect("active founders present");
    assert_eq!(preview.total_profit, 100_000);
    assert_eq!(preview.company_retention, 20_000);
    assert_eq!(preview.distributable, 80_000);
    assert_eq!(preview.total_gross(), 80_000);
    assert_eq!(preview.fingerprint.len(), 64);

    let confirmed_at = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
    let record = confirm_distribution(
        &preview,
        &mut snapshot.founders,
        &snapshot.distributions,
        "dist-2024-06",
        confirmed_at,
    )
    .unwrap();
    snapshot.distributions.push(record);

    // Persisted state survives a round trip through JSON
    let reloaded = Snapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(reloaded.distributions.len(), 1);
    assert_eq!(reloaded.founders[0].total_distributions, 40_000);
    assert!(undistributed_projects(&reloaded.projects, &reloaded.distributions).is_empty());

    // Balances against the same profit: nothing left to withdraw
    let balances = founder_balances(
        &reloaded.founders,
        &reloaded.distributions,
        100_000,
        Percent::whole(20),
    )
    .unwrap();
    assert_eq!(balances.total_withdrawable, 0);
    assert_eq!(balances.total_distributed, 80_000);
    assert!(balances.balances.iter().all(|b| !b.is_out_of_sync()));
    assert_eq!(balances.balances[0].net_position, 140_000);

    // The same project cannot be paid out twice
    let again = calculate_distribution(&request, &reloaded.projects, &reloaded.founders)
        .unwrap()
        .unwrap();
    let mut founders = reloaded.founders.clone();
    assert!(confirm_distribution(
        &again,
        &mut founders,
        &reloaded.distributions,
        "dist-dup",
        confirmed_at
    )
    .is_err());
    assert_eq!(founders[0].total_distributions, 40_000);
}

#[test]
fn test_manual_distribution_with_custom_retention() {
    let snapshot = load();
    let request =
        DistributionRequest::manual(1_000.0, "2024-06").with_retention(Percent::whole(10));

    let preview = calculate_distribution(&request, &snapshot.projects, &snapshot.founders)
        .unwrap()
        .unwrap();
    assert_eq!(preview.company_retention, 10_000);
    let gross: Vec<i64> = preview
        .founder_distributions
        .iter()
        .map(|f| f.gross_amount)
        .collect();
    assert_eq!(gross, vec![45_000, 27_000, 18_000]);
}

#[test]
fn test_active_project_cannot_be_distributed() {
    let snapshot = load();
    let request = DistributionRequest::from_projects(["p2"], "2024-06");
    let err =
        calculate_distribution(&request, &snapshot.projects, &snapshot.founders).unwrap_err();
    assert!(err.is_validation());
}
