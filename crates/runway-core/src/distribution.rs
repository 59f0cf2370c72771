//! Profit distribution between company retention and founders
//!
//! ## Algorithm
//!
//! For a profit `P`, retention `R` and each active founder's share `S`:
//!
//! 1. `company_retention = floor(P * R / 100)`
//! 2. `distributable = P - company_retention`
//! 3. `gross = floor(distributable * S / 100)`
//! 4. `withdrawable = max(0, gross - total_distributions)`
//!
//! Flooring remainders are never reallocated; they are reported as `unallocated`.
//! Shares are not required to sum to 100, so misconfigured shares under- or
//! over-allocate exactly as configured.
//!
//! ## Known limitation
//!
//! `total_distributions` is one cumulative counter per founder with no link to the
//! profit pool or period it was paid from. Withdrawable amounts therefore compare a
//! single pool's gross share against everything paid to date. This is kept as-is.
//!
//! ## Confirmation
//!
//! A [`DistributionPreview`] is pure computed state. [`confirm_distribution`] is the
//! boundary used by the external confirmation workflow: it produces the immutable
//! [`Distribution`] record and applies each founder's net amount to caller-owned
//! founder records. It refuses previews whose fingerprint or projects were already
//! confirmed.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::aggregate::{distributed_by_founder, total_distributed};
use crate::error::{Error, Result};
use crate::models::{Cents, Founder, Percent, ProjectFinancials};
use crate::money::{checked_sum, out_of_range, to_minor_units};

/// Default share of profit kept by the company
pub const DEFAULT_RETENTION: Percent = Percent::whole(20);

/// Where the profit to distribute comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ProfitSource {
    /// Sum of net profit over the selected completed projects
    Projects(Vec<String>),
    /// Manually entered amount in major currency units
    Manual(f64),
}

/// Resolved profit source recorded on previews and distributions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistributionSource {
    Projects { project_ids: Vec<String> },
    Manual { amount: Cents },
}

impl DistributionSource {
    pub fn project_ids(&self) -> &[String] {
        match self {
            Self::Projects { project_ids } => project_ids,
            Self::Manual { .. } => &[],
        }
    }

    fn fingerprint_tag(&self) -> String {
        match self {
            Self::Projects { project_ids } => format!("projects:{}", project_ids.join(",")),
            Self::Manual { amount } => format!("manual:{}", amount),
        }
    }
}

/// Inputs for a distribution preview
#[derive(Debug, Clone)]
pub struct DistributionRequest {
    pub source: ProfitSource,
    pub retention: Percent,
    /// Period tag, `YYYY-MM`
    pub period: String,
    pub notes: String,
}

impl DistributionRequest {
    pub fn from_projects<I, S>(project_ids: I, period: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: ProfitSource::Projects(project_ids.into_iter().map(Into::into).collect()),
            retention: DEFAULT_RETENTION,
            period: period.into(),
            notes: String::new(),
        }
    }

    pub fn manual(amount_major: f64, period: impl Into<String>) -> Self {
        Self {
            source: ProfitSource::Manual(amount_major),
            retention: DEFAULT_RETENTION,
            period: period.into(),
            notes: String::new(),
        }
    }

    pub fn with_retention(mut self, retention: Percent) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// One founder's line in a preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FounderShare {
    pub founder_id: String,
    pub founder_name: String,
    pub share_percent: Percent,
    pub gross_amount: Cents,
    /// Founder's cumulative `total_distributions` at preview time
    pub already_distributed: Cents,
    pub withdrawable: Cents,
    /// Amount paid on confirmation (no withholding is applied)
    pub net_amount: Cents,
}

/// An unconfirmed, recomputable profit split
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionPreview {
    pub source: DistributionSource,
    pub total_profit: Cents,
    pub retention_percent: Percent,
    pub company_retention: Cents,
    pub distributable: Cents,
    pub founder_distributions: Vec<FounderShare>,
    /// Flooring remainder left unassigned
    pub unallocated: Cents,
    pub period: String,
    pub notes: String,
    /// SHA-256 of the preview's economic content
    pub fingerprint: String,
}

impl DistributionPreview {
    pub fn total_gross(&self) -> Cents {
        self.founder_distributions
            .iter()
            .fold(0, |acc, f| acc.saturating_add(f.gross_amount))
    }

    pub fn total_withdrawable(&self) -> Cents {
        self.founder_distributions
            .iter()
            .fold(0, |acc, f| acc.saturating_add(f.withdrawable))
    }
}

/// Amount paid to one founder by a confirmed distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionItem {
    pub founder_id: String,
    pub net_amount: Cents,
}

/// A confirmed, immutable distribution record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub id: String,
    pub fingerprint: String,
    pub source: DistributionSource,
    pub total_profit: Cents,
    pub company_retention: Cents,
    pub items: Vec<DistributionItem>,
    pub period: String,
    #[serde(default)]
    pub notes: String,
    pub confirmed_at: DateTime<Utc>,
}

fn validate_period(period: &str) -> Result<()> {
    NaiveDate::parse_from_str(&format!("{}-01", period), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| {
            Error::validation(format!("period must be formatted YYYY-MM, got {:?}", period))
        })
}

/// Resolve a profit source into minor units
pub fn resolve_profit(
    source: &ProfitSource,
    projects: &[ProjectFinancials],
) -> Result<(DistributionSource, Cents)> {
    match source {
        ProfitSource::Manual(amount) => {
            let amount = to_minor_units(*amount)?;
            Ok((DistributionSource::Manual { amount }, amount))
        }
        ProfitSource::Projects(ids) => {
            let mut seen = HashSet::new();
            let mut project_ids = Vec::new();
            let mut total = 0;

            for id in ids {
                if !seen.insert(id.as_str()) {
                    continue;
                }
                let project = projects
                    .iter()
                    .find(|p| &p.id == id)
                    .ok_or_else(|| Error::NotFound(format!("project {}", id)))?;
                if !project.is_completed() {
                    return Err(Error::validation(format!(
                        "project {} is not completed and cannot be distributed",
                        id
                    )));
                }
                total = checked_sum([total, project.net_profit()])?;
                project_ids.push(id.clone());
            }

            Ok((DistributionSource::Projects { project_ids }, total))
        }
    }
}

/// Active founders paired with their validated shares
fn active_shares(founders: &[Founder]) -> Result<Vec<(&Founder, Percent)>> {
    let shares = founders
        .iter()
        .filter(|f| f.is_active())
        .map(|f| f.share().map(|share| (f, share)))
        .collect::<Result<Vec<_>>>()?;

    let total_bps: u32 = shares.iter().map(|(_, s)| u32::from(s.basis_points())).sum();
    if !shares.is_empty() && total_bps != u32::from(Percent::HUNDRED.basis_points()) {
        tracing::warn!(
            total_percent = f64::from(total_bps) / 100.0,
            founders = shares.len(),
            "Active founder shares do not sum to 100%"
        );
    }

    Ok(shares)
}

struct Split {
    company_retention: Cents,
    distributable: Cents,
    shares: Vec<FounderShare>,
}

fn split_profit(total_profit: Cents, retention: Percent, active: &[(&Founder, Percent)]) -> Split {
    // Non-positive profit yields a zero preview rather than negative payouts
    let profit = total_profit.max(0);
    let company_retention = retention.floor_share(profit);
    let distributable = profit - company_retention;

    let shares = active
        .iter()
        .map(|(founder, share)| {
            let gross_amount = share.floor_share(distributable);
            let already_distributed = founder.total_distributions;
            FounderShare {
                founder_id: founder.id.clone(),
                founder_name: founder.name.clone(),
                share_percent: *share,
                gross_amount,
                already_distributed,
                withdrawable: gross_amount.saturating_sub(already_distributed).max(0),
                net_amount: gross_amount,
            }
        })
        .collect();

    Split {
        company_retention,
        distributable,
        shares,
    }
}

fn fingerprint(
    source: &DistributionSource,
    total_profit: Cents,
    retention: Percent,
    period: &str,
    shares: &[FounderShare],
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(period.as_bytes());
    hasher.update(b"\0");
    hasher.update(source.fingerprint_tag().as_bytes());
    hasher.update(b"\0");
    hasher.update(total_profit.to_be_bytes());
    hasher.update(retention.basis_points().to_be_bytes());
    for share in shares {
        hasher.update(share.founder_id.as_bytes());
        hasher.update(b"\0");
        hasher.update(share.gross_amount.to_be_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Compute a distribution preview
///
/// Returns `Ok(None)` when there are no active founders: nothing to distribute.
pub fn calculate_distribution(
    request: &DistributionRequest,
    projects: &[ProjectFinancials],
    founders: &[Founder],
) -> Result<Option<DistributionPreview>> {
    validate_period(&request.period)?;
    let (source, total_profit) = resolve_profit(&request.source, projects)?;
    let active = active_shares(founders)?;

    if active.is_empty() {
        tracing::debug!(total_profit, "No active founders, no distribution preview");
        return Ok(None);
    }

    let split = split_profit(total_profit, request.retention, &active);
    let allocated = checked_sum(
        std::iter::once(split.company_retention).chain(split.shares.iter().map(|s| s.gross_amount)),
    )?;
    let unallocated = total_profit.max(0) - allocated;
    let fingerprint = fingerprint(
        &source,
        total_profit,
        request.retention,
        &request.period,
        &split.shares,
    );

    tracing::debug!(
        total_profit,
        company_retention = split.company_retention,
        founders = split.shares.len(),
        unallocated,
        "Distribution preview calculated"
    );

    Ok(Some(DistributionPreview {
        source,
        total_profit,
        retention_percent: request.retention,
        company_retention: split.company_retention,
        distributable: split.distributable,
        founder_distributions: split.shares,
        unallocated,
        period: request.period.clone(),
        notes: request.notes.clone(),
        fingerprint,
    }))
}

/// Completed projects not referenced by any confirmed distribution
pub fn undistributed_projects<'a>(
    projects: &'a [ProjectFinancials],
    distributions: &[Distribution],
) -> Vec<&'a ProjectFinancials> {
    let distributed: HashSet<&str> = distributions
        .iter()
        .flat_map(|d| d.source.project_ids())
        .map(String::as_str)
        .collect();

    projects
        .iter()
        .filter(|p| p.is_completed() && !distributed.contains(p.id.as_str()))
        .collect()
}

/// Turn a preview into a confirmed distribution and apply it to the founders
///
/// All checks run before any founder is touched, so a failed confirmation leaves
/// `founders` unchanged.
pub fn confirm_distribution(
    preview: &DistributionPreview,
    founders: &mut [Founder],
    existing: &[Distribution],
    id: impl Into<String>,
    confirmed_at: DateTime<Utc>,
) -> Result<Distribution> {
    if preview.total_profit <= 0 {
        return Err(Error::validation("nothing to distribute: profit is not positive"));
    }

    if let Some(dup) = existing.iter().find(|d| d.fingerprint == preview.fingerprint) {
        return Err(Error::validation(format!(
            "distribution already confirmed as {}",
            dup.id
        )));
    }

    for project_id in preview.source.project_ids() {
        if let Some(prior) = existing
            .iter()
            .find(|d| d.source.project_ids().contains(project_id))
        {
            return Err(Error::validation(format!(
                "project {} was already distributed in {}",
                project_id, prior.id
            )));
        }
    }

    // New running totals are computed in full before any founder is updated
    let mut updated = Vec::with_capacity(preview.founder_distributions.len());
    for share in &preview.founder_distributions {
        let index = founders
            .iter()
            .position(|f| f.id == share.founder_id)
            .ok_or_else(|| Error::NotFound(format!("founder {}", share.founder_id)))?;
        let total = founders[index]
            .total_distributions
            .checked_add(share.net_amount)
            .ok_or_else(out_of_range)?;
        updated.push((index, total));
    }

    let items: Vec<DistributionItem> = preview
        .founder_distributions
        .iter()
        .map(|share| DistributionItem {
            founder_id: share.founder_id.clone(),
            net_amount: share.net_amount,
        })
        .collect();

    for (index, total) in updated {
        founders[index].total_distributions = total;
    }

    let distribution = Distribution {
        id: id.into(),
        fingerprint: preview.fingerprint.clone(),
        source: preview.source.clone(),
        total_profit: preview.total_profit,
        company_retention: preview.company_retention,
        items,
        period: preview.period.clone(),
        notes: preview.notes.clone(),
        confirmed_at,
    };

    tracing::info!(
        id = %distribution.id,
        period = %distribution.period,
        founders = distribution.items.len(),
        "Distribution confirmed"
    );

    Ok(distribution)
}

/// A founder's standing against a company profit figure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FounderBalance {
    pub founder_id: String,
    pub name: String,
    pub share_percent: Percent,
    pub gross_share: Cents,
    /// Founder's cumulative `total_distributions`
    pub already_distributed: Cents,
    /// Sum of this founder's items across confirmed distribution records
    pub recorded_distributions: Cents,
    pub withdrawable: Cents,
    pub contributed: Cents,
    /// Contributions made plus distributions received
    pub net_position: Cents,
}

impl FounderBalance {
    /// The running total disagrees with the confirmed records
    pub fn is_out_of_sync(&self) -> bool {
        self.already_distributed != self.recorded_distributions
    }
}

/// Balances of all active founders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FounderBalanceSummary {
    pub company_profit: Cents,
    pub company_retention: Cents,
    pub distributable: Cents,
    pub balances: Vec<FounderBalance>,
    pub total_withdrawable: Cents,
    /// Paid to all founders across confirmed distribution records
    pub total_distributed: Cents,
}

/// Per-founder gross share, payouts to date and withdrawable balance
///
/// Payouts are reported both from each founder's running total and from the confirmed
/// `distributions`; a disagreement between the two is logged.
pub fn founder_balances(
    founders: &[Founder],
    distributions: &[Distribution],
    company_profit: Cents,
    retention: Percent,
) -> Result<FounderBalanceSummary> {
    let active = active_shares(founders)?;
    let split = split_profit(company_profit, retention, &active);
    let recorded = distributed_by_founder(distributions)?;

    let balances: Vec<FounderBalance> = split
        .shares
        .into_iter()
        .zip(active.iter())
        .map(|(share, (founder, _))| {
            let recorded_distributions = recorded.get(&share.founder_id).copied().unwrap_or(0);
            FounderBalance {
                founder_id: share.founder_id,
                name: share.founder_name,
                share_percent: share.share_percent,
                gross_share: share.gross_amount,
                already_distributed: share.already_distributed,
                recorded_distributions,
                withdrawable: share.withdrawable,
                contributed: founder.total_contributions,
                net_position: founder
                    .total_contributions
                    .saturating_add(share.already_distributed),
            }
        })
        .collect();

    for balance in balances.iter().filter(|b| b.is_out_of_sync()) {
        tracing::warn!(
            founder = %balance.founder_id,
            running_total = balance.already_distributed,
            recorded = balance.recorded_distributions,
            "Founder distribution total does not match confirmed records"
        );
    }

    Ok(FounderBalanceSummary {
        company_profit,
        company_retention: split.company_retention,
        distributable: split.distributable,
        total_withdrawable: checked_sum(balances.iter().map(|b| b.withdrawable))?,
        total_distributed: total_distributed(distributions)?,
        balances,
    })
}
