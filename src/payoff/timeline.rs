//! Payoff timeline output structures

use crate::debt::DebtId;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use super::engine::PeriodKind;

/// Snapshot of one simulated period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSnapshot {
    /// Period index (1-indexed)
    pub period: u32,

    /// Debts whose balance reached zero this period, in attack order
    pub debts_paid_off: Vec<DebtId>,

    /// Debts still outstanding after this period, in attack order
    pub debts_continuing: Vec<DebtId>,

    pub interest_accrued: Money,

    /// Cash applied less interest accrued
    pub principal_paid: Money,

    /// Cash applied to balances this period
    pub total_paid: Money,

    /// Cash left over after the surplus target was capped at its balance
    pub unapplied: Money,

    /// Remaining balances after this period (when recording is enabled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balances: Option<BTreeMap<DebtId, Money>>,
}

impl PeriodSnapshot {
    /// Balance of `id` after this period, if balances were recorded
    ///
    /// A debt missing from the recorded map has been paid off.
    pub fn balance_of(&self, id: &DebtId) -> Option<Money> {
        self.balances
            .as_ref()
            .map(|b| b.get(id).copied().unwrap_or(Money::ZERO))
    }
}

/// Complete simulation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub period_kind: PeriodKind,

    /// Periods elapsed
    pub periods: u32,

    /// Interest accrued over the whole run
    pub total_interest: Money,

    /// Sum of all minimums in the first period, in period units
    pub minimum_outlay: Money,

    /// The iteration ceiling was reached with debts still outstanding
    pub terminated_early: bool,

    /// Interest accrued per debt over the whole run
    pub interest_by_debt: BTreeMap<DebtId, Money>,

    pub timeline: Vec<PeriodSnapshot>,
}

impl SimulationResult {
    /// Result for a run with nothing to pay
    pub fn empty(period_kind: PeriodKind) -> Self {
        Self {
            period_kind,
            periods: 0,
            total_interest: Money::ZERO,
            minimum_outlay: Money::ZERO,
            terminated_early: false,
            interest_by_debt: BTreeMap::new(),
            timeline: Vec::new(),
        }
    }

    /// Period in which `id` was paid off, if it was
    pub fn payoff_period(&self, id: &DebtId) -> Option<u32> {
        self.timeline
            .iter()
            .find(|s| s.debts_paid_off.contains(id))
            .map(|s| s.period)
    }

    /// Every paid-off debt with the period it cleared, in payoff order
    pub fn payoff_schedule(&self) -> Vec<DebtPayoff> {
        self.timeline
            .iter()
            .flat_map(|s| {
                s.debts_paid_off.iter().map(move |id| DebtPayoff {
                    id: id.clone(),
                    period: s.period,
                })
            })
            .collect()
    }

    /// Debts still outstanding when the run ended
    pub fn outstanding(&self) -> &[DebtId] {
        self.timeline
            .last()
            .map(|s| s.debts_continuing.as_slice())
            .unwrap_or(&[])
    }

    /// Interest accrued on a single debt over the run
    pub fn interest_for(&self, id: &DebtId) -> Money {
        self.interest_by_debt.get(id).copied().unwrap_or(Money::ZERO)
    }

    /// Get summary statistics
    pub fn summary(&self) -> PayoffSummary {
        let total_paid: Money = self.timeline.iter().map(|s| s.total_paid).sum();
        let total_principal: Money = self.timeline.iter().map(|s| s.principal_paid).sum();
        let debts_cleared = self.timeline.iter().map(|s| s.debts_paid_off.len()).sum();

        PayoffSummary {
            period_kind: self.period_kind,
            periods: self.periods,
            years: self.periods as f64 / self.period_kind.periods_per_year(),
            total_interest: self.total_interest,
            total_paid,
            total_principal,
            debts_cleared,
            debts_outstanding: self.outstanding().len(),
            terminated_early: self.terminated_early,
        }
    }
}

/// When a single debt was paid off
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPayoff {
    pub id: DebtId,
    pub period: u32,
}

/// Summary statistics for a simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffSummary {
    pub period_kind: PeriodKind,
    pub periods: u32,
    pub years: f64,
    pub total_interest: Money,
    pub total_paid: Money,
    pub total_principal: Money,
    pub debts_cleared: usize,
    pub debts_outstanding: usize,
    pub terminated_early: bool,
}
