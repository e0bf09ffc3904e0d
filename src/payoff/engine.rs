//! Snowball payoff engine: period-stepped amortization across a set of debts

use crate::debt::{Debt, PaymentFrequency};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use super::state::PayoffState;
use super::timeline::{PeriodSnapshot, SimulationResult};

/// Iteration ceiling for monthly runs (50 years)
pub const MAX_MONTHS: u32 = 600;

/// Iteration ceiling for fortnightly runs (50 years)
pub const MAX_FORTNIGHTS: u32 = 1300;

/// Simulation cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Month,
    Fortnight,
}

impl PeriodKind {
    /// Divisor applied to annual interest rates
    pub fn periods_per_year(&self) -> f64 {
        match self {
            PeriodKind::Month => 12.0,
            PeriodKind::Fortnight => 26.0,
        }
    }

    /// Minimum-payment frequency matching this cadence
    pub fn frequency(&self) -> PaymentFrequency {
        match self {
            PeriodKind::Month => PaymentFrequency::Monthly,
            PeriodKind::Fortnight => PaymentFrequency::Fortnightly,
        }
    }

    pub fn default_max_periods(&self) -> u32 {
        match self {
            PeriodKind::Month => MAX_MONTHS,
            PeriodKind::Fortnight => MAX_FORTNIGHTS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKind::Month => "month",
            PeriodKind::Fortnight => "fortnight",
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" | "monthly" => Ok(PeriodKind::Month),
            "fortnight" | "fortnightly" => Ok(PeriodKind::Fortnight),
            other => Err(format!("unknown period '{}' (expected month or fortnight)", other)),
        }
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Cadence of the run
    pub period: PeriodKind,

    /// Hard ceiling on periods simulated
    pub max_periods: u32,

    /// Whether each snapshot carries a clone of the remaining balances
    pub record_balances: bool,
}

impl SimulationConfig {
    /// Monthly cadence, 600-period ceiling, no balance clones
    pub fn monthly() -> Self {
        Self {
            period: PeriodKind::Month,
            max_periods: MAX_MONTHS,
            record_balances: false,
        }
    }

    /// Fortnightly cadence, 1300-period ceiling, balances recorded for charting
    pub fn fortnightly() -> Self {
        Self {
            period: PeriodKind::Fortnight,
            max_periods: MAX_FORTNIGHTS,
            record_balances: true,
        }
    }

    pub fn for_period(period: PeriodKind) -> Self {
        match period {
            PeriodKind::Month => Self::monthly(),
            PeriodKind::Fortnight => Self::fortnightly(),
        }
    }

    /// Lower the iteration ceiling; values above the cadence's hard ceiling are clamped to it
    pub fn with_max_periods(mut self, max_periods: u32) -> Self {
        self.max_periods = max_periods.min(self.period.default_max_periods());
        self
    }

    /// Ceiling actually enforced, never above [`PeriodKind::default_max_periods`]
    pub fn ceiling(&self) -> u32 {
        self.max_periods.min(self.period.default_max_periods())
    }

    pub fn with_balances(mut self, record_balances: bool) -> Self {
        self.record_balances = record_balances;
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::fortnightly()
    }
}

/// Snowball payoff engine
///
/// Holds only configuration; every call to [`PayoffEngine::simulate`] builds
/// and owns its own working state, so one engine can serve concurrent runs.
#[derive(Debug, Clone, Default)]
pub struct PayoffEngine {
    config: SimulationConfig,
}

impl PayoffEngine {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulate paying off `debts` with `extra` applied on top of minimums each period
    pub fn simulate(&self, debts: &[Debt], extra: Money) -> SimulationResult {
        let kind = self.config.period;
        let mut state = PayoffState::from_debts(debts, kind);

        if state.is_settled() {
            log::debug!("no outstanding debts; nothing to simulate");
            return SimulationResult::empty(kind);
        }

        let minimum_outlay = state.minimum_outlay();
        log::debug!(
            "simulating {} debts per {} with extra {} (minimums {})",
            state.balances().len(),
            kind,
            extra,
            minimum_outlay,
        );

        let ceiling = self.config.ceiling();
        let mut timeline = Vec::new();
        while !state.is_settled() && state.period < ceiling {
            let snapshot = self.simulate_period(&mut state, extra);
            log::trace!(
                "{} {}: interest {} paid {} cleared {:?}",
                kind,
                snapshot.period,
                snapshot.interest_accrued,
                snapshot.total_paid,
                snapshot.debts_paid_off,
            );
            timeline.push(snapshot);
        }

        let terminated_early = !state.is_settled();
        if terminated_early {
            log::warn!(
                "payoff did not converge within {} {}s; {} debts still outstanding",
                ceiling,
                kind,
                state.balances().len(),
            );
        }

        let total_interest = state.total_interest();
        log::debug!(
            "simulation finished after {} {}s, total interest {}",
            timeline.len(),
            kind,
            total_interest,
        );

        SimulationResult {
            period_kind: kind,
            periods: timeline.len() as u32,
            total_interest,
            minimum_outlay,
            terminated_early,
            interest_by_debt: state.into_interest_by_debt(),
            timeline,
        }
    }

    /// Run one period: accrue, pay minimums, apply surplus, clear paid-off debts
    fn simulate_period(&self, state: &mut PayoffState, extra: Money) -> PeriodSnapshot {
        state.advance_period();

        let interest_accrued = state.accrue_interest();

        // Minimums are always treated as funded on top of the stated extra
        let mut cash = extra + state.minimum_outlay();
        let minimums_paid = state.pay_minimums(&mut cash);
        let surplus_paid = state.apply_surplus(&mut cash);
        let total_paid = minimums_paid + surplus_paid;

        let debts_paid_off = state.clear_paid_off();

        PeriodSnapshot {
            period: state.period,
            debts_paid_off,
            debts_continuing: state.outstanding(),
            interest_accrued,
            principal_paid: total_paid - interest_accrued,
            total_paid,
            unapplied: cash.non_negative(),
            balances: self.config.record_balances.then(|| state.balances().clone()),
        }
    }
}

/// Simulate with the default configuration for `period`
pub fn simulate(debts: &[Debt], extra: Money, period: PeriodKind) -> SimulationResult {
    PayoffEngine::new(SimulationConfig::for_period(period)).simulate(debts, extra)
}
