//! Scenario runner for batch payoff simulations
//!
//! Recalculating a plan as the extra-payment slider moves means running the
//! same debts against many extra amounts. Each run owns its own working
//! state, so the sweep fans out across threads with no coordination.

use crate::debt::Debt;
use crate::money::Money;
use crate::payoff::{PayoffEngine, SimulationConfig, SimulationResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Outcome of one extra-payment amount in a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepPoint {
    pub extra_payment: Money,
    pub periods: u32,
    pub total_interest: Money,
    pub terminated_early: bool,
}

impl SweepPoint {
    fn from_result(extra_payment: Money, result: &SimulationResult) -> Self {
        Self {
            extra_payment,
            periods: result.periods,
            total_interest: result.total_interest,
            terminated_early: result.terminated_early,
        }
    }
}

/// Runs many simulations against one configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(SimulationConfig::fortnightly());
/// let extras: Vec<_> = (0..=10).map(|i| Money::from_dollars(i * 50)).collect();
/// for point in runner.sweep(&debts, &extras) {
///     println!("{} -> {} fortnights", point.extra_payment, point.periods);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: PayoffEngine,
}

impl ScenarioRunner {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            engine: PayoffEngine::new(config),
        }
    }

    /// Run a single simulation
    pub fn run(&self, debts: &[Debt], extra: Money) -> SimulationResult {
        self.engine.simulate(debts, extra)
    }

    /// Run full simulations for several extra amounts, in input order
    pub fn run_scenarios(&self, debts: &[Debt], extras: &[Money]) -> Vec<SimulationResult> {
        extras
            .par_iter()
            .map(|&extra| self.engine.simulate(debts, extra))
            .collect()
    }

    /// Summarise one simulation per extra amount, in input order
    ///
    /// Timelines are discarded as each run finishes, so wide sweeps stay
    /// cheap on memory.
    pub fn sweep(&self, debts: &[Debt], extras: &[Money]) -> Vec<SweepPoint> {
        log::debug!("sweeping {} extra-payment amounts over {} debts", extras.len(), debts.len());

        extras
            .par_iter()
            .map(|&extra| SweepPoint::from_result(extra, &self.engine.simulate(debts, extra)))
            .collect()
    }

    pub fn config(&self) -> &SimulationConfig {
        self.engine.config()
    }
}
