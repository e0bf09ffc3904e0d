//! Debt Payoff - snowball payoff engine for fortnightly bucket budgeting
//!
//! This library provides:
//! - Period-stepped snowball simulation across credit cards and mortgages
//! - Fire Extinguisher surplus cascading onto the priority debt
//! - Mortgage overpayment comparison (baseline vs accelerated)
//! - Parallel sweeps over extra-payment amounts
//!
//! All money is integer cents; nothing here performs I/O except the debt loaders.

pub mod error;
pub mod money;
pub mod debt;
pub mod payoff;
pub mod overpayment;
pub mod scenario;

// Re-export commonly used types
pub use error::{PayoffError, Result};
pub use money::Money;
pub use debt::{Debt, DebtId, DebtType, PaymentFrequency};
pub use payoff::{simulate, PayoffEngine, PeriodKind, PeriodSnapshot, SimulationConfig, SimulationResult};
pub use overpayment::{compare_overpayment, BalancePoint, OverpaymentComparator, OverpaymentComparison};
pub use scenario::{ScenarioRunner, SweepPoint};
