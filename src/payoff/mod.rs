//! Snowball payoff simulation

mod state;
mod engine;
mod timeline;
pub mod calendar;

pub use state::PayoffState;
pub use engine::{simulate, PayoffEngine, PeriodKind, SimulationConfig, MAX_FORTNIGHTS, MAX_MONTHS};
pub use timeline::{DebtPayoff, PayoffSummary, PeriodSnapshot, SimulationResult};
pub use calendar::{period_date, period_date_iso};
