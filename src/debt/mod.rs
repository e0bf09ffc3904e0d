//! Debt records and loading

mod data;
pub mod loader;

pub use data::{validate_debts, Debt, DebtId, DebtType, PaymentFrequency};
pub use loader::{load_debts, load_debts_from_csv_reader, load_debts_from_json_reader, load_default_debts};
