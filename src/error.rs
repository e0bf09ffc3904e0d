//! Error types for debt loading and validation
//!
//! The simulation itself never fails; these errors come from reading and
//! checking the debt records handed to it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayoffError {
    #[error("failed to read debts: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed debt CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed debt JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("debt '{id}' is invalid: {reason}")]
    InvalidDebt { id: String, reason: String },

    #[error("debt id '{0}' appears more than once")]
    DuplicateDebtId(String),

    #[error("unknown debt type '{0}' (expected credit-card or mortgage)")]
    UnknownDebtType(String),

    #[error("unknown minimum payment frequency '{0}' (expected FORTNIGHTLY or MONTHLY)")]
    UnknownFrequency(String),
}

pub type Result<T> = std::result::Result<T, PayoffError>;
