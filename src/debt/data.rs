//! Debt records consumed by the payoff engine

use crate::error::{PayoffError, Result};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Opaque debt identifier, unique within a simulation run
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DebtId(String);

impl DebtId {
    pub fn new(id: impl Into<String>) -> Self {
        DebtId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DebtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DebtId {
    fn from(id: &str) -> Self {
        DebtId(id.to_string())
    }
}

impl From<String> for DebtId {
    fn from(id: String) -> Self {
        DebtId(id)
    }
}

/// Kind of debt
///
/// The engine treats every debt the same way; only the overpayment
/// comparator looks at this to find the mortgage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DebtType {
    CreditCard,
    Mortgage,
}

impl DebtType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtType::CreditCard => "credit-card",
            DebtType::Mortgage => "mortgage",
        }
    }
}

impl FromStr for DebtType {
    type Err = PayoffError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "credit-card" | "credit_card" | "creditcard" => Ok(DebtType::CreditCard),
            "mortgage" => Ok(DebtType::Mortgage),
            other => Err(PayoffError::UnknownDebtType(other.to_string())),
        }
    }
}

/// Native cadence of a debt's contractual minimum payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentFrequency {
    Fortnightly,
    Monthly,
}

impl PaymentFrequency {
    pub fn periods_per_year(&self) -> i64 {
        match self {
            PaymentFrequency::Fortnightly => 26,
            PaymentFrequency::Monthly => 12,
        }
    }

    /// Re-express an amount quoted at this frequency in `target` units
    ///
    /// Conversion is by annual total (26 fortnights = 12 months), not by
    /// calendar days: `monthly = fortnightly * 26 / 12` and
    /// `fortnightly = monthly * 12 / 26`.
    pub fn convert(&self, amount: Money, target: PaymentFrequency) -> Money {
        if *self == target {
            amount
        } else {
            amount.scale(self.periods_per_year(), target.periods_per_year())
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Fortnightly => "FORTNIGHTLY",
            PaymentFrequency::Monthly => "MONTHLY",
        }
    }
}

impl FromStr for PaymentFrequency {
    type Err = PayoffError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FORTNIGHTLY" => Ok(PaymentFrequency::Fortnightly),
            "MONTHLY" => Ok(PaymentFrequency::Monthly),
            other => Err(PayoffError::UnknownFrequency(other.to_string())),
        }
    }
}

/// A single debt as handed to the payoff engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    /// Unique identifier within the run
    pub id: DebtId,

    /// Display label, not used in computation
    pub name: String,

    pub debt_type: DebtType,

    /// Principal when the debt was taken out
    pub original_principal: Money,

    /// Balance at the start of the simulation
    pub current_balance: Money,

    /// Annual nominal rate as a fraction (0.185 = 18.5%)
    pub interest_rate: f64,

    /// Contractual minimum, quoted per `min_payment_frequency`
    pub minimum_payment: Money,

    pub min_payment_frequency: PaymentFrequency,

    /// Lower value is attacked first by surplus payment
    pub priority: i32,
}

impl Debt {
    /// Create a debt whose original principal equals its current balance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<DebtId>,
        name: impl Into<String>,
        debt_type: DebtType,
        current_balance: Money,
        interest_rate: f64,
        minimum_payment: Money,
        min_payment_frequency: PaymentFrequency,
        priority: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            debt_type,
            original_principal: current_balance,
            current_balance,
            interest_rate,
            minimum_payment,
            min_payment_frequency,
            priority,
        }
    }

    pub fn with_original_principal(mut self, original_principal: Money) -> Self {
        self.original_principal = original_principal;
        self
    }

    pub fn is_mortgage(&self) -> bool {
        self.debt_type == DebtType::Mortgage
    }

    /// Minimum payment expressed at the given frequency
    pub fn minimum_at(&self, frequency: PaymentFrequency) -> Money {
        self.min_payment_frequency.convert(self.minimum_payment, frequency)
    }

    /// Check the amounts and rate the engine relies on
    ///
    /// The engine does not re-validate, so loaders and request handlers
    /// call this before simulating.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| PayoffError::InvalidDebt {
            id: self.id.to_string(),
            reason: reason.to_string(),
        };

        if self.id.as_str().trim().is_empty() {
            return Err(invalid("id must not be empty"));
        }
        if self.current_balance.is_negative() {
            return Err(invalid("current balance must not be negative"));
        }
        if self.original_principal.is_negative() {
            return Err(invalid("original principal must not be negative"));
        }
        if self.minimum_payment.is_negative() {
            return Err(invalid("minimum payment must not be negative"));
        }
        if !self.interest_rate.is_finite() || self.interest_rate < 0.0 {
            return Err(invalid("interest rate must be a non-negative fraction"));
        }

        Ok(())
    }
}

/// Validate every debt and reject duplicate ids
pub fn validate_debts(debts: &[Debt]) -> Result<()> {
    let mut seen = HashSet::with_capacity(debts.len());
    for debt in debts {
        debt.validate()?;
        if !seen.insert(&debt.id) {
            return Err(PayoffError::DuplicateDebtId(debt.id.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Debt {
        Debt::new(
            "cc",
            "Visa",
            DebtType::CreditCard,
            Money::from_cents(500_000),
            0.185,
            Money::from_cents(7_500),
            PaymentFrequency::Monthly,
            1,
        )
    }

    #[test]
    fn test_minimum_conversion() {
        let debt = card();
        assert_eq!(debt.minimum_at(PaymentFrequency::Monthly), Money::from_cents(7_500));
        assert_eq!(debt.minimum_at(PaymentFrequency::Fortnightly), Money::from_cents(3_462));

        let fortnightly = Money::from_cents(120_000);
        assert_eq!(
            PaymentFrequency::Fortnightly.convert(fortnightly, PaymentFrequency::Monthly),
            Money::from_cents(260_000)
        );
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("credit-card".parse::<DebtType>().unwrap(), DebtType::CreditCard);
        assert_eq!("Mortgage".parse::<DebtType>().unwrap(), DebtType::Mortgage);
        assert!("car-loan".parse::<DebtType>().is_err());

        assert_eq!("monthly".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Monthly);
        assert_eq!("FORTNIGHTLY".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Fortnightly);
        assert!("WEEKLY".parse::<PaymentFrequency>().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_amounts() {
        assert!(card().validate().is_ok());

        let mut negative = card();
        negative.current_balance = Money::from_cents(-1);
        assert!(matches!(negative.validate(), Err(PayoffError::InvalidDebt { .. })));

        let mut bad_rate = card();
        bad_rate.interest_rate = f64::NAN;
        assert!(bad_rate.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let debts = vec![card(), card()];
        assert!(matches!(validate_debts(&debts), Err(PayoffError::DuplicateDebtId(id)) if id == "cc"));
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(card()).unwrap();
        assert_eq!(json["debtType"], "credit-card");
        assert_eq!(json["minPaymentFrequency"], "MONTHLY");
        assert_eq!(json["currentBalance"], 500_000);
        assert_eq!(json["id"], "cc");
    }
}
