//! Load debt lists from CSV or JSON files

use super::{validate_debts, Debt, DebtId, DebtType, PaymentFrequency};
use crate::error::Result;
use crate::money::Money;
use csv::Reader;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Default path to the sample debt list
pub const DEFAULT_DEBTS_PATH: &str = "data/debts.csv";

/// Raw CSV row; amounts are integer cents
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "id")]
    id: String,
    #[serde(rename = "name")]
    name: String,
    #[serde(rename = "debtType")]
    debt_type: String,
    #[serde(rename = "originalPrincipal", default)]
    original_principal: Option<i64>,
    #[serde(rename = "currentBalance")]
    current_balance: i64,
    #[serde(rename = "interestRate")]
    interest_rate: f64,
    #[serde(rename = "minimumPayment")]
    minimum_payment: i64,
    #[serde(rename = "minPaymentFrequency")]
    min_payment_frequency: String,
    #[serde(rename = "priority")]
    priority: i32,
}

impl CsvRow {
    fn into_debt(self) -> Result<Debt> {
        let debt_type: DebtType = self.debt_type.parse()?;
        let frequency: PaymentFrequency = self.min_payment_frequency.parse()?;
        let current_balance = Money::from_cents(self.current_balance);

        let debt = Debt::new(
            DebtId::new(self.id),
            self.name,
            debt_type,
            current_balance,
            self.interest_rate,
            Money::from_cents(self.minimum_payment),
            frequency,
            self.priority,
        )
        .with_original_principal(
            self.original_principal
                .map(Money::from_cents)
                .unwrap_or(current_balance),
        );

        Ok(debt)
    }
}

/// Load debts from any CSV reader
pub fn load_debts_from_csv_reader<R: Read>(reader: R) -> Result<Vec<Debt>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut debts = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        debts.push(row.into_debt()?);
    }

    validate_debts(&debts)?;
    Ok(debts)
}

/// Load debts from a JSON array (same field names as the HTTP payload)
pub fn load_debts_from_json_reader<R: Read>(reader: R) -> Result<Vec<Debt>> {
    let debts: Vec<Debt> = serde_json::from_reader(reader)?;
    validate_debts(&debts)?;
    Ok(debts)
}

/// Load debts from a file, choosing the format by extension (`.json` or CSV)
pub fn load_debts<P: AsRef<Path>>(path: P) -> Result<Vec<Debt>> {
    let path = path.as_ref();
    let file = BufReader::new(File::open(path)?);

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let debts = if is_json {
        load_debts_from_json_reader(file)?
    } else {
        load_debts_from_csv_reader(file)?
    };

    log::debug!("loaded {} debts from {}", debts.len(), path.display());
    Ok(debts)
}

/// Load the sample debts from the default location
pub fn load_default_debts() -> Result<Vec<Debt>> {
    load_debts(DEFAULT_DEBTS_PATH)
}
