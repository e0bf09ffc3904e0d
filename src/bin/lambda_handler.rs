//! AWS Lambda handler for payoff simulations
//!
//! Accepts a debt list plus an extra payment as JSON and returns either the
//! full snowball simulation or the mortgage overpayment comparison.

use chrono::NaiveDate;
use debt_payoff::debt::{load_default_debts, validate_debts};
use debt_payoff::payoff::{PayoffEngine, PeriodKind, SimulationConfig};
use debt_payoff::{Debt, Money, OverpaymentComparator, OverpaymentComparison, SimulationResult};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Simulate,
    Compare,
}

/// Input for one invocation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffRequest {
    #[serde(default)]
    pub action: Action,

    /// Debts to plan over (default: the bundled sample list)
    #[serde(default)]
    pub debts: Option<Vec<Debt>>,

    /// Extra payment per period, in cents
    #[serde(default)]
    pub extra_payment: Money,

    /// Cadence for `simulate`; `compare` always runs fortnightly
    #[serde(default = "default_period")]
    pub period: PeriodKind,

    /// Lower iteration ceiling; values above the cadence's hard ceiling are clamped
    #[serde(default)]
    pub max_periods: Option<u32>,

    /// Plan start date (default: today)
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

fn default_period() -> PeriodKind { PeriodKind::Fortnight }

/// Output for one invocation
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffResponse {
    pub debt_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation: Option<SimulationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<OverpaymentComparison>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PayoffResponse {
    fn failed(message: String) -> Self {
        log::warn!("request rejected: {}", message);
        Self {
            error: Some(message),
            ..Default::default()
        }
    }
}

fn process(request: PayoffRequest) -> PayoffResponse {
    let started = std::time::Instant::now();

    let debts = match request.debts {
        Some(debts) => debts,
        None => match load_default_debts() {
            Ok(debts) => debts,
            Err(e) => return PayoffResponse::failed(format!("Failed to load default debts: {}", e)),
        },
    };

    if let Err(e) = validate_debts(&debts) {
        return PayoffResponse::failed(e.to_string());
    }

    if let Some(max_periods) = request.max_periods {
        let ceiling = match request.action {
            Action::Simulate => request.period.default_max_periods(),
            Action::Compare => PeriodKind::Fortnight.default_max_periods(),
        };
        if max_periods > ceiling {
            log::warn!("maxPeriods {} exceeds the {}-period ceiling; clamping", max_periods, ceiling);
        }
    }

    let mut response = PayoffResponse {
        debt_count: debts.len(),
        ..Default::default()
    };

    match request.action {
        Action::Simulate => {
            let mut config = SimulationConfig::for_period(request.period);
            if let Some(max_periods) = request.max_periods {
                config = config.with_max_periods(max_periods);
            }
            response.simulation = Some(PayoffEngine::new(config).simulate(&debts, request.extra_payment));
        }
        Action::Compare => {
            let comparator = match request.max_periods {
                Some(max_periods) => OverpaymentComparator::with_max_periods(max_periods),
                None => OverpaymentComparator::new(),
            };
            let start = request
                .start_date
                .unwrap_or_else(|| chrono::Local::now().date_naive());
            response.comparison = Some(comparator.compare(&debts, request.extra_payment, start));
        }
    }

    response.execution_time_ms = started.elapsed().as_millis() as u64;
    response
}

async fn handler(event: LambdaEvent<PayoffRequest>) -> Result<PayoffResponse, Error> {
    let (request, _context) = event.into_parts();
    log::info!("{:?} request, extra {}", request.action, request.extra_payment);
    Ok(process(request))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> PayoffRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_defaults() {
        let req = request("{}");
        assert_eq!(req.action, Action::Simulate);
        assert_eq!(req.period, PeriodKind::Fortnight);
        assert_eq!(req.extra_payment, Money::ZERO);
        assert!(req.debts.is_none());
    }

    #[test]
    fn test_simulate_request() {
        let req = request(
            r#"{
                "action": "simulate",
                "period": "month",
                "extraPayment": 20000,
                "debts": [{
                    "id": "cc", "name": "Visa", "debtType": "credit-card",
                    "originalPrincipal": 100000, "currentBalance": 100000,
                    "interestRate": 0.2, "minimumPayment": 5000,
                    "minPaymentFrequency": "MONTHLY", "priority": 1
                }]
            }"#,
        );

        let response = process(req);
        assert!(response.error.is_none());
        assert_eq!(response.debt_count, 1);
        let simulation = response.simulation.unwrap();
        assert_eq!(simulation.period_kind, PeriodKind::Month);
        assert!(!simulation.terminated_early);
        assert!(response.comparison.is_none());
    }

    #[test]
    fn test_invalid_debt_reports_error() {
        let req = request(
            r#"{
                "debts": [{
                    "id": "cc", "name": "Visa", "debtType": "credit-card",
                    "originalPrincipal": 100000, "currentBalance": -5,
                    "interestRate": 0.2, "minimumPayment": 5000,
                    "minPaymentFrequency": "MONTHLY", "priority": 1
                }]
            }"#,
        );

        let response = process(req);
        assert!(response.error.is_some());
        assert!(response.simulation.is_none());
    }

    #[test]
    fn test_max_periods_cannot_exceed_ceiling() {
        // $10/month against ~$38/fortnight of interest never clears
        let req = request(
            r#"{
                "maxPeriods": 4000000000,
                "debts": [{
                    "id": "cc", "name": "Visa", "debtType": "credit-card",
                    "originalPrincipal": 500000, "currentBalance": 500000,
                    "interestRate": 0.2, "minimumPayment": 1000,
                    "minPaymentFrequency": "MONTHLY", "priority": 1
                }]
            }"#,
        );

        let simulation = process(req).simulation.unwrap();
        assert!(simulation.terminated_early);
        assert_eq!(simulation.periods, PeriodKind::Fortnight.default_max_periods());
        assert_eq!(simulation.timeline.len(), 1300);
    }

    #[test]
    fn test_compare_without_mortgage() {
        let req = request(
            r#"{
                "action": "compare",
                "extraPayment": 10000,
                "startDate": "2024-01-01",
                "debts": [{
                    "id": "cc", "name": "Visa", "debtType": "credit-card",
                    "originalPrincipal": 100000, "currentBalance": 100000,
                    "interestRate": 0.2, "minimumPayment": 5000,
                    "minPaymentFrequency": "MONTHLY", "priority": 1
                }]
            }"#,
        );

        let comparison = process(req).comparison.unwrap();
        assert!(comparison.mortgage_id.is_none());
        assert!(comparison.baseline.is_empty());
    }
}
