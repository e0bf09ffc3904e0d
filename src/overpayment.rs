//! Mortgage overpayment comparison
//!
//! Runs the payoff engine twice at fortnightly cadence:
//! - baseline: the mortgage on its own, minimum payments only
//! - with Fire Extinguisher: every debt, with the fortnightly extra payment
//!   snowballing through the other debts before reaching the mortgage
//!
//! and compares the mortgage's balance trajectory in each.

use crate::debt::{Debt, DebtId};
use crate::money::Money;
use crate::payoff::{period_date, PayoffEngine, PeriodKind, SimulationConfig, SimulationResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Mortgage balance at the end of a period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancePoint {
    /// Period index; 0 is the starting balance
    pub period_index: u32,

    /// Projected calendar date of the period end
    #[serde(rename = "dateISO")]
    pub date: NaiveDate,

    pub remaining_balance: Money,
}

/// Baseline vs with-Fire-Extinguisher comparison for a mortgage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverpaymentComparison {
    /// The mortgage being compared, if the debt list had one
    pub mortgage_id: Option<DebtId>,

    pub baseline: Vec<BalancePoint>,

    pub with_fe: Vec<BalancePoint>,

    /// `None` when there is no mortgage or it does not clear within the ceiling
    #[serde(rename = "payoffDateBaselineISO")]
    pub payoff_date_baseline: Option<NaiveDate>,

    #[serde(rename = "payoffDateWithFeISO")]
    pub payoff_date_with_fe: Option<NaiveDate>,

    /// Fortnights until the mortgage clears (or the ceiling) in each run
    pub baseline_periods: u32,
    pub with_fe_periods: u32,

    /// Period in the with-FE run where the last non-mortgage debt cleared
    pub other_debts_cleared_period: Option<u32>,

    /// Floored at zero
    pub time_saved_in_periods: u32,

    /// Interest across every debt in each run
    pub baseline_interest: Money,
    pub with_fe_interest: Money,

    /// Interest accrued on the mortgage alone in each run
    pub baseline_mortgage_interest: Money,
    pub with_fe_mortgage_interest: Money,

    /// `baseline_interest - with_fe_interest`, floored at zero
    pub interest_saved: Money,

    /// Reduction in the mortgage's own interest, floored at zero
    pub mortgage_interest_saved: Money,
}

impl OverpaymentComparison {
    /// Comparison for a debt list with no mortgage
    pub fn empty() -> Self {
        Self {
            mortgage_id: None,
            baseline: Vec::new(),
            with_fe: Vec::new(),
            payoff_date_baseline: None,
            payoff_date_with_fe: None,
            baseline_periods: 0,
            with_fe_periods: 0,
            other_debts_cleared_period: None,
            time_saved_in_periods: 0,
            baseline_interest: Money::ZERO,
            with_fe_interest: Money::ZERO,
            baseline_mortgage_interest: Money::ZERO,
            with_fe_mortgage_interest: Money::ZERO,
            interest_saved: Money::ZERO,
            mortgage_interest_saved: Money::ZERO,
        }
    }

    /// Time saved in years (26 fortnights per year)
    pub fn years_saved(&self) -> f64 {
        self.time_saved_in_periods as f64 / PeriodKind::Fortnight.periods_per_year()
    }
}

/// The mortgage's path through one simulation run
#[derive(Debug, Clone)]
struct MortgageTrack {
    points: Vec<BalancePoint>,
    periods: u32,
    payoff_date: Option<NaiveDate>,
    total_interest: Money,
    mortgage_interest: Money,
}

impl MortgageTrack {
    /// Extract the mortgage's balance trajectory, stopping at its payoff period
    fn from_result(result: &SimulationResult, mortgage: &Debt, start: NaiveDate) -> Self {
        let id = &mortgage.id;
        let mut points = Vec::with_capacity(result.timeline.len() + 1);
        points.push(BalancePoint {
            period_index: 0,
            date: start,
            remaining_balance: mortgage.current_balance.non_negative(),
        });

        for snapshot in &result.timeline {
            let paid_off = snapshot.debts_paid_off.contains(id);
            let remaining = if paid_off {
                Money::ZERO
            } else {
                snapshot.balance_of(id).unwrap_or(Money::ZERO)
            };
            points.push(BalancePoint {
                period_index: snapshot.period,
                date: period_date(start, PeriodKind::Fortnight, snapshot.period),
                remaining_balance: remaining,
            });
            if paid_off {
                break;
            }
        }

        let payoff_period = if mortgage.current_balance.is_positive() {
            result.payoff_period(id)
        } else {
            Some(0)
        };
        let periods = payoff_period.unwrap_or(result.periods);

        Self {
            points,
            periods,
            payoff_date: payoff_period.map(|p| period_date(start, PeriodKind::Fortnight, p)),
            total_interest: result.total_interest,
            mortgage_interest: result.interest_for(id),
        }
    }
}

/// Runs baseline and accelerated mortgage payoffs side by side
#[derive(Debug, Clone)]
pub struct OverpaymentComparator {
    engine: PayoffEngine,
}

impl OverpaymentComparator {
    /// Comparator with the standard fortnightly ceiling
    pub fn new() -> Self {
        Self::with_max_periods(PeriodKind::Fortnight.default_max_periods())
    }

    /// Comparator with a custom ceiling (in fortnights)
    pub fn with_max_periods(max_periods: u32) -> Self {
        let config = SimulationConfig::fortnightly()
            .with_max_periods(max_periods)
            .with_balances(true);
        Self {
            engine: PayoffEngine::new(config),
        }
    }

    /// Compare the mortgage's payoff with and without the fortnightly extra
    pub fn compare(&self, debts: &[Debt], fortnightly_extra: Money, start: NaiveDate) -> OverpaymentComparison {
        let Some(mortgage) = debts.iter().find(|d| d.is_mortgage()) else {
            log::warn!("no mortgage among {} debts; returning empty comparison", debts.len());
            return OverpaymentComparison::empty();
        };

        let mortgage_only = std::slice::from_ref(mortgage);

        // No extra means no acceleration: the with-FE run is the baseline
        if !fortnightly_extra.is_positive() {
            log::debug!(
                "extra {} is not positive; skipping accelerated run for mortgage {}",
                fortnightly_extra,
                mortgage.id,
            );
            let baseline = self.engine.simulate(mortgage_only, Money::ZERO);
            let track = MortgageTrack::from_result(&baseline, mortgage, start);
            return Self::assemble(mortgage, track.clone(), track, None);
        }

        let (baseline, with_fe) = rayon::join(
            || self.engine.simulate(mortgage_only, Money::ZERO),
            || self.engine.simulate(debts, fortnightly_extra),
        );

        let other_cleared = other_debts_cleared_period(&with_fe, debts);
        log::debug!(
            "mortgage {}: other debts cleared at fortnight {:?}",
            mortgage.id,
            other_cleared,
        );

        Self::assemble(
            mortgage,
            MortgageTrack::from_result(&baseline, mortgage, start),
            MortgageTrack::from_result(&with_fe, mortgage, start),
            other_cleared,
        )
    }

    fn assemble(
        mortgage: &Debt,
        baseline: MortgageTrack,
        with_fe: MortgageTrack,
        other_debts_cleared_period: Option<u32>,
    ) -> OverpaymentComparison {
        let time_saved_in_periods = baseline.periods.saturating_sub(with_fe.periods);
        let interest_saved = (baseline.total_interest - with_fe.total_interest).non_negative();
        let mortgage_interest_saved =
            (baseline.mortgage_interest - with_fe.mortgage_interest).non_negative();

        log::info!(
            "mortgage {}: {} fortnights baseline, {} with extra, interest saved {}",
            mortgage.id,
            baseline.periods,
            with_fe.periods,
            interest_saved,
        );

        OverpaymentComparison {
            mortgage_id: Some(mortgage.id.clone()),
            payoff_date_baseline: baseline.payoff_date,
            payoff_date_with_fe: with_fe.payoff_date,
            baseline_periods: baseline.periods,
            with_fe_periods: with_fe.periods,
            other_debts_cleared_period,
            time_saved_in_periods,
            baseline_interest: baseline.total_interest,
            with_fe_interest: with_fe.total_interest,
            baseline_mortgage_interest: baseline.mortgage_interest,
            with_fe_mortgage_interest: with_fe.mortgage_interest,
            interest_saved,
            mortgage_interest_saved,
            baseline: baseline.points,
            with_fe: with_fe.points,
        }
    }
}

impl Default for OverpaymentComparator {
    fn default() -> Self {
        Self::new()
    }
}

/// Period in which the last outstanding non-mortgage debt was paid off
///
/// `None` if there were no such debts or any of them never cleared.
fn other_debts_cleared_period(result: &SimulationResult, debts: &[Debt]) -> Option<u32> {
    let mut others = debts
        .iter()
        .filter(|d| !d.is_mortgage() && d.current_balance.is_positive())
        .peekable();

    others.peek()?;

    others
        .map(|d| result.payoff_period(&d.id))
        .collect::<Option<Vec<u32>>>()
        .and_then(|periods| periods.into_iter().max())
}

/// Compare with the standard fortnightly ceiling
pub fn compare_overpayment(debts: &[Debt], fortnightly_extra: Money, start: NaiveDate) -> OverpaymentComparison {
    OverpaymentComparator::new().compare(debts, fortnightly_extra, start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debt::{DebtType, PaymentFrequency};
    use approx::assert_relative_eq;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

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

    fn mortgage() -> Debt {
        Debt::new(
            "home",
            "Home loan",
            DebtType::Mortgage,
            Money::from_cents(45_000_000),
            0.0625,
            Money::from_cents(125_000),
            PaymentFrequency::Fortnightly,
            5,
        )
    }

    #[test]
    fn test_no_mortgage_is_empty() {
        let comparison = compare_overpayment(&[card()], Money::from_cents(40_000), start());

        assert_eq!(comparison, OverpaymentComparison::empty());
        assert!(comparison.payoff_date_baseline.is_none());
        assert_eq!(comparison.time_saved_in_periods, 0);
    }

    #[test]
    fn test_zero_extra_is_degenerate() {
        let comparison = compare_overpayment(&[card(), mortgage()], Money::ZERO, start());

        assert_eq!(comparison.baseline.len(), comparison.with_fe.len());
        assert_eq!(comparison.time_saved_in_periods, 0);
        assert_eq!(comparison.interest_saved, Money::ZERO);
        assert_eq!(comparison.mortgage_interest_saved, Money::ZERO);
        assert_eq!(comparison.payoff_date_baseline, comparison.payoff_date_with_fe);
        assert!(comparison.payoff_date_baseline.is_some());
    }

    #[test]
    fn test_negative_extra_takes_baseline_path() {
        let comparison = compare_overpayment(&[card(), mortgage()], Money::from_cents(-5_000), start());

        assert_eq!(comparison.with_fe, comparison.baseline);
        assert_eq!(comparison.time_saved_in_periods, 0);
        assert_eq!(comparison.interest_saved, Money::ZERO);
        assert!(comparison.other_debts_cleared_period.is_none());
    }

    #[test]
    fn test_extra_accelerates_mortgage() {
        let comparison = compare_overpayment(&[card(), mortgage()], Money::from_cents(40_000), start());

        assert_eq!(comparison.mortgage_id, Some(DebtId::from("home")));
        assert!(comparison.with_fe.len() < comparison.baseline.len());
        assert!(comparison.time_saved_in_periods > 0);
        assert!(comparison.interest_saved > Money::ZERO);
        assert!(comparison.payoff_date_with_fe < comparison.payoff_date_baseline);

        // The card clears first; until then the mortgage only gets its minimum
        let cleared = comparison.other_debts_cleared_period.expect("card should clear");
        assert!(cleared < comparison.with_fe_periods);
        for i in 0..cleared as usize {
            assert_eq!(comparison.with_fe[i], comparison.baseline[i]);
        }
        assert!(comparison.with_fe[cleared as usize + 2].remaining_balance
            < comparison.baseline[cleared as usize + 2].remaining_balance);
    }

    #[test]
    fn test_interest_saved_uses_run_totals() {
        let comparison = compare_overpayment(&[card(), mortgage()], Money::from_cents(40_000), start());

        // Baseline run holds only the mortgage, so its total is the mortgage's interest
        assert_eq!(comparison.baseline_interest, comparison.baseline_mortgage_interest);
        // With-FE total also carries the card's interest
        assert!(comparison.with_fe_interest > comparison.with_fe_mortgage_interest);

        assert_eq!(
            comparison.interest_saved,
            comparison.baseline_interest - comparison.with_fe_interest
        );
        assert_eq!(comparison.with_fe_interest, Money::from_cents(29_182_229));
        assert_eq!(comparison.with_fe_mortgage_interest, Money::from_cents(29_158_712));
        assert_eq!(comparison.interest_saved, Money::from_cents(30_220_423));
        assert_eq!(comparison.mortgage_interest_saved, Money::from_cents(30_243_940));
    }

    #[test]
    fn test_points_and_dates() {
        let comparison = compare_overpayment(&[card(), mortgage()], Money::from_cents(40_000), start());

        let first = &comparison.baseline[0];
        assert_eq!(first.period_index, 0);
        assert_eq!(first.date, start());
        assert_eq!(first.remaining_balance, Money::from_cents(45_000_000));
        assert_eq!(comparison.baseline[1].date, NaiveDate::from_ymd_opt(2025, 7, 15).unwrap());

        let last = comparison.with_fe.last().unwrap();
        assert_eq!(last.remaining_balance, Money::ZERO);
        assert_eq!(last.period_index, comparison.with_fe_periods);
        assert_eq!(Some(last.date), comparison.payoff_date_with_fe);
        assert_eq!(
            comparison.time_saved_in_periods,
            comparison.baseline_periods - comparison.with_fe_periods
        );
        assert_relative_eq!(
            comparison.years_saved(),
            comparison.time_saved_in_periods as f64 / 26.0
        );
    }

    #[test]
    fn test_ceiling_leaves_payoff_date_empty() {
        let mut stuck = mortgage();
        // Minimum below fortnightly interest (~$1,081)
        stuck.minimum_payment = Money::from_cents(50_000);

        let comparison = OverpaymentComparator::with_max_periods(52).compare(&[stuck], Money::ZERO, start());

        assert!(comparison.payoff_date_baseline.is_none());
        assert_eq!(comparison.baseline_periods, 52);
        assert_eq!(comparison.baseline.len(), 53);
        assert!(comparison.baseline.last().unwrap().remaining_balance > Money::from_cents(45_000_000));
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(OverpaymentComparison::empty()).unwrap();
        assert!(json["payoffDateBaselineISO"].is_null());
        assert!(json["payoffDateWithFeISO"].is_null());
        assert_eq!(json["timeSavedInPeriods"], 0);
        assert_eq!(json["interestSaved"], 0);

        let comparison = compare_overpayment(&[mortgage()], Money::ZERO, start());
        let json = serde_json::to_value(&comparison).unwrap();
        assert_eq!(json["baseline"][1]["dateISO"], "2025-07-15");
        assert_eq!(json["baseline"][0]["remainingBalance"], 45_000_000);
    }
}
