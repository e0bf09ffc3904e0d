//! Working state for a single payoff simulation
//!
//! Created at the start of a run, mutated once per period by the engine and
//! dropped when the run ends. Nothing in here is shared between runs.

use crate::debt::{Debt, DebtId};
use crate::money::Money;
use super::engine::PeriodKind;
use std::collections::BTreeMap;

/// A debt's fixed per-run parameters, already expressed in period units
#[derive(Debug, Clone)]
struct ScheduledDebt {
    id: DebtId,

    /// Annual rate divided by periods per year
    period_rate: f64,

    /// Minimum payment converted to the simulation's cadence
    minimum: Money,
}

/// Balances and running totals for one simulation
#[derive(Debug, Clone)]
pub struct PayoffState {
    /// Current period (1-indexed once the first period starts)
    pub period: u32,

    /// Debts in attack order, sorted once at construction
    order: Vec<ScheduledDebt>,

    /// Remaining balance per outstanding debt; paid-off debts are removed
    balances: BTreeMap<DebtId, Money>,

    /// Interest accrued across all periods
    total_interest: Money,

    /// Interest accrued per debt across all periods
    interest_by_debt: BTreeMap<DebtId, Money>,
}

impl PayoffState {
    /// Build the working state from the caller's debts
    ///
    /// Debts are ordered by ascending priority, then ascending current balance.
    /// This order is fixed for the whole run. Debts that start at or below
    /// zero are already paid and take no part in the run.
    pub fn from_debts(debts: &[Debt], kind: PeriodKind) -> Self {
        let mut sorted: Vec<&Debt> = debts
            .iter()
            .filter(|d| d.current_balance.is_positive())
            .collect();
        sorted.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(a.current_balance.cmp(&b.current_balance))
        });

        let order = sorted
            .iter()
            .map(|d| ScheduledDebt {
                id: d.id.clone(),
                period_rate: d.interest_rate / kind.periods_per_year(),
                minimum: d.minimum_at(kind.frequency()),
            })
            .collect();

        let balances = sorted
            .iter()
            .map(|d| (d.id.clone(), d.current_balance))
            .collect();

        let interest_by_debt = sorted
            .iter()
            .map(|d| (d.id.clone(), Money::ZERO))
            .collect();

        Self {
            period: 0,
            order,
            balances,
            total_interest: Money::ZERO,
            interest_by_debt,
        }
    }

    /// True once every debt has been paid off
    pub fn is_settled(&self) -> bool {
        self.balances.is_empty()
    }

    /// Move to the next period
    pub fn advance_period(&mut self) {
        self.period += 1;
    }

    /// Add one period of interest to every outstanding balance
    ///
    /// Returns the interest accrued this period. Each debt's interest is
    /// rounded to the cent before it is added.
    pub fn accrue_interest(&mut self) -> Money {
        let mut period_interest = Money::ZERO;

        for debt in &self.order {
            if let Some(balance) = self.balances.get_mut(&debt.id) {
                let interest = balance.apply_rate(debt.period_rate);
                *balance += interest;
                period_interest += interest;
                *self.interest_by_debt.entry(debt.id.clone()).or_default() += interest;
            }
        }

        self.total_interest += period_interest;
        period_interest
    }

    /// Sum of this period's minimums across outstanding debts
    pub fn minimum_outlay(&self) -> Money {
        self.order
            .iter()
            .filter(|d| self.balances.contains_key(&d.id))
            .map(|d| d.minimum)
            .sum()
    }

    /// Pay each outstanding debt its minimum, in attack order
    ///
    /// Each payment is `min(minimum, balance, cash)`. Returns the total paid
    /// and leaves the remainder in `cash`.
    pub fn pay_minimums(&mut self, cash: &mut Money) -> Money {
        let mut paid = Money::ZERO;

        for debt in &self.order {
            if let Some(balance) = self.balances.get_mut(&debt.id) {
                let payment = debt.minimum.min(*balance).min(cash.non_negative());
                *balance -= payment;
                *cash -= payment;
                paid += payment;
            }
        }

        paid
    }

    /// Put leftover cash on the first debt in attack order that still owes
    ///
    /// Only one debt receives surplus in a period. Returns the amount applied;
    /// anything beyond that debt's balance stays in `cash`.
    pub fn apply_surplus(&mut self, cash: &mut Money) -> Money {
        if !cash.is_positive() {
            return Money::ZERO;
        }

        let target = self
            .order
            .iter()
            .find(|d| self.balances.get(&d.id).is_some_and(|b| b.is_positive()))
            .map(|d| d.id.clone());

        let Some(target) = target else {
            return Money::ZERO;
        };

        match self.balances.get_mut(&target) {
            Some(balance) => {
                let payment = (*cash).min(*balance);
                *balance -= payment;
                *cash -= payment;
                payment
            }
            None => Money::ZERO,
        }
    }

    /// Remove debts whose balance reached zero, returning them in attack order
    pub fn clear_paid_off(&mut self) -> Vec<DebtId> {
        let mut cleared = Vec::new();

        for debt in &self.order {
            if self.balances.get(&debt.id).is_some_and(|b| !b.is_positive()) {
                self.balances.remove(&debt.id);
                cleared.push(debt.id.clone());
            }
        }

        cleared
    }

    /// Outstanding debts in attack order
    pub fn outstanding(&self) -> Vec<DebtId> {
        self.order
            .iter()
            .filter(|d| self.balances.contains_key(&d.id))
            .map(|d| d.id.clone())
            .collect()
    }

    pub fn balances(&self) -> &BTreeMap<DebtId, Money> {
        &self.balances
    }

    pub fn balance_of(&self, id: &DebtId) -> Option<Money> {
        self.balances.get(id).copied()
    }

    pub fn total_interest(&self) -> Money {
        self.total_interest
    }

    /// Consume the state, handing back the per-debt interest totals
    pub fn into_interest_by_debt(self) -> BTreeMap<DebtId, Money> {
        self.interest_by_debt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debt::{DebtType, PaymentFrequency};

    fn debt(id: &str, balance: i64, priority: i32) -> Debt {
        Debt::new(
            id,
            id,
            DebtType::CreditCard,
            Money::from_cents(balance),
            0.26,
            Money::from_cents(1_000),
            PaymentFrequency::Fortnightly,
            priority,
        )
    }

    #[test]
    fn test_sorted_by_priority_then_balance() {
        let debts = vec![debt("c", 9_000, 2), debt("b", 5_000, 1), debt("a", 7_000, 1)];
        let state = PayoffState::from_debts(&debts, PeriodKind::Fortnight);

        let ids: Vec<_> = state.outstanding().iter().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_zero_balance_debts_excluded() {
        let debts = vec![debt("paid", 0, 1), debt("open", 5_000, 2)];
        let state = PayoffState::from_debts(&debts, PeriodKind::Fortnight);

        assert_eq!(state.balances().len(), 1);
        assert!(state.balance_of(&DebtId::from("paid")).is_none());
    }

    #[test]
    fn test_interest_rounds_per_debt() {
        // 26% / 26 = 1% per fortnight
        let debts = vec![debt("a", 10_040, 1), debt("b", 160, 2)];
        let mut state = PayoffState::from_debts(&debts, PeriodKind::Fortnight);

        let interest = state.accrue_interest();
        // 100.4 -> 100, 1.6 -> 2
        assert_eq!(interest, Money::from_cents(102));
        assert_eq!(state.balance_of(&DebtId::from("a")), Some(Money::from_cents(10_140)));
        assert_eq!(state.total_interest(), Money::from_cents(102));
    }

    #[test]
    fn test_minimums_capped_by_balance_and_cash() {
        let debts = vec![debt("small", 400, 1), debt("big", 50_000, 2)];
        let mut state = PayoffState::from_debts(&debts, PeriodKind::Fortnight);

        let mut cash = Money::from_cents(1_200);
        let paid = state.pay_minimums(&mut cash);

        // small takes 400 of its 1000 minimum, big gets what cash remains (800)
        assert_eq!(paid, Money::from_cents(1_200));
        assert_eq!(cash, Money::ZERO);
        assert_eq!(state.balance_of(&DebtId::from("small")), Some(Money::ZERO));
        assert_eq!(state.balance_of(&DebtId::from("big")), Some(Money::from_cents(49_200)));
    }

    #[test]
    fn test_surplus_goes_to_single_target() {
        let debts = vec![debt("small", 300, 1), debt("big", 50_000, 2)];
        let mut state = PayoffState::from_debts(&debts, PeriodKind::Fortnight);

        let mut cash = Money::from_cents(1_000);
        let applied = state.apply_surplus(&mut cash);

        // Capped at the target's balance; the rest is not cascaded
        assert_eq!(applied, Money::from_cents(300));
        assert_eq!(cash, Money::from_cents(700));
        assert_eq!(state.balance_of(&DebtId::from("big")), Some(Money::from_cents(50_000)));

        let cleared = state.clear_paid_off();
        assert_eq!(cleared, vec![DebtId::from("small")]);
        assert!(!state.is_settled());
    }
}
