//! Month-by-month amortization schedule
//!
//! [`Schedule`] produces entries lazily and can be cloned to restart from
//! period 1. [`generate_schedule`] collects the same entries eagerly.

use crate::loan::{monthly_rate, LoanInputs};
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

/// Relative size below which a final-period balance is treated as paid off
///
/// Floating-point drift leaves residues around 1e-12 of the principal on the
/// last payment; anything under this threshold is set to exactly zero.
pub const BALANCE_EPSILON: f64 = 1e-9;

/// One monthly payment in the schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentScheduleEntry {
    /// Payment number, 1-based
    pub period: u32,

    /// Total payment for the month
    pub payment: f64,

    /// Portion of the payment that reduces the balance
    pub principal: f64,

    /// Portion of the payment that pays interest
    pub interest: f64,

    /// Balance remaining after the payment, never negative
    pub balance: f64,
}

impl PaymentScheduleEntry {
    /// Loan year this payment falls in (1-based)
    pub fn loan_year(&self) -> u32 {
        self.period.div_ceil(12)
    }

    /// Whether this is the twelfth payment of a loan year
    pub fn is_year_end(&self) -> bool {
        self.period % 12 == 0
    }
}

/// Compound growth `((1+r)^periods, (1+r)^periods - 1)`
///
/// Goes through `ln_1p`/`exp_m1` so the second term keeps full precision for
/// rates small enough that `1 + r` rounds to one.
pub(crate) fn compound_growth(monthly_rate: f64, periods: u32) -> (f64, f64) {
    let exponent = periods as f64 * monthly_rate.ln_1p();
    (exponent.exp(), exponent.exp_m1())
}

/// Lazy, restartable producer of schedule entries
#[derive(Debug, Clone)]
pub struct Schedule {
    principal: f64,
    monthly_rate: f64,
    periods: u32,
    payment: f64,

    /// Next period to emit (1-indexed, one past `periods` when exhausted)
    next_period: u64,

    /// Balance carried into `next_period`
    balance: f64,
}

impl Schedule {
    pub fn new(principal: f64, annual_rate_percent: f64, term_years: u32, monthly_payment: f64) -> Self {
        Self {
            principal,
            monthly_rate: monthly_rate(annual_rate_percent),
            periods: term_years.saturating_mul(12),
            payment: monthly_payment,
            next_period: 1,
            balance: principal,
        }
    }

    pub fn from_inputs(inputs: &LoanInputs, monthly_payment: f64) -> Self {
        Self::new(inputs.principal, inputs.annual_rate_percent, inputs.term_years, monthly_payment)
    }

    /// Total number of periods in the schedule
    pub fn periods(&self) -> u32 {
        self.periods
    }

    pub fn monthly_payment(&self) -> f64 {
        self.payment
    }

    /// A fresh producer positioned at period 1
    pub fn restart(&self) -> Self {
        Self {
            next_period: 1,
            balance: self.principal,
            ..self.clone()
        }
    }

    /// Compute a single entry without walking the schedule
    ///
    /// Uses the cumulative compounding closed form for the balance. Agrees with
    /// the iterated values up to floating-point rounding.
    pub fn entry_at(&self, period: u32) -> Option<PaymentScheduleEntry> {
        if period == 0 || period > self.periods {
            return None;
        }

        let opening = self.balance_after(period - 1);
        let interest = opening * self.monthly_rate;
        let principal = self.payment - interest;
        let balance = self.settle(period, self.balance_after(period));

        Some(PaymentScheduleEntry {
            period,
            payment: self.payment,
            principal,
            interest,
            balance,
        })
    }

    /// Closed-form balance after `k` payments, floored at zero
    fn balance_after(&self, k: u32) -> f64 {
        if k == 0 {
            return self.principal;
        }

        let r = self.monthly_rate;
        let balance = if r == 0.0 {
            self.principal - self.payment * k as f64
        } else {
            let (growth, growth_m1) = compound_growth(r, k);
            self.principal * growth - self.payment * (growth_m1 / r)
        };

        balance.max(0.0)
    }

    /// Snap final-period drift to zero
    fn settle(&self, period: u32, balance: f64) -> f64 {
        if period == self.periods && balance < BALANCE_EPSILON * self.principal.max(1.0) {
            0.0
        } else {
            balance
        }
    }

    fn remaining(&self) -> usize {
        (u64::from(self.periods) + 1).saturating_sub(self.next_period) as usize
    }
}

impl Iterator for Schedule {
    type Item = PaymentScheduleEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_period > u64::from(self.periods) {
            return None;
        }

        let period = self.next_period as u32;
        let interest = self.balance * self.monthly_rate;
        let principal = self.payment - interest;

        let mut balance = self.balance - principal;
        if balance < 0.0 {
            balance = 0.0;
        }
        balance = self.settle(period, balance);

        self.balance = balance;
        self.next_period += 1;

        Some(PaymentScheduleEntry {
            period,
            payment: self.payment,
            principal,
            interest,
            balance,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Schedule {}

impl FusedIterator for Schedule {}

/// Generate the full schedule eagerly
pub fn generate_schedule(
    principal: f64,
    annual_rate_percent: f64,
    term_years: u32,
    monthly_payment: f64,
) -> Vec<PaymentScheduleEntry> {
    Schedule::new(principal, annual_rate_percent, term_years, monthly_payment).collect()
}
