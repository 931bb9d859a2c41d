//! Loan parameter structures

use serde::{Deserialize, Serialize};

/// Widget reset values: $350,000 home, $70,000 down, 6.5% over 30 years
const DEFAULT_HOME_PRICE: f64 = 350_000.0;
const DEFAULT_DOWN_PAYMENT: f64 = 70_000.0;
const DEFAULT_RATE_PERCENT: f64 = 6.5;
const DEFAULT_TERM_YEARS: u32 = 30;

/// Inputs to a single amortization calculation
///
/// All amounts are in one currency unit. The engine treats these as already
/// validated; see [`LoanInputs::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanInputs {
    /// Amount borrowed
    pub principal: f64,

    /// Annual interest rate in percent (6.5 = 6.5%)
    pub annual_rate_percent: f64,

    /// Loan term in whole years
    pub term_years: u32,
}

impl LoanInputs {
    pub fn new(principal: f64, annual_rate_percent: f64, term_years: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_years,
        }
    }

    /// Monthly periodic rate as a decimal
    pub fn monthly_rate(&self) -> f64 {
        monthly_rate(self.annual_rate_percent)
    }

    /// Total number of monthly payments
    pub fn term_months(&self) -> u32 {
        self.term_years.saturating_mul(12)
    }
}

/// Convert an annual percentage rate to a monthly decimal rate
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}

/// Purchase-level parameters: the loan amount is derived from price and down payment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HomePurchase {
    /// Purchase price of the home
    pub home_price: f64,

    /// Cash paid upfront
    pub down_payment: f64,

    /// Annual interest rate in percent
    pub annual_rate_percent: f64,

    /// Loan term in whole years
    pub term_years: u32,
}

impl HomePurchase {
    pub fn new(home_price: f64, down_payment: f64, annual_rate_percent: f64, term_years: u32) -> Self {
        Self {
            home_price,
            down_payment,
            annual_rate_percent,
            term_years,
        }
    }

    /// Amount financed, never negative
    pub fn loan_amount(&self) -> f64 {
        (self.home_price - self.down_payment).max(0.0)
    }

    /// Down payment as a percentage of the home price
    pub fn down_payment_percent(&self) -> f64 {
        if self.home_price > 0.0 {
            self.down_payment / self.home_price * 100.0
        } else {
            0.0
        }
    }

    /// Loan inputs for the financed amount (unchecked)
    pub fn to_loan_inputs(&self) -> LoanInputs {
        LoanInputs::new(self.loan_amount(), self.annual_rate_percent, self.term_years)
    }
}

impl Default for HomePurchase {
    fn default() -> Self {
        Self::new(
            DEFAULT_HOME_PRICE,
            DEFAULT_DOWN_PAYMENT,
            DEFAULT_RATE_PERCENT,
            DEFAULT_TERM_YEARS,
        )
    }
}

/// A named purchase, as read from a batch file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanScenario {
    pub name: String,
    pub purchase: HomePurchase,
}
