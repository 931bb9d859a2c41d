//! Calculation output structures

use super::schedule::PaymentScheduleEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of leading monthly rows shown before the summary view switches to yearly rows
const SUMMARY_LEADING_MONTHS: usize = 12;

/// Aggregate totals over the life of the loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTotals {
    /// Sum of all monthly payments (payment * number of payments)
    pub total_payments: f64,

    /// Interest paid over the term
    pub total_interest: f64,

    /// Total cash outlay including the down payment
    pub total_cost: f64,
}

/// Complete result of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub principal: f64,
    pub down_payment: f64,
    pub annual_rate_percent: f64,
    pub term_years: u32,

    pub monthly_payment: f64,
    pub total_payments: f64,
    pub total_interest: f64,
    pub total_cost: f64,

    /// Monthly entries in chronological order
    pub schedule: Vec<PaymentScheduleEntry>,
}

impl CalculationResult {
    pub fn totals(&self) -> LoanTotals {
        LoanTotals {
            total_payments: self.total_payments,
            total_interest: self.total_interest,
            total_cost: self.total_cost,
        }
    }

    pub fn term_months(&self) -> u32 {
        self.term_years.saturating_mul(12)
    }

    /// Home price implied by the financed amount and down payment
    pub fn home_price(&self) -> f64 {
        self.principal + self.down_payment
    }

    /// Share of total payments that repays principal, in percent
    pub fn principal_share_percent(&self) -> f64 {
        share_percent(self.principal, self.total_payments)
    }

    /// Share of total payments that is interest, in percent
    pub fn interest_share_percent(&self) -> f64 {
        share_percent(self.total_interest, self.total_payments)
    }

    /// First year month by month, then one row per year end
    pub fn summary_view(&self) -> Vec<ScheduleRow> {
        let mut rows: Vec<ScheduleRow> = self
            .schedule
            .iter()
            .take(SUMMARY_LEADING_MONTHS)
            .map(|entry| ScheduleRow::Month(*entry))
            .collect();

        rows.extend(
            self.schedule
                .iter()
                .skip(SUMMARY_LEADING_MONTHS)
                .filter(|entry| entry.is_year_end())
                .map(|entry| ScheduleRow::YearEnd(*entry)),
        );

        rows
    }

    /// Every month, with each twelfth payment marked as a year end
    pub fn full_view(&self) -> Vec<ScheduleRow> {
        self.schedule
            .iter()
            .map(|entry| {
                if entry.is_year_end() {
                    ScheduleRow::YearEnd(*entry)
                } else {
                    ScheduleRow::Month(*entry)
                }
            })
            .collect()
    }

    /// Principal and interest paid in each loan year
    pub fn yearly_totals(&self) -> Vec<YearlyTotals> {
        let mut years: Vec<YearlyTotals> = Vec::new();

        for entry in &self.schedule {
            let year = entry.loan_year();
            match years.last_mut() {
                Some(current) if current.year == year => {
                    current.principal_paid += entry.principal;
                    current.interest_paid += entry.interest;
                    current.ending_balance = entry.balance;
                }
                _ => years.push(YearlyTotals {
                    year,
                    principal_paid: entry.principal,
                    interest_paid: entry.interest,
                    ending_balance: entry.balance,
                }),
            }
        }

        years
    }

    /// Structured record of this calculation for the log
    pub fn log_record(&self, currency: &str) -> CalculationLog {
        CalculationLog {
            timestamp: Utc::now(),
            currency: currency.to_string(),
            home_price: self.home_price(),
            down_payment: self.down_payment,
            loan_amount: self.principal,
            interest_rate: self.annual_rate_percent,
            loan_term: self.term_years,
            monthly_payment: self.monthly_payment,
            total_interest: self.total_interest,
        }
    }
}

fn share_percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// A schedule row tagged for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entry", rename_all = "snake_case")]
pub enum ScheduleRow {
    Month(PaymentScheduleEntry),
    YearEnd(PaymentScheduleEntry),
}

impl ScheduleRow {
    pub fn entry(&self) -> &PaymentScheduleEntry {
        match self {
            ScheduleRow::Month(entry) | ScheduleRow::YearEnd(entry) => entry,
        }
    }

    pub fn is_year_end(&self) -> bool {
        matches!(self, ScheduleRow::YearEnd(_))
    }

    /// "Month 7" or "Year 12"
    pub fn label(&self) -> String {
        match self {
            ScheduleRow::Month(entry) => format!("Month {}", entry.period),
            ScheduleRow::YearEnd(entry) => format!("Year {}", entry.loan_year()),
        }
    }
}

/// Principal and interest paid within one loan year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyTotals {
    pub year: u32,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub ending_balance: f64,
}

/// Log record emitted after each calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationLog {
    pub timestamp: DateTime<Utc>,
    pub currency: String,
    pub home_price: f64,
    pub down_payment: f64,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub loan_term: u32,
    pub monthly_payment: f64,
    pub total_interest: f64,
}
