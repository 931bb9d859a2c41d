//! Precondition checks run before the engine
//!
//! Every check runs; failures are collected into one [`ValidationErrors`]
//! so callers can report them together.

use super::{HomePurchase, LoanInputs};
use std::fmt;
use thiserror::Error;

pub const MAX_RATE_PERCENT: f64 = 20.0;
pub const MIN_TERM_YEARS: u32 = 1;
pub const MAX_TERM_YEARS: u32 = 40;

/// A single violated input constraint
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Loan amount must be greater than 0 (got {0})")]
    InvalidPrincipal(f64),

    #[error("Down payment cannot be negative (got {0})")]
    NegativeDownPayment(f64),

    #[error("Down payment must be less than home price (down payment {down_payment}, home price {home_price})")]
    DownPaymentTooLarge { down_payment: f64, home_price: f64 },

    #[error("Interest rate must be between 0% and 20% (got {0}%)")]
    InvalidRate(f64),

    #[error("Loan term must be between 1 and 40 years (got {0})")]
    InvalidTerm(u32),
}

impl ValidationError {
    /// Constraint family, for callers that group failures
    pub fn kind(&self) -> ValidationKind {
        match self {
            ValidationError::InvalidPrincipal(_) => ValidationKind::InvalidPrincipal,
            ValidationError::NegativeDownPayment(_)
            | ValidationError::DownPaymentTooLarge { .. } => ValidationKind::InvalidDownPayment,
            ValidationError::InvalidRate(_) => ValidationKind::InvalidRate,
            ValidationError::InvalidTerm(_) => ValidationKind::InvalidTerm,
        }
    }
}

/// Failure families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    InvalidPrincipal,
    InvalidDownPayment,
    InvalidRate,
    InvalidTerm,
}

/// Aggregate of every violated constraint, in check order
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn contains(&self, kind: ValidationKind) -> bool {
        self.errors.iter().any(|e| e.kind() == kind)
    }

    /// One message per violated constraint
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    fn into_result(errors: Vec<ValidationError>) -> Result<(), ValidationErrors> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("\n"))
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

fn check_rate(annual_rate_percent: f64, errors: &mut Vec<ValidationError>) {
    // NaN fails the range test as well
    if !(0.0..=MAX_RATE_PERCENT).contains(&annual_rate_percent) {
        errors.push(ValidationError::InvalidRate(annual_rate_percent));
    }
}

fn check_term(term_years: u32, errors: &mut Vec<ValidationError>) {
    if !(MIN_TERM_YEARS..=MAX_TERM_YEARS).contains(&term_years) {
        errors.push(ValidationError::InvalidTerm(term_years));
    }
}

fn check_down_payment(down_payment: f64, home_price: f64, errors: &mut Vec<ValidationError>) {
    if down_payment < 0.0 || down_payment.is_nan() {
        errors.push(ValidationError::NegativeDownPayment(down_payment));
    }
    if down_payment >= home_price {
        errors.push(ValidationError::DownPaymentTooLarge { down_payment, home_price });
    }
}

impl LoanInputs {
    /// Check the inputs against the supported ranges
    ///
    /// `down_payment` only participates in the down payment checks; the home
    /// price is taken to be `principal + down_payment`.
    pub fn validate(&self, down_payment: f64) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        if !(self.principal > 0.0) || !self.principal.is_finite() {
            errors.push(ValidationError::InvalidPrincipal(self.principal));
        }
        check_down_payment(down_payment, self.principal + down_payment, &mut errors);
        check_rate(self.annual_rate_percent, &mut errors);
        check_term(self.term_years, &mut errors);

        ValidationErrors::into_result(errors)
    }
}

impl HomePurchase {
    /// Validate and return the loan inputs for the financed amount
    pub fn validate(&self) -> Result<LoanInputs, ValidationErrors> {
        let mut errors = Vec::new();

        // A non-positive price leaves nothing to finance
        let loan_amount = self.loan_amount();
        if !(self.home_price > 0.0) || !(loan_amount > 0.0) || !loan_amount.is_finite() {
            errors.push(ValidationError::InvalidPrincipal(loan_amount));
        }
        check_down_payment(self.down_payment, self.home_price, &mut errors);
        check_rate(self.annual_rate_percent, &mut errors);
        check_term(self.term_years, &mut errors);

        ValidationErrors::into_result(errors)?;
        Ok(self.to_loan_inputs())
    }
}
