//! Mortgage Engine - fixed-rate mortgage payment and amortization calculations
//!
//! This library provides:
//! - Level monthly payment for fixed-rate, fixed-term loans (including zero interest)
//! - Month-by-month amortization schedules, eager or lazy with random access
//! - Loan totals (payments, interest, total cost with down payment)
//! - Input validation that reports every violated constraint at once
//! - CSV schedule export and batch scenario runs

pub mod error;
pub mod loan;
pub mod amortization;
pub mod export;
pub mod display;
pub mod scenario;

// Re-export commonly used types
pub use error::{Error, Result};
pub use loan::{LoanInputs, HomePurchase, LoanScenario, ValidationError, ValidationErrors};
pub use amortization::{
    AmortizationEngine, EngineConfig, CalculationResult, PaymentScheduleEntry, Schedule,
    compute_monthly_payment, generate_schedule, summarize,
};
pub use display::CurrencyFormat;
pub use scenario::ScenarioRunner;
