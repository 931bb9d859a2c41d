//! Loan inputs, purchase parameters and precondition checks

mod data;
mod validation;
pub mod loader;

pub use data::{LoanInputs, HomePurchase, LoanScenario, monthly_rate};
pub use validation::{ValidationError, ValidationErrors, ValidationKind, MAX_RATE_PERCENT, MIN_TERM_YEARS, MAX_TERM_YEARS};
pub use loader::{load_loans, load_loans_from_reader};
