//! Payment formula, schedule generation and loan totals

mod engine;
mod result;
mod schedule;

pub use engine::{AmortizationEngine, EngineConfig, compute_monthly_payment, summarize};
pub use result::{CalculationResult, CalculationLog, LoanTotals, ScheduleRow, YearlyTotals};
pub use schedule::{PaymentScheduleEntry, Schedule, generate_schedule, BALANCE_EPSILON};
