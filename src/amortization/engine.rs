//! Fixed-rate amortization engine

use super::result::{CalculationResult, LoanTotals};
use super::schedule::Schedule;
use crate::loan::{monthly_rate, HomePurchase, LoanInputs, ValidationErrors};
use log::{debug, info, warn};

/// Configuration for the engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Emit a structured record at info level after each calculation
    pub log_calculations: bool,

    /// Currency code attached to logged records (no effect on the numbers)
    pub currency_code: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_calculations: true,
            currency_code: "USD".to_string(),
        }
    }
}

/// Level monthly payment that retires `principal` in `term_years * 12` payments
///
/// Zero-interest loans are paid straight-line. No validation is performed;
/// a zero-length term yields a zero payment.
pub fn compute_monthly_payment(principal: f64, annual_rate_percent: f64, term_years: u32) -> f64 {
    let r = monthly_rate(annual_rate_percent);
    let n = term_years.saturating_mul(12);

    if n == 0 {
        return 0.0;
    }

    if r == 0.0 {
        principal / n as f64
    } else {
        // 1 - (1+r)^-n, exact for tiny r and finite when (1+r)^n overflows
        let discount = -(-(n as f64) * r.ln_1p()).exp_m1();
        principal * r / discount
    }
}

/// Totals for a level-payment loan
///
/// Total payments use the closed-form product `payment * periods` rather than
/// summing the schedule, so they can differ from the summed entries in the
/// last cent.
pub fn summarize(monthly_payment: f64, periods: u32, principal: f64, down_payment: f64) -> LoanTotals {
    let total_payments = monthly_payment * periods as f64;
    LoanTotals {
        total_payments,
        total_interest: total_payments - principal,
        total_cost: total_payments + down_payment,
    }
}

/// Stateless calculation engine
///
/// Each call recomputes everything from its inputs; independent calls share
/// nothing and the engine can be used from many threads at once.
#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    config: EngineConfig,
}

impl AmortizationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Lazy schedule for already-validated inputs
    pub fn schedule(&self, inputs: &LoanInputs) -> Schedule {
        let payment = compute_monthly_payment(inputs.principal, inputs.annual_rate_percent, inputs.term_years);
        Schedule::from_inputs(inputs, payment)
    }

    /// Run payment, schedule and totals for already-validated inputs
    ///
    /// `down_payment` only contributes to `total_cost`.
    pub fn calculate(&self, inputs: &LoanInputs, down_payment: f64) -> CalculationResult {
        let monthly_payment =
            compute_monthly_payment(inputs.principal, inputs.annual_rate_percent, inputs.term_years);
        debug!(
            "monthly payment {:.6} for principal {} at {}% over {} months",
            monthly_payment,
            inputs.principal,
            inputs.annual_rate_percent,
            inputs.term_months(),
        );

        let schedule: Vec<_> = Schedule::from_inputs(inputs, monthly_payment).collect();
        let totals = summarize(monthly_payment, inputs.term_months(), inputs.principal, down_payment);

        let result = CalculationResult {
            principal: inputs.principal,
            down_payment,
            annual_rate_percent: inputs.annual_rate_percent,
            term_years: inputs.term_years,
            monthly_payment,
            total_payments: totals.total_payments,
            total_interest: totals.total_interest,
            total_cost: totals.total_cost,
            schedule,
        };

        if self.config.log_calculations {
            self.log_result(&result);
        }

        result
    }

    /// Validate a purchase and calculate it
    pub fn calculate_purchase(&self, purchase: &HomePurchase) -> Result<CalculationResult, ValidationErrors> {
        match purchase.validate() {
            Ok(inputs) => Ok(self.calculate(&inputs, purchase.down_payment)),
            Err(errors) => {
                warn!("rejected purchase with {} validation error(s): {}", errors.len(), errors.messages().join("; "));
                Err(errors)
            }
        }
    }

    fn log_result(&self, result: &CalculationResult) {
        let record = result.log_record(&self.config.currency_code);
        match serde_json::to_string(&record) {
            Ok(json) => info!("mortgage calculation: {}", json),
            Err(e) => warn!("could not serialize calculation record: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_payment_closed_form() {
        let payment = compute_monthly_payment(280_000.0, 6.5, 30);
        assert_abs_diff_eq!(payment, 1769.79, epsilon = 0.01);
    }

    #[test]
    fn test_payment_zero_rate() {
        assert_eq!(compute_monthly_payment(120_000.0, 0.0, 10), 1000.0);
    }

    #[test]
    fn test_payment_zero_term() {
        assert_eq!(compute_monthly_payment(120_000.0, 5.0, 0), 0.0);
    }

    #[test]
    fn test_payment_known_values() {
        // 100k at 6% over 30 years is the textbook 599.55
        assert_abs_diff_eq!(compute_monthly_payment(100_000.0, 6.0, 30), 599.55, epsilon = 0.01);
        // 200k at 4% over 15 years
        assert_abs_diff_eq!(compute_monthly_payment(200_000.0, 4.0, 15), 1479.38, epsilon = 0.01);
    }

    #[test]
    fn test_payment_near_zero_rate() {
        for rate in [1e-15, 1e-12, 1e-9, 1e-6, 1e-4] {
            let payment = compute_monthly_payment(280_000.0, rate, 30);
            assert!(payment.is_finite(), "rate {}", rate);
            assert_relative_eq!(payment, 280_000.0 / 360.0, max_relative = 1e-4);
        }
        assert_abs_diff_eq!(compute_monthly_payment(280_000.0, 1e-12, 1), 23_333.33, epsilon = 0.01);
    }

    #[test]
    fn test_payment_oversized_term() {
        let payment = compute_monthly_payment(100_000.0, 5.0, u32::MAX);
        // Interest-only in the limit
        assert_relative_eq!(payment, 100_000.0 * 0.05 / 12.0, max_relative = 1e-12);
    }

    #[test]
    fn test_near_zero_rate_purchase() {
        let engine = AmortizationEngine::default();
        let result = engine
            .calculate_purchase(&HomePurchase::new(350_000.0, 70_000.0, 1e-15, 30))
            .expect("rate within range");

        assert!(result.monthly_payment.is_finite());
        assert_abs_diff_eq!(result.monthly_payment, 280_000.0 / 360.0, epsilon = 1e-6);
        assert_eq!(result.schedule.last().map(|e| e.balance), Some(0.0));
    }

    #[test]
    fn test_summarize_identities() {
        let totals = summarize(1_000.0, 120, 120_000.0, 30_000.0);
        assert_eq!(totals.total_payments, 120_000.0);
        assert_eq!(totals.total_interest, 0.0);
        assert_eq!(totals.total_cost, 150_000.0);
    }

    #[test]
    fn test_end_to_end() {
        let engine = AmortizationEngine::default();
        let result = engine.calculate(&LoanInputs::new(280_000.0, 6.5, 30), 70_000.0);

        assert_abs_diff_eq!(result.monthly_payment, 1769.79, epsilon = 0.01);
        assert_abs_diff_eq!(result.total_payments, 637_124.57, epsilon = 0.01);
        assert_abs_diff_eq!(result.total_interest, 357_124.57, epsilon = 0.01);
        assert_abs_diff_eq!(result.total_cost, 707_124.57, epsilon = 0.01);

        assert_eq!(result.schedule.len(), 360);
        assert_abs_diff_eq!(result.schedule[0].interest, 1516.67, epsilon = 0.01);
        assert_eq!(result.schedule[359].balance, 0.0);
    }

    #[test]
    fn test_aggregate_identities() {
        let engine = AmortizationEngine::default();
        let result = engine.calculate(&LoanInputs::new(415_000.0, 7.125, 25), 85_000.0);

        assert_eq!(result.total_interest, result.total_payments - result.principal);
        assert_eq!(result.total_cost, result.total_payments + result.down_payment);
        assert_eq!(result.total_payments, result.monthly_payment * 300.0);

        // The summed schedule agrees with the closed-form product within rounding
        let summed: f64 = result.schedule.iter().map(|e| e.payment).sum();
        assert_abs_diff_eq!(summed, result.total_payments, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_rate_result() {
        let engine = AmortizationEngine::default();
        let result = engine.calculate(&LoanInputs::new(120_000.0, 0.0, 10), 0.0);

        assert_eq!(result.monthly_payment, 1000.0);
        assert!(result.schedule.iter().all(|e| e.interest == 0.0 && e.principal == 1000.0));
        assert_eq!(result.total_interest, 0.0);
    }

    #[test]
    fn test_calculate_purchase() {
        let engine = AmortizationEngine::default();
        let result = engine
            .calculate_purchase(&HomePurchase::default())
            .expect("default purchase is valid");
        assert_eq!(result.principal, 280_000.0);
        assert_eq!(result.down_payment, 70_000.0);

        let errors = engine
            .calculate_purchase(&HomePurchase::new(100_000.0, 0.0, 30.0, 30))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_lazy_schedule_matches_eager() {
        let engine = AmortizationEngine::default();
        let inputs = LoanInputs::new(250_000.0, 5.75, 20);
        let eager = engine.calculate(&inputs, 0.0).schedule;
        let lazy: Vec<_> = engine.schedule(&inputs).collect();
        assert_eq!(eager, lazy);
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AmortizationEngine>();
    }
}
