//! Scenario runner for batch calculations
//!
//! Holds one engine and runs many purchases through it, in parallel for
//! batches. Results come back in input order.

use crate::amortization::{AmortizationEngine, CalculationResult, EngineConfig};
use crate::loan::{HomePurchase, LoanScenario, ValidationErrors};
use log::warn;
use rayon::prelude::*;
use serde::Serialize;

/// Outcome of one named scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub purchase: HomePurchase,
    #[serde(flatten)]
    pub outcome: ScenarioStatus,
}

/// Either a full result or every validation failure for the scenario
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScenarioStatus {
    Calculated { result: CalculationResult },
    Rejected { errors: Vec<String> },
}

impl ScenarioOutcome {
    pub fn result(&self) -> Option<&CalculationResult> {
        match &self.outcome {
            ScenarioStatus::Calculated { result } => Some(result),
            ScenarioStatus::Rejected { .. } => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.outcome, ScenarioStatus::Rejected { .. })
    }
}

/// Runs purchases through a shared engine
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: AmortizationEngine,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            engine: AmortizationEngine::new(config),
        }
    }

    pub fn engine(&self) -> &AmortizationEngine {
        &self.engine
    }

    /// Validate and calculate a single purchase
    pub fn run(&self, purchase: &HomePurchase) -> Result<CalculationResult, ValidationErrors> {
        self.engine.calculate_purchase(purchase)
    }

    /// Run every scenario in parallel, preserving input order
    pub fn run_batch(&self, scenarios: &[LoanScenario]) -> Vec<ScenarioOutcome> {
        scenarios
            .par_iter()
            .map(|scenario| {
                let outcome = match self.run(&scenario.purchase) {
                    Ok(result) => ScenarioStatus::Calculated { result },
                    Err(errors) => {
                        warn!("skipping scenario `{}`: {}", scenario.name, errors.messages().join("; "));
                        ScenarioStatus::Rejected { errors: errors.messages() }
                    }
                };
                ScenarioOutcome {
                    name: scenario.name.clone(),
                    purchase: scenario.purchase,
                    outcome,
                }
            })
            .collect()
    }

    /// The same purchase at several annual rates
    pub fn rate_sweep(&self, purchase: &HomePurchase, rates: &[f64]) -> Vec<ScenarioOutcome> {
        let scenarios: Vec<LoanScenario> = rates
            .iter()
            .map(|&rate| LoanScenario {
                name: format!("{}%", rate),
                purchase: HomePurchase {
                    annual_rate_percent: rate,
                    ..*purchase
                },
            })
            .collect();
        self.run_batch(&scenarios)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_runner() -> ScenarioRunner {
        ScenarioRunner::with_config(EngineConfig {
            log_calculations: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_batch_preserves_order() {
        let runner = quiet_runner();
        let scenarios: Vec<LoanScenario> = (1..=40)
            .map(|years| LoanScenario {
                name: format!("term-{}", years),
                purchase: HomePurchase::new(400_000.0, 80_000.0, 6.0, years),
            })
            .collect();

        let outcomes = runner.run_batch(&scenarios);
        assert_eq!(outcomes.len(), 40);
        for (years, outcome) in (1..=40).zip(&outcomes) {
            assert_eq!(outcome.name, format!("term-{}", years));
            let result = outcome.result().expect("valid scenario");
            assert_eq!(result.schedule.len(), (years * 12) as usize);
        }
    }

    #[test]
    fn test_batch_keeps_rejections() {
        let runner = quiet_runner();
        let scenarios = vec![
            LoanScenario { name: "ok".into(), purchase: HomePurchase::default() },
            LoanScenario { name: "bad".into(), purchase: HomePurchase::new(0.0, 0.0, 50.0, 0) },
        ];

        let outcomes = runner.run_batch(&scenarios);
        assert!(!outcomes[0].is_rejected());
        assert!(outcomes[1].is_rejected());
        match &outcomes[1].outcome {
            ScenarioStatus::Rejected { errors } => assert_eq!(errors.len(), 4),
            ScenarioStatus::Calculated { .. } => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_rate_sweep_orders_payments() {
        let runner = quiet_runner();
        let outcomes = runner.rate_sweep(&HomePurchase::default(), &[3.0, 5.0, 7.0]);
        let payments: Vec<f64> = outcomes
            .iter()
            .map(|o| o.result().expect("valid rate").monthly_payment)
            .collect();
        assert!(payments[0] < payments[1] && payments[1] < payments[2]);
        assert_eq!(outcomes[1].name, "5%");
    }

    #[test]
    fn test_outcome_serializes_with_status() {
        let runner = quiet_runner();
        let outcomes = runner.rate_sweep(&HomePurchase::default(), &[25.0]);
        let json = serde_json::to_value(&outcomes[0]).expect("outcome serializes");
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["name"], "25%");
    }
}
