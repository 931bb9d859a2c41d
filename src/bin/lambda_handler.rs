//! AWS Lambda handler for mortgage calculations
//!
//! Accepts a loan request as the JSON body of an API Gateway proxy event
//! (plain or base64-encoded) and returns the calculation result, or a 400
//! listing every validation failure.

use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use base64::prelude::*;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use mortgage_engine::{
    amortization::YearlyTotals, AmortizationEngine, CalculationResult, CurrencyFormat, EngineConfig, HomePurchase,
};
use serde::{Deserialize, Serialize};

/// Input configuration for a calculation
#[derive(Debug, Deserialize)]
pub struct LoanRequest {
    /// Home purchase price (default: 350,000)
    #[serde(default = "default_home_price")]
    pub home_price: f64,

    /// Down payment (default: 70,000)
    #[serde(default = "default_down_payment")]
    pub down_payment: f64,

    /// Annual rate in percent (default: 6.5)
    #[serde(default = "default_rate")]
    pub interest_rate: f64,

    /// Term in years (default: 30)
    #[serde(default = "default_term")]
    pub loan_term: u32,

    /// Currency code for formatted amounts (default: USD)
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Include the month-by-month schedule in the response
    #[serde(default)]
    pub include_schedule: bool,
}

fn default_home_price() -> f64 { HomePurchase::default().home_price }
fn default_down_payment() -> f64 { HomePurchase::default().down_payment }
fn default_rate() -> f64 { HomePurchase::default().annual_rate_percent }
fn default_term() -> u32 { HomePurchase::default().term_years }
fn default_currency() -> String { "USD".to_string() }

impl LoanRequest {
    fn purchase(&self) -> HomePurchase {
        HomePurchase::new(self.home_price, self.down_payment, self.interest_rate, self.loan_term)
    }
}

/// Successful response body
#[derive(Debug, Serialize)]
pub struct LoanResponse {
    pub currency: String,
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub monthly_payment_display: String,
    pub total_payments: f64,
    pub total_interest: f64,
    pub total_cost: f64,
    pub principal_share_pct: f64,
    pub interest_share_pct: f64,
    pub yearly: Vec<YearlyTotals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CalculationResult>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    errors: Vec<String>,
}

fn json_response<T: Serialize>(status_code: i64, body: &T) -> Result<ApiGatewayProxyResponse, Error> {
    let mut response = ApiGatewayProxyResponse {
        status_code,
        body: Some(Body::Text(serde_json::to_string(body)?)),
        ..Default::default()
    };
    response
        .headers
        .insert("content-type", "application/json".parse()?);
    Ok(response)
}

fn bad_request(errors: Vec<String>) -> Result<ApiGatewayProxyResponse, Error> {
    log::warn!("rejecting request: {}", errors.join("; "));
    json_response(400, &ErrorResponse { errors })
}

/// Decode the event body; a missing or blank body takes every default
fn parse_request(body: Option<&str>, is_base64_encoded: bool) -> Result<LoanRequest, String> {
    let raw = body.unwrap_or_default();
    let json = if is_base64_encoded {
        let bytes = BASE64_STANDARD
            .decode(raw.trim())
            .map_err(|e| format!("invalid base64 body: {}", e))?;
        String::from_utf8(bytes).map_err(|e| format!("invalid request body: {}", e))?
    } else {
        raw.to_string()
    };

    let json = if json.trim().is_empty() { "{}" } else { json.as_str() };
    serde_json::from_str(json).map_err(|e| format!("invalid request body: {}", e))
}

async fn handler(event: LambdaEvent<ApiGatewayProxyRequest>) -> Result<ApiGatewayProxyResponse, Error> {
    let payload = event.payload;
    let request = match parse_request(payload.body.as_deref(), payload.is_base64_encoded) {
        Ok(request) => request,
        Err(message) => return bad_request(vec![message]),
    };

    let currency = match CurrencyFormat::lookup(&request.currency) {
        Ok(currency) => currency,
        Err(e) => return bad_request(vec![e.to_string()]),
    };

    let engine = AmortizationEngine::new(EngineConfig {
        currency_code: currency.code.clone(),
        ..Default::default()
    });

    let result = match engine.calculate_purchase(&request.purchase()) {
        Ok(result) => result,
        Err(errors) => return bad_request(errors.messages()),
    };

    let response = LoanResponse {
        currency: currency.code.clone(),
        loan_amount: result.principal,
        monthly_payment: result.monthly_payment,
        monthly_payment_display: currency.format_with_symbol(result.monthly_payment),
        total_payments: result.total_payments,
        total_interest: result.total_interest,
        total_cost: result.total_cost,
        principal_share_pct: result.principal_share_percent(),
        interest_share_pct: result.interest_share_percent(),
        yearly: result.yearly_totals(),
        result: if request.include_schedule { Some(result) } else { None },
    };

    json_response(200, &response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"home_price": 500000, "down_payment": 100000, "loan_term": 15}"#;

    #[test]
    fn test_plain_body() {
        let request = parse_request(Some(BODY), false).expect("plain JSON parses");
        assert_eq!(request.home_price, 500_000.0);
        assert_eq!(request.down_payment, 100_000.0);
        assert_eq!(request.loan_term, 15);
        assert_eq!(request.interest_rate, 6.5);
        assert!(!request.include_schedule);
    }

    #[test]
    fn test_base64_body() {
        let encoded = BASE64_STANDARD.encode(BODY);
        let request = parse_request(Some(encoded.as_str()), true).expect("encoded JSON parses");
        assert_eq!(request.home_price, 500_000.0);
        assert_eq!(request.loan_term, 15);
        assert_eq!(request.currency, "USD");
    }

    #[test]
    fn test_empty_body_uses_defaults() {
        for (body, encoded) in [(None, false), (Some(""), false), (Some("  "), false), (Some(""), true)] {
            let request = parse_request(body, encoded).expect("empty body parses");
            assert_eq!(request.purchase(), HomePurchase::default());
        }
    }

    #[test]
    fn test_malformed_bodies_rejected() {
        let err = parse_request(Some("not base64!"), true).unwrap_err();
        assert!(err.starts_with("invalid base64 body"));

        // Encoded bodies are not read as JSON unless decoded
        let encoded = BASE64_STANDARD.encode(BODY);
        let err = parse_request(Some(encoded.as_str()), false).unwrap_err();
        assert!(err.starts_with("invalid request body"));
    }
}
