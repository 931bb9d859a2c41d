//! Load purchase scenarios from CSV
//!
//! Expected columns: `Name,HomePrice,DownPayment,Rate,TermYears`

use super::{HomePurchase, LoanScenario};
use crate::error::{Error, Result};
use csv::{Reader, Trim};
use std::io::Read;
use std::path::Path;

/// Raw CSV row matching the scenario file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "HomePrice")]
    home_price: f64,
    #[serde(rename = "DownPayment")]
    down_payment: f64,
    #[serde(rename = "Rate")]
    rate: f64,
    #[serde(rename = "TermYears")]
    term_years: u32,
}

impl CsvRow {
    fn into_scenario(self) -> Result<LoanScenario> {
        if self.name.is_empty() {
            return Err(Error::InvalidRecord {
                name: self.name,
                reason: "scenario name is empty".to_string(),
            });
        }

        Ok(LoanScenario {
            name: self.name,
            purchase: HomePurchase::new(self.home_price, self.down_payment, self.rate, self.term_years),
        })
    }
}

fn read_scenarios<R: Read>(mut reader: Reader<R>) -> Result<Vec<LoanScenario>> {
    let mut scenarios = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        scenarios.push(row.into_scenario()?);
    }

    log::debug!("loaded {} loan scenarios", scenarios.len());
    Ok(scenarios)
}

/// Load all scenarios from a CSV file
pub fn load_loans<P: AsRef<Path>>(path: P) -> Result<Vec<LoanScenario>> {
    let reader = csv::ReaderBuilder::new().trim(Trim::All).from_path(path)?;
    read_scenarios(reader)
}

/// Load scenarios from any reader (e.g., string buffer, request body)
pub fn load_loans_from_reader<R: Read>(reader: R) -> Result<Vec<LoanScenario>> {
    let reader = csv::ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    read_scenarios(reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Name,HomePrice,DownPayment,Rate,TermYears
starter, 350000, 70000, 6.5, 30
no-interest,120000,0,0,10
";

    #[test]
    fn test_load_from_reader() {
        let scenarios = load_loans_from_reader(SAMPLE.as_bytes()).expect("sample parses");
        assert_eq!(scenarios.len(), 2);

        assert_eq!(scenarios[0].name, "starter");
        assert_eq!(scenarios[0].purchase, HomePurchase::default());

        assert_eq!(scenarios[1].name, "no-interest");
        assert_eq!(scenarios[1].purchase.loan_amount(), 120_000.0);
        assert_eq!(scenarios[1].purchase.term_years, 10);
    }

    #[test]
    fn test_malformed_row() {
        let data = "Name,HomePrice,DownPayment,Rate,TermYears\nbad,abc,0,5,30\n";
        let err = load_loans_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Csv(_)));
    }

    #[test]
    fn test_empty_name_rejected() {
        let data = "Name,HomePrice,DownPayment,Rate,TermYears\n,300000,0,5,30\n";
        let err = load_loans_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load_loans("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, Error::Csv(_)));
    }
}
