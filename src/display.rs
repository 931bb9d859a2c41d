//! Currency display configuration
//!
//! Passed explicitly to presentation code (CLI tables, reports). The engine
//! never sees it.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// How amounts in one currency are shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// ISO 4217 code
    pub code: String,
    pub symbol: String,
    pub name: String,
    /// Fraction digits shown
    pub decimals: usize,
}

/// (code, symbol, name, decimals)
static SUPPORTED: [(&str, &str, &str, usize); 12] = [
    ("USD", "$", "US Dollar", 2),
    ("EUR", "€", "Euro", 2),
    ("GBP", "£", "British Pound", 2),
    ("JPY", "¥", "Japanese Yen", 0),
    ("CAD", "C$", "Canadian Dollar", 2),
    ("AUD", "A$", "Australian Dollar", 2),
    ("CHF", "Fr", "Swiss Franc", 2),
    ("MXN", "$", "Mexican Peso", 2),
    ("COP", "$", "Colombian Peso", 0),
    ("ARS", "$", "Argentine Peso", 2),
    ("CLP", "$", "Chilean Peso", 0),
    ("BRL", "R$", "Brazilian Real", 2),
];

impl CurrencyFormat {
    /// Look up a supported currency by code (case-insensitive)
    pub fn lookup(code: &str) -> Result<Self> {
        SUPPORTED
            .iter()
            .find(|(c, _, _, _)| c.eq_ignore_ascii_case(code))
            .map(|&(code, symbol, name, decimals)| Self {
                code: code.to_string(),
                symbol: symbol.to_string(),
                name: name.to_string(),
                decimals,
            })
            .ok_or_else(|| Error::UnknownCurrency(code.to_string()))
    }

    /// Codes accepted by [`CurrencyFormat::lookup`]
    pub fn supported_codes() -> impl Iterator<Item = &'static str> {
        SUPPORTED.iter().map(|(code, _, _, _)| *code)
    }

    /// Absolute amount with thousands separators and fixed decimals
    pub fn format(&self, amount: f64) -> String {
        if !amount.is_finite() {
            return "0".to_string();
        }
        group_thousands(&format!("{:.*}", self.decimals, amount.abs()))
    }

    pub fn format_with_symbol(&self, amount: f64) -> String {
        format!("{}{}", self.symbol, self.format(amount))
    }

    /// Amount rounded to a whole unit, for compact table cells
    pub fn format_whole(&self, amount: f64) -> String {
        if !amount.is_finite() {
            return "0".to_string();
        }
        format!("{}{}", self.symbol, group_thousands(&format!("{:.0}", amount.round())))
    }

    /// Parse user-entered text, ignoring symbols and separators
    ///
    /// Anything that does not parse is treated as zero.
    pub fn parse(text: &str) -> f64 {
        let cleaned: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();
        leading_number(&cleaned).unwrap_or(0.0)
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            code: "USD".to_string(),
            symbol: "$".to_string(),
            name: "US Dollar".to_string(),
            decimals: 2,
        }
    }
}

/// Longest parseable numeric prefix, e.g. "12.5.3" -> 12.5
fn leading_number(text: &str) -> Option<f64> {
    (1..=text.len())
        .rev()
        .find_map(|end| text[..end].parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn group_thousands(digits: &str) -> String {
    let (sign, unsigned) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let (whole, fraction) = match unsigned.find('.') {
        Some(idx) => unsigned.split_at(idx),
        None => (unsigned, ""),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}{}", sign, grouped, fraction)
}
