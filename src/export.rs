//! CSV export of the amortization schedule
//!
//! Format: header `Month,Payment,Principal,Interest,Balance`, then one line per
//! payment with every amount fixed to two decimals and `\n` line endings.

use crate::amortization::PaymentScheduleEntry;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::io::Write;

pub const CSV_HEADER: [&str; 5] = ["Month", "Payment", "Principal", "Interest", "Balance"];

/// Write the schedule as CSV
pub fn write_schedule_csv<W: Write>(writer: W, entries: &[PaymentScheduleEntry]) -> Result<()> {
    if entries.is_empty() {
        return Err(Error::EmptySchedule);
    }

    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADER)?;
    for entry in entries {
        csv_writer.write_record([
            entry.period.to_string(),
            to_fixed_2(entry.payment),
            to_fixed_2(entry.principal),
            to_fixed_2(entry.interest),
            to_fixed_2(entry.balance),
        ])?;
    }

    csv_writer.flush()?;
    log::debug!("exported {} schedule rows", entries.len());
    Ok(())
}

/// Render the schedule CSV into a string
pub fn schedule_csv_string(entries: &[PaymentScheduleEntry]) -> Result<String> {
    let mut buffer = Vec::new();
    write_schedule_csv(&mut buffer, entries)?;
    // Only ASCII digits, separators and punctuation are written
    String::from_utf8(buffer).map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Download name for an export made on `date`
pub fn default_export_filename(date: NaiveDate) -> String {
    format!("MortgageIQ_Amortization_{}.csv", date.format("%Y-%m-%d"))
}

/// Fixed two-decimal rendering with exact halves rounded away from zero
fn to_fixed_2(value: f64) -> String {
    // Only an odd number of eighths sits exactly on a third-decimal half. Odd
    // eighths imply |eighths| < 2^53, so the cent count is exact in integers.
    let eighths = value * 8.0;
    if value.is_finite() && eighths.fract() == 0.0 && eighths.abs() < 9_007_199_254_740_992.0 {
        let whole_eighths = eighths.abs() as u64;
        if whole_eighths % 2 == 1 {
            // eighths * 12.5 cents, with the half bumped outward
            let cents = (whole_eighths * 25 + 1) / 2;
            let sign = if value < 0.0 { "-" } else { "" };
            return format!("{}{}.{:02}", sign, cents / 100, cents % 100);
        }
    }
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::generate_schedule;

    #[test]
    fn test_header_and_rows() {
        let entries = generate_schedule(120_000.0, 0.0, 10, 1_000.0);
        let csv = schedule_csv_string(&entries).expect("schedule exports");

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 121);
        assert_eq!(lines[0], "Month,Payment,Principal,Interest,Balance");
        assert_eq!(lines[1], "1,1000.00,1000.00,0.00,119000.00");
        assert_eq!(lines[120], "120,1000.00,1000.00,0.00,0.00");
        assert!(csv.ends_with("0.00\n"));
        assert!(!csv.contains('\r'));
    }

    #[test]
    fn test_amortized_first_row() {
        let entries = generate_schedule(280_000.0, 6.5, 30, 1769.790465780303);
        let csv = schedule_csv_string(&entries).expect("schedule exports");
        let first = csv.lines().nth(1).expect("first data row");
        assert_eq!(first, "1,1769.79,253.12,1516.67,279746.88");
    }

    #[test]
    fn test_empty_schedule_rejected() {
        let err = schedule_csv_string(&[]).unwrap_err();
        assert!(matches!(err, Error::EmptySchedule));
    }

    #[test]
    fn test_half_cent_rounds_up() {
        assert_eq!(to_fixed_2(0.125), "0.13");
        assert_eq!(to_fixed_2(2.375), "2.38");
        assert_eq!(to_fixed_2(-0.125), "-0.13");
        assert_eq!(to_fixed_2(0.5), "0.50");
        assert_eq!(to_fixed_2(1234.5678), "1234.57");
        assert_eq!(to_fixed_2(0.0), "0.00");
    }

    #[test]
    fn test_half_cent_rounds_up_for_large_amounts() {
        // Past 2^43 adjacent floats are more than a tenth of a cent apart
        assert_eq!(to_fixed_2(8_796_093_022_208.125), "8796093022208.13");
        assert_eq!(to_fixed_2(-8_796_093_022_208.125), "-8796093022208.13");
        assert_eq!(to_fixed_2(562_949_953_421_312.375), "562949953421312.38");
        assert_eq!(to_fixed_2(1e20), "100000000000000000000.00");
    }

    #[test]
    fn test_default_filename() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date");
        assert_eq!(default_export_filename(date), "MortgageIQ_Amortization_2026-10-19.csv");
    }
}
