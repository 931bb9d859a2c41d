//! Mortgage Engine CLI
//!
//! Command-line interface for payment calculations, schedules and CSV export

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use mortgage_engine::{
    amortization::{CalculationResult, ScheduleRow},
    export::{default_export_filename, write_schedule_csv},
    loan::load_loans,
    scenario::ScenarioStatus,
    AmortizationEngine, CurrencyFormat, EngineConfig, HomePurchase, ScenarioRunner,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

/// Fixed-rate mortgage calculator
#[derive(Parser)]
#[command(name = "mortgage", version, about = "Fixed-rate mortgage payments and amortization schedules")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Currency used for display (USD, EUR, GBP, JPY, ...)
    #[arg(long, env = "MORTGAGE_CURRENCY", default_value = "USD", global = true)]
    currency: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment and loan totals
    Calculate {
        #[command(flatten)]
        purchase: PurchaseArgs,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the amortization schedule
    Schedule {
        #[command(flatten)]
        purchase: PurchaseArgs,

        /// Show every month instead of the first year plus year ends
        #[arg(long)]
        full: bool,
    },
    /// Write the schedule as CSV
    Export {
        #[command(flatten)]
        purchase: PurchaseArgs,

        /// Output file ("-" for stdout); defaults to a dated file name
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Calculate every scenario in a CSV file (Name,HomePrice,DownPayment,Rate,TermYears)
    Batch {
        /// Scenario file
        input: PathBuf,

        #[arg(long, value_enum, default_value = "csv")]
        format: BatchFormat,
    },
}

#[derive(Args, Debug, Clone)]
struct PurchaseArgs {
    /// Home purchase price
    #[arg(long, default_value_t = 350_000.0)]
    home_price: f64,

    /// Cash paid upfront
    #[arg(long, default_value_t = 70_000.0)]
    down_payment: f64,

    /// Annual interest rate in percent
    #[arg(long, default_value_t = 6.5)]
    rate: f64,

    /// Loan term in years
    #[arg(long, default_value_t = 30)]
    term: u32,
}

impl PurchaseArgs {
    fn purchase(&self) -> HomePurchase {
        HomePurchase::new(self.home_price, self.down_payment, self.rate, self.term)
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum BatchFormat {
    Csv,
    Json,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let currency = CurrencyFormat::lookup(&cli.currency)?;
    let engine = AmortizationEngine::new(EngineConfig {
        currency_code: currency.code.clone(),
        ..Default::default()
    });

    match cli.command {
        Commands::Calculate { purchase, json } => {
            let purchase = purchase.purchase();
            let result = engine.calculate_purchase(&purchase)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_summary(&purchase, &result, &currency);
            }
        }
        Commands::Schedule { purchase, full } => {
            let result = engine.calculate_purchase(&purchase.purchase())?;
            let rows = if full { result.full_view() } else { result.summary_view() };
            print_schedule(&rows, &currency);
        }
        Commands::Export { purchase, output } => {
            let result = engine.calculate_purchase(&purchase.purchase())?;
            export(&result, output)?;
        }
        Commands::Batch { input, format } => {
            let scenarios = load_loans(&input)
                .with_context(|| format!("failed to load scenarios from {}", input.display()))?;
            let runner = ScenarioRunner::with_config(engine.config().clone());
            let outcomes = runner.run_batch(&scenarios);

            match format {
                BatchFormat::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
                BatchFormat::Csv => {
                    let mut writer = csv::Writer::from_writer(io::stdout().lock());
                    writer.write_record([
                        "Name", "HomePrice", "DownPayment", "LoanAmount", "Rate", "TermYears",
                        "MonthlyPayment", "TotalPayments", "TotalInterest", "TotalCost", "Status",
                    ])?;
                    for outcome in &outcomes {
                        let p = &outcome.purchase;
                        let mut record = vec![
                            outcome.name.clone(),
                            format!("{:.2}", p.home_price),
                            format!("{:.2}", p.down_payment),
                            format!("{:.2}", p.loan_amount()),
                            p.annual_rate_percent.to_string(),
                            p.term_years.to_string(),
                        ];
                        match &outcome.outcome {
                            ScenarioStatus::Calculated { result } => {
                                record.extend([
                                    format!("{:.2}", result.monthly_payment),
                                    format!("{:.2}", result.total_payments),
                                    format!("{:.2}", result.total_interest),
                                    format!("{:.2}", result.total_cost),
                                    "ok".to_string(),
                                ]);
                            }
                            ScenarioStatus::Rejected { errors } => {
                                record.extend([String::new(), String::new(), String::new(), String::new()]);
                                record.push(errors.join("; "));
                            }
                        }
                        writer.write_record(&record)?;
                    }
                    writer.flush()?;
                }
            }
        }
    }

    Ok(())
}

fn print_summary(purchase: &HomePurchase, result: &CalculationResult, currency: &CurrencyFormat) {
    println!("Mortgage Calculation");
    println!("====================\n");
    println!("  Home Price:      {}", currency.format_with_symbol(purchase.home_price));
    println!(
        "  Down Payment:    {} ({:.1}%)",
        currency.format_with_symbol(purchase.down_payment),
        purchase.down_payment_percent()
    );
    println!("  Loan Amount:     {}", currency.format_with_symbol(result.principal));
    println!("  Interest Rate:   {}%", result.annual_rate_percent);
    println!("  Term:            {} years ({} months)", result.term_years, result.term_months());
    println!();
    println!("  Monthly Payment: {}", currency.format_with_symbol(result.monthly_payment));
    println!("  Total Payments:  {}", currency.format_with_symbol(result.total_payments));
    println!("  Total Interest:  {}", currency.format_with_symbol(result.total_interest));
    println!("  Total Cost:      {}", currency.format_with_symbol(result.total_cost));
    println!();
    println!(
        "  Principal {:.1}% / Interest {:.1}%",
        result.principal_share_percent(),
        result.interest_share_percent()
    );
}

fn print_schedule(rows: &[ScheduleRow], currency: &CurrencyFormat) {
    println!("{:>10} {:>14} {:>14} {:>14} {:>16}", "Period", "Payment", "Principal", "Interest", "Balance");
    println!("{}", "-".repeat(72));

    for row in rows {
        let entry = row.entry();
        println!(
            "{:>10} {:>14} {:>14} {:>14} {:>16}",
            row.label(),
            currency.format_whole(entry.payment),
            currency.format_whole(entry.principal),
            currency.format_whole(entry.interest),
            currency.format_whole(entry.balance),
        );
    }
}

fn export(result: &CalculationResult, output: Option<PathBuf>) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(default_export_filename(Local::now().date_naive())));

    if path.as_os_str() == "-" {
        let stdout = io::stdout();
        write_schedule_csv(stdout.lock(), &result.schedule)?;
        return Ok(());
    }

    let file = File::create(&path).with_context(|| format!("unable to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_schedule_csv(&mut writer, &result.schedule)?;
    writer.flush()?;

    println!("Schedule written to: {}", path.display());
    Ok(())
}
