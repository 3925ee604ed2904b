//! Bond Valuation CLI
//!
//! Prices one bond from command-line terms, prints the summary and the
//! amortization table, and optionally writes the CSV report.

use anyhow::{Context, Result};
use bond_valuation::report::{default_report_name, export_report, render_summary, render_table};
use bond_valuation::{value, BondTerms, CouponFrequency};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use log::info;
use std::path::PathBuf;

/// Price a fixed-coupon bond and build its amortization table
#[derive(Parser)]
#[command(name = "bond_valuation", version, about)]
struct Cli {
    /// Face value of the bond
    #[arg(long)]
    face_value: f64,

    /// Annual coupon rate as a decimal (e.g. 0.05)
    #[arg(long)]
    coupon_rate: f64,

    /// Annual yield rate as a decimal (e.g. 0.06)
    #[arg(long)]
    yield_rate: f64,

    /// Coupons per year: 1, 2, 4 or 12
    #[arg(long, default_value_t = 2)]
    frequency: u32,

    /// Maturity date (YYYY-MM-DD)
    #[arg(long)]
    maturity: NaiveDate,

    /// Settlement/valuation date (YYYY-MM-DD)
    #[arg(long)]
    settlement: NaiveDate,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write the CSV report to this path
    #[arg(long, conflicts_with = "report_default")]
    report: Option<PathBuf>,

    /// Write the CSV report under its default <face>_<maturity>.csv name
    #[arg(long)]
    report_default: bool,

    /// Skip the amortization table in text output
    #[arg(long)]
    no_table: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let frequency = CouponFrequency::try_from(cli.frequency)?;
    let terms = BondTerms::new(
        cli.face_value,
        cli.coupon_rate,
        cli.yield_rate,
        frequency,
        cli.maturity,
        cli.settlement,
    )?;

    let valuation = value(&terms).context("bond valuation failed")?;
    info!(
        "valued bond maturing {} as of {}",
        terms.maturity_date, terms.settlement_date
    );

    match cli.format {
        OutputFormat::Text => {
            println!("Bond Valuation Report");
            println!();
            println!("{}", render_summary(&valuation.pricing));
            if !cli.no_table {
                println!();
                println!("{}", render_table(&valuation.table));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&valuation)?);
        }
    }

    let report_path = match (cli.report, cli.report_default) {
        (Some(path), _) => Some(path),
        (None, true) => Some(default_report_name(&valuation.pricing)),
        (None, false) => None,
    };

    if let Some(path) = report_path {
        export_report(&path, &valuation)
            .with_context(|| format!("writing report to {}", path.display()))?;
        eprintln!("Report written to: {}", path.display());
    }

    Ok(())
}
