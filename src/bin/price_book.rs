//! Price every bond in a CSV book
//!
//! Outputs one summary line per bond; bonds that fail validation are
//! reported on stderr and left out of the summary.

use anyhow::{Context, Result};
use bond_valuation::batch::BatchPricer;
use bond_valuation::report::load_terms;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

/// Price a book of fixed-coupon bonds in parallel
#[derive(Parser)]
#[command(name = "price_book", version, about)]
struct Args {
    /// Bond book CSV (BondId, FaceValue, CouponRate, YieldRate, Frequency,
    /// MaturityDate, SettlementDate)
    #[arg(long)]
    input: PathBuf,

    /// Summary CSV to write
    #[arg(long, default_value = "book_valuation_output.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading bonds from {}...", args.input.display());

    let book = load_terms(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    println!("Loaded {} bonds in {:?}", book.len(), start.elapsed());

    let price_start = Instant::now();
    let results = BatchPricer::new().price_all(&book);
    println!("Valuations complete in {:?}", price_start.elapsed());

    for failed in results.iter().filter(|r| r.valuation.is_err()) {
        if let Err(e) = &failed.valuation {
            eprintln!("  {}: {}", failed.bond_id, e);
        }
    }

    let summary = BatchPricer::summarize(&results);
    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    for row in &summary {
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("Output written to {}", args.output.display());

    let total_value: f64 = summary.iter().map(|r| r.bond_value).sum();
    println!("\nBook Summary:");
    println!("  Bonds priced: {} of {}", summary.len(), results.len());
    println!("  Total value:  {:.2}", total_value);
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
