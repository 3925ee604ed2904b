//! CSV valuation report
//!
//! Sections, top to bottom: price summary (currency and base-100 columns),
//! key dates, bond details, the amortization table closed by a redemption
//! line, then the bond value series by coupon date for charting. Sections
//! are separated by blank records, so the writer runs in flexible mode.

use chrono::NaiveDate;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::format_index;
use crate::bond::{AmortizationRow, BondValuation, PricingResult, BASE_PRICE};
use crate::error::ReportError;

/// Amortization header, in column order
pub const TABLE_HEADER: [&str; 7] = [
    "No",
    "Beginning Date",
    "Open Bond Value",
    "Interest Payment",
    "Coupon Payment",
    "Closing Bond Value",
    "End Date",
];

/// `<face value>_<maturity YYYYMMDD>.csv`
pub fn default_report_name(result: &PricingResult) -> PathBuf {
    PathBuf::from(format!(
        "{}_{}.csv",
        result.face_value,
        result.maturity_date.format("%Y%m%d")
    ))
}

/// Write the report to a file, creating or truncating it
pub fn export_report<P: AsRef<Path>>(path: P, valuation: &BondValuation) -> Result<(), ReportError> {
    let file = File::create(path)?;
    write_report(file, valuation)
}

/// Write the report to any writer
pub fn write_report<W: Write>(writer: W, valuation: &BondValuation) -> Result<(), ReportError> {
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(writer);
    let p = &valuation.pricing;

    wtr.write_record(["Bond Valuation Report"])?;
    wtr.write_record([""])?;

    wtr.write_record(["Descriptions", "Original Value", "Price (Base 100)"])?;
    wtr.write_record(["Face Value".to_string(), money(p.face_value), money(BASE_PRICE)])?;
    wtr.write_record(["Bond Value".to_string(), money(p.bond_value), money(p.dirty_price)])?;
    wtr.write_record(["Clean Price".to_string(), money(p.clean_value()), money(p.clean_price)])?;
    wtr.write_record([
        "Accrued Interest".to_string(),
        money(p.accrued_value()),
        money(p.accrued_interest),
    ])?;
    wtr.write_record([""])?;

    wtr.write_record(["Descriptions", "Date"])?;
    wtr.write_record(["Settlement Date".to_string(), p.settlement_date.to_string()])?;
    wtr.write_record(["Previous Coupon Date".to_string(), p.previous_coupon_date.to_string()])?;
    wtr.write_record(["Next Coupon Date".to_string(), p.next_coupon_date.to_string()])?;
    wtr.write_record(["Maturity Date".to_string(), p.maturity_date.to_string()])?;
    wtr.write_record([""])?;

    wtr.write_record(["Descriptions", "Details"])?;
    wtr.write_record(["No of Coupon".to_string(), p.n_periods.to_string()])?;
    wtr.write_record(["Yield Rate".to_string(), percent(p.yield_rate)])?;
    wtr.write_record(["Coupon Rate".to_string(), percent(p.coupon_rate)])?;
    wtr.write_record(["Coupon Frequency".to_string(), p.compounding.to_string()])?;
    wtr.write_record(["Bond Type".to_string(), p.bond_type.to_string()])?;
    wtr.write_record([""])?;

    wtr.write_record(["Bond Amortization Table"])?;
    wtr.write_record(TABLE_HEADER)?;

    let rows = valuation.table.rows();
    for row in rows {
        wtr.write_record(table_record(row))?;
    }

    // Redemption line: the value the final row closes at, on maturity
    if let Some(last) = rows.last() {
        wtr.write_record([
            format_index(last.coupon_index.floor() + 1.0),
            last.period_close_date.to_string(),
            money(last.closing_bond_value),
        ])?;
    }
    wtr.write_record([""])?;

    wtr.write_record(["Bond Value by Coupon Date"])?;
    wtr.write_record(["Coupon Date", "Bond Value"])?;
    for (date, value) in value_series(rows) {
        wtr.write_record([date.to_string(), money(value)])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Opening value on each row's start date, then the redemption value
fn value_series(rows: &[AmortizationRow]) -> Vec<(NaiveDate, f64)> {
    let mut series: Vec<(NaiveDate, f64)> = rows
        .iter()
        .map(|row| (row.period_open_date, row.opening_bond_value))
        .collect();
    if let Some(last) = rows.last() {
        series.push((last.period_close_date, last.closing_bond_value));
    }
    series
}

fn table_record(row: &AmortizationRow) -> [String; 7] {
    [
        format_index(row.coupon_index),
        row.period_open_date.to_string(),
        money(row.opening_bond_value),
        money(row.interest_component),
        // Coupons leave the bond, so they are written as outflows
        money(0.0 - row.coupon_cash_flow),
        money(row.closing_bond_value),
        row.period_close_date.to_string(),
    ]
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

fn percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}
