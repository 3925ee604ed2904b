//! Load a book of bond terms from CSV
//!
//! Expected columns: BondId, FaceValue, CouponRate, YieldRate, Frequency,
//! MaturityDate, SettlementDate. Dates are YYYY-MM-DD.

use chrono::NaiveDate;
use csv::Reader;
use serde::Serialize;
use std::path::Path;

use crate::bond::{BondTerms, CouponFrequency};
use crate::error::ReportError;

/// One bond from a book, keyed by its identifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookEntry {
    pub bond_id: String,
    pub terms: BondTerms,
}

/// Raw CSV row matching the book columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "BondId")]
    bond_id: String,
    #[serde(rename = "FaceValue")]
    face_value: f64,
    #[serde(rename = "CouponRate")]
    coupon_rate: f64,
    #[serde(rename = "YieldRate")]
    yield_rate: f64,
    #[serde(rename = "Frequency")]
    frequency: u32,
    #[serde(rename = "MaturityDate")]
    maturity_date: String,
    #[serde(rename = "SettlementDate")]
    settlement_date: String,
}

impl CsvRow {
    fn into_entry(self, record: usize) -> Result<BookEntry, ReportError> {
        let coupon_frequency = CouponFrequency::try_from(self.frequency)
            .map_err(|source| ReportError::Terms { record, source })?;
        let maturity_date = parse_date(&self.maturity_date, "MaturityDate", record)?;
        let settlement_date = parse_date(&self.settlement_date, "SettlementDate", record)?;

        let terms = BondTerms::new(
            self.face_value,
            self.coupon_rate,
            self.yield_rate,
            coupon_frequency,
            maturity_date,
            settlement_date,
        )
        .map_err(|source| ReportError::Terms { record, source })?;

        Ok(BookEntry {
            bond_id: self.bond_id,
            terms,
        })
    }
}

fn parse_date(value: &str, column: &'static str, record: usize) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ReportError::BadDate {
        record,
        column,
        value: value.to_string(),
    })
}

/// Load all bonds from a CSV file
pub fn load_terms<P: AsRef<Path>>(path: P) -> Result<Vec<BookEntry>, ReportError> {
    let reader = Reader::from_path(path)?;
    read_entries(reader)
}

/// Load bonds from any reader (e.g., string buffer, stdin)
pub fn load_terms_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<BookEntry>, ReportError> {
    read_entries(Reader::from_reader(reader))
}

fn read_entries<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<BookEntry>, ReportError> {
    let mut entries = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        entries.push(row.into_entry(index + 1)?);
    }

    Ok(entries)
}
