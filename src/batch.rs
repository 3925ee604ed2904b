//! Batch pricing for a book of bonds
//!
//! Each bond is valued independently, so the book is fanned out across
//! rayon's thread pool with no shared state between tasks.

use log::info;
use rayon::prelude::*;
use serde::Serialize;

use crate::bond::{BondPricer, BondValuation, PricerConfig, PricingResult};
use crate::error::BondResult;
use crate::report::BookEntry;

/// Outcome for one bond in a book
#[derive(Debug, Clone)]
pub struct BookValuation {
    pub bond_id: String,
    pub valuation: BondResult<BondValuation>,
}

/// One line of a book summary
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "BondId")]
    pub bond_id: String,
    #[serde(rename = "DirtyPrice")]
    pub dirty_price: f64,
    #[serde(rename = "CleanPrice")]
    pub clean_price: f64,
    #[serde(rename = "AccruedInterest")]
    pub accrued_interest: f64,
    #[serde(rename = "BondValue")]
    pub bond_value: f64,
    #[serde(rename = "BondType")]
    pub bond_type: String,
    #[serde(rename = "PreviousCoupon")]
    pub previous_coupon_date: String,
    #[serde(rename = "NextCoupon")]
    pub next_coupon_date: String,
    #[serde(rename = "Coupons")]
    pub n_periods: u32,
}

impl SummaryRow {
    pub fn from_pricing(bond_id: &str, p: &PricingResult) -> Self {
        Self {
            bond_id: bond_id.to_string(),
            dirty_price: p.dirty_price,
            clean_price: p.clean_price,
            accrued_interest: p.accrued_interest,
            bond_value: p.bond_value,
            bond_type: p.bond_type.to_string(),
            previous_coupon_date: p.previous_coupon_date.to_string(),
            next_coupon_date: p.next_coupon_date.to_string(),
            n_periods: p.n_periods,
        }
    }
}

/// Prices many bonds with one rounding configuration
///
/// # Example
/// ```ignore
/// let book = load_terms("bonds.csv")?;
/// let results = BatchPricer::new().price_all(&book);
/// for r in &results {
///     if let Ok(v) = &r.valuation {
///         println!("{}: {:.4}", r.bond_id, v.pricing.dirty_price);
///     }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct BatchPricer {
    pricer: BondPricer,
}

impl BatchPricer {
    /// Runner with the default rounding settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PricerConfig) -> Self {
        Self {
            pricer: BondPricer::new(config),
        }
    }

    /// Value every entry in parallel; results keep the input order
    ///
    /// A bond with invalid terms yields an error in its own slot and does
    /// not affect the rest of the book.
    pub fn price_all(&self, book: &[BookEntry]) -> Vec<BookValuation> {
        let results: Vec<BookValuation> = book
            .par_iter()
            .map(|entry| BookValuation {
                bond_id: entry.bond_id.clone(),
                valuation: self.pricer.value(&entry.terms),
            })
            .collect();

        let failed = results.iter().filter(|r| r.valuation.is_err()).count();
        info!("priced {} bonds, {} failed", results.len(), failed);

        results
    }

    /// Summary lines for every bond that priced successfully
    pub fn summarize(results: &[BookValuation]) -> Vec<SummaryRow> {
        results
            .iter()
            .filter_map(|r| {
                r.valuation
                    .as_ref()
                    .ok()
                    .map(|v| SummaryRow::from_pricing(&r.bond_id, &v.pricing))
            })
            .collect()
    }
}
