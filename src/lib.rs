//! Bond Valuation - fixed-coupon bond pricing and amortization schedules
//!
//! This library provides:
//! - Coupon schedule generation around a settlement date
//! - Dirty/clean pricing with fractional-period discounting
//! - Accrued interest and round-half-up price rounding
//! - Coupon-by-coupon amortization tables with settlement stub splicing
//! - CSV bond books, CSV reports and parallel batch pricing

pub mod error;
pub mod dates;
pub mod rounding;
pub mod bond;
pub mod report;
pub mod batch;

// Re-export commonly used types
pub use error::{BondError, BondResult, ReportError};
pub use bond::{
    amortization_table, price, value, AmortizationRow, AmortizationTable, BondPricer, BondTerms,
    BondType, BondValuation, CouponFrequency, PricerConfig, PricingResult,
};
pub use batch::BatchPricer;
