//! Bond pricing and amortization engine
//!
//! Everything in this module is a pure function of [`BondTerms`]: no I/O,
//! no shared state, nothing cached between calls.

mod terms;
mod schedule;
mod pricer;
pub mod amortization;

pub use terms::{BondTerms, CouponFrequency};
pub use schedule::{CouponSchedule, PeriodCounters};
pub use pricer::{
    amortization_table, price, value, BondPricer, BondType, BondValuation, PricerConfig,
    PricingResult, BASE_PRICE,
};
pub use amortization::{AmortizationRow, AmortizationTable, ValuationPoint};
