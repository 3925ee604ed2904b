//! Present value, accrued interest and the pricing entry points
//!
//! Prices are quoted per 100 of face value and discounted with a fractional
//! first-period exponent: the cash flow k periods out is discounted by
//! `(1 + y/f)^(k - 1 + DSC/E)`.

use chrono::NaiveDate;
use log::warn;
use serde::Serialize;
use std::fmt;

use super::amortization::{self, AmortizationTable};
use super::schedule::{CouponSchedule, PeriodCounters};
use super::terms::BondTerms;
use crate::error::BondResult;
use crate::rounding::round_half_up;

/// Redemption value prices are quoted against
pub const BASE_PRICE: f64 = 100.0;

/// Rounding settings for a pricer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricerConfig {
    /// Decimal places kept on dirty prices, including the per-coupon-date
    /// revaluations in the amortization table
    pub price_decimals: u32,

    /// Decimal places kept on accrued interest
    pub accrued_decimals: u32,

    /// Decimal places kept on the fractional index of a settlement stub row
    pub stub_index_decimals: u32,
}

impl Default for PricerConfig {
    fn default() -> Self {
        Self {
            price_decimals: 4,
            accrued_decimals: 4,
            stub_index_decimals: 2,
        }
    }
}

/// Relationship between coupon rate and yield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BondType {
    Premium,
    Discount,
    Par,
}

impl BondType {
    pub fn classify(coupon_rate: f64, yield_rate: f64) -> Self {
        if coupon_rate > yield_rate {
            BondType::Premium
        } else if coupon_rate < yield_rate {
            BondType::Discount
        } else {
            BondType::Par
        }
    }

    /// Label used on reports
    pub fn label(self) -> &'static str {
        match self {
            BondType::Premium => "Premium Bond",
            BondType::Discount => "Discounted Bond",
            BondType::Par => "Par Bond",
        }
    }
}

impl fmt::Display for BondType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Valuation of a bond as of its settlement date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingResult {
    pub face_value: f64,
    pub coupon_rate: f64,
    pub yield_rate: f64,
    pub coupon_frequency: u32,

    /// Compounding label, e.g. "Semi-Annual"
    pub compounding: &'static str,

    /// Price per 100 face including accrued interest
    pub dirty_price: f64,

    /// Dirty price less accrued interest, per 100 face
    pub clean_price: f64,

    /// Interest accrued since the previous coupon, per 100 face
    pub accrued_interest: f64,

    /// Dirty price scaled to face value
    pub bond_value: f64,

    pub bond_type: BondType,

    /// Coupon per period on 100 face
    pub coupon_per_100: f64,

    /// Coupon per period on the actual face value
    pub coupon_payment: f64,

    /// Period count used for discounting (calendar-month based)
    pub n_periods: u32,

    /// Period count implied by the generated coupon dates
    pub scheduled_periods: u32,

    /// Whether the two period counts agree
    pub period_counts_agree: bool,

    pub counters: PeriodCounters,

    pub settlement_date: NaiveDate,
    pub previous_coupon_date: NaiveDate,
    pub next_coupon_date: NaiveDate,
    pub maturity_date: NaiveDate,
}

impl PricingResult {
    /// Clean price in currency units
    pub fn clean_value(&self) -> f64 {
        self.face_value / BASE_PRICE * self.clean_price
    }

    /// Accrued interest in currency units
    pub fn accrued_value(&self) -> f64 {
        self.face_value / BASE_PRICE * self.accrued_interest
    }
}

/// Pricing result together with its amortization table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BondValuation {
    pub pricing: PricingResult,
    pub table: AmortizationTable,
}

/// Present value per 100 face of the remaining cash flows
///
/// `periods` coupons of `coupon` each plus redemption of 100 with the last
/// one; the first cash flow sits `fraction` of a period away.
pub(crate) fn present_value(coupon: f64, periodic_yield: f64, periods: u32, fraction: f64) -> f64 {
    let growth = 1.0 + periodic_yield;

    let pv_coupons: f64 = (1..=periods)
        .map(|k| coupon / growth.powf(k as f64 - 1.0 + fraction))
        .sum();
    let pv_redemption = BASE_PRICE / growth.powf(periods as f64 - 1.0 + fraction);

    pv_coupons + pv_redemption
}

/// Prices bonds and builds their amortization tables
#[derive(Debug, Clone, Copy, Default)]
pub struct BondPricer {
    config: PricerConfig,
}

impl BondPricer {
    pub fn new(config: PricerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricerConfig {
        &self.config
    }

    /// Dirty/clean price, accrued interest and bond value at settlement
    pub fn price(&self, terms: &BondTerms) -> BondResult<PricingResult> {
        let schedule = CouponSchedule::build(terms)?;
        self.price_with_schedule(terms, &schedule)
    }

    /// Amortization table from the previous coupon date through maturity
    pub fn amortization_table(&self, terms: &BondTerms) -> BondResult<AmortizationTable> {
        Ok(self.value(terms)?.table)
    }

    /// Pricing and amortization table from a single schedule build
    pub fn value(&self, terms: &BondTerms) -> BondResult<BondValuation> {
        let schedule = CouponSchedule::build(terms)?;
        let pricing = self.price_with_schedule(terms, &schedule)?;
        let table = amortization::build(terms, &schedule, &pricing, &self.config);
        Ok(BondValuation { pricing, table })
    }

    fn price_with_schedule(
        &self,
        terms: &BondTerms,
        schedule: &CouponSchedule,
    ) -> BondResult<PricingResult> {
        let counters = PeriodCounters::compute(schedule, terms.settlement_date)?;

        let n_periods = schedule.month_based_periods();
        let scheduled_periods = schedule.scheduled_periods();
        let period_counts_agree = n_periods == scheduled_periods;
        if !period_counts_agree {
            warn!(
                "period count mismatch for bond maturing {}: {} by calendar months, {} by coupon dates; discounting with {}",
                terms.maturity_date, n_periods, scheduled_periods, n_periods
            );
        }

        let coupon_per_100 = terms.coupon_on(BASE_PRICE);
        let dirty_price = round_half_up(
            present_value(
                coupon_per_100,
                terms.periodic_yield(),
                n_periods,
                counters.fraction(),
            ),
            self.config.price_decimals,
        );

        let accrued_interest = round_half_up(
            coupon_per_100 * counters.accrued_days() as f64 / counters.e as f64,
            self.config.accrued_decimals,
        );

        Ok(PricingResult {
            face_value: terms.face_value,
            coupon_rate: terms.coupon_rate,
            yield_rate: terms.yield_rate,
            coupon_frequency: terms.coupon_frequency.per_year(),
            compounding: terms.coupon_frequency.label(),
            dirty_price,
            clean_price: dirty_price - accrued_interest,
            accrued_interest,
            bond_value: dirty_price * terms.face_value / BASE_PRICE,
            bond_type: BondType::classify(terms.coupon_rate, terms.yield_rate),
            coupon_per_100,
            coupon_payment: terms.coupon_on(terms.face_value),
            n_periods,
            scheduled_periods,
            period_counts_agree,
            counters,
            settlement_date: terms.settlement_date,
            previous_coupon_date: schedule.previous_coupon(),
            next_coupon_date: schedule.next_coupon(),
            maturity_date: schedule.maturity(),
        })
    }
}

/// Price a bond with the default rounding settings
pub fn price(terms: &BondTerms) -> BondResult<PricingResult> {
    BondPricer::default().price(terms)
}

/// Amortization table with the default rounding settings
pub fn amortization_table(terms: &BondTerms) -> BondResult<AmortizationTable> {
    BondPricer::default().amortization_table(terms)
}

/// Pricing plus amortization table with the default rounding settings
pub fn value(terms: &BondTerms) -> BondResult<BondValuation> {
    BondPricer::default().value(terms)
}
