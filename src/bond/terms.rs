//! Bond terms and coupon frequency

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BondError, BondResult};

/// Coupon payments per year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CouponFrequency {
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
}

impl CouponFrequency {
    /// Number of coupon payments per year
    pub fn per_year(self) -> u32 {
        match self {
            CouponFrequency::Annual => 1,
            CouponFrequency::SemiAnnual => 2,
            CouponFrequency::Quarterly => 4,
            CouponFrequency::Monthly => 12,
        }
    }

    /// Calendar months between consecutive coupon dates
    pub fn months_per_period(self) -> i32 {
        12 / self.per_year() as i32
    }

    /// Compounding label used in reports
    pub fn label(self) -> &'static str {
        match self {
            CouponFrequency::Annual => "Annual",
            CouponFrequency::SemiAnnual => "Semi-Annual",
            CouponFrequency::Quarterly => "Quarterly",
            CouponFrequency::Monthly => "Monthly",
        }
    }
}

impl TryFrom<u32> for CouponFrequency {
    type Error = BondError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CouponFrequency::Annual),
            2 => Ok(CouponFrequency::SemiAnnual),
            4 => Ok(CouponFrequency::Quarterly),
            12 => Ok(CouponFrequency::Monthly),
            other => Err(BondError::invalid(
                "coupon_frequency",
                format!("must be one of 1, 2, 4, 12, got {}", other),
            )),
        }
    }
}

impl From<CouponFrequency> for u32 {
    fn from(freq: CouponFrequency) -> Self {
        freq.per_year()
    }
}

impl fmt::Display for CouponFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Contractual terms of a fixed-coupon bond plus the valuation date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondTerms {
    /// Face (redemption) value in currency units
    pub face_value: f64,

    /// Annual coupon rate as a decimal (0.05 = 5%)
    pub coupon_rate: f64,

    /// Annual yield to maturity as a decimal
    pub yield_rate: f64,

    pub coupon_frequency: CouponFrequency,

    pub maturity_date: NaiveDate,

    /// Settlement (valuation) date; must fall before maturity
    pub settlement_date: NaiveDate,
}

impl BondTerms {
    /// Build terms and validate them in one step
    pub fn new(
        face_value: f64,
        coupon_rate: f64,
        yield_rate: f64,
        coupon_frequency: CouponFrequency,
        maturity_date: NaiveDate,
        settlement_date: NaiveDate,
    ) -> BondResult<Self> {
        let terms = Self {
            face_value,
            coupon_rate,
            yield_rate,
            coupon_frequency,
            maturity_date,
            settlement_date,
        };
        terms.validate()?;
        Ok(terms)
    }

    /// Check every invariant the pricer relies on
    ///
    /// Fields are public, so the pricer calls this again before building
    /// a schedule.
    pub fn validate(&self) -> BondResult<()> {
        if !self.face_value.is_finite() || self.face_value <= 0.0 {
            return Err(BondError::invalid(
                "face_value",
                format!("must be positive, got {}", self.face_value),
            ));
        }
        if !self.coupon_rate.is_finite() || self.coupon_rate < 0.0 {
            return Err(BondError::invalid(
                "coupon_rate",
                format!("must be non-negative, got {}", self.coupon_rate),
            ));
        }
        if !self.yield_rate.is_finite() || self.yield_rate <= 0.0 {
            return Err(BondError::invalid(
                "yield_rate",
                format!("must be positive, got {}", self.yield_rate),
            ));
        }
        if self.settlement_date >= self.maturity_date {
            return Err(BondError::invalid(
                "settlement_date",
                format!(
                    "{} must be before maturity date {}",
                    self.settlement_date, self.maturity_date
                ),
            ));
        }
        Ok(())
    }

    /// Periodic yield, y / f
    pub fn periodic_yield(&self) -> f64 {
        self.yield_rate / self.coupon_frequency.per_year() as f64
    }

    /// Coupon paid per period on a notional of `notional`
    pub fn coupon_on(&self, notional: f64) -> f64 {
        notional * self.coupon_rate / self.coupon_frequency.per_year() as f64
    }
}
