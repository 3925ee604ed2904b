//! Coupon-date generation and fractional-period counters

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use super::terms::BondTerms;
use crate::dates::{add_months, days_between, months_between};
use crate::error::{BondError, BondResult};

/// Coupon dates from the last coupon at/before settlement through maturity
///
/// Always holds at least two dates: the previous and next coupon relative
/// to settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CouponSchedule {
    dates: Vec<NaiveDate>,
    months_per_period: i32,
}

impl CouponSchedule {
    /// Step backward from maturity one coupon period at a time until a date
    /// at or before settlement is reached, then sort ascending
    pub fn build(terms: &BondTerms) -> BondResult<Self> {
        // Checked first; an unchecked settlement >= maturity never terminates
        terms.validate()?;

        let months_per_period = terms.coupon_frequency.months_per_period();
        let mut dates = vec![terms.maturity_date];
        let mut current = terms.maturity_date;

        loop {
            current = add_months(current, -months_per_period)?;
            dates.push(current);
            if current <= terms.settlement_date {
                break;
            }
        }

        dates.sort();

        debug!(
            "coupon schedule: {} dates from {} to {} every {} months",
            dates.len(),
            dates[0],
            terms.maturity_date,
            months_per_period
        );

        Ok(Self {
            dates,
            months_per_period,
        })
    }

    #[cfg(test)]
    pub(crate) fn from_dates(dates: Vec<NaiveDate>, months_per_period: i32) -> Self {
        Self {
            dates,
            months_per_period,
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Last coupon date at or before settlement
    pub fn previous_coupon(&self) -> NaiveDate {
        self.dates[0]
    }

    /// First coupon date after settlement
    pub fn next_coupon(&self) -> NaiveDate {
        self.dates[1]
    }

    pub fn maturity(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// Coupon periods counted from calendar months, rounded up
    pub fn month_based_periods(&self) -> u32 {
        let months = months_between(self.previous_coupon(), self.maturity());
        let periods = (months as f64 / self.months_per_period as f64).ceil();
        periods.max(0.0) as u32
    }

    /// Coupon periods counted from the generated dates
    pub fn scheduled_periods(&self) -> u32 {
        (self.dates.len() - 1) as u32
    }
}

/// Day counts that drive fractional-period discounting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodCounters {
    /// Days from settlement to the next coupon date
    pub dsc: i64,

    /// Days in the full coupon period containing settlement
    pub e: i64,
}

impl PeriodCounters {
    pub fn compute(schedule: &CouponSchedule, settlement_date: NaiveDate) -> BondResult<Self> {
        let dsc = days_between(settlement_date, schedule.next_coupon());
        let e = days_between(schedule.previous_coupon(), schedule.next_coupon());

        if e == 0 {
            return Err(BondError::ArithmeticDegenerate {
                context: "coupon period length E",
            });
        }

        debug!("period counters: DSC={} E={}", dsc, e);
        Ok(Self { dsc, e })
    }

    /// DSC / E, the fraction of the current period still to run
    pub fn fraction(&self) -> f64 {
        self.dsc as f64 / self.e as f64
    }

    /// Days already accrued in the current period
    pub fn accrued_days(&self) -> i64 {
        self.e - self.dsc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bond::terms::CouponFrequency;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn terms(freq: CouponFrequency, maturity: NaiveDate, settlement: NaiveDate) -> BondTerms {
        BondTerms {
            face_value: 1000.0,
            coupon_rate: 0.05,
            yield_rate: 0.06,
            coupon_frequency: freq,
            maturity_date: maturity,
            settlement_date: settlement,
        }
    }

    #[test]
    fn test_semi_annual_schedule_brackets_settlement() {
        let t = terms(CouponFrequency::SemiAnnual, d(2030, 1, 1), d(2024, 3, 15));
        let schedule = CouponSchedule::build(&t).unwrap();

        assert_eq!(schedule.previous_coupon(), d(2024, 1, 1));
        assert_eq!(schedule.next_coupon(), d(2024, 7, 1));
        assert_eq!(schedule.maturity(), d(2030, 1, 1));
        assert_eq!(schedule.dates().len(), 13);
        assert_eq!(schedule.scheduled_periods(), 12);
        assert_eq!(schedule.month_based_periods(), 12);
    }

    #[test]
    fn test_schedule_is_strictly_ascending_with_uniform_spacing() {
        let t = terms(CouponFrequency::Quarterly, d(2028, 5, 15), d(2025, 2, 1));
        let schedule = CouponSchedule::build(&t).unwrap();
        let dates = schedule.dates();

        assert!(dates[0] <= t.settlement_date && t.settlement_date < dates[1]);
        for pair in dates.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(months_between(pair[0], pair[1]), 3);
        }
    }

    #[test]
    fn test_settlement_on_coupon_date_starts_schedule() {
        let t = terms(CouponFrequency::SemiAnnual, d(2030, 1, 1), d(2024, 7, 1));
        let schedule = CouponSchedule::build(&t).unwrap();
        assert_eq!(schedule.previous_coupon(), d(2024, 7, 1));
        assert_eq!(schedule.next_coupon(), d(2025, 1, 1));

        let counters = PeriodCounters::compute(&schedule, t.settlement_date).unwrap();
        assert_eq!(counters.dsc, counters.e);
        assert_eq!(counters.accrued_days(), 0);
    }

    #[test]
    fn test_settlement_in_final_period() {
        let t = terms(CouponFrequency::Annual, d(2025, 6, 30), d(2025, 1, 10));
        let schedule = CouponSchedule::build(&t).unwrap();
        assert_eq!(schedule.dates(), &[d(2024, 6, 30), d(2025, 6, 30)]);
        assert_eq!(schedule.scheduled_periods(), 1);
    }

    #[test]
    fn test_month_end_maturity_clamps_backward() {
        let t = terms(CouponFrequency::Quarterly, d(2025, 5, 31), d(2024, 12, 1));
        let schedule = CouponSchedule::build(&t).unwrap();
        // Feb 28 then the clamped day carries back through the earlier months
        assert_eq!(
            schedule.dates(),
            &[d(2024, 11, 28), d(2025, 2, 28), d(2025, 5, 31)]
        );
    }

    #[test]
    fn test_invalid_terms_fail_before_iteration() {
        let t = terms(CouponFrequency::Monthly, d(2024, 1, 1), d(2024, 1, 1));
        assert!(matches!(
            CouponSchedule::build(&t),
            Err(BondError::InvalidTerms { field: "settlement_date", .. })
        ));
    }

    #[test]
    fn test_period_counters_mid_period() {
        let t = terms(CouponFrequency::SemiAnnual, d(2030, 1, 1), d(2024, 3, 15));
        let schedule = CouponSchedule::build(&t).unwrap();
        let counters = PeriodCounters::compute(&schedule, t.settlement_date).unwrap();

        // 2024-03-15 -> 2024-07-01 and 2024-01-01 -> 2024-07-01
        assert_eq!(counters.dsc, 108);
        assert_eq!(counters.e, 182);
        assert!(counters.dsc >= 0 && counters.dsc <= counters.e);
        assert!((counters.fraction() - 108.0 / 182.0).abs() < 1e-15);
    }

    #[test]
    fn test_zero_length_period_is_degenerate() {
        let schedule = CouponSchedule::from_dates(vec![d(2024, 1, 1), d(2024, 1, 1)], 6);
        assert_eq!(
            PeriodCounters::compute(&schedule, d(2024, 1, 1)),
            Err(BondError::ArithmeticDegenerate {
                context: "coupon period length E",
            })
        );
    }
}
