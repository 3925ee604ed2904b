//! Amortization table construction
//!
//! Built in three passes, each producing a fresh sequence:
//!
//! 1. **Valuation points**: the bond revalued as of every coupon date, the
//!    oldest coupon date through maturity.
//! 2. **Paired deltas**: consecutive points joined into rows carrying the
//!    interest earned and the coupon paid over each period. The redemption
//!    point becomes the closing value of the final row.
//! 3. **Settlement splice**: when settlement falls between coupon dates the
//!    first period is cut at settlement and a stub row is inserted.

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use super::pricer::{present_value, PricerConfig, PricingResult, BASE_PRICE};
use super::schedule::CouponSchedule;
use super::terms::BondTerms;
use crate::rounding::round_half_up;

/// Bond value as of a coupon date
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValuationPoint {
    pub coupon_index: u32,
    pub date: NaiveDate,
    pub value: f64,
}

/// One period of the amortization table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmortizationRow {
    /// Whole for regular periods, fractional (DSC/E) for a settlement stub
    pub coupon_index: f64,
    pub period_open_date: NaiveDate,
    pub opening_bond_value: f64,
    pub interest_component: f64,
    pub coupon_cash_flow: f64,
    pub closing_bond_value: f64,
    pub period_close_date: NaiveDate,
}

impl AmortizationRow {
    /// Net change in bond value over the period
    pub fn value_change(&self) -> f64 {
        self.closing_bond_value - self.opening_bond_value
    }
}

/// Coupon-by-coupon evolution of bond value through maturity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmortizationTable {
    settlement_date: NaiveDate,
    rows: Vec<AmortizationRow>,
    stub_spliced: bool,
}

impl AmortizationTable {
    pub fn rows(&self) -> &[AmortizationRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn settlement_date(&self) -> NaiveDate {
        self.settlement_date
    }

    /// True when settlement fell mid-period and a stub row was inserted
    pub fn stub_spliced(&self) -> bool {
        self.stub_spliced
    }

    /// Rows from settlement to maturity
    ///
    /// Skips the pre-settlement leg of a spliced table, so the first row
    /// always opens on the settlement date.
    pub fn from_settlement(&self) -> &[AmortizationRow] {
        if self.stub_spliced {
            &self.rows[1..]
        } else {
            &self.rows
        }
    }

    /// Closing date and value of the final row (maturity, face value)
    pub fn redemption(&self) -> Option<(NaiveDate, f64)> {
        self.rows
            .last()
            .map(|row| (row.period_close_date, row.closing_bond_value))
    }

    /// Sum of coupon cash flows from settlement to maturity
    pub fn total_coupons(&self) -> f64 {
        self.from_settlement().iter().map(|r| r.coupon_cash_flow).sum()
    }

    /// Sum of interest components from settlement to maturity
    pub fn total_interest(&self) -> f64 {
        self.from_settlement().iter().map(|r| r.interest_component).sum()
    }
}

/// Run all three passes for a priced bond
pub(crate) fn build(
    terms: &BondTerms,
    schedule: &CouponSchedule,
    pricing: &PricingResult,
    config: &PricerConfig,
) -> AmortizationTable {
    let points = valuation_points(terms, schedule, config);
    let rows = pair_rows(&points, pricing.coupon_payment);
    let spliced = splice_settlement(&rows, pricing, config);
    let stub_spliced = spliced.len() > rows.len();

    debug!(
        "amortization table: {} points, {} rows, stub spliced: {}",
        points.len(),
        spliced.len(),
        stub_spliced
    );

    AmortizationTable {
        settlement_date: terms.settlement_date,
        rows: spliced,
        stub_spliced,
    }
}

/// Pass 1: revalue the bond on each coupon date
///
/// Each date is treated as its own settlement (DSC = E, so the fraction is
/// one) with the periods left to maturity remaining.
pub fn valuation_points(
    terms: &BondTerms,
    schedule: &CouponSchedule,
    config: &PricerConfig,
) -> Vec<ValuationPoint> {
    let coupon_per_100 = terms.coupon_on(BASE_PRICE);
    let periodic_yield = terms.periodic_yield();
    let dates = schedule.dates();
    let last = dates.len() - 1;

    dates
        .iter()
        .enumerate()
        .map(|(index, &date)| {
            let remaining = (last - index) as u32;
            let price = round_half_up(
                present_value(coupon_per_100, periodic_yield, remaining, 1.0),
                config.price_decimals,
            );
            ValuationPoint {
                coupon_index: index as u32,
                date,
                value: price * terms.face_value / BASE_PRICE,
            }
        })
        .collect()
}

/// Pass 2: join consecutive valuation points into rows
///
/// interest = next value - this value + coupon, so every row satisfies
/// `closing = opening + interest - coupon`.
pub fn pair_rows(points: &[ValuationPoint], coupon_payment: f64) -> Vec<AmortizationRow> {
    points
        .windows(2)
        .map(|pair| {
            let (this, next) = (pair[0], pair[1]);
            AmortizationRow {
                coupon_index: this.coupon_index as f64,
                period_open_date: this.date,
                opening_bond_value: this.value,
                interest_component: next.value - this.value + coupon_payment,
                coupon_cash_flow: coupon_payment,
                closing_bond_value: next.value,
                period_close_date: next.date,
            }
        })
        .collect()
}

/// Pass 3: cut the first period at settlement and insert the stub row
///
/// Returns the rows unchanged when settlement is a coupon date.
pub fn splice_settlement(
    rows: &[AmortizationRow],
    pricing: &PricingResult,
    config: &PricerConfig,
) -> Vec<AmortizationRow> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    if first.period_open_date == pricing.settlement_date {
        return rows.to_vec();
    }

    let settlement_value = pricing.bond_value;

    let pre_settlement = AmortizationRow {
        interest_component: settlement_value - first.opening_bond_value,
        coupon_cash_flow: 0.0,
        closing_bond_value: settlement_value,
        period_close_date: pricing.settlement_date,
        ..*first
    };

    let stub = AmortizationRow {
        coupon_index: round_half_up(pricing.counters.fraction(), config.stub_index_decimals),
        period_open_date: pricing.settlement_date,
        opening_bond_value: settlement_value,
        interest_component: first.closing_bond_value - settlement_value + first.coupon_cash_flow,
        coupon_cash_flow: first.coupon_cash_flow,
        closing_bond_value: first.closing_bond_value,
        period_close_date: first.period_close_date,
    };

    let mut spliced = Vec::with_capacity(rows.len() + 1);
    spliced.push(pre_settlement);
    spliced.push(stub);
    spliced.extend_from_slice(&rows[1..]);
    spliced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bond::pricer::BondPricer;
    use crate::bond::terms::CouponFrequency;
    use approx::assert_abs_diff_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn example_terms() -> BondTerms {
        BondTerms {
            face_value: 1000.0,
            coupon_rate: 0.05,
            yield_rate: 0.06,
            coupon_frequency: CouponFrequency::SemiAnnual,
            maturity_date: d(2030, 1, 1),
            settlement_date: d(2024, 3, 15),
        }
    }

    #[test]
    fn test_valuation_points_end_at_face_value() {
        let terms = example_terms();
        let schedule = CouponSchedule::build(&terms).unwrap();
        let points = valuation_points(&terms, &schedule, &PricerConfig::default());

        assert_eq!(points.len(), schedule.dates().len());
        assert_eq!(points[0].date, d(2024, 1, 1));
        assert_eq!(points[0].coupon_index, 0);

        let last = points.last().unwrap();
        assert_eq!(last.date, d(2030, 1, 1));
        assert_abs_diff_eq!(last.value, 1000.0, epsilon = 1e-9);

        // A discount bond accretes toward par
        for pair in points.windows(2) {
            assert!(pair[0].value < pair[1].value);
        }
    }

    #[test]
    fn test_pair_rows_drop_redemption_point() {
        let points = vec![
            ValuationPoint { coupon_index: 0, date: d(2029, 1, 1), value: 980.0 },
            ValuationPoint { coupon_index: 1, date: d(2029, 7, 1), value: 990.0 },
            ValuationPoint { coupon_index: 2, date: d(2030, 1, 1), value: 1000.0 },
        ];
        let rows = pair_rows(&points, 25.0);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].period_close_date, d(2029, 7, 1));
        assert_abs_diff_eq!(rows[0].interest_component, 35.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rows[1].closing_bond_value, 1000.0, epsilon = 1e-12);
        assert_eq!(rows[1].coupon_index, 1.0);
    }

    #[test]
    fn test_mid_period_settlement_splices_stub() {
        let terms = example_terms();
        let valuation = BondPricer::default().value(&terms).unwrap();
        let table = &valuation.table;
        let rows = table.rows();

        assert!(table.stub_spliced());
        // 12 regular periods plus the stub
        assert_eq!(rows.len(), 13);

        let pre = rows[0];
        assert_eq!(pre.period_open_date, d(2024, 1, 1));
        assert_eq!(pre.period_close_date, d(2024, 3, 15));
        assert_eq!(pre.coupon_cash_flow, 0.0);
        assert_abs_diff_eq!(pre.closing_bond_value, valuation.pricing.bond_value, epsilon = 1e-12);
        assert_abs_diff_eq!(
            pre.interest_component,
            valuation.pricing.bond_value - pre.opening_bond_value,
            epsilon = 1e-12
        );

        let stub = rows[1];
        assert_eq!(stub.coupon_index, 0.59);
        assert_eq!(stub.period_open_date, d(2024, 3, 15));
        assert_eq!(stub.period_close_date, d(2024, 7, 1));
        assert_abs_diff_eq!(stub.opening_bond_value, valuation.pricing.bond_value, epsilon = 1e-12);
        assert_abs_diff_eq!(stub.coupon_cash_flow, 25.0, epsilon = 1e-12);
        assert_abs_diff_eq!(stub.closing_bond_value, rows[2].opening_bond_value, epsilon = 1e-12);
        assert_abs_diff_eq!(
            stub.interest_component,
            stub.closing_bond_value - stub.opening_bond_value + stub.coupon_cash_flow,
            epsilon = 1e-12
        );

        assert_eq!(rows[2].coupon_index, 1.0);
        assert_eq!(rows[2].period_open_date, d(2024, 7, 1));
    }

    #[test]
    fn test_settlement_on_coupon_date_has_no_stub() {
        let terms = BondTerms {
            settlement_date: d(2024, 7, 1),
            ..example_terms()
        };
        let valuation = BondPricer::default().value(&terms).unwrap();
        let table = &valuation.table;

        assert!(!table.stub_spliced());
        assert_eq!(table.len(), 11);
        assert_eq!(table.rows()[0].period_open_date, d(2024, 7, 1));
        assert!(table.rows().iter().all(|r| r.coupon_index.fract() == 0.0));
        assert_abs_diff_eq!(
            table.rows()[0].opening_bond_value,
            valuation.pricing.bond_value,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_settlement_in_final_period() {
        let terms = BondTerms {
            settlement_date: d(2029, 10, 1),
            ..example_terms()
        };
        let valuation = BondPricer::default().value(&terms).unwrap();
        let rows = valuation.table.rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].period_open_date, d(2029, 10, 1));
        assert_eq!(rows[1].period_close_date, d(2030, 1, 1));
        assert_abs_diff_eq!(rows[1].closing_bond_value, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cash_flows_reconcile_from_settlement() {
        let terms = example_terms();
        let valuation = BondPricer::default().value(&terms).unwrap();
        let table = &valuation.table;

        let first = table.from_settlement()[0];
        assert_eq!(first.period_open_date, terms.settlement_date);
        assert_abs_diff_eq!(first.opening_bond_value, valuation.pricing.bond_value, epsilon = 1e-12);

        let (date, value) = table.redemption().unwrap();
        assert_eq!(date, d(2030, 1, 1));
        assert_abs_diff_eq!(value, terms.face_value, epsilon = 1e-9);

        // Interest earned = redemption + coupons received - price paid
        assert_abs_diff_eq!(table.total_coupons(), 12.0 * 25.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            table.total_interest(),
            terms.face_value + table.total_coupons() - valuation.pricing.bond_value,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_rows_chain_without_gaps() {
        let terms = BondTerms {
            coupon_frequency: CouponFrequency::Quarterly,
            settlement_date: d(2026, 8, 20),
            ..example_terms()
        };
        let table = BondPricer::default().amortization_table(&terms).unwrap();

        for pair in table.rows().windows(2) {
            assert_eq!(pair[0].period_close_date, pair[1].period_open_date);
            assert_abs_diff_eq!(pair[0].closing_bond_value, pair[1].opening_bond_value, epsilon = 1e-12);
        }
        for row in table.rows() {
            assert_abs_diff_eq!(
                row.value_change(),
                row.interest_component - row.coupon_cash_flow,
                epsilon = 1e-9
            );
        }
    }
}
