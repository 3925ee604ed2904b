//! Console rendering of a valuation

use std::fmt;
use tabled::{builder::Builder, Table};

use super::format_index;
use crate::bond::{AmortizationTable, PricingResult};

const RULE: &str = "------------------------------------";

/// Price block and key dates, as printed after a valuation
pub fn render_summary(result: &PricingResult) -> String {
    Summary(result).to_string()
}

struct Summary<'a>(&'a PricingResult);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "Dirty Price:         {:.4}", r.dirty_price)?;
        writeln!(f, "Accrued Interest:    {:.4}", r.accrued_interest)?;
        writeln!(f, "Clean Price:         {:.4}", r.clean_price)?;
        writeln!(f, "Bond Type:           {}", r.bond_type)?;
        writeln!(f, "{}", RULE)?;
        writeln!(f)?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "Bond Value:          {:.2}", r.bond_value)?;
        writeln!(f, "Settlement Date      {}", r.settlement_date)?;
        writeln!(f, "Last Coupon Date     {}", r.previous_coupon_date)?;
        writeln!(f, "Next Coupon Date     {}", r.next_coupon_date)?;
        writeln!(f, "Maturity Date        {}", r.maturity_date)?;
        writeln!(f, "Coupons Remaining    {}", r.n_periods)?;
        writeln!(f, "Compounding          {}", r.compounding)?;
        write!(f, "{}", RULE)
    }
}

/// Amortization rows as a console table, settlement stub included
pub fn render_table(table: &AmortizationTable) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "No",
        "Beginning Date",
        "Open Bond Value",
        "Interest Payment",
        "Coupon Payment",
        "Closing Bond Value",
        "End Date",
    ]);

    for row in table.rows() {
        builder.push_record([
            format_index(row.coupon_index),
            row.period_open_date.to_string(),
            format!("{:.2}", row.opening_bond_value),
            format!("{:.2}", row.interest_component),
            format!("{:.2}", 0.0 - row.coupon_cash_flow),
            format!("{:.2}", row.closing_bond_value),
            row.period_close_date.to_string(),
        ]);
    }

    Table::from(builder).to_string()
}
