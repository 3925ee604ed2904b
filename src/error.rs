//! Error types for bond valuation
//!
//! `BondError` covers the pricing core. `ReportError` covers the collaborators
//! that read terms from CSV and write reports.

use chrono::NaiveDate;
use thiserror::Error;

/// Result alias for the pricing core
pub type BondResult<T> = Result<T, BondError>;

/// Errors raised by schedule generation and pricing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BondError {
    /// Bond terms failed validation; raised before any schedule is built
    #[error("invalid bond terms: {field} {reason}")]
    InvalidTerms {
        field: &'static str,
        reason: String,
    },

    /// A computation would divide by a zero-length period
    #[error("degenerate arithmetic in {context}")]
    ArithmeticDegenerate { context: &'static str },

    /// Month stepping left the representable calendar range
    #[error("date {date} shifted by {months} months is out of range")]
    DateOutOfRange { date: NaiveDate, months: i32 },
}

impl BondError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        BondError::InvalidTerms {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading bond books or writing reports
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A date column could not be parsed as YYYY-MM-DD
    #[error("record {record}: cannot parse {column} '{value}' as YYYY-MM-DD")]
    BadDate {
        record: usize,
        column: &'static str,
        value: String,
    },

    /// A record parsed but its terms are not valid
    #[error("record {record}: {source}")]
    Terms {
        record: usize,
        #[source]
        source: BondError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_terms_message() {
        let err = BondError::invalid("face_value", "must be positive, got -5");
        assert_eq!(
            err.to_string(),
            "invalid bond terms: face_value must be positive, got -5"
        );
    }

    #[test]
    fn test_report_error_wraps_terms_error() {
        let err = ReportError::Terms {
            record: 3,
            source: BondError::ArithmeticDegenerate { context: "period counters" },
        };
        assert_eq!(
            err.to_string(),
            "record 3: degenerate arithmetic in period counters"
        );
    }
}
