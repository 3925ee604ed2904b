//! Collaborators around the pricing core: console output, CSV reports and
//! CSV bond books

pub mod loader;
pub mod presenter;
pub mod exporter;

pub use loader::{load_terms, load_terms_from_reader, BookEntry};
pub use presenter::{render_summary, render_table};
pub use exporter::{default_report_name, export_report, write_report};

/// Whole indices print bare, stub indices keep two decimals
pub(crate) fn format_index(index: f64) -> String {
    if index.fract() == 0.0 {
        format!("{}", index as i64)
    } else {
        format!("{:.2}", index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_index() {
        assert_eq!(format_index(3.0), "3");
        assert_eq!(format_index(0.0), "0");
        assert_eq!(format_index(0.59), "0.59");
    }
}
