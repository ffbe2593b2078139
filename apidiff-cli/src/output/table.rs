//! Table output formatting using the `tabled` crate

use super::{truncate, OutputConfig};
use tabled::{
    builder::Builder,
    settings::{object::Columns, style::Style, Alignment, Modify, Width},
};

/// Table output formatter
pub struct TableOutput;

impl TableOutput {
    /// Format rows under the given headers.
    ///
    /// Columns after the first are right-aligned; they hold counts.
    pub fn format_rows(headers: &[&str], rows: &[Vec<String>], config: &OutputConfig) -> String {
        if rows.is_empty() {
            return "(no results)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(headers.iter().map(|h| h.to_string()));
        let term_width = config.effective_width();
        let first_width = term_width.saturating_sub(headers.len() * 12).max(20);
        for row in rows {
            let mut cells = row.clone();
            if config.should_truncate() {
                if let Some(first) = cells.first_mut() {
                    *first = truncate(first, first_width);
                }
            }
            builder.push_record(cells);
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        for i in 1..headers.len() {
            table.with(Modify::new(Columns::single(i)).with(Alignment::right()));
        }
        if config.should_truncate() {
            table.with(Width::wrap(term_width));
        }

        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    #[test]
    fn test_empty_rows() {
        let config = OutputConfig::new(OutputFormat::Table);
        assert_eq!(TableOutput::format_rows(&["A"], &[], &config), "(no results)");
    }

    #[test]
    fn test_rows_are_rendered() {
        let config = OutputConfig::new(OutputFormat::Table).without_truncation();
        let rows = vec![vec!["Lib.dll".to_string(), "3".to_string()]];
        let table = TableOutput::format_rows(&["Module", "Lines"], &rows, &config);

        assert!(table.contains("Module"));
        assert!(table.contains("Lib.dll"));
        assert!(table.contains('3'));
    }
}
