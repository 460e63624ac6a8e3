use std::fmt::Write;

use colored::Colorize;
use comfy_table::{Cell, Table as TermTable};

use super::sections;
use crate::reports::{Table, WeeklySummary};

const DETAIL_WIDTH: usize = 40;

fn cell_text(column: &str, value: &str) -> String {
    match (column, value) {
        ("LI Match", "Match") => value.green().to_string(),
        ("LI Match", _) => value.red().to_string(),
        (c, v) if c.ends_with("Details") && v.len() > DETAIL_WIDTH => textwrap::fill(v, DETAIL_WIDTH),
        _ => value.to_string(),
    }
}

pub fn format_table(table: &Table, empty_message: &str) -> String {
    if table.is_empty() {
        return format!("{empty_message}.");
    }
    let mut out = TermTable::new();
    out.set_header(table.columns.clone());
    for row in &table.rows {
        out.add_row(
            table
                .columns
                .iter()
                .zip(row)
                .map(|(column, value)| Cell::new(cell_text(column, value)))
                .collect::<Vec<_>>(),
        );
    }
    out.to_string()
}

/// Terminal rendition of the report, same sections as the mail.
pub fn weekly_report(summary: &WeeklySummary) -> String {
    let mut out = String::from("Weekly Summary Report");
    for section in sections(summary) {
        let _ = write!(
            out,
            "\n\n{}\n{}",
            section.title.bold(),
            format_table(&section.table, section.empty_message)
        );
    }
    out
}
