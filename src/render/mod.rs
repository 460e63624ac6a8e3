pub mod html;
pub mod text;

use crate::reports::{Table, WeeklySummary};

/// One titled block of the report.
pub struct Section {
    pub title: String,
    pub table: Table,
    pub empty_message: &'static str,
}

/// The three report sections, always in this order.
pub fn sections(summary: &WeeklySummary) -> [Section; 3] {
    [
        Section {
            title: format!("1) Current Week Statistics ({})", summary.current_week),
            table: Table::from_rows(&summary.current),
            empty_message: "No current-week records",
        },
        Section {
            title: format!("2) Next Week Plan ({})", summary.next_week),
            table: Table::from_rows(&summary.next),
            empty_message: "No next-week plan",
        },
        Section {
            title: "3) Plan vs Actual Deviation / Interference".to_string(),
            table: Table::from_rows(&summary.deviation),
            empty_message: "No deviation data",
        },
    ]
}
