use askama::Template;
use chrono::NaiveDateTime;

use super::{sections, Section};
use crate::error::{Result, SummaryError};
use crate::reports::WeeklySummary;

/// Mail body: title, generation time, then the three sections. Cell text is
/// escaped by the template engine.
#[derive(Template)]
#[template(path = "weekly_report.html")]
struct WeeklyReportTemplate<'a> {
    generated_at: String,
    sections: &'a [Section],
}

pub fn weekly_report(summary: &WeeklySummary, generated_at: NaiveDateTime) -> Result<String> {
    let sections = sections(summary);
    WeeklyReportTemplate {
        generated_at: generated_at.format("%Y-%m-%d %H:%M").to_string(),
        sections: &sections,
    }
    .render()
    .map_err(|e| SummaryError::Render(format!("weekly report: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimesheetRecord;
    use crate::reports::summarize;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn generated_at() -> NaiveDateTime {
        ymd(2025, 1, 15).and_hms_opt(8, 30, 0).unwrap()
    }

    fn task(date: NaiveDate, category: &str, line_item: &str) -> TimesheetRecord {
        TimesheetRecord {
            category: category.to_string(),
            line_item: line_item.to_string(),
            planned_li: 1,
            actual_li: 1,
            ..TimesheetRecord::on(date)
        }
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let summary = summarize(&[], ymd(2025, 1, 15));
        let html = weekly_report(&summary, generated_at()).unwrap();
        let current = html.find("1) Current Week Statistics (2025-01-13 to 2025-01-19)").unwrap();
        let next = html.find("2) Next Week Plan (2025-01-20 to 2025-01-26)").unwrap();
        let deviation = html.find("3) Plan vs Actual Deviation").unwrap();
        assert!(current < next && next < deviation);
        assert!(html.contains("Weekly Summary Report"));
        assert!(html.contains("Generated: 2025-01-15 08:30"));
    }

    #[test]
    fn test_empty_sections_show_placeholders() {
        let summary = summarize(&[], ymd(2025, 1, 15));
        let html = weekly_report(&summary, generated_at()).unwrap();
        assert!(html.contains("No current-week records"));
        assert!(html.contains("No next-week plan"));
        assert!(html.contains("No deviation data"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn test_rows_render_and_escape() {
        let summary = summarize(&[task(ymd(2025, 1, 14), "R&D", "<script>")], ymd(2025, 1, 15));
        let html = weekly_report(&summary, generated_at()).unwrap();
        assert!(html.contains("R&amp;D"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<th style='padding:8px;text-align:left;border-bottom:1px solid #e6eefb'>LI Match</th>"));
        assert!(html.contains(">Match</td>"));
        assert!(html.contains("No next-week plan"));
    }

    #[test]
    fn test_rows_alternate_background() {
        let records = [
            task(ymd(2025, 1, 13), "Ops", "Deploy"),
            task(ymd(2025, 1, 14), "Ops", "Review"),
        ];
        let html = weekly_report(&summarize(&records, ymd(2025, 1, 15)), generated_at()).unwrap();
        assert!(html.contains("<tr style='background:#ffffff'>"));
        assert!(html.contains("<tr style='background:#f8fafc'>"));
    }
}
