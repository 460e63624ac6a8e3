use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{Result, SummaryError};
use crate::importer::{load_sheet, normalize, Upload};
use crate::mailer::{validate_address, Mailer, OutgoingMail};
use crate::render;
use crate::reports::{summarize, WeeklySummary};

/// What the caller gets back once the report has gone out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Acknowledgement {
    pub message: String,
    pub current_week_range: String,
    pub next_week_range: String,
    pub current_rows: usize,
    pub next_rows: usize,
}

pub fn subject_for(summary: &WeeklySummary) -> String {
    format!("Weekly Summary: {}", summary.current_week)
}

/// Spreadsheet bytes to the three report tables.
pub fn build_summary(upload: &Upload, today: NaiveDate) -> Result<WeeklySummary> {
    let sheet = load_sheet(upload)?;
    let records = normalize(&sheet)?;
    log::info!(
        "{}: {} dated record(s) from {} row(s)",
        upload.file_name,
        records.len(),
        sheet.rows.len()
    );
    Ok(summarize(&records, today))
}

/// Render the report and hand it to the transport. Blocks until the send completes.
pub fn deliver(
    summary: &WeeklySummary,
    receiver: &str,
    mailer: &dyn Mailer,
    generated_at: NaiveDateTime,
) -> Result<Acknowledgement> {
    let mail = OutgoingMail {
        to: receiver.trim().to_string(),
        subject: subject_for(summary),
        html: render::html::weekly_report(summary, generated_at)?,
    };
    mailer.send(&mail)?;

    Ok(Acknowledgement {
        message: "Email sent.".to_string(),
        current_week_range: summary.current_week.to_string(),
        next_week_range: summary.next_week.to_string(),
        current_rows: summary.current.len(),
        next_rows: summary.next.len(),
    })
}

/// The whole request: validate, load, summarize, send. Nothing is sent unless
/// every step before delivery succeeded.
pub fn process_upload(
    upload: &Upload,
    receiver: &str,
    today: NaiveDate,
    mailer: &dyn Mailer,
    generated_at: NaiveDateTime,
) -> Result<Acknowledgement> {
    if receiver.trim().is_empty() {
        return Err(SummaryError::MissingInput);
    }
    validate_address(receiver)?;
    let summary = build_summary(upload, today)?;
    deliver(&summary, receiver, mailer, generated_at)
}
