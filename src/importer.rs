use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Range, Reader};

use crate::columns::{resolve_columns, ColumnMap, Field};
use crate::dates::{excel_serial_to_datetime, normalize_date};
use crate::error::{Result, SummaryError};
use crate::models::{Cell, RawSheet, TimesheetRecord};

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

/// An uploaded spreadsheet, held entirely in memory.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(Self { file_name, bytes })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpreadsheetFormat {
    Xlsx,
    Xlsb,
    Xls,
    Ods,
    #[cfg(feature = "csv")]
    Csv,
}

impl SpreadsheetFormat {
    /// Pick a reader from the file extension; anything unknown is rejected before parsing.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" => Ok(Self::Xlsx),
            "xlsb" => Ok(Self::Xlsb),
            "xls" => Ok(Self::Xls),
            "ods" => Ok(Self::Ods),
            #[cfg(feature = "csv")]
            "csv" => Ok(Self::Csv),
            _ => Err(SummaryError::UnsupportedFormat(name.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Reading the first sheet
// ---------------------------------------------------------------------------

/// Read the first worksheet of an upload. The first row is the header.
pub fn load_sheet(upload: &Upload) -> Result<RawSheet> {
    let format = SpreadsheetFormat::from_file_name(&upload.file_name)?;
    let cursor = Cursor::new(upload.bytes.as_slice());
    let sheet = match format {
        SpreadsheetFormat::Xlsx => sheet_from_range(first_range::<calamine::Xlsx<_>, _>(cursor)?),
        SpreadsheetFormat::Xlsb => sheet_from_range(first_range::<calamine::Xlsb<_>, _>(cursor)?),
        SpreadsheetFormat::Xls => sheet_from_range(first_range::<calamine::Xls<_>, _>(cursor)?),
        SpreadsheetFormat::Ods => sheet_from_range(first_range::<calamine::Ods<_>, _>(cursor)?),
        #[cfg(feature = "csv")]
        SpreadsheetFormat::Csv => read_csv(cursor)?,
    };
    log::debug!(
        "{}: {} column(s), {} row(s)",
        upload.file_name,
        sheet.headers.len(),
        sheet.rows.len()
    );
    Ok(sheet)
}

fn first_range<R, RS>(reader: RS) -> Result<Range<Data>>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let mut workbook: R = calamine::open_workbook_from_rs(reader)
        .map_err(|e| SummaryError::Spreadsheet(format!("Failed to open workbook: {e}")))?;
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SummaryError::Spreadsheet("Workbook has no worksheets".to_string()))?
        .map_err(|e| SummaryError::Spreadsheet(e.to_string()))
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            excel_serial_to_datetime(serial).map_or(Cell::Number(serial), Cell::DateTime)
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

fn header_labels(cells: impl Iterator<Item = Cell>) -> Vec<String> {
    cells
        .enumerate()
        .map(|(i, c)| {
            let label = c.to_text().trim_start_matches('\u{feff}').trim().to_string();
            if label.is_empty() {
                format!("Unnamed: {i}")
            } else {
                label
            }
        })
        .collect()
}

fn sheet_from_range(range: Range<Data>) -> RawSheet {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return RawSheet::default();
    };
    let headers = header_labels(header.iter().map(cell_from_data));
    let rows = rows
        .map(|r| r.iter().map(cell_from_data).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|c| *c != Cell::Empty))
        .collect();
    RawSheet { headers, rows }
}

#[cfg(feature = "csv")]
fn read_csv<R: Read>(reader: R) -> Result<RawSheet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = header_labels(
        rdr.headers()?
            .iter()
            .map(|h| Cell::Text(h.to_string())),
    );
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let cells: Vec<Cell> = record
            .iter()
            .map(|f| {
                if f.trim().is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(f.to_string())
                }
            })
            .collect();
        if cells.iter().any(|c| *c != Cell::Empty) {
            rows.push(cells);
        }
    }
    Ok(RawSheet { headers, rows })
}

// ---------------------------------------------------------------------------
// Normalizing onto the timesheet schema
// ---------------------------------------------------------------------------

fn text_field(sheet: &RawSheet, columns: &ColumnMap, row: usize, field: Field) -> String {
    columns
        .get(field)
        .map(|col| sheet.cell(row, col).to_text())
        .unwrap_or_default()
}

fn count_field(sheet: &RawSheet, columns: &ColumnMap, row: usize, field: Field) -> i64 {
    columns
        .get(field)
        .and_then(|col| sheet.cell(row, col).to_number())
        .map(|n| n.trunc() as i64)
        .unwrap_or(0)
}

fn minutes_field(sheet: &RawSheet, columns: &ColumnMap, row: usize, field: Field) -> f64 {
    columns
        .get(field)
        .and_then(|col| sheet.cell(row, col).to_number())
        .unwrap_or(0.0)
}

/// Turn a raw sheet into dated timesheet records.
///
/// Rows whose date cannot be read are dropped one by one; if that leaves
/// nothing at all the whole upload is rejected with
/// [`SummaryError::NoParsableDates`].
pub fn normalize(sheet: &RawSheet) -> Result<Vec<TimesheetRecord>> {
    let columns = resolve_columns(&sheet.headers)?;

    let mut records = Vec::with_capacity(sheet.rows.len());
    let mut dropped = 0usize;
    for row in 0..sheet.rows.len() {
        let Some(date) = normalize_date(sheet.cell(row, columns.date)).date() else {
            log::debug!(
                "row {}: unparsable date {:?}, skipping",
                row + 2,
                sheet.cell(row, columns.date).to_text()
            );
            dropped += 1;
            continue;
        };
        records.push(TimesheetRecord {
            date,
            category: text_field(sheet, &columns, row, Field::Category),
            subcategory: text_field(sheet, &columns, row, Field::Subcategory),
            line_item: text_field(sheet, &columns, row, Field::LineItem),
            planned_li: count_field(sheet, &columns, row, Field::PlannedLi),
            actual_li: count_field(sheet, &columns, row, Field::ActualLi),
            planned_mins: minutes_field(sheet, &columns, row, Field::PlannedMins),
            actual_mins: minutes_field(sheet, &columns, row, Field::ActualMins),
            planned_details: text_field(sheet, &columns, row, Field::PlannedDetails),
            actual_details: text_field(sheet, &columns, row, Field::ActualDetails),
        });
    }

    if records.is_empty() {
        return Err(SummaryError::NoParsableDates);
    }
    if dropped > 0 {
        log::info!("{dropped} row(s) dropped for unparsable dates, {} kept", records.len());
    }
    Ok(records)
}
